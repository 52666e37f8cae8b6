pub mod codec;
pub mod convert;
pub mod crypto;
mod error;
pub mod personal;
pub mod pid;
pub mod pokemon;
pub mod ribbon;
pub mod save;
pub mod text;

use num_derive::{FromPrimitive, ToPrimitive};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use error::{Error, Result};
pub use pokemon::{Pkx, Pokemon};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainerId {
    pub public_id: u16,
    pub secret_id: u16,
}

impl TrainerId {
    pub fn new(public_id: u16, secret_id: u16) -> Self {
        TrainerId {
            public_id,
            secret_id,
        }
    }

    pub fn from_u32(raw: u32) -> Self {
        TrainerId {
            public_id: (raw & 0xffff) as u16,
            secret_id: (raw >> 16) as u16,
        }
    }

    pub fn to_u32(self) -> u32 {
        (self.secret_id as u32) << 16 | self.public_id as u32
    }

    /// Trainer shiny value for a generation's shift width.
    pub fn tsv(self, generation: Generation) -> u16 {
        (self.public_id ^ self.secret_id) >> generation.shiny_shift()
    }
}

/// Record format family. `Lgpe` is the Let's Go sub-era of generation seven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Generation {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Lgpe,
    Eight,
}

impl Generation {
    pub fn shiny_shift(self) -> u32 {
        match self {
            Generation::One | Generation::Two => 0,
            Generation::Three | Generation::Four | Generation::Five => 3,
            Generation::Six | Generation::Seven | Generation::Lgpe | Generation::Eight => 4,
        }
    }

    /// Position on the conversion chain; `None` for formats with no adjacent hops.
    pub fn chain_index(self) -> Option<u8> {
        match self {
            Generation::One => Some(1),
            Generation::Two => Some(2),
            Generation::Three => Some(3),
            Generation::Four => Some(4),
            Generation::Five => Some(5),
            Generation::Six => Some(6),
            Generation::Seven => Some(7),
            Generation::Eight => Some(8),
            Generation::Lgpe => None,
        }
    }

    pub(crate) fn from_chain_index(idx: u8) -> Option<Generation> {
        match idx {
            1 => Some(Generation::One),
            2 => Some(Generation::Two),
            3 => Some(Generation::Three),
            4 => Some(Generation::Four),
            5 => Some(Generation::Five),
            6 => Some(Generation::Six),
            7 => Some(Generation::Seven),
            8 => Some(Generation::Eight),
            _ => None,
        }
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generation::Lgpe => write!(f, "LGPE"),
            other => write!(f, "gen {}", other.chain_index().unwrap_or_default()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Language {
    Japanese = 1,
    English = 2,
    French = 3,
    Italian = 4,
    German = 5,
    Spanish = 7,
    Korean = 8,
    ChineseSimplified = 9,
    ChineseTraditional = 10,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gender {
    Male = 0,
    Female = 1,
    Genderless = 2,
}

/// Origin game id as stored in records from generation three on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameVersion {
    Sapphire = 1,
    Ruby = 2,
    Emerald = 3,
    FireRed = 4,
    LeafGreen = 5,
    HeartGold = 7,
    SoulSilver = 8,
    Diamond = 10,
    Pearl = 11,
    Platinum = 12,
    ColosseumXd = 15,
    White = 20,
    Black = 21,
    White2 = 22,
    Black2 = 23,
    X = 24,
    Y = 25,
    AlphaSapphire = 26,
    OmegaRuby = 27,
    Sun = 30,
    Moon = 31,
    UltraSun = 32,
    UltraMoon = 33,
    Go = 34,
    LetsGoPikachu = 42,
    LetsGoEevee = 43,
    Sword = 44,
    Shield = 45,
}

impl GameVersion {
    pub fn generation(self) -> Generation {
        use GameVersion::*;
        match self {
            Sapphire | Ruby | Emerald | FireRed | LeafGreen | ColosseumXd => Generation::Three,
            HeartGold | SoulSilver | Diamond | Pearl | Platinum => Generation::Four,
            White | Black | White2 | Black2 => Generation::Five,
            X | Y | AlphaSapphire | OmegaRuby => Generation::Six,
            Sun | Moon | UltraSun | UltraMoon => Generation::Seven,
            Go | LetsGoPikachu | LetsGoEevee => Generation::Lgpe,
            Sword | Shield => Generation::Eight,
        }
    }
}

/// Capture ball. Ids past `Cherish` were added in later generations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Ball {
    Master = 1,
    Ultra = 2,
    Great = 3,
    Poke = 4,
    Safari = 5,
    Net = 6,
    Dive = 7,
    Nest = 8,
    Repeat = 9,
    Timer = 10,
    Luxury = 11,
    Premier = 12,
    Dusk = 13,
    Heal = 14,
    Quick = 15,
    Cherish = 16,
    Fast = 17,
    Level = 18,
    Lure = 19,
    Heavy = 20,
    Love = 21,
    Friend = 22,
    Moon = 23,
    Sport = 24,
    Dream = 25,
    Beast = 26,
}

/// Battle stat in storage order. Speed precedes the special stats in every layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stat {
    Hp = 0,
    Atk = 1,
    Def = 2,
    Spe = 3,
    SpA = 4,
    SpD = 5,
}

impl Stat {
    pub const ALL: [Stat; 6] = [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spe, Stat::SpA, Stat::SpD];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Date as stored in records: years since 2000.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Date {
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: u8, month: u8, day: u8) -> Self {
        Date { year, month, day }
    }
}

/// Trainer that owns a save, used as the destination of conversions and trades.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainerInfo {
    pub player_name: String,
    pub player_gender: u8,
    pub id: TrainerId,
    pub language: u8,
    pub country: u8,
    pub sub_region: u8,
    pub console_region: u8,
}

/// Nature multiplier in tenths: 11 for the favoured stat, 9 for the hindered one.
pub fn nature_multiplier(nature: u8, stat: Stat) -> u32 {
    let mut mult = 10;
    if stat == Stat::Hp {
        return mult;
    }
    let idx = stat.index() as u8;
    if nature / 5 + 1 == idx {
        mult += 1;
    }
    if nature % 5 + 1 == idx {
        mult -= 1;
    }
    mult
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_natures_cancel_out() {
        for nature in [0u8, 6, 12, 18, 24] {
            for stat in Stat::ALL {
                assert_eq!(nature_multiplier(nature, stat), 10);
            }
        }
    }

    #[test]
    fn modest_boosts_special_attack() {
        assert_eq!(nature_multiplier(15, Stat::SpA), 11);
        assert_eq!(nature_multiplier(15, Stat::Atk), 9);
        assert_eq!(nature_multiplier(15, Stat::Spe), 10);
    }

    #[test]
    fn unknown_version_and_ball_ids_decode_to_none() {
        use num_traits::FromPrimitive;
        assert_eq!(GameVersion::from_u8(12), Some(GameVersion::Platinum));
        assert_eq!(GameVersion::from_u8(12).map(GameVersion::generation), Some(Generation::Four));
        assert_eq!(GameVersion::from_u8(6), None);
        assert_eq!(Ball::from_u8(25), Some(Ball::Dream));
        assert_eq!(Ball::from_u8(0), None);
    }

    #[test]
    fn trainer_id_packs_secret_id_high() {
        let id = TrainerId::from_u32(0x1234_5678);
        assert_eq!(id.public_id, 0x5678);
        assert_eq!(id.secret_id, 0x1234);
        assert_eq!(id.to_u32(), 0x1234_5678);
    }
}
