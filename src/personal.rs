//! Reference data consumed by the record formats.
//!
//! Species, move and item tables are supplied by the caller through [`ReferenceTables`].
//! Experience growth curves are the one table defined here, computed from the growth
//! formulas.

use crate::{Generation, Language, Stat};

pub const GENDER_MALE_ONLY: u8 = 0;
pub const GENDER_FEMALE_ONLY: u8 = 254;
pub const GENDER_UNKNOWN: u8 = 255;

/// One row of a generation's personal table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersonalInfo {
    /// HP, Atk, Def, Spe, SpA, SpD.
    pub base_stats: [u8; 6],
    pub types: [u8; 2],
    pub catch_rate: u8,
    pub gender_ratio: u8,
    pub base_friendship: u8,
    pub exp_growth: u8,
    pub abilities: [u16; 3],
    pub form_count: u8,
    /// Row of the first alternate form, 0 when forms share the base row.
    pub form_stat_index: u16,
}

impl PersonalInfo {
    pub fn base_stat(&self, stat: Stat) -> u8 {
        self.base_stats[stat.index()]
    }

    pub fn is_fixed_gender(&self) -> bool {
        matches!(
            self.gender_ratio,
            GENDER_MALE_ONLY | GENDER_FEMALE_ONLY | GENDER_UNKNOWN
        )
    }
}

/// Largest valid identifiers in a generation's games.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_species: u16,
    pub max_move: u16,
    pub max_ability: u16,
    pub max_item: u16,
    pub max_ball: u8,
}

impl Limits {
    pub fn for_generation(generation: Generation) -> Limits {
        let (max_species, max_move, max_ability, max_item, max_ball) = match generation {
            Generation::One => (151, 165, 0, 255, 0),
            Generation::Two => (251, 251, 0, 255, 0),
            Generation::Three => (386, 354, 76, 374, 12),
            Generation::Four => (493, 467, 123, 536, 24),
            Generation::Five => (649, 559, 164, 638, 25),
            Generation::Six => (721, 621, 191, 775, 25),
            Generation::Seven => (807, 728, 233, 959, 26),
            Generation::Lgpe => (809, 742, 233, 1057, 26),
            Generation::Eight => (898, 826, 267, 1607, 26),
        };
        Limits {
            max_species,
            max_move,
            max_ability,
            max_item,
            max_ball,
        }
    }
}

/// Read-only lookup service for species, move and item data.
pub trait ReferenceTables {
    /// Personal row for a species or a resolved form-species index, keyed by national number.
    fn personal(&self, generation: Generation, form_species: u16) -> Option<PersonalInfo>;

    fn limits(&self, generation: Generation) -> Limits {
        Limits::for_generation(generation)
    }

    fn base_pp(&self, _generation: Generation, _move_id: u16) -> u8 {
        0
    }

    /// Default name of a species, used when a nickname must be regenerated.
    fn species_name(&self, _language: Language, _species: u16) -> Option<String> {
        None
    }

    /// Gen 1 and gen 3 store an internal species index rather than the national number.
    fn national_from_internal(&self, _generation: Generation, internal: u16) -> u16 {
        internal
    }

    fn internal_from_national(&self, _generation: Generation, national: u16) -> u16 {
        national
    }

    /// Gen 3 item index for a gen 4+ item id.
    fn item_to_gen3(&self, _item: u16) -> Option<u16> {
        None
    }

    /// Gen 4+ item id for a gen 3 item index.
    fn item_from_gen3(&self, _item: u16) -> Option<u16> {
        None
    }

    fn species_available(&self, generation: Generation, species: u16, _form: u8) -> bool {
        species != 0 && species <= self.limits(generation).max_species
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpGrowth {
    MediumFast = 0,
    Erratic = 1,
    Fluctuating = 2,
    MediumSlow = 3,
    Fast = 4,
    Slow = 5,
}

impl ExpGrowth {
    pub fn from_index(idx: u8) -> ExpGrowth {
        match idx {
            1 => ExpGrowth::Erratic,
            2 => ExpGrowth::Fluctuating,
            3 => ExpGrowth::MediumSlow,
            4 => ExpGrowth::Fast,
            5 => ExpGrowth::Slow,
            _ => ExpGrowth::MediumFast,
        }
    }
}

/// Minimum experience for `level` on a growth curve. Level 1 (and 0) needs none.
pub fn exp_for_level(level: u8, growth: ExpGrowth) -> u32 {
    let n = level.min(100) as u64;
    if n <= 1 {
        return 0;
    }
    let cube = n * n * n;
    let exp = match growth {
        ExpGrowth::MediumFast => cube,
        ExpGrowth::Erratic => match n {
            0..=50 => cube * (100 - n) / 50,
            51..=68 => cube * (150 - n) / 100,
            69..=98 => cube * ((1911 - 10 * n) / 3) / 500,
            _ => cube * (160 - n) / 100,
        },
        ExpGrowth::Fluctuating => match n {
            0..=15 => cube * ((n + 1) / 3 + 24) / 50,
            16..=36 => cube * (n + 14) / 50,
            _ => cube * (n / 2 + 32) / 50,
        },
        ExpGrowth::MediumSlow => (6 * cube / 5 + 100 * n) - (15 * n * n + 140),
        ExpGrowth::Fast => 4 * cube / 5,
        ExpGrowth::Slow => 5 * cube / 4,
    };
    exp as u32
}

/// Level reached with `exp` experience.
pub fn level_for_exp(exp: u32, growth: ExpGrowth) -> u8 {
    let mut level = 1;
    while level < 100 && exp >= exp_for_level(level + 1, growth) {
        level += 1;
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_end_at_known_totals() {
        assert_eq!(exp_for_level(100, ExpGrowth::MediumFast), 1_000_000);
        assert_eq!(exp_for_level(100, ExpGrowth::Erratic), 600_000);
        assert_eq!(exp_for_level(100, ExpGrowth::Fluctuating), 1_640_000);
        assert_eq!(exp_for_level(100, ExpGrowth::MediumSlow), 1_059_860);
        assert_eq!(exp_for_level(100, ExpGrowth::Fast), 800_000);
        assert_eq!(exp_for_level(100, ExpGrowth::Slow), 1_250_000);
    }

    #[test]
    fn early_levels_round_down() {
        assert_eq!(exp_for_level(2, ExpGrowth::MediumSlow), 9);
        assert_eq!(exp_for_level(2, ExpGrowth::Erratic), 15);
        assert_eq!(exp_for_level(2, ExpGrowth::Fluctuating), 4);
        assert_eq!(exp_for_level(2, ExpGrowth::Fast), 6);
        assert_eq!(exp_for_level(2, ExpGrowth::Slow), 10);
    }

    #[test]
    fn level_scan_stops_at_threshold() {
        assert_eq!(level_for_exp(0, ExpGrowth::MediumFast), 1);
        assert_eq!(level_for_exp(7, ExpGrowth::MediumFast), 1);
        assert_eq!(level_for_exp(8, ExpGrowth::MediumFast), 2);
        assert_eq!(level_for_exp(124_999, ExpGrowth::MediumFast), 49);
        assert_eq!(level_for_exp(125_000, ExpGrowth::MediumFast), 50);
        assert_eq!(level_for_exp(u32::MAX, ExpGrowth::Slow), 100);
    }
}
