//! Abstract ribbon identifiers and the byte/bit tables of each record layout.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ribbon {
    ChampionKalos,
    ChampionG3Hoenn,
    ChampionSinnoh,
    BestFriends,
    Training,
    BattlerSkillful,
    BattlerExpert,
    Effort,
    Alert,
    Shock,
    Downcast,
    Careless,
    Relax,
    Snooze,
    Smile,
    Gorgeous,
    Royal,
    GorgeousRoyal,
    Artist,
    Footprint,
    Record,
    Legend,
    Country,
    National,
    Earth,
    World,
    Classic,
    Premier,
    Event,
    Birthday,
    Special,
    Souvenir,
    Wishing,
    ChampionBattle,
    ChampionRegional,
    ChampionNational,
    ChampionWorld,
    MemoryContest,
    MemoryBattle,
    ChampionG6Hoenn,
    ContestStar,
    MasterCoolness,
    MasterBeauty,
    MasterCuteness,
    MasterCleverness,
    MasterToughness,
    ChampionAlola,
    BattleRoyale,
    BattleTreeGreat,
    BattleTreeMaster,
    ChampionGalar,
    TowerMaster,
    MasterRank,
    Ability,
    AbilityGreat,
    AbilityDouble,
    AbilityMulti,
    AbilityPair,
    AbilityWorld,
    Winning,
    Victory,
    G3Cool,
    G3CoolSuper,
    G3CoolHyper,
    G3CoolMaster,
    G3Beauty,
    G3BeautySuper,
    G3BeautyHyper,
    G3BeautyMaster,
    G3Cute,
    G3CuteSuper,
    G3CuteHyper,
    G3CuteMaster,
    G3Smart,
    G3SmartSuper,
    G3SmartHyper,
    G3SmartMaster,
    G3Tough,
    G3ToughSuper,
    G3ToughHyper,
    G3ToughMaster,
    G4Cool,
    G4CoolGreat,
    G4CoolUltra,
    G4CoolMaster,
    G4Beauty,
    G4BeautyGreat,
    G4BeautyUltra,
    G4BeautyMaster,
    G4Cute,
    G4CuteGreat,
    G4CuteUltra,
    G4CuteMaster,
    G4Smart,
    G4SmartGreat,
    G4SmartUltra,
    G4SmartMaster,
    G4Tough,
    G4ToughGreat,
    G4ToughUltra,
    G4ToughMaster,
}

use Ribbon::*;

/// Kalos-era bit sequence, shared by gen 6, gen 7 and gen 8 from their first ribbon byte.
const KALOS_SEQUENCE: [Ribbon; 53] = [
    ChampionKalos, ChampionG3Hoenn, ChampionSinnoh, BestFriends, Training, BattlerSkillful,
    BattlerExpert, Effort, Alert, Shock, Downcast, Careless, Relax, Snooze, Smile, Gorgeous,
    Royal, GorgeousRoyal, Artist, Footprint, Record, Legend, Country, National, Earth, World,
    Classic, Premier, Event, Birthday, Special, Souvenir, Wishing, ChampionBattle,
    ChampionRegional, ChampionNational, ChampionWorld, MemoryContest, MemoryBattle,
    ChampionG6Hoenn, ContestStar, MasterCoolness, MasterBeauty, MasterCuteness,
    MasterCleverness, MasterToughness, ChampionAlola, BattleRoyale, BattleTreeGreat,
    BattleTreeMaster, ChampionGalar, TowerMaster, MasterRank,
];

const SINNOH_RIBBONS: [Ribbon; 28] = [
    ChampionSinnoh, Ability, AbilityGreat, AbilityDouble, AbilityMulti, AbilityPair, AbilityWorld,
    Alert, Shock, Downcast, Careless, Relax, Snooze, Smile, Gorgeous, Royal, GorgeousRoyal,
    Footprint, Record, Event, Legend, ChampionWorld, Birthday, Special, Souvenir, Wishing,
    Classic, Premier,
];

const HOENN_RIBBONS: [Ribbon; 32] = [
    G3Cool, G3CoolSuper, G3CoolHyper, G3CoolMaster, G3Beauty, G3BeautySuper, G3BeautyHyper,
    G3BeautyMaster, G3Cute, G3CuteSuper, G3CuteHyper, G3CuteMaster, G3Smart, G3SmartSuper,
    G3SmartHyper, G3SmartMaster, G3Tough, G3ToughSuper, G3ToughHyper, G3ToughMaster,
    ChampionG3Hoenn, Winning, Victory, Artist, Effort, ChampionBattle, ChampionRegional,
    ChampionNational, Country, National, Earth, World,
];

const SINNOH_CONTEST_RIBBONS: [Ribbon; 20] = [
    G4Cool, G4CoolGreat, G4CoolUltra, G4CoolMaster, G4Beauty, G4BeautyGreat, G4BeautyUltra,
    G4BeautyMaster, G4Cute, G4CuteGreat, G4CuteUltra, G4CuteMaster, G4Smart, G4SmartGreat,
    G4SmartUltra, G4SmartMaster, G4Tough, G4ToughGreat, G4ToughUltra, G4ToughMaster,
];

/// Gen 3 ribbon word bits 15..=26.
const GEN3_FLAG_RIBBONS: [Ribbon; 12] = [
    ChampionG3Hoenn, Winning, Victory, Artist, Effort, ChampionBattle, ChampionRegional,
    ChampionNational, Country, National, Earth, World,
];

/// Gen 3 contest categories, each a 3-bit rank counter in the ribbon word.
const GEN3_CONTEST_RIBBONS: [[Ribbon; 4]; 5] = [
    [G3Cool, G3CoolSuper, G3CoolHyper, G3CoolMaster],
    [G3Beauty, G3BeautySuper, G3BeautyHyper, G3BeautyMaster],
    [G3Cute, G3CuteSuper, G3CuteHyper, G3CuteMaster],
    [G3Smart, G3SmartSuper, G3SmartHyper, G3SmartMaster],
    [G3Tough, G3ToughSuper, G3ToughHyper, G3ToughMaster],
];

impl Ribbon {
    pub fn all() -> impl Iterator<Item = Ribbon> {
        KALOS_SEQUENCE
            .into_iter()
            .chain([Ability, AbilityGreat, AbilityDouble, AbilityMulti, AbilityPair])
            .chain([AbilityWorld, Winning, Victory])
            .chain(GEN3_CONTEST_RIBBONS.into_iter().flatten())
            .chain(SINNOH_CONTEST_RIBBONS)
    }
}

fn sequence_position(sequence: &[Ribbon], base: usize, ribbon: Ribbon) -> Option<(usize, u8)> {
    sequence
        .iter()
        .position(|r| *r == ribbon)
        .map(|idx| (base + idx / 8, (idx % 8) as u8))
}

/// Shared by the gen 4 and gen 5 layouts.
pub fn gen4_position(ribbon: Ribbon) -> Option<(usize, u8)> {
    sequence_position(&SINNOH_RIBBONS, 0x24, ribbon)
        .or_else(|| sequence_position(&HOENN_RIBBONS, 0x3c, ribbon))
        .or_else(|| sequence_position(&SINNOH_CONTEST_RIBBONS, 0x60, ribbon))
}

pub fn gen6_position(ribbon: Ribbon) -> Option<(usize, u8)> {
    sequence_position(&KALOS_SEQUENCE[..46], 0x30, ribbon)
}

pub fn gen7_position(ribbon: Ribbon) -> Option<(usize, u8)> {
    sequence_position(&KALOS_SEQUENCE[..50], 0x30, ribbon)
}

pub fn gen8_position(ribbon: Ribbon) -> Option<(usize, u8)> {
    sequence_position(&KALOS_SEQUENCE, 0x34, ribbon)
}

/// Bit within the gen 3 ribbon word for the non-contest ribbons.
pub fn gen3_flag_bit(ribbon: Ribbon) -> Option<u32> {
    GEN3_FLAG_RIBBONS
        .iter()
        .position(|r| *r == ribbon)
        .map(|idx| 15 + idx as u32)
}

/// Contest category (0..5) and rank (1..=4) of a gen 3 contest ribbon.
pub fn gen3_contest_rank(ribbon: Ribbon) -> Option<(u32, u32)> {
    GEN3_CONTEST_RIBBONS
        .iter()
        .enumerate()
        .find_map(|(category, ranks)| {
            ranks
                .iter()
                .position(|r| *r == ribbon)
                .map(|rank| (category as u32, rank as u32 + 1))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sinnoh_layout_spans_three_regions() {
        assert_eq!(gen4_position(ChampionSinnoh), Some((0x24, 0)));
        assert_eq!(gen4_position(AbilityWorld), Some((0x24, 6)));
        assert_eq!(gen4_position(Premier), Some((0x27, 3)));
        assert_eq!(gen4_position(G3ToughMaster), Some((0x3e, 3)));
        assert_eq!(gen4_position(Winning), Some((0x3e, 5)));
        assert_eq!(gen4_position(World), Some((0x3f, 7)));
        assert_eq!(gen4_position(G4ToughMaster), Some((0x62, 3)));
        assert_eq!(gen4_position(ChampionKalos), None);
    }

    #[test]
    fn kalos_sequence_grows_per_generation() {
        assert_eq!(gen6_position(MasterToughness), Some((0x35, 5)));
        assert_eq!(gen6_position(ChampionAlola), None);
        assert_eq!(gen7_position(BattleTreeMaster), Some((0x36, 1)));
        assert_eq!(gen7_position(ChampionGalar), None);
        assert_eq!(gen8_position(ChampionKalos), Some((0x34, 0)));
        assert_eq!(gen8_position(MasterRank), Some((0x3a, 4)));
    }

    #[test]
    fn gen3_contest_ranks() {
        assert_eq!(gen3_contest_rank(G3Cool), Some((0, 1)));
        assert_eq!(gen3_contest_rank(G3ToughMaster), Some((4, 4)));
        assert_eq!(gen3_contest_rank(Effort), None);
        assert_eq!(gen3_flag_bit(World), Some(26));
    }

    #[test]
    fn every_ribbon_is_enumerated_once() {
        let all: Vec<Ribbon> = Ribbon::all().collect();
        assert_eq!(all.len(), 53 + 8 + 20 + 20);
        for (idx, ribbon) in all.iter().enumerate() {
            assert!(!all[idx + 1..].contains(ribbon), "{ribbon:?} repeated");
        }
    }
}
