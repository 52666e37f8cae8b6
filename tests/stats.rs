mod common;

use common::{FakeTables, MEW, MEWTWO, PIKACHU};
use pkvault::{
    personal::{exp_for_level, ExpGrowth},
    Generation, Pkx, Pokemon, Stat,
};
use rand::{rngs::StdRng, SeedableRng};

const HARDY: u8 = 0;
const BRAVE: u8 = 2;
const ADAMANT: u8 = 3;
const TIMID: u8 = 10;
const MODEST: u8 = 15;

fn record(generation: Generation, species: u16, level: u8) -> Pokemon {
    let tables = FakeTables;
    let mut pkm = Pokemon::empty(generation, false);
    pkm.as_pkx_mut().set_species(species);
    pkm.as_pkx_mut().set_level(level, &tables);
    pkm
}

#[test]
fn test_max_trained_hp() {
    let tables = FakeTables;
    let mut pkm = record(Generation::Six, MEW, 100);
    let pkx = pkm.as_pkx_mut();
    pkx.set_iv(Stat::Hp, 31);
    pkx.set_ev(Stat::Hp, 252);
    assert_eq!(pkx.level(&tables), 100);
    assert_eq!(pkx.stat(Stat::Hp, &tables), 404);
}

#[test]
fn test_nature_scales_by_tenths() {
    let tables = FakeTables;
    let mut rng = StdRng::seed_from_u64(9);
    let expected = [
        (Stat::Atk, [(HARDY, 130), (ADAMANT, 143), (MODEST, 117)]),
        (Stat::SpA, [(HARDY, 174), (ADAMANT, 156), (MODEST, 191)]),
        (Stat::Spe, [(HARDY, 150), (TIMID, 165), (BRAVE, 135)]),
    ];
    for generation in [Generation::Three, Generation::Six, Generation::Seven] {
        let mut pkm = record(generation, MEWTWO, 50);
        let pkx = pkm.as_pkx_mut();
        for stat in Stat::ALL {
            pkx.set_iv(stat, 31);
        }
        assert_eq!(pkx.level(&tables), 50);
        for (stat, cases) in expected {
            for (nature, value) in cases {
                assert!(pkx.set_nature(nature, &tables, &mut rng));
                assert_eq!(pkx.stat(stat, &tables), value, "{generation} {stat:?} nature {nature}");
            }
        }
    }
}

#[test]
fn test_hyper_training_counts_as_perfect_iv() {
    let tables = FakeTables;
    let mut pkm = record(Generation::Seven, MEW, 100);
    let pkx = pkm.as_pkx_mut();
    pkx.set_iv(Stat::Hp, 0);
    pkx.set_ev(Stat::Hp, 252);
    assert_eq!(pkx.stat(Stat::Hp, &tables), 373);
    pkx.set_hyper_trained(Stat::Hp, true);
    assert_eq!(pkx.stat(Stat::Hp, &tables), 404);
}

#[test]
fn test_hidden_power_parity_extremes() {
    let mut pkm = record(Generation::Four, PIKACHU, 5);
    let pkx = pkm.as_pkx_mut();
    for stat in Stat::ALL {
        pkx.set_iv(stat, 31);
    }
    assert_eq!(pkx.hp_type(), 15);
    for stat in Stat::ALL {
        pkx.set_iv(stat, 30);
    }
    assert_eq!(pkx.hp_type(), 0);
    pkx.set_iv(Stat::SpD, 31);
    assert_eq!(pkx.hp_type(), 7);
}

#[test]
fn test_level_follows_experience_thresholds() {
    let tables = FakeTables;
    let mut pkm = record(Generation::Five, MEWTWO, 1);
    let pkx = pkm.as_pkx_mut();
    let threshold = exp_for_level(70, ExpGrowth::Slow);
    pkx.set_experience(threshold - 1);
    assert_eq!(pkx.level(&tables), 69);
    pkx.set_experience(threshold);
    assert_eq!(pkx.level(&tables), 70);
    pkx.set_level(100, &tables);
    assert_eq!(pkx.experience(), 1_250_000);
}

#[test]
fn test_unknown_species_has_no_base_stats() {
    let tables = FakeTables;
    let mut pkm = record(Generation::Six, 0, 1);
    pkm.as_pkx_mut().set_experience(0);
    assert_eq!(pkm.as_pkx().personal(&tables), None);
    assert_eq!(pkm.as_pkx().stat(Stat::Atk, &tables), 5);
}
