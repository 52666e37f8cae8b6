mod common;

use common::{init_logger, pikachu, rng, FakeTables, MEWTWO, PIKACHU};
use pkvault::{
    convert::{convert, Transfer},
    Date, Generation, Pkx, Pokemon, Stat, TrainerId, TrainerInfo,
};

fn destination() -> TrainerInfo {
    TrainerInfo {
        player_name: "SERENA".to_string(),
        player_gender: 1,
        id: TrainerId::new(4242, 2424),
        language: 2,
        country: 49,
        sub_region: 7,
        console_region: 1,
    }
}

fn run(pkm: &Pokemon, target: Generation, seed: u64) -> Option<Pokemon> {
    let tables = FakeTables;
    let mut rng = rng(seed);
    let mut transfer = Transfer::new(destination(), Date::new(24, 5, 17), &tables, &mut rng);
    convert(pkm, target, &mut transfer)
}

const ORIGINAL_ID: TrainerId = TrainerId {
    public_id: 12345,
    secret_id: 54321,
};

#[test]
fn test_same_generation_is_a_copy() {
    let pkm = pikachu(Generation::Four, ORIGINAL_ID, 0x8d3a_11f0);
    assert_eq!(run(&pkm, Generation::Four, 1), Some(pkm));
}

#[test]
fn test_unconnected_formats_give_up() {
    init_logger();
    let pb7 = pikachu(Generation::Lgpe, ORIGINAL_ID, 1);
    assert_eq!(run(&pb7, Generation::Eight, 1), None);
    let pk7 = pikachu(Generation::Seven, ORIGINAL_ID, 1);
    assert_eq!(run(&pk7, Generation::Lgpe, 1), None);
    let pk2 = pikachu(Generation::Two, ORIGINAL_ID, 1);
    assert_eq!(run(&pk2, Generation::Three, 1), None);
    let pk3 = pikachu(Generation::Three, ORIGINAL_ID, 1);
    assert_eq!(run(&pk3, Generation::One, 1), None);
}

#[test]
fn test_gen3_record_reaches_gen6() {
    init_logger();
    let tables = FakeTables;
    let pk3 = pikachu(Generation::Three, ORIGINAL_ID, 0x8d3a_11f0);
    let pk6 = run(&pk3, Generation::Six, 7).unwrap();
    let pkx = pk6.as_pkx();

    assert_eq!(pk6.generation(), Generation::Six);
    assert_eq!(pkx.species(), PIKACHU);
    assert_eq!(pkx.pid(), 0x8d3a_11f0);
    assert_eq!(pkx.encryption_constant(), 0x8d3a_11f0);
    assert_eq!(pkx.trainer_id(), ORIGINAL_ID);
    assert_eq!(pkx.level(&tables), 30);
    assert_eq!(pkx.nature(), pk3.as_pkx().nature());
    assert_eq!(pkx.gender(&tables), pk3.as_pkx().gender(&tables));
    for stat in Stat::ALL {
        assert_eq!(pkx.iv(stat), pk3.as_pkx().iv(stat));
    }
    assert_eq!(pkx.ot_name(), "ASH");
    assert_eq!(pkx.nickname(), "PIKACHU");
    assert_eq!(pkx.ht_name(), "SERENA");
    assert_eq!(pkx.current_handler(), 1);
    assert_eq!(pkx.country(), 49);
    assert_eq!(pkx.met_location(), 30001);
    assert_eq!(pkx.ability(&tables), 9);
}

#[test]
fn test_equal_seeds_convert_identically() {
    let pk3 = pikachu(Generation::Three, ORIGINAL_ID, 0x0bad_f00d);
    for target in [Generation::Five, Generation::Eight] {
        let first = run(&pk3, target, 99).unwrap();
        let second = run(&pk3, target, 99).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_species_missing_downstream_stops_the_chain() {
    let mut pk6 = pikachu(Generation::Six, ORIGINAL_ID, 5);
    pk6.as_pkx_mut().set_species(700);
    assert_eq!(run(&pk6, Generation::Five, 1), None);
    assert_eq!(run(&pk6, Generation::Three, 1), None);
    assert!(run(&pk6, Generation::Seven, 1).is_some());
}

#[test]
fn test_three_bit_shiny_window_is_cleared() {
    let id = TrainerId::new(0, 0);
    let pk5 = pikachu(Generation::Five, id, 0x0000_0008);
    assert!(!pk5.as_pkx().shiny());
    let pk6 = run(&pk5, Generation::Six, 3).unwrap();
    assert_eq!(pk6.as_pkx().pid(), 0x8000_0008);
    assert!(!pk6.as_pkx().shiny());

    let shiny5 = pikachu(Generation::Five, id, 0x0000_0003);
    assert!(shiny5.as_pkx().shiny());
    let shiny6 = run(&shiny5, Generation::Six, 3).unwrap();
    assert_eq!(shiny6.as_pkx().pid(), 0x0000_0003);
    assert!(shiny6.as_pkx().shiny());
}

#[test]
fn test_gen4_gen5_round_trip_keeps_pid_properties() {
    let tables = FakeTables;
    let pk4 = pikachu(Generation::Four, ORIGINAL_ID, 0x8d3a_11f0);
    let pk5 = run(&pk4, Generation::Five, 11).unwrap();
    assert_eq!(pk5.as_pkx().nature(), pk4.as_pkx().nature());
    let back = run(&pk5, Generation::Four, 12).unwrap();
    let pkx = back.as_pkx();
    assert_eq!(pkx.pid(), 0x8d3a_11f0);
    assert_eq!(pkx.nature(), pk4.as_pkx().nature());
    assert_eq!(pkx.gender(&tables), pk4.as_pkx().gender(&tables));
    assert_eq!(pkx.moves(), pk4.as_pkx().moves());
}

#[test]
fn test_gen1_dvs_carry_into_gen2() {
    let mut pk1 = pikachu(Generation::One, TrainerId::new(777, 0), 0);
    pk1.as_pkx_mut().set_species(MEWTWO);
    let pk2 = run(&pk1, Generation::Two, 1).unwrap();
    assert_eq!(pk2.as_pkx().species(), MEWTWO);
    assert_eq!(pk2.as_pkx().trainer_id().public_id, 777);
    for stat in Stat::ALL {
        assert_eq!(pk2.as_pkx().iv(stat), pk1.as_pkx().iv(stat));
    }
}

#[test]
fn test_every_hop_leaves_a_valid_checksum() {
    let mut pkm = pikachu(Generation::Three, ORIGINAL_ID, 0x8d3a_11f0);
    let path = [
        Generation::Four,
        Generation::Five,
        Generation::Six,
        Generation::Seven,
        Generation::Eight,
        Generation::Seven,
        Generation::Six,
        Generation::Five,
        Generation::Four,
        Generation::Three,
    ];
    for (seed, target) in path.into_iter().enumerate() {
        pkm = run(&pkm, target, seed as u64).unwrap();
        assert_eq!(pkm.generation(), target);
        assert!(pkm.as_pkx().checksum_valid(), "{target} record has a stale checksum");
    }

    let reloaded = Pokemon::from_bytes(Generation::Three, pkm.as_pkx().data()).unwrap();
    assert_eq!(reloaded, pkm);
    assert_eq!(reloaded.as_pkx().species(), PIKACHU);
}
