mod common;

use common::{init_logger, pikachu, rng, FakeTables, CHANSEY, PIKACHU, TACKLE, THUNDERBOLT};
use pkvault::{
    pokemon::{copy_ribbons, PK4_SIZE_BOX, PK4_SIZE_PARTY, PK6_SIZE_BOX},
    ribbon::Ribbon,
    save::{invalid_transfer_reason, BadTransferReason},
    Error, GameVersion, Gender, Generation, Pkx, Pokemon, Stat, TrainerId,
};
use rand::RngCore;

const ALL_FORMATS: [Generation; 9] = [
    Generation::One,
    Generation::Two,
    Generation::Three,
    Generation::Four,
    Generation::Five,
    Generation::Six,
    Generation::Seven,
    Generation::Lgpe,
    Generation::Eight,
];

#[test]
fn test_encrypted_bytes_decode_to_same_record() {
    init_logger();
    let id = TrainerId::new(12345, 54321);
    for generation in ALL_FORMATS {
        let original = pikachu(generation, id, 0x8d3a_11f0);
        let stored = original.as_pkx().encrypted();
        let decoded = Pokemon::from_bytes(generation, &stored).unwrap();
        assert_eq!(decoded, original, "{generation} record changed through storage");
        assert_eq!(decoded.as_pkx().species(), PIKACHU);
        assert!(decoded.as_pkx().checksum_valid());
    }
}

#[test]
fn test_plain_record_with_one_filled_name_slot_stays_plain() {
    let id = TrainerId::new(12345, 54321);
    for (generation, nickname_end) in [
        (Generation::Six, 0x58),
        (Generation::Seven, 0x58),
        (Generation::Lgpe, 0x58),
        (Generation::Eight, 0x70),
    ] {
        let original = pikachu(generation, id, 0x8d3a_11f0);
        let mut raw = original.as_pkx().data().to_vec();
        raw[nickname_end] = 0x41;
        let loaded = Pokemon::from_bytes(generation, &raw).unwrap();
        assert_eq!(loaded.as_pkx().data(), &raw[..], "{generation} record was decrypted");
        assert_eq!(loaded.as_pkx().species(), PIKACHU);
    }
}

#[test]
fn test_refreshing_checksum_twice_changes_nothing() {
    for generation in ALL_FORMATS {
        let mut pkm = pikachu(generation, TrainerId::new(1, 2), 0x1234_5678);
        pkm.as_pkx_mut().set_held_item(17);
        pkm.as_pkx_mut().refresh_checksum();
        let once = pkm.clone();
        pkm.as_pkx_mut().refresh_checksum();
        assert_eq!(pkm, once);
    }
}

#[test]
fn test_wrong_length_is_rejected() {
    let err = Pokemon::from_bytes(Generation::Four, &[0u8; 100]).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidLength {
            generation: Generation::Four,
            actual: 100
        }
    ));
    assert!(Pokemon::from_bytes(Generation::Six, &[0u8; PK6_SIZE_BOX + 1]).is_err());
    assert!(Pokemon::from_decrypted(Generation::Three, &[]).is_err());
}

#[test]
fn test_party_clone_computes_battle_stats() {
    let tables = FakeTables;
    let pkm = pikachu(Generation::Four, TrainerId::new(7, 7), 0x0000_0018);
    assert_eq!(pkm.as_pkx().data().len(), PK4_SIZE_BOX);

    let party = pkm.party_clone(&tables);
    let pkx = party.as_pkx();
    assert_eq!(pkx.data().len(), PK4_SIZE_PARTY);
    assert_eq!(pkx.party_level(), 30);
    for stat in Stat::ALL {
        assert_eq!(pkx.party_stat(stat), pkx.stat(stat, &tables));
    }
    assert_eq!(pkx.current_hp(), pkx.stat(Stat::Hp, &tables));

    let boxed = party.box_clone();
    assert_eq!(boxed.as_pkx().data(), pkm.as_pkx().data());
}

#[test]
fn test_fix_moves_closes_gaps() {
    let mut pkm = Pokemon::empty(Generation::Five, false);
    let pkx = pkm.as_pkx_mut();
    pkx.set_move_id(1, TACKLE);
    pkx.set_pp(1, 30);
    pkx.set_move_id(3, THUNDERBOLT);
    pkx.set_pp(3, 12);
    pkx.set_pp_ups(3, 2);
    pkx.fix_moves();
    assert_eq!(pkx.moves(), [TACKLE, THUNDERBOLT, 0, 0]);
    assert_eq!((pkx.pp(0), pkx.pp(1)), (30, 12));
    assert_eq!((pkx.pp_ups(0), pkx.pp_ups(1)), (0, 2));
    assert_eq!(pkx.pp(2), 0);
}

#[test]
fn test_heal_pp_applies_pp_ups() {
    let tables = FakeTables;
    for generation in [Generation::One, Generation::Four, Generation::Eight] {
        let mut pkm = pikachu(generation, TrainerId::new(1, 1), 0);
        let pkx = pkm.as_pkx_mut();
        pkx.set_pp_ups(0, 3);
        pkx.set_pp_ups(1, 3);
        pkx.heal_pp(&tables);
        assert_eq!(pkx.pp(0), 24, "{generation} thunderbolt");
        assert_eq!(pkx.pp(1), 56, "{generation} tackle");
        assert_eq!(pkx.pp(2), 0);
    }
}

#[test]
fn test_setters_keep_shininess() {
    init_logger();
    let tables = FakeTables;
    let mut rng = rng(0x5eed);
    for generation in ALL_FORMATS.into_iter().skip(1) {
        for trial in 0..1000 {
            let id = TrainerId::from_u32(rng.next_u32());
            let mut pkm = pikachu(generation, id, rng.next_u32());
            let pkx = pkm.as_pkx_mut();
            if trial % 2 == 0 {
                assert!(pkx.set_shiny(true, &tables, &mut rng));
            }
            let shiny = pkx.shiny();

            let gender = if rng.next_u32() & 1 == 0 {
                Gender::Male
            } else {
                Gender::Female
            };
            assert!(pkx.set_gender(gender, &tables, &mut rng), "{generation} gender");
            assert_eq!(pkx.gender(&tables), gender);
            assert_eq!(pkx.shiny(), shiny, "{generation} gender changed shininess");

            if generation != Generation::Two {
                let nature = (rng.next_u32() % 25) as u8;
                assert!(pkx.set_nature(nature, &tables, &mut rng), "{generation} nature");
                assert_eq!(pkx.nature(), nature);
                assert_eq!(pkx.shiny(), shiny, "{generation} nature changed shininess");

                let number = 1 + (rng.next_u32() & 1) as u8;
                assert!(pkx.set_ability_number(number, &tables, &mut rng));
                assert_eq!(pkx.ability_number(), number);
                assert_eq!(pkx.gender(&tables), gender);
                assert_eq!(pkx.shiny(), shiny, "{generation} ability changed shininess");
            }
        }
    }
}

#[test]
fn test_fixed_gender_species_refuse_other_gender() {
    let tables = FakeTables;
    let mut rng = rng(3);
    let mut pkm = pikachu(Generation::Three, TrainerId::new(1, 2), 0x42);
    pkm.as_pkx_mut().set_species(CHANSEY);
    assert_eq!(pkm.as_pkx().gender(&tables), Gender::Female);
    pkm.as_pkx_mut().set_gender(Gender::Male, &tables, &mut rng);
    assert_eq!(pkm.as_pkx().gender(&tables), Gender::Female);
}

#[test]
fn test_unreachable_gender_keeps_stored_gender_and_pid() {
    let tables = FakeTables;
    let mut rng = rng(5);
    for generation in [Generation::Four, Generation::Five] {
        let mut pkm = pikachu(generation, TrainerId::new(1, 2), 0x8d3a_11f0);
        let before = pkm.as_pkx().gender(&tables);
        let pkx = pkm.as_pkx_mut();
        assert!(!pkx.set_gender(Gender::Genderless, &tables, &mut rng));
        assert_eq!(pkx.gender(&tables), before);
        assert_eq!(pkx.pid(), 0x8d3a_11f0);
    }
}

#[test]
fn test_hidden_power_type_round_trips() {
    for generation in [Generation::Three, Generation::Six, Generation::Eight] {
        let mut pkm = pikachu(generation, TrainerId::default(), 1);
        for hp_type in 0..16 {
            pkm.as_pkx_mut().set_hp_type(hp_type);
            assert_eq!(pkm.as_pkx().hp_type(), hp_type, "{generation}");
        }
    }
}

#[test]
fn test_ribbons_copy_where_supported() {
    let mut src = Pokemon::empty(Generation::Six, false);
    src.as_pkx_mut().set_ribbon(Ribbon::ChampionKalos, true);
    src.as_pkx_mut().set_ribbon(Ribbon::Effort, true);

    let mut dest = Pokemon::empty(Generation::Four, false);
    copy_ribbons(src.as_pkx(), dest.as_pkx_mut());
    assert!(dest.as_pkx().has_ribbon(Ribbon::Effort));
    assert!(!dest.as_pkx().supports_ribbon(Ribbon::ChampionKalos));
    assert!(!dest.as_pkx().has_ribbon(Ribbon::ChampionKalos));

    let mut back = Pokemon::empty(Generation::Seven, false);
    copy_ribbons(src.as_pkx(), back.as_pkx_mut());
    assert!(back.as_pkx().has_ribbon(Ribbon::ChampionKalos));
}

#[cfg(feature = "serde")]
#[test]
fn test_trainer_info_serializes() {
    use pkvault::TrainerInfo;

    let info = TrainerInfo {
        player_name: "MAY".to_string(),
        player_gender: 1,
        id: TrainerId::new(100, 200),
        language: 2,
        ..TrainerInfo::default()
    };
    let json = serde_json::to_string(&info).unwrap();
    let back: TrainerInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(back, info);
}

#[test]
fn test_origin_game_decodes_version_byte() {
    let mut pk4 = pikachu(Generation::Four, TrainerId::new(1, 2), 3);
    pk4.as_pkx_mut().set_version(12);
    assert_eq!(pk4.as_pkx().origin_game(), Some(GameVersion::Platinum));
    pk4.as_pkx_mut().set_version(6);
    assert_eq!(pk4.as_pkx().origin_game(), None);
    let pk1 = pikachu(Generation::One, TrainerId::new(1, 0), 0);
    assert_eq!(pk1.as_pkx().origin_game(), None);
}

#[test]
fn test_transfer_limits_report_first_offending_field() {
    let tables = FakeTables;
    let mut pkm = pikachu(Generation::Six, TrainerId::new(1, 2), 3);
    let check = |pkm: &Pokemon, generation| invalid_transfer_reason(pkm.as_pkx(), generation, &tables);
    assert_eq!(check(&pkm, Generation::Three), BadTransferReason::Okay);

    pkm.as_pkx_mut().set_ball(25);
    assert_eq!(check(&pkm, Generation::Four), BadTransferReason::Ball);
    assert_eq!(check(&pkm, Generation::Five), BadTransferReason::Okay);

    pkm.as_pkx_mut().set_move_id(1, 500);
    assert_eq!(check(&pkm, Generation::Four), BadTransferReason::Move);

    pkm.as_pkx_mut().set_species(400);
    assert_eq!(check(&pkm, Generation::Three), BadTransferReason::Move);
    pkm.as_pkx_mut().set_move_id(1, 0);
    assert_eq!(check(&pkm, Generation::Three), BadTransferReason::Species);
}
