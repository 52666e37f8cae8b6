mod common;

use std::io::Write;

use common::{init_logger, pikachu, FakeTables, PIKACHU};
use pkvault::{
    save::{GameCode, Sav3},
    Error, Generation, Pkx, Stat, TrainerId,
};
use tempfile::NamedTempFile;

const IMAGE_LEN: usize = 131072;
const SLOT_B: usize = 0xe000;
const SECTION_SIZE: usize = 0x1000;

/// Blank flash image. Slot B is newer and its sections are rotated so that the
/// physical first section holds section id `first_id`.
fn blank_image(first_id: usize, game_code: u32) -> Vec<u8> {
    let mut image = vec![0u8; IMAGE_LEN];
    for (slot, counter) in [(0usize, 5u32), (SLOT_B, 6)] {
        for physical in 0..14 {
            let section = slot + physical * SECTION_SIZE;
            let id = if slot == SLOT_B { (physical + first_id) % 14 } else { physical };
            image[section + 0x0ff4..section + 0x0ff6].copy_from_slice(&(id as u16).to_le_bytes());
            image[section + 0x0ffc..section + 0x1000].copy_from_slice(&counter.to_le_bytes());
            if id == 0 {
                image[section + 0xac..section + 0xb0].copy_from_slice(&game_code.to_le_bytes());
            }
        }
    }
    image
}

fn open(first_id: usize) -> Sav3 {
    let mut save = Sav3::new(blank_image(first_id, 1)).unwrap();
    save.recompute_checksums();
    save
}

#[test]
fn test_short_image_is_rejected() {
    let err = Sav3::new(vec![0u8; 1000]).unwrap_err();
    assert!(matches!(
        err,
        Error::SaveLength {
            expected: IMAGE_LEN,
            actual: 1000
        }
    ));
}

#[test]
fn test_newer_slot_and_rotation_are_followed() {
    init_logger();
    let mut save = open(3);
    assert_eq!(save.game_code(), GameCode::FireRedLeafGreen);
    let id = TrainerId::new(31337, 4242);
    save.set_trainer_id(id);

    // Section 0 of slot B sits at physical position 11.
    let section0 = SLOT_B + 11 * SECTION_SIZE;
    assert_eq!(save.data()[section0 + 0x0a..section0 + 0x0e], id.to_u32().to_le_bytes());
    assert!(save.data()[0x0a..0x0e].iter().all(|byte| *byte == 0));
    assert_eq!(save.trainer_info().id, id);
}

#[test]
fn test_edits_survive_a_trip_through_a_file() {
    let mut save = open(0);
    save.set_player_name("MAY");
    save.set_trainer_id(TrainerId::new(1, 2));

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&save.into_bytes()).unwrap();
    file.flush().unwrap();

    let reopened = Sav3::new(std::fs::read(file.path()).unwrap()).unwrap();
    reopened.verify_sections().unwrap();
    let info = reopened.trainer_info();
    assert_eq!(info.player_name, "MAY");
    assert_eq!(info.id, TrainerId::new(1, 2));
}

#[test]
fn test_slot_straddling_two_sections() {
    let tables = FakeTables;
    let mut save = open(5);
    let pkm = pikachu(Generation::Three, TrainerId::new(100, 200), 0x1234_5678);

    assert!(save.put_box_pokemon(1, 19, &pkm, false, &tables).unwrap());
    let stored = save.box_pokemon(1, 19).unwrap().unwrap();
    assert_eq!(stored, pkm);
    assert_eq!(save.get_box(1).unwrap().len(), 1);
    assert!(save.box_pokemon(1, 18).unwrap().is_none());
    assert!(save.dex_owned(PIKACHU));
    assert!(save.dex_seen(PIKACHU));
}

#[test]
fn test_occupied_slot_needs_force() {
    let tables = FakeTables;
    let mut save = open(0);
    let first = pikachu(Generation::Three, TrainerId::new(1, 1), 0x11);
    let second = pikachu(Generation::Three, TrainerId::new(2, 2), 0x22);

    assert!(save.put_box_pokemon(0, 0, &first, false, &tables).unwrap());
    assert!(!save.put_box_pokemon(0, 0, &second, false, &tables).unwrap());
    assert_eq!(save.box_pokemon(0, 0).unwrap().unwrap(), first);
    assert!(save.put_box_pokemon(0, 0, &second, true, &tables).unwrap());
    assert_eq!(save.box_pokemon(0, 0).unwrap().unwrap(), second);

    let pk4 = pikachu(Generation::Four, TrainerId::new(1, 1), 0x11);
    assert!(!save.put_box_pokemon(0, 1, &pk4, false, &tables).unwrap());
    assert!(save.put_box_pokemon(14, 0, &first, false, &tables).is_err());
}

#[test]
fn test_taking_a_record_clears_and_resigns() {
    let tables = FakeTables;
    let mut save = open(9);
    let pkm = pikachu(Generation::Three, TrainerId::new(5, 6), 0xabcd);
    save.put_box_pokemon(13, 29, &pkm, false, &tables).unwrap();

    let taken = save.take_box_pokemon(13, 29).unwrap();
    assert_eq!(taken, Some(pkm));
    assert!(save.box_pokemon(13, 29).unwrap().is_none());
    save.verify_sections().unwrap();
}

#[test]
fn test_checksum_mismatch_names_the_section() {
    let mut save = open(0);
    save.set_player_name("RED");
    match save.verify_sections() {
        Err(Error::Checksum { section, .. }) => assert_eq!(section, 0),
        other => panic!("expected a checksum error, got {other:?}"),
    }
    save.recompute_checksums();
    save.verify_sections().unwrap();
}

#[test]
fn test_party_slot_grows_team() {
    let tables = FakeTables;
    let mut save = open(2);
    assert_eq!(save.team_size(), 0);
    let pkm = pikachu(Generation::Three, TrainerId::new(8, 9), 0x77);
    assert!(save.set_party_pokemon(0, &pkm, &tables).unwrap());
    assert_eq!(save.team_size(), 1);

    let party = save.party().unwrap();
    let member = party[0].as_pkx();
    assert_eq!(member.species(), PIKACHU);
    assert_eq!(member.party_level(), 30);
    assert_eq!(member.party_stat(Stat::Spe), member.stat(Stat::Spe, &tables));
    assert!(save.set_party_pokemon(6, &pkm, &tables).is_err());
}
