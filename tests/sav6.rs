mod common;

use common::{pikachu, FakeTables, MEWTWO, PIKACHU};
use pkvault::{
    save::{Item, Pouch, SavOras},
    Error, Generation, Pkx, Pokemon, TrainerId,
};

const SAVE_LENGTH: usize = 0x76000;
const DEX_LANGUAGES: usize = 0x15400;

fn open() -> SavOras {
    SavOras::new(vec![0u8; SAVE_LENGTH]).unwrap()
}

fn pk6(species: u16, shiny: bool) -> Pokemon {
    // Public and secret id both zero: a PID below 8 is shiny.
    let pid = if shiny { 0x0000_0001 } else { 0x1234_5678 };
    let mut pkm = pikachu(Generation::Six, TrainerId::new(0, 0), pid);
    pkm.as_pkx_mut().set_species(species);
    pkm.as_pkx_mut().refresh_checksum();
    pkm
}

#[test]
fn test_short_image_is_rejected() {
    assert!(matches!(
        SavOras::new(vec![0u8; 0x1000]),
        Err(Error::SaveLength { expected: SAVE_LENGTH, actual: 0x1000 })
    ));
}

#[test]
fn test_block_crcs_follow_edits() {
    let mut save = open();
    save.finish_editing();
    assert!(save.checksums_valid());
    save.set_ot_name("SERENA");
    assert!(!save.checksums_valid());
    let reopened = SavOras::new(save.into_bytes()).unwrap();
    assert!(reopened.checksums_valid());
    assert_eq!(reopened.ot_name(), "SERENA");
}

#[test]
fn test_trainer_info_collects_card_fields() {
    let mut save = open();
    save.set_ot_name("SERENA");
    save.set_trainer_id(TrainerId::new(4242, 2424));
    save.set_gender(1);
    save.set_country(49);
    save.set_sub_region(7);
    save.set_console_region(1);
    save.set_language(2);
    let info = save.trainer_info();
    assert_eq!(info.player_name, "SERENA");
    assert_eq!(info.player_gender, 1);
    assert_eq!(info.id, TrainerId::new(4242, 2424));
    assert_eq!((info.country, info.sub_region, info.console_region), (49, 7, 1));
    assert_eq!(info.language, 2);
}

#[test]
fn test_box_and_party_slots() {
    let tables = FakeTables;
    let mut save = open();
    let pkm = pk6(PIKACHU, false);
    assert!(save.set_pokemon(30, 29, &pkm).unwrap());
    assert_eq!(save.pokemon(30, 29).unwrap(), pkm);
    assert!(matches!(
        save.pokemon(31, 0),
        Err(Error::Range { index: 31, max: 31, .. })
    ));

    assert!(save.set_party_pokemon(2, &pkm, &tables).unwrap());
    save.set_party_count(3);
    assert_eq!(save.party_count(), 3);
    let member = save.party_pokemon(2).unwrap();
    assert_eq!(member.as_pkx().party_level(), 30);
    assert!(save.party_pokemon(6).is_err());

    let pk5 = pikachu(Generation::Five, TrainerId::new(0, 0), 1);
    assert!(!save.set_pokemon(0, 0, &pk5).unwrap());
    assert!(!save.set_party_pokemon(0, &pk5, &tables).unwrap());
}

#[test]
fn test_pouches() {
    let mut save = open();
    let tm = Item { id: 328, count: 1 };
    assert!(save.set_item(Pouch::Tm, 107, tm).unwrap());
    assert_eq!(save.item(Pouch::Tm, 107).unwrap(), Some(tm));
    assert!(save.set_item(Pouch::Tm, 108, tm).is_err());
    assert!(!save.set_item(Pouch::Mail, 0, tm).unwrap());
    assert_eq!(save.item(Pouch::Mail, 0).unwrap(), None);
}

#[test]
fn test_first_variant_seen_is_displayed() {
    let tables = FakeTables;
    let mut save = open();
    let plain = pk6(PIKACHU, false);
    let gender = plain.as_pkx().gender(&tables) as u8;
    save.dex(plain.as_pkx(), &tables);
    save.dex(pk6(PIKACHU, true).as_pkx(), &tables);

    assert!(save.is_caught(PIKACHU));
    assert!(save.is_seen(PIKACHU));
    assert!(save.is_displayed(PIKACHU, gender, false));
    assert!(!save.is_displayed(PIKACHU, gender, true));
    assert_eq!(save.dex_seen(), 1);
    assert_eq!(save.dex_caught(), 1);
}

#[test]
fn test_dex_language_bit_and_eggs() {
    let tables = FakeTables;
    let mut save = open();
    let mewtwo = pk6(MEWTWO, false);
    save.dex(mewtwo.as_pkx(), &tables);

    // English is the second of seven slots.
    let bit = (MEWTWO as usize - 1) * 7 + 1;
    assert_ne!(save.data()[DEX_LANGUAGES + bit / 8] & (1 << (bit % 8)), 0);

    let mut egg = pk6(PIKACHU, false);
    egg.as_pkx_mut().set_egg(true);
    save.dex(egg.as_pkx(), &tables);
    assert!(!save.is_seen(PIKACHU));
}
