mod common;

use common::{init_logger, pikachu, rng, FakeTables, CHANSEY, MEWTWO, PICHU, PIKACHU, ROTOM, SHELLOS, UNOWN};
use pkvault::{
    save::{Game4, Item, Pouch, Sav4, TimePlayed},
    Date, Error, Gender, Generation, Pkx, Pokemon, TrainerId,
};

const IMAGE_LEN: usize = 0x80000;
const HALF: usize = 0x40000;
const DEX_FORMS: usize = 0x108;
const LATE_FORMS: usize = 0x1f4;
const BURMY: u16 = 412;

/// Zeroed image with the form slots of a fresh dex left empty.
fn blank_image(game: Game4) -> Vec<u8> {
    let layout = game.layout();
    let mut image = vec![0u8; IMAGE_LEN];
    for half in [0, HALF] {
        let forms = half + layout.pokedex + DEX_FORMS;
        image[forms..forms + 0x20].fill(0xff);
        let late = forms + layout.language_flags + LATE_FORMS;
        image[late..late + 8].fill(0xff);
    }
    image
}

fn open(game: Game4) -> Sav4 {
    Sav4::new(blank_image(game), game).unwrap()
}

fn pk4(species: u16, gender: Gender) -> Pokemon {
    let tables = FakeTables;
    let mut pkm = pikachu(Generation::Four, TrainerId::new(100, 200), 0x1000_0000);
    pkm.as_pkx_mut().set_species(species);
    pkm.as_pkx_mut()
        .set_gender(gender, &tables, &mut rng(species as u64));
    pkm.as_pkx_mut().refresh_checksum();
    pkm
}

#[test]
fn test_short_image_is_rejected() {
    assert!(matches!(
        Sav4::new(vec![0u8; 0x1000], Game4::Platinum),
        Err(Error::SaveLength { expected: IMAGE_LEN, .. })
    ));
}

#[test]
fn test_newer_half_is_active() {
    init_logger();
    let layout = Game4::HeartGoldSoulSilver.layout();
    let mut image = blank_image(Game4::HeartGoldSoulSilver);
    let general = layout.general_footer;
    image[general..general + 4].copy_from_slice(&1u32.to_le_bytes());
    image[HALF + general..HALF + general + 4].copy_from_slice(&2u32.to_le_bytes());
    // Equal major counters fall back to the minor counters.
    let storage = layout.storage_footer;
    image[storage + 4..storage + 8].copy_from_slice(&3u32.to_le_bytes());
    image[HALF + storage + 4..HALF + storage + 8].copy_from_slice(&9u32.to_le_bytes());

    let save = Sav4::new(image, Game4::HeartGoldSoulSilver).unwrap();
    assert_eq!(save.general_offset(), HALF);
    assert_eq!(save.storage_offset(), HALF);

    let tie = open(Game4::DiamondPearl);
    assert_eq!((tie.general_offset(), tie.storage_offset()), (0, 0));
}

#[test]
fn test_trainer_block_fields() {
    let mut save = open(Game4::Platinum);
    save.set_ot_name("LUCAS");
    save.set_trainer_id(TrainerId::new(100, 200));
    save.set_money(123_456);
    save.set_coins(500);
    save.set_gender(0);
    save.set_language(2);
    let time = TimePlayed {
        hours: 99,
        minutes: 59,
        seconds: 1,
        frames: 0,
    };
    save.set_time_played(time);

    assert_eq!(save.ot_name(), "LUCAS");
    assert_eq!(save.money(), 123_456);
    assert_eq!(save.coins(), 500);
    assert_eq!(save.time_played(), time);
    assert_eq!(save.badges(), 0);
    let info = save.trainer_info();
    assert_eq!(info.player_name, "LUCAS");
    assert_eq!(info.id, TrainerId::new(100, 200));
    assert_eq!(info.language, 2);
}

#[test]
fn test_crc_tracks_edits() {
    for game in [Game4::DiamondPearl, Game4::Platinum, Game4::HeartGoldSoulSilver] {
        let mut save = open(game);
        save.finish_editing();
        assert!(save.checksums_valid(), "{game:?}");
        save.set_money(1);
        assert!(!save.checksums_valid(), "{game:?}");
        let image = save.into_bytes();
        assert!(Sav4::new(image, game).unwrap().checksums_valid());
    }
}

#[test]
fn test_box_records_round_trip() {
    for game in [Game4::DiamondPearl, Game4::HeartGoldSoulSilver] {
        let mut save = open(game);
        let pkm = pk4(PIKACHU, Gender::Female);
        assert!(save.set_pokemon(17, 29, &pkm, None).unwrap());
        assert_eq!(save.pokemon(17, 29).unwrap(), pkm);
        assert_eq!(save.pokemon(0, 0).unwrap().as_pkx().species(), 0);
        assert!(matches!(
            save.pokemon(18, 0),
            Err(Error::Range { index: 18, max: 18, .. })
        ));
        assert!(save.set_pokemon(0, 30, &pkm, None).is_err());
    }
}

#[test]
fn test_other_generations_are_refused() {
    let tables = FakeTables;
    let mut save = open(Game4::Platinum);
    let pk3 = pikachu(Generation::Three, TrainerId::new(1, 2), 3);
    assert!(!save.set_pokemon(0, 0, &pk3, None).unwrap());
    assert!(!save.set_party_pokemon(0, &pk3, &tables).unwrap());
}

#[test]
fn test_box_crypt_toggles_every_slot() {
    let mut save = open(Game4::Platinum);
    let pkm = pk4(PIKACHU, Gender::Male);
    save.set_pokemon(3, 4, &pkm, None).unwrap();
    save.crypt_box_data(false);
    let before = save.data().to_vec();
    assert_eq!(save.pokemon(3, 4).unwrap(), pkm);
    save.crypt_box_data(true);
    assert_ne!(save.data(), &before[..]);
    assert_eq!(save.pokemon(3, 4).unwrap(), pkm);
}

#[test]
fn test_foreign_egg_is_met_far_away() {
    let mut save = open(Game4::DiamondPearl);
    save.set_ot_name("LUCAS");
    save.set_trainer_id(TrainerId::new(100, 200));
    let date = Date::new(24, 2, 29);

    let mut egg = pk4(PIKACHU, Gender::Male);
    egg.as_pkx_mut().set_egg(true);
    save.set_pokemon(0, 0, &egg, Some(date)).unwrap();
    let traded = save.pokemon(0, 0).unwrap();
    assert_eq!(traded.as_pkx().met_location(), 2002);
    assert_eq!(traded.as_pkx().met_date(), date);

    egg.as_pkx_mut().set_ot_name("LUCAS");
    save.set_pokemon(0, 1, &egg, Some(date)).unwrap();
    assert_eq!(save.pokemon(0, 1).unwrap().as_pkx().met_location(), 0);

    let adult = pk4(PIKACHU, Gender::Male);
    save.set_pokemon(0, 2, &adult, Some(date)).unwrap();
    assert_eq!(save.pokemon(0, 2).unwrap().as_pkx().met_location(), 0);
}

#[test]
fn test_party_slots() {
    let tables = FakeTables;
    let mut save = open(Game4::HeartGoldSoulSilver);
    let pkm = pk4(PIKACHU, Gender::Female);
    assert!(save.set_party_pokemon(5, &pkm, &tables).unwrap());
    save.set_party_count(9);
    assert_eq!(save.party_count(), 6);
    let member = save.party_pokemon(5).unwrap();
    assert_eq!(member.as_pkx().species(), PIKACHU);
    assert_eq!(member.as_pkx().party_level(), 30);
    assert!(save.party_pokemon(6).is_err());
}

#[test]
fn test_box_names_wallpapers_and_current_box() {
    for game in [Game4::DiamondPearl, Game4::Platinum, Game4::HeartGoldSoulSilver] {
        let mut save = open(game);
        save.set_box_name(17, "FAVES").unwrap();
        assert_eq!(save.box_name(17).unwrap(), "FAVES");
        assert!(save.box_name(18).is_err());

        save.set_box_wallpaper(2, 3).unwrap();
        save.set_box_wallpaper(3, 0x12).unwrap();
        assert_eq!(save.box_wallpaper(2).unwrap(), 3);
        assert_eq!(save.box_wallpaper(3).unwrap(), 0x12);

        save.set_current_box(11).unwrap();
        assert_eq!(save.current_box(), 11);
        assert!(save.set_current_box(18).is_err());
        assert_eq!(save.box_name(17).unwrap(), "FAVES", "{game:?}");
    }
}

#[test]
fn test_pouch_capacity_differs_per_game() {
    let potion = Item { id: 17, count: 5 };
    let mut hgss = open(Game4::HeartGoldSoulSilver);
    assert!(hgss.set_item(Pouch::Ball, 23, potion).unwrap());
    assert_eq!(hgss.item(Pouch::Ball, 23).unwrap(), Some(potion));

    let mut dp = open(Game4::DiamondPearl);
    assert!(dp.set_item(Pouch::Ball, 23, potion).is_err());
    assert!(dp.set_item(Pouch::Mail, 0, potion).unwrap());
    assert_eq!(dp.pouches().len(), 8);
}

#[test]
fn test_first_seen_gender_shows_first() {
    let tables = FakeTables;
    let mut save = open(Game4::DiamondPearl);
    save.dex(pk4(PIKACHU, Gender::Female).as_pkx(), &tables);
    assert!(save.is_caught(PIKACHU));
    assert!(save.is_seen(PIKACHU));
    assert_eq!(save.gender_toggles(PIKACHU), (true, false));
    save.dex(pk4(PIKACHU, Gender::Male).as_pkx(), &tables);
    assert_eq!(save.gender_toggles(PIKACHU), (true, false));

    let mut other = open(Game4::DiamondPearl);
    other.dex(pk4(PIKACHU, Gender::Male).as_pkx(), &tables);
    assert_eq!(other.gender_toggles(PIKACHU), (false, true));
    other.dex(pk4(PIKACHU, Gender::Female).as_pkx(), &tables);
    assert_eq!(other.gender_toggles(PIKACHU), (false, true));
}

#[test]
fn test_fixed_gender_species_toggles() {
    let tables = FakeTables;
    let mut save = open(Game4::Platinum);
    save.dex(pk4(MEWTWO, Gender::Genderless).as_pkx(), &tables);
    save.dex(pk4(CHANSEY, Gender::Female).as_pkx(), &tables);
    assert_eq!(save.gender_toggles(MEWTWO), (false, false));
    assert_eq!(save.gender_toggles(CHANSEY), (true, true));
    assert_eq!(save.dex_seen(), 2);
    assert_eq!(save.dex_caught(), 2);
}

#[test]
fn test_eggs_stay_out_of_the_dex() {
    let tables = FakeTables;
    let mut save = open(Game4::Platinum);
    let mut egg = pk4(PIKACHU, Gender::Male);
    egg.as_pkx_mut().set_egg(true);
    save.dex(egg.as_pkx(), &tables);
    assert!(!save.is_seen(PIKACHU));
    assert_eq!(save.dex_seen(), 0);
}

#[test]
fn test_forms_are_appended_in_order_seen() {
    let tables = FakeTables;
    let mut save = open(Game4::DiamondPearl);
    let mut burmy = pk4(BURMY, Gender::Female);
    for form in [2, 0, 2] {
        burmy.as_pkx_mut().set_form(form);
        save.dex(burmy.as_pkx(), &tables);
    }
    assert_eq!(save.dex_forms(BURMY), vec![2, 0, 0xff]);

    let mut shellos = pk4(SHELLOS, Gender::Male);
    for form in [0, 1] {
        shellos.as_pkx_mut().set_form(form);
        save.dex(shellos.as_pkx(), &tables);
    }
    assert_eq!(save.dex_forms(SHELLOS), vec![0, 1]);

    let mut unown = pk4(UNOWN, Gender::Genderless);
    for form in [5, 2, 5] {
        unown.as_pkx_mut().set_form(form);
        save.dex(unown.as_pkx(), &tables);
    }
    assert_eq!(&save.dex_forms(UNOWN)[..3], &[5, 2, 0xff]);
    assert!(save.dex_forms(ROTOM).is_empty());
}

#[test]
fn test_late_form_tables() {
    let tables = FakeTables;
    let mut pt = open(Game4::Platinum);
    let mut rotom = pk4(ROTOM, Gender::Genderless);
    rotom.as_pkx_mut().set_form(3);
    pt.dex(rotom.as_pkx(), &tables);
    assert_eq!(pt.dex_forms(ROTOM), vec![3, 0xff, 0xff, 0xff, 0xff, 0xff]);

    let mut hgss = open(Game4::HeartGoldSoulSilver);
    hgss.dex(pk4(PICHU, Gender::Female).as_pkx(), &tables);
    assert_eq!(hgss.dex_forms(PICHU), vec![1, 0xff, 0xff]);
    let mut spiky = pk4(PICHU, Gender::Female);
    spiky.as_pkx_mut().set_form(1);
    hgss.dex(spiky.as_pkx(), &tables);
    assert_eq!(hgss.dex_forms(PICHU), vec![1, 2, 0xff]);
    assert!(pt.dex_forms(PICHU).is_empty());
}

#[test]
fn test_language_flags() {
    let tables = FakeTables;
    let mut dp = open(Game4::DiamondPearl);
    let mut pikachu = pk4(PIKACHU, Gender::Male);
    dp.dex(pikachu.as_pkx(), &tables);
    pikachu.as_pkx_mut().set_language(5);
    dp.dex(pikachu.as_pkx(), &tables);
    assert_eq!(dp.dex_languages(PIKACHU), Some(0b1010));
    dp.dex(pk4(MEWTWO, Gender::Genderless).as_pkx(), &tables);
    assert_eq!(dp.dex_languages(MEWTWO), None);

    let mut pt = open(Game4::Platinum);
    let mut mewtwo = pk4(MEWTWO, Gender::Genderless);
    mewtwo.as_pkx_mut().set_language(4);
    pt.dex(mewtwo.as_pkx(), &tables);
    assert_eq!(pt.dex_languages(MEWTWO), Some(0b1_0000));
}
