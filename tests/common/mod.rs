#![allow(dead_code)]

use pkvault::{
    personal::{PersonalInfo, ReferenceTables, GENDER_FEMALE_ONLY, GENDER_UNKNOWN},
    Generation, Language, Pkx, Pokemon, Stat, TrainerId,
};
use rand::{rngs::StdRng, SeedableRng};

pub const PIKACHU: u16 = 25;
pub const MEW: u16 = 151;
pub const MEWTWO: u16 = 150;
pub const CHANSEY: u16 = 113;
pub const PICHU: u16 = 172;
pub const UNOWN: u16 = 201;
pub const SHELLOS: u16 = 422;
pub const ROTOM: u16 = 479;

pub const TACKLE: u16 = 33;
pub const THUNDERBOLT: u16 = 85;

/// Small stand-in for the real species tables, same rows in every generation.
pub struct FakeTables;

fn info(base_stats: [u8; 6], gender_ratio: u8, exp_growth: u8, abilities: [u16; 3]) -> PersonalInfo {
    PersonalInfo {
        base_stats,
        gender_ratio,
        exp_growth,
        abilities,
        form_count: 1,
        base_friendship: 70,
        ..PersonalInfo::default()
    }
}

impl ReferenceTables for FakeTables {
    fn personal(&self, _generation: Generation, form_species: u16) -> Option<PersonalInfo> {
        Some(match form_species {
            PIKACHU => info([35, 55, 40, 90, 50, 50], 127, 0, [9, 9, 31]),
            MEWTWO => info([106, 110, 90, 130, 154, 90], GENDER_UNKNOWN, 5, [46, 46, 127]),
            MEW => info([100; 6], GENDER_UNKNOWN, 3, [28, 28, 28]),
            CHANSEY => info([250, 5, 5, 50, 35, 105], GENDER_FEMALE_ONLY, 4, [30, 32, 132]),
            PICHU => PersonalInfo {
                form_count: 2,
                ..info([20, 40, 15, 60, 35, 35], 127, 0, [9, 9, 31])
            },
            UNOWN => PersonalInfo {
                form_count: 28,
                ..info([48, 72, 48, 48, 72, 48], GENDER_UNKNOWN, 0, [26, 26, 26])
            },
            SHELLOS => PersonalInfo {
                form_count: 2,
                ..info([76, 48, 48, 34, 57, 62], 127, 0, [60, 114, 159])
            },
            ROTOM => PersonalInfo {
                form_count: 6,
                ..info([50, 50, 77, 91, 95, 77], GENDER_UNKNOWN, 0, [26, 26, 26])
            },
            _ => return None,
        })
    }

    fn base_pp(&self, _generation: Generation, move_id: u16) -> u8 {
        match move_id {
            TACKLE => 35,
            THUNDERBOLT => 15,
            _ => 0,
        }
    }

    fn species_name(&self, _language: Language, species: u16) -> Option<String> {
        match species {
            PIKACHU => Some("PIKACHU".to_string()),
            MEWTWO => Some("MEWTWO".to_string()),
            _ => None,
        }
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Box record of `generation` holding a level 30 Pikachu with a Thunderbolt.
pub fn pikachu(generation: Generation, id: TrainerId, pid: u32) -> Pokemon {
    let tables = FakeTables;
    let mut pkm = Pokemon::empty(generation, false);
    let pkx = pkm.as_pkx_mut();
    pkx.set_species(PIKACHU);
    pkx.set_trainer_id(id);
    pkx.set_pid(pid);
    pkx.set_encryption_constant(pid.rotate_left(7));
    pkx.set_level(30, &tables);
    pkx.set_move_id(0, THUNDERBOLT);
    pkx.set_move_id(1, TACKLE);
    pkx.heal_pp(&tables);
    for stat in Stat::ALL {
        pkx.set_iv(stat, 10 + stat.index() as u8);
    }
    pkx.set_language(2);
    pkx.set_ot_name("ASH");
    pkx.set_nickname("PIKACHU");
    pkx.refresh_checksum();
    pkm
}
