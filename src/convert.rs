//! Cross-generation conversion.
//!
//! A conversion walks the chain one generation at a time; every hop builds a fresh record
//! in the adjacent format. Hops that cannot represent the record give up, and so does the
//! whole chain.

use log::debug;
use num_traits::FromPrimitive;
use rand::RngCore;

use crate::{
    codec::set_flag,
    personal::ReferenceTables,
    pid,
    pokemon::{copy_ribbons, Pk1, Pk2, Pk3, Pk4, Pk5, Pk6, Pk7, Pk8},
    ribbon::{self, Ribbon},
    Ball, Date, Generation, Language, Pkx, Pokemon, Stat, TrainerInfo,
};

const LOCATION_PAL_PARK: u16 = 0x37;
const LOCATION_POKE_TRANSFER: u16 = 30001;
const SPECIES_ARCEUS: u16 = 493;
const BALL_POKE: u8 = Ball::Poke as u8;
const BALL_DREAM: u8 = Ball::Dream as u8;
const TRANSFER_FRIENDSHIP: u8 = 70;
const MEMORY_TRADED: u8 = 4;

/// Destination context for a conversion: who receives the record, when, and with which
/// reference data and randomness.
pub struct Transfer<'a> {
    pub trainer: TrainerInfo,
    pub date: Date,
    pub tables: &'a dyn ReferenceTables,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> Transfer<'a> {
    pub fn new(
        trainer: TrainerInfo,
        date: Date,
        tables: &'a dyn ReferenceTables,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Transfer {
            trainer,
            date,
            tables,
            rng,
        }
    }

    fn feeling(&mut self) -> u8 {
        (self.rng.next_u32() % 10) as u8
    }

    fn fits(&self, generation: Generation, species: u16) -> bool {
        species <= self.tables.limits(generation).max_species
    }
}

/// Converts `pkm` to the `target` format, hopping through every generation in between.
///
/// Returns `None` if any hop cannot represent the record, or if either end has no place
/// on the chain.
pub fn convert(pkm: &Pokemon, target: Generation, transfer: &mut Transfer) -> Option<Pokemon> {
    let source = pkm.generation();
    if source == target {
        return Some(pkm.clone());
    }
    let (mut idx, end) = match (source.chain_index(), target.chain_index()) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            debug!("No conversion path between {source} and {target}");
            return None;
        }
    };
    if idx.min(end) <= 2 && idx.max(end) >= 3 {
        debug!("No conversion path across the gen 2/gen 3 boundary ({source} to {target})");
        return None;
    }
    let mut current = pkm.clone();
    while idx != end {
        idx = if end > idx { idx + 1 } else { idx - 1 };
        let next = Generation::from_chain_index(idx)?;
        current = match hop(&current, next, transfer) {
            Some(converted) => converted,
            None => {
                debug!("Conversion of {source} record stopped at {} -> {next}", current.generation());
                return None;
            }
        };
    }
    Some(current)
}

fn hop(pkm: &Pokemon, target: Generation, t: &mut Transfer) -> Option<Pokemon> {
    debug!("Converting {} record to {target}", pkm.generation());
    let mut converted = match (pkm, target) {
        (Pokemon::Pk1(pk1), Generation::Two) => pk1_to_pk2(pk1, t).map(Pokemon::from),
        (Pokemon::Pk2(pk2), Generation::One) => pk2_to_pk1(pk2, t).map(Pokemon::from),
        (Pokemon::Pk3(pk3), Generation::Four) => pk3_to_pk4(pk3, t).map(Pokemon::from),
        (Pokemon::Pk4(pk4), Generation::Three) => pk4_to_pk3(pk4, t).map(Pokemon::from),
        (Pokemon::Pk4(pk4), Generation::Five) => pk4_to_pk5(pk4, t).map(Pokemon::from),
        (Pokemon::Pk5(pk5), Generation::Four) => pk5_to_pk4(pk5, t).map(Pokemon::from),
        (Pokemon::Pk5(pk5), Generation::Six) => pk5_to_pk6(pk5, t).map(Pokemon::from),
        (Pokemon::Pk6(pk6), Generation::Five) => pk6_to_pk5(pk6, t).map(Pokemon::from),
        (Pokemon::Pk6(pk6), Generation::Seven) => pk6_to_pk7(pk6, t).map(Pokemon::from),
        (Pokemon::Pk7(pk7), Generation::Six) => pk7_to_pk6(pk7, t).map(Pokemon::from),
        (Pokemon::Pk7(pk7), Generation::Eight) => pk7_to_pk8(pk7, t).map(Pokemon::from),
        (Pokemon::Pk8(pk8), Generation::Seven) => pk8_to_pk7(pk8, t).map(Pokemon::from),
        _ => None,
    }?;
    converted.as_pkx_mut().refresh_checksum();
    Some(converted)
}

fn copy_training(src: &dyn Pkx, dest: &mut dyn Pkx, ev_cap: u16) {
    for stat in Stat::ALL {
        dest.set_iv(stat, src.iv(stat));
        dest.set_ev(stat, src.ev(stat).min(ev_cap));
    }
    for idx in 0..6 {
        dest.set_contest(idx, src.contest(idx));
    }
}

/// Copies moves with their PP, dropping any the destination games do not know.
fn copy_moves(src: &dyn Pkx, dest: &mut dyn Pkx, tables: &dyn ReferenceTables) {
    let max_move = tables.limits(dest.generation()).max_move;
    for slot in 0..4 {
        let move_id = src.move_id(slot);
        if move_id <= max_move {
            dest.set_move_id(slot, move_id);
            dest.set_pp(slot, src.pp(slot));
            dest.set_pp_ups(slot, src.pp_ups(slot));
        } else {
            dest.set_move_id(slot, 0);
            dest.set_pp(slot, 0);
            dest.set_pp_ups(slot, 0);
        }
        let relearn = src.relearn_move(slot);
        dest.set_relearn_move(slot, if relearn <= max_move { relearn } else { 0 });
    }
    dest.fix_moves();
}

fn copy_flags(src: &dyn Pkx, dest: &mut dyn Pkx) {
    dest.set_egg(src.is_egg());
    dest.set_nicknamed(src.nicknamed());
    dest.set_fateful_encounter(src.fateful_encounter());
}

fn copy_origin(src: &dyn Pkx, dest: &mut dyn Pkx) {
    dest.set_version(src.version());
    dest.set_language(src.language());
    dest.set_ot_name(&src.ot_name());
    dest.set_ot_gender(src.ot_gender());
    dest.set_met_date(src.met_date());
    dest.set_egg_date(src.egg_date());
    dest.set_met_location(src.met_location());
    dest.set_egg_location(src.egg_location());
    dest.set_ball(src.ball());
    dest.set_met_level(src.met_level());
    dest.set_encounter_type(src.encounter_type());
    dest.set_pkrs_strain(src.pkrs_strain());
    dest.set_pkrs_days(src.pkrs_days());
}

fn copy_handler(src: &dyn Pkx, dest: &mut dyn Pkx) {
    dest.set_ht_name(&src.ht_name());
    dest.set_ht_gender(src.ht_gender());
    dest.set_ht_friendship(src.ht_friendship());
    dest.set_ht_memory(src.ht_memory());
    dest.set_ht_intensity(src.ht_intensity());
    dest.set_ht_feeling(src.ht_feeling());
    dest.set_ht_text_var(src.ht_text_var());
    dest.set_current_handler(src.current_handler());
}

/// The regenerated memory of the trade into the destination game.
fn regenerate_handler_memory(dest: &mut dyn Pkx, t: &mut Transfer) {
    dest.set_ht_memory(MEMORY_TRADED);
    dest.set_ht_text_var(0);
    dest.set_ht_intensity(1);
    let feeling = t.feeling();
    dest.set_ht_feeling(feeling);
}

/// Nickname to carry over: the source nickname, or the species name in the record's
/// language when it was never nicknamed.
fn carried_nickname(src: &dyn Pkx, species: u16, tables: &dyn ReferenceTables) -> String {
    if src.nicknamed() {
        return src.nickname();
    }
    let language = Language::from_u8(src.language()).unwrap_or(Language::English);
    tables
        .species_name(language, species)
        .unwrap_or_else(|| src.nickname())
}

/// Ability in the destination's personal row at the slot the destination stores.
fn resolve_ability(dest: &mut dyn Pkx, tables: &dyn ReferenceTables) {
    let slot = (dest.ability_number() >> 1).min(2) as usize;
    if let Some(info) = dest.personal(tables) {
        dest.set_ability(info.abilities[slot]);
    }
}

fn base_friendship(pkm: &dyn Pkx, tables: &dyn ReferenceTables) -> u8 {
    pkm.personal(tables)
        .map(|info| info.base_friendship)
        .unwrap_or(TRANSFER_FRIENDSHIP)
}

fn pk1_to_pk2(pk1: &Pk1, t: &mut Transfer) -> Option<Pk2> {
    let mut pk2 = Pk2::empty(false);
    let species = pk1.national_species(t.tables);
    pk2.set_species(species);
    pk2.set_held_item(pk1.catch_rate() as u16);
    pk2.set_trainer_id(pk1.trainer_id());
    pk2.set_experience(pk1.experience());
    copy_training(pk1, &mut pk2, u16::MAX);
    copy_moves(pk1, &mut pk2, t.tables);
    pk2.set_party_level(pk1.level(t.tables));
    let friendship = base_friendship(&pk2, t.tables);
    pk2.set_ot_friendship(friendship);
    Some(pk2)
}

fn pk2_to_pk1(pk2: &Pk2, t: &mut Transfer) -> Option<Pk1> {
    let species = pk2.species();
    if !t.fits(Generation::One, species) {
        debug!("Species {species} does not exist in gen 1");
        return None;
    }
    let mut pk1 = Pk1::empty(false);
    pk1.set_species(t.tables.internal_from_national(Generation::One, species));
    pk1.set_catch_rate(pk2.held_item() as u8);
    if let Some(info) = t.tables.personal(Generation::One, species) {
        pk1.set_types(info.types);
    }
    pk1.set_trainer_id(pk2.trainer_id());
    pk1.set_experience(pk2.experience());
    copy_training(pk2, &mut pk1, u16::MAX);
    copy_moves(pk2, &mut pk1, t.tables);
    pk1.set_party_level(pk2.level(t.tables));
    Some(pk1)
}

fn pk3_to_pk4(pk3: &Pk3, t: &mut Transfer) -> Option<Pk4> {
    let tables = t.tables;
    let mut pk4 = Pk4::empty(false);
    let species = pk3.national_species(tables);
    pk4.set_species(species);
    pk4.set_held_item(tables.item_from_gen3(pk3.held_item()).unwrap_or(0));
    pk4.set_pid(pk3.pid());
    pk4.set_trainer_id(pk3.trainer_id());
    pk4.set_experience(pk3.experience());
    pk4.set_ability(pk3.ability(tables));
    pk4.set_form(pk3.form());
    let gender = pk3.gender(tables);
    pk4.set_gender(gender, tables, &mut *t.rng);
    pk4.set_markings(pk3.markings());
    copy_training(pk3, &mut pk4, u8::MAX as u16);
    copy_moves(pk3, &mut pk4, tables);
    copy_flags(pk3, &mut pk4);

    pk4.set_language(pk3.language());
    pk4.set_version(pk3.version());
    pk4.set_ot_name(&pk3.ot_name());
    pk4.set_ot_gender(pk3.ot_gender());
    pk4.set_ball(pk3.ball());
    pk4.set_pkrs_strain(pk3.pkrs_strain());
    pk4.set_pkrs_days(pk3.pkrs_days());
    let nickname = if pk3.is_egg() {
        pk3.nickname()
    } else {
        let default = carried_nickname(pk3, species, tables);
        let nicknamed = !default.eq_ignore_ascii_case(&pk3.nickname());
        pk4.set_nicknamed(nicknamed);
        if nicknamed {
            pk3.nickname()
        } else {
            default
        }
    };
    pk4.set_nickname(&nickname);

    pk4.set_met_location(LOCATION_PAL_PARK);
    pk4.set_met_date(t.date);
    pk4.set_met_level(pk3.level(tables));
    pk4.set_encounter_type(0);
    pk4.set_ot_friendship(TRANSFER_FRIENDSHIP);
    copy_ribbons(pk3, &mut pk4);
    Some(pk4)
}

fn pk4_to_pk3(pk4: &Pk4, t: &mut Transfer) -> Option<Pk3> {
    let tables = t.tables;
    let species = pk4.species();
    if !t.fits(Generation::Three, species) {
        debug!("Species {species} does not exist in gen 3");
        return None;
    }
    let mut pk3 = Pk3::empty(false);
    pk3.set_species(tables.internal_from_national(Generation::Three, species));
    pk3.set_has_species(true);
    pk3.set_held_item(tables.item_to_gen3(pk4.held_item()).unwrap_or(0));
    pk3.set_pid(pk4.pid());
    pk3.set_trainer_id(pk4.trainer_id());
    pk3.set_experience(pk4.experience());
    let slot = pk3
        .personal(tables)
        .and_then(|info| info.abilities[..2].iter().position(|a| *a == pk4.ability(tables)))
        .unwrap_or((pk4.pid() & 1) as usize);
    pk3.set_ability_number(1 << slot, tables, &mut *t.rng);
    pk3.set_markings(pk4.markings());
    copy_training(pk4, &mut pk3, u8::MAX as u16);
    copy_moves(pk4, &mut pk3, tables);
    copy_flags(pk4, &mut pk3);

    pk3.set_language(pk4.language());
    pk3.set_version(pk4.version());
    pk3.set_nickname(&pk4.nickname());
    pk3.set_ot_name(&pk4.ot_name());
    pk3.set_ot_gender(pk4.ot_gender());
    let ball = pk4.ball();
    pk3.set_ball(if ball > tables.limits(Generation::Three).max_ball { BALL_POKE } else { ball });
    pk3.set_met_level(pk4.met_level());
    pk3.set_pkrs_strain(pk4.pkrs_strain());
    pk3.set_pkrs_days(pk4.pkrs_days());
    pk3.set_ot_friendship(pk4.ot_friendship());
    copy_ribbons(pk4, &mut pk3);
    Some(pk3)
}

fn pk4_to_pk5(pk4: &Pk4, t: &mut Transfer) -> Option<Pk5> {
    let tables = t.tables;
    let mut pk5 = Pk5::empty(false);
    pk5.set_pid(pk4.pid());
    pk5.set_species(pk4.species());
    pk5.set_held_item(pk4.held_item());
    pk5.set_trainer_id(pk4.trainer_id());
    pk5.set_experience(pk4.experience());
    pk5.set_ability(pk4.ability(tables));
    pk5.set_markings(pk4.markings());
    pk5.set_form(pk4.form());
    pk5.set_nature(pid::nature_from_pid(pk4.pid()), tables, &mut *t.rng);
    let gender = pk4.gender(tables);
    pk5.set_gender(gender, tables, &mut *t.rng);
    copy_training(pk4, &mut pk5, u8::MAX as u16);
    copy_moves(pk4, &mut pk5, tables);
    copy_flags(pk4, &mut pk5);
    copy_origin(pk4, &mut pk5);
    pk5.set_nickname(&pk4.nickname());

    pk5.set_met_location(LOCATION_POKE_TRANSFER);
    pk5.set_met_date(t.date);
    pk5.set_met_level(pk4.level(tables));
    pk5.set_ot_friendship(TRANSFER_FRIENDSHIP);
    copy_ribbons(pk4, &mut pk5);
    Some(pk5)
}

fn pk5_to_pk4(pk5: &Pk5, t: &mut Transfer) -> Option<Pk4> {
    let tables = t.tables;
    let species = pk5.species();
    if !t.fits(Generation::Four, species) {
        debug!("Species {species} does not exist in gen 4");
        return None;
    }
    let mut pk4 = Pk4::empty(false);
    pk4.set_pid(pk5.pid());
    pk4.set_species(species);
    pk4.set_trainer_id(pk5.trainer_id());
    pk4.set_experience(pk5.experience());
    pk4.set_ability(pk5.ability(tables));
    pk4.set_markings(pk5.markings());
    pk4.set_form(if species == SPECIES_ARCEUS { 0 } else { pk5.form() });
    let gender = pk5.gender(tables);
    pk4.set_gender(gender, tables, &mut *t.rng);
    pk4.set_nature(pk5.nature(), tables, &mut *t.rng);
    copy_training(pk5, &mut pk4, u8::MAX as u16);
    copy_moves(pk5, &mut pk4, tables);
    copy_flags(pk5, &mut pk4);
    copy_origin(pk5, &mut pk4);
    pk4.set_nickname(&pk5.nickname());
    let ball = pk5.ball();
    pk4.set_ball(if ball >= BALL_DREAM { BALL_POKE } else { ball });
    pk4.set_held_item(0);
    pk4.set_ot_friendship(TRANSFER_FRIENDSHIP);
    copy_ribbons(pk5, &mut pk4);
    Some(pk4)
}

/// Contest ribbons of the gen 4/5 layouts, folded into the contest memory ribbon.
fn contest_ribbon_count(data: &[u8]) -> u8 {
    let full: u32 = [0x60, 0x61, 0x3c, 0x3d].iter().map(|ofs| data[*ofs].count_ones()).sum();
    let partial = (data[0x62] & 0x0f).count_ones() + (data[0x3e] & 0x0f).count_ones();
    (full + partial) as u8
}

/// Battle ribbons of the gen 4/5 layouts, folded into the battle memory ribbon.
fn battle_ribbon_count(data: &[u8]) -> u8 {
    ((data[0x3e] & 0x60).count_ones() + (data[0x24] & 0x7e).count_ones()) as u8
}

fn pk5_to_pk6(pk5: &Pk5, t: &mut Transfer) -> Option<Pk6> {
    let tables = t.tables;
    let mut pk6 = Pk6::empty(false);
    let species = pk5.species();
    pk6.set_encryption_constant(pk5.pid());
    pk6.set_species(species);
    pk6.set_held_item(pk5.held_item());
    pk6.set_trainer_id(pk5.trainer_id());
    pk6.set_experience(pk5.experience());
    pk6.set_form(pk5.form());
    let ability = pk5.ability(tables);
    pk6.set_ability(ability);
    let slot = pk6.personal(tables).and_then(|info| {
        let slot = info.abilities.iter().position(|a| *a == ability)?;
        let shared_hidden = pk5.hidden_ability() && info.abilities[2] == ability;
        Some(if shared_hidden { 2 } else { slot })
    });
    let number = slot.map(|slot| 1 << slot).unwrap_or_else(|| pk5.ability_number());
    pk6.set_ability_number(number, tables, &mut *t.rng);

    pk6.set_markings(pk5.markings());
    pk6.set_language(pk5.language());
    copy_training(pk5, &mut pk6, 252);
    copy_moves(pk5, &mut pk6, tables);
    copy_flags(pk5, &mut pk6);
    let gender = pk5.gender(tables);
    pk6.set_gender(gender, tables, &mut *t.rng);
    pk6.set_nature(pk5.nature(), tables, &mut *t.rng);
    pk6.set_nickname(&carried_nickname(pk5, species, tables));
    copy_origin(pk5, &mut pk6);

    copy_ribbons(pk5, &mut pk6);
    pk6.set_contest_memory_count(contest_ribbon_count(pk5.data()));
    pk6.set_battle_memory_count(battle_ribbon_count(pk5.data()));

    let trainer = &t.trainer;
    pk6.set_region(trainer.sub_region);
    pk6.set_country(trainer.country);
    pk6.set_console_region(trainer.console_region);
    pk6.set_current_handler(1);
    pk6.set_ht_name(&trainer.player_name);
    pk6.set_ht_gender(trainer.player_gender);
    pk6.set_geo(0, trainer.sub_region, trainer.country);
    regenerate_handler_memory(&mut pk6, t);
    let friendship = base_friendship(&pk6, tables);
    pk6.set_ot_friendship(friendship);
    pk6.set_ht_friendship(friendship);

    // Shiny under the 3-bit rule but not the 4-bit one.
    let mut pid = pk5.pid();
    let xor = pid::shiny_xor(pid, pk5.trainer_id());
    if (8..16).contains(&xor) {
        pid ^= 0x8000_0000;
    }
    pk6.set_pid(pid);
    Some(pk6)
}

fn pk6_to_pk5(pk6: &Pk6, t: &mut Transfer) -> Option<Pk5> {
    let tables = t.tables;
    let species = pk6.species();
    if !t.fits(Generation::Five, species) {
        debug!("Species {species} does not exist in gen 5");
        return None;
    }
    let mut pk5 = Pk5::empty(false);
    pk5.set_pid(pk6.pid());
    pk5.set_species(species);
    let item = pk6.held_item();
    pk5.set_held_item(if item <= tables.limits(Generation::Five).max_item { item } else { 0 });
    pk5.set_trainer_id(pk6.trainer_id());
    pk5.set_experience(pk6.experience());
    pk5.set_ability(pk6.ability(tables));
    pk5.set_hidden_ability(pk6.ability_number() == 4);
    pk5.set_markings(pk6.markings());
    pk5.set_form(pk6.form());
    pk5.set_nature(pk6.nature(), tables, &mut *t.rng);
    let gender = pk6.gender(tables);
    pk5.set_gender(gender, tables, &mut *t.rng);
    copy_training(pk6, &mut pk5, 252);
    copy_moves(pk6, &mut pk5, tables);
    copy_flags(pk6, &mut pk5);
    copy_origin(pk6, &mut pk5);
    pk5.set_nickname(&pk6.nickname());
    let ball = pk6.ball();
    pk5.set_ball(if ball > BALL_DREAM { BALL_POKE } else { ball });
    pk5.set_ot_friendship(pk6.ot_friendship());
    copy_ribbons(pk6, &mut pk5);
    Some(pk5)
}

/// Gen 6 keeps one bit per mark; gen 7 widens each mark to two bits.
fn widen_markings(markings: u8) -> u16 {
    (0..6)
        .filter(|bit| markings & (1 << bit) != 0)
        .map(|bit| 1u16 << (2 * bit))
        .sum()
}

fn narrow_markings(markings: u16) -> u8 {
    (0..6)
        .filter(|bit| (markings >> (2 * bit)) & 3 != 0)
        .map(|bit| 1u8 << bit)
        .sum()
}

fn pk6_to_pk7(pk6: &Pk6, t: &mut Transfer) -> Option<Pk7> {
    let mut pk7 = Pk7 {
        data: pk6.data()[..pk6.box_len()].to_vec(),
    };
    let markings = widen_markings(pk6.markings() as u8);
    pk7.set_pelago_event_status(0);
    pk7.set_markings(markings);
    pk7.data[0xde] = 0;
    resolve_ability(&mut pk7, t.tables);
    regenerate_handler_memory(&mut pk7, t);
    Some(pk7)
}

fn pk7_to_pk6(pk7: &Pk7, t: &mut Transfer) -> Option<Pk6> {
    let mut pk6 = Pk6 {
        data: pk7.data()[..pk7.box_len()].to_vec(),
    };
    let markings = narrow_markings(pk7.markings());
    pk6.data[0x16] = 0;
    pk6.data[0x17] = 0;
    pk6.set_markings(markings as u16);
    pk6.data[0xde] = 0;
    for ribbon in Ribbon::all() {
        if let (Some((ofs, bit)), None) = (ribbon::gen7_position(ribbon), ribbon::gen6_position(ribbon)) {
            set_flag(&mut pk6.data, ofs, bit, false);
        }
    }
    resolve_ability(&mut pk6, t.tables);
    regenerate_handler_memory(&mut pk6, t);
    let trainer = &t.trainer;
    pk6.set_geo(0, trainer.sub_region, trainer.country);
    copy_moves(pk7, &mut pk6, t.tables);
    Some(pk6)
}

/// Field copy shared by both directions between the gen 7 and gen 8 layouts.
fn copy_modern(src: &dyn Pkx, dest: &mut dyn Pkx, t: &mut Transfer) {
    let tables = t.tables;
    let limits = tables.limits(dest.generation());
    dest.set_encryption_constant(src.encryption_constant());
    dest.set_pid(src.pid());
    dest.set_species(src.species());
    let item = src.held_item();
    dest.set_held_item(if item <= limits.max_item { item } else { 0 });
    dest.set_trainer_id(src.trainer_id());
    dest.set_experience(src.experience());
    dest.set_form(src.form());
    dest.set_ability_number(src.ability_number(), tables, &mut *t.rng);
    resolve_ability(dest, tables);
    dest.set_markings(src.markings());
    dest.set_nature(src.nature(), tables, &mut *t.rng);
    let gender = src.gender(tables);
    dest.set_gender(gender, tables, &mut *t.rng);
    copy_training(src, dest, 252);
    copy_moves(src, dest, tables);
    dest.heal_pp(tables);
    copy_flags(src, dest);
    dest.set_nickname(&src.nickname());
    copy_origin(src, dest);
    copy_handler(src, dest);
    dest.set_ot_friendship(src.ot_friendship());
    for stat in Stat::ALL {
        dest.set_hyper_trained(stat, src.hyper_trained(stat));
    }
    copy_ribbons(src, dest);
}

fn pk7_to_pk8(pk7: &Pk7, t: &mut Transfer) -> Option<Pk8> {
    let species = pk7.species();
    if !t.tables.species_available(Generation::Eight, species, pk7.form()) {
        debug!("Species {species} form {} is not available in gen 8", pk7.form());
        return None;
    }
    let mut pk8 = Pk8::empty(false);
    copy_modern(pk7, &mut pk8, t);
    pk8.set_stat_nature(pk7.nature());
    pk8.set_contest_memory_count(pk7.contest_memory_count());
    pk8.set_battle_memory_count(pk7.battle_memory_count());
    pk8.set_ot_memory(pk7.ot_memory());
    Some(pk8)
}

fn pk8_to_pk7(pk8: &Pk8, t: &mut Transfer) -> Option<Pk7> {
    let species = pk8.species();
    if !t.fits(Generation::Seven, species) {
        debug!("Species {species} does not exist in gen 7");
        return None;
    }
    let mut pk7 = Pk7::empty(false);
    copy_modern(pk8, &mut pk7, t);
    pk7.set_contest_memory_count(pk8.contest_memory_count());
    pk7.set_battle_memory_count(pk8.battle_memory_count());
    pk7.set_ot_memory(pk8.ot_memory());
    Some(pk7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markings_widen_and_narrow() {
        assert_eq!(widen_markings(0b10_0101), 0b0100_0000_0001_0001);
        assert_eq!(narrow_markings(0b0100_0000_0001_0001), 0b10_0101);
        assert_eq!(narrow_markings(0b1000_0000_0010_0010), 0b10_0101);
        assert_eq!(narrow_markings(widen_markings(0x3f)), 0x3f);
    }

    #[test]
    fn memory_counts_fold_gen4_ribbons() {
        let mut data = vec![0u8; 136];
        data[0x60] = 0xff;
        data[0x62] = 0xff;
        data[0x3e] = 0x6f;
        data[0x24] = 0xff;
        assert_eq!(contest_ribbon_count(&data), 8 + 4 + 4);
        assert_eq!(battle_ribbon_count(&data), 2 + 6);
    }
}
