use rand::RngCore;

use super::{
    checked_buffer,
    pk1::{dv, dv_shiny, dv_stat, pp_byte, set_dv, set_dv_shiny, stat_exp_offset},
    Pkx,
};
use crate::{
    codec::{set_u16_be, set_u24_be, u16_be, u24_be},
    personal::{exp_for_level, ReferenceTables, GENDER_FEMALE_ONLY, GENDER_MALE_ONLY, GENDER_UNKNOWN},
    Gender, Generation, Result, Stat, TrainerId,
};

pub const PK2_SIZE_BOX: usize = 32;
pub const PK2_SIZE_PARTY: usize = 48;

const UNOWN: u16 = 201;
const MOVES: usize = 0x02;
const STAT_EXP: usize = 0x0b;
const DVS: usize = 0x15;
const PP: usize = 0x17;
const CAUGHT: usize = 0x1d;

/// Gold/Silver/Crystal record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pk2 {
    pub(crate) data: Vec<u8>,
}

impl Pk2 {
    pub fn new(data: &[u8]) -> Result<Self> {
        let data = checked_buffer(Generation::Two, data, PK2_SIZE_BOX, PK2_SIZE_PARTY)?;
        Ok(Pk2 { data })
    }

    pub fn empty(party: bool) -> Self {
        let len = if party { PK2_SIZE_PARTY } else { PK2_SIZE_BOX };
        Pk2 { data: vec![0; len] }
    }

    /// Crystal caught data: time of day in the top two bits.
    pub fn met_time_of_day(&self) -> u8 {
        (u16_be(&self.data, CAUGHT) >> 14) as u8
    }

    pub fn set_met_time_of_day(&mut self, time: u8) {
        let word = u16_be(&self.data, CAUGHT) & 0x3fff | (time as u16 & 3) << 14;
        set_u16_be(&mut self.data, CAUGHT, word)
    }

    /// Atk DV threshold at or below which the record is female.
    fn female_threshold(gender_ratio: u8) -> u8 {
        gender_ratio >> 4
    }
}

impl Pkx for Pk2 {
    fn generation(&self) -> Generation {
        Generation::Two
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn box_len(&self) -> usize {
        PK2_SIZE_BOX
    }

    fn party_len(&self) -> usize {
        PK2_SIZE_PARTY
    }

    fn extension(&self) -> &'static str {
        "pk2"
    }

    fn encrypted(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn calc_checksum(&self) -> u16 {
        0
    }

    fn checksum(&self) -> u16 {
        0
    }

    fn set_checksum(&mut self, _checksum: u16) {}

    fn species(&self) -> u16 {
        self.data[0x00] as u16
    }

    fn set_species(&mut self, species: u16) {
        self.data[0x00] = species as u8;
    }

    fn held_item(&self) -> u16 {
        self.data[0x01] as u16
    }

    fn set_held_item(&mut self, item: u16) {
        self.data[0x01] = item as u8;
    }

    fn trainer_id(&self) -> TrainerId {
        TrainerId::new(u16_be(&self.data, 0x06), 0)
    }

    fn set_trainer_id(&mut self, id: TrainerId) {
        set_u16_be(&mut self.data, 0x06, id.public_id)
    }

    fn experience(&self) -> u32 {
        u24_be(&self.data, 0x08)
    }

    fn set_experience(&mut self, exp: u32) {
        set_u24_be(&mut self.data, 0x08, exp)
    }

    fn gender(&self, tables: &dyn ReferenceTables) -> Gender {
        match self.gender_ratio(tables) {
            GENDER_UNKNOWN => Gender::Genderless,
            GENDER_FEMALE_ONLY => Gender::Female,
            GENDER_MALE_ONLY => Gender::Male,
            ratio if self.iv(Stat::Atk) <= Self::female_threshold(ratio) => Gender::Female,
            _ => Gender::Male,
        }
    }

    /// Moves the Atk DV to the nearest value of the requested gender, keeping shininess.
    fn set_gender(
        &mut self,
        gender: Gender,
        tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let ratio = self.gender_ratio(tables);
        if matches!(ratio, GENDER_UNKNOWN | GENDER_FEMALE_ONLY | GENDER_MALE_ONLY) {
            return self.gender(tables) == gender;
        }
        let threshold = Self::female_threshold(ratio);
        let shiny = self.shiny();
        let atk = self.iv(Stat::Atk);
        let candidate = (0u8..16)
            .filter(|dv| (*dv <= threshold) == (gender == Gender::Female))
            .filter(|dv| !shiny || dv & 2 != 0)
            .min_by_key(|dv| (*dv as i16 - atk as i16).abs());
        match candidate {
            Some(dv) => {
                self.set_iv(Stat::Atk, dv);
                true
            }
            None => false,
        }
    }

    fn form(&self) -> u8 {
        if self.species() != UNOWN {
            return 0;
        }
        let bits = |stat| (self.iv(stat) & 6) as u16;
        let letter = bits(Stat::Atk) << 5 | bits(Stat::Def) << 3 | bits(Stat::Spe) << 1 | bits(Stat::SpA) >> 1;
        (letter / 10) as u8
    }

    fn iv(&self, stat: Stat) -> u8 {
        dv(&self.data, DVS, stat)
    }

    fn set_iv(&mut self, stat: Stat, value: u8) {
        set_dv(&mut self.data, DVS, stat, value)
    }

    fn ev(&self, stat: Stat) -> u16 {
        u16_be(&self.data, stat_exp_offset(STAT_EXP, stat))
    }

    fn set_ev(&mut self, stat: Stat, value: u16) {
        set_u16_be(&mut self.data, stat_exp_offset(STAT_EXP, stat), value)
    }

    fn move_id(&self, slot: usize) -> u16 {
        self.data[MOVES + slot] as u16
    }

    fn set_move_id(&mut self, slot: usize, move_id: u16) {
        self.data[MOVES + slot] = move_id as u8;
    }

    fn pp(&self, slot: usize) -> u8 {
        self.data[PP + slot] & 0x3f
    }

    fn set_pp(&mut self, slot: usize, pp: u8) {
        let ups = self.pp_ups(slot);
        self.data[PP + slot] = pp_byte(pp, ups);
    }

    fn pp_ups(&self, slot: usize) -> u8 {
        self.data[PP + slot] >> 6
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        let pp = self.pp(slot);
        self.data[PP + slot] = pp_byte(pp, ups);
    }

    fn ot_friendship(&self) -> u8 {
        self.data[0x1b]
    }

    fn set_ot_friendship(&mut self, friendship: u8) {
        self.data[0x1b] = friendship;
    }

    fn pkrs_strain(&self) -> u8 {
        self.data[0x1c] >> 4
    }

    fn set_pkrs_strain(&mut self, strain: u8) {
        self.data[0x1c] = self.data[0x1c] & 0x0f | (strain & 0xf) << 4;
    }

    fn pkrs_days(&self) -> u8 {
        self.data[0x1c] & 0x0f
    }

    fn set_pkrs_days(&mut self, days: u8) {
        self.data[0x1c] = self.data[0x1c] & 0xf0 | (days & 0xf);
    }

    fn met_level(&self) -> u8 {
        ((u16_be(&self.data, CAUGHT) >> 8) & 0x3f) as u8
    }

    fn set_met_level(&mut self, level: u8) {
        let word = u16_be(&self.data, CAUGHT) & !0x3f00 | (level as u16 & 0x3f) << 8;
        set_u16_be(&mut self.data, CAUGHT, word)
    }

    fn ot_gender(&self) -> u8 {
        ((u16_be(&self.data, CAUGHT) >> 7) & 1) as u8
    }

    fn set_ot_gender(&mut self, gender: u8) {
        let word = u16_be(&self.data, CAUGHT) & !0x80 | (gender as u16 & 1) << 7;
        set_u16_be(&mut self.data, CAUGHT, word)
    }

    fn met_location(&self) -> u16 {
        u16_be(&self.data, CAUGHT) & 0x7f
    }

    fn set_met_location(&mut self, location: u16) {
        let word = u16_be(&self.data, CAUGHT) & !0x7f | location & 0x7f;
        set_u16_be(&mut self.data, CAUGHT, word)
    }

    fn shiny(&self) -> bool {
        dv_shiny(&self.data, DVS)
    }

    fn set_shiny(&mut self, shiny: bool, _tables: &dyn ReferenceTables, _rng: &mut dyn RngCore) -> bool {
        set_dv_shiny(&mut self.data, DVS, shiny);
        true
    }

    fn hp_type(&self) -> u8 {
        4 * (self.iv(Stat::Atk) & 3) + (self.iv(Stat::Def) & 3)
    }

    fn set_hp_type(&mut self, hp_type: u8) {
        let atk = (self.iv(Stat::Atk) & 0xc) | (hp_type >> 2 & 3);
        let def = (self.iv(Stat::Def) & 0xc) | (hp_type & 3);
        self.set_iv(Stat::Atk, atk);
        self.set_iv(Stat::Def, def);
    }

    fn set_level(&mut self, level: u8, tables: &dyn ReferenceTables) {
        let exp = exp_for_level(level, self.exp_growth(tables));
        self.set_experience(exp);
        self.data[0x1f] = level;
    }

    fn stat(&self, stat: Stat, tables: &dyn ReferenceTables) -> u16 {
        let base = self
            .personal(tables)
            .map(|info| info.base_stat(stat))
            .unwrap_or(0);
        dv_stat(base, self.iv(stat), self.ev(stat), self.level(tables), stat)
    }

    fn party_level(&self) -> u8 {
        self.data[0x1f]
    }

    fn set_party_level(&mut self, level: u8) {
        self.data[0x1f] = level;
    }

    fn status(&self) -> u32 {
        if self.is_party() {
            self.data[0x20] as u32
        } else {
            0
        }
    }

    fn set_status(&mut self, status: u32) {
        if self.is_party() {
            self.data[0x20] = status as u8;
        }
    }

    fn current_hp(&self) -> u16 {
        if self.is_party() {
            u16_be(&self.data, 0x22)
        } else {
            0
        }
    }

    fn set_current_hp(&mut self, hp: u16) {
        if self.is_party() {
            set_u16_be(&mut self.data, 0x22, hp)
        }
    }

    /// Party stats keep Special Attack and Special Defense in separate slots.
    fn party_stat(&self, stat: Stat) -> u16 {
        if self.is_party() {
            u16_be(&self.data, 0x24 + 2 * stat.index())
        } else {
            0
        }
    }

    fn set_party_stat(&mut self, stat: Stat, value: u16) {
        if self.is_party() {
            set_u16_be(&mut self.data, 0x24 + 2 * stat.index(), value)
        }
    }
}
