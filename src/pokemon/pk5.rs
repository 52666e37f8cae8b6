use log::debug;
use rand::RngCore;

use super::{checked_buffer, PartyLayout, Pkx};
use crate::{
    codec::{byte_bits, set_byte_bits, set_u16_le, set_u32_le, set_word_bits, u16_le, u32_le, word_bits},
    crypto::{decrypt_gen4, encrypt_gen4, sum16},
    personal::ReferenceTables,
    pid::{AbilityBit, PidConstraints},
    ribbon::{self, Ribbon},
    text::{read_string, write_string, Charset},
    Date, Gender, Generation, Result, Stat, TrainerId,
};

pub const PK5_SIZE_BOX: usize = 136;
pub const PK5_SIZE_PARTY: usize = 220;

const IV_WORD: usize = 0x38;

/// Black/White/Black 2/White 2 record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pk5 {
    pub(crate) data: Vec<u8>,
}

impl Pk5 {
    pub fn new(data: &[u8]) -> Result<Self> {
        let mut data = checked_buffer(Generation::Five, data, PK5_SIZE_BOX, PK5_SIZE_PARTY)?;
        if Self::is_encrypted(&data) {
            decrypt_gen4(&mut data, PK5_SIZE_BOX);
        }
        Ok(Pk5 { data })
    }

    pub fn from_decrypted(data: &[u8]) -> Result<Self> {
        let data = checked_buffer(Generation::Five, data, PK5_SIZE_BOX, PK5_SIZE_PARTY)?;
        Ok(Pk5 { data })
    }

    pub fn empty(party: bool) -> Self {
        let len = if party { PK5_SIZE_PARTY } else { PK5_SIZE_BOX };
        Pk5 { data: vec![0; len] }
    }

    /// The unused word at 0x64 is only nonzero while encrypted.
    pub fn is_encrypted(data: &[u8]) -> bool {
        u32_le(data, 0x64) != 0
    }

    pub fn hidden_ability(&self) -> bool {
        byte_bits(&self.data, 0x42, 0, 1) != 0
    }

    pub fn set_hidden_ability(&mut self, hidden: bool) {
        set_byte_bits(&mut self.data, 0x42, 0, 1, hidden as u8)
    }

    /// Set on the Pokémon N releases in Black 2/White 2.
    pub fn n_pokemon(&self) -> bool {
        byte_bits(&self.data, 0x42, 1, 1) != 0
    }

    pub fn set_n_pokemon(&mut self, on: bool) {
        set_byte_bits(&mut self.data, 0x42, 1, 1, on as u8)
    }

    /// Gender stored in the record; the PID must agree with it.
    fn stored_gender(&self) -> Gender {
        match byte_bits(&self.data, 0x40, 1, 2) {
            0 => Gender::Male,
            1 => Gender::Female,
            _ => Gender::Genderless,
        }
    }
}

impl Pkx for Pk5 {
    fn generation(&self) -> Generation {
        Generation::Five
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn box_len(&self) -> usize {
        PK5_SIZE_BOX
    }

    fn party_len(&self) -> usize {
        PK5_SIZE_PARTY
    }

    fn extension(&self) -> &'static str {
        "pk5"
    }

    fn encrypted(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        let checksum = sum16(&data[8..PK5_SIZE_BOX]);
        set_u16_le(&mut data, 0x06, checksum);
        encrypt_gen4(&mut data, PK5_SIZE_BOX);
        data
    }

    fn pid(&self) -> u32 {
        u32_le(&self.data, 0x00)
    }

    fn set_pid(&mut self, pid: u32) {
        set_u32_le(&mut self.data, 0x00, pid)
    }

    fn species(&self) -> u16 {
        u16_le(&self.data, 0x08)
    }

    fn set_species(&mut self, species: u16) {
        set_u16_le(&mut self.data, 0x08, species)
    }

    fn held_item(&self) -> u16 {
        u16_le(&self.data, 0x0a)
    }

    fn set_held_item(&mut self, item: u16) {
        set_u16_le(&mut self.data, 0x0a, item)
    }

    fn trainer_id(&self) -> TrainerId {
        TrainerId::new(u16_le(&self.data, 0x0c), u16_le(&self.data, 0x0e))
    }

    fn set_trainer_id(&mut self, id: TrainerId) {
        set_u16_le(&mut self.data, 0x0c, id.public_id);
        set_u16_le(&mut self.data, 0x0e, id.secret_id);
    }

    fn experience(&self) -> u32 {
        u32_le(&self.data, 0x10)
    }

    fn set_experience(&mut self, exp: u32) {
        set_u32_le(&mut self.data, 0x10, exp)
    }

    fn ot_friendship(&self) -> u8 {
        self.data[0x14]
    }

    fn set_ot_friendship(&mut self, friendship: u8) {
        self.data[0x14] = friendship;
    }

    fn ability(&self, _tables: &dyn ReferenceTables) -> u16 {
        self.data[0x15] as u16
    }

    fn set_ability(&mut self, ability: u16) {
        self.data[0x15] = ability as u8;
    }

    fn ability_number(&self) -> u8 {
        if self.hidden_ability() {
            4
        } else {
            1 << ((self.pid() >> 16) & 1)
        }
    }

    fn set_ability_number(
        &mut self,
        number: u8,
        tables: &dyn ReferenceTables,
        rng: &mut dyn RngCore,
    ) -> bool {
        match number {
            4 => {
                self.set_hidden_ability(true);
                true
            }
            1 | 2 => {
                self.set_hidden_ability(false);
                let constraints = PidConstraints {
                    ability: Some(AbilityBit::High(number >> 1)),
                    ..self.pid_constraints(tables)
                };
                if constraints.matches(self.pid()) {
                    return true;
                }
                self.reroll_pid(self.shiny(), &constraints, rng)
            }
            _ => {
                debug!("gen 5 records have no ability slot {number}");
                false
            }
        }
    }

    fn markings(&self) -> u16 {
        self.data[0x16] as u16
    }

    fn set_markings(&mut self, markings: u16) {
        self.data[0x16] = markings as u8;
    }

    fn language(&self) -> u8 {
        self.data[0x17]
    }

    fn set_language(&mut self, language: u8) {
        self.data[0x17] = language;
    }

    fn ev(&self, stat: Stat) -> u16 {
        self.data[0x18 + stat.index()] as u16
    }

    fn set_ev(&mut self, stat: Stat, value: u16) {
        self.data[0x18 + stat.index()] = value.min(255) as u8;
    }

    fn contest(&self, idx: usize) -> u8 {
        self.data[0x1e + idx]
    }

    fn set_contest(&mut self, idx: usize, value: u8) {
        self.data[0x1e + idx] = value;
    }

    fn ribbon_position(&self, ribbon: Ribbon) -> Option<(usize, u8)> {
        ribbon::gen4_position(ribbon)
    }

    fn move_id(&self, slot: usize) -> u16 {
        u16_le(&self.data, 0x28 + 2 * slot)
    }

    fn set_move_id(&mut self, slot: usize, move_id: u16) {
        set_u16_le(&mut self.data, 0x28 + 2 * slot, move_id)
    }

    fn pp(&self, slot: usize) -> u8 {
        self.data[0x30 + slot]
    }

    fn set_pp(&mut self, slot: usize, pp: u8) {
        self.data[0x30 + slot] = pp;
    }

    fn pp_ups(&self, slot: usize) -> u8 {
        self.data[0x34 + slot]
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        self.data[0x34 + slot] = ups;
    }

    fn iv(&self, stat: Stat) -> u8 {
        word_bits(&self.data, IV_WORD, 5 * stat.index() as u32, 5) as u8
    }

    fn set_iv(&mut self, stat: Stat, value: u8) {
        set_word_bits(&mut self.data, IV_WORD, 5 * stat.index() as u32, 5, value as u32)
    }

    fn is_egg(&self) -> bool {
        word_bits(&self.data, IV_WORD, 30, 1) != 0
    }

    fn set_egg(&mut self, egg: bool) {
        set_word_bits(&mut self.data, IV_WORD, 30, 1, egg as u32)
    }

    fn nicknamed(&self) -> bool {
        word_bits(&self.data, IV_WORD, 31, 1) != 0
    }

    fn set_nicknamed(&mut self, nicknamed: bool) {
        set_word_bits(&mut self.data, IV_WORD, 31, 1, nicknamed as u32)
    }

    fn fateful_encounter(&self) -> bool {
        byte_bits(&self.data, 0x40, 0, 1) != 0
    }

    fn set_fateful_encounter(&mut self, fateful: bool) {
        set_byte_bits(&mut self.data, 0x40, 0, 1, fateful as u8)
    }

    fn gender(&self, _tables: &dyn ReferenceTables) -> Gender {
        self.stored_gender()
    }

    fn set_gender(
        &mut self,
        gender: Gender,
        tables: &dyn ReferenceTables,
        rng: &mut dyn RngCore,
    ) -> bool {
        let previous = byte_bits(&self.data, 0x40, 1, 2);
        set_byte_bits(&mut self.data, 0x40, 1, 2, gender as u8);
        let constraints = self.pid_constraints(tables);
        if constraints.matches(self.pid()) || self.reroll_pid(self.shiny(), &constraints, rng) {
            return true;
        }
        // The kept PID still encodes the old gender.
        set_byte_bits(&mut self.data, 0x40, 1, 2, previous);
        false
    }

    fn form(&self) -> u8 {
        byte_bits(&self.data, 0x40, 3, 5)
    }

    fn set_form(&mut self, form: u8) {
        set_byte_bits(&mut self.data, 0x40, 3, 5, form)
    }

    fn nature(&self) -> u8 {
        self.data[0x41]
    }

    fn set_nature(
        &mut self,
        nature: u8,
        _tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        self.data[0x41] = nature;
        true
    }

    fn nickname(&self) -> String {
        read_string(&self.data, 0x48, 11, Charset::Gen5)
    }

    fn set_nickname(&mut self, name: &str) {
        write_string(&mut self.data, 0x48, 11, Charset::Gen5, name)
    }

    fn version(&self) -> u8 {
        self.data[0x5f]
    }

    fn set_version(&mut self, version: u8) {
        self.data[0x5f] = version;
    }

    fn ot_name(&self) -> String {
        read_string(&self.data, 0x68, 8, Charset::Gen5)
    }

    fn set_ot_name(&mut self, name: &str) {
        write_string(&mut self.data, 0x68, 8, Charset::Gen5, name)
    }

    fn egg_date(&self) -> Date {
        Date::new(self.data[0x78], self.data[0x79], self.data[0x7a])
    }

    fn set_egg_date(&mut self, date: Date) {
        self.data[0x78..0x7b].copy_from_slice(&[date.year, date.month, date.day]);
    }

    fn met_date(&self) -> Date {
        Date::new(self.data[0x7b], self.data[0x7c], self.data[0x7d])
    }

    fn set_met_date(&mut self, date: Date) {
        self.data[0x7b..0x7e].copy_from_slice(&[date.year, date.month, date.day]);
    }

    fn egg_location(&self) -> u16 {
        u16_le(&self.data, 0x7e)
    }

    fn set_egg_location(&mut self, location: u16) {
        set_u16_le(&mut self.data, 0x7e, location)
    }

    fn met_location(&self) -> u16 {
        u16_le(&self.data, 0x80)
    }

    fn set_met_location(&mut self, location: u16) {
        set_u16_le(&mut self.data, 0x80, location)
    }

    fn pkrs_days(&self) -> u8 {
        byte_bits(&self.data, 0x82, 0, 4)
    }

    fn set_pkrs_days(&mut self, days: u8) {
        set_byte_bits(&mut self.data, 0x82, 0, 4, days)
    }

    fn pkrs_strain(&self) -> u8 {
        byte_bits(&self.data, 0x82, 4, 4)
    }

    fn set_pkrs_strain(&mut self, strain: u8) {
        set_byte_bits(&mut self.data, 0x82, 4, 4, strain)
    }

    fn ball(&self) -> u8 {
        self.data[0x83]
    }

    fn set_ball(&mut self, ball: u8) {
        self.data[0x83] = ball;
    }

    fn met_level(&self) -> u8 {
        byte_bits(&self.data, 0x84, 0, 7)
    }

    fn set_met_level(&mut self, level: u8) {
        set_byte_bits(&mut self.data, 0x84, 0, 7, level)
    }

    fn ot_gender(&self) -> u8 {
        byte_bits(&self.data, 0x84, 7, 1)
    }

    fn set_ot_gender(&mut self, gender: u8) {
        set_byte_bits(&mut self.data, 0x84, 7, 1, gender)
    }

    fn encounter_type(&self) -> u8 {
        self.data[0x85]
    }

    fn set_encounter_type(&mut self, kind: u8) {
        self.data[0x85] = kind;
    }

    fn party_layout(&self) -> Option<PartyLayout> {
        Some(PartyLayout {
            status: 0x88,
            level: 0x8c,
            current_hp: 0x8e,
            stats: 0x90,
        })
    }

    fn pid_constraints(&self, tables: &dyn ReferenceTables) -> PidConstraints {
        PidConstraints {
            gender: Some((self.stored_gender(), self.gender_ratio(tables))),
            nature: None,
            ability: Some(AbilityBit::High(((self.pid() >> 16) & 1) as u8)),
            unown_form: None,
        }
    }
}
