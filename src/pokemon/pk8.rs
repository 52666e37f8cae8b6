use rand::RngCore;

use super::{checked_buffer, PartyLayout, Pkx};
use crate::{
    codec::{byte_bits, set_byte_bits, set_u16_le, set_u32_le, set_word_bits, u16_le, u32_le, word_bits},
    crypto::{decrypt_gen6, encrypt_gen6, sum16, BlockLayout},
    personal::ReferenceTables,
    ribbon::{self, Ribbon},
    text::{read_string, write_string, Charset},
    Date, Gender, Generation, Result, Stat, TrainerId,
};

pub const PK8_SIZE_BOX: usize = 328;
pub const PK8_SIZE_PARTY: usize = 344;

const IV_WORD: usize = 0x8c;
const HYPER_TRAIN_BITS: [u8; 6] = [0, 1, 2, 5, 3, 4];

/// Sword/Shield record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pk8 {
    pub(crate) data: Vec<u8>,
}

impl Pk8 {
    pub fn new(data: &[u8]) -> Result<Self> {
        let mut data = checked_buffer(Generation::Eight, data, PK8_SIZE_BOX, PK8_SIZE_PARTY)?;
        if Self::is_encrypted(&data) {
            decrypt_gen6(&mut data, BlockLayout::GEN8);
        }
        Ok(Pk8 { data })
    }

    pub fn from_decrypted(data: &[u8]) -> Result<Self> {
        let data = checked_buffer(Generation::Eight, data, PK8_SIZE_BOX, PK8_SIZE_PARTY)?;
        Ok(Pk8 { data })
    }

    pub fn empty(party: bool) -> Self {
        let len = if party { PK8_SIZE_PARTY } else { PK8_SIZE_BOX };
        Pk8 { data: vec![0; len] }
    }

    pub fn is_encrypted(data: &[u8]) -> bool {
        u16_le(data, 0x70) != 0 && u16_le(data, 0x110) != 0
    }

    pub fn can_gigantamax(&self) -> bool {
        byte_bits(&self.data, 0x16, 4, 1) != 0
    }

    pub fn set_can_gigantamax(&mut self, on: bool) {
        set_byte_bits(&mut self.data, 0x16, 4, 1, on as u8)
    }

    pub fn set_stat_nature(&mut self, nature: u8) {
        self.data[0x21] = nature;
    }

    pub fn contest_memory_count(&self) -> u8 {
        self.data[0x3c]
    }

    pub fn set_contest_memory_count(&mut self, count: u8) {
        self.data[0x3c] = count;
        self.set_ribbon(Ribbon::MemoryContest, count != 0);
    }

    pub fn battle_memory_count(&self) -> u8 {
        self.data[0x3d]
    }

    pub fn set_battle_memory_count(&mut self, count: u8) {
        self.data[0x3d] = count;
        self.set_ribbon(Ribbon::MemoryBattle, count != 0);
    }

    pub fn height_scalar(&self) -> u8 {
        self.data[0x50]
    }

    pub fn weight_scalar(&self) -> u8 {
        self.data[0x51]
    }

    pub fn dynamax_level(&self) -> u8 {
        self.data[0x90]
    }

    pub fn set_dynamax_level(&mut self, level: u8) {
        self.data[0x90] = level.min(10);
    }

    pub fn ht_language(&self) -> u8 {
        self.data[0xc3]
    }

    pub fn set_ht_language(&mut self, language: u8) {
        self.data[0xc3] = language;
    }

    pub fn ot_memory(&self) -> u8 {
        self.data[0x114]
    }

    pub fn set_ot_memory(&mut self, memory: u8) {
        self.data[0x114] = memory;
    }

    pub fn ot_intensity(&self) -> u8 {
        self.data[0x113]
    }

    pub fn set_ot_intensity(&mut self, intensity: u8) {
        self.data[0x113] = intensity;
    }

    pub fn ot_text_var(&self) -> u16 {
        u16_le(&self.data, 0x116)
    }

    pub fn set_ot_text_var(&mut self, var: u16) {
        set_u16_le(&mut self.data, 0x116, var)
    }

    pub fn ot_feeling(&self) -> u8 {
        self.data[0x118]
    }

    pub fn set_ot_feeling(&mut self, feeling: u8) {
        self.data[0x118] = feeling;
    }
}

impl Pkx for Pk8 {
    fn generation(&self) -> Generation {
        Generation::Eight
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn box_len(&self) -> usize {
        PK8_SIZE_BOX
    }

    fn party_len(&self) -> usize {
        PK8_SIZE_PARTY
    }

    fn extension(&self) -> &'static str {
        "pk8"
    }

    fn encrypted(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        let checksum = sum16(&data[8..PK8_SIZE_BOX]);
        set_u16_le(&mut data, 0x06, checksum);
        encrypt_gen6(&mut data, BlockLayout::GEN8);
        data
    }

    fn encryption_constant(&self) -> u32 {
        u32_le(&self.data, 0x00)
    }

    fn set_encryption_constant(&mut self, value: u32) {
        set_u32_le(&mut self.data, 0x00, value)
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

    fn ability(&self, _tables: &dyn ReferenceTables) -> u16 {
        u16_le(&self.data, 0x14)
    }

    fn set_ability(&mut self, ability: u16) {
        set_u16_le(&mut self.data, 0x14, ability)
    }

    fn ability_number(&self) -> u8 {
        byte_bits(&self.data, 0x16, 0, 3)
    }

    fn set_ability_number(
        &mut self,
        number: u8,
        _tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        set_byte_bits(&mut self.data, 0x16, 0, 3, number);
        true
    }

    fn markings(&self) -> u16 {
        u16_le(&self.data, 0x18)
    }

    fn set_markings(&mut self, markings: u16) {
        set_u16_le(&mut self.data, 0x18, markings)
    }

    fn pid(&self) -> u32 {
        u32_le(&self.data, 0x1c)
    }

    fn set_pid(&mut self, pid: u32) {
        set_u32_le(&mut self.data, 0x1c, pid)
    }

    fn nature(&self) -> u8 {
        self.data[0x20]
    }

    fn set_nature(
        &mut self,
        nature: u8,
        _tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        self.data[0x20] = nature;
        true
    }

    fn stat_nature(&self) -> u8 {
        self.data[0x21]
    }

    fn fateful_encounter(&self) -> bool {
        byte_bits(&self.data, 0x22, 0, 1) != 0
    }

    fn set_fateful_encounter(&mut self, fateful: bool) {
        set_byte_bits(&mut self.data, 0x22, 0, 1, fateful as u8)
    }

    fn gender(&self, _tables: &dyn ReferenceTables) -> Gender {
        match byte_bits(&self.data, 0x22, 2, 2) {
            0 => Gender::Male,
            1 => Gender::Female,
            _ => Gender::Genderless,
        }
    }

    fn set_gender(
        &mut self,
        gender: Gender,
        _tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        set_byte_bits(&mut self.data, 0x22, 2, 2, gender as u8);
        true
    }

    fn form(&self) -> u8 {
        u16_le(&self.data, 0x24) as u8
    }

    fn set_form(&mut self, form: u8) {
        set_u16_le(&mut self.data, 0x24, form as u16)
    }

    fn ev(&self, stat: Stat) -> u16 {
        self.data[0x26 + stat.index()] as u16
    }

    fn set_ev(&mut self, stat: Stat, value: u16) {
        self.data[0x26 + stat.index()] = value.min(255) as u8;
    }

    fn contest(&self, idx: usize) -> u8 {
        self.data[0x2c + idx]
    }

    fn set_contest(&mut self, idx: usize, value: u8) {
        self.data[0x2c + idx] = value;
    }

    fn pkrs_days(&self) -> u8 {
        byte_bits(&self.data, 0x32, 0, 4)
    }

    fn set_pkrs_days(&mut self, days: u8) {
        set_byte_bits(&mut self.data, 0x32, 0, 4, days)
    }

    fn pkrs_strain(&self) -> u8 {
        byte_bits(&self.data, 0x32, 4, 4)
    }

    fn set_pkrs_strain(&mut self, strain: u8) {
        set_byte_bits(&mut self.data, 0x32, 4, 4, strain)
    }

    fn ribbon_position(&self, ribbon: Ribbon) -> Option<(usize, u8)> {
        ribbon::gen8_position(ribbon)
    }

    fn nickname(&self) -> String {
        read_string(&self.data, 0x58, 13, Charset::Gen6)
    }

    fn set_nickname(&mut self, name: &str) {
        write_string(&mut self.data, 0x58, 13, Charset::Gen6, name)
    }

    fn move_id(&self, slot: usize) -> u16 {
        u16_le(&self.data, 0x72 + 2 * slot)
    }

    fn set_move_id(&mut self, slot: usize, move_id: u16) {
        set_u16_le(&mut self.data, 0x72 + 2 * slot, move_id)
    }

    fn pp(&self, slot: usize) -> u8 {
        self.data[0x7a + slot]
    }

    fn set_pp(&mut self, slot: usize, pp: u8) {
        self.data[0x7a + slot] = pp;
    }

    fn pp_ups(&self, slot: usize) -> u8 {
        self.data[0x7e + slot]
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        self.data[0x7e + slot] = ups;
    }

    fn relearn_move(&self, slot: usize) -> u16 {
        u16_le(&self.data, 0x82 + 2 * slot)
    }

    fn set_relearn_move(&mut self, slot: usize, move_id: u16) {
        set_u16_le(&mut self.data, 0x82 + 2 * slot, move_id)
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

    fn ht_name(&self) -> String {
        read_string(&self.data, 0xa8, 13, Charset::Gen6)
    }

    fn set_ht_name(&mut self, name: &str) {
        write_string(&mut self.data, 0xa8, 13, Charset::Gen6, name)
    }

    fn ht_gender(&self) -> u8 {
        self.data[0xc2]
    }

    fn set_ht_gender(&mut self, gender: u8) {
        self.data[0xc2] = gender;
    }

    fn current_handler(&self) -> u8 {
        self.data[0xc4]
    }

    fn set_current_handler(&mut self, handler: u8) {
        self.data[0xc4] = handler;
    }

    fn ht_friendship(&self) -> u8 {
        self.data[0xc8]
    }

    fn set_ht_friendship(&mut self, friendship: u8) {
        self.data[0xc8] = friendship;
    }

    fn ht_intensity(&self) -> u8 {
        self.data[0xc9]
    }

    fn set_ht_intensity(&mut self, intensity: u8) {
        self.data[0xc9] = intensity;
    }

    fn ht_memory(&self) -> u8 {
        self.data[0xca]
    }

    fn set_ht_memory(&mut self, memory: u8) {
        self.data[0xca] = memory;
    }

    fn ht_feeling(&self) -> u8 {
        self.data[0xcb]
    }

    fn set_ht_feeling(&mut self, feeling: u8) {
        self.data[0xcb] = feeling;
    }

    fn ht_text_var(&self) -> u16 {
        u16_le(&self.data, 0xcc)
    }

    fn set_ht_text_var(&mut self, var: u16) {
        set_u16_le(&mut self.data, 0xcc, var)
    }

    fn version(&self) -> u8 {
        self.data[0xde]
    }

    fn set_version(&mut self, version: u8) {
        self.data[0xde] = version;
    }

    fn language(&self) -> u8 {
        self.data[0xe2]
    }

    fn set_language(&mut self, language: u8) {
        self.data[0xe2] = language;
    }

    fn ot_name(&self) -> String {
        read_string(&self.data, 0xf8, 13, Charset::Gen6)
    }

    fn set_ot_name(&mut self, name: &str) {
        write_string(&mut self.data, 0xf8, 13, Charset::Gen6, name)
    }

    fn ot_friendship(&self) -> u8 {
        self.data[0x112]
    }

    fn set_ot_friendship(&mut self, friendship: u8) {
        self.data[0x112] = friendship;
    }

    fn egg_date(&self) -> Date {
        Date::new(self.data[0x119], self.data[0x11a], self.data[0x11b])
    }

    fn set_egg_date(&mut self, date: Date) {
        self.data[0x119..0x11c].copy_from_slice(&[date.year, date.month, date.day]);
    }

    fn met_date(&self) -> Date {
        Date::new(self.data[0x11c], self.data[0x11d], self.data[0x11e])
    }

    fn set_met_date(&mut self, date: Date) {
        self.data[0x11c..0x11f].copy_from_slice(&[date.year, date.month, date.day]);
    }

    fn egg_location(&self) -> u16 {
        u16_le(&self.data, 0x120)
    }

    fn set_egg_location(&mut self, location: u16) {
        set_u16_le(&mut self.data, 0x120, location)
    }

    fn met_location(&self) -> u16 {
        u16_le(&self.data, 0x122)
    }

    fn set_met_location(&mut self, location: u16) {
        set_u16_le(&mut self.data, 0x122, location)
    }

    fn ball(&self) -> u8 {
        self.data[0x124]
    }

    fn set_ball(&mut self, ball: u8) {
        self.data[0x124] = ball;
    }

    fn met_level(&self) -> u8 {
        byte_bits(&self.data, 0x125, 0, 7)
    }

    fn set_met_level(&mut self, level: u8) {
        set_byte_bits(&mut self.data, 0x125, 0, 7, level)
    }

    fn ot_gender(&self) -> u8 {
        byte_bits(&self.data, 0x125, 7, 1)
    }

    fn set_ot_gender(&mut self, gender: u8) {
        set_byte_bits(&mut self.data, 0x125, 7, 1, gender)
    }

    fn hyper_trained(&self, stat: Stat) -> bool {
        byte_bits(&self.data, 0x126, HYPER_TRAIN_BITS[stat.index()] as u32, 1) != 0
    }

    fn set_hyper_trained(&mut self, stat: Stat, on: bool) {
        set_byte_bits(&mut self.data, 0x126, HYPER_TRAIN_BITS[stat.index()] as u32, 1, on as u8)
    }

    /// Status and current HP live in the box portion in this layout.
    fn status(&self) -> u32 {
        u32_le(&self.data, 0x94)
    }

    fn set_status(&mut self, status: u32) {
        set_u32_le(&mut self.data, 0x94, status)
    }

    fn current_hp(&self) -> u16 {
        u16_le(&self.data, 0x8a)
    }

    fn set_current_hp(&mut self, hp: u16) {
        set_u16_le(&mut self.data, 0x8a, hp)
    }

    fn party_layout(&self) -> Option<PartyLayout> {
        Some(PartyLayout {
            status: 0x94,
            level: 0x148,
            current_hp: 0x8a,
            stats: 0x14a,
        })
    }
}
