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

pub const PK7_SIZE_BOX: usize = 232;
pub const PK7_SIZE_PARTY: usize = 260;

const IV_WORD: usize = 0x74;

/// Bit of the hyper training byte for each stat, in stat order.
const HYPER_TRAIN_BITS: [u8; 6] = [0, 1, 2, 5, 3, 4];

/// Sun/Moon/Ultra Sun/Ultra Moon record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pk7 {
    pub(crate) data: Vec<u8>,
}

impl Pk7 {
    pub fn new(data: &[u8]) -> Result<Self> {
        let mut data = checked_buffer(Generation::Seven, data, PK7_SIZE_BOX, PK7_SIZE_PARTY)?;
        if Self::is_encrypted(&data) {
            decrypt_gen6(&mut data, BlockLayout::GEN6);
        }
        Ok(Pk7 { data })
    }

    pub fn from_decrypted(data: &[u8]) -> Result<Self> {
        let data = checked_buffer(Generation::Seven, data, PK7_SIZE_BOX, PK7_SIZE_PARTY)?;
        Ok(Pk7 { data })
    }

    pub fn empty(party: bool) -> Self {
        let len = if party { PK7_SIZE_PARTY } else { PK7_SIZE_BOX };
        Pk7 { data: vec![0; len] }
    }

    /// Plain records have zero nickname and OT name terminators.
    pub fn is_encrypted(data: &[u8]) -> bool {
        u16_le(data, 0x58) != 0 && u16_le(data, 0xc8) != 0
    }

    pub fn pelago_event_status(&self) -> u8 {
        self.data[0x2a]
    }

    pub fn set_pelago_event_status(&mut self, status: u8) {
        self.data[0x2a] = status;
    }

    pub fn super_training_flags(&self) -> u32 {
        u32_le(&self.data, 0x2c)
    }

    pub fn contest_memory_count(&self) -> u8 {
        self.data[0x38]
    }

    pub fn set_contest_memory_count(&mut self, count: u8) {
        self.data[0x38] = count;
        self.set_ribbon(Ribbon::MemoryContest, count != 0);
    }

    pub fn battle_memory_count(&self) -> u8 {
        self.data[0x39]
    }

    pub fn set_battle_memory_count(&mut self, count: u8) {
        self.data[0x39] = count;
        self.set_ribbon(Ribbon::MemoryBattle, count != 0);
    }

    pub fn ht_affection(&self) -> u8 {
        self.data[0xa3]
    }

    pub fn ot_affection(&self) -> u8 {
        self.data[0xcb]
    }

    pub fn fullness(&self) -> u8 {
        self.data[0xae]
    }

    pub fn enjoyment(&self) -> u8 {
        self.data[0xaf]
    }

    pub fn ot_memory(&self) -> u8 {
        self.data[0xcd]
    }

    pub fn set_ot_memory(&mut self, memory: u8) {
        self.data[0xcd] = memory;
    }
}

impl Pkx for Pk7 {
    fn generation(&self) -> Generation {
        Generation::Seven
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn box_len(&self) -> usize {
        PK7_SIZE_BOX
    }

    fn party_len(&self) -> usize {
        PK7_SIZE_PARTY
    }

    fn extension(&self) -> &'static str {
        "pk7"
    }

    fn encrypted(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        let checksum = sum16(&data[8..PK7_SIZE_BOX]);
        set_u16_le(&mut data, 0x06, checksum);
        encrypt_gen6(&mut data, BlockLayout::GEN6);
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
        self.data[0x14] as u16
    }

    fn set_ability(&mut self, ability: u16) {
        self.data[0x14] = ability as u8;
    }

    fn ability_number(&self) -> u8 {
        self.data[0x15]
    }

    fn set_ability_number(
        &mut self,
        number: u8,
        _tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        self.data[0x15] = number;
        true
    }

    /// Two bits per mark: 1 blue, 2 red.
    fn markings(&self) -> u16 {
        u16_le(&self.data, 0x16)
    }

    fn set_markings(&mut self, markings: u16) {
        set_u16_le(&mut self.data, 0x16, markings)
    }

    fn pid(&self) -> u32 {
        u32_le(&self.data, 0x18)
    }

    fn set_pid(&mut self, pid: u32) {
        set_u32_le(&mut self.data, 0x18, pid)
    }

    fn nature(&self) -> u8 {
        self.data[0x1c]
    }

    fn set_nature(
        &mut self,
        nature: u8,
        _tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        self.data[0x1c] = nature;
        true
    }

    fn fateful_encounter(&self) -> bool {
        byte_bits(&self.data, 0x1d, 0, 1) != 0
    }

    fn set_fateful_encounter(&mut self, fateful: bool) {
        set_byte_bits(&mut self.data, 0x1d, 0, 1, fateful as u8)
    }

    fn gender(&self, _tables: &dyn ReferenceTables) -> Gender {
        match byte_bits(&self.data, 0x1d, 1, 2) {
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
        set_byte_bits(&mut self.data, 0x1d, 1, 2, gender as u8);
        true
    }

    fn form(&self) -> u8 {
        byte_bits(&self.data, 0x1d, 3, 5)
    }

    fn set_form(&mut self, form: u8) {
        set_byte_bits(&mut self.data, 0x1d, 3, 5, form)
    }

    fn ev(&self, stat: Stat) -> u16 {
        self.data[0x1e + stat.index()] as u16
    }

    fn set_ev(&mut self, stat: Stat, value: u16) {
        self.data[0x1e + stat.index()] = value.min(255) as u8;
    }

    fn contest(&self, idx: usize) -> u8 {
        self.data[0x24 + idx]
    }

    fn set_contest(&mut self, idx: usize, value: u8) {
        self.data[0x24 + idx] = value;
    }

    fn pkrs_days(&self) -> u8 {
        byte_bits(&self.data, 0x2b, 0, 4)
    }

    fn set_pkrs_days(&mut self, days: u8) {
        set_byte_bits(&mut self.data, 0x2b, 0, 4, days)
    }

    fn pkrs_strain(&self) -> u8 {
        byte_bits(&self.data, 0x2b, 4, 4)
    }

    fn set_pkrs_strain(&mut self, strain: u8) {
        set_byte_bits(&mut self.data, 0x2b, 4, 4, strain)
    }

    fn ribbon_position(&self, ribbon: Ribbon) -> Option<(usize, u8)> {
        ribbon::gen7_position(ribbon)
    }

    fn nickname(&self) -> String {
        read_string(&self.data, 0x40, 13, Charset::Gen6)
    }

    fn set_nickname(&mut self, name: &str) {
        write_string(&mut self.data, 0x40, 13, Charset::Gen6, name)
    }

    fn move_id(&self, slot: usize) -> u16 {
        u16_le(&self.data, 0x5a + 2 * slot)
    }

    fn set_move_id(&mut self, slot: usize, move_id: u16) {
        set_u16_le(&mut self.data, 0x5a + 2 * slot, move_id)
    }

    fn pp(&self, slot: usize) -> u8 {
        self.data[0x62 + slot]
    }

    fn set_pp(&mut self, slot: usize, pp: u8) {
        self.data[0x62 + slot] = pp;
    }

    fn pp_ups(&self, slot: usize) -> u8 {
        self.data[0x66 + slot]
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        self.data[0x66 + slot] = ups;
    }

    fn relearn_move(&self, slot: usize) -> u16 {
        u16_le(&self.data, 0x6a + 2 * slot)
    }

    fn set_relearn_move(&mut self, slot: usize, move_id: u16) {
        set_u16_le(&mut self.data, 0x6a + 2 * slot, move_id)
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
        read_string(&self.data, 0x78, 13, Charset::Gen6)
    }

    fn set_ht_name(&mut self, name: &str) {
        write_string(&mut self.data, 0x78, 13, Charset::Gen6, name)
    }

    fn ht_gender(&self) -> u8 {
        self.data[0x92]
    }

    fn set_ht_gender(&mut self, gender: u8) {
        self.data[0x92] = gender;
    }

    fn current_handler(&self) -> u8 {
        self.data[0x93]
    }

    fn set_current_handler(&mut self, handler: u8) {
        self.data[0x93] = handler;
    }

    fn geo(&self, idx: usize) -> (u8, u8) {
        (self.data[0x94 + 2 * idx], self.data[0x95 + 2 * idx])
    }

    fn set_geo(&mut self, idx: usize, region: u8, country: u8) {
        self.data[0x94 + 2 * idx] = region;
        self.data[0x95 + 2 * idx] = country;
    }

    fn ht_friendship(&self) -> u8 {
        self.data[0xa2]
    }

    fn set_ht_friendship(&mut self, friendship: u8) {
        self.data[0xa2] = friendship;
    }

    fn ht_intensity(&self) -> u8 {
        self.data[0xa4]
    }

    fn set_ht_intensity(&mut self, intensity: u8) {
        self.data[0xa4] = intensity;
    }

    fn ht_memory(&self) -> u8 {
        self.data[0xa5]
    }

    fn set_ht_memory(&mut self, memory: u8) {
        self.data[0xa5] = memory;
    }

    fn ht_feeling(&self) -> u8 {
        self.data[0xa6]
    }

    fn set_ht_feeling(&mut self, feeling: u8) {
        self.data[0xa6] = feeling;
    }

    fn ht_text_var(&self) -> u16 {
        u16_le(&self.data, 0xa8)
    }

    fn set_ht_text_var(&mut self, var: u16) {
        set_u16_le(&mut self.data, 0xa8, var)
    }

    fn ot_name(&self) -> String {
        read_string(&self.data, 0xb0, 13, Charset::Gen6)
    }

    fn set_ot_name(&mut self, name: &str) {
        write_string(&mut self.data, 0xb0, 13, Charset::Gen6, name)
    }

    fn ot_friendship(&self) -> u8 {
        self.data[0xca]
    }

    fn set_ot_friendship(&mut self, friendship: u8) {
        self.data[0xca] = friendship;
    }

    fn egg_date(&self) -> Date {
        Date::new(self.data[0xd1], self.data[0xd2], self.data[0xd3])
    }

    fn set_egg_date(&mut self, date: Date) {
        self.data[0xd1..0xd4].copy_from_slice(&[date.year, date.month, date.day]);
    }

    fn met_date(&self) -> Date {
        Date::new(self.data[0xd4], self.data[0xd5], self.data[0xd6])
    }

    fn set_met_date(&mut self, date: Date) {
        self.data[0xd4..0xd7].copy_from_slice(&[date.year, date.month, date.day]);
    }

    fn egg_location(&self) -> u16 {
        u16_le(&self.data, 0xd8)
    }

    fn set_egg_location(&mut self, location: u16) {
        set_u16_le(&mut self.data, 0xd8, location)
    }

    fn met_location(&self) -> u16 {
        u16_le(&self.data, 0xda)
    }

    fn set_met_location(&mut self, location: u16) {
        set_u16_le(&mut self.data, 0xda, location)
    }

    fn ball(&self) -> u8 {
        self.data[0xdc]
    }

    fn set_ball(&mut self, ball: u8) {
        self.data[0xdc] = ball;
    }

    fn met_level(&self) -> u8 {
        byte_bits(&self.data, 0xdd, 0, 7)
    }

    fn set_met_level(&mut self, level: u8) {
        set_byte_bits(&mut self.data, 0xdd, 0, 7, level)
    }

    fn ot_gender(&self) -> u8 {
        byte_bits(&self.data, 0xdd, 7, 1)
    }

    fn set_ot_gender(&mut self, gender: u8) {
        set_byte_bits(&mut self.data, 0xdd, 7, 1, gender)
    }

    fn hyper_trained(&self, stat: Stat) -> bool {
        byte_bits(&self.data, 0xde, HYPER_TRAIN_BITS[stat.index()] as u32, 1) != 0
    }

    fn set_hyper_trained(&mut self, stat: Stat, on: bool) {
        set_byte_bits(&mut self.data, 0xde, HYPER_TRAIN_BITS[stat.index()] as u32, 1, on as u8)
    }

    fn version(&self) -> u8 {
        self.data[0xdf]
    }

    fn set_version(&mut self, version: u8) {
        self.data[0xdf] = version;
    }

    fn country(&self) -> u8 {
        self.data[0xe0]
    }

    fn set_country(&mut self, country: u8) {
        self.data[0xe0] = country;
    }

    fn region(&self) -> u8 {
        self.data[0xe1]
    }

    fn set_region(&mut self, region: u8) {
        self.data[0xe1] = region;
    }

    fn console_region(&self) -> u8 {
        self.data[0xe2]
    }

    fn set_console_region(&mut self, region: u8) {
        self.data[0xe2] = region;
    }

    fn language(&self) -> u8 {
        self.data[0xe3]
    }

    fn set_language(&mut self, language: u8) {
        self.data[0xe3] = language;
    }

    fn party_layout(&self) -> Option<PartyLayout> {
        Some(PartyLayout {
            status: 0xe8,
            level: 0xec,
            current_hp: 0xf0,
            stats: 0xf2,
        })
    }
}
