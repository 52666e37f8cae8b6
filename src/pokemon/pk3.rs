use log::debug;
use rand::RngCore;

use super::{checked_buffer, PartyLayout, Pkx};
use crate::{
    codec::{
        byte_bits, set_byte_bits, set_u16_le, set_u32_le, set_word_bits, u16_le, u32_le, word_bits,
    },
    crypto::{decrypt_gen3, encrypt_gen3, sum16},
    personal::ReferenceTables,
    pid::{gender_from_pid, nature_from_pid, unown_form_from_pid, PidConstraints},
    ribbon::{gen3_contest_rank, gen3_flag_bit, Ribbon},
    text::{read_string, write_string, Charset},
    Gender, Generation, Result, Stat, TrainerId,
};

pub const PK3_SIZE_PARTY: usize = 100;
pub const PK3_SIZE_BOX: usize = 80;
const SUBSTRUCTURE_OFFSET: usize = 32;
const CHECKSUM_OFFSET: usize = 0x1c;

// Substructures in working order once unshuffled.
const GROWTH: usize = SUBSTRUCTURE_OFFSET;
const ATTACKS: usize = SUBSTRUCTURE_OFFSET + 12;
const EVS_CONDITIONS: usize = SUBSTRUCTURE_OFFSET + 24;
const MISCELLANEOUS: usize = SUBSTRUCTURE_OFFSET + 36;

const ORIGINS: usize = MISCELLANEOUS + 2;
const IV_WORD: usize = MISCELLANEOUS + 4;
const RIBBON_WORD: usize = MISCELLANEOUS + 8;

const UNOWN: u16 = 201;

/// Ruby/Sapphire/Emerald/FireRed/LeafGreen record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pk3 {
    pub(crate) data: Vec<u8>,
}

impl Pk3 {
    pub fn new(data: &[u8]) -> Result<Self> {
        let mut data = checked_buffer(Generation::Three, data, PK3_SIZE_BOX, PK3_SIZE_PARTY)?;
        if Self::is_encrypted(&data) {
            decrypt_gen3(&mut data);
        }
        Ok(Pk3 { data })
    }

    pub fn from_decrypted(data: &[u8]) -> Result<Self> {
        let data = checked_buffer(Generation::Three, data, PK3_SIZE_BOX, PK3_SIZE_PARTY)?;
        Ok(Pk3 { data })
    }

    pub fn empty(party: bool) -> Self {
        let len = if party { PK3_SIZE_PARTY } else { PK3_SIZE_BOX };
        Pk3 { data: vec![0; len] }
    }

    /// Gen 3 has no marker word, so plain bytes are recognised by a matching checksum.
    pub fn is_encrypted(data: &[u8]) -> bool {
        u16_le(data, CHECKSUM_OFFSET) != sum16(&data[SUBSTRUCTURE_OFFSET..PK3_SIZE_BOX])
    }

    pub fn is_bad_egg(&self) -> bool {
        byte_bits(&self.data, 0x13, 0, 1) != 0
    }

    pub fn has_species(&self) -> bool {
        byte_bits(&self.data, 0x13, 1, 1) != 0
    }

    pub fn set_has_species(&mut self, on: bool) {
        set_byte_bits(&mut self.data, 0x13, 1, 1, on as u8)
    }

    /// Rank (0..=4) reached in one of the five contest categories.
    pub fn contest_ribbon_rank(&self, category: u32) -> u8 {
        word_bits(&self.data, RIBBON_WORD, 3 * category, 3) as u8
    }

    pub fn set_contest_ribbon_rank(&mut self, category: u32, rank: u8) {
        set_word_bits(&mut self.data, RIBBON_WORD, 3 * category, 3, rank.min(4) as u32)
    }

    fn ability_bit(&self) -> usize {
        word_bits(&self.data, IV_WORD, 31, 1) as usize
    }
}

impl Pkx for Pk3 {
    fn generation(&self) -> Generation {
        Generation::Three
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn box_len(&self) -> usize {
        PK3_SIZE_BOX
    }

    fn party_len(&self) -> usize {
        PK3_SIZE_PARTY
    }

    fn extension(&self) -> &'static str {
        "pk3"
    }

    fn encrypted(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        let checksum = sum16(&data[SUBSTRUCTURE_OFFSET..PK3_SIZE_BOX]);
        set_u16_le(&mut data, CHECKSUM_OFFSET, checksum);
        encrypt_gen3(&mut data);
        data
    }

    fn calc_checksum(&self) -> u16 {
        sum16(&self.data[SUBSTRUCTURE_OFFSET..PK3_SIZE_BOX])
    }

    fn checksum(&self) -> u16 {
        u16_le(&self.data, CHECKSUM_OFFSET)
    }

    fn set_checksum(&mut self, checksum: u16) {
        set_u16_le(&mut self.data, CHECKSUM_OFFSET, checksum)
    }

    fn pid(&self) -> u32 {
        u32_le(&self.data, 0x00)
    }

    fn set_pid(&mut self, pid: u32) {
        set_u32_le(&mut self.data, 0x00, pid)
    }

    fn trainer_id(&self) -> TrainerId {
        TrainerId::from_u32(u32_le(&self.data, 0x04))
    }

    fn set_trainer_id(&mut self, id: TrainerId) {
        set_u32_le(&mut self.data, 0x04, id.to_u32())
    }

    fn nickname(&self) -> String {
        read_string(&self.data, 0x08, 10, Charset::Gen3)
    }

    fn set_nickname(&mut self, name: &str) {
        write_string(&mut self.data, 0x08, 10, Charset::Gen3, name)
    }

    fn language(&self) -> u8 {
        self.data[0x12]
    }

    fn set_language(&mut self, language: u8) {
        self.data[0x12] = language;
    }

    fn ot_name(&self) -> String {
        read_string(&self.data, 0x14, 7, Charset::Gen3)
    }

    fn set_ot_name(&mut self, name: &str) {
        write_string(&mut self.data, 0x14, 7, Charset::Gen3, name)
    }

    fn markings(&self) -> u16 {
        self.data[0x1b] as u16
    }

    fn set_markings(&mut self, markings: u16) {
        self.data[0x1b] = markings as u8;
    }

    fn species(&self) -> u16 {
        u16_le(&self.data, GROWTH)
    }

    fn set_species(&mut self, species: u16) {
        set_u16_le(&mut self.data, GROWTH, species)
    }

    fn national_species(&self, tables: &dyn ReferenceTables) -> u16 {
        tables.national_from_internal(Generation::Three, self.species())
    }

    fn held_item(&self) -> u16 {
        u16_le(&self.data, GROWTH + 2)
    }

    fn set_held_item(&mut self, item: u16) {
        set_u16_le(&mut self.data, GROWTH + 2, item)
    }

    fn experience(&self) -> u32 {
        u32_le(&self.data, GROWTH + 4)
    }

    fn set_experience(&mut self, exp: u32) {
        set_u32_le(&mut self.data, GROWTH + 4, exp)
    }

    fn pp_ups(&self, slot: usize) -> u8 {
        byte_bits(&self.data, GROWTH + 8, 2 * slot as u32, 2)
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        set_byte_bits(&mut self.data, GROWTH + 8, 2 * slot as u32, 2, ups)
    }

    fn ot_friendship(&self) -> u8 {
        self.data[GROWTH + 9]
    }

    fn set_ot_friendship(&mut self, friendship: u8) {
        self.data[GROWTH + 9] = friendship;
    }

    fn move_id(&self, slot: usize) -> u16 {
        u16_le(&self.data, ATTACKS + 2 * slot)
    }

    fn set_move_id(&mut self, slot: usize, move_id: u16) {
        set_u16_le(&mut self.data, ATTACKS + 2 * slot, move_id)
    }

    fn pp(&self, slot: usize) -> u8 {
        self.data[ATTACKS + 8 + slot]
    }

    fn set_pp(&mut self, slot: usize, pp: u8) {
        self.data[ATTACKS + 8 + slot] = pp;
    }

    fn ev(&self, stat: Stat) -> u16 {
        self.data[EVS_CONDITIONS + stat.index()] as u16
    }

    fn set_ev(&mut self, stat: Stat, value: u16) {
        self.data[EVS_CONDITIONS + stat.index()] = value.min(255) as u8;
    }

    fn contest(&self, idx: usize) -> u8 {
        self.data[EVS_CONDITIONS + 6 + idx]
    }

    fn set_contest(&mut self, idx: usize, value: u8) {
        self.data[EVS_CONDITIONS + 6 + idx] = value;
    }

    fn pkrs_days(&self) -> u8 {
        byte_bits(&self.data, MISCELLANEOUS, 0, 4)
    }

    fn set_pkrs_days(&mut self, days: u8) {
        set_byte_bits(&mut self.data, MISCELLANEOUS, 0, 4, days)
    }

    fn pkrs_strain(&self) -> u8 {
        byte_bits(&self.data, MISCELLANEOUS, 4, 4)
    }

    fn set_pkrs_strain(&mut self, strain: u8) {
        set_byte_bits(&mut self.data, MISCELLANEOUS, 4, 4, strain)
    }

    fn met_location(&self) -> u16 {
        self.data[MISCELLANEOUS + 1] as u16
    }

    fn set_met_location(&mut self, location: u16) {
        self.data[MISCELLANEOUS + 1] = location as u8;
    }

    fn met_level(&self) -> u8 {
        (u16_le(&self.data, ORIGINS) & 0x7f) as u8
    }

    fn set_met_level(&mut self, level: u8) {
        let origins = (u16_le(&self.data, ORIGINS) & !0x7f) | (level as u16 & 0x7f);
        set_u16_le(&mut self.data, ORIGINS, origins)
    }

    fn version(&self) -> u8 {
        ((u16_le(&self.data, ORIGINS) >> 7) & 0xf) as u8
    }

    fn set_version(&mut self, version: u8) {
        let origins = (u16_le(&self.data, ORIGINS) & !(0xf << 7)) | ((version as u16 & 0xf) << 7);
        set_u16_le(&mut self.data, ORIGINS, origins)
    }

    fn ball(&self) -> u8 {
        ((u16_le(&self.data, ORIGINS) >> 11) & 0xf) as u8
    }

    fn set_ball(&mut self, ball: u8) {
        let origins = (u16_le(&self.data, ORIGINS) & !(0xf << 11)) | ((ball as u16 & 0xf) << 11);
        set_u16_le(&mut self.data, ORIGINS, origins)
    }

    fn ot_gender(&self) -> u8 {
        (u16_le(&self.data, ORIGINS) >> 15) as u8
    }

    fn set_ot_gender(&mut self, gender: u8) {
        let origins = (u16_le(&self.data, ORIGINS) & 0x7fff) | ((gender as u16 & 1) << 15);
        set_u16_le(&mut self.data, ORIGINS, origins)
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
        set_word_bits(&mut self.data, IV_WORD, 30, 1, egg as u32);
        set_byte_bits(&mut self.data, 0x13, 2, 1, egg as u8);
    }

    fn ability(&self, tables: &dyn ReferenceTables) -> u16 {
        self.personal(tables)
            .map(|info| info.abilities[self.ability_bit()])
            .unwrap_or(0)
    }

    fn ability_number(&self) -> u8 {
        1 << self.ability_bit()
    }

    fn set_ability_number(
        &mut self,
        number: u8,
        _tables: &dyn ReferenceTables,
        _rng: &mut dyn RngCore,
    ) -> bool {
        if number != 1 && number != 2 {
            debug!("gen 3 records have no ability slot {number}");
            return false;
        }
        set_word_bits(&mut self.data, IV_WORD, 31, 1, (number >> 1) as u32);
        true
    }

    fn fateful_encounter(&self) -> bool {
        word_bits(&self.data, RIBBON_WORD, 31, 1) != 0
    }

    fn set_fateful_encounter(&mut self, fateful: bool) {
        set_word_bits(&mut self.data, RIBBON_WORD, 31, 1, fateful as u32)
    }

    fn supports_ribbon(&self, ribbon: Ribbon) -> bool {
        gen3_flag_bit(ribbon).is_some() || gen3_contest_rank(ribbon).is_some()
    }

    fn has_ribbon(&self, ribbon: Ribbon) -> bool {
        if let Some(bit) = gen3_flag_bit(ribbon) {
            return word_bits(&self.data, RIBBON_WORD, bit, 1) != 0;
        }
        match gen3_contest_rank(ribbon) {
            Some((category, rank)) => self.contest_ribbon_rank(category) as u32 >= rank,
            None => false,
        }
    }

    fn set_ribbon(&mut self, ribbon: Ribbon, on: bool) {
        if let Some(bit) = gen3_flag_bit(ribbon) {
            set_word_bits(&mut self.data, RIBBON_WORD, bit, 1, on as u32);
            return;
        }
        if let Some((category, rank)) = gen3_contest_rank(ribbon) {
            let current = self.contest_ribbon_rank(category) as u32;
            if on && current < rank {
                self.set_contest_ribbon_rank(category, rank as u8);
            } else if !on && current >= rank {
                self.set_contest_ribbon_rank(category, rank as u8 - 1);
            }
        }
    }

    fn gender(&self, tables: &dyn ReferenceTables) -> Gender {
        gender_from_pid(self.pid(), self.gender_ratio(tables))
    }

    fn set_gender(
        &mut self,
        gender: Gender,
        tables: &dyn ReferenceTables,
        rng: &mut dyn RngCore,
    ) -> bool {
        let constraints = PidConstraints {
            gender: Some((gender, self.gender_ratio(tables))),
            ..self.pid_constraints(tables)
        };
        if constraints.matches(self.pid()) {
            return true;
        }
        self.reroll_pid(self.shiny(), &constraints, rng)
    }

    fn nature(&self) -> u8 {
        nature_from_pid(self.pid())
    }

    fn set_nature(
        &mut self,
        nature: u8,
        tables: &dyn ReferenceTables,
        rng: &mut dyn RngCore,
    ) -> bool {
        if self.nature() == nature {
            return true;
        }
        let constraints = PidConstraints {
            nature: Some(nature % 25),
            ..self.pid_constraints(tables)
        };
        self.reroll_pid(self.shiny(), &constraints, rng)
    }

    /// Only Unown has forms here, and its letter is fixed by the PID.
    fn form(&self) -> u8 {
        if self.species() == UNOWN {
            unown_form_from_pid(self.pid())
        } else {
            0
        }
    }

    fn set_form(&mut self, form: u8) {
        if form != self.form() {
            debug!("gen 3 forms follow the PID, ignoring form {form}");
        }
    }

    fn party_layout(&self) -> Option<PartyLayout> {
        Some(PartyLayout {
            status: 0x50,
            level: 0x54,
            current_hp: 0x56,
            stats: 0x58,
        })
    }

    fn pid_constraints(&self, tables: &dyn ReferenceTables) -> PidConstraints {
        PidConstraints {
            gender: Some((self.gender(tables), self.gender_ratio(tables))),
            nature: Some(self.nature()),
            ability: None,
            unown_form: (self.species() == UNOWN).then(|| self.form()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_record_reads_as_plain() {
        let pk3 = Pk3::empty(false);
        assert!(!Pk3::is_encrypted(pk3.data()));
        assert!(pk3.checksum_valid());
    }

    #[test]
    fn origins_fields_share_one_word() {
        let mut pk3 = Pk3::empty(false);
        pk3.set_met_level(42);
        pk3.set_version(3);
        pk3.set_ball(11);
        pk3.set_ot_gender(1);
        assert_eq!(pk3.met_level(), 42);
        assert_eq!(pk3.version(), 3);
        assert_eq!(pk3.ball(), 11);
        assert_eq!(pk3.ot_gender(), 1);
    }

    #[test]
    fn contest_ribbons_are_rank_counters() {
        let mut pk3 = Pk3::empty(false);
        pk3.set_ribbon(Ribbon::G3CuteHyper, true);
        assert_eq!(pk3.contest_ribbon_rank(2), 3);
        assert!(pk3.has_ribbon(Ribbon::G3Cute));
        assert!(pk3.has_ribbon(Ribbon::G3CuteSuper));
        assert!(!pk3.has_ribbon(Ribbon::G3CuteMaster));
        pk3.set_ribbon(Ribbon::G3CuteSuper, false);
        assert_eq!(pk3.contest_ribbon_rank(2), 1);
        pk3.set_ribbon(Ribbon::World, true);
        assert!(pk3.has_ribbon(Ribbon::World));
        assert!(!pk3.has_ribbon(Ribbon::ChampionKalos));
    }
}
