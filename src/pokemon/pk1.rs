use log::trace;
use rand::RngCore;

use super::{checked_buffer, Pkx};
use crate::{
    codec::{set_u16_be, set_u24_be, u16_be, u24_be},
    personal::{exp_for_level, ReferenceTables},
    Generation, Result, Stat, TrainerId,
};

pub const PK1_SIZE_BOX: usize = 33;
pub const PK1_SIZE_PARTY: usize = 44;

/// Big-endian DV word shared by both Game Boy formats: Atk, Def, Spe, Spc from the top nibble.
pub(super) fn dv(data: &[u8], ofs: usize, stat: Stat) -> u8 {
    let word = u16_be(data, ofs);
    let nibble = |shift: u16| ((word >> shift) & 0xf) as u8;
    match stat {
        Stat::Hp => {
            (nibble(12) & 1) << 3 | (nibble(8) & 1) << 2 | (nibble(4) & 1) << 1 | nibble(0) & 1
        }
        Stat::Atk => nibble(12),
        Stat::Def => nibble(8),
        Stat::Spe => nibble(4),
        Stat::SpA | Stat::SpD => nibble(0),
    }
}

pub(super) fn set_dv(data: &mut [u8], ofs: usize, stat: Stat, value: u8) {
    let shift = match stat {
        Stat::Hp => {
            trace!("HP DV is derived from the other four; ignoring write");
            return;
        }
        Stat::Atk => 12,
        Stat::Def => 8,
        Stat::Spe => 4,
        Stat::SpA | Stat::SpD => 0,
    };
    let word = u16_be(data, ofs) & !(0xf << shift) | ((value as u16 & 0xf) << shift);
    set_u16_be(data, ofs, word)
}

/// Stat experience slot; both special stats share the Special slot.
pub(super) fn stat_exp_offset(base: usize, stat: Stat) -> usize {
    let idx = match stat {
        Stat::SpA | Stat::SpD => 4,
        other => other.index(),
    };
    base + 2 * idx
}

pub(super) fn dv_shiny(data: &[u8], ofs: usize) -> bool {
    dv(data, ofs, Stat::Def) == 10
        && dv(data, ofs, Stat::Spe) == 10
        && dv(data, ofs, Stat::SpA) == 10
        && dv(data, ofs, Stat::Atk) & 2 != 0
}

pub(super) fn set_dv_shiny(data: &mut [u8], ofs: usize, shiny: bool) {
    if dv_shiny(data, ofs) == shiny {
        return;
    }
    if shiny {
        let atk = dv(data, ofs, Stat::Atk) | 2;
        set_dv(data, ofs, Stat::Atk, atk);
        for stat in [Stat::Def, Stat::Spe, Stat::SpA] {
            set_dv(data, ofs, stat, 10);
        }
    } else {
        let spe = dv(data, ofs, Stat::Spe) ^ 1;
        set_dv(data, ofs, Stat::Spe, spe);
    }
}

/// Smallest `r` with `r * r >= value`.
fn ceil_sqrt(value: u16) -> u32 {
    let value = value as u32;
    let mut root = 0;
    while root * root < value {
        root += 1;
    }
    root
}

/// Game Boy stat formula: DVs and stat experience, no nature.
pub(super) fn dv_stat(base: u8, dv: u8, stat_exp: u16, level: u8, stat: Stat) -> u16 {
    let level = level as u32;
    let core = ((base as u32 + dv as u32) * 2 + ceil_sqrt(stat_exp) / 4) * level / 100;
    let value = if stat == Stat::Hp {
        core + level + 10
    } else {
        core + 5
    };
    value as u16
}

/// PP byte: PP-ups in the top two bits, current PP below.
pub(super) fn pp_byte(pp: u8, ups: u8) -> u8 {
    (ups & 3) << 6 | (pp & 0x3f)
}

const MOVES: usize = 0x08;
const STAT_EXP: usize = 0x11;
const DVS: usize = 0x1b;
const PP: usize = 0x1d;

/// Red/Blue/Yellow record. Nickname and OT name live in the save's parallel lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pk1 {
    pub(crate) data: Vec<u8>,
}

impl Pk1 {
    pub fn new(data: &[u8]) -> Result<Self> {
        let data = checked_buffer(Generation::One, data, PK1_SIZE_BOX, PK1_SIZE_PARTY)?;
        Ok(Pk1 { data })
    }

    pub fn empty(party: bool) -> Self {
        let len = if party { PK1_SIZE_PARTY } else { PK1_SIZE_BOX };
        Pk1 { data: vec![0; len] }
    }

    pub fn catch_rate(&self) -> u8 {
        self.data[0x07]
    }

    pub fn set_catch_rate(&mut self, rate: u8) {
        self.data[0x07] = rate;
    }

    pub fn types(&self) -> [u8; 2] {
        [self.data[0x05], self.data[0x06]]
    }

    pub fn set_types(&mut self, types: [u8; 2]) {
        self.data[0x05] = types[0];
        self.data[0x06] = types[1];
    }

    pub fn box_level(&self) -> u8 {
        self.data[0x03]
    }
}

impl Pkx for Pk1 {
    fn generation(&self) -> Generation {
        Generation::One
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn box_len(&self) -> usize {
        PK1_SIZE_BOX
    }

    fn party_len(&self) -> usize {
        PK1_SIZE_PARTY
    }

    fn extension(&self) -> &'static str {
        "pk1"
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

    fn national_species(&self, tables: &dyn ReferenceTables) -> u16 {
        tables.national_from_internal(Generation::One, self.species())
    }

    fn held_item(&self) -> u16 {
        0
    }

    fn set_held_item(&mut self, _item: u16) {}

    fn trainer_id(&self) -> TrainerId {
        TrainerId::new(u16_be(&self.data, 0x0c), 0)
    }

    fn set_trainer_id(&mut self, id: TrainerId) {
        set_u16_be(&mut self.data, 0x0c, id.public_id)
    }

    fn experience(&self) -> u32 {
        u24_be(&self.data, 0x0e)
    }

    fn set_experience(&mut self, exp: u32) {
        set_u24_be(&mut self.data, 0x0e, exp)
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
        self.data[0x03] = level;
    }

    fn stat(&self, stat: Stat, tables: &dyn ReferenceTables) -> u16 {
        let base = self
            .personal(tables)
            .map(|info| info.base_stat(stat))
            .unwrap_or(0);
        dv_stat(base, self.iv(stat), self.ev(stat), self.level(tables), stat)
    }

    fn status(&self) -> u32 {
        self.data[0x04] as u32
    }

    fn set_status(&mut self, status: u32) {
        self.data[0x04] = status as u8;
    }

    fn current_hp(&self) -> u16 {
        u16_be(&self.data, 0x01)
    }

    fn set_current_hp(&mut self, hp: u16) {
        set_u16_be(&mut self.data, 0x01, hp)
    }

    fn party_level(&self) -> u8 {
        if self.is_party() {
            self.data[0x21]
        } else {
            0
        }
    }

    fn set_party_level(&mut self, level: u8) {
        self.data[0x03] = level;
        if self.is_party() {
            self.data[0x21] = level;
        }
    }

    fn party_stat(&self, stat: Stat) -> u16 {
        if self.is_party() {
            u16_be(&self.data, stat_exp_offset(0x22, stat))
        } else {
            0
        }
    }

    fn set_party_stat(&mut self, stat: Stat, value: u16) {
        if self.is_party() {
            set_u16_be(&mut self.data, stat_exp_offset(0x22, stat), value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_dv_collects_low_bits() {
        let mut pk1 = Pk1::empty(false);
        pk1.set_iv(Stat::Atk, 15);
        pk1.set_iv(Stat::Def, 14);
        pk1.set_iv(Stat::Spe, 13);
        pk1.set_iv(Stat::SpA, 12);
        assert_eq!(u16_be(&pk1.data, DVS), 0xfedc);
        assert_eq!(pk1.iv(Stat::Hp), 0b1010);
        assert_eq!(pk1.iv(Stat::SpD), 12);
    }

    #[test]
    fn shiny_dv_pattern() {
        let mut pk1 = Pk1::empty(false);
        set_u16_be(&mut pk1.data, DVS, 0xaaaa);
        assert!(pk1.shiny());
        set_u16_be(&mut pk1.data, DVS, 0x9aaa);
        assert!(!pk1.shiny());
        set_dv_shiny(&mut pk1.data, DVS, true);
        assert!(pk1.shiny());
        set_dv_shiny(&mut pk1.data, DVS, false);
        assert!(!pk1.shiny());
    }

    #[test]
    fn stat_exp_rounds_root_up() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(65535), 256);
        // Mewtwo HP at L100 with max DVs and stat experience.
        assert_eq!(dv_stat(106, 15, 65535, 100, Stat::Hp), 416);
        assert_eq!(dv_stat(154, 15, 65535, 100, Stat::SpA), 407);
    }

    #[test]
    fn pp_ups_share_the_pp_byte() {
        let mut pk1 = Pk1::empty(false);
        pk1.set_pp(0, 35);
        pk1.set_pp_ups(0, 3);
        assert_eq!(pk1.data[PP], 0xe3);
        assert_eq!(pk1.pp(0), 35);
        assert_eq!(pk1.pp_ups(0), 3);
    }
}
