use log::{debug, trace};

use super::{Item, Pouch, PouchLayout, BOX_SLOTS};
use crate::{
    codec::{set_u16_le, u16_le},
    crypto::ccitt16,
    error::check_range,
    personal::{Limits, ReferenceTables},
    pokemon::{PK6_SIZE_BOX, PK6_SIZE_PARTY},
    text::{read_string, write_string, Charset},
    Error, Generation, Pkx, Pokemon, Result, TrainerId, TrainerInfo,
};

const SAVE_LENGTH: usize = 0x76000;
const MAX_BOXES: usize = 31;
const MAX_PARTY: usize = 6;

const TRAINER_CARD: usize = 0x14000;
const PARTY: usize = 0x14200;
const PARTY_COUNT: usize = PARTY + MAX_PARTY * PK6_SIZE_PARTY;
const POKEDEX: usize = 0x15000;
const DEX_LANGUAGES: usize = 0x15400;
const DEXNAV_ENCOUNTERS: usize = 0x15686;
const BOXES: usize = 0x33000;

const OT_NAME_LEN: usize = 13;

/// Owned, four seen regions (gender × shiny), then four displayed regions.
const DEX_REGION: usize = 0x60;
const DEX_LANGUAGE_COUNT: usize = 7;

/// Checksum of block `i` lives at `BLOCK_CHECKSUMS + 8 * i`.
const BLOCK_CHECKSUMS: usize = 0x75e1a;

const BLOCK_OFFSETS: [usize; 58] = [
    0x00000, 0x00400, 0x01000, 0x01200, 0x01400, 0x01600, 0x01800, 0x01a00, 0x01c00, 0x01e00,
    0x02000, 0x04200, 0x04400, 0x04a00, 0x05000, 0x0a000, 0x0f000, 0x14000, 0x14200, 0x14a00,
    0x15000, 0x16200, 0x16a00, 0x16c00, 0x16e00, 0x17400, 0x17600, 0x17a00, 0x18200, 0x18400,
    0x18600, 0x18800, 0x18a00, 0x18c00, 0x19400, 0x19a00, 0x19e00, 0x1ba00, 0x1bc00, 0x1c000,
    0x1c400, 0x1cc00, 0x1e800, 0x1ec00, 0x1f400, 0x1f800, 0x20200, 0x20600, 0x20e00, 0x21c00,
    0x21e00, 0x22000, 0x22e00, 0x23600, 0x23a00, 0x2b600, 0x33000, 0x67c00,
];

const BLOCK_LENGTHS: [usize; 58] = [
    0x002c8, 0x00b90, 0x0002c, 0x00038, 0x00150, 0x00004, 0x00008, 0x001c0, 0x000be, 0x00024,
    0x02100, 0x00130, 0x00440, 0x00574, 0x04e28, 0x04e28, 0x04e28, 0x00170, 0x0061c, 0x00504,
    0x011cc, 0x00644, 0x00104, 0x00004, 0x00420, 0x00064, 0x003f0, 0x0070c, 0x00180, 0x00004,
    0x0000c, 0x00048, 0x00054, 0x00644, 0x005c8, 0x002f8, 0x01b40, 0x001f4, 0x003e0, 0x00216,
    0x00640, 0x01a90, 0x00400, 0x00618, 0x0025c, 0x00834, 0x00318, 0x007d0, 0x00c48, 0x00078,
    0x00200, 0x00c84, 0x00628, 0x00400, 0x07ad0, 0x078b0, 0x34ad0, 0x0e058,
];

const POUCHES: [PouchLayout; 5] = [
    PouchLayout { pouch: Pouch::NormalItem, offset: 0x400, capacity: 305 },
    PouchLayout { pouch: Pouch::KeyItem, offset: 0xa40, capacity: 47 },
    PouchLayout { pouch: Pouch::Tm, offset: 0xbc0, capacity: 108 },
    PouchLayout { pouch: Pouch::Medicine, offset: 0xd70, capacity: 54 },
    PouchLayout { pouch: Pouch::Berry, offset: 0xe70, capacity: 67 },
];

/// Omega Ruby/Alpha Sapphire save.
#[derive(Clone, Debug)]
pub struct SavOras {
    data: Vec<u8>,
}

impl SavOras {
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.len() < SAVE_LENGTH {
            return Err(Error::SaveLength {
                expected: SAVE_LENGTH,
                actual: data.len(),
            });
        }
        Ok(SavOras { data })
    }

    pub fn generation(&self) -> Generation {
        Generation::Six
    }

    pub fn max_boxes(&self) -> usize {
        MAX_BOXES
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.finish_editing();
        self.data
    }

    /// Recomputes the CRC of every block.
    pub fn finish_editing(&mut self) {
        for (idx, (ofs, len)) in BLOCK_OFFSETS.iter().zip(BLOCK_LENGTHS).enumerate() {
            let crc = ccitt16(&self.data[*ofs..ofs + len]);
            set_u16_le(&mut self.data, BLOCK_CHECKSUMS + 8 * idx, crc);
        }
    }

    pub fn checksums_valid(&self) -> bool {
        BLOCK_OFFSETS
            .iter()
            .zip(BLOCK_LENGTHS)
            .enumerate()
            .all(|(idx, (ofs, len))| {
                ccitt16(&self.data[*ofs..ofs + len]) == u16_le(&self.data, BLOCK_CHECKSUMS + 8 * idx)
            })
    }

    pub fn trainer_id(&self) -> TrainerId {
        TrainerId::new(
            u16_le(&self.data, TRAINER_CARD),
            u16_le(&self.data, TRAINER_CARD + 2),
        )
    }

    pub fn set_trainer_id(&mut self, id: TrainerId) {
        set_u16_le(&mut self.data, TRAINER_CARD, id.public_id);
        set_u16_le(&mut self.data, TRAINER_CARD + 2, id.secret_id);
    }

    pub fn version(&self) -> u8 {
        self.data[TRAINER_CARD + 4]
    }

    pub fn gender(&self) -> u8 {
        self.data[TRAINER_CARD + 5]
    }

    pub fn set_gender(&mut self, gender: u8) {
        self.data[TRAINER_CARD + 5] = gender;
    }

    pub fn sub_region(&self) -> u8 {
        self.data[TRAINER_CARD + 0x26]
    }

    pub fn set_sub_region(&mut self, region: u8) {
        self.data[TRAINER_CARD + 0x26] = region;
    }

    pub fn country(&self) -> u8 {
        self.data[TRAINER_CARD + 0x27]
    }

    pub fn set_country(&mut self, country: u8) {
        self.data[TRAINER_CARD + 0x27] = country;
    }

    pub fn console_region(&self) -> u8 {
        self.data[TRAINER_CARD + 0x2c]
    }

    pub fn set_console_region(&mut self, region: u8) {
        self.data[TRAINER_CARD + 0x2c] = region;
    }

    pub fn language(&self) -> u8 {
        self.data[TRAINER_CARD + 0x2d]
    }

    pub fn set_language(&mut self, language: u8) {
        self.data[TRAINER_CARD + 0x2d] = language;
    }

    pub fn ot_name(&self) -> String {
        read_string(&self.data, TRAINER_CARD + 0x48, OT_NAME_LEN, Charset::Gen6)
    }

    pub fn set_ot_name(&mut self, name: &str) {
        write_string(&mut self.data, TRAINER_CARD + 0x48, OT_NAME_LEN, Charset::Gen6, name)
    }

    /// Trainer card as the destination of a transfer.
    pub fn trainer_info(&self) -> TrainerInfo {
        TrainerInfo {
            player_name: self.ot_name(),
            player_gender: self.gender(),
            id: self.trainer_id(),
            language: self.language(),
            country: self.country(),
            sub_region: self.sub_region(),
            console_region: self.console_region(),
        }
    }

    fn box_offset(box_number: usize, slot: usize) -> usize {
        BOXES + PK6_SIZE_BOX * (BOX_SLOTS * box_number + slot)
    }

    pub fn pokemon(&self, box_number: usize, slot: usize) -> Result<Pokemon> {
        check_range("box", box_number, MAX_BOXES)?;
        check_range("box slot", slot, BOX_SLOTS)?;
        trace!("Reading ORAS box {box_number} slot {slot}");
        let ofs = Self::box_offset(box_number, slot);
        Pokemon::from_bytes(Generation::Six, &self.data[ofs..ofs + PK6_SIZE_BOX])
    }

    /// Encrypts a record into a box slot. Records of other generations are refused with
    /// `Ok(false)`.
    pub fn set_pokemon(&mut self, box_number: usize, slot: usize, pkm: &Pokemon) -> Result<bool> {
        check_range("box", box_number, MAX_BOXES)?;
        check_range("box slot", slot, BOX_SLOTS)?;
        if pkm.generation() != Generation::Six {
            debug!("Refusing {} record in an ORAS box", pkm.generation());
            return Ok(false);
        }
        let ofs = Self::box_offset(box_number, slot);
        let encrypted = pkm.box_clone().as_pkx().encrypted();
        self.data[ofs..ofs + PK6_SIZE_BOX].copy_from_slice(&encrypted);
        Ok(true)
    }

    pub fn party_pokemon(&self, slot: usize) -> Result<Pokemon> {
        check_range("party slot", slot, MAX_PARTY)?;
        let ofs = PARTY + PK6_SIZE_PARTY * slot;
        Pokemon::from_bytes(Generation::Six, &self.data[ofs..ofs + PK6_SIZE_PARTY])
    }

    pub fn set_party_pokemon(
        &mut self,
        slot: usize,
        pkm: &Pokemon,
        tables: &dyn ReferenceTables,
    ) -> Result<bool> {
        check_range("party slot", slot, MAX_PARTY)?;
        if pkm.generation() != Generation::Six {
            debug!("Refusing {} record in an ORAS party", pkm.generation());
            return Ok(false);
        }
        let ofs = PARTY + PK6_SIZE_PARTY * slot;
        let encrypted = pkm.party_clone(tables).as_pkx().encrypted();
        self.data[ofs..ofs + PK6_SIZE_PARTY].copy_from_slice(&encrypted);
        Ok(true)
    }

    pub fn party_count(&self) -> u8 {
        self.data[PARTY_COUNT]
    }

    pub fn set_party_count(&mut self, count: u8) {
        self.data[PARTY_COUNT] = count.min(MAX_PARTY as u8);
    }

    pub fn pouches(&self) -> &'static [PouchLayout] {
        &POUCHES
    }

    fn pouch_slot(pouch: Pouch, slot: usize) -> Result<Option<usize>> {
        let Some(layout) = POUCHES.iter().find(|p| p.pouch == pouch) else {
            debug!("ORAS has no {pouch:?} pouch");
            return Ok(None);
        };
        check_range("pouch slot", slot, layout.capacity as usize)?;
        Ok(Some(layout.offset + slot * Item::LEN))
    }

    pub fn item(&self, pouch: Pouch, slot: usize) -> Result<Option<Item>> {
        Ok(Self::pouch_slot(pouch, slot)?.map(|ofs| Item::read(&self.data, ofs)))
    }

    pub fn set_item(&mut self, pouch: Pouch, slot: usize, item: Item) -> Result<bool> {
        match Self::pouch_slot(pouch, slot)? {
            Some(ofs) => {
                item.write(&mut self.data, ofs);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Registers a record: owned, seen for its gender and shininess, displayed if nothing
    /// is displayed yet, its language, and a first DexNav encounter. Eggs are ignored.
    pub fn dex(&mut self, pkm: &dyn Pkx, tables: &dyn ReferenceTables) {
        let species = pkm.national_species(tables);
        let max_species = Limits::for_generation(Generation::Six).max_species;
        if species == 0 || species > max_species || pkm.is_egg() {
            return;
        }

        let bit = (species - 1) as usize;
        let mask = 1u8 << (bit & 7);
        let ofs = POKEDEX + 8 + (bit >> 3);
        let gender = pkm.gender(tables) as usize % 2;
        let shiny = pkm.shiny() as usize;
        let variant = gender + 2 * shiny;

        self.data[ofs] |= mask;
        self.data[ofs + DEX_REGION * (1 + variant)] |= mask;

        let displayed = (5..9).any(|region| self.data[ofs + DEX_REGION * region] & mask != 0);
        if !displayed {
            self.data[ofs + DEX_REGION * (5 + variant)] |= mask;
        }

        let lang = dex_language_index(pkm.language());
        if lang < DEX_LANGUAGE_COUNT {
            let lang_bit = bit * DEX_LANGUAGE_COUNT + lang;
            self.data[DEX_LANGUAGES + lang_bit / 8] |= 1 << (lang_bit % 8);
        }

        let encounters = DEXNAV_ENCOUNTERS + bit * 2;
        if u16_le(&self.data, encounters) == 0 {
            set_u16_le(&mut self.data, encounters, 1);
        }
    }

    fn dex_bit(&self, region: usize, species: u16) -> bool {
        if species == 0 {
            return false;
        }
        let bit = (species - 1) as usize;
        self.data[POKEDEX + 8 + DEX_REGION * region + (bit >> 3)] & (1 << (bit & 7)) != 0
    }

    pub fn is_caught(&self, species: u16) -> bool {
        self.dex_bit(0, species)
    }

    pub fn is_seen(&self, species: u16) -> bool {
        (1..5).any(|region| self.dex_bit(region, species))
    }

    /// Whether the displayed flag is set for a gender (0 or 1) and shininess.
    pub fn is_displayed(&self, species: u16, gender: u8, shiny: bool) -> bool {
        self.dex_bit(5 + (gender as usize % 2) + 2 * shiny as usize, species)
    }

    pub fn dex_seen(&self) -> usize {
        let max = Limits::for_generation(Generation::Six).max_species;
        (1..=max).filter(|species| self.is_seen(*species)).count()
    }

    pub fn dex_caught(&self) -> usize {
        let max = Limits::for_generation(Generation::Six).max_species;
        (1..=max).filter(|species| self.is_caught(*species)).count()
    }
}

/// Seven language slots per species; the unused language id 6 is skipped.
fn dex_language_index(language: u8) -> usize {
    match language as i32 - 1 {
        lang if lang < 0 => 1,
        lang if lang > 5 => (lang - 1) as usize,
        lang => lang as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_table_ends_before_footer() {
        let end = BLOCK_OFFSETS[57] + BLOCK_LENGTHS[57];
        assert!(end <= BLOCK_CHECKSUMS);
        assert_eq!(BLOCK_LENGTHS[56], MAX_BOXES * BOX_SLOTS * PK6_SIZE_BOX);
    }

    #[test]
    fn party_count_follows_six_slots() {
        assert_eq!(PARTY_COUNT - PARTY, BLOCK_LENGTHS[18] - 4);
    }

    #[test]
    fn spanish_and_korean_share_no_slot() {
        assert_eq!(dex_language_index(1), 0);
        assert_eq!(dex_language_index(7), 5);
        assert_eq!(dex_language_index(8), 6);
        assert_eq!(dex_language_index(0), 1);
    }
}
