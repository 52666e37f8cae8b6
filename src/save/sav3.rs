use log::{debug, error, trace};

use super::{compare_counters, CountType, TimePlayed, BOX_SLOTS};
use crate::{
    codec::{set_u16_le, set_u32_le, u16_le, u32_le},
    error::check_range,
    personal::ReferenceTables,
    pokemon::{PK3_SIZE_BOX, PK3_SIZE_PARTY},
    text::{decode_gen3, encode_gen3},
    Error, Generation, Pkx, Pokemon, Result, TrainerId, TrainerInfo,
};

const GAME_SAVE_DATA_LENGTH: usize = 131072;
const SAVE_INDEX_OFFSET: usize = 0x0ffc;
const SAVE_A_OFFSET: usize = 0x0000;
const SAVE_B_OFFSET: usize = 0xe000;
const SECTION_SIZE: usize = 0x1000;
const SECTION_DATA_SIZE: usize = 3968;
const SECTION_ID_OFFSET: usize = 0x0ff4;
const SECTION_CHECKSUM_OFFSET: usize = 0x0ff6;
const NUMBER_OF_SECTIONS: u8 = 14;
const FIRST_BOX_SECTION: u8 = 5;
const MAX_BOXES: usize = 14;
const MAX_PARTY: usize = 6;
const MAX_SPECIES: u16 = 386;

const PLAYER_NAME_LEN: usize = 7;
const PLAYER_GENDER_OFFSET: usize = 0x08;
const TRAINER_ID_OFFSET: usize = 0x0a;
const TIME_PLAYED_OFFSET: usize = 0x0e;
const GAME_CODE_OFFSET: usize = 0xac;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCode {
    RubySapphire,
    FireRedLeafGreen,
    Emerald,
}

impl GameCode {
    /// Emerald stores a security key where the other games keep the code.
    fn from_raw(data: u32) -> GameCode {
        match data {
            0 => GameCode::RubySapphire,
            1 => GameCode::FireRedLeafGreen,
            _ => GameCode::Emerald,
        }
    }

    fn team_size_offset(self) -> usize {
        match self {
            GameCode::RubySapphire | GameCode::Emerald => 0x0234,
            GameCode::FireRedLeafGreen => 0x0034,
        }
    }

    /// Owned flags, in section 0.
    fn pokedex_owned(self) -> usize {
        0x0028
    }

    /// First seen mirror, in section 0.
    fn pokedex_seen_a(self) -> usize {
        0x005c
    }

    /// Second seen mirror, in section 1.
    fn pokedex_seen_b(self) -> usize {
        match self {
            GameCode::RubySapphire => 0x0938,
            GameCode::Emerald => 0x0988,
            GameCode::FireRedLeafGreen => 0x05f8,
        }
    }

    /// Third seen mirror, in section 4.
    fn pokedex_seen_c(self) -> usize {
        match self {
            GameCode::RubySapphire => 0x0c0c,
            GameCode::Emerald => 0x0ca4,
            GameCode::FireRedLeafGreen => 0x0b98,
        }
    }
}

/// Ruby/Sapphire/Emerald/FireRed/LeafGreen flash image with two rotating save slots.
#[derive(Clone, Debug)]
pub struct Sav3 {
    full_contents: Vec<u8>,
    latest_save_offset: usize,
    section_rotation: u8,
    game_code: GameCode,
}

impl Sav3 {
    pub fn new(full_contents: Vec<u8>) -> Result<Self> {
        if full_contents.len() < GAME_SAVE_DATA_LENGTH {
            return Err(Error::SaveLength {
                expected: GAME_SAVE_DATA_LENGTH,
                actual: full_contents.len(),
            });
        }
        let latest_save_offset = determine_latest_game_save_offset(&full_contents);
        let section_rotation = determine_section_rotation(latest_save_offset, &full_contents);
        let mut save = Sav3 {
            full_contents,
            latest_save_offset,
            section_rotation,
            game_code: GameCode::RubySapphire,
        };
        let raw_code = u32_le(&save.full_contents, save.offset_for_section(0) + GAME_CODE_OFFSET);
        save.game_code = GameCode::from_raw(raw_code);
        debug!(
            "Loaded {:?} save, slot at {:#x}, rotation {}",
            save.game_code, save.latest_save_offset, save.section_rotation
        );
        Ok(save)
    }

    pub fn generation(&self) -> Generation {
        Generation::Three
    }

    pub fn game_code(&self) -> GameCode {
        self.game_code
    }

    pub fn max_boxes(&self) -> usize {
        MAX_BOXES
    }

    pub fn data(&self) -> &[u8] {
        &self.full_contents
    }

    /// Re-signs every section and hands back the image.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.recompute_checksums();
        self.full_contents
    }

    fn offset_for_section(&self, section_id: u8) -> usize {
        let physical = (section_id + self.section_rotation) % NUMBER_OF_SECTIONS;
        self.latest_save_offset + SECTION_SIZE * physical as usize
    }

    pub fn trainer_info(&self) -> TrainerInfo {
        let section_offset = self.offset_for_section(0);
        let section_data = &self.full_contents[section_offset..section_offset + SECTION_SIZE];
        TrainerInfo {
            player_name: decode_gen3(&section_data[..PLAYER_NAME_LEN]),
            player_gender: section_data[PLAYER_GENDER_OFFSET],
            id: TrainerId::from_u32(u32_le(section_data, TRAINER_ID_OFFSET)),
            language: 0,
            country: 0,
            sub_region: 0,
            console_region: 0,
        }
    }

    pub fn set_player_name(&mut self, name: &str) {
        let ofs = self.offset_for_section(0);
        let encoded = encode_gen3(name, PLAYER_NAME_LEN);
        self.full_contents[ofs..ofs + PLAYER_NAME_LEN].copy_from_slice(&encoded);
    }

    pub fn set_trainer_id(&mut self, id: TrainerId) {
        let ofs = self.offset_for_section(0) + TRAINER_ID_OFFSET;
        set_u32_le(&mut self.full_contents, ofs, id.to_u32());
    }

    pub fn time_played(&self) -> TimePlayed {
        let ofs = self.offset_for_section(0) + TIME_PLAYED_OFFSET;
        let data = &self.full_contents;
        TimePlayed {
            hours: u16_le(data, ofs),
            minutes: data[ofs + 2],
            seconds: data[ofs + 3],
            frames: data[ofs + 4],
        }
    }

    pub fn team_size(&self) -> usize {
        let ofs = self.offset_for_section(1) + self.game_code.team_size_offset();
        (u32_le(&self.full_contents, ofs) as usize).min(MAX_PARTY)
    }

    fn party_offset(&self, slot: usize) -> usize {
        self.offset_for_section(1) + self.game_code.team_size_offset() + 4 + slot * PK3_SIZE_PARTY
    }

    pub fn party(&self) -> Result<Vec<Pokemon>> {
        (0..self.team_size())
            .map(|slot| {
                let ofs = self.party_offset(slot);
                Pokemon::from_bytes(
                    Generation::Three,
                    &self.full_contents[ofs..ofs + PK3_SIZE_PARTY],
                )
            })
            .collect()
    }

    /// Writes a party slot and grows the team to include it. Non-gen-3 records are
    /// refused with `Ok(false)`.
    pub fn set_party_pokemon(
        &mut self,
        slot: usize,
        pkm: &Pokemon,
        tables: &dyn ReferenceTables,
    ) -> Result<bool> {
        check_range("party slot", slot, MAX_PARTY)?;
        if pkm.generation() != Generation::Three {
            debug!("Refusing {} record in a gen 3 party", pkm.generation());
            return Ok(false);
        }
        let party = pkm.party_clone(tables);
        let ofs = self.party_offset(slot);
        self.full_contents[ofs..ofs + PK3_SIZE_PARTY].copy_from_slice(&party.as_pkx().encrypted());
        if slot >= self.team_size() {
            let size_ofs = self.offset_for_section(1) + self.game_code.team_size_offset();
            set_u32_le(&mut self.full_contents, size_ofs, slot as u32 + 1);
        }
        Ok(true)
    }

    /// Every occupied slot of a box, keyed by 0-based slot.
    pub fn get_box(&self, box_number: usize) -> Result<Vec<(usize, Pokemon)>> {
        check_range("box", box_number, MAX_BOXES)?;
        let mut occupied = Vec::new();
        for slot in 0..BOX_SLOTS {
            if let Some(pkm) = self.box_pokemon(box_number, slot)? {
                occupied.push((slot, pkm));
            }
        }
        Ok(occupied)
    }

    pub fn box_pokemon(&self, box_number: usize, slot_number: usize) -> Result<Option<Pokemon>> {
        trace!("Getting pokemon from box {box_number}-{slot_number}");
        let pk3_data = self.read_box_slot(box_number, slot_number)?;
        if pk3_data.iter().any(|byte| *byte != 0x00) {
            Ok(Some(Pokemon::from_bytes(Generation::Three, &pk3_data)?))
        } else {
            Ok(None)
        }
    }

    /// Removes a record from its slot, re-signing the image.
    pub fn take_box_pokemon(
        &mut self,
        box_number: usize,
        slot_number: usize,
    ) -> Result<Option<Pokemon>> {
        trace!("Taking pokemon from box {box_number}-{slot_number}");
        let pkm = self.box_pokemon(box_number, slot_number)?;
        self.write_box_slot(box_number, slot_number, &[0u8; PK3_SIZE_BOX]);
        self.recompute_checksums();
        Ok(pkm)
    }

    /// Stores a record and marks it owned in the dex. An occupied slot is only
    /// overwritten with `force`; refusals report `Ok(false)`.
    pub fn put_box_pokemon(
        &mut self,
        box_number: usize,
        slot_number: usize,
        pkm: &Pokemon,
        force: bool,
        tables: &dyn ReferenceTables,
    ) -> Result<bool> {
        let existing = self.read_box_slot(box_number, slot_number)?;
        if pkm.generation() != Generation::Three {
            debug!("Refusing {} record in a gen 3 box", pkm.generation());
            return Ok(false);
        }
        if existing.iter().any(|byte| *byte != 0x00) && !force {
            return Ok(false);
        }
        let encrypted = pkm.as_pkx().encrypted();
        self.write_box_slot(box_number, slot_number, &encrypted[..PK3_SIZE_BOX]);
        self.dex(pkm.as_pkx(), tables);
        Ok(true)
    }

    fn read_box_slot(&self, box_number: usize, slot_number: usize) -> Result<[u8; PK3_SIZE_BOX]> {
        let (section_id, relative_offset) =
            compute_section_id_and_offset_for_box_slot(box_number, slot_number)?;
        let mut pk3_data = [0u8; PK3_SIZE_BOX];
        let section_offset = self.offset_for_section(section_id);
        let first = (SECTION_DATA_SIZE - relative_offset).min(PK3_SIZE_BOX);
        pk3_data[..first].copy_from_slice(
            &self.full_contents[section_offset + relative_offset..section_offset + relative_offset + first],
        );
        if first < PK3_SIZE_BOX {
            debug!("Box {box_number} slot {slot_number} straddles sections {section_id} and {}", section_id + 1);
            let next_offset = self.offset_for_section(section_id + 1);
            pk3_data[first..]
                .copy_from_slice(&self.full_contents[next_offset..next_offset + PK3_SIZE_BOX - first]);
        }
        Ok(pk3_data)
    }

    /// Callers check the slot first.
    fn write_box_slot(&mut self, box_number: usize, slot_number: usize, pk3_data: &[u8]) {
        let Ok((section_id, relative_offset)) =
            compute_section_id_and_offset_for_box_slot(box_number, slot_number)
        else {
            return;
        };
        let section_offset = self.offset_for_section(section_id);
        let first = (SECTION_DATA_SIZE - relative_offset).min(PK3_SIZE_BOX);
        self.full_contents[section_offset + relative_offset..section_offset + relative_offset + first]
            .copy_from_slice(&pk3_data[..first]);
        if first < PK3_SIZE_BOX {
            let next_offset = self.offset_for_section(section_id + 1);
            self.full_contents[next_offset..next_offset + PK3_SIZE_BOX - first]
                .copy_from_slice(&pk3_data[first..]);
        }
    }

    fn dex_offsets(&self) -> [usize; 4] {
        let code = self.game_code;
        [
            self.offset_for_section(0) + code.pokedex_owned(),
            self.offset_for_section(0) + code.pokedex_seen_a(),
            self.offset_for_section(1) + code.pokedex_seen_b(),
            self.offset_for_section(4) + code.pokedex_seen_c(),
        ]
    }

    /// Sets the owned flag and all three seen mirrors for a national dex number.
    pub fn mark_owned(&mut self, national: u16) {
        if national == 0 || national > MAX_SPECIES {
            debug!("No gen 3 dex entry for species {national}");
            return;
        }
        let bit_position = (national - 1) as usize;
        let byte_number = bit_position >> 3;
        let mask = 1u8 << (bit_position & 0b111);
        for offset in self.dex_offsets() {
            self.full_contents[offset + byte_number] |= mask;
        }
    }

    /// Registers a record in the dex. Eggs are ignored.
    pub fn dex(&mut self, pkm: &dyn Pkx, tables: &dyn ReferenceTables) {
        if pkm.is_egg() {
            return;
        }
        self.mark_owned(pkm.national_species(tables));
    }

    pub fn dex_owned(&self, national: u16) -> bool {
        self.dex_flag(0, national)
    }

    pub fn dex_seen(&self, national: u16) -> bool {
        self.dex_flag(1, national)
    }

    fn dex_flag(&self, region: usize, national: u16) -> bool {
        if national == 0 || national > MAX_SPECIES {
            return false;
        }
        let bit_position = (national - 1) as usize;
        let ofs = self.dex_offsets()[region] + (bit_position >> 3);
        self.full_contents[ofs] & (1 << (bit_position & 0b111)) != 0
    }

    pub fn verify_sections(&self) -> Result<()> {
        for section_id in 0..NUMBER_OF_SECTIONS {
            let section_offset = self.offset_for_section(section_id);
            let section_data = &self.full_contents[section_offset..section_offset + SECTION_SIZE];
            let checksum = compute_section_checksum(&section_data[..SECTION_DATA_SIZE]);
            let actual_checksum = u16_le(section_data, SECTION_CHECKSUM_OFFSET);
            if checksum != actual_checksum {
                error!("Computed checksum {checksum:#x} for section {section_id}, but checksum was {actual_checksum:#x}");
                return Err(Error::Checksum {
                    section: section_id,
                    computed: checksum,
                    stored: actual_checksum,
                });
            }
        }
        Ok(())
    }

    pub fn recompute_checksums(&mut self) {
        for section_id in 0..NUMBER_OF_SECTIONS {
            let section_offset = self.offset_for_section(section_id);
            let checksum = compute_section_checksum(
                &self.full_contents[section_offset..section_offset + SECTION_DATA_SIZE],
            );
            set_u16_le(
                &mut self.full_contents,
                section_offset + SECTION_CHECKSUM_OFFSET,
                checksum,
            );
        }
    }
}

fn determine_latest_game_save_offset(save_data: &[u8]) -> usize {
    let save_index_a = u32_le(save_data, SAVE_A_OFFSET + SAVE_INDEX_OFFSET);
    let save_index_b = u32_le(save_data, SAVE_B_OFFSET + SAVE_INDEX_OFFSET);
    match compare_counters(save_index_a, save_index_b) {
        CountType::Second => SAVE_B_OFFSET,
        CountType::First | CountType::Same => SAVE_A_OFFSET,
    }
}

fn determine_section_rotation(save_offset: usize, save_data: &[u8]) -> u8 {
    let section_id = u16_le(save_data, save_offset + SECTION_ID_OFFSET) as u8 % NUMBER_OF_SECTIONS;
    (NUMBER_OF_SECTIONS - section_id) % NUMBER_OF_SECTIONS
}

/// Folded 32-bit sum of the section's data words.
fn compute_section_checksum(data: &[u8]) -> u16 {
    let checksum = data
        .chunks_exact(4)
        .fold(0u32, |acc, word| acc.wrapping_add(u32_le(word, 0)));
    let checksum_lower = (checksum & 0xffff) as u16;
    let checksum_upper = (checksum >> 16) as u16;
    checksum_upper.wrapping_add(checksum_lower)
}

/// Boxes are one stream starting 4 bytes into section 5, after the current-box word.
fn compute_section_id_and_offset_for_box_slot(
    box_number: usize,
    box_entry: usize,
) -> Result<(u8, usize)> {
    check_range("box", box_number, MAX_BOXES)?;
    check_range("box slot", box_entry, BOX_SLOTS)?;
    let absolute_entry = box_number * BOX_SLOTS + box_entry;
    let absolute_offset = absolute_entry * PK3_SIZE_BOX + 4;
    let section_id = FIRST_BOX_SECTION as usize + absolute_offset / SECTION_DATA_SIZE;
    Ok((section_id as u8, absolute_offset % SECTION_DATA_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_slot_skips_current_box_word() {
        assert_eq!(compute_section_id_and_offset_for_box_slot(0, 0).unwrap(), (5, 4));
    }

    #[test]
    fn slot_49_straddles_sections() {
        // 49 * 80 + 4 = 3924, 44 bytes short of the section end
        let (section, ofs) = compute_section_id_and_offset_for_box_slot(1, 19).unwrap();
        assert_eq!((section, ofs), (5, 3924));
        assert!(ofs + PK3_SIZE_BOX > SECTION_DATA_SIZE);
    }

    #[test]
    fn last_slot_lands_in_last_section() {
        let (section, _) = compute_section_id_and_offset_for_box_slot(13, 29).unwrap();
        assert_eq!(section, 13);
    }

    #[test]
    fn out_of_range_box_is_rejected() {
        assert!(compute_section_id_and_offset_for_box_slot(14, 0).is_err());
        assert!(compute_section_id_and_offset_for_box_slot(0, 30).is_err());
    }

    #[test]
    fn checksum_folds_carry() {
        let mut data = vec![0u8; SECTION_DATA_SIZE];
        set_u32_le(&mut data, 0, 0x0001_ffff);
        set_u32_le(&mut data, 4, 0x0000_0001);
        // 0x0002_0000 folds to 0x0002
        assert_eq!(compute_section_checksum(&data), 0x0002);
    }
}
