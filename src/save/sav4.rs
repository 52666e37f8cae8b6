//! Diamond/Pearl, Platinum and HeartGold/SoulSilver saves.
//!
//! The 512 KiB image holds two copies of a general block and a storage block. Each block
//! carries its own save counters, so the active copy of each is resolved independently.

use log::{debug, trace};

use super::{
    compare_counters, CountType, Item, Pouch, PouchLayout, TimePlayed, BOX_SLOTS,
};
use crate::{
    codec::{set_u16_le, set_u32_le, u16_le, u32_le},
    crypto::ccitt16,
    error::check_range,
    personal::{Limits, ReferenceTables, GENDER_FEMALE_ONLY, GENDER_MALE_ONLY, GENDER_UNKNOWN},
    pokemon::{Pk4, PK4_SIZE_BOX, PK4_SIZE_PARTY},
    text::{read_string, write_string, Charset},
    Date, Error, Generation, Pkx, Pokemon, Result, TrainerId, TrainerInfo,
};

const SAVE_LENGTH: usize = 0x80000;
const HALF_STRIDE: usize = 0x40000;
const FOOTER_CHECKSUM: usize = 0x0e;
const MAX_BOXES: usize = 18;
const MAX_PARTY: usize = 6;

const OT_NAME_LEN: usize = 8;
const BOX_NAME_LEN: usize = 9;
const BOX_NAME_STRIDE: usize = 0x28;

/// Pokédex bit regions: owned, seen, then the two gender-display toggles.
const DEX_REGION: usize = 0x40;
const DEX_FORMS: usize = 4 + 4 * DEX_REGION + 4;
const DEX_LATE_FORMS: usize = 0x1f4;
const EMPTY_FORM: u8 = 0xff;

const LOCATION_FARAWAY: u16 = 2002;

const SPECIES_UNOWN: u16 = 201;
const SPECIES_DEOXYS: u16 = 386;
const SPECIES_BURMY: u16 = 412;
const SPECIES_WORMADAM: u16 = 413;
const SPECIES_SHELLOS: u16 = 422;
const SPECIES_GASTRODON: u16 = 423;
const SPECIES_ROTOM: u16 = 479;
const SPECIES_GIRATINA: u16 = 487;
const SPECIES_SHAYMIN: u16 = 492;
const SPECIES_PICHU: u16 = 172;

/// Where the dex keeps the forms seen for a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormStore {
    /// `count` fields of `bits` each, packed at `offset` into the form block.
    Packed { offset: usize, bits: u32, count: usize },
    /// Packed fields that follow the language flags.
    PackedLate { offset: usize, bits: u32, count: usize },
    /// Four 4-bit fields in the last byte of the owned and seen regions.
    RegionTail,
    /// Unordered byte list of `len` forms.
    List { offset: usize, len: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DexForm {
    pub species: u16,
    pub store: FormStore,
    /// Slots hold the gender, or 2 for the alternate form, instead of the form index.
    pub by_gender: bool,
}

const fn dex_form(species: u16, store: FormStore) -> DexForm {
    DexForm {
        species,
        store,
        by_gender: false,
    }
}

const SINNOH_FORMS: [DexForm; 6] = [
    dex_form(SPECIES_SHELLOS, FormStore::Packed { offset: 0, bits: 1, count: 2 }),
    dex_form(SPECIES_GASTRODON, FormStore::Packed { offset: 1, bits: 1, count: 2 }),
    dex_form(SPECIES_BURMY, FormStore::Packed { offset: 2, bits: 2, count: 3 }),
    dex_form(SPECIES_WORMADAM, FormStore::Packed { offset: 3, bits: 2, count: 3 }),
    dex_form(SPECIES_UNOWN, FormStore::List { offset: 4, len: 0x1c }),
    dex_form(SPECIES_DEOXYS, FormStore::RegionTail),
];

const PLATINUM_FORMS: [DexForm; 9] = [
    SINNOH_FORMS[0],
    SINNOH_FORMS[1],
    SINNOH_FORMS[2],
    SINNOH_FORMS[3],
    SINNOH_FORMS[4],
    SINNOH_FORMS[5],
    dex_form(SPECIES_ROTOM, FormStore::PackedLate { offset: 0, bits: 3, count: 6 }),
    dex_form(SPECIES_SHAYMIN, FormStore::PackedLate { offset: 4, bits: 1, count: 2 }),
    dex_form(SPECIES_GIRATINA, FormStore::PackedLate { offset: 5, bits: 1, count: 2 }),
];

const HGSS_FORMS: [DexForm; 10] = [
    SINNOH_FORMS[0],
    SINNOH_FORMS[1],
    SINNOH_FORMS[2],
    SINNOH_FORMS[3],
    SINNOH_FORMS[4],
    SINNOH_FORMS[5],
    PLATINUM_FORMS[6],
    PLATINUM_FORMS[7],
    PLATINUM_FORMS[8],
    DexForm {
        species: SPECIES_PICHU,
        store: FormStore::PackedLate { offset: 6, bits: 2, count: 3 },
        by_gender: true,
    },
];

/// Species whose dex entry records languages in Diamond/Pearl, in flag order.
const DP_LANGUAGE_SPECIES: [u16; 14] = [
    23, 25, 54, 77, 120, 129, 202, 214, 215, 216, 228, 278, 287, 315,
];

const fn pouch(pouch: Pouch, offset: usize, capacity: u16) -> PouchLayout {
    PouchLayout {
        pouch,
        offset,
        capacity,
    }
}

const DP_POUCHES: [PouchLayout; 8] = [
    pouch(Pouch::NormalItem, 0x624, 161),
    pouch(Pouch::KeyItem, 0x8b8, 37),
    pouch(Pouch::Tm, 0x980, 100),
    pouch(Pouch::Mail, 0xb10, 12),
    pouch(Pouch::Medicine, 0xb40, 38),
    pouch(Pouch::Berry, 0xbe0, 64),
    pouch(Pouch::Ball, 0xce0, 15),
    pouch(Pouch::Battle, 0xd1c, 13),
];

const PT_POUCHES: [PouchLayout; 8] = [
    pouch(Pouch::NormalItem, 0x630, 162),
    pouch(Pouch::KeyItem, 0x8c4, 40),
    pouch(Pouch::Tm, 0x98c, 100),
    pouch(Pouch::Mail, 0xb1c, 12),
    pouch(Pouch::Medicine, 0xb4c, 38),
    pouch(Pouch::Berry, 0xbec, 64),
    pouch(Pouch::Ball, 0xcec, 15),
    pouch(Pouch::Battle, 0xd28, 13),
];

const HGSS_POUCHES: [PouchLayout; 8] = [
    pouch(Pouch::NormalItem, 0x644, 162),
    pouch(Pouch::KeyItem, 0x8d8, 38),
    pouch(Pouch::Tm, 0x9a0, 101),
    pouch(Pouch::Mail, 0xb34, 12),
    pouch(Pouch::Medicine, 0xb64, 38),
    pouch(Pouch::Berry, 0xc04, 64),
    pouch(Pouch::Ball, 0xd04, 24),
    pouch(Pouch::Battle, 0xd64, 13),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Game4 {
    DiamondPearl,
    Platinum,
    HeartGoldSoulSilver,
}

impl Game4 {
    pub fn layout(self) -> &'static Layout4 {
        match self {
            Game4::DiamondPearl => &Layout4::DIAMOND_PEARL,
            Game4::Platinum => &Layout4::PLATINUM,
            Game4::HeartGoldSoulSilver => &Layout4::HEARTGOLD_SOULSILVER,
        }
    }
}

/// Offsets of one gen 4 game, relative to the active half of their block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout4 {
    /// Save counters of the general block; the CRC sits 0x0e past them.
    pub general_footer: usize,
    /// The general CRC covers `0..general_end`.
    pub general_end: usize,
    pub storage_footer: usize,
    pub storage_start: usize,
    pub storage_end: usize,
    pub trainer: usize,
    pub party: usize,
    pub pokedex: usize,
    pub boxes: usize,
    /// Bytes between consecutive boxes.
    pub box_padding: usize,
    /// Extra bytes before the box names.
    pub box_name_skip: usize,
    /// Added to stored special wallpapers (0x10 and up).
    pub wallpaper_shift: u8,
    /// Current box byte follows the box data instead of preceding it.
    pub current_box_after_boxes: bool,
    pub second_badge_byte: Option<usize>,
    /// Distance from the form block to the language flags.
    pub language_flags: usize,
    pub pouches: &'static [PouchLayout],
    pub dex_forms: &'static [DexForm],
    /// Only these species record languages, indexed from 1.
    pub language_species: Option<&'static [u16]>,
}

impl Layout4 {
    pub const DIAMOND_PEARL: Layout4 = Layout4 {
        general_footer: 0xc0f0,
        general_end: 0xc0ec,
        storage_footer: 0x1e2d0,
        storage_start: 0xc100,
        storage_end: 0x1e2cc,
        trainer: 0x64,
        party: 0x98,
        pokedex: 0x12dc,
        boxes: 0xc104,
        box_padding: 0,
        box_name_skip: 0,
        wallpaper_shift: 0,
        current_box_after_boxes: false,
        second_badge_byte: None,
        language_flags: 0x20,
        pouches: &DP_POUCHES,
        dex_forms: &SINNOH_FORMS,
        language_species: Some(&DP_LANGUAGE_SPECIES),
    };

    pub const PLATINUM: Layout4 = Layout4 {
        general_footer: 0xcf1c,
        general_end: 0xcf18,
        storage_footer: 0x1f100,
        storage_start: 0xcf2c,
        storage_end: 0x1f0fc,
        trainer: 0x68,
        party: 0xa0,
        pokedex: 0x1328,
        boxes: 0xcf30,
        box_padding: 0,
        box_name_skip: 0,
        wallpaper_shift: 0x08,
        current_box_after_boxes: false,
        second_badge_byte: None,
        language_flags: 0x20,
        pouches: &PT_POUCHES,
        dex_forms: &PLATINUM_FORMS,
        language_species: None,
    };

    pub const HEARTGOLD_SOULSILVER: Layout4 = Layout4 {
        general_footer: 0xf618,
        general_end: 0xf618,
        storage_footer: 0x21a00,
        storage_start: 0xf700,
        storage_end: 0x21a00,
        trainer: 0x64,
        party: 0x98,
        pokedex: 0x12b8,
        boxes: 0xf700,
        box_padding: 0x10,
        box_name_skip: 0x08,
        wallpaper_shift: 0x10,
        current_box_after_boxes: true,
        second_badge_byte: Some(0x1f),
        language_flags: 0x3c,
        pouches: &HGSS_POUCHES,
        dex_forms: &HGSS_FORMS,
        language_species: None,
    };
}

#[derive(Clone, Debug)]
pub struct Sav4 {
    data: Vec<u8>,
    game: Game4,
    layout: &'static Layout4,
    gbo: usize,
    sbo: usize,
}

impl Sav4 {
    pub fn new(data: Vec<u8>, game: Game4) -> Result<Self> {
        if data.len() < SAVE_LENGTH {
            return Err(Error::SaveLength {
                expected: SAVE_LENGTH,
                actual: data.len(),
            });
        }
        let layout = game.layout();
        let gbo = active_half(&data, layout.general_footer);
        let sbo = active_half(&data, layout.storage_footer);
        debug!("{game:?} save: general block at {gbo:#x}, storage block at {sbo:#x}");
        Ok(Sav4 {
            data,
            game,
            layout,
            gbo,
            sbo,
        })
    }

    pub fn game(&self) -> Game4 {
        self.game
    }

    pub fn generation(&self) -> Generation {
        Generation::Four
    }

    pub fn max_boxes(&self) -> usize {
        MAX_BOXES
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Re-signs both blocks and hands back the image.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.finish_editing();
        self.data
    }

    /// Offset of the active general block half.
    pub fn general_offset(&self) -> usize {
        self.gbo
    }

    /// Offset of the active storage block half.
    pub fn storage_offset(&self) -> usize {
        self.sbo
    }

    fn general_ranges(&self) -> (usize, usize, usize) {
        (
            self.gbo,
            self.gbo + self.layout.general_end,
            self.gbo + self.layout.general_footer + FOOTER_CHECKSUM,
        )
    }

    fn storage_ranges(&self) -> (usize, usize, usize) {
        (
            self.sbo + self.layout.storage_start,
            self.sbo + self.layout.storage_end,
            self.sbo + self.layout.storage_footer + FOOTER_CHECKSUM,
        )
    }

    /// Recomputes the CRC of both active blocks.
    pub fn finish_editing(&mut self) {
        for (start, end, chk) in [self.general_ranges(), self.storage_ranges()] {
            let crc = ccitt16(&self.data[start..end]);
            set_u16_le(&mut self.data, chk, crc);
        }
    }

    pub fn checksums_valid(&self) -> bool {
        [self.general_ranges(), self.storage_ranges()]
            .into_iter()
            .all(|(start, end, chk)| ccitt16(&self.data[start..end]) == u16_le(&self.data, chk))
    }

    fn trainer(&self) -> usize {
        self.gbo + self.layout.trainer
    }

    pub fn ot_name(&self) -> String {
        read_string(&self.data, self.trainer(), OT_NAME_LEN, Charset::Gen4)
    }

    pub fn set_ot_name(&mut self, name: &str) {
        let ofs = self.trainer();
        write_string(&mut self.data, ofs, OT_NAME_LEN, Charset::Gen4, name)
    }

    pub fn trainer_id(&self) -> TrainerId {
        let ofs = self.trainer();
        TrainerId::new(u16_le(&self.data, ofs + 0x10), u16_le(&self.data, ofs + 0x12))
    }

    pub fn set_trainer_id(&mut self, id: TrainerId) {
        let ofs = self.trainer();
        set_u16_le(&mut self.data, ofs + 0x10, id.public_id);
        set_u16_le(&mut self.data, ofs + 0x12, id.secret_id);
    }

    pub fn money(&self) -> u32 {
        u32_le(&self.data, self.trainer() + 0x14)
    }

    pub fn set_money(&mut self, money: u32) {
        let ofs = self.trainer() + 0x14;
        set_u32_le(&mut self.data, ofs, money)
    }

    pub fn gender(&self) -> u8 {
        self.data[self.trainer() + 0x18]
    }

    pub fn set_gender(&mut self, gender: u8) {
        let ofs = self.trainer() + 0x18;
        self.data[ofs] = gender;
    }

    pub fn language(&self) -> u8 {
        self.data[self.trainer() + 0x19]
    }

    pub fn set_language(&mut self, language: u8) {
        let ofs = self.trainer() + 0x19;
        self.data[ofs] = language;
    }

    /// Number of badges earned, counting Kanto badges in HGSS.
    pub fn badges(&self) -> u32 {
        let ofs = self.trainer();
        let mut count = self.data[ofs + 0x1a].count_ones();
        if let Some(second) = self.layout.second_badge_byte {
            count += self.data[ofs + second].count_ones();
        }
        count
    }

    /// Game Corner coins.
    pub fn coins(&self) -> u16 {
        u16_le(&self.data, self.trainer() + 0x20)
    }

    pub fn set_coins(&mut self, coins: u16) {
        let ofs = self.trainer() + 0x20;
        set_u16_le(&mut self.data, ofs, coins)
    }

    pub fn time_played(&self) -> TimePlayed {
        let ofs = self.trainer();
        TimePlayed {
            hours: u16_le(&self.data, ofs + 0x22),
            minutes: self.data[ofs + 0x24],
            seconds: self.data[ofs + 0x25],
            frames: 0,
        }
    }

    pub fn set_time_played(&mut self, time: TimePlayed) {
        let ofs = self.trainer();
        set_u16_le(&mut self.data, ofs + 0x22, time.hours);
        self.data[ofs + 0x24] = time.minutes;
        self.data[ofs + 0x25] = time.seconds;
    }

    pub fn trainer_info(&self) -> TrainerInfo {
        TrainerInfo {
            player_name: self.ot_name(),
            player_gender: self.gender(),
            id: self.trainer_id(),
            language: self.language(),
            country: 0,
            sub_region: 0,
            console_region: 0,
        }
    }

    fn box_offset(&self, box_number: usize, slot: usize) -> usize {
        self.sbo
            + self.layout.boxes
            + PK4_SIZE_BOX * BOX_SLOTS * box_number
            + self.layout.box_padding * box_number
            + PK4_SIZE_BOX * slot
    }

    fn party_offset(&self, slot: usize) -> usize {
        self.gbo + self.layout.party + PK4_SIZE_PARTY * slot
    }

    fn current_box_offset(&self) -> usize {
        if self.layout.current_box_after_boxes {
            self.box_offset(MAX_BOXES, 0)
        } else {
            self.sbo + self.layout.boxes - 4
        }
    }

    pub fn current_box(&self) -> u8 {
        self.data[self.current_box_offset()]
    }

    pub fn set_current_box(&mut self, box_number: u8) -> Result<()> {
        check_range("box", box_number as usize, MAX_BOXES)?;
        let ofs = self.current_box_offset();
        self.data[ofs] = box_number;
        Ok(())
    }

    /// Decrypted copy of a box slot.
    pub fn pokemon(&self, box_number: usize, slot: usize) -> Result<Pokemon> {
        check_range("box", box_number, MAX_BOXES)?;
        check_range("box slot", slot, BOX_SLOTS)?;
        trace!("Reading gen 4 box {box_number} slot {slot}");
        let ofs = self.box_offset(box_number, slot);
        Pokemon::from_bytes(Generation::Four, &self.data[ofs..ofs + PK4_SIZE_BOX])
    }

    /// Encrypts a record into a box slot, applying [`Sav4::trade`] when a date is given.
    /// Records of other generations are refused with `Ok(false)`.
    pub fn set_pokemon(
        &mut self,
        box_number: usize,
        slot: usize,
        pkm: &Pokemon,
        trade_date: Option<Date>,
    ) -> Result<bool> {
        check_range("box", box_number, MAX_BOXES)?;
        check_range("box slot", slot, BOX_SLOTS)?;
        if pkm.generation() != Generation::Four {
            debug!("Refusing {} record in a gen 4 box", pkm.generation());
            return Ok(false);
        }
        let mut stored = pkm.box_clone();
        if let Some(date) = trade_date {
            self.trade(stored.as_pkx_mut(), date);
        }
        let ofs = self.box_offset(box_number, slot);
        self.data[ofs..ofs + PK4_SIZE_BOX].copy_from_slice(&stored.as_pkx().encrypted());
        Ok(true)
    }

    pub fn party_pokemon(&self, slot: usize) -> Result<Pokemon> {
        check_range("party slot", slot, MAX_PARTY)?;
        let ofs = self.party_offset(slot);
        Pokemon::from_bytes(Generation::Four, &self.data[ofs..ofs + PK4_SIZE_PARTY])
    }

    /// Encrypts a party-length copy, with recomputed battle stats, into a party slot.
    pub fn set_party_pokemon(
        &mut self,
        slot: usize,
        pkm: &Pokemon,
        tables: &dyn ReferenceTables,
    ) -> Result<bool> {
        check_range("party slot", slot, MAX_PARTY)?;
        if pkm.generation() != Generation::Four {
            debug!("Refusing {} record in a gen 4 party", pkm.generation());
            return Ok(false);
        }
        let party = pkm.party_clone(tables);
        let ofs = self.party_offset(slot);
        self.data[ofs..ofs + PK4_SIZE_PARTY].copy_from_slice(&party.as_pkx().encrypted());
        Ok(true)
    }

    pub fn party_count(&self) -> u8 {
        self.data[self.gbo + self.layout.party - 4]
    }

    pub fn set_party_count(&mut self, count: u8) {
        let ofs = self.gbo + self.layout.party - 4;
        self.data[ofs] = count.min(MAX_PARTY as u8);
    }

    /// Eggs received from another trainer take the faraway-place met data.
    pub fn trade(&self, pkm: &mut dyn Pkx, date: Date) {
        if pkm.generation() != Generation::Four || !pkm.is_egg() {
            return;
        }
        let id = self.trainer_id();
        let foreign = pkm.ot_name() != self.ot_name()
            || pkm.trainer_id() != id
            || pkm.ot_gender() != self.gender();
        if foreign {
            pkm.set_met_location(LOCATION_FARAWAY);
            pkm.set_met_date(date);
        }
    }

    /// Encrypts or decrypts every box slot in place.
    pub fn crypt_box_data(&mut self, encrypt: bool) {
        for box_number in 0..MAX_BOXES {
            for slot in 0..BOX_SLOTS {
                let ofs = self.box_offset(box_number, slot);
                let raw = &self.data[ofs..ofs + PK4_SIZE_BOX];
                let encrypted = Pk4::is_encrypted(raw);
                let bytes = match (encrypt, encrypted) {
                    (true, false) => Pk4::from_decrypted(raw).map(|pkm| pkm.encrypted()),
                    (false, true) => Pk4::new(raw).map(|pkm| pkm.data().to_vec()),
                    _ => continue,
                };
                if let Ok(bytes) = bytes {
                    self.data[ofs..ofs + PK4_SIZE_BOX].copy_from_slice(&bytes);
                }
            }
        }
    }

    fn box_name_offset(&self, box_number: usize) -> usize {
        self.box_offset(MAX_BOXES, 0) + self.layout.box_name_skip + BOX_NAME_STRIDE * box_number
    }

    pub fn box_name(&self, box_number: usize) -> Result<String> {
        check_range("box name", box_number, MAX_BOXES)?;
        let ofs = self.box_name_offset(box_number);
        Ok(read_string(&self.data, ofs, BOX_NAME_LEN, Charset::Gen4))
    }

    pub fn set_box_name(&mut self, box_number: usize, name: &str) -> Result<()> {
        check_range("box name", box_number, MAX_BOXES)?;
        let ofs = self.box_name_offset(box_number);
        write_string(&mut self.data, ofs, BOX_NAME_LEN, Charset::Gen4, name);
        Ok(())
    }

    fn wallpaper_offset(&self, box_number: usize) -> usize {
        self.box_name_offset(MAX_BOXES) + box_number
    }

    /// Wallpaper index with the special wallpapers normalised to start at 0x10.
    pub fn box_wallpaper(&self, box_number: usize) -> Result<u8> {
        check_range("box wallpaper", box_number, MAX_BOXES)?;
        let stored = self.data[self.wallpaper_offset(box_number)];
        Ok(if stored >= 0x10 {
            stored - self.layout.wallpaper_shift
        } else {
            stored
        })
    }

    pub fn set_box_wallpaper(&mut self, box_number: usize, wallpaper: u8) -> Result<()> {
        check_range("box wallpaper", box_number, MAX_BOXES)?;
        let stored = if wallpaper >= 0x10 {
            wallpaper.wrapping_add(self.layout.wallpaper_shift)
        } else {
            wallpaper
        };
        let ofs = self.wallpaper_offset(box_number);
        self.data[ofs] = stored;
        Ok(())
    }

    pub fn pouches(&self) -> &'static [PouchLayout] {
        self.layout.pouches
    }

    fn pouch_slot(&self, pouch: Pouch, slot: usize) -> Result<Option<usize>> {
        let Some(layout) = self.layout.pouches.iter().find(|p| p.pouch == pouch) else {
            debug!("{:?} has no {pouch:?} pouch", self.game);
            return Ok(None);
        };
        check_range("pouch slot", slot, layout.capacity as usize)?;
        Ok(Some(self.gbo + layout.offset + slot * Item::LEN))
    }

    pub fn item(&self, pouch: Pouch, slot: usize) -> Result<Option<Item>> {
        Ok(self
            .pouch_slot(pouch, slot)?
            .map(|ofs| Item::read(&self.data, ofs)))
    }

    /// Writes a bag entry; `Ok(false)` when the game has no such pouch.
    pub fn set_item(&mut self, pouch: Pouch, slot: usize, item: Item) -> Result<bool> {
        match self.pouch_slot(pouch, slot)? {
            Some(ofs) => {
                item.write(&mut self.data, ofs);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn dex_base(&self) -> usize {
        self.gbo + self.layout.pokedex
    }

    fn language_flags(&self) -> usize {
        self.dex_base() + DEX_FORMS + self.layout.language_flags
    }

    /// Registers a record as owned and seen, with its gender, form and language.
    pub fn dex(&mut self, pkm: &dyn Pkx, tables: &dyn ReferenceTables) {
        let species = pkm.national_species(tables);
        let max_species = Limits::for_generation(Generation::Four).max_species;
        if species == 0 || species > max_species || pkm.is_egg() {
            return;
        }

        let bit = (species - 1) as usize;
        let mask = 1u8 << (bit & 7);
        let ofs = self.dex_base() + 4 + (bit >> 3);
        let region = |idx: usize| ofs + DEX_REGION * idx;

        self.data[region(0)] |= mask;

        if self.data[region(1)] & mask == 0 {
            self.data[region(1)] |= mask;
            match pkm.gender_ratio(tables) {
                GENDER_UNKNOWN | GENDER_MALE_ONLY => {
                    self.data[region(2)] &= !mask;
                    self.data[region(3)] &= !mask;
                }
                GENDER_FEMALE_ONLY => {
                    self.data[region(2)] |= mask;
                    self.data[region(3)] |= mask;
                }
                _ => {
                    let shown = (self.data[region(2)] | self.data[region(3)]) & mask != 0;
                    if !shown {
                        // The opposite gender's bit makes this one display first.
                        let gender = (pkm.gender(tables) as usize & 1) ^ 1;
                        self.data[region(2 + gender)] |= mask;
                    }
                }
            }
        }

        self.record_form(pkm, species, tables);
        self.record_language(species, pkm.language());
    }

    fn record_form(&mut self, pkm: &dyn Pkx, species: u16, tables: &dyn ReferenceTables) {
        let Some(entry) = self
            .layout
            .dex_forms
            .iter()
            .find(|entry| entry.species == species)
            .copied()
        else {
            return;
        };
        let form = if entry.by_gender {
            if pkm.form() == 1 {
                2
            } else {
                pkm.gender(tables) as u8
            }
        } else {
            pkm.form()
        };

        if let FormStore::List { offset, len } = entry.store {
            let base = self.dex_base() + DEX_FORMS + offset;
            for slot in &mut self.data[base..base + len] {
                if *slot == form {
                    break;
                }
                if *slot == EMPTY_FORM {
                    *slot = form;
                    break;
                }
            }
            return;
        }

        let mut forms = self.read_forms(entry.store);
        if insert_form(&mut forms, form) {
            trace!("Dex records form {form} of species {species}");
            self.write_forms(entry.store, &forms);
        }
    }

    /// Forms recorded for a species, `0xFF` marking empty slots. Empty when the game
    /// does not track its forms.
    pub fn dex_forms(&self, species: u16) -> Vec<u8> {
        self.layout
            .dex_forms
            .iter()
            .find(|entry| entry.species == species)
            .map(|entry| self.read_forms(entry.store))
            .unwrap_or_default()
    }

    fn packed_offset(&self, store: FormStore) -> Option<(usize, u32, usize)> {
        match store {
            FormStore::Packed { offset, bits, count } => {
                Some((self.dex_base() + DEX_FORMS + offset, bits, count))
            }
            FormStore::PackedLate { offset, bits, count } => {
                Some((self.language_flags() + DEX_LATE_FORMS + offset, bits, count))
            }
            _ => None,
        }
    }

    fn read_forms(&self, store: FormStore) -> Vec<u8> {
        let tail = self.dex_base() + 4 + DEX_REGION - 1;
        match store {
            FormStore::List { offset, len } => {
                let base = self.dex_base() + DEX_FORMS + offset;
                self.data[base..base + len].to_vec()
            }
            FormStore::RegionTail => {
                let value = self.data[tail] as u32 | (self.data[tail + DEX_REGION] as u32) << 8;
                unpack_forms(value, 4, 4)
            }
            packed => match self.packed_offset(packed) {
                Some((ofs, bits, count)) => {
                    let value = if bits as usize * count > 8 {
                        u32_le(&self.data, ofs)
                    } else {
                        self.data[ofs] as u32
                    };
                    unpack_forms(value, bits, count)
                }
                None => Vec::new(),
            },
        }
    }

    fn write_forms(&mut self, store: FormStore, forms: &[u8]) {
        let tail = self.dex_base() + 4 + DEX_REGION - 1;
        match store {
            FormStore::List { offset, len } => {
                let base = self.dex_base() + DEX_FORMS + offset;
                for (idx, slot) in self.data[base..base + len].iter_mut().enumerate() {
                    *slot = forms.get(idx).copied().unwrap_or(EMPTY_FORM);
                }
            }
            FormStore::RegionTail => {
                let value = pack_forms(forms, 4, 4);
                self.data[tail] = value as u8;
                self.data[tail + DEX_REGION] = (value >> 8) as u8;
            }
            packed => {
                if let Some((ofs, bits, count)) = self.packed_offset(packed) {
                    let value = pack_forms(forms, bits, count);
                    if bits as usize * count > 8 {
                        set_u32_le(&mut self.data, ofs, value);
                    } else {
                        self.data[ofs] = value as u8;
                    }
                }
            }
        }
    }

    fn record_language(&mut self, species: u16, language: u8) {
        let index = match self.layout.language_species {
            Some(list) => match list.iter().position(|s| *s == species) {
                Some(pos) => pos + 1,
                None => return,
            },
            None => species as usize,
        };
        let ofs = self.language_flags() + index;
        self.data[ofs] |= 1 << language_bit(language);
    }

    /// Language flags byte for a species, or `None` if the game does not record it.
    pub fn dex_languages(&self, species: u16) -> Option<u8> {
        let index = match self.layout.language_species {
            Some(list) => list.iter().position(|s| *s == species)? + 1,
            None => species as usize,
        };
        Some(self.data[self.language_flags() + index])
    }

    fn dex_bit(&self, region: usize, species: u16) -> bool {
        if species == 0 {
            return false;
        }
        let bit = (species - 1) as usize;
        let ofs = self.dex_base() + 4 + DEX_REGION * region + (bit >> 3);
        self.data[ofs] & (1 << (bit & 7)) != 0
    }

    pub fn is_caught(&self, species: u16) -> bool {
        self.dex_bit(0, species)
    }

    pub fn is_seen(&self, species: u16) -> bool {
        self.dex_bit(1, species)
    }

    /// Raw gender-display toggle bits (A, B) for a species.
    pub fn gender_toggles(&self, species: u16) -> (bool, bool) {
        (self.dex_bit(2, species), self.dex_bit(3, species))
    }

    pub fn dex_seen(&self) -> usize {
        let max = Limits::for_generation(Generation::Four).max_species;
        (1..=max).filter(|species| self.is_seen(*species)).count()
    }

    pub fn dex_caught(&self) -> usize {
        let max = Limits::for_generation(Generation::Four).max_species;
        (1..=max).filter(|species| self.is_caught(*species)).count()
    }
}

/// Picks the half whose footer counters are newer, preferring the first on a tie.
fn active_half(data: &[u8], footer: usize) -> usize {
    let major = compare_counters(u32_le(data, footer), u32_le(data, footer + HALF_STRIDE));
    let cmp = match major {
        CountType::Same => {
            compare_counters(u32_le(data, footer + 4), u32_le(data, footer + HALF_STRIDE + 4))
        }
        decided => decided,
    };
    match cmp {
        CountType::Second => HALF_STRIDE,
        CountType::First | CountType::Same => 0,
    }
}

/// Flag bit for a record language; Italian and German trade places, and languages
/// past Spanish share the Japanese bit.
fn language_bit(language: u8) -> u8 {
    match language as i32 - 1 {
        lang if lang < 0 => 1,
        3 => 4,
        4 => 3,
        lang if lang > 5 => 0,
        lang => lang as u8,
    }
}

fn unpack_forms(value: u32, bits: u32, count: usize) -> Vec<u8> {
    let all_ones = 0xffu32 >> (8 - bits);
    let mut forms: Vec<u8> = (0..count)
        .map(|idx| {
            let field = (value >> (idx as u32 * bits)) & all_ones;
            if field == all_ones && bits > 1 {
                EMPTY_FORM
            } else {
                field as u8
            }
        })
        .collect();
    // With one bit per slot, both slots set means nothing was recorded.
    if bits == 1 && forms.len() >= 2 && forms[0] == 1 && forms[1] == 1 {
        forms[0] = EMPTY_FORM;
        forms[1] = EMPTY_FORM;
    }
    forms
}

fn pack_forms(forms: &[u8], bits: u32, count: usize) -> u32 {
    let all_ones = 0xffu32 >> (8 - bits);
    let mut value = u32::MAX << (count as u32 * bits);
    for (idx, form) in forms.iter().take(count).enumerate() {
        let field = if *form == EMPTY_FORM {
            all_ones
        } else {
            *form as u32 & all_ones
        };
        value |= field << (bits * idx as u32);
    }
    value
}

/// Puts `form` in the first empty slot unless already present. Never reorders.
fn insert_form(forms: &mut [u8], form: u8) -> bool {
    if forms.contains(&form) {
        return false;
    }
    match forms.iter_mut().find(|slot| **slot == EMPTY_FORM) {
        Some(slot) => {
            *slot = form;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_bits_swap_italian_and_german() {
        assert_eq!(language_bit(2), 1);
        assert_eq!(language_bit(4), 4);
        assert_eq!(language_bit(5), 3);
        assert_eq!(language_bit(8), 0);
        assert_eq!(language_bit(0), 1);
    }

    #[test]
    fn one_bit_forms_read_both_set_as_empty() {
        assert_eq!(unpack_forms(0xff, 1, 2), vec![EMPTY_FORM, EMPTY_FORM]);
        assert_eq!(unpack_forms(0xfe, 1, 2), vec![0, 1]);
    }

    #[test]
    fn packing_keeps_unused_bits_set() {
        let value = pack_forms(&[1, EMPTY_FORM, EMPTY_FORM], 2, 3);
        assert_eq!(value as u8, 0b1111_1101);
        assert_eq!(unpack_forms(value, 2, 3), vec![1, EMPTY_FORM, EMPTY_FORM]);
    }

    #[test]
    fn insert_fills_first_gap_only_once() {
        let mut forms = vec![2, EMPTY_FORM, EMPTY_FORM];
        assert!(insert_form(&mut forms, 0));
        assert_eq!(forms, vec![2, 0, EMPTY_FORM]);
        assert!(!insert_form(&mut forms, 2));
        assert!(insert_form(&mut forms, 1));
        assert!(!insert_form(&mut forms, 3));
        assert_eq!(forms, vec![2, 0, 1]);
    }

    #[test]
    fn rotom_packs_into_a_word() {
        let mut forms = unpack_forms(u32::MAX, 3, 6);
        assert!(forms.iter().all(|f| *f == EMPTY_FORM));
        insert_form(&mut forms, 5);
        let value = pack_forms(&forms, 3, 6);
        assert_eq!(value & 0x7, 5);
        assert_eq!(unpack_forms(value, 3, 6)[0], 5);
    }
}
