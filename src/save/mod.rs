//! Save-file containers that locate records and flag bitmaps inside a full save image.
//!
//! Containers own the image. Records are copied out as owned [`Pokemon`] values and
//! copied back in encrypted, so no two wrappers ever alias the same bytes.

mod sav3;
mod sav4;
mod sav6;

pub use sav3::{GameCode, Sav3};
pub use sav4::{DexForm, FormStore, Game4, Layout4, Sav4};
pub use sav6::SavOras;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    codec::{set_u16_le, u16_le},
    personal::ReferenceTables,
    Generation, Pkx,
};

pub(crate) const BOX_SLOTS: usize = 30;

/// Outcome of comparing the save counters of two save halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountType {
    First,
    Second,
    Same,
}

/// Orders two save counters, treating `0xFFFFFFFF` as unwritten unless the other half
/// is `0xFFFFFFFE`.
pub fn compare_counters(c1: u32, c2: u32) -> CountType {
    if c1 == 0xffff_ffff && c2 != 0xffff_fffe {
        CountType::Second
    } else if c2 == 0xffff_ffff && c1 != 0xffff_fffe {
        CountType::First
    } else if c1 > c2 {
        CountType::First
    } else if c2 > c1 {
        CountType::Second
    } else {
        CountType::Same
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pouch {
    NormalItem,
    KeyItem,
    Tm,
    Mail,
    Medicine,
    Berry,
    Ball,
    Battle,
}

/// Bag entry as stored by gen 4 and later: item id followed by quantity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    pub id: u16,
    pub count: u16,
}

impl Item {
    pub const LEN: usize = 4;

    pub(crate) fn read(data: &[u8], ofs: usize) -> Item {
        Item {
            id: u16_le(data, ofs),
            count: u16_le(data, ofs + 2),
        }
    }

    pub(crate) fn write(self, data: &mut [u8], ofs: usize) {
        set_u16_le(data, ofs, self.id);
        set_u16_le(data, ofs + 2, self.count);
    }
}

/// Start offset and slot capacity of one pouch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PouchLayout {
    pub pouch: Pouch,
    pub offset: usize,
    pub capacity: u16,
}

/// Hours, minutes and seconds on the save clock. Gen 3 also counts frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimePlayed {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

/// First property of a record that a game cannot hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadTransferReason {
    Okay,
    Move,
    Species,
    Form,
    Ability,
    Item,
    Ball,
}

/// Checks a record against the value ranges of `generation`.
pub fn invalid_transfer_reason(
    pkm: &dyn Pkx,
    generation: Generation,
    tables: &dyn ReferenceTables,
) -> BadTransferReason {
    let limits = tables.limits(generation);
    let species = pkm.national_species(tables);

    if pkm.moves().iter().any(|id| *id > limits.max_move) {
        return BadTransferReason::Move;
    }
    if species == 0 || species > limits.max_species {
        return BadTransferReason::Species;
    }
    let form_count = tables
        .personal(generation, species)
        .map(|info| info.form_count)
        .unwrap_or(1)
        .max(1);
    if pkm.form() >= form_count {
        return BadTransferReason::Form;
    }
    if pkm.ability(tables) > limits.max_ability {
        return BadTransferReason::Ability;
    }
    if pkm.held_item() > limits.max_item {
        return BadTransferReason::Item;
    }
    if pkm.ball() > limits.max_ball {
        return BadTransferReason::Ball;
    }
    BadTransferReason::Okay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn larger_counter_wins() {
        assert_eq!(compare_counters(5, 3), CountType::First);
        assert_eq!(compare_counters(3, 5), CountType::Second);
        assert_eq!(compare_counters(7, 7), CountType::Same);
    }

    #[test]
    fn unwritten_counter_loses() {
        assert_eq!(compare_counters(0xffff_ffff, 2), CountType::Second);
        assert_eq!(compare_counters(2, 0xffff_ffff), CountType::First);
    }

    #[test]
    fn wraparound_pair_inverts() {
        assert_eq!(compare_counters(0xffff_fffe, 0xffff_ffff), CountType::Second);
        assert_eq!(compare_counters(0xffff_ffff, 0xffff_fffe), CountType::First);
    }

    #[test]
    fn item_layout_is_id_then_count() {
        let mut buf = [0u8; 8];
        Item { id: 0x0102, count: 99 }.write(&mut buf, 4);
        assert_eq!(&buf[4..], &[0x02, 0x01, 99, 0]);
        assert_eq!(Item::read(&buf, 4), Item { id: 0x0102, count: 99 });
    }
}
