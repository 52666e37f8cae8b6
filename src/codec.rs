//! Primitive field accessors over raw record and save bytes.
//!
//! Offsets are never validated here: every layout in this crate is fixed, and the
//! record constructors already guarantee the buffer length.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

pub fn u16_le(data: &[u8], ofs: usize) -> u16 {
    LittleEndian::read_u16(&data[ofs..])
}

pub fn set_u16_le(data: &mut [u8], ofs: usize, value: u16) {
    LittleEndian::write_u16(&mut data[ofs..], value)
}

pub fn u32_le(data: &[u8], ofs: usize) -> u32 {
    LittleEndian::read_u32(&data[ofs..])
}

pub fn set_u32_le(data: &mut [u8], ofs: usize, value: u32) {
    LittleEndian::write_u32(&mut data[ofs..], value)
}

pub fn u16_be(data: &[u8], ofs: usize) -> u16 {
    BigEndian::read_u16(&data[ofs..])
}

pub fn set_u16_be(data: &mut [u8], ofs: usize, value: u16) {
    BigEndian::write_u16(&mut data[ofs..], value)
}

pub fn u24_be(data: &[u8], ofs: usize) -> u32 {
    BigEndian::read_u24(&data[ofs..])
}

pub fn set_u24_be(data: &mut [u8], ofs: usize, value: u32) {
    BigEndian::write_u24(&mut data[ofs..], value & 0xff_ffff)
}

/// Extracts `width` bits starting at `shift`.
pub fn bits(value: u32, shift: u32, width: u32) -> u32 {
    (value >> shift) & mask(width)
}

/// Returns `value` with `width` bits at `shift` replaced by `field`.
pub fn with_bits(value: u32, shift: u32, width: u32, field: u32) -> u32 {
    let m = mask(width) << shift;
    (value & !m) | ((field << shift) & m)
}

pub fn byte_bits(data: &[u8], ofs: usize, shift: u32, width: u32) -> u8 {
    bits(data[ofs] as u32, shift, width) as u8
}

pub fn set_byte_bits(data: &mut [u8], ofs: usize, shift: u32, width: u32, field: u8) {
    data[ofs] = with_bits(data[ofs] as u32, shift, width, field as u32) as u8;
}

pub fn word_bits(data: &[u8], ofs: usize, shift: u32, width: u32) -> u32 {
    bits(u32_le(data, ofs), shift, width)
}

pub fn set_word_bits(data: &mut [u8], ofs: usize, shift: u32, width: u32, field: u32) {
    let word = with_bits(u32_le(data, ofs), shift, width, field);
    set_u32_le(data, ofs, word);
}

pub fn flag(data: &[u8], ofs: usize, bit: u8) -> bool {
    (data[ofs] >> bit) & 1 != 0
}

pub fn set_flag(data: &mut [u8], ofs: usize, bit: u8, on: bool) {
    if on {
        data[ofs] |= 1 << bit;
    } else {
        data[ofs] &= !(1 << bit);
    }
}

fn mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iv_word_fields_do_not_bleed() {
        let mut data = [0u8; 4];
        for (idx, iv) in [31u32, 0, 17, 1, 30, 15].iter().enumerate() {
            set_word_bits(&mut data, 0, 5 * idx as u32, 5, *iv);
        }
        set_word_bits(&mut data, 0, 30, 1, 1);
        assert_eq!(word_bits(&data, 0, 0, 5), 31);
        assert_eq!(word_bits(&data, 0, 5, 5), 0);
        assert_eq!(word_bits(&data, 0, 10, 5), 17);
        assert_eq!(word_bits(&data, 0, 25, 5), 15);
        assert_eq!(word_bits(&data, 0, 30, 1), 1);
        assert_eq!(word_bits(&data, 0, 31, 1), 0);
    }

    #[test]
    fn byte_fields_mask_oversized_values() {
        let mut data = [0xffu8];
        set_byte_bits(&mut data, 0, 1, 2, 0b100);
        assert_eq!(data[0], 0b1111_1001);
    }

    #[test]
    fn big_endian_helpers() {
        let mut data = [0u8; 4];
        set_u24_be(&mut data, 1, 0x01_02_03);
        assert_eq!(data, [0, 1, 2, 3]);
        assert_eq!(u24_be(&data, 1), 0x01_02_03);
        set_u16_be(&mut data, 0, 0xbeef);
        assert_eq!(u16_be(&data, 0), 0xbeef);
    }

    #[test]
    fn flags_toggle() {
        let mut data = [0u8; 2];
        set_flag(&mut data, 1, 7, true);
        assert!(flag(&data, 1, 7));
        set_flag(&mut data, 1, 7, false);
        assert_eq!(data, [0, 0]);
    }
}
