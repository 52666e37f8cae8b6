//! Block shuffling, keystream encryption and checksums for records and saves.

use crate::codec::{set_u32_le, u16_le, u32_le};

/// Source block for each working block, four entries per shuffle value. Rows 24..32
/// repeat the first eight so callers can index without a modulus.
pub const BLOCK_POSITION: [u8; 128] = [
    0, 1, 2, 3, 0, 1, 3, 2, 0, 2, 1, 3, 0, 3, 1, 2, 0, 2, 3, 1, 0, 3, 2, 1, 1, 0, 2, 3, 1, 0, 3, 2,
    2, 0, 1, 3, 3, 0, 1, 2, 2, 0, 3, 1, 3, 0, 2, 1, 1, 2, 0, 3, 1, 3, 0, 2, 2, 1, 0, 3, 3, 1, 0, 2,
    2, 3, 0, 1, 3, 2, 0, 1, 1, 2, 3, 0, 1, 3, 2, 0, 2, 1, 3, 0, 3, 1, 2, 0, 2, 3, 1, 0, 3, 2, 1, 0,
    0, 1, 2, 3, 0, 1, 3, 2, 0, 2, 1, 3, 0, 3, 1, 2, 0, 2, 3, 1, 0, 3, 2, 1, 1, 0, 2, 3, 1, 0, 3, 2,
];

/// Shuffle value that undoes the permutation of the indexing shuffle value.
pub const BLOCK_POSITION_INVERT: [u8; 32] = [
    0, 1, 2, 4, 3, 5, 6, 7, 12, 18, 13, 19, 8, 10, 14, 20, 16, 22, 9, 11, 15, 21, 17, 23, 0, 1, 2,
    4, 3, 5, 6, 7,
];

const LCG_MULT: u32 = 0x41c6_4e6d;
const LCG_ADD: u32 = 0x0000_6073;

const CCITT_TABLE: [u16; 256] = build_ccitt_table();

/// Layout of the four shuffled blocks of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    pub header: usize,
    pub block_len: usize,
}

impl BlockLayout {
    pub const GEN3: BlockLayout = BlockLayout {
        header: 32,
        block_len: 12,
    };
    pub const GEN4: BlockLayout = BlockLayout {
        header: 8,
        block_len: 32,
    };
    pub const GEN6: BlockLayout = BlockLayout {
        header: 8,
        block_len: 56,
    };
    pub const GEN8: BlockLayout = BlockLayout {
        header: 8,
        block_len: 80,
    };

    pub fn end(self) -> usize {
        self.header + 4 * self.block_len
    }
}

/// Reorders the four blocks so that working block `i` comes from stored block
/// `BLOCK_POSITION[sv * 4 + i]`.
pub fn shuffle_blocks(data: &mut [u8], layout: BlockLayout, sv: u8) {
    let BlockLayout { header, block_len } = layout;
    let original = data[header..layout.end()].to_vec();
    for block in 0..4 {
        let src = BLOCK_POSITION[sv as usize * 4 + block] as usize;
        let dest = header + block * block_len;
        data[dest..dest + block_len]
            .copy_from_slice(&original[src * block_len..(src + 1) * block_len]);
    }
}

pub fn shuffle_value_gen3(pid: u32) -> u8 {
    (pid % 24) as u8
}

pub fn shuffle_value_gen4(pid: u32) -> u8 {
    (((pid & 0x3e000) >> 0xd) % 24) as u8
}

pub fn shuffle_value_gen6(encryption_constant: u32) -> u8 {
    (((encryption_constant >> 0xd) & 0x1f) % 24) as u8
}

pub fn lcg_next(seed: u32) -> u32 {
    seed.wrapping_mul(LCG_MULT).wrapping_add(LCG_ADD)
}

/// XORs every little-endian word of `data` with the high half of the advancing LCG.
pub fn crypt_words(data: &mut [u8], mut seed: u32) {
    for word in data.chunks_exact_mut(2) {
        seed = lcg_next(seed);
        let key = (seed >> 16) as u16;
        word[0] ^= key as u8;
        word[1] ^= (key >> 8) as u8;
    }
}

/// Gen 3 substructures are XORed with `PID ^ OTID` one 32-bit word at a time.
pub fn crypt_gen3(data: &mut [u8]) {
    let key = u32_le(data, 0) ^ u32_le(data, 4);
    let layout = BlockLayout::GEN3;
    for ofs in (layout.header..layout.end()).step_by(4) {
        let word = u32_le(data, ofs) ^ key;
        set_u32_le(data, ofs, word);
    }
}

pub fn decrypt_gen3(data: &mut [u8]) {
    crypt_gen3(data);
    shuffle_blocks(data, BlockLayout::GEN3, shuffle_value_gen3(u32_le(data, 0)));
}

pub fn encrypt_gen3(data: &mut [u8]) {
    let sv = shuffle_value_gen3(u32_le(data, 0));
    shuffle_blocks(data, BlockLayout::GEN3, BLOCK_POSITION_INVERT[sv as usize]);
    crypt_gen3(data);
}

/// Gen 4/5: blocks keyed by the checksum, party tail keyed by the PID.
pub fn decrypt_gen4(data: &mut [u8], box_len: usize) {
    crypt_gen4(data, box_len);
    let sv = shuffle_value_gen4(u32_le(data, 0));
    shuffle_blocks(data, BlockLayout::GEN4, sv);
}

pub fn encrypt_gen4(data: &mut [u8], box_len: usize) {
    let sv = shuffle_value_gen4(u32_le(data, 0));
    shuffle_blocks(data, BlockLayout::GEN4, BLOCK_POSITION_INVERT[sv as usize]);
    crypt_gen4(data, box_len);
}

fn crypt_gen4(data: &mut [u8], box_len: usize) {
    let checksum = u16_le(data, 0x06) as u32;
    let pid = u32_le(data, 0x00);
    crypt_words(&mut data[8..box_len], checksum);
    if data.len() > box_len {
        crypt_words(&mut data[box_len..], pid);
    }
}

/// Gen 6 onward: everything keyed by the encryption constant, party tail reseeded.
pub fn decrypt_gen6(data: &mut [u8], layout: BlockLayout) {
    crypt_gen6(data, layout);
    let sv = shuffle_value_gen6(u32_le(data, 0));
    shuffle_blocks(data, layout, sv);
}

pub fn encrypt_gen6(data: &mut [u8], layout: BlockLayout) {
    let sv = shuffle_value_gen6(u32_le(data, 0));
    shuffle_blocks(data, layout, BLOCK_POSITION_INVERT[sv as usize]);
    crypt_gen6(data, layout);
}

fn crypt_gen6(data: &mut [u8], layout: BlockLayout) {
    let encryption_constant = u32_le(data, 0x00);
    let box_len = layout.end();
    crypt_words(&mut data[8..box_len], encryption_constant);
    if data.len() > box_len {
        crypt_words(&mut data[box_len..], encryption_constant);
    }
}

/// Wrapping sum of little-endian words.
pub fn sum16(data: &[u8]) -> u16 {
    data.chunks_exact(2)
        .fold(0u16, |acc, word| acc.wrapping_add(u16::from_le_bytes([word[0], word[1]])))
}

/// CRC-16/CCITT-FALSE as used by gen 4 and gen 6 saves.
pub fn ccitt16(data: &[u8]) -> u16 {
    data.iter().fold(0xffff, |crc: u16, byte| {
        (crc << 8) ^ CCITT_TABLE[((crc >> 8) as u8 ^ byte) as usize]
    })
}

const fn build_ccitt_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut idx = 0;
    while idx < 256 {
        let mut crc = (idx as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[idx] = crc;
        idx += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn inverse_rows_undo_every_shuffle() {
        for sv in 0..24u8 {
            let original = patterned(BlockLayout::GEN4.end());
            let mut data = original.clone();
            shuffle_blocks(&mut data, BlockLayout::GEN4, sv);
            shuffle_blocks(&mut data, BlockLayout::GEN4, BLOCK_POSITION_INVERT[sv as usize]);
            assert_eq!(data, original, "shuffle value {sv}");
        }
    }

    #[test]
    fn shuffle_leaves_header_alone() {
        let original = patterned(BlockLayout::GEN3.end());
        let mut data = original.clone();
        shuffle_blocks(&mut data, BlockLayout::GEN3, 23);
        assert_eq!(data[..32], original[..32]);
        assert_eq!(data[32..44], original[32 + 36..32 + 48]);
    }

    #[test]
    fn keystream_is_an_involution() {
        let original = patterned(0x100);
        let mut data = original.clone();
        crypt_words(&mut data, 0xdead_beef);
        assert_ne!(data, original);
        crypt_words(&mut data, 0xdead_beef);
        assert_eq!(data, original);
    }

    #[test]
    fn lcg_matches_known_sequence() {
        assert_eq!(lcg_next(0), 0x6073);
        assert_eq!(lcg_next(1), 0x41c6_4e6d_u32.wrapping_add(0x6073));
    }

    #[test]
    fn ccitt_check_value() {
        assert_eq!(ccitt16(b"123456789"), 0x29b1);
        assert_eq!(ccitt16(&[]), 0xffff);
    }

    #[test]
    fn word_sum_wraps() {
        assert_eq!(sum16(&[0xff, 0xff, 0x02, 0x00]), 0x0001);
    }
}
