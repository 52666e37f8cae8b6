mod common;

use common::rng;
use pkvault::crypto::{
    ccitt16, decrypt_gen3, decrypt_gen4, decrypt_gen6, encrypt_gen3, encrypt_gen4, encrypt_gen6,
    shuffle_blocks, sum16, BlockLayout, BLOCK_POSITION_INVERT,
};
use rand::RngCore;

fn random_record(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rng(seed).fill_bytes(&mut data);
    data
}

#[test]
fn test_inverse_shuffle_restores_blocks() {
    let original = random_record(232, 1);
    for sv in 0..24u8 {
        let mut data = original.clone();
        shuffle_blocks(&mut data, BlockLayout::GEN6, sv);
        shuffle_blocks(&mut data, BlockLayout::GEN6, BLOCK_POSITION_INVERT[sv as usize]);
        assert_eq!(data, original, "shuffle value {sv}");
    }
}

#[test]
fn test_shuffle_never_touches_header() {
    let original = random_record(136, 2);
    let mut data = original.clone();
    shuffle_blocks(&mut data, BlockLayout::GEN4, 23);
    assert_eq!(data[..8], original[..8]);
    assert_ne!(data, original);
}

#[test]
fn test_gen3_crypt_round_trips() {
    for seed in 0..32 {
        let original = random_record(100, seed);
        let mut data = original.clone();
        decrypt_gen3(&mut data);
        encrypt_gen3(&mut data);
        assert_eq!(data, original);
    }
}

#[test]
fn test_gen4_crypt_round_trips_box_and_party() {
    for (len, seed) in [(136, 10), (236, 11), (220, 12)] {
        let original = random_record(len, seed);
        let mut data = original.clone();
        encrypt_gen4(&mut data, 136);
        assert_ne!(data, original);
        decrypt_gen4(&mut data, 136);
        assert_eq!(data, original);
    }
}

#[test]
fn test_gen6_crypt_round_trips() {
    for (len, layout) in [
        (232, BlockLayout::GEN6),
        (260, BlockLayout::GEN6),
        (328, BlockLayout::GEN8),
        (344, BlockLayout::GEN8),
    ] {
        let original = random_record(len, len as u64);
        let mut data = original.clone();
        decrypt_gen6(&mut data, layout);
        encrypt_gen6(&mut data, layout);
        assert_eq!(data, original);
    }
}

#[test]
fn test_word_sum_wraps() {
    assert_eq!(sum16(&[0xff, 0xff, 0x02, 0x00]), 0x0001);
    assert_eq!(sum16(&[]), 0);
}

#[test]
fn test_ccitt_check_value() {
    assert_eq!(ccitt16(b"123456789"), 0x29b1);
    assert_eq!(ccitt16(&[]), 0xffff);
}
