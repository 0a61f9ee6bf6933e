//! Hamming(7,4) Codec Tests
//!
//! Round trips, single-bit correction and the parity report.

use asc_firmware::hamming::{
    correct, decode_byte, decode_frame, decode_nibble, encode_byte, encode_frame, encode_nibble,
    has_parity_fault, syndrome, ParityCheck, SYNDROME_CORRECTION,
};
use asc_firmware::protocol::{UnencodedFrame, ENCODED_FRAME_LEN, FRAME_LEN};
use asc_firmware::types::SenderAddress;

const SENDER: SenderAddress = SenderAddress::new([0x47, 0x41, 0x85, 0x89]);

// ============================================================================
// Nibble Tests
// ============================================================================

#[test]
fn nibble_round_trip() {
    for nibble in 0..16u8 {
        assert_eq!(decode_nibble(encode_nibble(nibble)), nibble);
    }
}

#[test]
fn encode_ignores_high_bits() {
    assert_eq!(encode_nibble(0xA5), encode_nibble(0x05));
}

#[test]
fn data_bits_sit_in_the_high_nibble() {
    for nibble in 0..16u8 {
        assert_eq!(encode_nibble(nibble) >> 4, nibble);
    }
}

#[test]
fn known_codeword_for_two() {
    // D1 -> H0, H2; three ones in bits 1..7
    assert_eq!(encode_nibble(0x2), 0x2B);
}

#[test]
fn codewords_have_even_parity() {
    for nibble in 0..16u8 {
        assert_eq!(encode_nibble(nibble).count_ones() % 2, 0, "nibble {nibble:#x}");
    }
}

#[test]
fn single_bit_error_corrected_every_position() {
    for nibble in 0..16u8 {
        let codeword = encode_nibble(nibble);
        for position in 0..8 {
            let received = codeword ^ (1 << position);
            assert_eq!(
                decode_nibble(received),
                nibble,
                "nibble {nibble:#x}, bit {position}"
            );
        }
    }
}

#[test]
fn correction_restores_protected_bits() {
    for nibble in 0..16u8 {
        let codeword = encode_nibble(nibble);
        for position in 1..8 {
            assert_eq!(correct(codeword ^ (1 << position)), codeword);
        }
    }
}

#[test]
fn parity_bit_error_has_zero_syndrome() {
    let codeword = encode_nibble(0x9);
    assert_eq!(syndrome(codeword ^ 0x01), 0);
}

#[test]
fn correction_table_is_a_permutation_of_bits() {
    assert_eq!(SYNDROME_CORRECTION[0], 0);
    let mut seen = 0u8;
    for &mask in &SYNDROME_CORRECTION[1..] {
        assert_eq!(mask.count_ones(), 1);
        assert_eq!(seen & mask, 0);
        seen |= mask;
    }
    // Every protected bit, never P0
    assert_eq!(seen, 0xFE);
}

// ============================================================================
// Parity Report Tests
// ============================================================================

#[test]
fn clean_codeword_parity_equal() {
    for nibble in 0..16u8 {
        assert_eq!(ParityCheck::of(encode_nibble(nibble)), ParityCheck::Equal);
    }
}

#[test]
fn single_flip_parity_differs() {
    let codeword = encode_nibble(0x6);
    for position in 0..8 {
        assert_eq!(ParityCheck::of(codeword ^ (1 << position)), ParityCheck::Differ);
    }
}

#[test]
fn double_flip_parity_equal() {
    let codeword = encode_nibble(0x6);
    assert_eq!(ParityCheck::of(codeword ^ 0b0011_0000), ParityCheck::Equal);
}

#[test]
fn legacy_fault_flag_tracks_equal_parity() {
    let codeword = encode_nibble(0x3);
    assert!(has_parity_fault(codeword));
    assert!(!has_parity_fault(codeword ^ 0x80));
}

// ============================================================================
// Byte Tests
// ============================================================================

#[test]
fn byte_round_trip() {
    for byte in 0..=255u8 {
        assert_eq!(decode_byte(encode_byte(byte)), byte);
    }
}

#[test]
fn byte_low_nibble_first() {
    let [lo, hi] = encode_byte(0x4B);
    assert_eq!(lo, encode_nibble(0xB));
    assert_eq!(hi, encode_nibble(0x4));
}

#[test]
fn byte_single_error_in_each_codeword() {
    for byte in [0x00, 0x22, 0x5A, 0xFF] {
        let [lo, hi] = encode_byte(byte);
        assert_eq!(decode_byte([lo ^ 0x40, hi ^ 0x02]), byte);
    }
}

// ============================================================================
// Frame Tests
// ============================================================================

#[test]
fn frame_lengths() {
    let frame = UnencodedFrame::join(SENDER);
    let encoded = encode_frame(&frame);
    assert_eq!(encoded.as_bytes().len(), ENCODED_FRAME_LEN);
    assert_eq!(decode_frame(&encoded).frame.as_bytes().len(), FRAME_LEN);
}

#[test]
fn frame_round_trip_clean() {
    let frame = UnencodedFrame::xyz(SENDER, 150, 75, 40);
    let decoded = decode_frame(&encode_frame(&frame));
    assert_eq!(decoded.frame, frame);
    assert_eq!(decoded.parity_differ, 0);
    assert_eq!(decoded.corrected, 0);
}

#[test]
fn frame_layout_is_pairwise() {
    let frame = UnencodedFrame::rot(SENDER, 120);
    let encoded = encode_frame(&frame);
    for (i, &byte) in frame.as_bytes().iter().enumerate() {
        assert_eq!(encoded.as_bytes()[2 * i], encode_nibble(byte & 0x0F));
        assert_eq!(encoded.as_bytes()[2 * i + 1], encode_nibble(byte >> 4));
    }
}

#[test]
fn frame_corrects_one_error_per_codeword() {
    let frame = UnencodedFrame::vac(SENDER, true);
    let mut encoded = encode_frame(&frame);
    for (i, codeword) in encoded.as_bytes_mut().iter_mut().enumerate() {
        *codeword ^= 1 << (i % 8);
    }
    let decoded = decode_frame(&encoded);
    assert_eq!(decoded.frame, frame);
    assert_eq!(usize::from(decoded.parity_differ), ENCODED_FRAME_LEN);
    // Every flip except the P0 ones needs a correction
    assert_eq!(usize::from(decoded.corrected), ENCODED_FRAME_LEN - ENCODED_FRAME_LEN / 8);
}
