//! Hamming(7,4) Forward Error Correction
//!
//! Every byte sent over the radio is split into two nibbles, and each nibble
//! is expanded into an 8-bit codeword:
//!
//! ```text
//!  bit:   7    6    5    4    3    2    1    0
//!        D3   D2   D1   D0   H2   H1   H0   P0
//! ```
//!
//! `H0..H2` are the Hamming check bits, `P0` is even parity over bits 1..7.
//! Decoding corrects any single flipped bit among the seven protected bits.
//! The parity bit is reported, never used to gate or repair anything.

use crate::protocol::{EncodedFrame, UnencodedFrame, ENCODED_FRAME_LEN, FRAME_LEN};

const P0: u8 = 1 << 0;
const H0: u8 = 1 << 1;
const H1: u8 = 1 << 2;
const H2: u8 = 1 << 3;
const D0: u8 = 1 << 4;
const D1: u8 = 1 << 5;
const D2: u8 = 1 << 6;
const D3: u8 = 1 << 7;

/// Bit flipped for each syndrome value `s0 | s1 << 1 | s2 << 2`
///
/// Syndromes follow the parity-check matrix
///
/// ```text
/// H = [ 1 0 0 | 0 1 1 1 ]    s0 = H0 ^ D1 ^ D2 ^ D3
///     [ 0 1 0 | 1 0 1 1 ]    s1 = H1 ^ D0 ^ D2 ^ D3
///     [ 0 0 1 | 1 1 0 1 ]    s2 = H2 ^ D0 ^ D1 ^ D3
/// ```
pub const SYNDROME_CORRECTION: [u8; 8] = [0, H0, H1, D2, H2, D1, D0, D3];

#[inline]
const fn bit(value: u8, mask: u8) -> u8 {
    ((value & mask) != 0) as u8
}

/// Even parity over codeword bits 1..7
#[inline]
const fn protected_parity(codeword: u8) -> u8 {
    ((codeword & !P0).count_ones() & 1) as u8
}

/// Encode the low nibble of `nibble` into a codeword
#[must_use]
pub const fn encode_nibble(nibble: u8) -> u8 {
    let d0 = bit(nibble, 0x1);
    let d1 = bit(nibble, 0x2);
    let d2 = bit(nibble, 0x4);
    let d3 = bit(nibble, 0x8);

    let h0 = d1 ^ d2 ^ d3;
    let h1 = d0 ^ d2 ^ d3;
    let h2 = d0 ^ d1 ^ d3;

    let out = (h0 << 1) | (h1 << 2) | (h2 << 3) | (d0 << 4) | (d1 << 5) | (d2 << 6) | (d3 << 7);

    out | protected_parity(out)
}

/// Syndrome of a received codeword (0 = no error detected)
#[must_use]
pub const fn syndrome(codeword: u8) -> u8 {
    let d0 = bit(codeword, D0);
    let d1 = bit(codeword, D1);
    let d2 = bit(codeword, D2);
    let d3 = bit(codeword, D3);

    let s0 = bit(codeword, H0) ^ d1 ^ d2 ^ d3;
    let s1 = bit(codeword, H1) ^ d0 ^ d2 ^ d3;
    let s2 = bit(codeword, H2) ^ d0 ^ d1 ^ d3;

    s0 | (s1 << 1) | (s2 << 2)
}

/// Apply the single-bit correction selected by the syndrome
#[must_use]
pub const fn correct(codeword: u8) -> u8 {
    codeword ^ SYNDROME_CORRECTION[syndrome(codeword) as usize]
}

/// Decode a codeword into its (corrected) data nibble
#[must_use]
pub const fn decode_nibble(codeword: u8) -> u8 {
    correct(codeword) >> 4
}

/// Outcome of comparing the received P0 bit with the recomputed parity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParityCheck {
    /// Recomputed parity over bits 1..7 equals the received P0
    Equal,
    /// Recomputed parity over bits 1..7 differs from the received P0
    Differ,
}

impl ParityCheck {
    /// Compare parity of the received, uncorrected codeword
    #[must_use]
    pub const fn of(codeword: u8) -> Self {
        if protected_parity(codeword) == (codeword & P0) {
            Self::Equal
        } else {
            Self::Differ
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ParityCheck {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Equal => defmt::write!(f, "parity-eq"),
            Self::Differ => defmt::write!(f, "parity-ne"),
        }
    }
}

/// Parity flag as reported by the deployed receiver
///
/// Returns `true` when the recomputed parity *matches* P0, which is the
/// polarity the receiving side was built against. Use [`ParityCheck::of`]
/// when the direction of the comparison matters.
#[must_use]
pub const fn has_parity_fault(codeword: u8) -> bool {
    matches!(ParityCheck::of(codeword), ParityCheck::Equal)
}

/// Encode one byte into two codewords, low nibble first
#[must_use]
pub const fn encode_byte(value: u8) -> [u8; 2] {
    [encode_nibble(value & 0x0F), encode_nibble(value >> 4)]
}

/// Decode two codewords (low nibble first) back into one byte
#[must_use]
pub const fn decode_byte(codewords: [u8; 2]) -> u8 {
    decode_nibble(codewords[0]) | (decode_nibble(codewords[1]) << 4)
}

/// Encode a whole frame
#[must_use]
pub fn encode_frame(frame: &UnencodedFrame) -> EncodedFrame {
    let mut out = [0u8; ENCODED_FRAME_LEN];
    for (pair, &byte) in out.chunks_exact_mut(2).zip(frame.as_bytes()) {
        pair.copy_from_slice(&encode_byte(byte));
    }
    EncodedFrame::new(out)
}

/// Result of decoding an encoded frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Recovered frame bytes
    pub frame: UnencodedFrame,
    /// Number of codewords whose parity bits differ
    pub parity_differ: u8,
    /// Number of codewords that needed a correction
    pub corrected: u8,
}

/// Decode a whole frame, correcting single-bit errors per codeword
#[must_use]
pub fn decode_frame(encoded: &EncodedFrame) -> DecodedFrame {
    let mut bytes = [0u8; FRAME_LEN];
    let mut parity_differ = 0;
    let mut corrected = 0;

    for (byte, pair) in bytes.iter_mut().zip(encoded.as_bytes().chunks_exact(2)) {
        for &codeword in pair {
            if ParityCheck::of(codeword) == ParityCheck::Differ {
                parity_differ += 1;
            }
            if syndrome(codeword) != 0 {
                corrected += 1;
            }
        }
        *byte = decode_byte([pair[0], pair[1]]);
    }

    DecodedFrame {
        frame: UnencodedFrame::new(bytes),
        parity_differ,
        corrected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_codewords_have_zero_syndrome() {
        for nibble in 0..16 {
            assert_eq!(syndrome(encode_nibble(nibble)), 0, "nibble {nibble:#x}");
        }
    }

    #[test]
    fn each_protected_bit_has_a_unique_syndrome() {
        let codeword = encode_nibble(0b1011);
        let mut seen = [false; 8];
        for position in 1..8 {
            let s = syndrome(codeword ^ (1 << position)) as usize;
            assert_ne!(s, 0);
            assert!(!seen[s], "syndrome {s} reused");
            seen[s] = true;
            assert_eq!(SYNDROME_CORRECTION[s], 1 << position);
        }
    }

    #[test]
    fn known_codewords() {
        assert_eq!(encode_nibble(0x0), 0x00);
        // D0 set: H1, H2 set, three ones in bits 1..7 -> P0 = 1
        assert_eq!(encode_nibble(0x1), 0x1D);
        assert_eq!(encode_nibble(0xF), 0xFF);
    }
}
