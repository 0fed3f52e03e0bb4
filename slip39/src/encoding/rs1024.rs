//! # RS1024 Checksum
//!
//! A Reed-Solomon code over GF(1024) producing three 10-bit check words. It
//! detects any error touching at most three words, and anything worse slips
//! through with probability below 1 in 10^9. The customization string is
//! prepended to the data so that checksums are bound to the share format.

use crate::config::{CHECKSUM_LENGTH_WORDS, CUSTOMIZATION_STRING, RADIX_BITS, WORD_MASK};

/// Generator polynomial coefficients.
const GENERATOR: [u32; 10] = [
    0x00E0_E040,
    0x01C1_C080,
    0x0383_8100,
    0x0707_0200,
    0x0E0E_0009,
    0x1C0C_2412,
    0x3808_6C24,
    0x3090_FC48,
    0x21B1_F890,
    0x03F3_F120,
];

/// Run the RS1024 state machine over the customization string followed by
/// `words`.
fn polymod(words: &[u16]) -> u32 {
    let values = CUSTOMIZATION_STRING
        .iter()
        .map(|&b| b as u32)
        .chain(words.iter().map(|&w| w as u32 & WORD_MASK));

    let mut state: u32 = 1;
    for v in values {
        let top = state >> 20;
        state = ((state & 0x000F_FFFF) << RADIX_BITS) ^ v;
        for (bit, gen) in GENERATOR.iter().enumerate() {
            if (top >> bit) & 1 == 1 {
                state ^= gen;
            }
        }
    }
    state
}

/// Fill the last three words of `words` with the checksum of everything
/// before them.
///
/// Whatever the trailing three slots hold on entry is overwritten.
///
/// # Panics
///
/// If `words` is shorter than the checksum itself.
pub fn create_checksum(words: &mut [u16]) {
    assert!(words.len() >= CHECKSUM_LENGTH_WORDS, "no room for checksum");
    let start = words.len() - CHECKSUM_LENGTH_WORDS;
    words[start..].fill(0);

    let checksum = polymod(words) ^ 1;
    for (i, slot) in words[start..].iter_mut().enumerate() {
        let shift = RADIX_BITS * (CHECKSUM_LENGTH_WORDS - 1 - i);
        *slot = ((checksum >> shift) & WORD_MASK) as u16;
    }
}

/// `true` if `words` (data followed by its checksum) is consistent.
pub fn verify_checksum(words: &[u16]) -> bool {
    polymod(words) == 1
}
