//! # Word Packing
//!
//! Converts between byte strings and sequences of 10-bit word values. The
//! bit string is right-aligned: the last bit of the last word is the last bit
//! of the last byte, and any slack sits as zero padding at the very front.

use crate::config::{RADIX_BITS, WORD_MASK};
use crate::error::{Result, Slip39Error};

/// Number of words needed to carry `byte_count` bytes.
pub fn word_count_for(byte_count: usize) -> usize {
    (byte_count * 8 + RADIX_BITS - 1) / RADIX_BITS
}

/// Byte length of a share value carried by `word_count` words.
///
/// Share values are always an even number of bytes, so the padding is
/// `10n mod 16`. Padding beyond one byte means the word count cannot belong
/// to any valid value. When the padding is exactly 8 bits, the naive
/// `ceil(10n / 8)` decoding has one synthesized all-zero leading byte that is
/// dropped here; this is what keeps e.g. 20 words at 24 bytes rather than 25.
pub fn value_byte_len(word_count: usize) -> Result<usize> {
    let bits = RADIX_BITS * word_count;
    let padding = bits % 16;
    if padding > 8 {
        return Err(Slip39Error::InvalidPadding);
    }
    Ok((bits - padding) / 8)
}

/// Pack `bytes` into 10-bit words, zero-padding at the front.
pub fn encode_words(bytes: &[u8]) -> Vec<u16> {
    let word_count = word_count_for(bytes.len());
    let mut words = Vec::with_capacity(word_count);

    // Start with the padding bits already "in" the accumulator as zeros.
    let mut acc: u32 = 0;
    let mut bits = word_count * RADIX_BITS - bytes.len() * 8;

    for &byte in bytes {
        acc = (acc << 8) | byte as u32;
        bits += 8;
        while bits >= RADIX_BITS {
            bits -= RADIX_BITS;
            words.push(((acc >> bits) & WORD_MASK) as u16);
            acc &= (1 << bits) - 1;
        }
    }

    debug_assert_eq!(bits, 0);
    words
}

/// Unpack `byte_count` bytes from 10-bit words.
///
/// The leading `10 * words.len() - 8 * byte_count` bits are padding. They
/// must be fewer than one word and all zero, otherwise the encoding is not
/// canonical and [`Slip39Error::InvalidPadding`] is returned.
pub fn decode_words(words: &[u16], byte_count: usize) -> Result<Vec<u8>> {
    let total_bits = words.len() * RADIX_BITS;
    if byte_count * 8 > total_bits {
        return Err(Slip39Error::InvalidPadding);
    }
    let padding = total_bits - byte_count * 8;
    if padding >= RADIX_BITS {
        return Err(Slip39Error::InvalidPadding);
    }

    let mut bytes = Vec::with_capacity(byte_count);
    let mut acc: u32 = 0;
    let mut bits = 0usize;
    let mut skip = padding;

    for &word in words {
        acc = (acc << RADIX_BITS) | (word as u32 & WORD_MASK);
        bits += RADIX_BITS;

        // All padding lives in the first word.
        if skip > 0 {
            bits -= skip;
            if acc >> bits != 0 {
                return Err(Slip39Error::InvalidPadding);
            }
            skip = 0;
        }

        while bits >= 8 {
            bits -= 8;
            bytes.push((acc >> bits) as u8);
            acc &= (1 << bits) - 1;
        }
    }

    debug_assert_eq!(bytes.len(), byte_count);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn word_counts() {
        assert_eq!(word_count_for(16), 13);
        assert_eq!(word_count_for(20), 16);
        assert_eq!(word_count_for(24), 20);
        assert_eq!(word_count_for(32), 26);
    }

    #[test]
    fn value_lengths_for_every_supported_secret() {
        for len in (16..=32).step_by(2) {
            assert_eq!(value_byte_len(word_count_for(len)).unwrap(), len);
        }
    }

    #[test]
    fn impossible_word_counts_rejected() {
        // 14 words = 140 bits, 140 mod 16 = 12 bits of padding.
        assert_eq!(value_byte_len(14), Err(Slip39Error::InvalidPadding));
    }

    #[test]
    fn right_aligned_packing() {
        // 2 bytes = 16 bits -> 2 words, 4 bits of leading padding.
        assert_eq!(encode_words(&[0xFF, 0xFF]), vec![0x03F, 0x3FF]);
        assert_eq!(encode_words(&[0x80, 0x01]), vec![0x020, 0x001]);
    }

    #[test]
    fn roundtrip_random_buffers() {
        let mut rng = rand::thread_rng();
        for len in 0..=40 {
            let mut buf = vec![0u8; len];
            rng.fill_bytes(&mut buf);
            let words = encode_words(&buf);
            assert_eq!(words.len(), word_count_for(len));
            assert!(words.iter().all(|&w| (w as u32) <= WORD_MASK));
            assert_eq!(decode_words(&words, len).unwrap(), buf);
        }
    }

    #[test]
    fn nonzero_padding_rejected() {
        let mut words = encode_words(&[0x12, 0x34]);
        words[0] |= 0x200;
        assert_eq!(decode_words(&words, 2), Err(Slip39Error::InvalidPadding));
    }

    #[test]
    fn padding_of_a_full_word_rejected() {
        let words = encode_words(&[0xAB; 16]);
        // 13 words asked to yield only 15 bytes -> 10 bits of padding.
        assert_eq!(decode_words(&words, 15), Err(Slip39Error::InvalidPadding));
        assert_eq!(decode_words(&words, 17), Err(Slip39Error::InvalidPadding));
    }

    #[test]
    fn twenty_words_drop_synthesized_leading_byte() {
        let value: Vec<u8> = (1..=24).collect();
        let words = encode_words(&value);
        assert_eq!(words.len(), 20);
        // Naively the 200 bits hold 25 bytes; the first one is pure padding.
        let len = value_byte_len(words.len()).unwrap();
        assert_eq!(len, 24);
        assert_eq!(decode_words(&words, len).unwrap(), value);

        let mut tampered = words.clone();
        tampered[0] |= 0x100;
        assert_eq!(decode_words(&tampered, len), Err(Slip39Error::InvalidPadding));
    }
}
