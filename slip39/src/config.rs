//! # SLIP-39 Parameters
//!
//! Every magic number of the scheme lives here. These values are fixed by the
//! published SLIP-39 standard; changing any of them produces shares that no
//! other wallet on earth can read. Treat this file as read-only unless you are
//! deliberately forking the format.

// ---------------------------------------------------------------------------
// Word Encoding
// ---------------------------------------------------------------------------

/// Bits carried by a single mnemonic word. The wordlist has 2^10 entries.
pub const RADIX_BITS: usize = 10;

/// Number of words in the wordlist.
pub const RADIX: usize = 1 << RADIX_BITS;

/// Mask selecting one word's worth of bits.
pub const WORD_MASK: u32 = (RADIX as u32) - 1;

// ---------------------------------------------------------------------------
// Share Metadata
// ---------------------------------------------------------------------------

/// Length of the random backup identifier in bits.
pub const ID_LENGTH_BITS: usize = 15;

/// Exclusive upper bound for identifiers.
pub const MAX_IDENTIFIER: u16 = 1 << ID_LENGTH_BITS;

/// Length of the iteration exponent field in bits.
pub const ITERATION_EXP_LENGTH_BITS: usize = 5;

/// Largest iteration exponent the 5-bit field can carry.
pub const MAX_ITERATION_EXPONENT: u8 = (1 << ITERATION_EXP_LENGTH_BITS) - 1;

/// Words used by identifier + iteration exponent (15 + 5 bits = 2 words).
pub const ID_EXP_LENGTH_WORDS: usize = (ID_LENGTH_BITS + ITERATION_EXP_LENGTH_BITS) / RADIX_BITS;

/// Upper bound on group count, group threshold, member count and member
/// threshold. Each is stored in a 4-bit field.
pub const MAX_SHARE_COUNT: u8 = 16;

/// Words of share metadata preceding the value: id/exponent plus the two
/// group/member parameter words.
pub const METADATA_WORDS: usize = ID_EXP_LENGTH_WORDS + 2;

// ---------------------------------------------------------------------------
// Checksum
// ---------------------------------------------------------------------------

/// RS1024 checksum length in words.
pub const CHECKSUM_LENGTH_WORDS: usize = 3;

/// Customization string mixed into RS1024 and the Feistel salt.
pub const CUSTOMIZATION_STRING: &[u8] = b"shamir";

// ---------------------------------------------------------------------------
// Secret Strength
// ---------------------------------------------------------------------------

/// Weakest master secret we accept, in bits.
pub const MIN_STRENGTH_BITS: usize = 128;

/// Strongest master secret we accept, in bits.
pub const MAX_STRENGTH_BITS: usize = 256;

/// Largest secret in bytes. Bounds every working buffer in the crate.
pub const MAX_SECRET_LENGTH: usize = MAX_STRENGTH_BITS / 8;

/// Smallest secret in bytes.
pub const MIN_SECRET_LENGTH: usize = MIN_STRENGTH_BITS / 8;

/// Shortest valid mnemonic: metadata, a 128-bit value and the checksum.
pub const MIN_MNEMONIC_LENGTH_WORDS: usize =
    METADATA_WORDS + (MIN_STRENGTH_BITS + RADIX_BITS - 1) / RADIX_BITS + CHECKSUM_LENGTH_WORDS;

/// Longest valid mnemonic: metadata, a 256-bit value and the checksum.
pub const MAX_MNEMONIC_LENGTH_WORDS: usize =
    METADATA_WORDS + (MAX_STRENGTH_BITS + RADIX_BITS - 1) / RADIX_BITS + CHECKSUM_LENGTH_WORDS;

// ---------------------------------------------------------------------------
// Shamir Engine
// ---------------------------------------------------------------------------

/// Length of the digest prefix stored in the digest share.
pub const DIGEST_LENGTH_BYTES: usize = 4;

/// x-coordinate of the share holding the shared secret.
pub const SECRET_INDEX: u8 = 255;

/// x-coordinate of the share holding the digest of the shared secret.
pub const DIGEST_INDEX: u8 = 254;

// ---------------------------------------------------------------------------
// Feistel Cipher
// ---------------------------------------------------------------------------

/// Total PBKDF2 iterations across all rounds at iteration exponent 0.
pub const BASE_ITERATION_COUNT: u32 = 10_000;

/// Number of Feistel rounds.
pub const ROUND_COUNT: u8 = 4;

/// PBKDF2 iterations per round at exponent 0. Scaled by `2^e`.
pub const ROUND_ITERATIONS: u32 = BASE_ITERATION_COUNT / ROUND_COUNT as u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_lengths_match_the_standard() {
        assert_eq!(RADIX, 1024);
        assert_eq!(ID_EXP_LENGTH_WORDS, 2);
        assert_eq!(METADATA_WORDS, 4);
        assert_eq!(MIN_MNEMONIC_LENGTH_WORDS, 20);
        assert_eq!(MAX_MNEMONIC_LENGTH_WORDS, 33);
        assert_eq!(ROUND_ITERATIONS, 2500);
        assert_eq!(MAX_IDENTIFIER, 32768);
    }
}
