//! # Share Mnemonics
//!
//! A share is one member's piece of a backup plus enough metadata to know
//! where it belongs. On paper it is a list of words:
//!
//! ```text
//! | id (15) | e (5) | GI (4) | Gt (4) | g (4) | I (4) | t (4) | value ... | checksum (30) |
//! |<- word 0 ->|<- 1 ->|<------ word 2 ------>|<------- word 3 ------->|
//! ```
//!
//! Thresholds and the group count are stored minus one so that 16 fits in
//! four bits. The value is packed right-aligned by [`crate::encoding::words`]
//! and the whole sequence is protected by RS1024.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::{
    CHECKSUM_LENGTH_WORDS, MAX_IDENTIFIER, MAX_ITERATION_EXPONENT, MAX_MNEMONIC_LENGTH_WORDS,
    MAX_SHARE_COUNT, METADATA_WORDS, MIN_MNEMONIC_LENGTH_WORDS,
};
use crate::encoding::{rs1024, wordlist, words};
use crate::error::{Result, Slip39Error};

/// One member share of a SLIP-39 backup.
///
/// Fields hold their natural values (thresholds and counts are `1..=16`,
/// indices `0..16`); the minus-one storage only exists on the wire.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// Random 15-bit backup identifier, common to all shares of a backup.
    pub identifier: u16,
    /// PBKDF2 iteration exponent used by the Feistel cipher.
    pub iteration_exponent: u8,
    /// Index of this share's group, `0..group_count`.
    pub group_index: u8,
    /// Number of groups needed to recover.
    pub group_threshold: u8,
    /// Total number of groups.
    pub group_count: u8,
    /// Index of this member within its group.
    pub member_index: u8,
    /// Number of members of this group needed to recover the group secret.
    pub member_threshold: u8,
    /// The share value, as long as the master secret.
    pub value: Vec<u8>,
}

/// Share metadata without the value, as reported by
/// [`crate::check_single_share`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInfo {
    /// Backup identifier.
    pub identifier: u16,
    /// Iteration exponent.
    pub iteration_exponent: u8,
    /// Group index.
    pub group_index: u8,
    /// Group threshold.
    pub group_threshold: u8,
    /// Group count.
    pub group_count: u8,
    /// Member index.
    pub member_index: u8,
    /// Member threshold.
    pub member_threshold: u8,
    /// Length of the share value (and of the master secret) in bytes.
    pub value_length: usize,
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("identifier", &self.identifier)
            .field("iteration_exponent", &self.iteration_exponent)
            .field("group_index", &self.group_index)
            .field("group_threshold", &self.group_threshold)
            .field("group_count", &self.group_count)
            .field("member_index", &self.member_index)
            .field("member_threshold", &self.member_threshold)
            .field("value", &format_args!("<{} bytes>", self.value.len()))
            .finish()
    }
}

impl Share {
    /// Metadata view of this share.
    pub fn info(&self) -> ShareInfo {
        ShareInfo {
            identifier: self.identifier,
            iteration_exponent: self.iteration_exponent,
            group_index: self.group_index,
            group_threshold: self.group_threshold,
            group_count: self.group_count,
            member_index: self.member_index,
            member_threshold: self.member_threshold,
            value_length: self.value.len(),
        }
    }

    /// Check every field fits its bit width and thresholds do not exceed
    /// counts where the share itself knows both.
    fn validate_fields(&self) -> Result<()> {
        if self.identifier >= MAX_IDENTIFIER {
            return Err(Slip39Error::InvalidIdentifier(self.identifier));
        }
        if self.iteration_exponent > MAX_ITERATION_EXPONENT {
            return Err(Slip39Error::InvalidIterationExponent(self.iteration_exponent));
        }
        if self.group_count == 0
            || self.group_count > MAX_SHARE_COUNT
            || self.group_threshold == 0
            || self.group_threshold > self.group_count
            || self.group_index >= self.group_count
        {
            return Err(Slip39Error::InvalidGroupThreshold {
                threshold: self.group_threshold,
                count: self.group_count,
            });
        }
        if self.member_threshold == 0
            || self.member_threshold > MAX_SHARE_COUNT
            || self.member_index >= MAX_SHARE_COUNT
        {
            return Err(Slip39Error::InvalidThreshold {
                threshold: self.member_threshold,
                count: MAX_SHARE_COUNT,
            });
        }
        Ok(())
    }

    /// Encode as word indices, checksum included.
    pub fn to_words(&self) -> Result<Zeroizing<Vec<u16>>> {
        self.validate_fields()?;

        let id = self.identifier;
        let e = self.iteration_exponent as u16;
        let gi = self.group_index as u16;
        let gt = self.group_threshold as u16 - 1;
        let gc = self.group_count as u16 - 1;
        let mi = self.member_index as u16;
        let mt = self.member_threshold as u16 - 1;

        let value_words = Zeroizing::new(words::encode_words(&self.value));
        let mut out = Zeroizing::new(Vec::with_capacity(
            METADATA_WORDS + value_words.len() + CHECKSUM_LENGTH_WORDS,
        ));
        out.push(id >> 5);
        out.push(((id & 0x1F) << 5) | e);
        out.push((gi << 6) | (gt << 2) | (gc >> 2));
        out.push(((gc & 0x3) << 8) | (mi << 4) | mt);
        out.extend_from_slice(&value_words);
        out.extend_from_slice(&[0; CHECKSUM_LENGTH_WORDS]);
        rs1024::create_checksum(&mut out);
        Ok(out)
    }

    /// Encode as a space-separated mnemonic.
    pub fn to_mnemonic(&self) -> Result<String> {
        let indices = self.to_words()?;
        Ok(indices
            .iter()
            .map(|&i| wordlist::word_at(i))
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Decode word indices. The checksum is verified before any field is
    /// read.
    pub fn from_words(indices: &[u16]) -> Result<Self> {
        if !(MIN_MNEMONIC_LENGTH_WORDS..=MAX_MNEMONIC_LENGTH_WORDS).contains(&indices.len()) {
            return Err(Slip39Error::InvalidMnemonicLength {
                min: MIN_MNEMONIC_LENGTH_WORDS,
                max: MAX_MNEMONIC_LENGTH_WORDS,
                got: indices.len(),
            });
        }
        if !rs1024::verify_checksum(indices) {
            return Err(Slip39Error::InvalidMnemonicChecksum);
        }

        let w = |i: usize| indices[i] & 0x3FF;
        let identifier = (w(0) << 5) | (w(1) >> 5);
        let iteration_exponent = (w(1) & 0x1F) as u8;
        let group_index = (w(2) >> 6) as u8;
        let group_threshold = ((w(2) >> 2) & 0xF) as u8 + 1;
        let group_count = (((w(2) & 0x3) << 2) | (w(3) >> 8)) as u8 + 1;
        let member_index = ((w(3) >> 4) & 0xF) as u8;
        let member_threshold = (w(3) & 0xF) as u8 + 1;

        let value_words = &indices[METADATA_WORDS..indices.len() - CHECKSUM_LENGTH_WORDS];
        let value_length = words::value_byte_len(value_words.len())?;
        let value = words::decode_words(value_words, value_length)?;

        if group_threshold > group_count {
            return Err(Slip39Error::InvalidGroupThreshold {
                threshold: group_threshold,
                count: group_count,
            });
        }

        Ok(Self {
            identifier,
            iteration_exponent,
            group_index,
            group_threshold,
            group_count,
            member_index,
            member_threshold,
            value,
        })
    }

    /// Decode a mnemonic. Words are separated by any whitespace and matched
    /// case-insensitively.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self> {
        let indices = Zeroizing::new(mnemonic_to_indices(mnemonic)?);
        Self::from_words(&indices)
    }
}

/// Map each word of `mnemonic` to its wordlist index.
pub fn mnemonic_to_indices(mnemonic: &str) -> Result<Vec<u16>> {
    mnemonic
        .split_whitespace()
        .map(|word| {
            let lower = Zeroizing::new(word.to_lowercase());
            wordlist::word_index(&lower).ok_or_else(|| Slip39Error::UnknownWord(lower.to_string()))
        })
        .collect()
}
