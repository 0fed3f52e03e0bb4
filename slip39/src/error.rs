//! Error types for SLIP-39 share generation and recovery.
//!
//! Every fallible operation in the crate returns a [`Slip39Error`]. Errors are
//! terminal for the attempt: nothing is retried internally and no partial
//! output is ever produced. Callers that only care about the broad failure
//! class (e.g. to pick a UI message) match on [`Slip39Error::kind`].

use thiserror::Error;

/// Coarse classification of a [`Slip39Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad parameters, rejected before any cryptographic work.
    Validation,
    /// A mnemonic that cannot be parsed into words of the right count.
    Format,
    /// RS1024 checksum mismatch.
    Checksum,
    /// Non-zero or oversized padding in the value words.
    Padding,
    /// Shares that do not belong together.
    Consistency,
    /// Shares that belong together but reconstruct to an inconsistent secret.
    DigestMismatch,
    /// Not enough shares to meet a threshold.
    InsufficientShares,
}

/// Errors produced by the SLIP-39 engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Slip39Error {
    /// Master secret length is odd or outside 128..=256 bits.
    #[error("master secret must be an even number of bytes between 16 and 32, got {0}")]
    InvalidSecretLength(usize),

    /// A member threshold/count pair violates `1 <= threshold <= count <= 16`.
    #[error("invalid threshold {threshold} for {count} shares")]
    InvalidThreshold {
        /// Requested threshold.
        threshold: u8,
        /// Requested share count.
        count: u8,
    },

    /// The group threshold violates `1 <= threshold <= group count <= 16`.
    #[error("invalid group threshold {threshold} for {count} groups")]
    InvalidGroupThreshold {
        /// Requested or decoded group threshold.
        threshold: u8,
        /// Requested or decoded group count.
        count: u8,
    },

    /// A group asks for several member shares with member threshold 1.
    #[error("group {group} has threshold 1 but {count} members; use a single member instead")]
    SingleMemberThreshold {
        /// Offending group index.
        group: usize,
        /// Requested member count.
        count: u8,
    },

    /// Iteration exponent does not fit in 5 bits.
    #[error("iteration exponent must be at most 31, got {0}")]
    InvalidIterationExponent(u8),

    /// Identifier does not fit in 15 bits.
    #[error("identifier must be less than 32768, got {0}")]
    InvalidIdentifier(u16),

    /// Passphrase contains characters outside printable ASCII.
    #[error("passphrase must consist of printable ASCII characters")]
    InvalidPassphrase,

    /// A word is not in the SLIP-39 wordlist.
    #[error("unknown mnemonic word: {0}")]
    UnknownWord(String),

    /// The mnemonic word count cannot hold metadata, a 128..=256-bit value
    /// and the checksum.
    #[error("mnemonic must have between {min} and {max} words, got {got}")]
    InvalidMnemonicLength {
        /// Minimum accepted word count.
        min: usize,
        /// Maximum accepted word count.
        max: usize,
        /// Actual word count.
        got: usize,
    },

    /// RS1024 verification failed.
    #[error("invalid mnemonic checksum")]
    InvalidMnemonicChecksum,

    /// The value words carry padding that is too long or not all zero.
    #[error("invalid mnemonic padding")]
    InvalidPadding,

    /// Interpolation points differ in length or are empty.
    #[error("share values have inconsistent lengths: expected {expected}, got {got}")]
    InvalidShareLength {
        /// Length of the first point.
        expected: usize,
        /// Length of the offending point.
        got: usize,
    },

    /// Shares disagree on a parameter that must be common to the whole set.
    #[error("shares are inconsistent: {0}")]
    Inconsistent(String),

    /// Two shares claim the same x-coordinate.
    #[error("duplicate member index {0}")]
    DuplicateMemberIndex(u8),

    /// A group has fewer members than its member threshold.
    #[error("group {group} needs {threshold} member shares, got {got}")]
    NotEnoughMemberShards {
        /// Group index.
        group: u8,
        /// That group's member threshold.
        threshold: u8,
        /// Members supplied.
        got: usize,
    },

    /// Fewer shares or groups than the threshold requires.
    #[error("insufficient shares: need {required}, got {got}")]
    InsufficientShares {
        /// Threshold to meet.
        required: u8,
        /// Shares or groups supplied.
        got: usize,
    },

    /// The digest share does not authenticate the interpolated secret.
    #[error("share digest mismatch")]
    DigestMismatch,

    /// Recovery was attempted with no mnemonics at all.
    #[error("no shares provided")]
    EmptyShareSet,
}

impl Slip39Error {
    /// The broad failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSecretLength(_)
            | Self::InvalidThreshold { .. }
            | Self::InvalidGroupThreshold { .. }
            | Self::SingleMemberThreshold { .. }
            | Self::InvalidIterationExponent(_)
            | Self::InvalidIdentifier(_)
            | Self::InvalidPassphrase
            | Self::InvalidShareLength { .. } => ErrorKind::Validation,
            Self::UnknownWord(_) | Self::InvalidMnemonicLength { .. } => ErrorKind::Format,
            Self::InvalidMnemonicChecksum => ErrorKind::Checksum,
            Self::InvalidPadding => ErrorKind::Padding,
            Self::Inconsistent(_) | Self::DuplicateMemberIndex(_) => ErrorKind::Consistency,
            Self::DigestMismatch => ErrorKind::DigestMismatch,
            Self::NotEnoughMemberShards { .. }
            | Self::InsufficientShares { .. }
            | Self::EmptyShareSet => ErrorKind::InsufficientShares,
        }
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Slip39Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Slip39Error::InvalidMnemonicChecksum.kind(), ErrorKind::Checksum);
        assert_eq!(Slip39Error::DuplicateMemberIndex(3).kind(), ErrorKind::Consistency);
        assert_eq!(
            Slip39Error::NotEnoughMemberShards { group: 0, threshold: 3, got: 2 }.kind(),
            ErrorKind::InsufficientShares
        );
        assert_eq!(Slip39Error::InvalidPadding.kind(), ErrorKind::Padding);
    }

    #[test]
    fn messages_are_human_readable() {
        let err = Slip39Error::InsufficientShares { required: 3, got: 2 };
        assert_eq!(err.to_string(), "insufficient shares: need 3, got 2");
    }
}
