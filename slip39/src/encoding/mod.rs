//! # Mnemonic Encoding
//!
//! Everything between raw share bytes and human-readable words:
//!
//! ```text
//! words.rs    : byte strings <-> 10-bit word values (right-aligned packing)
//! rs1024.rs   : three-word RS1024 checksum over word values
//! wordlist.rs : the 1024-word dictionary and prefix lookup
//! ```
//!
//! The share codec in [`crate::share`] glues these together; nothing in this
//! module knows what a share is.

pub mod rs1024;
pub mod wordlist;
pub mod words;

pub use rs1024::{create_checksum, verify_checksum};
pub use wordlist::{expand_prefix, word_at, word_index, words_with_prefix};
pub use words::{decode_words, encode_words};
