// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # SLIP-39: Shamir Backup Core Library
//!
//! Splits a wallet master secret into human-transcribable mnemonic shares and
//! puts it back together. This is the SLIP-39 standard, bit for bit: shares
//! produced here restore on any conforming wallet and vice versa.
//!
//! ## Architecture
//!
//! The crate is layered bottom-up, each module depending only on the ones
//! above it in this list:
//!
//! - **config**: The scheme's constants. Fixed by the standard.
//! - **gf256**: Arithmetic in GF(2^8), table-driven and constant.
//! - **encoding**: Wordlist, 10-bit word packing and the RS1024 checksum.
//! - **shamir**: Threshold splitting with a digest share for verification.
//! - **cipher**: The four-round Feistel network that binds the passphrase.
//! - **share**: One share's metadata and its mnemonic form.
//! - **backup**: Two-level (group / member) generation and recovery.
//!
//! ## Quick Start
//!
//! ```
//! use rand::rngs::OsRng;
//! use slip39::{generate_mnemonics, recover_master_secret, GroupSpec};
//!
//! let secret = [0x42u8; 16];
//! let groups = [GroupSpec::new(2, 3)?];
//! let mnemonics = generate_mnemonics(&mut OsRng, &secret, 0, None, b"", 1, &groups)?;
//!
//! let recovered = recover_master_secret(&mnemonics[0][1..], b"")?;
//! assert_eq!(*recovered, secret);
//! # Ok::<(), slip39::Slip39Error>(())
//! ```
//!
//! Mnemonics come back nested, one vector per group. Flattened, they are in
//! (group, member) order:
//!
//! ```
//! # use rand::rngs::OsRng;
//! # use slip39::{check_single_share, generate_mnemonics, GroupSpec};
//! let groups = [GroupSpec::new(1, 1)?, GroupSpec::new(2, 3)?];
//! let nested = generate_mnemonics(&mut OsRng, &[7u8; 16], 0, None, b"", 1, &groups)?;
//! let order: Vec<(u8, u8)> = nested
//!     .concat()
//!     .iter()
//!     .map(|m| check_single_share(m).map(|i| (i.group_index, i.member_index)))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(order, [(0, 0), (1, 0), (1, 1), (1, 2)]);
//! # Ok::<(), slip39::Slip39Error>(())
//! ```
//!
//! ## Ground Rules
//!
//! 1. Nothing is logged that could reconstruct a secret. Indices and
//!    thresholds only.
//! 2. Secret-bearing buffers are zeroized on drop.
//! 3. A wrong passphrase is not an error. It decrypts to a different wallet.

pub mod backup;
pub mod cipher;
pub mod config;
pub mod encoding;
pub mod error;
pub(crate) mod gf256;
pub mod shamir;
pub mod share;

pub use backup::{
    check_single_share, generate_mnemonics, generate_mnemonics_random, recover_master_secret,
    GroupProgress, GroupSpec, RecoveryProgress, RecoverySession,
};
pub use error::{ErrorKind, Result, Slip39Error};
pub use share::{Share, ShareInfo};
