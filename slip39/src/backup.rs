//! # Backup Generation & Recovery
//!
//! The two-level SLIP-39 scheme on top of the Shamir engine:
//!
//! ```text
//! master secret --encrypt--> EMS --split(GT, G)--> group shares
//!                                                   |
//!                            group share g --split(T_g, N_g)--> member shares --> mnemonics
//! ```
//!
//! Recovery runs the same picture upwards: decode and verify mnemonics, sort
//! them into groups, recover each group share from its members, recover the
//! EMS from the group shares, decrypt.
//!
//! [`RecoverySession`] is the incremental form of recovery, for flows that
//! collect shares one at a time and want to reject a share from the wrong
//! backup the moment it is entered rather than at the very end.

use std::collections::BTreeMap;

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::cipher;
use crate::config::{
    MAX_IDENTIFIER, MAX_SECRET_LENGTH, MAX_SHARE_COUNT, MAX_STRENGTH_BITS, MIN_SECRET_LENGTH,
    MIN_STRENGTH_BITS,
};
use crate::error::{Result, Slip39Error};
use crate::shamir::{self, SharePoint};
use crate::share::{Share, ShareInfo};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Member threshold and member count of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Members needed to recover this group's share.
    pub member_threshold: u8,
    /// Member shares issued for this group.
    pub member_count: u8,
}

impl GroupSpec {
    /// Create a group description, validating it.
    ///
    /// # Constraints
    ///
    /// - `1 <= member_threshold <= member_count <= 16`
    /// - a threshold of 1 only with a single member (several identical
    ///   shares protect nothing and are refused)
    pub fn new(member_threshold: u8, member_count: u8) -> Result<Self> {
        let spec = Self {
            member_threshold,
            member_count,
        };
        spec.validate(0)?;
        Ok(spec)
    }

    fn validate(&self, group: usize) -> Result<()> {
        if self.member_threshold == 0
            || self.member_threshold > self.member_count
            || self.member_count > MAX_SHARE_COUNT
        {
            return Err(Slip39Error::InvalidThreshold {
                threshold: self.member_threshold,
                count: self.member_count,
            });
        }
        if self.member_threshold == 1 && self.member_count > 1 {
            return Err(Slip39Error::SingleMemberThreshold {
                group,
                count: self.member_count,
            });
        }
        Ok(())
    }
}

fn validate_secret(secret: &[u8]) -> Result<()> {
    let len = secret.len();
    if len % 2 != 0 || !(MIN_SECRET_LENGTH..=MAX_SECRET_LENGTH).contains(&len) {
        return Err(Slip39Error::InvalidSecretLength(len));
    }
    Ok(())
}

/// SLIP-39 passphrases are restricted to printable ASCII.
fn validate_passphrase(passphrase: &[u8]) -> Result<()> {
    if passphrase.iter().all(|b| (0x20..=0x7E).contains(b)) {
        Ok(())
    } else {
        Err(Slip39Error::InvalidPassphrase)
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Split `master_secret` into SLIP-39 mnemonics.
///
/// Returns one vector of mnemonics per group, in group order, each holding
/// that group's member mnemonics in member order. Flattening the result
/// gives (group, member) order. `identifier = None` draws a
/// random one. All parameters are validated before any cryptographic work, so
/// an error never leaves partial output behind.
pub fn generate_mnemonics<R: RngCore + CryptoRng>(
    rng: &mut R,
    master_secret: &[u8],
    iteration_exponent: u8,
    identifier: Option<u16>,
    passphrase: &[u8],
    group_threshold: u8,
    groups: &[GroupSpec],
) -> Result<Vec<Vec<String>>> {
    validate_secret(master_secret)?;
    let group_count = u8::try_from(groups.len()).unwrap_or(u8::MAX);
    if group_threshold == 0 || group_threshold > group_count || group_count > MAX_SHARE_COUNT {
        return Err(Slip39Error::InvalidGroupThreshold {
            threshold: group_threshold,
            count: group_count,
        });
    }
    for (i, group) in groups.iter().enumerate() {
        group.validate(i)?;
    }
    cipher::round_iterations(iteration_exponent)?;
    validate_passphrase(passphrase)?;
    let identifier = match identifier {
        Some(id) if id >= MAX_IDENTIFIER => return Err(Slip39Error::InvalidIdentifier(id)),
        Some(id) => id,
        None => (rng.next_u32() as u16) & (MAX_IDENTIFIER - 1),
    };

    let ems = cipher::encrypt(master_secret, passphrase, iteration_exponent, identifier)?;
    let group_shares = shamir::split_secret(rng, group_threshold, group_count, &ems)?;

    let mut mnemonics = Vec::with_capacity(groups.len());
    for (group, group_share) in groups.iter().zip(group_shares.iter()) {
        let member_shares = shamir::split_secret(
            rng,
            group.member_threshold,
            group.member_count,
            &group_share.value,
        )?;

        let mut group_mnemonics = Vec::with_capacity(member_shares.len());
        for member in &member_shares {
            let share = Share {
                identifier,
                iteration_exponent,
                group_index: group_share.index,
                group_threshold,
                group_count,
                member_index: member.index,
                member_threshold: group.member_threshold,
                value: member.value.clone(),
            };
            group_mnemonics.push(share.to_mnemonic()?);
        }
        mnemonics.push(group_mnemonics);
    }

    info!(
        identifier,
        iteration_exponent,
        group_threshold,
        group_count,
        shares = mnemonics.iter().map(Vec::len).sum::<usize>(),
        "generated SLIP-39 backup"
    );
    Ok(mnemonics)
}

/// Draw a fresh master secret of `strength_bits` and split it.
///
/// `strength_bits` must be a multiple of 16 in `128..=256`. The other
/// parameters are those of [`generate_mnemonics`].
pub fn generate_mnemonics_random<R: RngCore + CryptoRng>(
    rng: &mut R,
    strength_bits: usize,
    iteration_exponent: u8,
    identifier: Option<u16>,
    passphrase: &[u8],
    group_threshold: u8,
    groups: &[GroupSpec],
) -> Result<Vec<Vec<String>>> {
    if strength_bits % 16 != 0 || !(MIN_STRENGTH_BITS..=MAX_STRENGTH_BITS).contains(&strength_bits)
    {
        return Err(Slip39Error::InvalidSecretLength(strength_bits / 8));
    }
    let mut secret = Zeroizing::new(vec![0u8; strength_bits / 8]);
    rng.fill_bytes(&mut secret);
    generate_mnemonics(
        rng,
        &secret,
        iteration_exponent,
        identifier,
        passphrase,
        group_threshold,
        groups,
    )
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// Decode one mnemonic and report its metadata.
///
/// Only the share itself is checked (word list, length, checksum, padding,
/// field ranges). Use [`RecoverySession::check_mnemonic`] to also check it
/// against shares already collected.
pub fn check_single_share(mnemonic: &str) -> Result<ShareInfo> {
    Share::from_mnemonic(mnemonic).map(|share| share.info())
}

/// Recover the master secret from a set of mnemonics.
///
/// Every mnemonic is decoded and checksum-verified before any of them is
/// compared with another. The caller owns the returned secret; it is wiped
/// when dropped. A wrong passphrase is not an error.
pub fn recover_master_secret<S: AsRef<str>>(
    mnemonics: &[S],
    passphrase: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if mnemonics.is_empty() {
        return Err(Slip39Error::EmptyShareSet);
    }
    let shares = mnemonics
        .iter()
        .map(|m| Share::from_mnemonic(m.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let mut session = RecoverySession::new();
    for share in shares {
        session.add_share(share)?;
    }
    session.recover(passphrase)
}

/// Parameters every share of one backup must agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommonParams {
    identifier: u16,
    iteration_exponent: u8,
    group_threshold: u8,
    group_count: u8,
    value_length: usize,
}

impl CommonParams {
    fn of(share: &Share) -> Self {
        Self {
            identifier: share.identifier,
            iteration_exponent: share.iteration_exponent,
            group_threshold: share.group_threshold,
            group_count: share.group_count,
            value_length: share.value.len(),
        }
    }

    /// Describe the first field in which `other` differs, if any.
    fn mismatch(&self, other: &Self) -> Option<String> {
        if self.identifier != other.identifier {
            return Some(format!(
                "identifier {} does not match {}",
                other.identifier, self.identifier
            ));
        }
        if self.iteration_exponent != other.iteration_exponent {
            return Some(format!(
                "iteration exponent {} does not match {}",
                other.iteration_exponent, self.iteration_exponent
            ));
        }
        if self.group_threshold != other.group_threshold || self.group_count != other.group_count {
            return Some(format!(
                "group parameters {}-of-{} do not match {}-of-{}",
                other.group_threshold, other.group_count, self.group_threshold, self.group_count
            ));
        }
        if self.value_length != other.value_length {
            return Some(format!(
                "share length {} does not match {}",
                other.value_length, self.value_length
            ));
        }
        None
    }
}

/// Members collected so far for one group.
#[derive(Debug, Clone)]
struct MemberSet {
    member_threshold: u8,
    members: Vec<SharePoint>,
}

impl MemberSet {
    fn is_complete(&self) -> bool {
        self.members.len() >= self.member_threshold as usize
    }
}

/// Recovery status of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProgress {
    /// Group index.
    pub group_index: u8,
    /// Members needed.
    pub member_threshold: u8,
    /// Distinct members collected.
    pub members_present: usize,
}

impl GroupProgress {
    /// Members still missing before this group can be recovered.
    pub fn remaining(&self) -> usize {
        (self.member_threshold as usize).saturating_sub(self.members_present)
    }
}

/// Recovery status of the whole backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryProgress {
    /// Groups needed.
    pub group_threshold: u8,
    /// Groups in the backup.
    pub group_count: u8,
    /// Groups with at least their member threshold of shares.
    pub groups_complete: usize,
    /// Every group that has at least one share, in index order.
    pub groups: Vec<GroupProgress>,
}

impl RecoveryProgress {
    /// `true` once enough groups are complete to recover.
    pub fn is_complete(&self) -> bool {
        self.groups_complete >= self.group_threshold as usize
    }
}

/// Incremental collection of shares for one backup.
#[derive(Debug, Clone, Default)]
pub struct RecoverySession {
    common: Option<CommonParams>,
    groups: BTreeMap<u8, MemberSet>,
}

impl RecoverySession {
    /// An empty session. The first share fixes the backup's parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `share` against the collected set without adding it.
    pub fn check_share(&self, share: &Share) -> Result<()> {
        if let Some(common) = &self.common {
            if let Some(reason) = common.mismatch(&CommonParams::of(share)) {
                return Err(Slip39Error::Inconsistent(reason));
            }
        }
        if let Some(set) = self.groups.get(&share.group_index) {
            if set.member_threshold != share.member_threshold {
                return Err(Slip39Error::Inconsistent(format!(
                    "member threshold {} of group {} does not match {}",
                    share.member_threshold, share.group_index, set.member_threshold
                )));
            }
            if set.members.iter().any(|m| m.index == share.member_index) {
                return Err(Slip39Error::DuplicateMemberIndex(share.member_index));
            }
        }
        Ok(())
    }

    /// Decode `mnemonic` and check it against the collected set without
    /// adding it.
    pub fn check_mnemonic(&self, mnemonic: &str) -> Result<ShareInfo> {
        let share = Share::from_mnemonic(mnemonic)?;
        self.check_share(&share)?;
        Ok(share.info())
    }

    /// Add a decoded share.
    pub fn add_share(&mut self, share: Share) -> Result<RecoveryProgress> {
        self.check_share(&share)?;

        self.common.get_or_insert_with(|| CommonParams::of(&share));
        let set = self
            .groups
            .entry(share.group_index)
            .or_insert_with(|| MemberSet {
                member_threshold: share.member_threshold,
                members: Vec::new(),
            });
        set.members
            .push(SharePoint::new(share.member_index, share.value.clone()));

        debug!(
            group_index = share.group_index,
            member_index = share.member_index,
            "share added to recovery session"
        );
        Ok(self.progress())
    }

    /// Decode and add a mnemonic.
    pub fn add_mnemonic(&mut self, mnemonic: &str) -> Result<RecoveryProgress> {
        let share = Share::from_mnemonic(mnemonic)?;
        self.add_share(share)
    }

    /// Where recovery stands.
    pub fn progress(&self) -> RecoveryProgress {
        let (group_threshold, group_count) = self
            .common
            .map(|c| (c.group_threshold, c.group_count))
            .unwrap_or((0, 0));
        RecoveryProgress {
            group_threshold,
            group_count,
            groups_complete: self.groups.values().filter(|s| s.is_complete()).count(),
            groups: self
                .groups
                .iter()
                .map(|(&group_index, set)| GroupProgress {
                    group_index,
                    member_threshold: set.member_threshold,
                    members_present: set.members.len(),
                })
                .collect(),
        }
    }

    /// `true` once enough groups are complete to recover.
    pub fn is_complete(&self) -> bool {
        self.common.is_some() && self.progress().is_complete()
    }

    /// Combine the collected shares into the master secret.
    ///
    /// Uses the first `group_threshold` complete groups (in index order) and
    /// exactly `member_threshold` members of each.
    pub fn recover(&self, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let common = self.common.ok_or(Slip39Error::EmptyShareSet)?;
        validate_passphrase(passphrase)?;

        let group_threshold = common.group_threshold;
        if self.groups.len() < group_threshold as usize {
            return Err(Slip39Error::InsufficientShares {
                required: group_threshold,
                got: self.groups.len(),
            });
        }

        let complete: Vec<(&u8, &MemberSet)> =
            self.groups.iter().filter(|(_, s)| s.is_complete()).collect();
        if complete.len() < group_threshold as usize {
            if let Some((&group, set)) = self.groups.iter().find(|(_, s)| !s.is_complete()) {
                return Err(Slip39Error::NotEnoughMemberShards {
                    group,
                    threshold: set.member_threshold,
                    got: set.members.len(),
                });
            }
        }

        let mut group_points = Vec::with_capacity(group_threshold as usize);
        for (&group_index, set) in complete.into_iter().take(group_threshold as usize) {
            let threshold = set.member_threshold;
            let mut secret = shamir::recover_secret(threshold, &set.members[..threshold as usize])?;
            debug!(group_index, threshold, "group share recovered");
            group_points.push(SharePoint::new(group_index, std::mem::take(&mut *secret)));
        }

        let ems = shamir::recover_secret(group_threshold, &group_points)?;
        let secret = cipher::decrypt(
            &ems,
            passphrase,
            common.iteration_exponent,
            common.identifier,
        )?;

        info!(
            identifier = common.identifier,
            groups = group_points.len(),
            "master secret recovered"
        );
        Ok(secret)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
