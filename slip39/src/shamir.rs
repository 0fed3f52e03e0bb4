//! # Shamir's Secret Sharing over GF(256)
//!
//! Splits a secret into `count` points on a random polynomial of degree
//! `threshold - 1`, such that any `threshold` points reconstruct it and fewer
//! reveal nothing. This is the SLIP-39 flavour of the scheme, which differs
//! from textbook Shamir in two ways:
//!
//! - The secret is not the constant term. It is the polynomial's value at
//!   `x = 255` ([`SECRET_INDEX`]), and a digest of it sits at `x = 254`
//!   ([`DIGEST_INDEX`]). The polynomial is pinned down by those two points
//!   plus `threshold - 2` random points at `x = 0, 1, ...`, and the shares
//!   are simply its values at `x = 0..count`.
//! - Recovery checks the digest, so a set of shares from the same backup
//!   that does not interpolate to a consistent polynomial is detected
//!   instead of silently producing garbage.
//!
//! All arithmetic is per byte; every byte position is an independent
//! polynomial over the same x-coordinates.

use std::fmt;

use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::{
    DIGEST_INDEX, DIGEST_LENGTH_BYTES, MAX_SECRET_LENGTH, MAX_SHARE_COUNT, MIN_SECRET_LENGTH,
    SECRET_INDEX,
};
use crate::error::{Result, Slip39Error};
use crate::gf256;

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Public Types
// ---------------------------------------------------------------------------

/// A point `(index, value)` on the sharing polynomial.
///
/// `value` has one byte per byte of the shared secret. Points are wiped from
/// memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharePoint {
    /// The x-coordinate. Member and group indices use `0..16`.
    pub index: u8,
    /// The y-coordinates, one per secret byte.
    pub value: Vec<u8>,
}

impl SharePoint {
    /// Create a point.
    pub fn new(index: u8, value: Vec<u8>) -> Self {
        Self { index, value }
    }
}

impl fmt::Debug for SharePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharePoint")
            .field("index", &self.index)
            .field("value", &format_args!("<{} bytes>", self.value.len()))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Evaluate, at `x`, the unique polynomial of degree `points.len() - 1`
/// passing through `points`.
///
/// If `x` is one of the known indices that point's value is returned as is.
/// This is not just a shortcut: the Lagrange weights below divide by
/// `x - x_j`, which is zero there.
pub fn interpolate(points: &[SharePoint], x: u8) -> Result<Zeroizing<Vec<u8>>> {
    let first = points.first().ok_or(Slip39Error::InsufficientShares { required: 1, got: 0 })?;
    let len = first.value.len();

    let mut seen = [false; 256];
    for point in points {
        if point.value.len() != len {
            return Err(Slip39Error::InvalidShareLength {
                expected: len,
                got: point.value.len(),
            });
        }
        if seen[point.index as usize] {
            return Err(Slip39Error::DuplicateMemberIndex(point.index));
        }
        seen[point.index as usize] = true;
    }

    if let Some(point) = points.iter().find(|p| p.index == x) {
        return Ok(Zeroizing::new(point.value.clone()));
    }

    let mut result = Zeroizing::new(vec![0u8; len]);
    for (i, point) in points.iter().enumerate() {
        // log of the Lagrange basis polynomial L_i(x), kept non-negative.
        let log_weight = points
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .fold(0usize, |acc, (_, other)| {
                acc + gf256::log(x ^ other.index) + gf256::ORDER
                    - gf256::log(point.index ^ other.index)
            });
        let weight = gf256::exp(log_weight);

        for (out, &y) in result.iter_mut().zip(point.value.iter()) {
            *out ^= gf256::mul(y, weight);
        }
    }

    Ok(result)
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

fn keyed_digest(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
}

/// First [`DIGEST_LENGTH_BYTES`] bytes of `HMAC-SHA256(key = random_part, msg = secret)`.
fn create_digest(random_part: &[u8], secret: &[u8]) -> [u8; DIGEST_LENGTH_BYTES] {
    let mut mac = keyed_digest(random_part);
    mac.update(secret);
    let mut full = mac.finalize().into_bytes();
    let mut digest = [0u8; DIGEST_LENGTH_BYTES];
    digest.copy_from_slice(&full[..DIGEST_LENGTH_BYTES]);
    full.as_mut_slice().zeroize();
    digest
}

// ---------------------------------------------------------------------------
// Split and Recover
// ---------------------------------------------------------------------------

fn validate_threshold(threshold: u8, count: u8) -> Result<()> {
    if threshold == 0 || threshold > count || count > MAX_SHARE_COUNT {
        return Err(Slip39Error::InvalidThreshold { threshold, count });
    }
    Ok(())
}

/// Split `secret` into `count` shares, any `threshold` of which recover it.
///
/// Shares are returned with indices `0..count`. With `threshold == 1` every
/// share is a verbatim copy of the secret.
pub fn split_secret<R: RngCore + CryptoRng>(
    rng: &mut R,
    threshold: u8,
    count: u8,
    secret: &[u8],
) -> Result<Vec<SharePoint>> {
    validate_threshold(threshold, count)?;
    if !(MIN_SECRET_LENGTH..=MAX_SECRET_LENGTH).contains(&secret.len()) {
        return Err(Slip39Error::InvalidSecretLength(secret.len()));
    }

    debug!(threshold, count, "splitting secret");

    if threshold == 1 {
        return Ok((0..count)
            .map(|i| SharePoint::new(i, secret.to_vec()))
            .collect());
    }

    let random_count = threshold as usize - 2;
    let mut base = Vec::with_capacity(threshold as usize);
    for i in 0..random_count {
        let mut value = vec![0u8; secret.len()];
        rng.fill_bytes(&mut value);
        base.push(SharePoint::new(i as u8, value));
    }

    let mut digest_value = vec![0u8; secret.len()];
    rng.fill_bytes(&mut digest_value[DIGEST_LENGTH_BYTES..]);
    let digest = create_digest(&digest_value[DIGEST_LENGTH_BYTES..], secret);
    digest_value[..DIGEST_LENGTH_BYTES].copy_from_slice(&digest);
    base.push(SharePoint::new(DIGEST_INDEX, digest_value));
    base.push(SharePoint::new(SECRET_INDEX, secret.to_vec()));

    let mut shares = Vec::with_capacity(count as usize);
    for x in 0..count {
        let mut value = interpolate(&base, x)?;
        shares.push(SharePoint::new(x, std::mem::take(&mut *value)));
    }
    Ok(shares)
}

/// Recover a secret from at least `threshold` shares and verify its digest.
///
/// Any point set of the right size interpolates to *something*; the digest
/// check is what turns a wrong combination (shares from different splits of
/// the same backup, a mistyped-but-checksummed share) into
/// [`Slip39Error::DigestMismatch`].
pub fn recover_secret(threshold: u8, points: &[SharePoint]) -> Result<Zeroizing<Vec<u8>>> {
    if threshold == 0 {
        return Err(Slip39Error::InvalidThreshold { threshold, count: points.len() as u8 });
    }
    if points.len() < threshold as usize {
        return Err(Slip39Error::InsufficientShares {
            required: threshold,
            got: points.len(),
        });
    }

    if threshold == 1 {
        return Ok(Zeroizing::new(points[0].value.clone()));
    }

    let secret = interpolate(points, SECRET_INDEX)?;
    let digest_share = interpolate(points, DIGEST_INDEX)?;
    if digest_share.len() < DIGEST_LENGTH_BYTES {
        return Err(Slip39Error::DigestMismatch);
    }

    let mut mac = keyed_digest(&digest_share[DIGEST_LENGTH_BYTES..]);
    mac.update(&secret);
    mac.verify_truncated_left(&digest_share[..DIGEST_LENGTH_BYTES])
        .map_err(|_| Slip39Error::DigestMismatch)?;

    debug!(threshold, shares = points.len(), "secret recovered");
    Ok(secret)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
