//! # Master Secret Encryption
//!
//! Before splitting, the master secret is run through a four-round Feistel
//! network whose round function is PBKDF2-HMAC-SHA256 keyed by the
//! passphrase. The salt binds the result to the backup identifier, so the
//! same secret and passphrase give unrelated shares across backups.
//!
//! There is deliberately no authentication at this layer. Decrypting with the
//! wrong passphrase yields a different, equally valid-looking secret; that is
//! what lets a passphrase protect a hidden wallet with plausible deniability.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{CUSTOMIZATION_STRING, MAX_ITERATION_EXPONENT, ROUND_COUNT, ROUND_ITERATIONS};
use crate::error::{Result, Slip39Error};

/// PBKDF2 iterations per round for an iteration exponent.
///
/// The 5-bit field admits exponents up to 31, but the iteration count must
/// also fit the `u32` PBKDF2 takes, which caps usable exponents at 20.
pub fn round_iterations(iteration_exponent: u8) -> Result<u32> {
    if iteration_exponent > MAX_ITERATION_EXPONENT {
        return Err(Slip39Error::InvalidIterationExponent(iteration_exponent));
    }
    u32::try_from(u64::from(ROUND_ITERATIONS) << iteration_exponent)
        .map_err(|_| Slip39Error::InvalidIterationExponent(iteration_exponent))
}

/// `"shamir" || identifier` as two big-endian bytes.
fn salt_prefix(identifier: u16) -> Vec<u8> {
    let mut salt = CUSTOMIZATION_STRING.to_vec();
    salt.extend_from_slice(&identifier.to_be_bytes());
    salt
}

/// `F(i, R) = PBKDF2(i || passphrase, salt_prefix || R, iterations, |R|)`.
fn round_function(
    round: u8,
    passphrase: &[u8],
    iterations: u32,
    salt_prefix: &[u8],
    right: &[u8],
) -> Zeroizing<Vec<u8>> {
    let mut password = Zeroizing::new(Vec::with_capacity(passphrase.len() + 1));
    password.push(round);
    password.extend_from_slice(passphrase);

    let mut salt = Zeroizing::new(Vec::with_capacity(salt_prefix.len() + right.len()));
    salt.extend_from_slice(salt_prefix);
    salt.extend_from_slice(right);

    let mut out = Zeroizing::new(vec![0u8; right.len()]);
    pbkdf2_hmac::<Sha256>(&password, &salt, iterations, &mut out);
    out
}

/// Run the network over `input` with the given round order and return
/// `R || L` of the final state.
fn feistel(
    input: &[u8],
    passphrase: &[u8],
    iteration_exponent: u8,
    identifier: u16,
    rounds: impl Iterator<Item = u8>,
) -> Result<Zeroizing<Vec<u8>>> {
    if input.is_empty() || input.len() % 2 != 0 {
        return Err(Slip39Error::InvalidSecretLength(input.len()));
    }
    let iterations = round_iterations(iteration_exponent)?;
    let salt = salt_prefix(identifier);

    let half = input.len() / 2;
    let mut left = Zeroizing::new(input[..half].to_vec());
    let mut right = Zeroizing::new(input[half..].to_vec());

    for round in rounds {
        let f = round_function(round, passphrase, iterations, &salt, &right);
        for (l, k) in left.iter_mut().zip(f.iter()) {
            *l ^= k;
        }
        std::mem::swap(&mut left, &mut right);
    }

    let mut output = Zeroizing::new(Vec::with_capacity(input.len()));
    output.extend_from_slice(&right);
    output.extend_from_slice(&left);
    Ok(output)
}

/// Encrypt a master secret into the encrypted master secret (EMS) that is
/// actually split into shares.
pub fn encrypt(
    master_secret: &[u8],
    passphrase: &[u8],
    iteration_exponent: u8,
    identifier: u16,
) -> Result<Zeroizing<Vec<u8>>> {
    debug!(iteration_exponent, identifier, "encrypting master secret");
    feistel(master_secret, passphrase, iteration_exponent, identifier, 0..ROUND_COUNT)
}

/// Invert [`encrypt`]. Never fails on a wrong passphrase; it just returns a
/// different secret.
pub fn decrypt(
    encrypted_master_secret: &[u8],
    passphrase: &[u8],
    iteration_exponent: u8,
    identifier: u16,
) -> Result<Zeroizing<Vec<u8>>> {
    debug!(iteration_exponent, identifier, "decrypting master secret");
    feistel(
        encrypted_master_secret,
        passphrase,
        iteration_exponent,
        identifier,
        (0..ROUND_COUNT).rev(),
    )
}
