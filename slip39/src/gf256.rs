//! # GF(256) Arithmetic
//!
//! The field used by SLIP-39 is GF(2^8) with the Rijndael polynomial
//! `x^8 + x^4 + x^3 + x + 1` (0x11B), the same field as AES. Element 3
//! generates the full multiplicative group of order 255, so every non-zero
//! element has a discrete log and multiplication reduces to adding logs.
//!
//! Both tables are computed at compile time and live in read-only memory.

/// Order of the multiplicative group.
pub(crate) const ORDER: usize = 255;

/// Powers of the generator and their inverse, indexed by element.
struct Tables {
    /// `exp[i] = 3^i` for `i < 255`.
    exp: [u8; ORDER],
    /// `log[3^i] = i`. `log[0]` is never read.
    log: [u8; 256],
}

/// Multiply by 3 in the field: `2a + a`, reducing by 0x11B on overflow.
const fn times_generator(a: u8) -> u8 {
    let doubled = if a & 0x80 != 0 { (a << 1) ^ 0x1B } else { a << 1 };
    doubled ^ a
}

const fn build_tables() -> Tables {
    let mut exp = [0u8; ORDER];
    let mut log = [0u8; 256];
    let mut power = 1u8;
    let mut i = 0;
    while i < ORDER {
        exp[i] = power;
        log[power as usize] = i as u8;
        power = times_generator(power);
        i += 1;
    }
    Tables { exp, log }
}

static TABLES: Tables = build_tables();

/// Discrete log of a non-zero element.
#[inline]
pub(crate) fn log(a: u8) -> usize {
    debug_assert!(a != 0, "log of zero in GF(256)");
    TABLES.log[a as usize] as usize
}

/// Generator raised to `e mod 255`.
#[inline]
pub(crate) fn exp(e: usize) -> u8 {
    TABLES.exp[e % ORDER]
}

/// Field product.
#[inline]
pub(crate) fn mul(a: u8, b: u8) -> u8 {
    match (a, b) {
        (0, _) | (_, 0) => 0,
        _ => exp(log(a) + log(b)),
    }
}
