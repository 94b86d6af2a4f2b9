//! Scaled-integer embedding into the BLS12-381 scalar field.
//!
//! Shares carry fixed-point values as elements of `Fr`, a ~255-bit prime
//! field. Signed integers embed as `v mod p`; the field is wide enough
//! that every masked integer the truncation protocol opens (below 2^161)
//! stays an ordinary nonnegative integer with no wraparound.

use ark_bls12_381::Fr;
use ark_ff::{Field, PrimeField};

/// The prime field all shares live in.
pub type Fp = Fr;

/// Embeds a signed scaled integer as a field element.
pub fn to_element(v: i128) -> Fp {
    if v >= 0 {
        Fp::from(v as u128)
    } else {
        -Fp::from(v.unsigned_abs())
    }
}

/// Lifts a field element back to a signed integer.
///
/// Elements above (p-1)/2 decode as negatives. The magnitude must fit in
/// 127 bits, which holds for every value this crate opens and lifts.
pub fn to_signed(v: Fp) -> i128 {
    let repr = v.into_bigint();
    if repr > Fp::MODULUS_MINUS_ONE_DIV_TWO {
        -(low_u128((-v).into_bigint()) as i128)
    } else {
        low_u128(repr) as i128
    }
}

/// Reduces a nonnegative opened value modulo 2^m, m <= 128.
///
/// Operates directly on the limb representation: opened masks are
/// integers below 2^161 < p, so the canonical representative is the
/// integer itself and its low limbs are the low bits.
pub fn low_bits(v: Fp, m: u32) -> u128 {
    debug_assert!(m <= 128);
    let limbs = v.into_bigint().0;
    let low = limbs[0] as u128 | (limbs[1] as u128) << 64;
    if m == 128 {
        low
    } else {
        low & ((1u128 << m) - 1)
    }
}

/// 2^m as a field element.
pub fn pow2(m: u32) -> Fp {
    debug_assert!(m < 128);
    Fp::from(1u128 << m)
}

/// Multiplicative inverse of 2^m. Always defined: 2^m is a unit mod p.
pub fn pow2_inverse(m: u32) -> Fp {
    pow2(m).inverse().expect("2^m is a unit")
}

fn low_u128(repr: <Fp as PrimeField>::BigInt) -> u128 {
    debug_assert!(
        repr.0[2] == 0 && repr.0[3] == 0,
        "lifted value exceeds 128 bits"
    );
    repr.0[0] as u128 | (repr.0[1] as u128) << 64
}
