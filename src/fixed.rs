//! Fixed-point real arithmetic over shared scaled integers.
//!
//! Reals are carried as integers scaled by 2^F and secret-shared across
//! the parties. Addition and subtraction are local; multiplication,
//! division and the sign test are interactive protocols that suspend the
//! party's task at each reveal round. Multiplying two F-scaled integers
//! yields a 2F-scaled one, rescaled back with a probabilistic truncation
//! that costs one reveal and is off by at most one unit in the last
//! place.

use crate::context::MpcContext;
use crate::error::{MpcError, Result};
use crate::field::{low_bits, pow2, pow2_inverse, to_element, to_signed, Fp};
use crate::share::Share;
use ark_ff::{One, Zero};
use std::ops::{Add, Neg, Sub};

/// Fraction bits of the representation.
pub const F: u32 = 32;
/// Bit length of an encoded value: |round(x * 2^F)| < 2^(K-1).
pub const K: u32 = 64;
/// Statistical masking parameter for truncation and sign tests.
pub const KAPPA: u32 = 32;

/// Scale factor 2^F.
pub const SCALE: i128 = 1 << F;

/// Encodes a real number as a scaled integer, rounding to nearest.
/// The value must satisfy |x| < 2^(K-1-F).
pub fn encode(x: f64) -> i128 {
    debug_assert!(x.is_finite() && x.abs() < (1u64 << (K - 1 - F)) as f64);
    (x * SCALE as f64).round() as i128
}

/// Decodes a scaled integer back to a real number. Exact float division.
pub fn decode(v: i128) -> f64 {
    v as f64 / SCALE as f64
}

/// Uniform shared value in [0, 2^m), assembled locally from m pooled
/// random bits.
fn random_bits(ctx: &MpcContext, m: u32) -> Result<Share> {
    let mut acc = Share::constant(Fp::zero());
    for i in 0..m {
        acc = acc + ctx.get_bit()? * pow2(i);
    }
    Ok(acc)
}

/// Uniform shared value in [2^(KAPPA-1), 2^KAPPA), never zero: KAPPA-1
/// random bits under a forced top bit.
fn nonzero_mask(ctx: &MpcContext) -> Result<Share> {
    Ok(random_bits(ctx, KAPPA - 1)?.add_public(pow2(KAPPA - 1)))
}

/// Probabilistic truncation: divides a shared k-bit integer by 2^m,
/// rounding to floor plus a fractionally-biased carry (the result is off
/// by at most one in the truncated unit).
///
/// Opens x + 2^(k-1) + r1 + 2^m * r2, a nonnegative integer below
/// 2^(k+KAPPA+1); its low m bits equal (x + r1) mod 2^m, and subtracting
/// them back out leaves an exact multiple of 2^m.
async fn truncate(ctx: &MpcContext, x: Share, k: u32, m: u32) -> Result<Share> {
    debug_assert!(m < k && k + KAPPA <= 224);
    let r1 = random_bits(ctx, m)?;
    let r2 = random_bits(ctx, k + KAPPA - m)?;
    let masked = x + r1 + r2 * pow2(m) + Share::constant(pow2(k - 1));
    let c = ctx.open_share(masked).await?;
    let c2 = low_bits(c, m);
    Ok((x - Share::constant(Fp::from(c2)) + r1) * pow2_inverse(m))
}

/// A real number in shared fixed-point form.
///
/// Immutable: every operation returns a new value. `add`/`sub` (and the
/// `+`, `-` operators) are local and never suspend; `mul`, `div`, `ltz`
/// and `open` await their reveal rounds. All values in one computation
/// share the global scale F, so scales cannot mismatch.
#[derive(Clone)]
pub struct FixedPoint {
    ctx: MpcContext,
    share: Share,
}

impl FixedPoint {
    /// Public value: every party holds the clear encoding.
    pub fn public(ctx: &MpcContext, x: f64) -> Self {
        FixedPoint {
            ctx: ctx.clone(),
            share: Share::constant(to_element(encode(x))),
        }
    }

    /// Secret value: the public encoding rerandomized with a freshly
    /// consumed shared zero, so no single party's share is the value.
    pub fn secret(ctx: &MpcContext, x: f64) -> Result<Self> {
        let zero = ctx.get_zero()?;
        Ok(FixedPoint {
            ctx: ctx.clone(),
            share: zero.add_public(to_element(encode(x))),
        })
    }

    /// Wraps an existing share of an F-scaled integer.
    pub fn from_share(ctx: &MpcContext, share: Share) -> Self {
        FixedPoint {
            ctx: ctx.clone(),
            share,
        }
    }

    pub fn share(&self) -> Share {
        self.share
    }

    pub fn context(&self) -> &MpcContext {
        &self.ctx
    }

    /// Secure product: one triple plus a truncation round.
    pub async fn mul(&self, other: &FixedPoint) -> Result<FixedPoint> {
        let wide = self.ctx.multiply(self.share, other.share).await?;
        let share = truncate(&self.ctx, wide, 2 * K, F).await?;
        Ok(FixedPoint {
            ctx: self.ctx.clone(),
            share,
        })
    }

    /// Secure quotient of two shared values.
    ///
    /// The only disclosure is W = B*R, the divisor times a uniform
    /// nonzero mask. The public reciprocal of W turns the division into
    /// one more secure product and a truncation:
    /// (A*R) * round(2^(3F)/W) ~ (a/b) * 2^(3F), truncated by 2^(2F).
    /// The quotient must stay in range: |a/b| < 2^(K-1-F).
    pub async fn div(&self, divisor: &FixedPoint) -> Result<FixedPoint> {
        let ctx = &self.ctx;
        let r = nonzero_mask(ctx)?;
        let masked = ctx.multiply(divisor.share, r).await?;
        let w = to_signed(ctx.open_share(masked).await?);
        if w == 0 {
            return Err(MpcError::DegenerateDivisor);
        }
        let reciprocal = to_element(div_round_nearest(1i128 << (3 * F), w));
        let numerator = ctx.multiply(self.share, r).await? * reciprocal;
        let share = truncate(ctx, numerator, 2 * K, 2 * F).await?;
        Ok(FixedPoint {
            ctx: ctx.clone(),
            share,
        })
    }

    /// Division by a public nonzero constant: multiply by its encoded
    /// reciprocal.
    pub async fn div_public(&self, divisor: f64) -> Result<FixedPoint> {
        debug_assert!(divisor != 0.0);
        self.mul(&FixedPoint::public(&self.ctx, 1.0 / divisor)).await
    }

    /// Sign test: fixed-point 1 if the value is negative, else 0, still
    /// in shared form. Consumes one random bit as the sign mask plus
    /// masking randomness; the only disclosure is the sign-and-magnitude
    /// masked product x * rho * (1 - 2b).
    pub async fn ltz(&self) -> Result<FixedPoint> {
        let ctx = &self.ctx;
        let mask_bit = ctx.get_bit()?;
        let rho = nonzero_mask(ctx)?;
        // s = rho * (1 - 2b): magnitude rho, sign flipped when b = 1
        let s = rho - ctx.multiply(mask_bit, rho).await? * Fp::from(2u64);
        let y = to_signed(ctx.open_share(ctx.multiply(self.share, s).await?).await?);
        let share = if y == 0 {
            // the value is exactly zero, not negative
            Share::constant(Fp::zero())
        } else if y < 0 {
            // observed sign is the true sign iff b = 0
            (Share::constant(Fp::one()) - mask_bit) * pow2(F)
        } else {
            mask_bit * pow2(F)
        };
        Ok(FixedPoint {
            ctx: ctx.clone(),
            share,
        })
    }

    /// `self < other`, as a shared fixed-point boolean.
    pub async fn lt(&self, other: &FixedPoint) -> Result<FixedPoint> {
        (self - other).ltz().await
    }

    /// Reveals and decodes the value. Irreversible: the clear value is
    /// disclosed to every party.
    pub async fn open(&self) -> Result<f64> {
        let clear = self.ctx.open_share(self.share).await?;
        Ok(decode(to_signed(clear)))
    }
}

impl Add for &FixedPoint {
    type Output = FixedPoint;
    fn add(self, rhs: &FixedPoint) -> FixedPoint {
        FixedPoint {
            ctx: self.ctx.clone(),
            share: self.share + rhs.share,
        }
    }
}

impl Sub for &FixedPoint {
    type Output = FixedPoint;
    fn sub(self, rhs: &FixedPoint) -> FixedPoint {
        FixedPoint {
            ctx: self.ctx.clone(),
            share: self.share - rhs.share,
        }
    }
}

impl Neg for &FixedPoint {
    type Output = FixedPoint;
    fn neg(self) -> FixedPoint {
        FixedPoint {
            ctx: self.ctx.clone(),
            share: -self.share,
        }
    }
}

/// Nearest-integer division, ties away from zero.
fn div_round_nearest(n: i128, d: i128) -> i128 {
    let q = n / d;
    let r = n - q * d;
    if 2 * r.abs() >= d.abs() {
        q + if (n < 0) == (d < 0) { 1 } else { -1 }
    } else {
        q
    }
}
