//! Threshold shares over the scalar field.
//!
//! A share is one party's evaluation of a degree-t polynomial whose
//! constant term is the secret; party i holds f(i+1). Linear combination
//! and multiplication by a public scalar are local operations. A public
//! value is the degree-0 sharing: every party holds the value itself, and
//! adding it to a proper sharing shifts the secret by that value.

use crate::field::Fp;
use ark_ff::{Field, One, Zero};
use ark_std::rand::Rng;
use ark_std::UniformRand;
use std::ops::{Add, Mul, Neg, Sub};

/// One party's fragment of a shared value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Share(pub Fp);

impl Share {
    /// Public sharing of a clear value.
    pub fn constant(v: Fp) -> Self {
        Share(v)
    }

    /// Shifts the shared value by a public constant.
    pub fn add_public(self, c: Fp) -> Self {
        Share(self.0 + c)
    }
}

impl Add for Share {
    type Output = Share;
    fn add(self, rhs: Share) -> Share {
        Share(self.0 + rhs.0)
    }
}

impl Sub for Share {
    type Output = Share;
    fn sub(self, rhs: Share) -> Share {
        Share(self.0 - rhs.0)
    }
}

impl Neg for Share {
    type Output = Share;
    fn neg(self) -> Share {
        Share(-self.0)
    }
}

impl Mul<Fp> for Share {
    type Output = Share;
    fn mul(self, rhs: Fp) -> Share {
        Share(self.0 * rhs)
    }
}

/// Evaluation point for `party`. Zero is reserved for the secret.
fn eval_point(party: usize) -> Fp {
    Fp::from(party as u64 + 1)
}

/// Deals a fresh degree-t sharing of `secret`, one share per party.
pub fn share_secret<R: Rng + ?Sized>(secret: Fp, n: usize, t: usize, rng: &mut R) -> Vec<Share> {
    let mut coeffs = Vec::with_capacity(t + 1);
    coeffs.push(secret);
    for _ in 0..t {
        coeffs.push(Fp::rand(rng));
    }
    (0..n)
        .map(|party| {
            let x = eval_point(party);
            let mut acc = Fp::zero();
            for c in coeffs.iter().rev() {
                acc = acc * x + *c;
            }
            Share(acc)
        })
        .collect()
}

/// Reconstructs the secret from at least t+1 points by Lagrange
/// interpolation at zero. Points must belong to distinct parties.
pub fn interpolate(points: &[(usize, Fp)]) -> Fp {
    let mut secret = Fp::zero();
    for (i, &(pi, yi)) in points.iter().enumerate() {
        let xi = eval_point(pi);
        let mut num = Fp::one();
        let mut den = Fp::one();
        for (j, &(pj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let xj = eval_point(pj);
            num *= xj;
            den *= xj - xi;
        }
        let lambda = num * den.inverse().expect("evaluation points are distinct");
        secret += yi * lambda;
    }
    secret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::to_element;
    use ark_std::test_rng;

    fn points(shares: &[Share], parties: &[usize]) -> Vec<(usize, Fp)> {
        parties.iter().map(|&p| (p, shares[p].0)).collect()
    }

    #[test]
    fn reconstructs_from_any_threshold_subset() {
        let mut rng = test_rng();
        let secret = to_element(123_456_789);
        let shares = share_secret(secret, 4, 1, &mut rng);
        for subset in [&[0usize, 1][..], &[1, 3], &[0, 2, 3], &[0, 1, 2, 3]] {
            assert_eq!(interpolate(&points(&shares, subset)), secret);
        }
    }

    #[test]
    fn linear_combinations_stay_consistent() {
        let mut rng = test_rng();
        let a = to_element(1000);
        let b = to_element(-250);
        let a_shares = share_secret(a, 4, 1, &mut rng);
        let b_shares = share_secret(b, 4, 1, &mut rng);
        let combined: Vec<Share> = (0..4)
            .map(|p| a_shares[p] + b_shares[p] * Fp::from(3u64) - Share::constant(Fp::from(7u64)))
            .collect();
        let expected = a + b * Fp::from(3u64) - Fp::from(7u64);
        assert_eq!(interpolate(&points(&combined, &[2, 0])), expected);
    }
}
