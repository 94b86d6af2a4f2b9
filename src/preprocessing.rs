//! Correlated randomness dealt ahead of a run.
//!
//! A trusted dealer generates everything before any party program starts:
//! Beaver triples for secure multiplication, sharings of zero for
//! randomizing public inputs, and sharings of uniform bits for masking.
//! Elements are indexed and consumed at most once; because every party
//! runs the same deterministic program, the Nth request of a kind on any
//! party addresses element N. Requesting past the generated supply is a
//! fatal error.

use crate::error::{MpcError, Result};
use crate::field::Fp;
use crate::share::{share_secret, Share};
use ark_ff::{One, Zero};
use ark_std::rand::Rng;
use ark_std::UniformRand;
use std::fmt;
use tracing::info;

/// The kinds of pooled elements, named in exhaustion errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Triple,
    Zero,
    Bit,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Triple => write!(f, "triple"),
            ElementKind::Zero => write!(f, "zero"),
            ElementKind::Bit => write!(f, "bit"),
        }
    }
}

/// How many elements of each kind to deal.
///
/// A fixed-point multiplication costs one triple and 160 bits of masking
/// randomness; a division costs two triples and 191 bits; a sign test two
/// triples and 32 bits. Size the pool for the whole program up front.
#[derive(Clone, Copy, Debug)]
pub struct PoolCounts {
    pub triples: u64,
    pub zeros: u64,
    pub bits: u64,
}

impl Default for PoolCounts {
    /// Enough for a few dozen fixed-point operations.
    fn default() -> Self {
        PoolCounts {
            triples: 256,
            zeros: 64,
            bits: 32_768,
        }
    }
}

/// One party's view of a dealt Beaver triple: c = a * b.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triple {
    pub a: Share,
    pub b: Share,
    pub c: Share,
}

/// The dealt pool, shared read-only by all party contexts.
pub struct PreProcessedElements {
    n: usize,
    triples: Vec<Vec<Triple>>,
    zeros: Vec<Vec<Share>>,
    bits: Vec<Vec<Share>>,
}

impl PreProcessedElements {
    /// Deals a fresh pool for an (n, t) run. Each element is stored as
    /// all n parties' shares, indexed by party.
    pub fn generate<R: Rng + ?Sized>(n: usize, t: usize, counts: PoolCounts, rng: &mut R) -> Self {
        let triples = (0..counts.triples)
            .map(|_| {
                let a = Fp::rand(rng);
                let b = Fp::rand(rng);
                let a_shares = share_secret(a, n, t, rng);
                let b_shares = share_secret(b, n, t, rng);
                let c_shares = share_secret(a * b, n, t, rng);
                (0..n)
                    .map(|p| Triple {
                        a: a_shares[p],
                        b: b_shares[p],
                        c: c_shares[p],
                    })
                    .collect()
            })
            .collect();
        let zeros = (0..counts.zeros)
            .map(|_| share_secret(Fp::zero(), n, t, rng))
            .collect();
        let bits = (0..counts.bits)
            .map(|_| {
                let bit = if rng.gen::<bool>() { Fp::one() } else { Fp::zero() };
                share_secret(bit, n, t, rng)
            })
            .collect();
        info!(
            triples = counts.triples,
            zeros = counts.zeros,
            bits = counts.bits,
            "dealt preprocessing pool"
        );
        PreProcessedElements {
            n,
            triples,
            zeros,
            bits,
        }
    }

    /// Party count the pool was dealt for.
    pub fn num_parties(&self) -> usize {
        self.n
    }

    pub fn triple(&self, index: u64, party: usize) -> Result<Triple> {
        debug_assert!(party < self.n);
        match self.triples.get(index as usize) {
            Some(element) => Ok(element[party]),
            None => Err(exhausted(ElementKind::Triple, index, self.triples.len())),
        }
    }

    pub fn zero(&self, index: u64, party: usize) -> Result<Share> {
        debug_assert!(party < self.n);
        match self.zeros.get(index as usize) {
            Some(element) => Ok(element[party]),
            None => Err(exhausted(ElementKind::Zero, index, self.zeros.len())),
        }
    }

    pub fn bit(&self, index: u64, party: usize) -> Result<Share> {
        debug_assert!(party < self.n);
        match self.bits.get(index as usize) {
            Some(element) => Ok(element[party]),
            None => Err(exhausted(ElementKind::Bit, index, self.bits.len())),
        }
    }
}

fn exhausted(kind: ElementKind, index: u64, generated: usize) -> MpcError {
    MpcError::PoolExhausted {
        kind,
        index,
        generated: generated as u64,
    }
}
