//! Error taxonomy for the simulation. Every variant is fatal for the run
//! that raises it: there is no retry or partial result.

use crate::preprocessing::ElementKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MpcError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MpcError {
    /// A party addressed a correlated-randomness element past the
    /// pre-generated supply. The pool is never replenished mid-run.
    #[error("preprocessing pool exhausted: {kind} #{index} requested, {generated} generated")]
    PoolExhausted {
        kind: ElementKind,
        index: u64,
        generated: u64,
    },

    /// Secure division opened a zero masked denominator, so the shared
    /// divisor itself was zero.
    #[error("secure division by a zero-valued shared divisor")]
    DegenerateDivisor,

    /// Party count and threshold the protocol cannot run with.
    #[error("invalid MPC configuration: n={n}, t={t} (need n > 3t)")]
    InvalidConfig { n: usize, t: usize },

    /// A reveal's channel closed before reconstruction completed.
    #[error("reveal #{seq} aborted before reconstruction")]
    RevealAborted { seq: u64 },

    /// A party task panicked or was cancelled by the runtime.
    #[error("party {party} failed: {reason}")]
    PartyFailed { party: usize, reason: String },
}
