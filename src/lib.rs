//! Fixed-point real arithmetic over secret-shared integers, and a
//! constant-product swap protocol built on it.
//!
//! The crate simulates an n-party computation in one process. A program
//! runner spawns one async task per party and a reconstruction hub
//! matches reveal rounds across parties by sequence number; the one-shot
//! correlated randomness the interactive protocols consume (Beaver
//! triples, shared zeros, shared random bits) comes from a pool dealt
//! before the run.

pub mod context;
pub mod error;
pub mod field;
pub mod fixed;
pub mod mixins;
pub mod preprocessing;
pub mod runner;
pub mod share;
pub mod swap;

pub use context::MpcContext;
pub use error::{MpcError, Result};
pub use fixed::FixedPoint;
pub use mixins::{BeaverMultiply, MixinConfig, MultiplyProtocol};
pub use preprocessing::{ElementKind, PoolCounts, PreProcessedElements};
pub use runner::{MpcConfig, ProgramRunner};
pub use share::Share;
