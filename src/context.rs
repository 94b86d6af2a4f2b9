//! Per-party execution context and the in-process reconstruction hub.
//!
//! All parties run the same deterministic program, so the Nth interactive
//! operation on every party belongs to the same reveal session and the
//! Nth pool request of a kind addresses the same element. Sessions are
//! keyed by sequence number alone, never by value; a reveal completes
//! once t+1 parties have contributed and every later contributor reads
//! the cached reconstruction.

use crate::error::{MpcError, Result};
use crate::field::Fp;
use crate::mixins::MixinConfig;
use crate::preprocessing::{PreProcessedElements, Triple};
use crate::share::{interpolate, Share};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Contributions to one reveal round.
struct OpenSession {
    contributions: SmallVec<[(usize, Fp); 8]>,
    tx: watch::Sender<Option<Fp>>,
    rx: watch::Receiver<Option<Fp>>,
}

impl OpenSession {
    fn new() -> Self {
        let (tx, rx) = watch::channel(None);
        OpenSession {
            contributions: SmallVec::new(),
            tx,
            rx,
        }
    }
}

/// Matches reveal contributions across parties by sequence number and
/// reconstructs once t+1 have arrived.
pub(crate) struct ReconstructionHub {
    n: usize,
    t: usize,
    sessions: Mutex<FxHashMap<u64, OpenSession>>,
}

impl ReconstructionHub {
    pub(crate) fn new(n: usize, t: usize) -> Self {
        ReconstructionHub {
            n,
            t,
            sessions: Mutex::new(FxHashMap::default()),
        }
    }

    /// Posts one party's share for reveal `seq`; the returned receiver
    /// yields the reconstructed value. The session is dropped after all
    /// n parties have picked up their receiver.
    fn contribute(&self, seq: u64, party: usize, share: Share) -> watch::Receiver<Option<Fp>> {
        let mut sessions = self.sessions.lock();
        let session = sessions.entry(seq).or_insert_with(OpenSession::new);
        debug_assert!(
            session.contributions.iter().all(|&(p, _)| p != party),
            "party contributed twice to one reveal"
        );
        session.contributions.push((party, share.0));
        if session.contributions.len() == self.t + 1 {
            let value = interpolate(&session.contributions);
            debug!(seq, "reveal reconstructed");
            let _ = session.tx.send(Some(value));
        }
        let rx = session.rx.clone();
        if session.contributions.len() == self.n {
            sessions.remove(&seq);
        }
        rx
    }
}

struct ContextInner {
    party_id: usize,
    n: usize,
    t: usize,
    pool: Arc<PreProcessedElements>,
    hub: Arc<ReconstructionHub>,
    mixins: MixinConfig,
    seq: AtomicU64,
    triples_taken: AtomicU64,
    zeros_taken: AtomicU64,
    bits_taken: AtomicU64,
}

/// One party's handle on a running computation.
///
/// Cheap to clone; clones share the party's counters, so values produced
/// by one handle stay in lock-step with the rest of the party's program.
#[derive(Clone)]
pub struct MpcContext {
    inner: Arc<ContextInner>,
}

impl MpcContext {
    pub(crate) fn new(
        party_id: usize,
        n: usize,
        t: usize,
        pool: Arc<PreProcessedElements>,
        hub: Arc<ReconstructionHub>,
        mixins: MixinConfig,
    ) -> Self {
        MpcContext {
            inner: Arc::new(ContextInner {
                party_id,
                n,
                t,
                pool,
                hub,
                mixins,
                seq: AtomicU64::new(0),
                triples_taken: AtomicU64::new(0),
                zeros_taken: AtomicU64::new(0),
                bits_taken: AtomicU64::new(0),
            }),
        }
    }

    pub fn party_id(&self) -> usize {
        self.inner.party_id
    }

    pub fn num_parties(&self) -> usize {
        self.inner.n
    }

    pub fn threshold(&self) -> usize {
        self.inner.t
    }

    /// Wraps a clear value as this party's share of it.
    pub fn constant(&self, v: Fp) -> Share {
        Share::constant(v)
    }

    /// Reveals a shared value under this party's next sequence number.
    /// Suspends until t+1 parties have contributed to that position.
    pub async fn open_share(&self, share: Share) -> Result<Fp> {
        let seq = self.inner.seq.fetch_add(1, Ordering::Relaxed);
        let mut rx = self.inner.hub.contribute(seq, self.inner.party_id, share);
        loop {
            if let Some(value) = *rx.borrow() {
                return Ok(value);
            }
            rx.changed()
                .await
                .map_err(|_| MpcError::RevealAborted { seq })?;
        }
    }

    /// Next Beaver triple for this party. Fatal once the pool runs out.
    pub fn get_triple(&self) -> Result<Triple> {
        let index = self.inner.triples_taken.fetch_add(1, Ordering::Relaxed);
        self.inner.pool.triple(index, self.inner.party_id)
    }

    /// Next sharing of zero for this party.
    pub fn get_zero(&self) -> Result<Share> {
        let index = self.inner.zeros_taken.fetch_add(1, Ordering::Relaxed);
        self.inner.pool.zero(index, self.inner.party_id)
    }

    /// Next shared random bit for this party.
    pub fn get_bit(&self) -> Result<Share> {
        let index = self.inner.bits_taken.fetch_add(1, Ordering::Relaxed);
        self.inner.pool.bit(index, self.inner.party_id)
    }

    /// Secure product of two shared values via the configured strategy.
    pub async fn multiply(&self, x: Share, y: Share) -> Result<Share> {
        let strategy = self.inner.mixins.multiply.clone();
        strategy.multiply(self, x, y).await
    }
}
