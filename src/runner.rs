//! Drives one async task per party over a shared pool and hub.

use crate::context::{MpcContext, ReconstructionHub};
use crate::error::{MpcError, Result};
use crate::mixins::MixinConfig;
use crate::preprocessing::PreProcessedElements;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Party count and corruption threshold for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MpcConfig {
    pub n: usize,
    pub t: usize,
}

impl MpcConfig {
    /// Rejects combinations the protocol cannot run with: n must exceed 3t.
    pub fn new(n: usize, t: usize) -> Result<Self> {
        if n == 0 || n <= 3 * t {
            return Err(MpcError::InvalidConfig { n, t });
        }
        Ok(MpcConfig { n, t })
    }
}

impl Default for MpcConfig {
    fn default() -> Self {
        MpcConfig { n: 4, t: 1 }
    }
}

/// Runs the same program on every simulated party and collects the
/// outputs. One runner is one computation: it owns the dealt pool, and
/// `run` consumes the runner so the one-shot randomness cannot be reused.
pub struct ProgramRunner {
    config: MpcConfig,
    pool: Arc<PreProcessedElements>,
    mixins: MixinConfig,
}

impl ProgramRunner {
    pub fn new(config: MpcConfig, pool: PreProcessedElements) -> Self {
        ProgramRunner {
            config,
            pool: Arc::new(pool),
            mixins: MixinConfig::default(),
        }
    }

    /// Replaces the default multiplication strategy.
    pub fn with_mixins(mut self, mixins: MixinConfig) -> Self {
        self.mixins = mixins;
        self
    }

    /// Spawns one task per party, each running `program` over its own
    /// context, and returns every party's output in party order. The
    /// first party error aborts the run.
    pub async fn run<P, Fut, T>(self, program: P) -> Result<Vec<T>>
    where
        P: Fn(MpcContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        debug_assert_eq!(self.pool.num_parties(), self.config.n);
        let hub = Arc::new(ReconstructionHub::new(self.config.n, self.config.t));
        info!(n = self.config.n, t = self.config.t, "starting party programs");

        let handles: Vec<_> = (0..self.config.n)
            .map(|party| {
                let ctx = MpcContext::new(
                    party,
                    self.config.n,
                    self.config.t,
                    self.pool.clone(),
                    hub.clone(),
                    self.mixins.clone(),
                );
                let program = program.clone();
                tokio::spawn(async move { program(ctx).await })
            })
            .collect();

        let mut outputs = Vec::with_capacity(self.config.n);
        for (party, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(result) => outputs.push(result?),
                Err(err) => {
                    return Err(MpcError::PartyFailed {
                        party,
                        reason: err.to_string(),
                    })
                }
            }
        }
        debug!("all party programs joined");
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::PoolCounts;
    use ark_std::test_rng;

    #[test]
    fn config_rejects_too_many_corruptions() {
        assert!(MpcConfig::new(4, 1).is_ok());
        assert!(MpcConfig::new(7, 2).is_ok());
        assert_eq!(
            MpcConfig::new(3, 1),
            Err(MpcError::InvalidConfig { n: 3, t: 1 })
        );
        assert_eq!(
            MpcConfig::new(0, 0),
            Err(MpcError::InvalidConfig { n: 0, t: 0 })
        );
    }

    #[tokio::test]
    async fn collects_one_output_per_party() {
        let mut rng = test_rng();
        let pool = PreProcessedElements::generate(
            4,
            1,
            PoolCounts {
                triples: 0,
                zeros: 0,
                bits: 0,
            },
            &mut rng,
        );
        let runner = ProgramRunner::new(MpcConfig::default(), pool);
        let outputs = runner
            .run(|ctx| async move { Ok(ctx.party_id()) })
            .await
            .unwrap();
        assert_eq!(outputs, vec![0, 1, 2, 3]);
    }
}
