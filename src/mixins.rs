//! Pluggable secure-multiplication strategies.
//!
//! The protocol behind a secure product is configuration, not a fixed
//! algorithm: each context carries a `MultiplyProtocol` object and the
//! arithmetic layer never names a concrete one. The contract is one round
//! trip, one triple consumed, a correct product share. One strategy
//! ships: Beaver's masked reveal.

use crate::context::MpcContext;
use crate::error::Result;
use crate::share::Share;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait MultiplyProtocol: Send + Sync {
    /// Secure product of two shared values, as a share of the same
    /// degree as the inputs.
    async fn multiply(&self, ctx: &MpcContext, x: Share, y: Share) -> Result<Share>;
}

/// Beaver masked-reveal multiplication.
///
/// With a dealt triple (a, b, c = a*b), the parties reveal d = x - a and
/// e = y - b in one round, then combine locally:
/// x*y = c + b*d + a*e + d*e.
pub struct BeaverMultiply;

#[async_trait]
impl MultiplyProtocol for BeaverMultiply {
    async fn multiply(&self, ctx: &MpcContext, x: Share, y: Share) -> Result<Share> {
        let triple = ctx.get_triple()?;
        let (d, e) = tokio::join!(
            ctx.open_share(x - triple.a),
            ctx.open_share(y - triple.b)
        );
        let (d, e) = (d?, e?);
        Ok(triple.c + triple.b * d + triple.a * e + Share::constant(d * e))
    }
}

/// Which strategy each configurable operation uses.
#[derive(Clone)]
pub struct MixinConfig {
    pub multiply: Arc<dyn MultiplyProtocol>,
}

impl Default for MixinConfig {
    fn default() -> Self {
        MixinConfig {
            multiply: Arc::new(BeaverMultiply),
        }
    }
}
