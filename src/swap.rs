//! Constant-product swaps over shared reserves.
//!
//! The exchange rule is x * y = k: the product of the two reserves is
//! preserved by a swap, net of a 1/500 fee charged on the input amount.
//! The fee is deducted from the amount that moves the output reserve but
//! still enters the input reserve, so k grows slightly with every swap.
//! Both directions are stateless: reserves go in and come out as plain
//! values, and nothing is revealed unless the caller opens the results.

use crate::error::Result;
use crate::fixed::FixedPoint;

/// Proportional fee denominator: the fee is input / 500.
pub const FEE_DENOMINATOR: f64 = 500.0;

/// Swaps `eth_in` into the pool. Returns
/// `(tokens_out, new_eth_pool, new_token_pool)`.
pub async fn eth_to_token(
    eth_pool: &FixedPoint,
    token_pool: &FixedPoint,
    eth_in: &FixedPoint,
) -> Result<(FixedPoint, FixedPoint, FixedPoint)> {
    let fee = eth_in.div_public(FEE_DENOMINATOR).await?;
    let k = eth_pool.mul(token_pool).await?;
    let new_eth_pool = eth_pool + eth_in;
    let new_token_pool = k.div(&(&new_eth_pool - &fee)).await?;
    let tokens_out = token_pool - &new_token_pool;
    Ok((tokens_out, new_eth_pool, new_token_pool))
}

/// Swaps `token_in` into the pool. Returns
/// `(eth_out, new_eth_pool, new_token_pool)`.
pub async fn token_to_eth(
    eth_pool: &FixedPoint,
    token_pool: &FixedPoint,
    token_in: &FixedPoint,
) -> Result<(FixedPoint, FixedPoint, FixedPoint)> {
    let fee = token_in.div_public(FEE_DENOMINATOR).await?;
    let k = eth_pool.mul(token_pool).await?;
    let new_token_pool = token_pool + token_in;
    let new_eth_pool = k.div(&(&new_token_pool - &fee)).await?;
    let eth_out = eth_pool - &new_eth_pool;
    Ok((eth_out, new_eth_pool, new_token_pool))
}
