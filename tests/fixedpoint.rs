// Integration tests for the shared fixed-point arithmetic, run over the
// full 4-party simulation with t = 1.

use std::sync::Once;

use ark_std::test_rng;
use tracing_subscriber::EnvFilter;
use veilswap::field::to_element;
use veilswap::fixed::encode;
use veilswap::{
    ElementKind, FixedPoint, MpcConfig, MpcError, PoolCounts, PreProcessedElements, ProgramRunner,
};

static INIT: Once = Once::new();

fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn runner_with(counts: PoolCounts) -> ProgramRunner {
    init_test_logging();
    let mut rng = test_rng();
    let pool = PreProcessedElements::generate(4, 1, counts, &mut rng);
    ProgramRunner::new(MpcConfig::default(), pool)
}

const EPSILON: f64 = 1e-4;

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn addition_and_subtraction_stay_local_and_exact() {
    let outputs = runner_with(PoolCounts {
        triples: 0,
        zeros: 8,
        bits: 0,
    })
    .run(|ctx| async move {
        let a = FixedPoint::secret(&ctx, 37.125)?;
        let b = FixedPoint::public(&ctx, -5.0625);
        let sum = (&a + &b).open().await?;
        let diff = (&a - &b).open().await?;
        let negated = (-&a).open().await?;
        Ok((sum, diff, negated))
    })
    .await
    .unwrap();

    assert_eq!(outputs.len(), 4);
    for (sum, diff, negated) in outputs {
        assert_approx(sum, 32.0625);
        assert_approx(diff, 42.1875);
        assert_approx(negated, -37.125);
    }
}

#[tokio::test]
async fn secure_products_match_clear_arithmetic() {
    let outputs = runner_with(PoolCounts {
        triples: 8,
        zeros: 8,
        bits: 4096,
    })
    .run(|ctx| async move {
        let mut opened = Vec::new();
        for (x, y) in [(3.5, 2.25), (-4.125, 7.75), (-1.5, -2.5)] {
            let a = FixedPoint::secret(&ctx, x)?;
            let b = FixedPoint::secret(&ctx, y)?;
            opened.push(a.mul(&b).await?.open().await?);
        }
        Ok(opened)
    })
    .await
    .unwrap();

    for opened in outputs {
        assert_approx(opened[0], 7.875);
        assert_approx(opened[1], -31.96875);
        assert_approx(opened[2], 3.75);
    }
}

#[tokio::test]
async fn division_works_for_every_construction_variant() {
    let outputs = runner_with(PoolCounts {
        triples: 16,
        zeros: 8,
        bits: 4096,
    })
    .run(|ctx| async move {
        let (x, y) = (19.875, 4.5);

        // literal construction
        let literal = FixedPoint::public(&ctx, x)
            .div(&FixedPoint::public(&ctx, y))
            .await?
            .open()
            .await?;

        // clear value wrapped directly as a share
        let wrapped = FixedPoint::from_share(&ctx, ctx.constant(to_element(encode(x))))
            .div(&FixedPoint::from_share(&ctx, ctx.constant(to_element(encode(y)))))
            .await?
            .open()
            .await?;

        // proper secret sharing, negative quotient
        let secret = FixedPoint::secret(&ctx, -x)?
            .div(&FixedPoint::secret(&ctx, y)?)
            .await?
            .open()
            .await?;

        Ok((literal, wrapped, secret))
    })
    .await
    .unwrap();

    for (literal, wrapped, secret) in outputs {
        assert_approx(literal, 19.875 / 4.5);
        assert_approx(wrapped, 19.875 / 4.5);
        assert_approx(secret, -19.875 / 4.5);
    }
}

#[tokio::test]
async fn division_by_a_public_constant() {
    let outputs = runner_with(PoolCounts {
        triples: 8,
        zeros: 8,
        bits: 2048,
    })
    .run(|ctx| async move {
        let a = FixedPoint::secret(&ctx, 1.0)?;
        a.div_public(500.0).await?.open().await
    })
    .await
    .unwrap();

    for opened in outputs {
        assert_approx(opened, 0.002);
    }
}

#[tokio::test]
async fn division_by_a_shared_zero_is_reported() {
    let err = runner_with(PoolCounts {
        triples: 8,
        zeros: 8,
        bits: 2048,
    })
    .run(|ctx| async move {
        let a = FixedPoint::secret(&ctx, 1.0)?;
        let b = FixedPoint::secret(&ctx, 0.0)?;
        a.div(&b).await.map(|_| ())
    })
    .await
    .unwrap_err();

    assert_eq!(err, MpcError::DegenerateDivisor);
}

#[tokio::test]
async fn sign_test_flags_only_negatives() {
    let outputs = runner_with(PoolCounts {
        triples: 16,
        zeros: 8,
        bits: 1024,
    })
    .run(|ctx| async move {
        let mut opened = Vec::new();
        for v in [12.5, 0.0, -0.25, -873.0] {
            let x = FixedPoint::secret(&ctx, v)?;
            opened.push(x.ltz().await?.open().await?);
        }
        let a = FixedPoint::secret(&ctx, 3.0)?;
        let b = FixedPoint::secret(&ctx, 8.0)?;
        opened.push(a.lt(&b).await?.open().await?);
        opened.push(b.lt(&a).await?.open().await?);
        Ok(opened)
    })
    .await
    .unwrap();

    // the shared boolean decodes to exactly 0 or 1
    for opened in outputs {
        assert_eq!(opened, vec![0.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
    }
}

#[tokio::test]
async fn exhausting_the_triple_pool_aborts_the_run() {
    let err = runner_with(PoolCounts {
        triples: 2,
        zeros: 4,
        bits: 2048,
    })
    .run(|ctx| async move {
        let a = FixedPoint::secret(&ctx, 2.0)?;
        let b = FixedPoint::secret(&ctx, 3.0)?;
        let ab = a.mul(&b).await?;
        let sq = ab.mul(&ab).await?;
        sq.mul(&a).await.map(|_| ())
    })
    .await
    .unwrap_err();

    assert_eq!(
        err,
        MpcError::PoolExhausted {
            kind: ElementKind::Triple,
            index: 2,
            generated: 2,
        }
    );
}
