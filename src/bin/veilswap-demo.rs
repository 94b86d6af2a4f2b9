use std::env;
use std::process::exit;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use veilswap::{
    swap, FixedPoint, MpcConfig, PoolCounts, PreProcessedElements, ProgramRunner, Result,
};

fn print_usage_and_exit() -> ! {
    eprintln!(
        "Veilswap Demo\n\nRuns a constant-product swap and its reverse over a simulated\n4-party MPC, with every reserve and amount secret-shared.\n\nUsage:\n  veilswap-demo [eth_pool] [token_pool] [eth_in]\n\nDefaults:\n  veilswap-demo 10 500 1\n"
    );
    exit(1);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let raw_args = env::args().skip(1).collect::<Vec<_>>();
    if raw_args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage_and_exit();
    }

    let mut amounts = [10.0f64, 500.0, 1.0];
    if raw_args.len() > amounts.len() {
        print_usage_and_exit();
    }
    for (slot, arg) in amounts.iter_mut().zip(&raw_args) {
        match arg.parse::<f64>() {
            Ok(v) if v > 0.0 => *slot = v,
            _ => {
                eprintln!("Error: '{}' is not a positive amount", arg);
                exit(2);
            }
        }
    }
    let [eth_pool, token_pool, eth_in] = amounts;

    if let Err(err) = run_demo(eth_pool, token_pool, eth_in).await {
        eprintln!("Swap computation failed: {}", err);
        exit(3);
    }
}

async fn run_demo(eth_pool: f64, token_pool: f64, eth_in: f64) -> Result<()> {
    let mut rng = StdRng::from_entropy();
    let pool = PreProcessedElements::generate(4, 1, PoolCounts::default(), &mut rng);
    let runner = ProgramRunner::new(MpcConfig::default(), pool);

    let outputs = runner
        .run(move |ctx| async move {
            // each party secret-shares the reserves and the input amount
            let eth = FixedPoint::secret(&ctx, eth_pool)?;
            let token = FixedPoint::secret(&ctx, token_pool)?;
            let input = FixedPoint::secret(&ctx, eth_in)?;

            let (tokens_out, eth_1, token_1) = swap::eth_to_token(&eth, &token, &input).await?;
            let forward = (
                tokens_out.open().await?,
                eth_1.open().await?,
                token_1.open().await?,
            );

            let (eth_out, eth_2, token_2) =
                swap::token_to_eth(&eth_1, &token_1, &tokens_out).await?;
            let reverse = (
                eth_out.open().await?,
                eth_2.open().await?,
                token_2.open().await?,
            );

            Ok((forward, reverse))
        })
        .await?;

    // every party opened the same clear values; report party 0's view
    let (forward, reverse) = outputs[0];
    let (tokens_out, eth_1, token_1) = forward;
    let (eth_out, eth_2, token_2) = reverse;

    println!("Initial pools:     {:.6} ETH / {:.6} tokens", eth_pool, token_pool);
    println!("eth_to_token:      {:.6} ETH in -> {:.6} tokens out", eth_in, tokens_out);
    println!("Pools after swap:  {:.6} ETH / {:.6} tokens", eth_1, token_1);
    println!("token_to_eth:      {:.6} tokens in -> {:.6} ETH out", tokens_out, eth_out);
    println!("Pools after trip:  {:.6} ETH / {:.6} tokens", eth_2, token_2);
    Ok(())
}
