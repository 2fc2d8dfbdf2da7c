//! Batch Demo
//!
//! Signs a handful of intents locally, runs them through intake and batch
//! assembly, and logs the resulting commitment. Nothing is sent on-chain.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use alloy_primitives::{keccak256, Address, U256};
use anyhow::{bail, Context, Result};
use batch_coordinator::{BatchAssembler, IntentPool};
use chrono::Utc;
use clap::Parser;
use intent_core::merkle::verify_proof;
use intent_core::signing::{IntentSigner, SIGNER_KEY_ENV};
use intent_core::types::{Intent, PoolKey, FEE_TIER_MEDIUM};
use intent_core::Config;
use range_optimizer::RangeOptimizer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Anvil account #0, only used when no key is configured
const ANVIL_DEFAULT_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Parser, Debug)]
#[command(name = "batch-demo", about = "Assemble a PrivBatch batch from locally signed intents")]
struct Args {
    /// Config file; environment variables are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of intents to sign.
    #[arg(long, default_value_t = 4)]
    intents: u64,

    /// Current pool price used to size the range.
    #[arg(long, default_value_t = 2450.0)]
    price: f64,

    #[arg(long, default_value = "0x0000000000000000000000000000000000001111")]
    token_a: Address,

    #[arg(long, default_value = "0x0000000000000000000000000000000000002222")]
    token_b: Address,

    /// Seconds until the signed intents expire.
    #[arg(long, default_value_t = 3600)]
    ttl: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_demo=info,batch_coordinator=info,intent_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::from_env().context("failed to load config from environment")?,
    };
    if config.chain.verifying_contract == Address::ZERO {
        warn!("No verifying contract configured; signatures are bound to the zero address");
    }

    let domain = config.domain();
    let signer = match IntentSigner::from_env(domain.clone()) {
        Ok(signer) => signer,
        Err(_) => {
            warn!("{SIGNER_KEY_ENV} not set, falling back to the Anvil default account");
            IntentSigner::from_private_key(ANVIL_DEFAULT_KEY, domain.clone())?
        }
    };

    info!(
        chain_id = config.chain.chain_id,
        verifying_contract = %config.chain.verifying_contract,
        signer = %signer.address(),
        "Starting batch demo"
    );

    let pool_key = PoolKey::for_fee_tier(
        args.token_a,
        args.token_b,
        FEE_TIER_MEDIUM,
        config.chain.verifying_contract,
    )?;

    let optimizer = RangeOptimizer::from_config(&config.optimizer);
    let prices = synthetic_prices(args.price, config.optimizer.volatility_window);
    let range = optimizer.recommend(&prices, pool_key.tick_spacing)?;
    info!(
        tick_lower = range.tick_lower,
        tick_upper = range.tick_upper,
        k = optimizer.k_multiplier(),
        "Sized liquidity range"
    );

    let now = u64::try_from(Utc::now().timestamp()).context("system clock before epoch")?;
    let mut pool = IntentPool::new(domain);

    for nonce in 0..args.intents {
        let intent = Intent {
            user: signer.address(),
            pool: pool_key,
            tick_lower: range.tick_lower,
            tick_upper: range.tick_upper,
            amount: U256::from(100 + nonce) * U256::from(10u64).pow(U256::from(18u64)),
            nonce: U256::from(nonce),
            deadline: now + args.ttl,
        };
        let signature = signer.sign_intent(&intent)?;
        pool.submit(intent, signature, now)
            .with_context(|| format!("intent {nonce} rejected"))?;
    }

    let assembler = BatchAssembler::from_config(&config.batch);
    // nothing else feeds this pool, so waiting cannot fill a short batch
    if !assembler.is_ready(&pool) {
        bail!(
            "only {} intents submitted, batches need at least {}",
            pool.len(),
            assembler.min_batch_size()
        );
    }

    let check_interval = Duration::from_secs(config.batch.batch_check_interval_secs);
    let max_wait = Duration::from_secs(config.batch.max_batch_wait_secs);
    let started = Instant::now();

    let batch = loop {
        if let Some(batch) = assembler.take_ready(&mut pool)? {
            break batch;
        }
        if started.elapsed() >= max_wait {
            bail!(
                "only {} of {} intents pending after {}s",
                pool.len(),
                assembler.min_batch_size(),
                max_wait.as_secs()
            );
        }
        std::thread::sleep(check_interval);
    };

    for (i, (leaf, proof)) in batch.leaves.iter().zip(&batch.proofs).enumerate() {
        info!(
            index = i,
            leaf = %leaf,
            proof_len = proof.len(),
            valid = verify_proof(leaf, proof, &batch.root),
            "Intent proof"
        );
    }

    // dry run: the calldata hash stands in for a transaction hash
    let pseudo_tx = keccak256(&batch.calldata);
    pool.record_batch(batch.root, pseudo_tx, batch.len());

    info!(
        root = %batch.root_hex(),
        intents = batch.len(),
        calldata_bytes = batch.calldata.len(),
        "Batch ready"
    );
    println!("{}", serde_json::to_string_pretty(&pool.status())?);

    Ok(())
}

/// Hourly prices oscillating around `price`, oldest first.
fn synthetic_prices(price: f64, window: usize) -> Vec<f64> {
    (0..window.max(2))
        .rev()
        .map(|h| price * (1.0 + 0.002 * (h as f64 * 0.7).sin()))
        .collect()
}
