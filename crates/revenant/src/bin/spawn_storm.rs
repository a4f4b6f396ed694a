//! # Spawn Storm
//!
//! Loads a pool manifest, builds the registry and hammers it with seeded
//! spawn/despawn traffic, then prints what every pool went through.
//!
//! Run with: `cargo run --bin spawn_storm -- --frames 1200 --manifest pools.toml`

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use revenant::{catalog, Storm, StormConfig, DEFAULT_MANIFEST};
use revenant_core::{LogLevel, PoolLogger, PoolManifest, PoolRegistry};

/// Simulated spawn traffic over named entity pools.
#[derive(Debug, Parser)]
#[command(name = "spawn_storm", version)]
struct Args {
    /// Pool manifest (TOML). Uses a built-in manifest when omitted.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Traffic seed.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Spawn attempts per pool per frame, at most.
    #[arg(long, default_value_t = 6)]
    max_burst: u32,

    /// Log pool creation and growth too.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let manifest = match &args.manifest {
        Some(path) => PoolManifest::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PoolManifest::from_toml_str(DEFAULT_MANIFEST).context("built-in manifest")?,
    };

    let level = if args.verbose { LogLevel::All } else { manifest.log_level };
    let descriptors = manifest.resolve(catalog).context("resolving templates")?;
    let registry = PoolRegistry::with_pools(PoolLogger::new(level), descriptors)
        .context("building pools")?;

    let config = StormConfig {
        frames: args.frames,
        seed: args.seed,
        max_burst: args.max_burst,
        ..StormConfig::default()
    };

    let start = Instant::now();
    let report = Storm::new(registry, config).run();
    let elapsed = start.elapsed();

    println!("\n=== Spawn Storm ===");
    println!("Frames:     {}", report.frames);
    println!("Spawned:    {}", report.spawned);
    println!("Refused:    {}", report.refused);
    println!("Despawned:  {}", report.despawned);
    println!("Peak live:  {}", report.peak_live);
    println!("Elapsed:    {elapsed:?}");
    println!();
    println!(
        "{:<12} {:>6} {:>6} {:>6} {:>6} {:>8}  policy",
        "pool", "size", "idle", "active", "grown", "evicted"
    );
    for pool in &report.pools {
        println!(
            "{:<12} {:>6} {:>6} {:>6} {:>6} {:>8}  {}",
            pool.name.as_str(),
            pool.logical_size,
            pool.idle,
            pool.active,
            pool.grown,
            pool.evicted,
            if pool.fixed_size { "fixed" } else { "growable" }
        );
    }

    Ok(())
}
