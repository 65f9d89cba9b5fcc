//! Full pipeline command.

use crate::config::EtlConfig;
use crate::pipeline;
use crate::store::{self, Target};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  order-etl run
  order-etl run --rows 50 --target embedded
  order-etl run --target networked --config etl.yaml")]
pub struct RunArgs {
    /// Rows to generate (before order-id de-duplication)
    #[arg(short, long, value_name = "N")]
    pub rows: Option<usize>,

    /// Seed for the attribute RNG
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Target store: embedded (DuckDB) or networked (PostgreSQL)
    #[arg(short, long, value_name = "TARGET")]
    pub target: Option<Target>,

    /// Directory for interchange files and the embedded store
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// YAML config file (overridden by env vars and flags)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut cfg = EtlConfig::load(args.config.as_deref())?;
    if let Some(rows) = args.rows {
        anyhow::ensure!(rows >= 1, "--rows must be at least 1");
        cfg.rows = rows;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(dir) = args.data_dir {
        cfg.data_dir = dir;
    }
    let target = args.target.unwrap_or(cfg.target);

    let mut store = store::open(target, &cfg)?;
    let today = chrono::Local::now().date_naive();
    let outcome = pipeline::run_etl(&cfg, store.as_mut(), today)?;

    eprintln!(
        "Loaded {} fact rows over {} dates into the {} store ({})",
        outcome.facts_loaded,
        outcome.dates_loaded,
        outcome.target,
        store.name(),
    );
    eprintln!("Interchange file: {}", outcome.interchange.display());
    Ok(())
}
