//! Transform-and-load command for an existing interchange file.
//!
//! Fails with an input error before the store is touched when the file is
//! missing, which is how a load scheduled ahead of generation surfaces.

use crate::config::EtlConfig;
use crate::interchange;
use crate::pipeline;
use crate::store::{self, Target};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  order-etl load
  order-etl load --file data/orders_20240601.csv --target networked")]
pub struct LoadArgs {
    /// Interchange file to load (default: today's file in the data dir)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

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

pub fn run(args: LoadArgs) -> Result<()> {
    let mut cfg = EtlConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        cfg.data_dir = dir;
    }
    let target = args.target.unwrap_or(cfg.target);
    let path = args.file.unwrap_or_else(|| {
        interchange::interchange_path(&cfg.data_dir, chrono::Local::now().date_naive())
    });

    // Read and transform before opening the store, so a missing or bad
    // input file leaves the target completely untouched.
    let (dims, facts) = pipeline::read_and_transform(&path)?;

    let mut store = store::open(target, &cfg)?;
    pipeline::load_batch(store.as_mut(), &dims, &facts)?;

    eprintln!(
        "Loaded {} fact rows over {} dates from {} into the {} store",
        facts.len(),
        dims.len(),
        path.display(),
        target,
    );
    Ok(())
}
