//! Generator-only command: write today's interchange file without loading.

use crate::config::EtlConfig;
use crate::generator::Generator;
use crate::interchange;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Rows to generate (before order-id de-duplication)
    #[arg(short, long, value_name = "N")]
    pub rows: Option<usize>,

    /// Seed for the attribute RNG
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Directory for the interchange file
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// YAML config file (overridden by env vars and flags)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
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

    let today = chrono::Local::now().date_naive();
    let orders = Generator::new(cfg.seed).generate(cfg.rows, today);
    let path = interchange::interchange_path(&cfg.data_dir, today);
    interchange::write_orders(&path, &orders)?;

    eprintln!(
        "Wrote {} raw orders to {} ({} requested)",
        orders.len(),
        path.display(),
        cfg.rows,
    );
    Ok(())
}
