//! Pipeline orchestration: Generator → Transformer → Loader.
//!
//! One synchronous, sequential pass per invocation. Each stage surfaces its
//! own failures; nothing is caught or retried here. Concurrent runs against
//! the same target are not coordinated, so callers (a scheduler, a manual
//! trigger) must serialize invocations themselves.

use crate::config::EtlConfig;
use crate::error::Result;
use crate::generator::Generator;
use crate::interchange;
use crate::store::{OrderStore, Target};
use crate::transform::{DateDimRow, OrderFactRow};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Interchange file written by the generator (kept as audit artifact).
    pub interchange: PathBuf,
    /// Target store the batch landed in.
    pub target: Target,
    /// Date dimension rows loaded.
    pub dates_loaded: usize,
    /// Order fact rows loaded.
    pub facts_loaded: usize,
}

/// Run the full pipeline: generate raw orders, persist the interchange
/// file, then transform and load into the given store.
pub fn run_etl(
    cfg: &EtlConfig,
    store: &mut dyn OrderStore,
    today: NaiveDate,
) -> Result<RunOutcome> {
    info!(rows = cfg.rows, seed = cfg.seed, target = %store.target(), "ETL run start");

    let mut generator = Generator::new(cfg.seed);
    let orders = generator.generate(cfg.rows, today);
    let path = interchange::interchange_path(&cfg.data_dir, today);
    interchange::write_orders(&path, &orders)?;
    info!(count = orders.len(), file = %path.display(), "raw orders generated");

    let (dates_loaded, facts_loaded) = load_from_file(&path, store)?;
    info!(dates_loaded, facts_loaded, "ETL run done");

    Ok(RunOutcome {
        interchange: path,
        target: store.target(),
        dates_loaded,
        facts_loaded,
    })
}

/// Read and transform a previously generated interchange file without
/// touching any store. A missing or malformed file fails here, before a
/// caller has to open (or mutate) a target.
pub fn read_and_transform(path: &Path) -> Result<(Vec<DateDimRow>, Vec<OrderFactRow>)> {
    let raw = interchange::read_orders(path)?;
    crate::transform::transform(&raw)
}

/// Provision the schema and replace the store contents with the batch.
pub fn load_batch(
    store: &mut dyn OrderStore,
    dims: &[DateDimRow],
    facts: &[OrderFactRow],
) -> Result<()> {
    store.ensure_schema()?;
    store.replace_batch(dims, facts)?;
    info!(backend = store.name(), dims = dims.len(), facts = facts.len(), "batch loaded");
    Ok(())
}

/// Transform and load a previously generated interchange file.
///
/// Reads and validates the input before the store is mutated in any way: a
/// missing or malformed file fails the run with the store untouched.
/// Returns `(dimension rows, fact rows)` loaded.
pub fn load_from_file(path: &Path, store: &mut dyn OrderStore) -> Result<(usize, usize)> {
    let (dims, facts) = read_and_transform(path)?;
    load_batch(store, &dims, &facts)?;
    Ok((dims.len(), facts.len()))
}
