//! Star-schema ETL pipeline for synthetic order data.
//!
//! Generates a seeded batch of fake orders, persists it as a daily
//! interchange CSV, transforms it into a date dimension and an order fact
//! table, and loads the batch into either an embedded DuckDB file or a
//! networked PostgreSQL database with whole-batch replace semantics.
//!
//! # Example
//!
//! ```ignore
//! use order_etl::{config::EtlConfig, pipeline, store};
//!
//! let cfg = EtlConfig::default();
//! let mut store = store::open(cfg.target, &cfg).unwrap();
//! let today = chrono::Local::now().date_naive();
//! let outcome = pipeline::run_etl(&cfg, store.as_mut(), today).unwrap();
//! println!("loaded {} facts", outcome.facts_loaded);
//! ```

// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod generator;
pub mod interchange;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod transform;
