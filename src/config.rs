//! Pipeline configuration.
//!
//! Defaults work out of the box for local development; an optional YAML
//! file overrides them, environment variables override the file, and CLI
//! flags override everything. Recognized environment variables: `ETL_ROWS`,
//! `ETL_SEED`, `ETL_DATA_DIR`, `ETL_TARGET`, and the usual `PGHOST`,
//! `PGPORT`, `PGUSER`, `PGPASSWORD`, `PGDATABASE`.

use crate::store::Target;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Connection parameters for the networked PostgreSQL store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PgConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            dbname: "warehouse".to_string(),
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Rows to generate per run (before order-id de-duplication).
    pub rows: usize,
    /// Seed for the attribute RNG.
    pub seed: u64,
    /// Directory holding interchange files and the embedded store.
    pub data_dir: PathBuf,
    /// Default target store when none is given on the command line.
    pub target: Target,
    pub postgres: PgConfig,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            rows: 300,
            seed: crate::generator::DEFAULT_SEED,
            data_dir: PathBuf::from("data"),
            target: Target::Embedded,
            postgres: PgConfig::default(),
        }
    }
}

impl EtlConfig {
    /// Load configuration: defaults, then the YAML file (if given), then
    /// environment overrides.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut cfg = match file {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Cannot read config file: {}", path.display()))?;
                serde_yaml_ng::from_str(&content)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?
            }
            None => Self::default(),
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    /// Path of the embedded DuckDB database file.
    pub fn duckdb_path(&self) -> PathBuf {
        self.data_dir.join("warehouse.duckdb")
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(rows) = env_parsed("ETL_ROWS")? {
            self.rows = rows;
        }
        if let Some(seed) = env_parsed("ETL_SEED")? {
            self.seed = seed;
        }
        if let Some(dir) = std::env::var_os("ETL_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(target) = env_parsed("ETL_TARGET")? {
            self.target = target;
        }
        if let Ok(host) = std::env::var("PGHOST") {
            self.postgres.host = host;
        }
        if let Some(port) = env_parsed("PGPORT")? {
            self.postgres.port = port;
        }
        if let Ok(user) = std::env::var("PGUSER") {
            self.postgres.user = user;
        }
        if let Ok(password) = std::env::var("PGPASSWORD") {
            self.postgres.password = password;
        }
        if let Ok(dbname) = std::env::var("PGDATABASE") {
            self.postgres.dbname = dbname;
        }
        Ok(())
    }
}

fn env_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => {
            let parsed = value
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid {key}={value}: {e}"))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_development() {
        let cfg = EtlConfig::default();
        assert_eq!(cfg.rows, 300);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.target, Target::Embedded);
        assert_eq!(cfg.postgres.port, 5432);
        assert_eq!(cfg.duckdb_path(), PathBuf::from("data/warehouse.duckdb"));
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = "rows: 50\ntarget: networked\npostgres:\n  dbname: analytics\n";
        let cfg: EtlConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(cfg.rows, 50);
        assert_eq!(cfg.target, Target::Networked);
        assert_eq!(cfg.postgres.dbname, "analytics");
        assert_eq!(cfg.postgres.host, "localhost");
    }
}
