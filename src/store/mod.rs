//! Target stores for the star schema.
//!
//! Both backends expose the same handle: explicit schema declaration,
//! whole-batch replace inside a single transaction (dimension before facts,
//! as the foreign key requires), and the read-only aggregates the dashboard
//! consumes. Reads tolerate a not-yet-provisioned schema by returning empty
//! results; writes never do.

mod duck;
mod pg;

pub use duck::DuckStore;
pub use pg::PgStore;

use crate::config::EtlConfig;
use crate::error::{EtlError, Result};
use crate::transform::{DateDimRow, OrderFactRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Target store selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Embedded file-backed DuckDB store.
    #[default]
    Embedded,
    /// Networked PostgreSQL store.
    Networked,
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embedded" | "duckdb" => Ok(Target::Embedded),
            "networked" | "postgres" => Ok(Target::Networked),
            _ => Err(format!(
                "Unknown target: {}. Valid options: embedded, networked",
                s
            )),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Embedded => write!(f, "embedded"),
            Target::Networked => write!(f, "networked"),
        }
    }
}

/// Headline aggregates over the fact table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kpis {
    pub orders: i64,
    pub total_revenue: i64,
    pub avg_revenue: f64,
}

/// Revenue per order date, joined through the date dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRevenue {
    pub order_date: NaiveDate,
    pub revenue: i64,
}

/// Revenue per region or per product.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRevenue {
    pub name: String,
    pub revenue: i64,
}

/// A target store handle, opened once per invocation and passed explicitly
/// into each stage rather than held as ambient state.
pub trait OrderStore {
    /// Short backend identifier ("duckdb" or "postgres").
    fn name(&self) -> &'static str;

    fn target(&self) -> Target;

    /// Idempotently declare both tables of the star schema.
    fn ensure_schema(&mut self) -> Result<()>;

    /// Replace the store contents with this batch, dimension rows before
    /// fact rows, atomically: after this call the store holds exactly the
    /// given rows or, on failure, its prior committed state.
    fn replace_batch(&mut self, dims: &[DateDimRow], facts: &[OrderFactRow]) -> Result<()>;

    fn kpis(&mut self) -> Result<Kpis>;

    fn revenue_by_day(&mut self) -> Result<Vec<DailyRevenue>>;

    fn revenue_by_region(&mut self) -> Result<Vec<GroupRevenue>>;

    fn revenue_by_product(&mut self) -> Result<Vec<GroupRevenue>>;

    /// `(dim_date rows, fact_orders rows)`, zero for absent tables.
    fn row_counts(&mut self) -> Result<(i64, i64)>;
}

/// Open a store handle for the selected target.
pub fn open(target: Target, cfg: &EtlConfig) -> Result<Box<dyn OrderStore>> {
    match target {
        Target::Embedded => Ok(Box::new(DuckStore::open(&cfg.duckdb_path())?)),
        Target::Networked => Ok(Box::new(PgStore::connect(&cfg.postgres)?)),
    }
}

/// Parse a `YYYY-MM-DD` day string coming back from an aggregate query.
fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| EtlError::DateParse {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parsing_accepts_backend_aliases() {
        assert_eq!("embedded".parse::<Target>().unwrap(), Target::Embedded);
        assert_eq!("DuckDB".parse::<Target>().unwrap(), Target::Embedded);
        assert_eq!("networked".parse::<Target>().unwrap(), Target::Networked);
        assert_eq!("postgres".parse::<Target>().unwrap(), Target::Networked);
        assert!("sqlite".parse::<Target>().is_err());
    }

    #[test]
    fn test_target_display_round_trips() {
        for target in [Target::Embedded, Target::Networked] {
            assert_eq!(target.to_string().parse::<Target>().unwrap(), target);
        }
    }
}
