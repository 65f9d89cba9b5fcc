//! Error taxonomy for the ETL pipeline.
//!
//! Three families of failure, surfaced without retry at every stage:
//! input errors (interchange file missing or unreadable), validation
//! errors (rows the transformer refuses to coerce), and store errors
//! (connectivity, constraints, transactions). The orchestrator never
//! catches; callers decide how to present failures.

use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum EtlError {
    /// Interchange file does not exist. Raised before any store mutation.
    #[error("interchange file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Interchange file exists but could not be read.
    #[error("failed to read interchange file {path}: {source}")]
    InputIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Interchange file content does not match the expected layout.
    #[error("malformed interchange file at line {line}: {reason}")]
    InputMalformed { line: usize, reason: String },

    /// An order date string is not a valid ISO calendar date.
    /// The whole batch is rejected, never a partial transform.
    #[error("invalid order date '{value}': {source}")]
    DateParse {
        value: String,
        source: chrono::ParseError,
    },

    /// A product or region value falls outside the fixed catalog.
    #[error("unknown {field} value '{value}'")]
    UnknownCatalogValue { field: &'static str, value: String },

    /// Could not create or access the embedded store's database file.
    #[error("failed to prepare store path {path}: {source}")]
    StoreIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Embedded store failure (open, schema, or batch replace).
    #[error("duckdb store error: {0}")]
    Duckdb(#[from] duckdb::Error),

    /// Networked store failure (connectivity, constraint, transaction).
    #[error("postgres store error: {0}")]
    Postgres(#[from] postgres::Error),
}

impl EtlError {
    /// True for failures of the interchange input itself (missing,
    /// unreadable, or structurally malformed file).
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            EtlError::InputNotFound { .. }
                | EtlError::InputIo { .. }
                | EtlError::InputMalformed { .. }
        )
    }

    /// True for rows the transformer rejected.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EtlError::DateParse { .. } | EtlError::UnknownCatalogValue { .. }
        )
    }

    /// True for failures raised by a target store.
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            EtlError::StoreIo { .. } | EtlError::Duckdb(_) | EtlError::Postgres(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
