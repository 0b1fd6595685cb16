//! Error types for the fallible edges of the engine
//!
//! The numeric calculators themselves never fail. Errors only arise when
//! loading tax tables from disk or decoding calculator requests.

use thiserror::Error;

/// Errors raised outside the pure calculation core
#[derive(Error, Debug)]
pub enum EngineError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Request or result could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tax table content was readable but inconsistent
    #[error("Invalid tax table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    /// Calculator key did not match any known calculator
    #[error("Unknown calculator: {0}")]
    UnknownCalculator(String),
}

/// Result type alias for engine edge operations
pub type EngineResult<T> = Result<T, EngineError>;
