//! Error types for catalog loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading catalog files
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read a data file
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("Failed to parse catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A row or line that does not describe a valid entry
    #[error("Invalid record in {path} at line {line}: {reason}")]
    InvalidRecord {
        /// File being read
        path: PathBuf,
        /// 1-based line number
        line: u64,
        /// What is wrong with it
        reason: String,
    },

    /// The catalog file is missing
    #[error("Catalog data not found: {0} does not exist")]
    MissingData(PathBuf),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
