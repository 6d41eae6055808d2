//! Error types for the catalog crate.
//!
//! Malformed *records* are not errors: they are skipped and counted at
//! load time (see `record`). The variants here cover real faults only —
//! unreadable files, invalid JSON, and integrity violations.

use thiserror::Error;

/// Errors that can occur while loading or validating a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Dataset file could not be found or opened
    #[error("Failed to open dataset file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a dataset file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Dataset file was not valid JSON
    #[error("JSON error in {file}: {source}")]
    JsonError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level JSON value was not an array of records
    #[error("Expected a JSON array of records in {file}")]
    NotAnArray { file: String },

    /// Two records in the same catalog resolved to the same id
    #[error("Duplicate entity id '{id}' in {domain} catalog")]
    DuplicateId { domain: String, id: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
