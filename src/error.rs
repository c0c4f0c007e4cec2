//! Error types for slabkv
//!
//! Provides a unified error type for all operations.
//!
//! A missing or deleted record is not an error: lookups report it through
//! `Option` / `bool` return values.

use thiserror::Error;

use crate::location::Location;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for slabkv operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Capacity Errors
    // -------------------------------------------------------------------------
    #[error("Record of {size} bytes exceeds the largest slot ({max} bytes)")]
    RecordTooLarge { size: usize, max: u32 },

    #[error("Store already holds the maximum of {max} files")]
    TooManyFiles { max: u64 },

    // -------------------------------------------------------------------------
    // Addressing Errors
    // -------------------------------------------------------------------------
    #[error("Handle {0} does not address this store")]
    InvalidHandle(Location),
}
