//! Configuration for slabkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::location::MAX_FILE_CAPACITY;

/// Main configuration for a slabkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the numbered backing files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── 0
    ///     ├── 1
    ///     └── ...
    pub data_dir: PathBuf,

    /// Size every backing file is allowed to reach (in bytes)
    pub file_capacity: u64,

    /// Size new files to `file_capacity` up front instead of growing them
    pub preallocate: bool,

    /// Starting length of a new file when `preallocate` is off (in bytes)
    pub initial_file_size: u64,

    // -------------------------------------------------------------------------
    // Allocator Configuration
    // -------------------------------------------------------------------------
    /// Capacity of the smallest size class (power of two)
    pub min_slot_size: u32,

    /// Capacity of the largest size class (power of two)
    pub max_slot_size: u32,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Flush all mapped files when the store is closed
    pub flush_on_close: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./slabkv_data"),
            file_capacity: 64 * 1024 * 1024, // 64 MB
            preallocate: true,
            initial_file_size: 1024 * 1024, // 1 MB
            min_slot_size: 32,
            max_slot_size: 1024 * 1024, // 1 MB
            flush_on_close: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the settings that are not covered by the size-class table
    pub fn validate(&self) -> Result<()> {
        if self.file_capacity > MAX_FILE_CAPACITY {
            return Err(StoreError::Config(format!(
                "file_capacity {} exceeds the addressable maximum {}",
                self.file_capacity, MAX_FILE_CAPACITY
            )));
        }

        // Offset 0 is reserved, so the largest slot must fit behind it.
        if u64::from(self.max_slot_size) >= self.file_capacity {
            return Err(StoreError::Config(format!(
                "max_slot_size {} must be smaller than file_capacity {}",
                self.max_slot_size, self.file_capacity
            )));
        }

        if !self.preallocate && self.initial_file_size == 0 {
            return Err(StoreError::Config(
                "initial_file_size must be non-zero when preallocate is off".to_string(),
            ));
        }

        Ok(())
    }

    /// Length a freshly created backing file starts with
    pub(crate) fn new_file_len(&self) -> u64 {
        if self.preallocate {
            self.file_capacity
        } else {
            self.initial_file_size.min(self.file_capacity)
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all backing files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the per-file capacity (in bytes)
    pub fn file_capacity(mut self, bytes: u64) -> Self {
        self.config.file_capacity = bytes;
        self
    }

    /// Size new files to full capacity immediately
    pub fn preallocate(mut self, preallocate: bool) -> Self {
        self.config.preallocate = preallocate;
        self
    }

    /// Set the starting length of files that grow on demand (in bytes)
    pub fn initial_file_size(mut self, bytes: u64) -> Self {
        self.config.initial_file_size = bytes;
        self
    }

    /// Set the smallest slot capacity (in bytes)
    pub fn min_slot_size(mut self, bytes: u32) -> Self {
        self.config.min_slot_size = bytes;
        self
    }

    /// Set the largest slot capacity (in bytes)
    pub fn max_slot_size(mut self, bytes: u32) -> Self {
        self.config.max_slot_size = bytes;
        self
    }

    /// Flush mapped files on close
    pub fn flush_on_close(mut self, flush: bool) -> Self {
        self.config.flush_on_close = flush;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
