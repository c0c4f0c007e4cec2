//! Store Module
//!
//! The storage engine that ties files, allocator and record codec together.
//!
//! ## Responsibilities
//! - Open or create the backing files
//! - Recover allocator state before serving writes
//! - Insert, get, update and delete records by handle
//! - Iterate over live records
//! - Flush on request and on close

use std::path::Path;

use crate::allocator::{Allocator, SizeClasses};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::location::{Handle, Location, Position};
use crate::record::{self, RecordKind, HEADER_SIZE};
use crate::scan::{self, Entries, Iter, RecoveryResult};
use crate::storage::FileManager;

/// Snapshot of store state (for monitoring and tests)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    /// Number of backing files
    pub files: usize,
    /// Bytes currently mapped across all files
    pub mapped_bytes: u64,
    /// Append cursor
    pub end: Position,
    /// Free slot count per size class
    pub free_slots: Vec<usize>,
    /// Whether allocator state reflects the files on disk
    pub recovered: bool,
}

/// An embedded key-value store over memory-mapped files
///
/// ## Access Model
/// - Mutations (insert/update/delete) take `&mut self`
/// - Reads (get/iter) take `&self` and are plain memory reads
/// - Callers that share a store across threads wrap it in their own lock
pub struct Store {
    /// Store configuration
    config: Config,

    /// Mapped backing files
    files: FileManager,

    /// Free lists and end cursor
    allocator: Allocator,

    /// Outcome of the recovery pass, if the store was reopened
    recovery: Option<RecoveryResult>,

    /// Set once allocator state matches the files
    recovered: bool,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Validate the config and build the size-class table
    /// 2. Map existing files or create file `0`
    /// 3. If files existed, run the recovery scan to completion
    /// 4. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Validate config
        config.validate()?;
        let classes = SizeClasses::from_config(&config)?;

        // Step 2: Map files
        let (files, existing) = FileManager::open_or_create(&config)?;

        let mut store = Self {
            config,
            files,
            allocator: Allocator::new(classes),
            recovery: None,
            recovered: !existing,
        };

        // Step 3: Rebuild free lists and end cursor from the log
        if existing {
            store.recover();
        }

        tracing::info!(
            "Opened store at {} ({} files, end={})",
            store.config.data_dir.display(),
            store.files.file_count(),
            store.allocator.end()
        );

        Ok(store)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path, preallocate: bool) -> Result<Self> {
        let config = Config::builder()
            .data_dir(path)
            .preallocate(preallocate)
            .build();
        Self::open(config)
    }

    /// Store a new record and return its handle
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<Handle> {
        let len = record::value_len(key, value);
        let location = self.allocator.allocate(&mut self.files, len)?;

        self.write_value(location, key, value)?;

        tracing::debug!(
            "Insert key_len={} value_len={} at {}",
            key.len(),
            value.len(),
            location
        );
        Ok(location)
    }

    /// Read the record at `handle`
    ///
    /// Returns:
    /// - `Ok(Some((key, value)))`: a live record
    /// - `Ok(None)`: deleted, padding or never written
    pub fn get(&self, handle: Handle) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        if !self.is_live(handle)? {
            tracing::debug!("Get {} → not found", handle);
            return Ok(None);
        }

        let capacity = self.allocator.classes().capacity(handle.size_class());
        let bytes = self
            .files
            .bytes_at(handle.file(), u64::from(handle.offset()), capacity as usize);

        Ok(record::decode_value(bytes).map(|(key, value)| (key.to_vec(), value.to_vec())))
    }

    /// Replace the record at `handle`
    ///
    /// Returns:
    /// - `Ok(Some(handle))`: the same handle if the record fit in place
    /// - `Ok(Some(new_handle))`: the record moved; the old handle is dead
    /// - `Ok(None)`: `handle` is not a live record, nothing changed
    ///
    /// On error the record at `handle` is left as it was.
    pub fn update(&mut self, handle: Handle, key: &[u8], value: &[u8]) -> Result<Option<Handle>> {
        if !self.is_live(handle)? {
            tracing::debug!("Update {} → not found", handle);
            return Ok(None);
        }

        let len = record::value_len(key, value);
        let capacity = self.allocator.classes().capacity(handle.size_class());

        // Fits the existing slot: overwrite in place
        if len <= capacity as usize {
            self.write_value(handle, key, value)?;
            tracing::debug!("Update {} in place", handle);
            return Ok(Some(handle));
        }

        // The new slot is of a larger class, so it never aliases the old one.
        // The old record stays live until the new one is written.
        let location = self.allocator.allocate(&mut self.files, len)?;
        if let Err(e) = self.write_value(location, key, value) {
            self.allocator.release(location);
            return Err(e);
        }
        self.vacate(handle)?;

        tracing::debug!("Update {} relocated to {}", handle, location);
        Ok(Some(location))
    }

    /// Delete the record at `handle`
    ///
    /// Returns `false` without touching anything if `handle` is not a live
    /// record.
    pub fn delete(&mut self, handle: Handle) -> Result<bool> {
        if !self.is_live(handle)? {
            tracing::debug!("Delete {} → not found", handle);
            return Ok(false);
        }

        self.vacate(handle)?;

        tracing::debug!("Delete {}", handle);
        Ok(true)
    }

    /// Iterate over all live (key, value) pairs in log order
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.entries())
    }

    /// Iterate over all live records with their handles
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(&self.files, self.allocator.classes(), Position::START)
    }

    /// Flush all mapped files to disk
    pub fn sync(&self) -> Result<()> {
        self.files.flush()
    }

    /// Close the store gracefully
    ///
    /// Flushes mapped files when `flush_on_close` is set, then unmaps them
    pub fn close(self) -> Result<()> {
        if self.config.flush_on_close {
            self.sync()?;
        }

        tracing::info!("Closed store at {}", self.config.data_dir.display());
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get a snapshot of the store state
    pub fn stats(&self) -> Stats {
        Stats {
            files: self.files.file_count(),
            mapped_bytes: self.files.mapped_bytes(),
            end: self.allocator.end(),
            free_slots: self.allocator.free_lists().counts(),
            recovered: self.recovered,
        }
    }

    /// Get the append cursor
    pub fn end(&self) -> Position {
        self.allocator.end()
    }

    /// Get the total number of free slots
    pub fn free_slots(&self) -> usize {
        self.allocator.free_lists().total()
    }

    /// Check whether `location` is on a free list
    pub fn is_free(&self, location: Location) -> bool {
        self.allocator.free_lists().contains(location)
    }

    /// Get the number of backing files
    pub fn file_count(&self) -> usize {
        self.files.file_count()
    }

    /// Whether allocator state has been rebuilt (always true after `open`)
    pub fn is_recovered(&self) -> bool {
        self.recovered
    }

    /// Get the result of the recovery pass, if one ran
    pub fn recovery(&self) -> Option<&RecoveryResult> {
        self.recovery.as_ref()
    }

    /// Get the size-class table
    pub fn size_classes(&self) -> &SizeClasses {
        self.allocator.classes()
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        self.files.data_dir()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Run the recovery scan
    fn recover(&mut self) {
        let result = scan::recover(&self.files, &mut self.allocator);
        self.recovery = Some(result);
        self.recovered = true;
    }

    /// Reject handles that cannot address a slot of this store
    fn check_handle(&self, handle: Handle) -> Result<()> {
        let classes = self.allocator.classes();

        let valid = handle.is_valid()
            && (handle.file() as usize) < self.files.file_count()
            && classes.contains(handle.size_class())
            && u64::from(handle.offset()) + u64::from(classes.capacity(handle.size_class()))
                <= self.files.capacity();

        if valid {
            Ok(())
        } else {
            Err(StoreError::InvalidHandle(handle))
        }
    }

    /// Whether `handle` addresses a live value record.
    ///
    /// A value record whose header names a different size class than the
    /// handle is rejected: acting on it would touch neighbouring slots.
    fn is_live(&self, handle: Handle) -> Result<bool> {
        self.check_handle(handle)?;

        let bytes = self
            .files
            .bytes_at(handle.file(), u64::from(handle.offset()), HEADER_SIZE);
        let Some(header) = record::decode_header(bytes) else {
            return Ok(false);
        };

        if header.kind != RecordKind::Value {
            return Ok(false);
        }

        if header.size_class != handle.size_class() {
            tracing::warn!(
                "Handle {} names class {}, record holds class {}",
                handle,
                handle.size_class(),
                header.size_class
            );
            return Err(StoreError::InvalidHandle(handle));
        }

        Ok(true)
    }

    /// Serialize a value record into the slot at `location`
    fn write_value(&mut self, location: Location, key: &[u8], value: &[u8]) -> Result<()> {
        let len = record::value_len(key, value);
        let slot = self.files.slot_mut(location, len)?;
        record::write_value(slot, location.size_class(), key, value);
        Ok(())
    }

    /// Tombstone the slot at `location` and hand it to the free list
    fn vacate(&mut self, location: Location) -> Result<()> {
        let capacity = self.allocator.classes().capacity(location.size_class());
        let slot = self.files.slot_mut(location, HEADER_SIZE)?;
        record::write_tombstone(slot, location.size_class(), capacity);
        self.allocator.release(location);
        Ok(())
    }
}
