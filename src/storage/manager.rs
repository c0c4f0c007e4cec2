//! File Manager
//!
//! Owns the ordered list of mapped backing files.
//!
//! ## Responsibilities
//! - Discover existing files on startup (`0`, `1`, ... until one is missing)
//! - Create file `0` for a fresh store
//! - Add the next numbered file when the allocator rolls over
//! - Resolve (file, offset) addresses to mapped bytes
//! - Flush every mapping on request

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::location::{Location, MAX_FILES};

use super::MappedFile;

/// Manages the backing files of a store
#[derive(Debug)]
pub struct FileManager {
    /// Directory where the numbered files live
    data_dir: PathBuf,

    /// Mapped files, indexed by file number
    files: Vec<MappedFile>,

    /// Capacity of every file
    capacity: u64,

    /// Length a newly created file starts with
    new_file_len: u64,
}

impl FileManager {
    /// Open or create the backing files described by `config`
    ///
    /// On startup:
    /// 1. Create the directory if it doesn't exist
    /// 2. If file `0` exists, map every sequentially numbered file
    /// 3. Otherwise create and map file `0`
    ///
    /// The returned flag is `true` when existing files were found and the
    /// store has to be recovered before it is used.
    pub fn open_or_create(config: &Config) -> Result<(Self, bool)> {
        fs::create_dir_all(&config.data_dir)?;

        let mut manager = Self {
            data_dir: config.data_dir.clone(),
            files: Vec::new(),
            capacity: config.file_capacity,
            new_file_len: config.new_file_len(),
        };

        let existing = Self::file_path_with_dir(&config.data_dir, 0).exists();

        if existing {
            loop {
                let path = manager.file_path(manager.files.len() as u32);
                if !path.exists() {
                    break;
                }

                let file = MappedFile::open(&path, manager.capacity, manager.new_file_len)?;
                manager.files.push(file);
            }

            tracing::info!(
                "Mapped {} existing files from {}",
                manager.files.len(),
                manager.data_dir.display()
            );
        } else {
            manager.grow()?;
        }

        Ok((manager, existing))
    }

    /// Create and map the next numbered file, returning its index
    pub fn grow(&mut self) -> Result<u32> {
        let index = self.files.len() as u64;
        if index >= MAX_FILES {
            return Err(StoreError::TooManyFiles { max: MAX_FILES });
        }

        let index = index as u32;
        let path = self.file_path(index);
        let file = MappedFile::create(&path, self.new_file_len, self.capacity)?;

        // Only reachable files are ever recorded
        self.files.push(file);

        tracing::info!("Created backing file {}", path.display());
        Ok(index)
    }

    /// Make sure file `file` maps at least `end` bytes
    pub fn reserve(&mut self, file: u32, end: u64) -> Result<()> {
        let count = self.files.len();
        let mapped = self
            .files
            .get_mut(file as usize)
            .ok_or_else(|| StoreError::Config(format!("file {} of {} not mapped", file, count)))?;

        mapped.reserve(end)
    }

    /// Up to `len` mapped bytes starting at (`file`, `offset`).
    ///
    /// The slice is shorter than `len` (possibly empty) when it would run
    /// past the mapped part of the file.
    pub fn bytes_at(&self, file: u32, offset: u64, len: usize) -> &[u8] {
        let Some(mapped) = self.files.get(file as usize) else {
            return &[];
        };

        let bytes = mapped.as_slice();
        let start = (offset as usize).min(bytes.len());
        let end = start.saturating_add(len).min(bytes.len());

        &bytes[start..end]
    }

    /// Mutable access to `len` bytes at `location`, growing the mapping
    /// when needed
    pub fn slot_mut(&mut self, location: Location, len: usize) -> Result<&mut [u8]> {
        let start = u64::from(location.offset());
        let end = start + len as u64;

        if (location.file() as usize) >= self.files.len() || end > self.capacity {
            return Err(StoreError::InvalidHandle(location));
        }

        let mapped = &mut self.files[location.file() as usize];
        mapped.reserve(end)?;

        Ok(&mut mapped.as_mut_slice()[start as usize..end as usize])
    }

    /// Flush every mapped file to disk
    pub fn flush(&self) -> Result<()> {
        for file in &self.files {
            file.flush()?;
        }
        Ok(())
    }

    /// Get a mapped file by index
    pub fn file(&self, index: u32) -> Option<&MappedFile> {
        self.files.get(index as usize)
    }

    /// Get the number of mapped files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Get the per-file capacity
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Sum of the mapped lengths of all files
    pub fn mapped_bytes(&self) -> u64 {
        self.files.iter().map(MappedFile::len).sum()
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Generate the file path for the file with given index
    fn file_path(&self, index: u32) -> PathBuf {
        Self::file_path_with_dir(&self.data_dir, index)
    }

    /// Generate a file path given a directory and index
    fn file_path_with_dir(dir: &Path, index: u32) -> PathBuf {
        dir.join(index.to_string())
    }
}
