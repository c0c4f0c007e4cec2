//! Mapped File
//!
//! One fixed-capacity backing file mapped read/write into memory.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::error::{Result, StoreError};

/// A backing file and its shared writable mapping
///
/// The mapping covers the current file length, which is either the full
/// capacity (preallocated) or a prefix of it that grows on demand.
#[derive(Debug)]
pub struct MappedFile {
    /// Location on disk
    path: PathBuf,
    /// Open handle, kept for resizing and remapping
    file: File,
    /// Shared mapping over `[0, len)`
    map: MmapMut,
    /// Length this file may grow to
    capacity: u64,
}

impl MappedFile {
    /// Create a new zero-filled file of `len` bytes and map it.
    ///
    /// Fails if the file already exists. A file that was created but
    /// could not be sized or mapped is removed again.
    pub fn create(path: &Path, len: u64, capacity: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        let map = match Self::size_and_map(&file, len) {
            Ok(map) => map,
            Err(e) => {
                drop(file);
                if let Err(remove_err) = fs::remove_file(path) {
                    tracing::warn!(
                        "Failed to remove partially created {}: {}",
                        path.display(),
                        remove_err
                    );
                }
                return Err(e);
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            file,
            map,
            capacity,
        })
    }

    /// Map an existing file.
    ///
    /// An empty file (left behind by an interrupted creation) is extended
    /// to `fallback_len` so it can be mapped.
    pub fn open(path: &Path, capacity: u64, fallback_len: u64) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let len = file.metadata()?.len();
        if len > capacity {
            return Err(StoreError::Config(format!(
                "{} is {} bytes, larger than file_capacity {}",
                path.display(),
                len,
                capacity
            )));
        }

        if len == 0 {
            tracing::warn!("Backing file {} is empty, resizing", path.display());
            file.set_len(fallback_len)?;
        }

        let map = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            path: path.to_path_buf(),
            file,
            map,
            capacity,
        })
    }

    /// Make sure at least `needed` bytes are mapped.
    ///
    /// Grows the file by doubling (capped at the capacity) and remaps it.
    /// The old mapping stays in place if any step fails.
    pub fn reserve(&mut self, needed: u64) -> Result<()> {
        let len = self.len();
        if needed <= len {
            return Ok(());
        }

        if needed > self.capacity {
            return Err(StoreError::Config(format!(
                "cannot grow {} to {} bytes, capacity is {}",
                self.path.display(),
                needed,
                self.capacity
            )));
        }

        let new_len = needed.max(len.saturating_mul(2)).min(self.capacity);

        self.file.set_len(new_len)?;
        let map = unsafe { MmapMut::map_mut(&self.file)? };
        self.map = map;

        tracing::debug!(
            "Grew {} from {} to {} bytes",
            self.path.display(),
            len,
            new_len
        );

        Ok(())
    }

    fn size_and_map(file: &File, len: u64) -> Result<MmapMut> {
        // set_len zero-fills the new range
        file.set_len(len)?;
        let map = unsafe { MmapMut::map_mut(file)? };
        Ok(map)
    }

    /// Currently mapped length
    pub fn len(&self) -> u64 {
        self.map.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.map
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.map
    }

    /// Durably write back the mapped region
    pub fn flush(&self) -> Result<()> {
        self.map.flush()?;
        Ok(())
    }
}
