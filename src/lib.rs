//! # slabkv
//!
//! An embedded key-value store that keeps records directly in
//! memory-mapped flat files:
//! - Opaque 64-bit handles that double as record addresses
//! - Slab-style size classes with per-class free lists
//! - Multiple fixed-capacity backing files, added as the store grows
//! - Scan-based recovery of allocator state on reopen
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │          insert / get / update / delete / iter              │
//! └──────┬──────────────────────┬──────────────────────┬────────┘
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//! ┌─────────────┐       ┌──────────────┐       ┌──────────────┐
//! │  Allocator  │       │ Record Codec │       │   Scanner    │
//! │ size classes│       │  (headers)   │       │  (recovery)  │
//! │ free lists  │       └──────────────┘       └──────┬───────┘
//! └──────┬──────┘                                     │
//!        │                                            │
//!        ▼                                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 File Manager (mmap'd files)                 │
//! │                  {data_dir}/0, 1, 2, ...                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use slabkv::{Config, Store};
//!
//! let config = Config::builder().data_dir("/tmp/slabkv").build();
//! let mut store = Store::open(config)?;
//!
//! let handle = store.insert(b"user:1", b"alice")?;
//! assert_eq!(store.get(handle)?, Some((b"user:1".to_vec(), b"alice".to_vec())));
//!
//! let handle = store.update(handle, b"user:1", b"alice smith")?.unwrap();
//! assert!(store.delete(handle)?);
//! assert_eq!(store.get(handle)?, None);
//!
//! store.close()?;
//! # Ok::<(), slabkv::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod location;
pub mod record;
pub mod allocator;
pub mod storage;
pub mod scan;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use location::{Handle, Location, Position};
pub use store::{Stats, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of slabkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
