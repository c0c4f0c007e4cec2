//! Storage Module
//!
//! Backing file layer: fixed-capacity flat files mapped into memory.
//!
//! ## Responsibilities
//! - Create, discover and map the numbered backing files
//! - Grow the store by adding files when one fills up
//! - Grow a single file on demand when it is not preallocated
//! - Flush mapped regions to disk
//!
//! ## Directory Layout
//! ```text
//! {data_dir}/
//!   ├── 0      (file_capacity bytes, zero-filled on creation)
//!   ├── 1
//!   └── ...
//!
//! Each file:
//! ┌──────────┬──────────────────────────────────────────────┐
//! │ byte 0   │ slots and records from offset 1 onward       │
//! │ reserved │ [record][record]...[padding?][unwritten...]  │
//! └──────────┴──────────────────────────────────────────────┘
//! ```

mod file;
mod manager;

pub use file::MappedFile;
pub use manager::FileManager;
