//! Storage tests: mapped files and the file manager


use slabkv::config::Config;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// 4 KB files, preallocated or starting at 256 bytes
pub fn small_config(dir: &TempDir, preallocate: bool) -> Config {
    Config::builder()
        .data_dir(dir.path())
        .file_capacity(4096)
        .preallocate(preallocate)
        .initial_file_size(256)
        .min_slot_size(32)
        .max_slot_size(1024)
        .build()
}
