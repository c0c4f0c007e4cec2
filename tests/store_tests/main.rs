//! Store tests: CRUD, rollover, recovery and iteration

mod rollover_tests;

use slabkv::{Config, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Route store logs to the test harness (`RUST_LOG=slabkv=debug`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 4 KB files with classes 32, 64, ..., 1024
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

pub fn setup_store() -> (TempDir, Store) {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let store = Store::open(small_config(&temp, true)).unwrap();
    (temp, store)
}

pub fn reopen(temp: &TempDir, preallocate: bool) -> Store {
    Store::open(small_config(temp, preallocate)).unwrap()
}

/// A value that makes `key` + value a 116-byte record (class 2, 128 bytes)
pub fn value_for_128(key: &[u8]) -> Vec<u8> {
    vec![b'v'; 116 - 10 - key.len()]
}
