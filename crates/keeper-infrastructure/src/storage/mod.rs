//! File persistence helpers.

mod atomic;

pub mod config_storage;
pub mod snapshot_storage;

pub use atomic::{read_if_present, write_atomic};
pub use config_storage::ConfigStorage;
pub use snapshot_storage::SnapshotStorage;
