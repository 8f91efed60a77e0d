pub mod memory_namespace;
pub mod paths;
pub mod probe;
pub mod storage;

pub use crate::memory_namespace::MemoryNamespace;
pub use crate::paths::KeeperPaths;
pub use crate::probe::{MemoryProbeChannel, TcpProbeChannel};
pub use crate::storage::{ConfigStorage, SnapshotStorage};
