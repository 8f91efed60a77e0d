pub mod backup;
pub mod command;
pub mod config;
pub mod error;
pub mod family;
pub mod four_letter;
pub mod guard;
pub mod liveness;
pub mod namespace;
pub mod path;
pub mod resolver;
pub mod subtree;

// Re-export common types
pub use config::ClientConfig;
pub use error::{KeeperError, Result};
pub use namespace::{NamespaceClient, NodeSnapshot, NodeStat};
pub use path::NodePath;
