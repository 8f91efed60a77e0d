use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backup::DEFAULT_BACKUPS_ROOT;
use crate::error::{KeeperError, Result};
use crate::liveness::MarkerPrefixPolicy;
use crate::path::NodePath;
use crate::subtree::SiblingOrder;

/// Client settings, read from `config.toml` and overridden by CLI flags.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Per remote call
    pub timeout_ms: u64,
    /// Parallel child lookups during traversal
    pub concurrency: usize,
    pub backups_root: String,
    pub alive_marker_prefix: String,
    pub sibling_order: SiblingOrder,
    pub history_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9181,
            timeout_ms: 10_000,
            concurrency: 16,
            backups_root: DEFAULT_BACKUPS_ROOT.to_string(),
            alive_marker_prefix: MarkerPrefixPolicy::DEFAULT_PREFIX.to_string(),
            sibling_order: SiblingOrder::default(),
            history_file: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backups_root(&self) -> Result<NodePath> {
        NodePath::parse_absolute(&self.backups_root)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(KeeperError::config("concurrency must be at least 1"));
        }
        if self.timeout_ms == 0 {
            return Err(KeeperError::config("timeout_ms must be at least 1"));
        }
        self.backups_root()?;
        Ok(())
    }
}
