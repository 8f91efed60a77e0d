//! Locations of the client's files on disk.

use std::path::PathBuf;

use keeper_core::error::{KeeperError, Result};

const APP_DIR: &str = "keeper-client";

/// Platform-specific paths for keeper-client.
///
/// ```text
/// ~/.config/keeper-client/
/// ├── config.toml
/// └── history.txt
/// ```
pub struct KeeperPaths;

impl KeeperPaths {
    /// `<config_dir>/keeper-client`, e.g. `~/.config/keeper-client` on Linux.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| KeeperError::config("cannot determine the configuration directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default REPL history file, used when the config names none.
    pub fn history_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("history.txt"))
    }
}
