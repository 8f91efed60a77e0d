//! `config.toml` loading and saving.

use std::path::{Path, PathBuf};

use keeper_core::ClientConfig;
use keeper_core::error::{KeeperError, Result};

use super::atomic::{read_if_present, write_atomic};
use crate::paths::KeeperPaths;

pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the platform default location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(KeeperPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration; a missing or empty file yields the defaults.
    pub fn load(&self) -> Result<ClientConfig> {
        match read_if_present(&self.path)? {
            Some(content) => {
                let config: ClientConfig = toml::from_str(&content)?;
                tracing::debug!(path = %self.path.display(), "loaded configuration");
                Ok(config)
            }
            None => {
                tracing::debug!(
                    path = %self.path.display(),
                    "no configuration file, using defaults"
                );
                Ok(ClientConfig::default())
            }
        }
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).map_err(|e| KeeperError::Serialization {
            format: "TOML".to_string(),
            message: e.to_string(),
        })?;
        write_atomic(&self.path, content.as_bytes())
    }
}
