use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use keeper_core::ClientConfig;
use keeper_infrastructure::ConfigStorage;

#[derive(Parser, Debug)]
#[command(name = "keeper-client")]
#[command(version, long_about = None)]
#[command(about = "Command-line client for hierarchical coordination namespaces")]
pub struct Cli {
    /// Server host for four-letter-word probes
    #[arg(long)]
    pub host: Option<String>,

    /// Server port for four-letter-word probes
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Run the `;`-separated commands and exit instead of starting the shell
    #[arg(short, long)]
    pub query: Option<String>,

    /// Configuration file (default: <config dir>/keeper-client/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON snapshot to load the namespace from
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Write the namespace back to the snapshot on exit
    #[arg(long, requires = "snapshot")]
    pub persist: bool,

    /// Per-call timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Parallel child lookups during traversal
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Reads the configuration file and applies flag overrides on top.
    pub fn load_config(&self) -> Result<ClientConfig> {
        let storage = match &self.config {
            Some(path) => ConfigStorage::new(path),
            None => ConfigStorage::default_location()?,
        };
        let mut config = storage
            .load()
            .with_context(|| format!("failed to load {}", storage.path().display()))?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
    }
}
