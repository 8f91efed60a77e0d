//! Transports for four-letter administrative words.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use keeper_core::error::{KeeperError, Result};
use keeper_core::four_letter::ProbeChannel;

use crate::memory_namespace::MemoryNamespace;

/// Sends each word over a fresh TCP connection and reads until the server
/// closes it.
pub struct TcpProbeChannel {
    endpoint: String,
    timeout: Duration,
}

impl TcpProbeChannel {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    async fn exchange(&self, word: &str) -> Result<String> {
        let mut stream = TcpStream::connect(&self.endpoint).await?;
        stream.write_all(word.as_bytes()).await?;
        stream.shutdown().await?;

        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await?;
        Ok(String::from_utf8_lossy(&reply).into_owned())
    }
}

#[async_trait]
impl ProbeChannel for TcpProbeChannel {
    async fn send(&self, word: &str) -> Result<String> {
        tracing::debug!(endpoint = %self.endpoint, word, "probing");
        match tokio::time::timeout(self.timeout, self.exchange(word)).await {
            Ok(result) => result.map_err(|e| match e {
                KeeperError::Io { message } => {
                    KeeperError::io(format!("{}: {message}", self.endpoint))
                }
                other => other,
            }),
            Err(_) => Err(KeeperError::remote_timeout(
                "four_letter_word",
                &self.endpoint,
                self.timeout,
            )),
        }
    }
}

/// Answers probes locally on behalf of an in-memory namespace.
pub struct MemoryProbeChannel {
    namespace: Arc<MemoryNamespace>,
}

impl MemoryProbeChannel {
    pub fn new(namespace: Arc<MemoryNamespace>) -> Self {
        Self { namespace }
    }
}

#[async_trait]
impl ProbeChannel for MemoryProbeChannel {
    async fn send(&self, word: &str) -> Result<String> {
        let reply = match word {
            "ruok" => "imok".to_string(),
            "isro" => "rw".to_string(),
            "srvr" | "stat" => format!(
                "keeper-client in-memory namespace\nMode: standalone\nNode count: {}\n",
                self.namespace.node_count()
            ),
            "mntr" => format!(
                "zk_server_state\tstandalone\nzk_znode_count\t{}\nzk_packets_received\t{}\n",
                self.namespace.node_count(),
                self.namespace.call_count()
            ),
            other => return Err(KeeperError::unsupported_word(other)),
        };
        Ok(reply)
    }
}
