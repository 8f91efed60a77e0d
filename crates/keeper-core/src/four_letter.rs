//! Four-letter administrative words.
//!
//! These probes are answered by the server outside of any namespace session,
//! so they go through their own [`ProbeChannel`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{KeeperError, Result};

/// Words the server understands.
pub const FOUR_LETTER_WORDS: &[&str] = &[
    "ruok", "mntr", "srvr", "stat", "srst", "conf", "cons", "crst", "envi", "dirs", "isro", "wchs",
    "wchc", "wchp", "dump", "rqld", "rcvr", "apiv", "csnp", "lgif", "ydld",
];

/// Transport for one administrative request/response exchange.
#[async_trait]
pub trait ProbeChannel: Send + Sync {
    async fn send(&self, word: &str) -> Result<String>;
}

pub fn is_four_letter_word(word: &str) -> bool {
    FOUR_LETTER_WORDS.contains(&word)
}

#[derive(Clone)]
pub struct FourLetterWordProxy {
    channel: Arc<dyn ProbeChannel>,
}

impl FourLetterWordProxy {
    pub fn new(channel: Arc<dyn ProbeChannel>) -> Self {
        Self { channel }
    }

    /// Forwards `word` and returns the reply without its trailing newline.
    pub async fn send(&self, word: &str) -> Result<String> {
        if !is_four_letter_word(word) {
            return Err(KeeperError::unsupported_word(word));
        }
        tracing::debug!(word, "sending four-letter word");
        let reply = self.channel.send(word).await?;
        Ok(reply.trim_end_matches(['\n', '\r']).to_string())
    }
}
