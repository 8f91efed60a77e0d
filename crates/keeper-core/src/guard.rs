//! Timeout and cancellation guard around a [`NamespaceClient`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{KeeperError, Result};
use crate::namespace::{NamespaceClient, NodeStat};
use crate::path::NodePath;

/// Decorator that bounds every remote call by `timeout` and refuses to issue
/// new calls once `cancel` has fired.
///
/// Cancellation is checked before each call, so a mutation that was not yet
/// issued is never sent. A call already in flight is raced against the token.
#[derive(Clone)]
pub struct GuardedClient {
    inner: Arc<dyn NamespaceClient>,
    timeout: Duration,
    cancel: CancellationToken,
}

impl GuardedClient {
    pub fn new(
        inner: Arc<dyn NamespaceClient>,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner,
            timeout,
            cancel,
        }
    }

    async fn call<T, F>(&self, operation: &'static str, path: &NodePath, fut: F) -> Result<T>
    where
        T: Send,
        F: Future<Output = Result<T>> + Send,
    {
        if self.cancel.is_cancelled() {
            return Err(KeeperError::Cancelled);
        }

        tokio::select! {
            _ = self.cancel.cancelled() => Err(KeeperError::Cancelled),
            outcome = tokio::time::timeout(self.timeout, fut) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(operation, %path, "remote call timed out");
                    Err(KeeperError::remote_timeout(operation, path, self.timeout))
                }
            },
        }
    }
}

#[async_trait]
impl NamespaceClient for GuardedClient {
    async fn children(&self, path: &NodePath) -> Result<Vec<String>> {
        self.call("children", path, self.inner.children(path)).await
    }

    async fn get(&self, path: &NodePath) -> Result<Vec<u8>> {
        self.call("get", path, self.inner.get(path)).await
    }

    async fn set(
        &self,
        path: &NodePath,
        value: &[u8],
        expected_version: Option<u64>,
    ) -> Result<()> {
        self.call("set", path, self.inner.set(path, value, expected_version))
            .await
    }

    async fn create(&self, path: &NodePath, value: &[u8]) -> Result<()> {
        self.call("create", path, self.inner.create(path, value)).await
    }

    async fn delete(&self, path: &NodePath, expected_version: Option<u64>) -> Result<()> {
        self.call("delete", path, self.inner.delete(path, expected_version))
            .await
    }

    async fn exists(&self, path: &NodePath) -> Result<bool> {
        self.call("exists", path, self.inner.exists(path)).await
    }

    async fn stat(&self, path: &NodePath) -> Result<NodeStat> {
        self.call("stat", path, self.inner.stat(path)).await
    }

    // delete_recursive keeps the provided implementation so that every
    // individual delete passes through the guard.
}
