//! In-memory namespace.
//!
//! Serves as the deterministic fake behind tests and as the offline backend
//! of the CLI. Children are kept in creation order, which is the order
//! `children` returns them in.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use keeper_core::error::{KeeperError, Result};
use keeper_core::namespace::{NamespaceClient, NodeStat};
use keeper_core::path::NodePath;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MemoryNode {
    pub value: Vec<u8>,
    pub version: u64,
    pub children: Vec<String>,
}

#[derive(Debug)]
pub struct MemoryNamespace {
    nodes: Mutex<BTreeMap<NodePath, MemoryNode>>,
    latency: Option<Duration>,
    connected: AtomicBool,
    calls: AtomicUsize,
}

impl Default for MemoryNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNamespace {
    /// An empty namespace holding only the root.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NodePath::root(), MemoryNode::default());
        Self::from_nodes(nodes)
    }

    pub(crate) fn from_nodes(nodes: BTreeMap<NodePath, MemoryNode>) -> Self {
        Self {
            nodes: Mutex::new(nodes),
            latency: None,
            connected: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    /// Delays every call, to exercise timeouts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes every subsequent call fail with `ConnectionLost`.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    /// Number of remote calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn node_count(&self) -> usize {
        self.lock().len()
    }

    /// Creates `path` and any missing ancestors with empty values.
    pub fn create_all(&self, path: &NodePath, value: &[u8]) {
        let mut nodes = self.lock();
        let mut current = NodePath::root();
        for segment in path.segments() {
            let Ok(next) = current.child(segment) else {
                return;
            };
            if !nodes.contains_key(&next) {
                nodes.insert(next.clone(), MemoryNode::default());
                if let Some(parent) = nodes.get_mut(&current) {
                    parent.children.push(segment.clone());
                }
            }
            current = next;
        }
        if let Some(node) = nodes.get_mut(path) {
            node.value = value.to_vec();
        }
    }

    pub(crate) fn nodes(&self) -> BTreeMap<NodePath, MemoryNode> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<NodePath, MemoryNode>> {
        self.nodes.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if !self.connected.load(Ordering::SeqCst) {
            return Err(KeeperError::connection_lost("in-memory session closed"));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn check_version(path: &NodePath, node: &MemoryNode, expected: Option<u64>) -> Result<()> {
    match expected {
        Some(expected) if expected != node.version => Err(KeeperError::BadVersion {
            path: path.to_string(),
            expected,
            actual: node.version,
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl NamespaceClient for MemoryNamespace {
    async fn children(&self, path: &NodePath) -> Result<Vec<String>> {
        self.enter().await?;
        self.lock()
            .get(path)
            .map(|node| node.children.clone())
            .ok_or_else(|| KeeperError::path_not_found(path))
    }

    async fn get(&self, path: &NodePath) -> Result<Vec<u8>> {
        self.enter().await?;
        self.lock()
            .get(path)
            .map(|node| node.value.clone())
            .ok_or_else(|| KeeperError::path_not_found(path))
    }

    async fn set(
        &self,
        path: &NodePath,
        value: &[u8],
        expected_version: Option<u64>,
    ) -> Result<()> {
        self.enter().await?;
        let mut nodes = self.lock();
        let node = nodes
            .get_mut(path)
            .ok_or_else(|| KeeperError::path_not_found(path))?;
        check_version(path, node, expected_version)?;
        node.value = value.to_vec();
        node.version += 1;
        Ok(())
    }

    async fn create(&self, path: &NodePath, value: &[u8]) -> Result<()> {
        self.enter().await?;
        let Some(name) = path.name() else {
            return Err(KeeperError::node_exists(path));
        };
        let mut nodes = self.lock();
        if nodes.contains_key(path) {
            return Err(KeeperError::node_exists(path));
        }
        let parent = nodes
            .get_mut(&path.parent())
            .ok_or_else(|| KeeperError::path_not_found(path.parent()))?;
        parent.children.push(name.to_string());
        nodes.insert(
            path.clone(),
            MemoryNode {
                value: value.to_vec(),
                ..Default::default()
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &NodePath, expected_version: Option<u64>) -> Result<()> {
        self.enter().await?;
        let Some(name) = path.name() else {
            return Err(KeeperError::InvalidPath("the root cannot be deleted".to_string()));
        };
        let mut nodes = self.lock();
        let node = nodes
            .get(path)
            .ok_or_else(|| KeeperError::path_not_found(path))?;
        check_version(path, node, expected_version)?;
        if !node.children.is_empty() {
            return Err(KeeperError::not_empty(path));
        }
        nodes.remove(path);
        if let Some(parent) = nodes.get_mut(&path.parent()) {
            parent.children.retain(|child| child != name);
        }
        Ok(())
    }

    async fn exists(&self, path: &NodePath) -> Result<bool> {
        self.enter().await?;
        Ok(self.lock().contains_key(path))
    }

    async fn stat(&self, path: &NodePath) -> Result<NodeStat> {
        self.enter().await?;
        self.lock()
            .get(path)
            .map(|node| NodeStat {
                version: node.version,
                num_children: node.children.len(),
                data_length: node.value.len(),
            })
            .ok_or_else(|| KeeperError::path_not_found(path))
    }
}
