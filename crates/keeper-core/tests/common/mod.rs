//! Minimal tree-backed `NamespaceClient` for engine tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use keeper_core::{KeeperError, NamespaceClient, NodePath, NodeStat, Result};

#[derive(Default)]
struct Entry {
    value: Vec<u8>,
    children: Vec<String>,
}

pub struct FakeTree {
    nodes: Mutex<BTreeMap<NodePath, Entry>>,
    delay: Option<Duration>,
    listings: AtomicUsize,
}

pub fn abs(raw: &str) -> NodePath {
    NodePath::parse_absolute(raw).unwrap()
}

impl FakeTree {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NodePath::root(), Entry::default());
        Self {
            nodes: Mutex::new(nodes),
            delay: None,
            listings: AtomicUsize::new(0),
        }
    }

    /// Builds a tree from absolute paths; ancestors are created as needed.
    pub fn with_paths(paths: &[&str]) -> Self {
        let tree = Self::new();
        for raw in paths {
            tree.add(&abs(raw));
        }
        tree
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }

    pub fn add(&self, path: &NodePath) {
        let mut nodes = self.nodes.lock().unwrap();
        let mut current = NodePath::root();
        for segment in path.segments() {
            let next = current.child(segment).unwrap();
            if !nodes.contains_key(&next) {
                nodes.insert(next.clone(), Entry::default());
                nodes.get_mut(&current).unwrap().children.push(segment.clone());
            }
            current = next;
        }
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.nodes.lock().unwrap().contains_key(&abs(raw))
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl NamespaceClient for FakeTree {
    async fn children(&self, path: &NodePath) -> Result<Vec<String>> {
        self.pause().await;
        self.listings.fetch_add(1, Ordering::SeqCst);
        self.nodes
            .lock()
            .unwrap()
            .get(path)
            .map(|e| e.children.clone())
            .ok_or_else(|| KeeperError::path_not_found(path))
    }

    async fn get(&self, path: &NodePath) -> Result<Vec<u8>> {
        self.pause().await;
        self.nodes
            .lock()
            .unwrap()
            .get(path)
            .map(|e| e.value.clone())
            .ok_or_else(|| KeeperError::path_not_found(path))
    }

    async fn set(
        &self,
        path: &NodePath,
        value: &[u8],
        _expected_version: Option<u64>,
    ) -> Result<()> {
        self.pause().await;
        let mut nodes = self.nodes.lock().unwrap();
        let entry = nodes.get_mut(path).ok_or_else(|| KeeperError::path_not_found(path))?;
        entry.value = value.to_vec();
        Ok(())
    }

    async fn create(&self, path: &NodePath, value: &[u8]) -> Result<()> {
        self.pause().await;
        let mut nodes = self.nodes.lock().unwrap();
        if nodes.contains_key(path) {
            return Err(KeeperError::node_exists(path));
        }
        let name = path.name().unwrap().to_string();
        nodes
            .get_mut(&path.parent())
            .ok_or_else(|| KeeperError::path_not_found(path.parent()))?
            .children
            .push(name);
        nodes.insert(
            path.clone(),
            Entry {
                value: value.to_vec(),
                children: Vec::new(),
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &NodePath, _expected_version: Option<u64>) -> Result<()> {
        self.pause().await;
        let mut nodes = self.nodes.lock().unwrap();
        let entry = nodes.get(path).ok_or_else(|| KeeperError::path_not_found(path))?;
        if !entry.children.is_empty() {
            return Err(KeeperError::not_empty(path));
        }
        nodes.remove(path);
        let name = path.name().unwrap_or_default().to_string();
        if let Some(parent) = nodes.get_mut(&path.parent()) {
            parent.children.retain(|c| *c != name);
        }
        Ok(())
    }

    async fn exists(&self, path: &NodePath) -> Result<bool> {
        self.pause().await;
        Ok(self.nodes.lock().unwrap().contains_key(path))
    }

    async fn stat(&self, path: &NodePath) -> Result<NodeStat> {
        self.pause().await;
        let nodes = self.nodes.lock().unwrap();
        let entry = nodes.get(path).ok_or_else(|| KeeperError::path_not_found(path))?;
        Ok(NodeStat {
            version: 0,
            num_children: entry.children.len(),
            data_length: entry.value.len(),
        })
    }
}

/// Wraps a `FakeTree` and fails every listing of one path with a fixed error.
pub struct FailingListing {
    pub inner: FakeTree,
    pub target: NodePath,
    pub error: KeeperError,
}

#[async_trait]
impl NamespaceClient for FailingListing {
    async fn children(&self, path: &NodePath) -> Result<Vec<String>> {
        if *path == self.target {
            return Err(self.error.clone());
        }
        self.inner.children(path).await
    }

    async fn get(&self, path: &NodePath) -> Result<Vec<u8>> {
        self.inner.get(path).await
    }

    async fn set(
        &self,
        path: &NodePath,
        value: &[u8],
        expected_version: Option<u64>,
    ) -> Result<()> {
        self.inner.set(path, value, expected_version).await
    }

    async fn create(&self, path: &NodePath, value: &[u8]) -> Result<()> {
        self.inner.create(path, value).await
    }

    async fn delete(&self, path: &NodePath, expected_version: Option<u64>) -> Result<()> {
        self.inner.delete(path, expected_version).await
    }

    async fn exists(&self, path: &NodePath) -> Result<bool> {
        self.inner.exists(path).await
    }

    async fn stat(&self, path: &NodePath) -> Result<NodeStat> {
        self.inner.stat(path).await
    }
}
