//! Namespace client capability and node data types.

use async_trait::async_trait;

use crate::error::Result;
use crate::path::NodePath;

/// Metadata of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStat {
    /// Starts at 0, incremented by every `set`
    pub version: u64,
    pub num_children: usize,
    pub data_length: usize,
}

/// Point-in-time view of one node as produced by traversal queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub path: NodePath,
    pub child_count: usize,
    pub value: Option<Vec<u8>>,
}

impl NodeSnapshot {
    pub fn new(path: NodePath, child_count: usize) -> Self {
        Self {
            path,
            child_count,
            value: None,
        }
    }
}

/// Single-node operations against the remote namespace.
///
/// Implementations talk to a live cluster or, in tests and offline mode, to
/// an in-memory tree. Children are returned in the store's own order.
#[async_trait]
pub trait NamespaceClient: Send + Sync {
    /// Lists the names of the immediate children of `path`.
    async fn children(&self, path: &NodePath) -> Result<Vec<String>>;

    async fn get(&self, path: &NodePath) -> Result<Vec<u8>>;

    /// Replaces the value; `expected_version` guards against lost updates.
    async fn set(
        &self,
        path: &NodePath,
        value: &[u8],
        expected_version: Option<u64>,
    ) -> Result<()>;

    /// Fails with `NodeExists` if present and `PathNotFound` if the parent is missing.
    async fn create(&self, path: &NodePath, value: &[u8]) -> Result<()>;

    /// Non-recursive delete; fails with `NotEmpty` if the node has children.
    async fn delete(&self, path: &NodePath, expected_version: Option<u64>) -> Result<()>;

    async fn exists(&self, path: &NodePath) -> Result<bool>;

    async fn stat(&self, path: &NodePath) -> Result<NodeStat>;

    /// Deletes `path` and everything below it, children first.
    ///
    /// Nodes that vanish concurrently are skipped. Returns the number of
    /// nodes removed.
    async fn delete_recursive(&self, path: &NodePath) -> Result<usize> {
        // Post-order with an explicit stack: (node, children already expanded)
        let mut stack = vec![(path.clone(), false)];
        let mut removed = 0;

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                match self.delete(&node, None).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
                continue;
            }

            let children = match self.children(&node).await {
                Ok(children) => children,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            };
            stack.push((node.clone(), true));
            for name in children {
                stack.push((node.child(&name)?, false));
            }
        }

        Ok(removed)
    }
}
