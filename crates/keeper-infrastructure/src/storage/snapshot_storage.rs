//! JSON snapshots of a [`MemoryNamespace`].
//!
//! The CLI loads its offline namespace from a snapshot and, with `--persist`,
//! writes it back after the session. Values are base64 so arbitrary bytes
//! survive the JSON round trip.

use std::collections::BTreeMap;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use keeper_core::error::{KeeperError, Result};
use keeper_core::path::NodePath;

use super::atomic::{read_if_present, write_atomic};
use crate::memory_namespace::{MemoryNamespace, MemoryNode};

/// One node of the on-disk tree. The root has an empty name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SnapshotNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

pub struct SnapshotStorage {
    path: PathBuf,
}

impl SnapshotStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the namespace; a missing or empty file yields an empty one.
    pub fn load(&self) -> Result<MemoryNamespace> {
        let Some(content) = read_if_present(&self.path)? else {
            tracing::debug!(path = %self.path.display(), "no snapshot, starting empty");
            return Ok(MemoryNamespace::new());
        };
        let root: SnapshotNode = serde_json::from_str(&content)?;
        let nodes = flatten(root)?;
        tracing::info!(path = %self.path.display(), nodes = nodes.len(), "loaded snapshot");
        Ok(MemoryNamespace::from_nodes(nodes))
    }

    pub fn save(&self, namespace: &MemoryNamespace) -> Result<()> {
        let root = build_tree(&namespace.nodes());
        let content = serde_json::to_vec_pretty(&root)?;
        write_atomic(&self.path, &content)?;
        tracing::info!(path = %self.path.display(), "saved snapshot");
        Ok(())
    }
}

fn flatten(root: SnapshotNode) -> Result<BTreeMap<NodePath, MemoryNode>> {
    let mut nodes = BTreeMap::new();
    let mut stack = vec![(NodePath::root(), root)];

    while let Some((path, node)) = stack.pop() {
        let value = STANDARD.decode(&node.value).map_err(|e| KeeperError::Serialization {
            format: "base64".to_string(),
            message: format!("{path}: {e}"),
        })?;
        let mut children = Vec::with_capacity(node.children.len());
        for child in node.children {
            let child_path = path.child(&child.name)?;
            if nodes.contains_key(&child_path) || children.contains(&child.name) {
                return Err(KeeperError::node_exists(child_path));
            }
            children.push(child.name.clone());
            stack.push((child_path, child));
        }
        nodes.insert(
            path,
            MemoryNode {
                value,
                version: node.version,
                children,
            },
        );
    }

    Ok(nodes)
}

fn build_tree(nodes: &BTreeMap<NodePath, MemoryNode>) -> SnapshotNode {
    fn build(path: &NodePath, nodes: &BTreeMap<NodePath, MemoryNode>) -> SnapshotNode {
        let Some(node) = nodes.get(path) else {
            return SnapshotNode::default();
        };
        let children = node
            .children
            .iter()
            .filter_map(|name| path.child(name).ok())
            .map(|child| build(&child, nodes))
            .collect();
        SnapshotNode {
            name: path.name().unwrap_or_default().to_string(),
            value: STANDARD.encode(&node.value),
            version: node.version,
            children,
        }
    }

    build(&NodePath::root(), nodes)
}
