//! Whole-subtree enumeration with bounded concurrency.
//!
//! The traversal keeps a LIFO work list of `(path, children)` entries. Every
//! node is listed exactly once: listing a node's children both sizes the node
//! and tells the traversal what to expand next. The per-child listings of one
//! sibling group are independent and are issued concurrently, but results are
//! merged back in submission order, so concurrency never changes the output.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::error::{KeeperError, Result};
use crate::namespace::{NamespaceClient, NodeSnapshot};
use crate::path::NodePath;

/// Order in which siblings enter the work list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingOrder {
    /// Byte-wise sorted names, independent of the store. Numeric suffixes
    /// are not compared as numbers, so `node10` sorts before `node9`.
    #[default]
    Lexical,
    /// Whatever order the store returned
    Store,
}

/// Order in which snapshots are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Pop order of the LIFO list: the last-pushed sibling comes first, so
    /// siblings appear reversed and groups follow parent expansion order.
    #[default]
    Stack,
    /// Parent before descendants, siblings in sibling order.
    PreOrder,
}

struct Pending {
    path: NodePath,
    children: Vec<String>,
}

pub struct SubtreeEnumerator<'a> {
    client: &'a dyn NamespaceClient,
    concurrency: usize,
    sibling_order: SiblingOrder,
}

impl<'a> SubtreeEnumerator<'a> {
    pub fn new(client: &'a dyn NamespaceClient, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            sibling_order: SiblingOrder::default(),
        }
    }

    pub fn with_sibling_order(mut self, order: SiblingOrder) -> Self {
        self.sibling_order = order;
        self
    }

    /// Returns every strict descendant of `root` with its immediate child count.
    ///
    /// # Errors
    ///
    /// `PathNotFound` if `root` does not exist; any other remote error aborts
    /// the enumeration. A descendant deleted mid-traversal is reported with
    /// zero children instead of failing.
    pub async fn enumerate(
        &self,
        root: &NodePath,
        order: TraversalOrder,
    ) -> Result<Vec<NodeSnapshot>> {
        let root_children = self.list(root).await?;
        let mut work = Vec::new();
        self.push_children(&mut work, root, root_children, order).await?;

        let mut snapshots = Vec::new();
        while let Some(Pending { path, children }) = work.pop() {
            snapshots.push(NodeSnapshot::new(path.clone(), children.len()));
            self.push_children(&mut work, &path, children, order).await?;
        }

        tracing::debug!(root = %root, nodes = snapshots.len(), "enumerated subtree");
        Ok(snapshots)
    }

    /// Sizes every child of `parent` and pushes it onto the work list.
    async fn push_children(
        &self,
        work: &mut Vec<Pending>,
        parent: &NodePath,
        children: Vec<String>,
        order: TraversalOrder,
    ) -> Result<()> {
        if children.is_empty() {
            return Ok(());
        }

        let paths = children
            .iter()
            .map(|name| parent.child(name))
            .collect::<Result<Vec<_>>>()?;

        let sized: Vec<Pending> = stream::iter(paths)
            .map(|path| async move {
                let children = self.list_tolerant(&path).await?;
                Ok::<_, KeeperError>(Pending { path, children })
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        match order {
            TraversalOrder::Stack => work.extend(sized),
            TraversalOrder::PreOrder => work.extend(sized.into_iter().rev()),
        }
        Ok(())
    }

    async fn list(&self, path: &NodePath) -> Result<Vec<String>> {
        let mut children = self.client.children(path).await?;
        if self.sibling_order == SiblingOrder::Lexical {
            children.sort();
        }
        Ok(children)
    }

    /// Like [`Self::list`] but a vanished node counts as a leaf.
    async fn list_tolerant(&self, path: &NodePath) -> Result<Vec<String>> {
        match self.list(path).await {
            Ok(children) => Ok(children),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%path, "node disappeared during traversal");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
