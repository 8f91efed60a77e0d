//! Fan-out rankings built on [`SubtreeEnumerator`].

use crate::error::Result;
use crate::namespace::{NamespaceClient, NodeSnapshot};
use crate::path::NodePath;
use crate::subtree::{SiblingOrder, SubtreeEnumerator, TraversalOrder};

pub struct RankedFamilyFinder<'a> {
    enumerator: SubtreeEnumerator<'a>,
    client: &'a dyn NamespaceClient,
}

impl<'a> RankedFamilyFinder<'a> {
    pub fn new(
        client: &'a dyn NamespaceClient,
        concurrency: usize,
        sibling_order: SiblingOrder,
    ) -> Self {
        Self {
            enumerator: SubtreeEnumerator::new(client, concurrency)
                .with_sibling_order(sibling_order),
            client,
        }
    }

    /// Every descendant of `root`, most children first.
    ///
    /// The sort is stable, so equal counts keep the stack traversal order.
    /// `limit` truncates after sorting; the result is always a prefix of the
    /// unlimited ranking.
    pub async fn big_family(
        &self,
        root: &NodePath,
        limit: Option<usize>,
    ) -> Result<Vec<NodeSnapshot>> {
        let mut family = self.enumerator.enumerate(root, TraversalOrder::Stack).await?;
        family.sort_by(|a, b| b.child_count.cmp(&a.child_count));
        if let Some(limit) = limit {
            family.truncate(limit);
        }
        Ok(family)
    }

    /// Descendants with at least `threshold` children, in pre-order.
    pub async fn super_nodes(
        &self,
        root: &NodePath,
        threshold: usize,
    ) -> Result<Vec<NodeSnapshot>> {
        let nodes = self.enumerator.enumerate(root, TraversalOrder::PreOrder).await?;
        Ok(nodes
            .into_iter()
            .filter(|node| node.child_count >= threshold)
            .collect())
    }

    pub async fn all_children_number(&self, root: &NodePath) -> Result<usize> {
        Ok(self.enumerator.enumerate(root, TraversalOrder::Stack).await?.len())
    }

    pub async fn direct_children_number(&self, root: &NodePath) -> Result<usize> {
        Ok(self.client.children(root).await?.len())
    }
}
