mod common;

use std::collections::BTreeSet;

use common::{FakeTree, abs};
use keeper_core::KeeperError;
use keeper_core::family::RankedFamilyFinder;
use keeper_core::subtree::{SiblingOrder, SubtreeEnumerator, TraversalOrder};

fn sample() -> FakeTree {
    FakeTree::with_paths(&[
        "/p/b/x",
        "/p/b/y",
        "/p/a/1",
        "/p/a/2",
        "/p/a/3",
        "/p/c",
        "/p/a/2/deep",
    ])
}

#[tokio::test]
async fn test_every_descendant_reported_once() {
    let tree = sample();
    let nodes = SubtreeEnumerator::new(&tree, 4)
        .enumerate(&abs("/p"), TraversalOrder::Stack)
        .await
        .unwrap();

    let paths: Vec<String> = nodes.iter().map(|n| n.path.to_string()).collect();
    let unique: BTreeSet<&String> = paths.iter().collect();
    assert_eq!(paths.len(), 9);
    assert_eq!(unique.len(), paths.len());
    assert!(!paths.contains(&"/p".to_string()));
}

#[tokio::test]
async fn test_each_node_listed_once() {
    let tree = sample();
    SubtreeEnumerator::new(&tree, 4)
        .enumerate(&abs("/p"), TraversalOrder::Stack)
        .await
        .unwrap();

    // the root plus its nine descendants
    assert_eq!(tree.listings(), 10);
}

#[tokio::test]
async fn test_output_does_not_depend_on_concurrency() {
    let tree = sample();
    let serial = SubtreeEnumerator::new(&tree, 1)
        .enumerate(&abs("/p"), TraversalOrder::Stack)
        .await
        .unwrap();
    let parallel = SubtreeEnumerator::new(&tree, 16)
        .enumerate(&abs("/p"), TraversalOrder::Stack)
        .await
        .unwrap();

    assert_eq!(serial, parallel);
}

#[tokio::test]
async fn test_preorder_lists_parent_before_children() {
    let tree = sample();
    let nodes = SubtreeEnumerator::new(&tree, 2)
        .enumerate(&abs("/p"), TraversalOrder::PreOrder)
        .await
        .unwrap();

    let paths: Vec<String> = nodes.iter().map(|n| n.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "/p/a", "/p/a/1", "/p/a/2", "/p/a/2/deep", "/p/a/3", "/p/b", "/p/b/x", "/p/b/y", "/p/c",
        ]
    );
}

#[tokio::test]
async fn test_store_order_keeps_creation_order() {
    let tree = sample();
    let nodes = SubtreeEnumerator::new(&tree, 2)
        .with_sibling_order(SiblingOrder::Store)
        .enumerate(&abs("/p"), TraversalOrder::PreOrder)
        .await
        .unwrap();

    assert_eq!(nodes[0].path, abs("/p/b"));
}

#[tokio::test]
async fn test_lexical_order_compares_bytes_not_numbers() {
    let tree = FakeTree::with_paths(&["/n/node9", "/n/node10", "/n/node2"]);
    let nodes = SubtreeEnumerator::new(&tree, 2)
        .enumerate(&abs("/n"), TraversalOrder::PreOrder)
        .await
        .unwrap();

    let names: Vec<&str> = nodes.iter().filter_map(|n| n.path.name()).collect();
    assert_eq!(names, vec!["node10", "node2", "node9"]);
}

#[tokio::test]
async fn test_missing_root_is_not_found() {
    let tree = sample();
    let err = SubtreeEnumerator::new(&tree, 2)
        .enumerate(&abs("/nope"), TraversalOrder::Stack)
        .await
        .unwrap_err();

    assert_eq!(err, KeeperError::path_not_found("/nope"));
}

#[tokio::test]
async fn test_leaf_root_has_no_descendants() {
    let tree = sample();
    let nodes = SubtreeEnumerator::new(&tree, 2)
        .enumerate(&abs("/p/c"), TraversalOrder::Stack)
        .await
        .unwrap();

    assert!(nodes.is_empty());
}

#[tokio::test]
async fn test_big_family_is_sorted_and_limit_is_prefix() {
    let tree = sample();
    let finder = RankedFamilyFinder::new(&tree, 4, SiblingOrder::Lexical);

    let full = finder.big_family(&abs("/p"), None).await.unwrap();
    assert!(full.windows(2).all(|w| w[0].child_count >= w[1].child_count));
    assert_eq!(full[0].path, abs("/p/a"));
    assert_eq!(full[0].child_count, 3);

    let top = finder.big_family(&abs("/p"), Some(3)).await.unwrap();
    assert_eq!(top, full[..3].to_vec());
}

#[tokio::test]
async fn test_super_nodes_are_threshold_subset() {
    let tree = sample();
    let finder = RankedFamilyFinder::new(&tree, 4, SiblingOrder::Lexical);

    let supers = finder.super_nodes(&abs("/p"), 2).await.unwrap();
    let paths: Vec<String> = supers.iter().map(|n| n.path.to_string()).collect();
    assert_eq!(paths, vec!["/p/a", "/p/b"]);

    let everything = finder.super_nodes(&abs("/p"), 0).await.unwrap();
    assert_eq!(everything.len(), 9);
}

#[tokio::test]
async fn test_children_counts() {
    let tree = sample();
    let finder = RankedFamilyFinder::new(&tree, 4, SiblingOrder::Lexical);

    assert_eq!(finder.direct_children_number(&abs("/p")).await.unwrap(), 3);
    assert_eq!(finder.all_children_number(&abs("/p")).await.unwrap(), 9);
}
