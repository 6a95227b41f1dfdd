//! Tests for WalkEngine.

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;

use super::engine::WalkEngine;
use super::rng::Xoshiro256;
use crate::graph::{GraphStore, NeighborList, NeighborSource, NodeId};

/// Path 1-2-3 plus an isolated node 9.
fn path_graph() -> HashMap<NodeId, NeighborList> {
    let mut map = HashMap::new();
    map.insert(1, Arc::new(vec![2]));
    map.insert(2, Arc::new(vec![1, 3]));
    map.insert(3, Arc::new(vec![2]));
    map.insert(9, Arc::new(vec![]));
    map
}

fn assert_valid_walk<G: NeighborSource>(graph: &G, walk: &[NodeId]) {
    for step in walk.windows(2) {
        assert!(
            graph.neighbors(step[0]).contains(&step[1]),
            "{} -> {} is not an edge",
            step[0],
            step[1]
        );
    }
}

#[test]
fn test_walks_follow_edges() {
    let graph = path_graph();
    let mut engine = WalkEngine::with_seed(42);
    let walks = engine.random_walk(&graph, 2, 10, 25);

    assert_eq!(walks.len(), 25);
    for walk in &walks {
        assert_eq!(walk.len(), 10);
        assert_eq!(walk[0], 2);
        assert_valid_walk(&graph, walk);
    }
}

#[test]
fn test_dead_start_gives_empty_batch() {
    let graph = path_graph();
    let mut engine = WalkEngine::with_seed(1);
    assert!(engine.random_walk(&graph, 9, 5, 3).is_empty());
    assert!(engine.random_walk(&graph, 404, 5, 3).is_empty());
}

#[test]
fn test_zero_length_or_count_gives_empty_batch() {
    let graph = path_graph();
    let mut engine = WalkEngine::with_seed(1);
    assert!(engine.random_walk(&graph, 1, 0, 3).is_empty());
    assert!(engine.random_walk(&graph, 1, 5, 0).is_empty());
}

#[test]
fn test_length_one_is_just_the_start() {
    let graph = path_graph();
    let mut engine = WalkEngine::with_seed(3);
    let walks = engine.random_walk(&graph, 1, 1, 4);
    assert_eq!(walks, vec![vec![1]; 4]);
}

#[test]
fn test_walk_stops_at_dead_end() {
    // 1 -> 2 only; 2 has no outgoing entries.
    let mut graph: HashMap<NodeId, NeighborList> = HashMap::new();
    graph.insert(1, Arc::new(vec![2]));
    graph.insert(2, Arc::new(vec![]));

    let mut engine = WalkEngine::with_seed(5);
    let walks = engine.random_walk(&graph, 1, 10, 2);
    assert_eq!(walks, vec![vec![1, 2], vec![1, 2]]);
}

#[test]
fn test_same_seed_same_walks() {
    let graph = GraphStore::new();
    graph
        .bulk_load(b"1 2 1 3 1 4 2 3 3 4 4 5 5 6 6 1")
        .unwrap();

    let a = WalkEngine::with_seed(99).random_walk(&graph, 1, 20, 8);
    let b = WalkEngine::with_seed(99).random_walk(&graph, 1, 20, 8);
    let c = WalkEngine::with_seed(100).random_walk(&graph, 1, 20, 8);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_every_neighbor_is_reachable() {
    let graph = GraphStore::new();
    graph.bulk_load(b"0 1 0 2 0 3 0 4").unwrap();

    let mut engine = WalkEngine::with_seed(7);
    let mut seen: Vec<NodeId> = engine
        .random_walk(&graph, 0, 2, 400)
        .into_iter()
        .map(|walk| walk[1])
        .collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

#[test]
fn test_walk_over_store_snapshot_during_mutation() {
    let graph = GraphStore::new();
    graph.bulk_load(b"1 2 2 3 3 1").unwrap();
    let mut engine = WalkEngine::with_seed(11);
    let before = engine.random_walk(&graph, 1, 6, 5);
    graph.delete_node(3);
    let after = engine.random_walk(&graph, 1, 6, 5);

    assert!(before.iter().all(|w| w.len() == 6));
    assert!(after.iter().flatten().all(|&n| n != 3));
}

#[test]
fn test_entropy_engines_differ() {
    let mut a = WalkEngine::new();
    let mut b = WalkEngine::new();
    let xs: Vec<u64> = (0..4).map(|_| a.next_u64()).collect();
    let ys: Vec<u64> = (0..4).map(|_| b.next_u64()).collect();
    assert_ne!(xs, ys);
}

#[test]
fn test_with_rng_matches_with_seed() {
    let graph = path_graph();
    let a = WalkEngine::with_rng(Xoshiro256::seed_from_u64(8)).random_walk(&graph, 2, 12, 6);
    let b = WalkEngine::with_seed(8).random_walk(&graph, 2, 12, 6);
    assert_eq!(a, b);
}
