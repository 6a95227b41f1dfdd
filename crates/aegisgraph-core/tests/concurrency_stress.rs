//! Multi-threaded stress over shared node ids.
//!
//! Writers add and delete edges on a small id space while readers take
//! neighbor snapshots and walk. After all threads join, the adjacency must
//! be symmetric and free of dangling references. Writers on disjoint id
//! ranges must end in exactly the state of a sequential replay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use aegisgraph_core::{GraphStore, WalkEngine};

const ID_SPACE: i64 = 64;
const WRITER_OPS: usize = 4_000;

fn lcg(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    *state >> 33
}

fn multiset(list: &[u32]) -> Vec<u32> {
    let mut v = list.to_vec();
    v.sort_unstable();
    v
}

#[test]
fn test_concurrent_mutation_keeps_graph_consistent() {
    let graph = Arc::new(GraphStore::new());
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4u64)
        .map(|t| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                let mut rng = 0x9E37_79B9 ^ t;
                for _ in 0..WRITER_OPS {
                    let a = (lcg(&mut rng) % ID_SPACE as u64) as i64;
                    let b = (lcg(&mut rng) % ID_SPACE as u64) as i64;
                    if lcg(&mut rng) % 10 == 0 {
                        graph.delete_node(a);
                    } else {
                        graph.add_edge(a, b).unwrap();
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..3u64)
        .map(|t| {
            let graph = Arc::clone(&graph);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut engine = WalkEngine::with_seed(t);
                let mut id = 0i64;
                while !done.load(Ordering::Relaxed) {
                    let snapshot = graph.get_neighbors(id);
                    let copy = snapshot.to_vec();
                    let _ = engine.random_walk(&*graph, id as u32, 8, 2);
                    // A held snapshot never changes.
                    assert_eq!(*snapshot, copy);
                    id = (id + 1) % ID_SPACE;
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }

    for u in graph.node_ids() {
        let u = i64::from(u);
        for &v in graph.get_neighbors(u).iter() {
            let v = i64::from(v);
            assert_ne!(u, v, "self-loop stored at {u}");
            assert!(graph.has_node(v), "{u} references deleted node {v}");
            let forward = graph.get_neighbors(u).iter().filter(|&&n| i64::from(n) == v).count();
            let backward = graph.get_neighbors(v).iter().filter(|&&n| i64::from(n) == u).count();
            assert_eq!(forward, backward, "asymmetric edge {u} - {v}");
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteOp {
    AddEdge(i64, i64),
    Delete(i64),
}

/// Deterministic operations confined to ids `base..base + ID_SPACE`.
fn writer_ops(base: i64, seed: u64) -> Vec<WriteOp> {
    let mut rng = seed;
    (0..WRITER_OPS)
        .map(|_| {
            let a = base + (lcg(&mut rng) % ID_SPACE as u64) as i64;
            let b = base + (lcg(&mut rng) % ID_SPACE as u64) as i64;
            if lcg(&mut rng) % 10 == 0 {
                WriteOp::Delete(a)
            } else {
                WriteOp::AddEdge(a, b)
            }
        })
        .collect()
}

fn apply(graph: &GraphStore, op: WriteOp) {
    match op {
        WriteOp::AddEdge(a, b) => graph.add_edge(a, b).unwrap(),
        WriteOp::Delete(a) => {
            graph.delete_node(a);
        }
    }
}

#[test]
fn test_disjoint_writers_match_sequential_replay() {
    let scripts: Vec<Vec<WriteOp>> = (0..4u64)
        .map(|t| writer_ops(t as i64 * 1_000, 0x5EED ^ t))
        .collect();

    let graph = Arc::new(GraphStore::new());
    let writers: Vec<_> = scripts
        .iter()
        .cloned()
        .map(|script| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for op in script {
                    apply(&graph, op);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let replay = GraphStore::new();
    for op in scripts.into_iter().flatten() {
        apply(&replay, op);
    }

    assert_eq!(graph.node_ids(), replay.node_ids());
    for id in replay.node_ids() {
        let id = i64::from(id);
        assert_eq!(
            multiset(&graph.get_neighbors(id)),
            multiset(&replay.get_neighbors(id)),
            "node {id}"
        );
    }
}

#[test]
fn test_concurrent_delete_of_hub_is_atomic() {
    let graph = Arc::new(GraphStore::new());
    for leaf in 1..=1_000 {
        graph.add_edge(0, leaf).unwrap();
    }
    let before: Vec<Vec<u32>> = (1..=1_000).map(|leaf| multiset(&graph.get_neighbors(leaf))).collect();
    assert!(before.iter().all(|list| *list == vec![0u32]));

    let adders: Vec<_> = (0..2i64)
        .map(|t| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for leaf in 1..=1_000 {
                    graph.add_edge(leaf, 5_000 + t).unwrap();
                }
            })
        })
        .collect();
    let deleter = {
        let graph = Arc::clone(&graph);
        thread::spawn(move || graph.delete_node(0))
    };

    assert!(deleter.join().unwrap());
    for adder in adders {
        adder.join().unwrap();
    }

    assert!(!graph.has_node(0));
    for leaf in 1..=1_000 {
        assert_eq!(multiset(&graph.get_neighbors(leaf)), vec![5_000, 5_001]);
    }
}

#[test]
fn test_concurrent_bulk_loads_merge_everything() {
    let graph = Arc::new(GraphStore::new());
    let loaders: Vec<_> = (0..4u32)
        .map(|t| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                let input: String = (0..250u32)
                    .map(|i| format!("{} {}\n", t * 1_000 + i, t * 1_000 + i + 1))
                    .collect();
                graph.bulk_load(input.as_bytes()).unwrap()
            })
        })
        .collect();

    let edges: usize = loaders.into_iter().map(|h| h.join().unwrap().edges).sum();
    assert_eq!(edges, 1_000);
    assert_eq!(graph.edge_count(), 1_000);
}
