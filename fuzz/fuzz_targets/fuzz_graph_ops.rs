//! Fuzz target for interleaved graph mutations and walks.
//!
//! Applies an arbitrary operation sequence and checks after every step that
//! no deleted node is still referenced and walks only follow edges.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_graph_ops
//! ```

#![no_main]

use aegisgraph_core::{GraphStore, WalkEngine};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    AddNode(i64),
    AddEdge(u8, u8),
    Delete(u8),
    Walk {
        start: u8,
        length: u8,
        count: u8,
        seed: u64,
    },
}

fuzz_target!(|ops: Vec<Op>| {
    let graph = GraphStore::new();

    for op in ops.into_iter().take(256) {
        match op {
            Op::AddNode(raw) => {
                let accepted = graph.add_node(raw).is_ok();
                assert_eq!(accepted, (0..=i64::from(i32::MAX)).contains(&raw));
            }
            Op::AddEdge(u, v) => {
                // u8 ids are always in range.
                assert!(graph.add_edge(i64::from(u), i64::from(v)).is_ok());
            }
            Op::Delete(id) => {
                graph.delete_node(i64::from(id));
                for n in graph.node_ids() {
                    assert!(!graph.get_neighbors(i64::from(n)).contains(&u32::from(id)));
                }
            }
            Op::Walk {
                start,
                length,
                count,
                seed,
            } => {
                let walks = WalkEngine::with_seed(seed).random_walk(
                    &graph,
                    u32::from(start),
                    usize::from(length % 32),
                    usize::from(count % 8),
                );
                for walk in &walks {
                    for step in walk.windows(2) {
                        assert!(graph.get_neighbors(i64::from(step[0])).contains(&step[1]));
                    }
                }
            }
        }
    }
});
