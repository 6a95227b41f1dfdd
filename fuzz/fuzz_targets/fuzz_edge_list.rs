//! Fuzz target for the edge-list loader.
//!
//! Feeds arbitrary bytes to `bulk_load` under several worker counts and
//! checks that the outcome does not depend on the worker count, that an
//! overflow leaves the store empty, and that the loaded adjacency is
//! symmetric.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_edge_list
//! ```

#![no_main]

use aegisgraph_core::{GraphStore, LoaderConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep iterations fast
    if data.len() > 64 * 1024 {
        return;
    }

    let reference = GraphStore::new().with_loader_config(LoaderConfig::with_workers(1));
    let outcome = reference.bulk_load(data);

    for workers in [2, 5] {
        let graph = GraphStore::new()
            .with_loader_config(LoaderConfig::with_workers(workers).with_min_chunk_bytes(1));
        match (graph.bulk_load(data), &outcome) {
            (Ok(report), Ok(expected)) => {
                assert_eq!(report.edges, expected.edges);
                assert_eq!(graph.node_ids(), reference.node_ids());
                for id in reference.node_ids() {
                    let id = i64::from(id);
                    assert_eq!(graph.get_neighbors(id), reference.get_neighbors(id));
                }
            }
            (Err(_), Err(_)) => assert!(graph.is_empty()),
            (got, expected) => panic!("worker count changed outcome: {got:?} vs {expected:?}"),
        }
    }

    for u in reference.node_ids() {
        for &v in reference.get_neighbors(i64::from(u)).iter() {
            assert!(reference.get_neighbors(i64::from(v)).contains(&u));
        }
    }
});
