//! Concurrent in-memory undirected graph.
//!
//! Provides the adjacency store, the parallel edge-list loader and the
//! edge-list file format. Everything here works without a walk engine;
//! sampling lives in [`crate::walk`].
//!
//! # Example
//!
//! ```rust
//! use aegisgraph_core::graph::GraphStore;
//!
//! let graph = GraphStore::new();
//! let report = graph.bulk_load(b"1 2\n2 3\n1 3\n").unwrap();
//! assert_eq!(report.edges, 3);
//!
//! let mut out = Vec::new();
//! graph.save_to(&mut out).unwrap();
//! assert_eq!(out, b"1 2\n1 3\n2 3\n");
//! ```

mod loader;
mod persistence;
mod source;
mod store;
mod types;


pub use loader::{LoaderConfig, ThreadConfig, DEFAULT_MIN_CHUNK_BYTES};
pub use persistence::{PathConfig, PathValidator, TraversalGuard};
pub use source::NeighborSource;
pub use store::GraphStore;
pub use types::{canonical_edge, node_id, LoadReport, NeighborList, NodeId, MAX_NODE_ID};
