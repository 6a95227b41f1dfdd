//! # `AegisGraph` Core
//!
//! Concurrent in-memory undirected graph with random-walk sampling.
//!
//! `AegisGraph` keeps an adjacency map behind one reader-writer lock and
//! hands out copy-on-write neighbor-list snapshots, so lookups and walks
//! never block on each other and never observe a half-applied mutation.
//!
//! ## Features
//!
//! - **Snapshot reads**: neighbor lists are shared handles, unaffected by later writes
//! - **Parallel bulk load**: memory-mapped edge lists parsed on the rayon pool
//! - **Canonical save**: deduplicated `(min, max)` edge list, sorted
//! - **Fast walks**: xoshiro-style generator seeded through a CSPRNG
//! - **Walk corpora**: reproducible node2vec-style corpora from a base seed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aegisgraph_core::{generate_corpus, GraphConfig, GraphStore, WalkEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GraphConfig::load(None)?;
//!     let graph = GraphStore::with_config(&config);
//!
//!     let report = graph.load("edges.txt")?;
//!     println!("{} edges, {} skipped tokens", report.edges, report.skipped_tokens);
//!
//!     // A batch of walks from one node
//!     let walks = WalkEngine::with_seed(42).random_walk(&graph, 1, 10, 5);
//!
//!     // One corpus over every node
//!     let corpus = generate_corpus(&graph, &graph.node_ids(), &config.walk);
//!
//!     graph.save("edges.dedup.txt")?;
//!     # let _ = (walks, corpus);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_lossless,
        clippy::uninlined_format_args
    )
)]

pub mod config;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod graph;
pub mod walk;

pub use config::GraphConfig;
pub use error::{Error, Result};
pub use graph::{
    GraphStore, LoadReport, LoaderConfig, NeighborList, NeighborSource, NodeId, PathConfig,
    PathValidator, ThreadConfig, TraversalGuard, MAX_NODE_ID,
};
pub use walk::{generate_corpus, Walk, WalkConfig, WalkCorpus, WalkEngine, Xoshiro256};
