//! Random-walk sampling over a [`NeighborSource`](crate::graph::NeighborSource).
//!
//! [`WalkEngine`] produces batches of uniform random walks from one start
//! node; [`generate_corpus`] fans that out over many start nodes with one
//! engine per worker.

mod corpus;
mod engine;
mod rng;

#[cfg(test)]
mod engine_tests;

pub use corpus::{
    generate_corpus, WalkConfig, WalkCorpus, DEFAULT_WALKS_PER_NODE, DEFAULT_WALK_LENGTH,
};
pub use engine::{Walk, WalkEngine};
pub use rng::Xoshiro256;
