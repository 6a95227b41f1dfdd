//! Uniform random-walk sampler.

use std::sync::Arc;

use rand::{RngCore, SeedableRng};

use super::rng::Xoshiro256;
use crate::graph::{NeighborSource, NodeId};

/// A single walk: the start node followed by each sampled neighbor.
pub type Walk = Vec<NodeId>;

/// Random-walk generator owning a private [`Xoshiro256`].
///
/// One engine per thread: `random_walk` takes `&mut self`, so sharing an
/// engine requires external synchronization. Build one per worker instead.
///
/// # Example
///
/// ```rust
/// use aegisgraph_core::{GraphStore, WalkEngine};
///
/// let graph = GraphStore::new();
/// graph.bulk_load(b"1 2\n2 3\n3 1\n").unwrap();
///
/// let mut engine = WalkEngine::with_seed(7);
/// let walks = engine.random_walk(&graph, 1, 4, 2);
/// assert_eq!(walks.len(), 2);
/// assert!(walks.iter().all(|walk| walk.len() == 4 && walk[0] == 1));
/// ```
#[derive(Debug, Clone)]
pub struct WalkEngine {
    rng: Xoshiro256,
}

impl Default for WalkEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WalkEngine {
    /// Creates an engine seeded from OS entropy and the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256::from_entropy_mixed(),
        }
    }

    /// Creates a deterministic engine: equal seeds give equal walks on
    /// equal graphs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256::seed_from_u64(seed),
        }
    }

    /// Creates an engine around an existing generator.
    #[must_use]
    pub fn with_rng(rng: Xoshiro256) -> Self {
        Self { rng }
    }

    /// Advances the generator one step.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    #[inline]
    fn pick(&mut self, len: usize) -> usize {
        // Reason: the remainder is below `len`, which came from a usize.
        #[allow(clippy::cast_possible_truncation)]
        let index = (self.next_u64() % len as u64) as usize;
        index
    }

    /// Generates `count` walks of at most `length` nodes from `start`.
    ///
    /// Each step moves to `neighbors[next_u64() % degree]` of the current
    /// node. A walk stops early at the first node without neighbors.
    /// Returns an empty batch if `start` has no neighbors (including when it
    /// is absent), or if `length` or `count` is zero.
    pub fn random_walk<G>(
        &mut self,
        graph: &G,
        start: NodeId,
        length: usize,
        count: usize,
    ) -> Vec<Walk>
    where
        G: NeighborSource + ?Sized,
    {
        if length == 0 || count == 0 {
            return Vec::new();
        }
        let start_neighbors = graph.neighbors(start);
        if start_neighbors.is_empty() {
            return Vec::new();
        }

        let mut walks = Vec::with_capacity(count);
        for _ in 0..count {
            let mut walk = Vec::with_capacity(length);
            walk.push(start);

            let mut neighbors = Arc::clone(&start_neighbors);
            while walk.len() < length && !neighbors.is_empty() {
                let next = neighbors[self.pick(neighbors.len())];
                walk.push(next);
                if walk.len() < length {
                    neighbors = graph.neighbors(next);
                }
            }
            walks.push(walk);
        }
        walks
    }
}
