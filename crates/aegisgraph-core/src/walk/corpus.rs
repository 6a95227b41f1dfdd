//! Parallel walk corpus generation (node2vec-style input).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::{Walk, WalkEngine};
use crate::graph::{NeighborSource, NodeId};

/// Walks for many start nodes, grouped by start.
pub type WalkCorpus = Vec<Walk>;

/// Default walk length in nodes.
pub const DEFAULT_WALK_LENGTH: usize = 80;

/// Default walks per start node.
pub const DEFAULT_WALKS_PER_NODE: usize = 10;

/// Walk section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Maximum nodes per walk.
    pub length: usize,
    /// Walks per start node.
    pub count: usize,
    /// Base seed; `None` seeds every worker from entropy.
    pub seed: Option<u64>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_WALK_LENGTH,
            count: DEFAULT_WALKS_PER_NODE,
            seed: None,
        }
    }
}

impl WalkConfig {
    /// Creates a config with the given length and count.
    #[must_use]
    pub fn new(length: usize, count: usize) -> Self {
        Self {
            length,
            count,
            seed: None,
        }
    }

    /// Builder: fix the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Generates `config.count` walks from every node in `starts`, in parallel.
///
/// Output is grouped by start node in the order of `starts`. Each rayon task
/// owns its engine. With a base seed, the engine for `starts[i]` is seeded
/// with `seed + i`, so the corpus is reproducible regardless of thread count.
#[must_use]
pub fn generate_corpus<G>(graph: &G, starts: &[NodeId], config: &WalkConfig) -> WalkCorpus
where
    G: NeighborSource + Sync + ?Sized,
{
    let batches: Vec<Vec<Walk>> = match config.seed {
        Some(seed) => starts
            .par_iter()
            .enumerate()
            .map(|(i, &start)| {
                WalkEngine::with_seed(seed.wrapping_add(i as u64)).random_walk(
                    graph,
                    start,
                    config.length,
                    config.count,
                )
            })
            .collect(),
        None => starts
            .par_iter()
            .map_init(WalkEngine::new, |engine, &start| {
                engine.random_walk(graph, start, config.length, config.count)
            })
            .collect(),
    };

    let corpus: WalkCorpus = batches.into_iter().flatten().collect();
    debug!(
        starts = starts.len(),
        walks = corpus.len(),
        length = config.length,
        "walk corpus generated"
    );
    corpus
}
