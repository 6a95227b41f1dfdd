//! Concurrent adjacency store for undirected graphs.
//!
//! A single reader-writer lock guards the map from node id to neighbor list.
//! Neighbor lists are [`NeighborList`] handles: readers clone the handle
//! under the shared lock and read it afterwards without locking, writers
//! replace or extend lists under the exclusive lock through
//! [`Arc::make_mut`], which copies any list a reader still holds.

use std::collections::hash_map::Entry;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::loader::{parse_edge_list, LoaderConfig};
use super::persistence::{PathValidator, TraversalGuard};
use super::types::{node_id, LoadReport, NeighborList, NodeId};
use crate::config::GraphConfig;
use crate::error::Result;
use crate::walk::{Walk, WalkEngine};

/// Distinct-neighbor count from which `delete_node` prepares rewritten lists
/// in parallel before taking the exclusive lock.
const PARALLEL_DELETE_THRESHOLD: usize = 512;

static EMPTY_NEIGHBORS: LazyLock<NeighborList> = LazyLock::new(|| Arc::new(Vec::new()));

type Adjacency = FxHashMap<NodeId, NeighborList>;

/// Thread-safe in-memory undirected graph.
///
/// A node exists iff it has an entry in the adjacency map, possibly with an
/// empty neighbor list. Repeated `add_edge` calls keep duplicate entries;
/// they are only collapsed when saving.
///
/// # Example
///
/// ```rust
/// use aegisgraph_core::GraphStore;
///
/// let graph = GraphStore::new();
/// graph.add_edge(1, 2).unwrap();
/// graph.add_edge(2, 3).unwrap();
///
/// assert!(graph.has_node(2));
/// assert_eq!(graph.get_neighbors(2).as_slice(), &[1, 3]);
///
/// graph.delete_node(2);
/// assert!(!graph.has_node(2));
/// assert!(graph.get_neighbors(1).is_empty());
/// ```
pub struct GraphStore {
    adjacency: RwLock<Adjacency>,
    loader: LoaderConfig,
    validator: Arc<dyn PathValidator>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self {
            adjacency: RwLock::new(Adjacency::default()),
            loader: LoaderConfig::default(),
            validator: Arc::new(TraversalGuard::default()),
        }
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.node_count())
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl GraphStore {
    /// Creates an empty store with default loader settings and path policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store configured from `config`.
    #[must_use]
    pub fn with_config(config: &GraphConfig) -> Self {
        Self {
            loader: config.loader.clone(),
            validator: Arc::new(TraversalGuard::from_config(&config.paths)),
            ..Self::default()
        }
    }

    /// Builder: set bulk loader tuning.
    #[must_use]
    pub fn with_loader_config(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    /// Builder: set the path policy consulted by `load` and `save`.
    #[must_use]
    pub fn with_path_validator<V>(mut self, validator: V) -> Self
    where
        V: PathValidator + 'static,
    {
        self.validator = Arc::new(validator);
        self
    }

    pub(crate) fn validator(&self) -> &dyn PathValidator {
        self.validator.as_ref()
    }

    // ── Mutation ───────────────────────────────────────────────────────

    /// Ensures `id` exists, with an empty neighbor list if it is new.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidId` if `id` is outside `0..=MAX_NODE_ID`.
    pub fn add_node(&self, id: i64) -> Result<()> {
        let id = node_id(id)?;
        self.adjacency.write().entry(id).or_default();
        Ok(())
    }

    /// Adds the undirected edge between `src` and `dst`.
    ///
    /// Appends `dst` to `src`'s list and `src` to `dst`'s list, creating
    /// either entry if absent. `add_edge(x, x)` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidId` if either endpoint is out of range.
    pub fn add_edge(&self, src: i64, dst: i64) -> Result<()> {
        let src = node_id(src)?;
        let dst = node_id(dst)?;
        if src == dst {
            return Ok(());
        }

        let mut adjacency = self.adjacency.write();
        append_neighbors(&mut adjacency, src, [dst]);
        append_neighbors(&mut adjacency, dst, [src]);
        Ok(())
    }

    /// Removes `id` and every reference to it.
    ///
    /// Returns `false` if the node did not exist (or `id` is out of range).
    /// Replacement lists for high-degree nodes are built in parallel before
    /// the exclusive lock is taken; the removal itself and the installation
    /// of every rewritten list happen in one exclusive section, so once this
    /// returns no reader can see `id` as a node or as anyone's neighbor.
    pub fn delete_node(&self, id: i64) -> bool {
        let Ok(id) = node_id(id) else {
            return false;
        };
        let prepared = self.prepare_removal(id);

        let mut adjacency = self.adjacency.write();
        let Some(removed) = adjacency.remove(&id) else {
            return false;
        };

        let targets = distinct_neighbors(&removed, id);
        let mut reused = 0usize;
        for n in &targets {
            let Some(list) = adjacency.get_mut(n) else {
                continue;
            };
            match prepared.get(n) {
                // The prepared copy keeps `seen` alive, so pointer equality
                // means no writer replaced the list in between.
                Some((seen, fresh)) if Arc::ptr_eq(seen, list) => {
                    *list = Arc::clone(fresh);
                    reused += 1;
                }
                _ => *list = without(list, id),
            }
        }

        debug!(node = id, neighbors = targets.len(), reused, "node deleted");
        true
    }

    /// Builds `id`-free copies of the neighbors' lists outside the lock.
    ///
    /// Returns `neighbor -> (list seen, replacement)`; empty below
    /// `PARALLEL_DELETE_THRESHOLD`, where rewriting under the lock is cheaper.
    fn prepare_removal(&self, id: NodeId) -> FxHashMap<NodeId, (NeighborList, NeighborList)> {
        let handles: Vec<(NodeId, NeighborList)> = {
            let adjacency = self.adjacency.read();
            let Some(own) = adjacency.get(&id) else {
                return FxHashMap::default();
            };
            let targets = distinct_neighbors(own, id);
            if targets.len() < PARALLEL_DELETE_THRESHOLD {
                return FxHashMap::default();
            }
            targets
                .into_iter()
                .filter_map(|n| adjacency.get(&n).map(|list| (n, Arc::clone(list))))
                .collect()
        };

        handles
            .into_par_iter()
            .map(|(n, seen)| {
                let fresh = without(&seen, id);
                (n, (seen, fresh))
            })
            .collect()
    }

    /// Removes every node.
    pub fn clear(&self) {
        self.adjacency.write().clear();
    }

    // ── Lookup ─────────────────────────────────────────────────────────

    /// Returns true if `id` is a node of the graph.
    #[must_use]
    pub fn has_node(&self, id: i64) -> bool {
        node_id(id).is_ok_and(|id| self.adjacency.read().contains_key(&id))
    }

    /// Returns a snapshot of `id`'s neighbors, empty if the node is absent.
    ///
    /// The snapshot is never modified by later mutations.
    #[must_use]
    pub fn get_neighbors(&self, id: i64) -> NeighborList {
        match node_id(id) {
            Ok(id) => self.neighbors_of(id),
            Err(_) => Arc::clone(&EMPTY_NEIGHBORS),
        }
    }

    /// Returns the neighbor-list length of `id` (duplicates included).
    #[must_use]
    pub fn degree(&self, id: i64) -> usize {
        self.get_neighbors(id).len()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.read().len()
    }

    /// Returns the number of undirected edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.read().values().map(|list| list.len()).sum::<usize>() / 2
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.read().is_empty()
    }

    /// Returns all node ids in ascending order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.adjacency.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn neighbors_of(&self, id: NodeId) -> NeighborList {
        self.adjacency
            .read()
            .get(&id)
            .map_or_else(|| Arc::clone(&EMPTY_NEIGHBORS), Arc::clone)
    }

    /// Clones every `(node, list)` handle under the shared lock.
    pub(crate) fn snapshot(&self) -> Vec<(NodeId, NeighborList)> {
        self.adjacency
            .read()
            .iter()
            .map(|(&node, list)| (node, Arc::clone(list)))
            .collect()
    }

    // ── Bulk ingestion ─────────────────────────────────────────────────

    /// Parses `bytes` as an edge list and merges it into the graph.
    ///
    /// Parsing runs on worker threads without touching the store; the
    /// partial results are then merged under one exclusive lock with the
    /// same append routine `add_edge` uses. A malformed token drops the
    /// `(src, dst)` pair it belongs to; later pairs are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `Error::IntegerOverflow` if any token exceeds `MAX_NODE_ID`.
    /// The store is left untouched in that case.
    pub fn bulk_load(&self, bytes: &[u8]) -> Result<LoadReport> {
        let parsed = parse_edge_list(bytes, &self.loader)?;

        {
            let mut adjacency = self.adjacency.write();
            for partial in parsed.partials {
                for (node, neighbors) in partial {
                    append_neighbors(&mut adjacency, node, neighbors);
                }
            }
        }

        let report = parsed.report;
        info!(
            bytes = report.bytes,
            edges = report.edges,
            self_loops = report.self_loops,
            skipped_tokens = report.skipped_tokens,
            skipped_pairs = report.skipped_pairs,
            dangling = report.dangling_token,
            workers = report.workers,
            "edge list merged"
        );
        Ok(report)
    }

    // ── Walks ──────────────────────────────────────────────────────────

    /// Generates `count` random walks of up to `length` nodes from `start`
    /// with a short-lived, entropy-seeded [`WalkEngine`].
    ///
    /// Returns an empty batch if `start` is absent or has no neighbors.
    #[must_use]
    pub fn random_walk(&self, start: i64, length: usize, count: usize) -> Vec<Walk> {
        let Ok(start) = node_id(start) else {
            return Vec::new();
        };
        WalkEngine::new().random_walk(self, start, length, count)
    }
}

/// Appends `neighbors` to `node`'s list, creating the entry if absent.
///
/// The only write path for neighbor lists besides deletion.
fn append_neighbors<I>(adjacency: &mut Adjacency, node: NodeId, neighbors: I)
where
    I: IntoIterator<Item = NodeId>,
{
    match adjacency.entry(node) {
        Entry::Occupied(entry) => Arc::make_mut(entry.into_mut()).extend(neighbors),
        Entry::Vacant(entry) => {
            entry.insert(Arc::new(neighbors.into_iter().collect()));
        }
    }
}

/// Returns the sorted, deduplicated neighbors of `id`, excluding `id`.
fn distinct_neighbors(list: &[NodeId], id: NodeId) -> Vec<NodeId> {
    let mut targets: Vec<NodeId> = list.iter().copied().filter(|&n| n != id).collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}

/// Builds a fresh list with every occurrence of `id` removed.
fn without(list: &NeighborList, id: NodeId) -> NeighborList {
    Arc::new(list.iter().copied().filter(|&n| n != id).collect())
}

// Compile-time check: GraphStore must be shareable across threads.
#[allow(dead_code)]
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphStore>();
};
