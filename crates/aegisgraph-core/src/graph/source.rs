//! Neighbor lookup seam between graph storage and walk sampling.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use super::store::GraphStore;
use super::types::{NeighborList, NodeId};

/// Anything a walk can be sampled on.
///
/// Implementations return a snapshot handle; callers may keep it while the
/// underlying graph changes.
pub trait NeighborSource {
    /// Returns the neighbors of `node`, empty if the node is absent.
    fn neighbors(&self, node: NodeId) -> NeighborList;
}

impl NeighborSource for GraphStore {
    #[inline]
    fn neighbors(&self, node: NodeId) -> NeighborList {
        self.neighbors_of(node)
    }
}

/// Plain adjacency maps, mostly useful for tests and offline tooling.
impl<S: BuildHasher> NeighborSource for HashMap<NodeId, NeighborList, S> {
    fn neighbors(&self, node: NodeId) -> NeighborList {
        self.get(&node)
            .map_or_else(|| Arc::new(Vec::new()), Arc::clone)
    }
}

impl<T: NeighborSource + ?Sized> NeighborSource for Arc<T> {
    #[inline]
    fn neighbors(&self, node: NodeId) -> NeighborList {
        (**self).neighbors(node)
    }
}
