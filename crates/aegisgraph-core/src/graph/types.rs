//! Node identifiers and edge helpers shared by the store, loader and writer.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};

/// Stored node identifier.
pub type NodeId = u32;

/// Largest accepted node id (`i32::MAX`).
// Reason: i32::MAX is positive, the cast is lossless.
#[allow(clippy::cast_sign_loss)]
pub const MAX_NODE_ID: NodeId = i32::MAX as NodeId;

/// Shared, immutable-once-published neighbor list.
///
/// Readers clone the handle under the shared lock and then read without
/// locking. Writers go through [`Arc::make_mut`] under the exclusive lock,
/// which clones the list whenever any reader still holds it.
pub type NeighborList = Arc<Vec<NodeId>>;

/// Validates a host-facing id and narrows it to a [`NodeId`].
///
/// # Errors
///
/// Returns `Error::InvalidId` if `raw` is negative or above [`MAX_NODE_ID`].
///
/// # Example
///
/// ```rust
/// use aegisgraph_core::graph::{node_id, MAX_NODE_ID};
///
/// assert_eq!(node_id(42).unwrap(), 42);
/// assert_eq!(node_id(i64::from(MAX_NODE_ID)).unwrap(), MAX_NODE_ID);
/// assert!(node_id(-1).is_err());
/// assert!(node_id(i64::from(MAX_NODE_ID) + 1).is_err());
/// ```
#[inline]
pub fn node_id(raw: i64) -> Result<NodeId> {
    NodeId::try_from(raw)
        .ok()
        .filter(|&id| id <= MAX_NODE_ID)
        .ok_or(Error::InvalidId(raw))
}

/// Orders an undirected edge as `(min, max)`.
#[inline]
#[must_use]
pub fn canonical_edge(u: NodeId, v: NodeId) -> (NodeId, NodeId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Summary of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Bytes scanned.
    pub bytes: usize,
    /// Undirected edges merged into the store.
    pub edges: usize,
    /// `(x, x)` pairs dropped.
    pub self_loops: usize,
    /// Tokens containing a non-digit byte.
    pub skipped_tokens: usize,
    /// `(src, dst)` pairs dropped because a side was malformed.
    pub skipped_pairs: usize,
    /// Whether an odd trailing token was dropped.
    pub dangling_token: bool,
    /// Number of scan workers used.
    pub workers: usize,
}
