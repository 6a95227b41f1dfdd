//! Edge-list files: path policy, memory-mapped load and canonical save.
//!
//! Saved files hold one undirected edge per line as `"<min> <max>\n"`, with
//! no duplicates and no self-loops. Isolated nodes are not represented.
//! The graph lock is never held while a file is read or written.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::store::GraphStore;
use super::types::{canonical_edge, LoadReport, NeighborList, NodeId};
use crate::error::{Error, Result};

/// Policy consulted before any file is opened for load or save.
pub trait PathValidator: Send + Sync {
    /// Returns true if `path` may be opened.
    fn validate(&self, path: &Path) -> bool;
}

impl<F> PathValidator for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn validate(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Path section of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// When set, load and save paths must resolve inside this directory.
    pub allowed_root: Option<PathBuf>,
}

/// Default path policy.
///
/// Rejects empty paths and any path with a `..` component. With an allowed
/// root, the resolved path must also live under that root; a path that does
/// not exist yet (a save target) is resolved through its parent directory.
#[derive(Debug, Clone, Default)]
pub struct TraversalGuard {
    allowed_root: Option<PathBuf>,
}

impl TraversalGuard {
    /// Creates a guard without directory confinement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guard from the `paths` configuration section.
    #[must_use]
    pub fn from_config(config: &PathConfig) -> Self {
        Self {
            allowed_root: config.allowed_root.clone(),
        }
    }

    /// Builder: confine paths to `root`.
    #[must_use]
    pub fn with_allowed_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.allowed_root = Some(root.into());
        self
    }

    fn is_within_root(root: &Path, path: &Path) -> bool {
        let Ok(root) = root.canonicalize() else {
            return false;
        };
        let resolved = path.canonicalize().or_else(|_| {
            let parent = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let name = path.file_name().ok_or(std::io::ErrorKind::InvalidInput)?;
            parent.canonicalize().map(|dir| dir.join(name))
        });
        resolved.is_ok_and(|resolved| resolved.starts_with(&root))
    }
}

impl PathValidator for TraversalGuard {
    fn validate(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            return false;
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return false;
        }
        match &self.allowed_root {
            Some(root) => Self::is_within_root(root, path),
            None => true,
        }
    }
}

impl GraphStore {
    /// Runs the configured path policy on `path`.
    ///
    /// `load` and `save` call this first; callers writing their own output
    /// files next to the graph should too.
    ///
    /// # Errors
    ///
    /// Returns `Error::PathRejected` if the policy refuses `path`.
    pub fn check_path(&self, path: &Path) -> Result<()> {
        if self.validator().validate(path) {
            Ok(())
        } else {
            warn!(path = %path.display(), "path rejected by policy");
            Err(Error::PathRejected(path.to_path_buf()))
        }
    }

    /// Loads an edge-list file and merges it into the graph.
    ///
    /// The file is memory-mapped and handed to [`GraphStore::bulk_load`].
    /// An empty file loads nothing.
    ///
    /// # Errors
    ///
    /// - `Error::PathRejected` if the path policy refuses `path`
    /// - `Error::Io` if the file cannot be opened or mapped
    /// - `Error::IntegerOverflow` if a token exceeds `MAX_NODE_ID`
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        self.check_path(path)?;

        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            info!(path = %path.display(), "empty edge list");
            return Ok(LoadReport::default());
        }

        // SAFETY: `Mmap::map` requires that the file is not truncated or
        // modified while the mapping is alive.
        // - Condition 1: The mapping is read-only and dropped before return.
        // - Condition 2: bulk_load copies every parsed id out of the mapping.
        // Reason: Edge lists are input files, concurrent rewriting is a caller bug.
        let mmap = unsafe { Mmap::map(&file)? };
        let report = self.bulk_load(&mmap)?;
        info!(path = %path.display(), edges = report.edges, "edge list loaded");
        Ok(report)
    }

    /// Saves the graph as a canonical edge list to `path`.
    ///
    /// Returns the number of edges written.
    ///
    /// # Errors
    ///
    /// - `Error::PathRejected` if the path policy refuses `path`
    /// - `Error::Io` if the file cannot be created or written
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        self.check_path(path)?;

        let file = File::create(path)?;
        let written = self.save_to(BufWriter::new(file))?;
        info!(path = %path.display(), edges = written, "edge list saved");
        Ok(written)
    }

    /// Writes the canonical edge list to `sink`.
    ///
    /// Each edge appears once as `(min, max)`; output is sorted ascending.
    /// Returns the number of edges written.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the sink fails.
    pub fn save_to<W: Write>(&self, mut sink: W) -> Result<usize> {
        let edges = canonical_edges(&self.snapshot());
        for (u, v) in &edges {
            writeln!(sink, "{u} {v}")?;
        }
        sink.flush()?;
        Ok(edges.len())
    }
}

/// Collapses adjacency lists into the set of canonical undirected edges.
fn canonical_edges(snapshot: &[(NodeId, NeighborList)]) -> BTreeSet<(NodeId, NodeId)> {
    let mut edges = BTreeSet::new();
    for (node, neighbors) in snapshot {
        for &neighbor in neighbors.iter() {
            if neighbor != *node {
                edges.insert(canonical_edge(*node, neighbor));
            }
        }
    }
    edges
}
