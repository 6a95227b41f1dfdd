//! Parallel edge-list parser.
//!
//! Input is a flat stream of whitespace-separated unsigned decimal tokens,
//! consumed pairwise as `(src, dst)`. A malformed token keeps its slot in the
//! stream, so it drops exactly the pair it belongs to and every later pair
//! stays aligned with the input. Parsing runs in three phases:
//!
//! 1. the buffer is cut into chunks at whitespace boundaries and each chunk
//!    is scanned into tokens on the rayon pool,
//! 2. the token stream is split into disjoint pair ranges and every worker
//!    folds its range into a private [`PartialAdjacency`],
//! 3. the caller merges the partial maps into the store under one exclusive
//!    lock (see [`GraphStore::bulk_load`](super::GraphStore::bulk_load)).
//!
//! Nothing is shared between workers during phases 1 and 2, and an overflow
//! in any chunk aborts before phase 3 starts.

use std::ops::Range;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{LoadReport, NodeId, MAX_NODE_ID};
use crate::error::{Error, Result};

/// Default minimum number of bytes handed to a single scan worker.
pub const DEFAULT_MIN_CHUNK_BYTES: usize = 64 * 1024;

/// Worker-private adjacency built during phase 2.
pub(crate) type PartialAdjacency = FxHashMap<NodeId, Vec<NodeId>>;

/// Worker count configuration for bulk loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadConfig {
    /// One worker per available hardware thread.
    #[default]
    Auto,
    /// Use a fixed number of workers.
    Fixed(usize),
}

impl ThreadConfig {
    /// Returns the effective number of workers, never less than one.
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        match self {
            ThreadConfig::Auto => std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
            ThreadConfig::Fixed(n) => (*n).max(1),
        }
    }
}

/// Tuning for [`GraphStore::bulk_load`](super::GraphStore::bulk_load).
///
/// Worker count is a throughput knob only: the merged adjacency is the same
/// for any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Scan workers.
    pub workers: ThreadConfig,
    /// Chunks smaller than this are not split further.
    pub min_chunk_bytes: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            workers: ThreadConfig::Auto,
            min_chunk_bytes: DEFAULT_MIN_CHUNK_BYTES,
        }
    }
}

impl LoaderConfig {
    /// Creates a config with a fixed worker count.
    #[must_use]
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: ThreadConfig::Fixed(workers),
            ..Self::default()
        }
    }

    /// Builder: set minimum chunk size.
    #[must_use]
    pub fn with_min_chunk_bytes(mut self, min_chunk_bytes: usize) -> Self {
        self.min_chunk_bytes = min_chunk_bytes;
        self
    }
}

/// Output of phases 1 and 2, ready to be merged.
#[derive(Debug, Default)]
pub(crate) struct ParsedEdgeList {
    pub partials: Vec<PartialAdjacency>,
    pub report: LoadReport,
}

/// A scanned token: `None` marks a malformed token that still occupies its
/// position in the pairing.
type TokenSlot = Option<NodeId>;

#[derive(Debug, Default)]
struct ScannedChunk {
    tokens: Vec<TokenSlot>,
    skipped: usize,
}

/// Token separators: space, tab, LF, VT, FF, CR.
#[inline]
fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Cuts `bytes` into at most `workers` ranges, each ending on a separator
/// (or at the end of input), so no token straddles two ranges.
pub(crate) fn split_chunks(bytes: &[u8], workers: usize, min_chunk_bytes: usize) -> Vec<Range<usize>> {
    let len = bytes.len();
    if len == 0 {
        return Vec::new();
    }

    let max_by_size = len.div_ceil(min_chunk_bytes.max(1));
    let workers = workers.clamp(1, max_by_size.max(1));
    let target = len.div_ceil(workers);

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    while start < len {
        let mut end = start.saturating_add(target).min(len);
        while end < len && !is_separator(bytes[end]) {
            end += 1;
        }
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Scans one chunk into node ids.
///
/// `base` is the chunk's offset in the full buffer, used for error reporting.
/// Digits are accumulated with an overflow check against [`MAX_NODE_ID`];
/// a token holding any non-digit byte is recorded as `None`.
fn scan_chunk(chunk: &[u8], base: usize) -> Result<ScannedChunk> {
    let len = chunk.len();
    let mut scanned = ScannedChunk {
        tokens: Vec::with_capacity(len / 4),
        skipped: 0,
    };
    let mut i = 0;

    while i < len {
        while i < len && is_separator(chunk[i]) {
            i += 1;
        }
        if i == len {
            break;
        }

        let start = i;
        let mut value: NodeId = 0;
        while i < len && chunk[i].is_ascii_digit() {
            let digit = NodeId::from(chunk[i] - b'0');
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .filter(|&v| v <= MAX_NODE_ID)
                .ok_or(Error::IntegerOverflow {
                    offset: base + start,
                })?;
            i += 1;
        }

        if i == start || (i < len && !is_separator(chunk[i])) {
            while i < len && !is_separator(chunk[i]) {
                i += 1;
            }
            scanned.skipped += 1;
            scanned.tokens.push(None);
            continue;
        }
        scanned.tokens.push(Some(value));
    }

    Ok(scanned)
}

/// Pair counts from one worker's range.
#[derive(Debug, Default, Clone, Copy)]
struct PairCounts {
    edges: usize,
    self_loops: usize,
    skipped_pairs: usize,
}

/// Folds `(src, dst)` pairs into a private adjacency map.
///
/// A pair with a malformed side is dropped whole.
fn build_partial(pairs: &[TokenSlot]) -> (PartialAdjacency, PairCounts) {
    let mut partial = PartialAdjacency::default();
    let mut counts = PairCounts::default();

    for pair in pairs.chunks_exact(2) {
        let (Some(src), Some(dst)) = (pair[0], pair[1]) else {
            counts.skipped_pairs += 1;
            continue;
        };
        if src == dst {
            counts.self_loops += 1;
            continue;
        }
        partial.entry(src).or_default().push(dst);
        partial.entry(dst).or_default().push(src);
        counts.edges += 1;
    }

    (partial, counts)
}

/// Runs phases 1 and 2 over `bytes`.
///
/// Partial maps are returned in input order, so merging them in sequence
/// yields the same neighbor order as replaying the edges one by one.
pub(crate) fn parse_edge_list(bytes: &[u8], config: &LoaderConfig) -> Result<ParsedEdgeList> {
    let ranges = split_chunks(
        bytes,
        config.workers.effective_threads(),
        config.min_chunk_bytes,
    );
    if ranges.is_empty() {
        return Ok(ParsedEdgeList::default());
    }
    let workers = ranges.len();

    let scanned = ranges
        .par_iter()
        .map(|range| scan_chunk(&bytes[range.clone()], range.start))
        .collect::<Result<Vec<_>>>()
        .inspect_err(|err| warn!(error = %err, "edge list scan aborted"))?;

    let skipped_tokens = scanned.iter().map(|chunk| chunk.skipped).sum();
    let tokens: Vec<TokenSlot> = scanned.into_iter().flat_map(|chunk| chunk.tokens).collect();
    let dangling_token = tokens.len() % 2 == 1;
    let paired = &tokens[..tokens.len() - tokens.len() % 2];

    let pairs_per_worker = (paired.len() / 2).div_ceil(workers).max(1);
    let built: Vec<(PartialAdjacency, PairCounts)> = paired
        .par_chunks(pairs_per_worker * 2)
        .map(build_partial)
        .collect();

    let mut report = LoadReport {
        bytes: bytes.len(),
        skipped_tokens,
        dangling_token,
        workers,
        ..LoadReport::default()
    };
    let mut partials = Vec::with_capacity(built.len());
    for (partial, counts) in built {
        report.edges += counts.edges;
        report.self_loops += counts.self_loops;
        report.skipped_pairs += counts.skipped_pairs;
        partials.push(partial);
    }

    debug!(
        bytes = report.bytes,
        workers,
        tokens = tokens.len(),
        skipped = report.skipped_tokens,
        "edge list scanned"
    );

    Ok(ParsedEdgeList { partials, report })
}
