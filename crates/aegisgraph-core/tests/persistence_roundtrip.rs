//! Edge-list files: load, save and path policy.

use std::collections::BTreeSet;
use std::path::Path;

use aegisgraph_core::{Error, GraphConfig, GraphStore, TraversalGuard};
use tempfile::tempdir;

fn edge_set(text: &str) -> BTreeSet<(u32, u32)> {
    text.lines()
        .map(|line| {
            let mut parts = line.split(' ').map(|t| t.parse::<u32>().unwrap());
            (parts.next().unwrap(), parts.next().unwrap())
        })
        .collect()
}

#[test]
fn test_save_load_save_is_stable() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");

    let graph = GraphStore::new();
    graph
        .bulk_load(b"5 1\n1 5\n2 3\n3 2\n3 4\n4 4\n7 8\n")
        .unwrap();
    let written = graph.save(&first).unwrap();
    assert_eq!(written, 4);

    let reloaded = GraphStore::new();
    let report = reloaded.load(&first).unwrap();
    assert_eq!(report.edges, 4);
    reloaded.save(&second).unwrap();

    let a = std::fs::read_to_string(&first).unwrap();
    let b = std::fs::read_to_string(&second).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, "1 5\n2 3\n3 4\n7 8\n");
    assert!(edge_set(&a).iter().all(|(u, v)| u < v));
}

#[test]
fn test_load_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "").unwrap();

    let graph = GraphStore::new();
    let report = graph.load(&path).unwrap();
    assert_eq!(report.edges, 0);
    assert!(graph.is_empty());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let graph = GraphStore::new();
    let err = graph.load(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_parent_traversal_rejected_before_io() {
    let graph = GraphStore::new();
    let err = graph.load("../../etc/passwd").unwrap_err();
    assert!(matches!(err, Error::PathRejected(p) if p == Path::new("../../etc/passwd")));
    assert!(matches!(graph.save("a/../b.txt"), Err(Error::PathRejected(_))));
    assert!(matches!(graph.save(""), Err(Error::PathRejected(_))));
}

#[test]
fn test_custom_validator() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("edges.csv");
    let graph = GraphStore::new()
        .with_path_validator(|p: &Path| p.extension().is_some_and(|ext| ext == "txt"));
    assert!(matches!(graph.save(&path), Err(Error::PathRejected(_))));
    assert!(!path.exists());
}

#[test]
fn test_allowed_root_from_config() {
    let root = tempdir().unwrap();
    let outside = tempdir().unwrap();
    let toml = format!("[paths]\nallowed_root = {:?}\n", root.path().display().to_string());
    let config = GraphConfig::from_toml_str(&toml).unwrap();

    let graph = GraphStore::with_config(&config);
    graph.add_edge(1, 2).unwrap();
    assert_eq!(graph.save(root.path().join("ok.txt")).unwrap(), 1);
    assert!(matches!(
        graph.save(outside.path().join("no.txt")),
        Err(Error::PathRejected(_))
    ));

    let guarded = GraphStore::new()
        .with_path_validator(TraversalGuard::new().with_allowed_root(root.path()));
    assert_eq!(guarded.load(root.path().join("ok.txt")).unwrap().edges, 1);
}

#[test]
fn test_overflow_in_file_leaves_graph_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("big.txt");
    std::fs::write(&path, "1 2\n3 2147483648\n").unwrap();

    let graph = GraphStore::new();
    graph.add_edge(10, 11).unwrap();
    let err = graph.load(&path).unwrap_err();
    assert!(matches!(err, Error::IntegerOverflow { offset: 6 }));
    assert_eq!(graph.node_ids(), vec![10, 11]);
}

#[test]
fn test_large_file_loads_with_many_workers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ring.txt");
    let n = 20_000u32;
    let text: String = (0..n).map(|i| format!("{} {}\n", i, (i + 1) % n)).collect();
    std::fs::write(&path, text).unwrap();

    let graph = GraphStore::new();
    let report = graph.load(&path).unwrap();
    assert_eq!(report.edges, n as usize);
    assert_eq!(graph.node_count(), n as usize);
    assert!(graph.node_ids().iter().all(|&id| graph.degree(i64::from(id)) == 2));
}
