//! `AegisGraph` CLI - load, inspect, deduplicate and sample edge-list graphs.
//!
//! # Commands
//!
//! - `stats`: load an edge list and print counts plus the load report
//! - `neighbors`: print one node's neighbor list
//! - `walk`: print random walks from one start node
//! - `corpus`: write a walk corpus over every node (node2vec input)
//! - `dedup`: rewrite an edge list in canonical form

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use aegisgraph_core::{
    generate_corpus, graph::node_id, GraphConfig, GraphStore, Walk, WalkConfig, WalkEngine,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// AegisGraph - concurrent graph store and random-walk sampler
#[derive(Parser, Debug)]
#[command(name = "aegisgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// TOML configuration file, layered over defaults and under AEGISGRAPH_* variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv); RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load an edge list and print node and edge counts
    Stats {
        /// Edge-list file
        edges: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the neighbors of one node, space separated
    Neighbors {
        /// Edge-list file
        edges: PathBuf,
        /// Node id
        node: i64,
    },
    /// Print random walks from one node, one walk per line
    Walk {
        /// Edge-list file
        edges: PathBuf,
        /// Start node
        #[arg(short, long)]
        start: i64,
        #[command(flatten)]
        walk: WalkArgs,
    },
    /// Write walks from every node to a file, one walk per line
    Corpus {
        /// Edge-list file
        edges: PathBuf,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        walk: WalkArgs,
    },
    /// Load an edge list and save it deduplicated as sorted `min max` lines
    Dedup {
        /// Input edge list
        input: PathBuf,
        /// Output edge list
        output: PathBuf,
    },
}

/// Overrides for the `[walk]` configuration section.
#[derive(Args, Debug)]
struct WalkArgs {
    /// Maximum nodes per walk
    #[arg(short, long)]
    length: Option<usize>,
    /// Walks per start node
    #[arg(short = 'n', long)]
    count: Option<usize>,
    /// Base seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl WalkArgs {
    fn resolve(&self, base: &WalkConfig) -> WalkConfig {
        WalkConfig {
            length: self.length.unwrap_or(base.length),
            count: self.count.unwrap_or(base.count),
            seed: self.seed.or(base.seed),
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn open_graph(config: &GraphConfig, edges: &Path) -> Result<GraphStore> {
    let graph = GraphStore::with_config(config);
    graph
        .load(edges)
        .with_context(|| format!("failed to load edge list {}", edges.display()))?;
    Ok(graph)
}

fn write_walks<W: Write>(mut out: W, walks: &[Walk]) -> io::Result<()> {
    for walk in walks {
        let line: Vec<String> = walk.iter().map(ToString::to_string).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    out.flush()
}

fn run(cli: Cli) -> Result<()> {
    let config = GraphConfig::load(cli.config.as_deref()).context("invalid configuration")?;

    match cli.command {
        Command::Stats { edges, json } => {
            let graph = GraphStore::with_config(&config);
            let report = graph
                .load(&edges)
                .with_context(|| format!("failed to load edge list {}", edges.display()))?;
            if json {
                let stats = serde_json::json!({
                    "nodes": graph.node_count(),
                    "edges": graph.edge_count(),
                    "report": report,
                });
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("nodes: {}", graph.node_count());
                println!("edges: {}", graph.edge_count());
                println!("skipped_tokens: {}", report.skipped_tokens);
                println!("skipped_pairs: {}", report.skipped_pairs);
                println!("self_loops: {}", report.self_loops);
                println!("dangling_token: {}", report.dangling_token);
            }
        }
        Command::Neighbors { edges, node } => {
            node_id(node)?;
            let graph = open_graph(&config, &edges)?;
            let line: Vec<String> = graph.get_neighbors(node).iter().map(ToString::to_string).collect();
            println!("{}", line.join(" "));
        }
        Command::Walk { edges, start, walk } => {
            let start = node_id(start)?;
            let settings = walk.resolve(&config.walk);
            let graph = open_graph(&config, &edges)?;
            let mut engine = settings.seed.map_or_else(WalkEngine::new, WalkEngine::with_seed);
            let walks = engine.random_walk(&graph, start, settings.length, settings.count);
            if walks.is_empty() {
                tracing::warn!(start, "no walks produced; start node is absent or isolated");
            }
            write_walks(io::stdout().lock(), &walks)?;
        }
        Command::Corpus { edges, out, walk } => {
            let settings = walk.resolve(&config.walk);
            let graph = open_graph(&config, &edges)?;
            graph.check_path(&out)?;
            let corpus = generate_corpus(&graph, &graph.node_ids(), &settings);
            let file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            write_walks(BufWriter::new(file), &corpus)?;
            tracing::info!(walks = corpus.len(), out = %out.display(), "corpus written");
        }
        Command::Dedup { input, output } => {
            let graph = open_graph(&config, &input)?;
            let written = graph
                .save(&output)
                .with_context(|| format!("failed to save edge list {}", output.display()))?;
            tracing::info!(edges = written, "deduplicated edge list written");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
