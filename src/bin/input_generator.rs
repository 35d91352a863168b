use clap::Parser;
use graph_match::{
    generator::{random_graph, seeded_rng},
    parser::format_edge_list,
};
use std::fs;
use std::path::PathBuf;

/// Input Generator for graph pattern search instances.
///
/// Writes one random graph as an edge list in the format read by
/// `graph-match --main-input` / `--pattern-input`:
///
/// <node count>
/// <start> <end>     (one line per edge)
///
/// Every node gets one edge to a random other node, so the graph has exactly
/// as many edges as nodes once it has at least two nodes.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate random graphs for graph pattern search"
)]
struct Args {
    /// Number of nodes
    #[arg(long)]
    nodes: usize,

    /// Random seed (if omitted, uses entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path to write the edge list (mandatory)
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.nodes < 2 {
        eprintln!("Warning: graphs with fewer than 2 nodes have no edges.");
    }

    let mut rng = seeded_rng(args.seed);
    let graph = random_graph(args.nodes, &mut rng);

    fs::write(&args.output, format_edge_list(&graph))?;

    let max_degree = graph.nodes().iter().map(|n| n.degree).max().unwrap_or(0);
    println!("Generated graph:");
    println!("  nodes = {}", graph.num_nodes());
    println!("  edges = {}", graph.num_edges());
    println!("  max degree = {}", max_degree);
    if let Some(seed) = args.seed {
        println!("  seed = {}", seed);
    }
    println!("  output file: {:?}", args.output);

    Ok(())
}
