use clap::Parser;
use graph_match::{
    config::{SearchConfig, DEFAULT_QUEUE_CAPACITY},
    export::{write_json, JsonFileExporter},
    generator::{random_graph, seeded_rng},
    parser::parse_graph_file,
    pipeline::search,
    Graph,
};
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Search a main graph for edge sets resembling a small pattern graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of nodes in the random main graph
    #[arg(short = 'n', long, default_value_t = 50)]
    main_size: usize,

    /// Number of nodes in the random pattern graph
    #[arg(short = 'p', long, default_value_t = 3)]
    pattern_size: usize,

    /// Read the main graph from an edge-list file instead
    #[arg(long)]
    main_input: Option<PathBuf>,

    /// Read the pattern graph from an edge-list file instead
    #[arg(long)]
    pattern_input: Option<PathBuf>,

    /// Number of matcher workers (default: available cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Capacity of the candidate queue
    #[arg(short = 'c', long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Stop the search after this many seconds
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Random seed (if omitted, uses entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory receiving graph.json, subgraph.json and matches.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

impl Args {
    fn to_config(&self) -> SearchConfig {
        let config = SearchConfig::default()
            .with_queue_capacity(self.queue_capacity)
            .with_timeout(self.timeout_secs.map(Duration::from_secs));

        match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    }
}

fn load_graph(
    input: Option<&Path>,
    size: usize,
    rng: &mut StdRng,
) -> Result<Graph, Box<dyn std::error::Error>> {
    match input {
        Some(path) => {
            info!("Loading graph from {}", path.display());
            Ok(parse_graph_file(path)?)
        }
        None => Ok(random_graph(size, rng)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = args.to_config();
    let mut rng = seeded_rng(args.seed);

    let main_graph = load_graph(args.main_input.as_deref(), args.main_size, &mut rng)?;
    let pattern = load_graph(args.pattern_input.as_deref(), args.pattern_size, &mut rng)?;

    println!("Graph Pattern Search");
    println!("====================");
    println!(
        "Main graph: {} nodes, {} edges",
        main_graph.num_nodes(),
        main_graph.num_edges()
    );
    println!(
        "Pattern graph: {} nodes, {} edges",
        pattern.num_nodes(),
        pattern.num_edges()
    );
    println!();

    fs::create_dir_all(&args.output_dir)?;
    write_json(&main_graph, &args.output_dir.join("graph.json"))?;
    write_json(&pattern, &args.output_dir.join("subgraph.json"))?;

    let exporter = JsonFileExporter::new(args.output_dir.join("matches.json"));
    let report = search(&main_graph, &pattern, &config, exporter)?;

    println!("Candidates generated: {}", report.candidates_generated);
    println!("Candidates tested: {}", report.candidates_tested);
    println!("Matches found: {}", report.matches.len());
    if report.export_failures > 0 {
        println!("Failed exports: {}", report.export_failures);
    }
    if report.cancelled {
        println!("Search was cancelled before completion");
    }
    println!("Search time: {:.3}s", report.timings.total.as_secs_f64());
    println!();

    for (i, candidate) in report.sorted_matches().iter().enumerate() {
        let pairs: Vec<(usize, usize)> = candidate
            .iter()
            .filter_map(|&id| report.output.edge(id))
            .map(|e| (e.start, e.end))
            .collect();
        println!("  Match {}: edges {:?} -> {:?}", i + 1, candidate, pairs);
    }

    Ok(())
}
