use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::{EdgeId, NodeId};

/// Structural problems found while linking a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge {edge} references node {node}, but the graph has {node_count} nodes")]
    EndpointOutOfRange {
        edge: EdgeId,
        node: NodeId,
        node_count: usize,
    },
    #[error("edge {edge} is a self-loop on node {node}")]
    SelfLoop { edge: EdgeId, node: NodeId },
}

/// Failures while reading an edge-list description
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse error: {0}")]
    Syntax(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failures while serializing or writing an annotated graph
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize graph: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Rejected search settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one matcher worker is required")]
    NoWorkers,
    #[error("candidate queue capacity must be at least 1")]
    ZeroCapacity,
}

/// Failures that prevent a search from starting
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build matcher pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
