//! JSON snapshot of a graph in the node/link layout used by force-directed
//! renderers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::Graph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: usize,
    pub group: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: usize,
    pub target: usize,
    pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

impl From<&Graph> for GraphDocument {
    fn from(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeRecord {
                id: n.id,
                group: n.group,
            })
            .collect();

        // Link thickness is half the rank, rounded up
        let links = graph
            .edges()
            .iter()
            .map(|e| LinkRecord {
                source: e.start,
                target: e.end,
                value: e.highlight.unwrap_or(e.rank).div_ceil(2),
            })
            .collect();

        GraphDocument { nodes, links }
    }
}

pub fn to_json(graph: &Graph) -> Result<String, ExportError> {
    Ok(serde_json::to_string(&GraphDocument::from(graph))?)
}

pub fn write_json(graph: &Graph, path: &Path) -> Result<(), ExportError> {
    let json = to_json(graph)?;
    fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Receives the annotated graph every time a new match lands
pub trait Exporter {
    fn export(&mut self, graph: &Graph) -> Result<(), ExportError>;
}

/// Rewrites one JSON file on every export
#[derive(Debug, Clone)]
pub struct JsonFileExporter {
    path: PathBuf,
}

impl JsonFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileExporter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for JsonFileExporter {
    fn export(&mut self, graph: &Graph) -> Result<(), ExportError> {
        write_json(graph, &self.path)
    }
}

/// Discards every snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExporter;

impl Exporter for NullExporter {
    fn export(&mut self, _graph: &Graph) -> Result<(), ExportError> {
        Ok(())
    }
}

/// Keeps every snapshot in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryExporter {
    pub snapshots: Vec<GraphDocument>,
}

impl Exporter for MemoryExporter {
    fn export(&mut self, graph: &Graph) -> Result<(), ExportError> {
        self.snapshots.push(GraphDocument::from(graph));
        Ok(())
    }
}
