use crate::error::GraphError;

/// Index of a node inside its owning [`Graph`]
pub type NodeId = usize;

/// Index of an edge inside its owning [`Graph`]
pub type EdgeId = usize;

/// An ordered set of main-graph edge indices under test against a pattern
pub type Candidate = Vec<EdgeId>;

/// Group value given to nodes touched by a confirmed match
pub const MATCHED_GROUP: u32 = 15;

/// Highlight value given to edges of a confirmed match
pub const HIGHLIGHT_RANK: usize = 25;

/// A graph vertex
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Number of edges referencing this node
    pub degree: usize,
    /// Output annotation, 0 while unmatched
    pub group: u32,
    /// Incident edges, by index
    pub edges: Vec<EdgeId>,
}

/// A graph edge between two distinct nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    /// Sum of the endpoint degrees when the graph was linked. Never recomputed.
    pub rank: usize,
    pub start: NodeId,
    pub end: NodeId,
    /// Replaces `rank` in exports once the edge is part of a match
    pub highlight: Option<usize>,
}

impl Edge {
    pub fn endpoints(&self) -> [NodeId; 2] {
        [self.start, self.end]
    }
}

/// Represents an undirected multigraph stored as flat node and edge arenas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build a graph from explicit `(start, end)` pairs.
    ///
    /// Edge ids follow the order of `pairs`. Parallel edges are kept as-is.
    pub fn from_edges(node_count: usize, pairs: &[(NodeId, NodeId)]) -> Result<Self, GraphError> {
        for (edge, &(start, end)) in pairs.iter().enumerate() {
            for node in [start, end] {
                if node >= node_count {
                    return Err(GraphError::EndpointOutOfRange {
                        edge,
                        node,
                        node_count,
                    });
                }
            }
            if start == end {
                return Err(GraphError::SelfLoop { edge, node: start });
            }
        }

        Ok(Self::link(node_count, pairs))
    }

    /// Two-pass construction over pairs that are already known to be valid:
    /// attach edges and degrees to nodes first, then rank every edge.
    pub(crate) fn link(node_count: usize, pairs: &[(NodeId, NodeId)]) -> Self {
        let mut nodes: Vec<Node> = (0..node_count)
            .map(|id| Node {
                id,
                ..Node::default()
            })
            .collect();

        let mut edges: Vec<Edge> = pairs
            .iter()
            .enumerate()
            .map(|(id, &(start, end))| Edge {
                id,
                rank: 0,
                start,
                end,
                highlight: None,
            })
            .collect();

        for edge in &edges {
            for node in edge.endpoints() {
                nodes[node].edges.push(edge.id);
                nodes[node].degree += 1;
            }
        }

        for edge in &mut edges {
            edge.rank = nodes[edge.start].degree + nodes[edge.end].degree;
        }

        Graph { nodes, edges }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Ids of all edges, in storage order
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|e| e.id).collect()
    }

    /// Flag a node as part of a match. Returns `false` for unknown ids.
    pub fn mark_node(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.group = MATCHED_GROUP;
                true
            }
            None => false,
        }
    }

    /// Flag an edge as part of a match. Leaves `rank` untouched.
    pub fn highlight_edge(&mut self, id: EdgeId) -> bool {
        match self.edges.get_mut(id) {
            Some(edge) => {
                edge.highlight = Some(HIGHLIGHT_RANK);
                true
            }
            None => false,
        }
    }
}

// Module declarations
pub mod aggregator;
pub mod combinations;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod parser;
pub mod pipeline;
pub mod profile;
pub mod queue;
pub mod worker;
