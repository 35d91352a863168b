use std::sync::mpsc::Receiver;

use tracing::{debug, error};

use crate::export::Exporter;
use crate::queue::CancelToken;
use crate::{Candidate, EdgeId, Graph};

/// What the aggregator hands back once its match queue is closed
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub graph: Graph,
    pub matches: Vec<Candidate>,
    pub export_failures: usize,
}

/// Sole owner and mutator of the output graph.
///
/// Annotation only ever adds marks, so a failed export leaves the in-memory
/// graph consistent and the next export picks up where it left off.
pub struct Aggregator<E> {
    graph: Graph,
    exporter: E,
    matches: Vec<Candidate>,
    export_failures: usize,
}

impl<E: Exporter> Aggregator<E> {
    pub fn new(graph: Graph, exporter: E) -> Self {
        Aggregator {
            graph,
            exporter,
            matches: Vec::new(),
            export_failures: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Mark the edges of `candidate` and their endpoints.
    pub fn annotate(&mut self, candidate: &[EdgeId]) {
        for &id in candidate {
            let Some(edge) = self.graph.edge(id) else {
                continue;
            };
            let [start, end] = edge.endpoints();
            self.graph.highlight_edge(id);
            self.graph.mark_node(start);
            self.graph.mark_node(end);
        }
    }

    /// Record one match and export the updated graph.
    pub fn accept(&mut self, candidate: Candidate) {
        self.annotate(&candidate);
        self.matches.push(candidate);

        if let Err(e) = self.exporter.export(&self.graph) {
            self.export_failures += 1;
            error!("Export failed after match {}: {}", self.matches.len(), e);
        }
    }

    /// Consume matches until every worker hung up or the search is cancelled.
    pub fn run(mut self, matches: Receiver<Candidate>, cancel: &CancelToken) -> AggregateOutcome {
        for candidate in matches {
            if cancel.is_cancelled() {
                break;
            }
            debug!(?candidate, "Annotating match");
            self.accept(candidate);
        }

        self.finish()
    }

    pub fn finish(self) -> AggregateOutcome {
        AggregateOutcome {
            graph: self.graph,
            matches: self.matches,
            export_failures: self.export_failures,
        }
    }
}
