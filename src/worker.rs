use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;

use tracing::{debug, trace};

use crate::profile::{sorted_descending, PatternProfile};
use crate::queue::{CancelToken, Consumer};
use crate::{Candidate, EdgeId, Graph, NodeId};

/// Test one candidate edge set against the pattern profile.
///
/// This is a necessary condition only: a true occurrence of the pattern
/// always passes, but so can edge sets with a different adjacency structure.
pub fn evaluate(graph: &Graph, profile: &PatternProfile, candidate: &[EdgeId]) -> bool {
    if candidate.is_empty() || candidate.len() != profile.edge_count() {
        return false;
    }

    let Some(edges) = candidate
        .iter()
        .map(|&id| graph.edge(id))
        .collect::<Option<Vec<_>>>()
    else {
        return false;
    };

    let nodes: BTreeSet<NodeId> = edges.iter().flat_map(|e| e.endpoints()).collect();
    if nodes.len() != profile.node_count() {
        trace!(?candidate, touched = nodes.len(), "Node count mismatch");
        return false;
    }

    let ranks = sorted_descending(edges.iter().map(|e| e.rank));
    let degrees = sorted_descending(nodes.iter().filter_map(|&n| graph.node(n)).map(|n| n.degree));

    let admitted = profile.admits(&ranks, &degrees);
    if !admitted {
        trace!(?candidate, ?ranks, ?degrees, "Dominated by pattern");
    }
    admitted
}

/// Counters shared by all workers of one search
#[derive(Debug, Default)]
pub struct WorkerTally {
    tested: AtomicUsize,
    matched: AtomicUsize,
}

impl WorkerTally {
    pub fn tested(&self) -> usize {
        self.tested.load(Ordering::Relaxed)
    }

    pub fn matched(&self) -> usize {
        self.matched.load(Ordering::Relaxed)
    }
}

/// One matcher: pulls candidates until the queue closes or the search is
/// cancelled, forwarding the ones that pass.
pub struct MatchWorker<'a> {
    pub id: usize,
    pub graph: &'a Graph,
    pub profile: &'a PatternProfile,
    pub candidates: Consumer<Candidate>,
    pub matches: Sender<Candidate>,
    pub cancel: CancelToken,
    pub tally: &'a WorkerTally,
}

impl MatchWorker<'_> {
    pub fn run(self) {
        let mut tested = 0usize;
        let mut matched = 0usize;

        while let Some(candidate) = self.candidates.recv() {
            if self.cancel.is_cancelled() {
                break;
            }

            tested += 1;
            if !evaluate(self.graph, self.profile, &candidate) {
                continue;
            }

            matched += 1;
            debug!(worker = self.id, ?candidate, "Found a match");
            if self.matches.send(candidate).is_err() {
                // Aggregator is gone
                break;
            }
        }

        self.tally.tested.fetch_add(tested, Ordering::Relaxed);
        self.tally.matched.fetch_add(matched, Ordering::Relaxed);
        debug!(worker = self.id, tested, matched, "Worker finished");
    }
}
