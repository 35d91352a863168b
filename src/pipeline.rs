//! Producer / matcher pool / aggregator search over candidate edge sets.

use std::panic;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::combinations::{combinations, num_combinations};
use crate::config::{available_parallelism, SearchConfig};
use crate::error::SearchError;
use crate::export::Exporter;
use crate::profile::PatternProfile;
use crate::queue::{self, CancelToken, Producer};
use crate::worker::{evaluate, MatchWorker, WorkerTally};
use crate::{Candidate, EdgeId, Graph};

/// Wall-clock time spent in each stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    pub generator: Duration,
    pub matchers: Duration,
    pub aggregator: Duration,
    pub total: Duration,
}

/// Everything a finished search produced
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Confirmed matches in arrival order
    pub matches: Vec<Candidate>,
    /// Main graph copy carrying the match annotations
    pub output: Graph,
    pub candidates_generated: usize,
    pub candidates_tested: usize,
    /// Matchers actually spawned
    pub workers: usize,
    pub export_failures: usize,
    /// `true` if cancellation cut the search short
    pub cancelled: bool,
    pub timings: StageTimings,
}

impl SearchReport {
    /// Matches in lexicographic order, for comparing runs
    pub fn sorted_matches(&self) -> Vec<Candidate> {
        let mut matches = self.matches.clone();
        matches.sort_unstable();
        matches
    }
}

/// Search `main` for edge sets resembling `pattern`.
///
/// A configured timeout becomes the cancellation deadline.
pub fn search<E: Exporter + Send>(
    main: &Graph,
    pattern: &Graph,
    config: &SearchConfig,
    exporter: E,
) -> Result<SearchReport, SearchError> {
    let cancel = match config.timeout {
        Some(timeout) => CancelToken::with_deadline(Instant::now() + timeout),
        None => CancelToken::new(),
    };
    search_with_cancel(main, pattern, config, exporter, &cancel)
}

/// Like [`search`], observing an externally owned cancellation token.
///
/// Returns only after the generator, every matcher and the aggregator have
/// finished.
pub fn search_with_cancel<E: Exporter + Send>(
    main: &Graph,
    pattern: &Graph,
    config: &SearchConfig,
    exporter: E,
    cancel: &CancelToken,
) -> Result<SearchReport, SearchError> {
    config.validate()?;
    run_pipeline(main, pattern, config, exporter, cancel, config.effective_workers())
}

/// Pipeline body with an exact matcher count, bypassing the core cap.
pub(crate) fn run_pipeline<E: Exporter + Send>(
    main: &Graph,
    pattern: &Graph,
    config: &SearchConfig,
    exporter: E,
    cancel: &CancelToken,
    workers: usize,
) -> Result<SearchReport, SearchError> {
    let start = Instant::now();

    let profile = PatternProfile::from_graph(pattern);
    if !profile.is_matchable() {
        warn!("Pattern has no edges; nothing can match it");
    }

    let k = profile.edge_count();
    let workers = workers.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("matcher-{i}"))
        .build()?;

    info!("Available cores: {}", available_parallelism());
    info!("Matcher workers: {}", workers);
    info!("Candidate queue capacity: {}", config.queue_capacity);
    info!(
        "Searching {} edges for {}-edge pattern: {} candidates",
        main.num_edges(),
        k,
        num_combinations(main.num_edges(), k)
    );

    let (producer, consumer) = queue::bounded::<Candidate>(config.queue_capacity);
    let (match_tx, match_rx) = mpsc::channel::<Candidate>();
    let tally = WorkerTally::default();
    let output = main.clone();

    let ((generated, exhausted, generator_time), matchers_time, (outcome, aggregator_time)) =
        thread::scope(|s| {
            let generator = s.spawn(move || {
                let t = Instant::now();
                let (sent, exhausted) = produce(main.edge_ids(), k, producer, cancel);
                (sent, exhausted, t.elapsed())
            });

            let aggregator = s.spawn(move || {
                let t = Instant::now();
                let outcome = Aggregator::new(output, exporter).run(match_rx, cancel);
                (outcome, t.elapsed())
            });

            let matchers: Vec<MatchWorker<'_>> = (0..workers)
                .map(|id| MatchWorker {
                    id,
                    graph: main,
                    profile: &profile,
                    candidates: consumer.clone(),
                    matches: match_tx.clone(),
                    cancel: cancel.clone(),
                    tally: &tally,
                })
                .collect();
            // Only the workers may keep the queues open
            drop(consumer);
            drop(match_tx);

            let t = Instant::now();
            pool.scope(|scope| {
                for matcher in matchers {
                    scope.spawn(move |_| matcher.run());
                }
            });
            let matchers_time = t.elapsed();

            (join(generator), matchers_time, join(aggregator))
        });

    let tested = tally.tested();
    let cancelled = !exhausted || tested < generated || outcome.matches.len() < tally.matched();
    let timings = StageTimings {
        generator: generator_time,
        matchers: matchers_time,
        aggregator: aggregator_time,
        total: start.elapsed(),
    };

    info!("Combination: {:?}", timings.generator);
    info!("Pattern finders: {:?}", timings.matchers);
    info!("Output producer: {:?}", timings.aggregator);
    info!(
        generated,
        tested,
        matches = outcome.matches.len(),
        cancelled,
        "Search finished in {:?}",
        timings.total
    );

    Ok(SearchReport {
        matches: outcome.matches,
        output: outcome.graph,
        candidates_generated: generated,
        candidates_tested: tested,
        workers,
        export_failures: outcome.export_failures,
        cancelled,
        timings,
    })
}

/// Feed every `k`-combination of `edge_ids` into the candidate queue, then
/// close it. Returns the number sent and whether enumeration ran to the end.
fn produce(
    edge_ids: Vec<EdgeId>,
    k: usize,
    producer: Producer<Candidate>,
    cancel: &CancelToken,
) -> (usize, bool) {
    let mut sent = 0usize;
    let mut exhausted = true;

    for candidate in combinations(edge_ids, k) {
        if cancel.is_cancelled() {
            debug!("Generator cancelled after {} candidates", sent);
            exhausted = false;
            break;
        }
        if producer.send(candidate).is_err() {
            debug!("All matchers are gone");
            exhausted = false;
            break;
        }
        sent += 1;
    }

    debug!("Finished sending {} candidates", sent);
    producer.close();
    (sent, exhausted)
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}

/// Evaluate every candidate on the rayon global pool without the queue
/// pipeline. Results are sorted.
pub fn find_matches_par(main: &Graph, profile: &PatternProfile) -> Vec<Candidate> {
    let mut matches: Vec<Candidate> = main
        .edge_ids()
        .into_iter()
        .combinations(profile.edge_count())
        .par_bridge()
        .filter(|candidate| evaluate(main, profile, candidate))
        .collect();

    matches.sort_unstable();
    matches
}
