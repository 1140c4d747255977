// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Solver Engine
//!
//! `SolverEngine` is the public entry point. A run validates the
//! configuration, builds the catalog and dependency tables, seeds the work
//! queue with the target-only job and lets `workers` threads drain it until
//! the queue is quiescent. Accepted solutions are ranked and kept on the
//! engine until the next run.
//!
//! ## Threads
//!
//! - Workers are spawned with `std::thread::scope` and borrow the read-only
//!   run state (catalog, dependency tables, configuration) directly.
//! - Each worker owns a `CompositeMonitor` with interrupt, solution-limit and
//!   time-limit monitors, consulted before every job.
//! - With a listener attached, a reporter thread forwards progress events
//!   from a bounded channel.
//! - `workers == 0` runs the same loop on the calling thread.
//!
//! ## Single flight
//!
//! An engine runs at most one search at a time. A second `solve` or `start`
//! while a run is active fails with `SolveError::Busy`.

use crate::accumulator::{Admission, SolutionSet};
use crate::catalog::Catalog;
use crate::dependency::DependencyTable;
use crate::error::SolveError;
use crate::expand::{Expander, Expansion};
use crate::job::Job;
use crate::queue::WorkQueue;
use crate::reporter::{self, EventSink};
use imagetrain_model::chain::ChainError;
use imagetrain_model::config::SolverConfiguration;
use imagetrain_model::solution::Solution;
use imagetrain_search::monitor::composite::CompositeMonitor;
use imagetrain_search::monitor::interrupt::InterruptMonitor;
use imagetrain_search::monitor::search_monitor::{SearchCommand, SearchMonitor};
use imagetrain_search::monitor::solution_limit::SolutionLimitMonitor;
use imagetrain_search::monitor::time_limit::TimeLimitMonitor;
use imagetrain_search::outcome::StepOutcome;
use imagetrain_search::progress::event::{ProgressEvent, ProgressSnapshot};
use imagetrain_search::progress::listener::ProgressListener;
use imagetrain_search::result::{SolveOutcome, TerminationReason};
use imagetrain_search::stats::{OutcomeCounters, SolverStatisticsBuilder};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info};

/// Enumerates adapter chains between a target and a sensor.
pub struct SolverEngine {
    listener: Option<Arc<dyn ProgressListener>>,
    running: AtomicBool,
    cancel_flag: AtomicBool,
    last: Mutex<Option<Vec<Solution>>>,
}

impl Default for SolverEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SolverEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverEngine")
            .field("listener", &self.listener.as_ref().map(|l| l.name().to_owned()))
            .field("running", &self.is_running())
            .finish()
    }
}

impl SolverEngine {
    pub fn new() -> Self {
        Self {
            listener: None,
            running: AtomicBool::new(false),
            cancel_flag: AtomicBool::new(false),
            last: Mutex::new(None),
        }
    }

    /// Creates an engine that reports progress to `listener`.
    pub fn with_listener(listener: Arc<dyn ProgressListener>) -> Self {
        Self {
            listener: Some(listener),
            ..Self::new()
        }
    }

    /// Runs a search on the calling thread and blocks until it finishes.
    ///
    /// # Errors
    ///
    /// Fails with `SolveError::Config` for an invalid configuration and
    /// `SolveError::Busy` if another run is active, both before any search
    /// starts.
    pub fn solve(&self, config: &SolverConfiguration) -> Result<SolveOutcome, SolveError> {
        config.validate()?;
        let _run = RunGuard::acquire(&self.running)?;
        self.cancel_flag.store(false, Ordering::Release);
        self.run(config)
    }

    /// Starts a search on a background thread.
    ///
    /// Validation and the single-flight check happen before this returns, so
    /// a `cancel` issued right after `start` always reaches the new run.
    pub fn start(self: &Arc<Self>, config: SolverConfiguration) -> Result<SolveHandle, SolveError> {
        config.validate()?;
        claim(&self.running)?;
        self.cancel_flag.store(false, Ordering::Release);

        // The solver thread releases the claim when the run ends.
        let engine = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("imagetrain-solver".to_owned())
            .spawn(move || {
                let _run = RunGuard {
                    flag: &engine.running,
                };
                engine.run(&config)
            });

        match spawned {
            Ok(handle) => Ok(SolveHandle { handle }),
            Err(err) => {
                self.running.store(false, Ordering::Release);
                Err(SolveError::Spawn(err))
            }
        }
    }

    /// Requests cooperative cancellation of the active run, if any.
    ///
    /// Jobs dequeued afterwards are reported as `Cancelled` without being
    /// expanded. Solutions accepted so far are kept.
    #[inline]
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns the ranked solutions of the last completed run.
    ///
    /// # Errors
    ///
    /// `SolveError::NotFinished` while a run is active or if no run has
    /// completed yet.
    pub fn solutions(&self) -> Result<Vec<Solution>, SolveError> {
        if self.is_running() {
            return Err(SolveError::NotFinished);
        }
        self.last.lock().clone().ok_or(SolveError::NotFinished)
    }

    fn run(&self, config: &SolverConfiguration) -> Result<SolveOutcome, SolveError> {
        let start = Instant::now();
        *self.last.lock() = None;

        let catalog = Catalog::new(config);
        let dependencies = DependencyTable::build(&catalog);
        debug!(
            items = catalog.len(),
            reversible = catalog.num_reversible(),
            edges = dependencies.num_edges(),
            sensor_reachable = dependencies.sensor_reachable().count(),
            "catalog built"
        );

        let workers = config.workers();
        info!(
            candidates = config.candidates().len(),
            workers,
            tolerance = config.backfocus_tolerance(),
            "solve started"
        );

        let ctx = RunContext {
            config,
            expander: Expander::new(&catalog, &dependencies, config),
            cancel: &self.cancel_flag,
            queue: WorkQueue::new(),
            solutions: SolutionSet::new(),
            counters: OutcomeCounters::new(),
            abort: AtomicBool::new(false),
            structural: OnceLock::new(),
            stop_reason: OnceLock::new(),
            start,
        };
        let depth = ctx.queue.push(Job::seed(&catalog));
        ctx.counters.observe_queue_depth(depth);

        if let Some(listener) = &self.listener {
            listener.on_started(config.candidates().len(), workers);
        }
        let failure = self.drive(&ctx, workers);

        let reason = ctx
            .stop_reason
            .get()
            .copied()
            .unwrap_or(TerminationReason::Exhausted);
        let statistics = SolverStatisticsBuilder::new()
            .counters(&ctx.counters)
            .solutions_accepted(ctx.solutions.accepted())
            .perfect_solutions(ctx.solutions.perfect())
            .used_threads(workers)
            .solve_duration(start.elapsed())
            .build();

        if let Some(err) = ctx.structural.get().copied() {
            error!(%err, "solve aborted");
            return Err(SolveError::Structural(err));
        }
        if let Some(err) = failure {
            return Err(err);
        }

        let solutions = ctx.solutions.into_ranked();
        *self.last.lock() = Some(solutions.clone());

        info!(
            %reason,
            solutions = solutions.len(),
            jobs = statistics.jobs_processed,
            elapsed_ms = statistics.solve_duration.as_millis() as u64,
            "solve finished"
        );
        if let Some(listener) = &self.listener {
            listener.on_finished(reason, &statistics);
        }

        Ok(SolveOutcome::new(solutions, reason, statistics))
    }

    /// Drains the queue with `workers` threads (or inline) and joins them.
    fn drive(&self, ctx: &RunContext<'_>, workers: usize) -> Option<SolveError> {
        let listener = self.listener.as_deref();
        let (sink, receiver) = match listener {
            Some(_) => {
                let (sink, receiver) = reporter::channel(ctx.config.event_capacity());
                (sink, Some(receiver))
            }
            None => (EventSink::disabled(), None),
        };

        thread::scope(|scope| {
            let reporter = match (receiver, listener) {
                (Some(receiver), Some(listener)) => {
                    let interval = ctx.config.snapshot_interval();
                    let spawned = thread::Builder::new()
                        .name("imagetrain-reporter".to_owned())
                        .spawn_scoped(scope, move || {
                            reporter::run_reporter(receiver, listener, interval, || ctx.snapshot())
                        });
                    match spawned {
                        Ok(handle) => Some(handle),
                        Err(err) => {
                            error!(%err, "failed to spawn progress reporter");
                            None
                        }
                    }
                }
                _ => None,
            };

            let mut failure = None;
            if workers == 0 {
                ctx.worker_loop(&sink);
            } else {
                let mut handles = Vec::with_capacity(workers);
                for id in 0..workers {
                    let worker_sink = sink.clone();
                    let spawned = thread::Builder::new()
                        .name(format!("imagetrain-worker-{id}"))
                        .spawn_scoped(scope, move || ctx.worker_loop(&worker_sink));
                    match spawned {
                        Ok(handle) => handles.push(handle),
                        Err(err) => {
                            error!(%err, worker = id, "failed to spawn solver worker");
                            ctx.abort.store(true, Ordering::Release);
                            failure = Some(SolveError::Spawn(err));
                            break;
                        }
                    }
                }
                if handles.is_empty() {
                    ctx.worker_loop(&sink);
                }
                for (id, handle) in handles.into_iter().enumerate() {
                    if handle.join().is_err() {
                        error!(worker = id, "solver worker panicked");
                        failure.get_or_insert(SolveError::WorkerPanicked);
                    }
                }
            }
            drop(sink);

            if let Some(handle) = reporter {
                if handle.join().is_err() {
                    error!("progress reporter panicked");
                }
            }
            failure
        })
    }
}

/// Handle to a run started with `SolverEngine::start`.
#[derive(Debug)]
pub struct SolveHandle {
    handle: JoinHandle<Result<SolveOutcome, SolveError>>,
}

impl SolveHandle {
    /// Returns `true` once the run has finished.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the run finishes and returns its outcome.
    pub fn join(self) -> Result<SolveOutcome, SolveError> {
        self.handle.join().map_err(|_| SolveError::WorkerPanicked)?
    }
}

/// Holds the engine's single-flight flag for the duration of a run.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SolveError> {
        claim(flag)?;
        Ok(Self { flag })
    }
}

fn claim(flag: &AtomicBool) -> Result<(), SolveError> {
    flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| SolveError::Busy)
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// State shared by all workers of one run.
struct RunContext<'a> {
    config: &'a SolverConfiguration,
    expander: Expander<'a>,
    cancel: &'a AtomicBool,
    queue: WorkQueue<Job>,
    solutions: SolutionSet,
    counters: OutcomeCounters,
    /// Raised on the first stop condition or structural failure so every
    /// worker drains the queue without expanding.
    abort: AtomicBool,
    structural: OnceLock<ChainError>,
    stop_reason: OnceLock<TerminationReason>,
    start: Instant,
}

impl RunContext<'_> {
    fn monitor(&self) -> CompositeMonitor<'_> {
        let mut monitor = CompositeMonitor::with_capacity(6);
        monitor.add_monitor(InterruptMonitor::new(self.cancel));
        if let Some(token) = self.config.cancellation() {
            monitor.add_monitor(InterruptMonitor::new(token));
        }
        monitor.add_monitor(InterruptMonitor::new(&self.abort));
        if let Some(limit) = self.config.stop_after_solutions() {
            monitor.add_monitor(SolutionLimitMonitor::accepted(
                self.solutions.accepted_counter(),
                limit,
            ));
        }
        if let Some(limit) = self.config.stop_after_perfect_solutions() {
            monitor.add_monitor(SolutionLimitMonitor::perfect(
                self.solutions.perfect_counter(),
                limit,
            ));
        }
        if let Some(limit) = self.config.time_limit() {
            monitor.add_monitor(TimeLimitMonitor::new(limit).started_at(self.start));
        }
        monitor
    }

    fn worker_loop(&self, sink: &EventSink) {
        let mut monitor = self.monitor();
        monitor.on_enter_search(self.config);
        let mut children = Vec::new();

        while let Some((job, _in_flight)) = self.queue.next() {
            monitor.on_step();
            let (outcome, accepted) = match monitor.search_command() {
                SearchCommand::Terminate(reason) => {
                    self.stop(reason);
                    (StepOutcome::Cancelled, None)
                }
                SearchCommand::Continue => self.process(&job, &mut children, &mut monitor),
            };

            let depth = if children.is_empty() {
                self.queue.len()
            } else {
                self.queue.push_all(children.drain(..))
            };
            self.counters.record(outcome);
            self.counters.observe_queue_depth(depth);
            if sink.is_enabled() {
                let event = ProgressEvent::step(outcome, depth, self.solutions.accepted());
                let event = match accepted {
                    Some(solution) => event.with_solution(solution),
                    None => event,
                };
                sink.emit(event, &self.counters);
            }
        }

        monitor.on_exit_search();
    }

    /// Expands `job` and returns its outcome, plus the solution it produced
    /// if that solution was accepted.
    fn process(
        &self,
        job: &Job,
        children: &mut Vec<Job>,
        monitor: &mut CompositeMonitor<'_>,
    ) -> (StepOutcome, Option<Solution>) {
        match self.expander.expand(job, children) {
            Ok(Expansion::Outcome(outcome)) => (outcome, None),
            Ok(Expansion::Terminal(solution)) => match self.solutions.offer(solution) {
                Admission::Accepted(solution) => {
                    monitor.on_solution_found(&solution);
                    (StepOutcome::Solved, Some(solution))
                }
                Admission::Duplicate => (StepOutcome::Duplicate, None),
            },
            Err(err) => {
                children.clear();
                let _ = self.structural.set(err);
                self.abort.store(true, Ordering::Release);
                (StepOutcome::Cancelled, None)
            }
        }
    }

    /// Records the first stop reason and tells every worker to drain.
    fn stop(&self, reason: TerminationReason) {
        if self.stop_reason.set(reason).is_ok() {
            debug!(%reason, "stop condition reached, draining queue");
        }
        self.abort.store(true, Ordering::Release);
    }

    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            outcomes: self.counters.snapshot(),
            queue_depth: self.queue.len(),
            solutions: self.solutions.accepted(),
            perfect_solutions: self.solutions.perfect(),
            elapsed: self.start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagetrain_model::connector::{ConnectorKind, Endpoint, SizeClass};
    use imagetrain_model::item::Item;

    fn end(kind: ConnectorKind, size: SizeClass) -> Endpoint {
        Endpoint::new(kind, size)
    }

    fn tube(from: SizeClass, to: SizeClass, length: f64) -> Item {
        Item::builder(
            end(ConnectorKind::Inserter, from),
            end(ConnectorKind::Receiver, to),
        )
        .length_mm(length)
        .build()
    }

    fn config(workers: usize) -> SolverConfiguration {
        let target = Item::builder(Endpoint::terminator(), end(ConnectorKind::Receiver, SizeClass::M42))
            .backfocus_mm(30.0)
            .build();
        let sensor = Item::builder(end(ConnectorKind::Inserter, SizeClass::M48), Endpoint::terminator()).build();
        SolverConfiguration::builder(target, sensor)
            .candidates([
                tube(SizeClass::M42, SizeClass::M42, 10.0),
                tube(SizeClass::M42, SizeClass::M48, 20.0),
                tube(SizeClass::M42, SizeClass::M48, 30.0),
            ])
            .backfocus_tolerance(0.0)
            .workers(workers)
            .build()
    }

    #[test]
    fn test_inline_solve() {
        let engine = SolverEngine::new();
        let outcome = engine.solve(&config(0)).unwrap();

        assert_eq!(outcome.reason, TerminationReason::Exhausted);
        assert_eq!(outcome.solutions.len(), 2);
        assert!(outcome.solutions.iter().all(Solution::is_perfect));
        assert_eq!(outcome.statistics.used_threads, 0);
        assert_eq!(outcome.statistics.outcomes.get(StepOutcome::Solved), 2);
        assert_eq!(engine.solutions().unwrap(), outcome.solutions);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_parallel_matches_inline() {
        let inline = SolverEngine::new().solve(&config(0)).unwrap();
        let parallel = SolverEngine::new().solve(&config(4)).unwrap();
        assert_eq!(inline.solutions, parallel.solutions);
        assert_eq!(
            inline.statistics.jobs_processed,
            parallel.statistics.jobs_processed
        );
    }

    #[test]
    fn test_solutions_before_any_run() {
        let engine = SolverEngine::new();
        assert!(matches!(engine.solutions(), Err(SolveError::NotFinished)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let base = config(0);
        let invalid = SolverConfiguration::builder(base.target().clone(), base.sensor().clone())
            .candidate(tube(SizeClass::M42, SizeClass::M48, 5.0))
            .build();
        let engine = SolverEngine::new();
        match engine.solve(&invalid) {
            Err(SolveError::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
        assert!(!engine.is_running());
    }

    #[test]
    fn test_busy_while_running() {
        let engine = SolverEngine::new();
        let _held = RunGuard::acquire(&engine.running).unwrap();
        assert!(matches!(engine.solve(&config(0)), Err(SolveError::Busy)));
        assert!(matches!(engine.solutions(), Err(SolveError::NotFinished)));
    }

    #[test]
    fn test_solution_limit() {
        let base = config(0);
        let limited = SolverConfiguration::builder(base.target().clone(), base.sensor().clone())
            .candidates(base.candidates().iter().cloned())
            .backfocus_tolerance(0.0)
            .stop_after_solutions(1)
            .workers(0)
            .build();
        let outcome = SolverEngine::new().solve(&limited).unwrap();
        assert_eq!(outcome.reason, TerminationReason::SolutionLimit);
        assert_eq!(outcome.solutions.len(), 1);
    }

    #[test]
    fn test_start_and_join() {
        let engine = Arc::new(SolverEngine::new());
        let handle = engine.start(config(2)).unwrap();
        let outcome = handle.join().unwrap();
        assert_eq!(outcome.solutions.len(), 2);
        assert_eq!(engine.solutions().unwrap().len(), 2);
    }

    #[test]
    fn test_cancel_before_start_is_ignored() {
        let engine = SolverEngine::new();
        engine.cancel();
        let outcome = engine.solve(&config(0)).unwrap();
        assert_eq!(outcome.reason, TerminationReason::Exhausted);
    }
}
