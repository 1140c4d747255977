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

mod common;

use common::{large_inventory, m42_endpoints, scenario_55};
use imagetrain_engine::{SolveError, SolverEngine};
use imagetrain_model::config::{ConfigError, SolverConfiguration};
use imagetrain_model::connector::SizeClass;
use imagetrain_model::item::spacer;
use imagetrain_search::outcome::StepOutcome;
use imagetrain_search::progress::event::{ProgressEvent, ProgressSnapshot};
use imagetrain_search::progress::listener::ProgressListener;
use imagetrain_search::result::TerminationReason;
use imagetrain_search::stats::SolverStatistics;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// An inventory whose exhaustive search would take far longer than a test.
fn endless(workers: usize) -> SolverConfiguration {
    let (target, sensor) = m42_endpoints(1_000.0);
    SolverConfiguration::builder(target, sensor)
        .candidates(large_inventory(14))
        .backfocus_tolerance(0.0)
        .workers(workers)
        .build()
}

/// A small inventory that finishes quickly and has several solutions.
fn finite(workers: usize) -> SolverConfiguration {
    let (target, sensor) = m42_endpoints(10.0);
    SolverConfiguration::builder(target, sensor)
        .candidates(large_inventory(10))
        .backfocus_tolerance(0.05)
        .workers(workers)
        .build()
}

#[test]
fn test_cancel_right_after_start() {
    let engine = Arc::new(SolverEngine::new());
    let started = Instant::now();
    let handle = engine.start(endless(4)).unwrap();
    engine.cancel();

    let outcome = handle.join().unwrap();
    assert_eq!(outcome.reason, TerminationReason::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(outcome.statistics.outcomes.get(StepOutcome::Cancelled) > 0);
    assert!(!engine.is_running());
    assert_eq!(engine.solutions().unwrap(), outcome.solutions);
}

#[test]
fn test_cancelled_run_is_subset_of_full_run() {
    let full = SolverEngine::new()
        .solve(&finite(2))
        .unwrap()
        .solutions
        .iter()
        .map(|s| s.signature().to_vec())
        .collect::<BTreeSet<_>>();
    assert!(!full.is_empty());

    let engine = Arc::new(SolverEngine::new());
    let handle = engine.start(finite(2)).unwrap();
    engine.cancel();
    let partial = handle.join().unwrap();

    assert!(matches!(
        partial.reason,
        TerminationReason::Cancelled | TerminationReason::Exhausted
    ));
    for solution in &partial.solutions {
        assert!(full.contains(solution.signature()));
    }
}

#[test]
fn test_external_token_cancels_before_first_expansion() {
    let token = Arc::new(AtomicBool::new(true));
    let (target, sensor) = m42_endpoints(10.0);
    let config = SolverConfiguration::builder(target, sensor)
        .candidates(large_inventory(10))
        .cancellation(Arc::clone(&token))
        .workers(0)
        .build();
    let outcome = SolverEngine::new().solve(&config).unwrap();

    assert_eq!(outcome.reason, TerminationReason::Cancelled);
    assert!(!outcome.has_solution());
    assert_eq!(outcome.statistics.jobs_processed, 1);
    assert_eq!(outcome.statistics.outcomes.get(StepOutcome::Cancelled), 1);
}

#[test]
fn test_second_run_is_rejected_while_busy() {
    let engine = Arc::new(SolverEngine::new());
    let handle = engine.start(endless(2)).unwrap();

    assert!(matches!(engine.solve(&finite(0)), Err(SolveError::Busy)));
    assert!(matches!(engine.start(finite(0)), Err(SolveError::Busy)));
    assert!(matches!(engine.solutions(), Err(SolveError::NotFinished)));

    engine.cancel();
    handle.join().unwrap();
    assert!(engine.solve(&finite(0)).is_ok());
}

#[test]
fn test_invalid_configuration_fails_synchronously() {
    let (target, sensor) = m42_endpoints(10.0);
    let config = SolverConfiguration::builder(target, sensor)
        .candidates([spacer(SizeClass::M42, 1.0), spacer(SizeClass::M42, 2.0)])
        .backfocus_tolerance(-0.5)
        .build();
    let engine = Arc::new(SolverEngine::new());

    match engine.start(config) {
        Err(SolveError::Config(ConfigError::InvalidTolerance(t))) => assert_eq!(t, -0.5),
        other => panic!("expected InvalidTolerance, got {:?}", other),
    }
    assert!(!engine.is_running());
}

#[test]
fn test_time_limit_stops_search() {
    let (target, sensor) = m42_endpoints(1_000.0);
    let config = SolverConfiguration::builder(target, sensor)
        .candidates(large_inventory(14))
        .backfocus_tolerance(0.0)
        .time_limit(Duration::from_millis(1))
        .workers(2)
        .build();
    let outcome = SolverEngine::new().solve(&config).unwrap();
    assert_eq!(outcome.reason, TerminationReason::TimeLimit);
}

#[derive(Default)]
struct Recorder {
    started: AtomicBool,
    steps: AtomicU64,
    solved: AtomicU64,
    found: Mutex<Vec<f64>>,
    snapshots: Mutex<Vec<ProgressSnapshot>>,
    finished: Mutex<Option<(TerminationReason, SolverStatistics)>>,
}

impl ProgressListener for Recorder {
    fn name(&self) -> &str {
        "Recorder"
    }

    fn on_started(&self, candidates: usize, _workers: usize) {
        assert_eq!(candidates, 3);
        self.started.store(true, Ordering::Relaxed);
    }

    fn on_event(&self, event: &ProgressEvent) {
        self.steps.fetch_add(1, Ordering::Relaxed);
        if event.outcome() == StepOutcome::Solved {
            self.solved.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(solution) = event.solution() {
            assert_eq!(event.outcome(), StepOutcome::Solved);
            self.found.lock().push(solution.length_mm());
        }
    }

    fn on_snapshot(&self, snapshot: &ProgressSnapshot) {
        self.snapshots.lock().push(*snapshot);
    }

    fn on_finished(&self, reason: TerminationReason, statistics: &SolverStatistics) {
        *self.finished.lock() = Some((reason, statistics.clone()));
    }
}

#[test]
fn test_listener_receives_progress() {
    let recorder = Arc::new(Recorder::default());
    let engine = SolverEngine::with_listener(recorder.clone());
    let outcome = engine.solve(&scenario_55(0.0).workers(2).build()).unwrap();

    assert!(recorder.started.load(Ordering::Relaxed));
    assert_eq!(
        recorder.steps.load(Ordering::Relaxed),
        outcome.statistics.jobs_processed
    );
    // One event per job: an accepted solution rides on its job's event.
    assert_eq!(
        recorder.solved.load(Ordering::Relaxed),
        outcome.statistics.outcomes.get(StepOutcome::Solved)
    );
    assert_eq!(*recorder.found.lock(), vec![55.0]);

    let snapshots = recorder.snapshots.lock();
    let last = snapshots.last().unwrap();
    assert_eq!(last.jobs(), outcome.statistics.jobs_processed);
    assert_eq!(last.solutions, 1);
    assert_eq!(last.queue_depth, 0);

    let finished = recorder.finished.lock();
    let (reason, statistics) = finished.as_ref().unwrap();
    assert_eq!(*reason, TerminationReason::Exhausted);
    assert_eq!(statistics.events_dropped, 0);
}
