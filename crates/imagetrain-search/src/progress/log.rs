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

use crate::outcome::StepOutcome;
use crate::progress::event::{ProgressEvent, ProgressSnapshot};
use crate::progress::listener::ProgressListener;
use crate::result::TerminationReason;
use crate::stats::SolverStatistics;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 98;

/// Prints a fixed-width progress table to stdout.
///
/// Rows are written for snapshots at most once per `log_interval`.
#[derive(Debug)]
pub struct LogListener {
    log_interval: Duration,
    last_log_time: Mutex<Option<Instant>>,
}

impl LogListener {
    pub fn new(log_interval: Duration) -> Self {
        Self {
            log_interval,
            last_log_time: Mutex::new(None),
        }
    }

    fn print_header(&self) {
        println!(
            "{:<9} | {:<12} | {:<8} | {:<10} | {:<10} | {:<10} | {:<10} | {:<9}",
            "Elapsed", "Jobs", "Queued", "Solutions", "Perfect", "Dead Ends", "No Sensor", "Tolerance"
        );
        println!("{}", "-".repeat(RULE_WIDTH));
    }

    fn format_row(snapshot: &ProgressSnapshot) -> String {
        let elapsed_field = format!("{:.1}s", snapshot.elapsed.as_secs_f32());
        format!(
            "{:<9} | {:<12} | {:<8} | {:<10} | {:<10} | {:<10} | {:<10} | {:<9}",
            elapsed_field,
            snapshot.jobs(),
            snapshot.queue_depth,
            snapshot.solutions,
            snapshot.perfect_solutions,
            snapshot.outcomes.get(StepOutcome::DeadEnd),
            snapshot.outcomes.get(StepOutcome::NoSensorConnection),
            snapshot.outcomes.get(StepOutcome::OutsideTolerance),
        )
    }
}

impl Default for LogListener {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl std::fmt::Display for LogListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogListener(log_interval: {}ms)",
            self.log_interval.as_millis()
        )
    }
}

impl ProgressListener for LogListener {
    fn name(&self) -> &str {
        "LogListener"
    }

    fn on_started(&self, candidates: usize, workers: usize) {
        *self.last_log_time.lock() = None;
        println!("Solving with {} candidate items on {} worker(s).", candidates, workers);
        self.print_header();
    }

    fn on_event(&self, _event: &ProgressEvent) {}

    fn on_snapshot(&self, snapshot: &ProgressSnapshot) {
        let mut last = self.last_log_time.lock();
        let now = Instant::now();
        let due = match *last {
            Some(at) => now.duration_since(at) >= self.log_interval,
            None => true,
        };
        if due {
            println!("{}", Self::format_row(snapshot));
            *last = Some(now);
        }
    }

    fn on_finished(&self, reason: TerminationReason, statistics: &SolverStatistics) {
        println!("{}", "-".repeat(RULE_WIDTH));
        println!(
            "Search finished: {} ({} solutions, {} jobs, {:.3}s).",
            reason,
            statistics.solutions_accepted,
            statistics.jobs_processed,
            statistics.solve_duration.as_secs_f64()
        );
    }
}
