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
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Per-outcome job counts at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutcomeCounts {
    counts: [u64; StepOutcome::COUNT],
}

impl OutcomeCounts {
    /// Returns the count for `outcome`.
    #[inline]
    pub fn get(&self, outcome: StepOutcome) -> u64 {
        self.counts[outcome.index()]
    }

    /// Sum over all outcomes.
    #[inline]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns these counts with `outcome` set to `count`.
    #[inline]
    pub fn with(mut self, outcome: StepOutcome, count: u64) -> Self {
        self.counts[outcome.index()] = count;
        self
    }
}

impl std::fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, outcome) in StepOutcome::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", outcome, self.get(*outcome))?;
        }
        Ok(())
    }
}

/// Live counters shared by all workers of a run.
///
/// These are authoritative: progress events may be dropped, counters never are.
#[derive(Debug, Default)]
pub struct OutcomeCounters {
    by_outcome: [AtomicU64; StepOutcome::COUNT],
    queue_high_water: AtomicUsize,
    events_dropped: AtomicU64,
}

impl OutcomeCounters {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one processed job.
    #[inline]
    pub fn record(&self, outcome: StepOutcome) {
        self.by_outcome[outcome.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Records an observed queue depth.
    #[inline]
    pub fn observe_queue_depth(&self, depth: usize) {
        self.queue_high_water.fetch_max(depth, Ordering::Relaxed);
    }

    /// Records a progress event that could not be delivered.
    #[inline]
    pub fn record_dropped_event(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn count(&self, outcome: StepOutcome) -> u64 {
        self.by_outcome[outcome.index()].load(Ordering::Relaxed)
    }

    /// Number of jobs processed so far.
    #[inline]
    pub fn jobs(&self) -> u64 {
        self.by_outcome
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    #[inline]
    pub fn queue_high_water(&self) -> usize {
        self.queue_high_water.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    /// Copies the current per-outcome counts.
    pub fn snapshot(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for outcome in StepOutcome::ALL {
            counts = counts.with(outcome, self.count(outcome));
        }
        counts
    }
}

/// Statistics collected during the solving process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Number of jobs processed.
    pub jobs_processed: u64,
    /// Jobs per outcome.
    pub outcomes: OutcomeCounts,
    /// Largest queue depth observed.
    pub queue_high_water: usize,
    /// Number of distinct accepted solutions.
    pub solutions_accepted: u64,
    /// Number of accepted solutions with zero deviance.
    pub perfect_solutions: u64,
    /// Progress events dropped because the channel was full.
    pub events_dropped: u64,
    /// Number of worker threads. Zero means the run was inline.
    pub used_threads: usize,
    /// Total duration of the solving process.
    pub solve_duration: std::time::Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Jobs Processed: {}", self.jobs_processed)?;
        writeln!(f, "  Outcomes: {}", self.outcomes)?;
        writeln!(f, "  Queue High Water: {}", self.queue_high_water)?;
        writeln!(f, "  Solutions Accepted: {}", self.solutions_accepted)?;
        writeln!(f, "  Perfect Solutions: {}", self.perfect_solutions)?;
        writeln!(f, "  Events Dropped: {}", self.events_dropped)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolverStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    stats: SolverStatistics,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            stats: SolverStatistics {
                jobs_processed: 0,
                outcomes: OutcomeCounts::default(),
                queue_high_water: 0,
                solutions_accepted: 0,
                perfect_solutions: 0,
                events_dropped: 0,
                used_threads: 0,
                solve_duration: std::time::Duration::ZERO,
            },
        }
    }

    /// Copies jobs, outcomes, high water and dropped events from live counters.
    #[inline]
    pub fn counters(mut self, counters: &OutcomeCounters) -> Self {
        let outcomes = counters.snapshot();
        self.stats.jobs_processed = outcomes.total();
        self.stats.outcomes = outcomes;
        self.stats.queue_high_water = counters.queue_high_water();
        self.stats.events_dropped = counters.events_dropped();
        self
    }

    #[inline]
    pub fn solutions_accepted(mut self, solutions_accepted: u64) -> Self {
        self.stats.solutions_accepted = solutions_accepted;
        self
    }

    #[inline]
    pub fn perfect_solutions(mut self, perfect_solutions: u64) -> Self {
        self.stats.perfect_solutions = perfect_solutions;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.stats.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: std::time::Duration) -> Self {
        self.stats.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_counters_record_and_snapshot() {
        let counters = OutcomeCounters::new();
        counters.record(StepOutcome::Forked);
        counters.record(StepOutcome::Forked);
        counters.record(StepOutcome::Solved);
        counters.observe_queue_depth(5);
        counters.observe_queue_depth(3);
        counters.record_dropped_event();

        assert_eq!(counters.jobs(), 3);
        assert_eq!(counters.count(StepOutcome::Forked), 2);
        assert_eq!(counters.queue_high_water(), 5);
        assert_eq!(counters.events_dropped(), 1);

        let snap = counters.snapshot();
        assert_eq!(snap.get(StepOutcome::Solved), 1);
        assert_eq!(snap.get(StepOutcome::DeadEnd), 0);
        assert_eq!(snap.total(), 3);
    }

    #[test]
    fn test_counters_are_shared_across_threads() {
        let counters = Arc::new(OutcomeCounters::new());
        let handles = (0..4)
            .map(|_| {
                let c = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        c.record(StepOutcome::DeadEnd);
                    }
                })
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counters.count(StepOutcome::DeadEnd), 400);
    }

    #[test]
    fn test_builder_constructs_expected_struct() {
        let counters = OutcomeCounters::new();
        counters.record(StepOutcome::Duplicate);
        let stats = SolverStatisticsBuilder::new()
            .counters(&counters)
            .solutions_accepted(3)
            .perfect_solutions(1)
            .used_threads(8)
            .solve_duration(Duration::from_millis(1234))
            .build();
        assert_eq!(stats.jobs_processed, 1);
        assert_eq!(stats.outcomes.get(StepOutcome::Duplicate), 1);
        assert_eq!(stats.solutions_accepted, 3);
        assert_eq!(stats.perfect_solutions, 1);
        assert_eq!(stats.used_threads, 8);
        assert_eq!(stats.solve_duration, Duration::from_millis(1234));
    }

    #[test]
    fn test_display_formats_all_fields() {
        let stats = SolverStatisticsBuilder::new()
            .solutions_accepted(2)
            .used_threads(4)
            .solve_duration(Duration::from_millis(1234))
            .build();
        let rendered = format!("{}", stats);
        assert!(rendered.contains("Solver Statistics:"), "missing header");
        assert!(rendered.contains("Solutions Accepted: 2"));
        assert!(rendered.contains("Used Threads: 4"));
        assert!(rendered.contains("Forked: 0"));
        assert!(
            rendered.contains("Solve Duration (secs): 1.234"),
            "duration not formatted to 3 decimals"
        );
    }
}
