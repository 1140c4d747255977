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
use crate::stats::OutcomeCounts;
use imagetrain_model::solution::Solution;
use std::time::Duration;

/// The progress notification raised once per processed job.
///
/// A job whose terminal train was accepted carries that solution, with its
/// weight already assigned.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    outcome: StepOutcome,
    queue_depth: usize,
    solutions: u64,
    solution: Option<Box<Solution>>,
}

impl ProgressEvent {
    /// Creates the event for a job that ended with `outcome`.
    #[inline]
    pub fn step(outcome: StepOutcome, queue_depth: usize, solutions: u64) -> Self {
        Self {
            outcome,
            queue_depth,
            solutions,
            solution: None,
        }
    }

    /// Attaches the solution the job produced.
    #[inline]
    pub fn with_solution(mut self, solution: Solution) -> Self {
        self.solution = Some(Box::new(solution));
        self
    }

    /// The job outcome this event reports.
    #[inline]
    pub fn outcome(&self) -> StepOutcome {
        self.outcome
    }

    /// Jobs waiting in the queue right after this one was handled.
    #[inline]
    pub fn queue_depth(&self) -> usize {
        self.queue_depth
    }

    /// Accepted solutions so far.
    #[inline]
    pub fn solutions(&self) -> u64 {
        self.solutions
    }

    /// The solution accepted by this job, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_deref()
    }
}

/// Aggregate state of a run at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub outcomes: OutcomeCounts,
    pub queue_depth: usize,
    pub solutions: u64,
    pub perfect_solutions: u64,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Number of jobs processed.
    #[inline]
    pub fn jobs(&self) -> u64 {
        self.outcomes.total()
    }
}

impl std::fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1}s: {} jobs, {} queued, {} solutions ({} perfect)",
            self.elapsed.as_secs_f32(),
            self.jobs(),
            self.queue_depth,
            self.solutions,
            self.perfect_solutions
        )
    }
}
