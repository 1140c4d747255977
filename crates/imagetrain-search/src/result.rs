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

use crate::stats::SolverStatistics;
use imagetrain_model::solution::Solution;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// Every branch was explored to a terminal outcome.
    Exhausted,
    /// Cancellation was requested.
    Cancelled,
    /// The configured number of accepted solutions was reached.
    SolutionLimit,
    /// The configured number of perfect solutions was reached.
    PerfectSolutionLimit,
    /// The wall-clock budget ran out.
    TimeLimit,
}

impl TerminationReason {
    /// Returns `true` if the solution set is complete.
    #[inline]
    pub fn is_exhaustive(&self) -> bool {
        matches!(self, TerminationReason::Exhausted)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "Search Exhausted"),
            TerminationReason::Cancelled => write!(f, "Cancelled"),
            TerminationReason::SolutionLimit => write!(f, "Aborted: solution limit reached"),
            TerminationReason::PerfectSolutionLimit => {
                write!(f, "Aborted: perfect solution limit reached")
            }
            TerminationReason::TimeLimit => write!(f, "Aborted: time limit reached"),
        }
    }
}

/// The result of a finished run.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Accepted solutions, ranked by weight.
    pub solutions: Vec<Solution>,
    pub reason: TerminationReason,
    pub statistics: SolverStatistics,
}

impl SolveOutcome {
    #[inline]
    pub fn new(
        solutions: Vec<Solution>,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            solutions,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// The highest-ranked solution, if any.
    #[inline]
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} with {} solution(s) after {} jobs",
            self.reason,
            self.solutions.len(),
            self.statistics.jobs_processed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SolverStatisticsBuilder;

    #[test]
    fn test_reason_display() {
        assert_eq!(TerminationReason::Exhausted.to_string(), "Search Exhausted");
        assert_eq!(
            TerminationReason::TimeLimit.to_string(),
            "Aborted: time limit reached"
        );
        assert!(TerminationReason::Exhausted.is_exhaustive());
        assert!(!TerminationReason::Cancelled.is_exhaustive());
    }

    #[test]
    fn test_empty_outcome() {
        let outcome = SolveOutcome::new(
            Vec::new(),
            TerminationReason::Cancelled,
            SolverStatisticsBuilder::new().build(),
        );
        assert!(!outcome.has_solution());
        assert!(outcome.best().is_none());
        assert_eq!(outcome.to_string(), "Cancelled with 0 solution(s) after 0 jobs");
    }
}
