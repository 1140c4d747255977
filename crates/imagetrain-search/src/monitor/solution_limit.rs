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

//! # Solution Limit Monitors
//!
//! Stop a run once a shared counter reaches a limit. The counter is owned by
//! the result accumulator and incremented there on every accepted solution;
//! the monitors only read it, so all workers observe the same global count.
//!
//! Two flavours exist: one watching the accepted-solution counter
//! (`TerminationReason::SolutionLimit`) and one watching the
//! perfect-solution counter (`TerminationReason::PerfectSolutionLimit`).

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use crate::result::TerminationReason;
use imagetrain_model::{config::SolverConfiguration, solution::Solution};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monitor that terminates the search when a shared counter reaches a limit.
#[derive(Debug)]
pub struct SolutionLimitMonitor<'a> {
    counter: &'a AtomicU64,
    limit: u64,
    reason: TerminationReason,
    name: &'static str,
}

impl<'a> SolutionLimitMonitor<'a> {
    /// Watches the number of accepted solutions.
    #[inline]
    pub fn accepted(counter: &'a AtomicU64, limit: u64) -> Self {
        Self {
            counter,
            limit,
            reason: TerminationReason::SolutionLimit,
            name: "SolutionLimitMonitor",
        }
    }

    /// Watches the number of perfect solutions.
    #[inline]
    pub fn perfect(counter: &'a AtomicU64, limit: u64) -> Self {
        Self {
            counter,
            limit,
            reason: TerminationReason::PerfectSolutionLimit,
            name: "PerfectSolutionLimitMonitor",
        }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[inline]
    fn reached_limit(&self) -> bool {
        self.counter.load(Ordering::Relaxed) >= self.limit
    }
}

impl SearchMonitor for SolutionLimitMonitor<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn on_enter_search(&mut self, _config: &SolverConfiguration) {}

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _solution: &Solution) {}

    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate(self.reason)
        } else {
            SearchCommand::Continue
        }
    }
}
