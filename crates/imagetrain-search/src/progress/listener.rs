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

use crate::progress::event::{ProgressEvent, ProgressSnapshot};
use crate::result::TerminationReason;
use crate::stats::SolverStatistics;

/// Receives progress of a run.
///
/// Listeners are driven from a single reporter thread, never from the
/// workers, so a slow listener cannot stall the search. They must still be
/// `Send + Sync` because the engine shares them across runs.
pub trait ProgressListener: Send + Sync {
    fn name(&self) -> &str;

    /// A run is starting.
    fn on_started(&self, _candidates: usize, _workers: usize) {}

    /// A worker event was delivered.
    fn on_event(&self, event: &ProgressEvent);

    /// Periodic aggregate state.
    fn on_snapshot(&self, snapshot: &ProgressSnapshot);

    /// The run reached quiescence.
    fn on_finished(&self, reason: TerminationReason, statistics: &SolverStatistics);
}

impl std::fmt::Debug for dyn ProgressListener + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProgressListener({})", self.name())
    }
}

/// A listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl ProgressListener for NoOpListener {
    fn name(&self) -> &str {
        "NoOpListener"
    }

    fn on_event(&self, _event: &ProgressEvent) {}

    fn on_snapshot(&self, _snapshot: &ProgressSnapshot) {}

    fn on_finished(&self, _reason: TerminationReason, _statistics: &SolverStatistics) {}
}
