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

use imagetrain_model::chain::ChainError;
use imagetrain_model::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by `SolverEngine`.
///
/// Branch outcomes such as dead ends or duplicates are not errors; they are
/// reported through the progress stream and the statistics.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("a run is already in progress on this engine")]
    Busy,
    #[error("chain construction failed: {0}")]
    Structural(#[from] ChainError),
    #[error("a solver worker panicked")]
    WorkerPanicked,
    #[error("no completed run to read solutions from")]
    NotFinished,
    #[error("failed to spawn solver thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl SolveError {
    /// Returns `true` if the error was raised before any search started.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SolveError::Config(_) | SolveError::Busy)
    }
}
