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

/// How the processing of a single search job ended.
///
/// Only `Forked` produces further work; every other variant terminates its
/// branch. None of them is an error.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum StepOutcome {
    /// Child jobs were enqueued.
    Forked,
    /// No available item can follow the tail, or the chain cap is reached.
    DeadEnd,
    /// No available item can ever reach the sensor.
    NoSensorConnection,
    /// The chain is already too long, or a finished train misses the tolerance.
    OutsideTolerance,
    /// A new train was accepted.
    Solved,
    /// A finished train matched one already accepted.
    Duplicate,
    /// Processing stopped because of cancellation or a stop condition.
    Cancelled,
}

impl StepOutcome {
    /// Number of distinct outcomes.
    pub const COUNT: usize = 7;

    /// Every outcome, in declaration order.
    pub const ALL: [StepOutcome; Self::COUNT] = [
        StepOutcome::Forked,
        StepOutcome::DeadEnd,
        StepOutcome::NoSensorConnection,
        StepOutcome::OutsideTolerance,
        StepOutcome::Solved,
        StepOutcome::Duplicate,
        StepOutcome::Cancelled,
    ];

    /// Dense position of this outcome, usable as an array index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` if this outcome ends the branch.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, StepOutcome::Forked)
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepOutcome::Forked => "Forked",
            StepOutcome::DeadEnd => "DeadEnd",
            StepOutcome::NoSensorConnection => "NoSensorConnection",
            StepOutcome::OutsideTolerance => "OutsideTolerance",
            StepOutcome::Solved => "Solved",
            StepOutcome::Duplicate => "Duplicate",
            StepOutcome::Cancelled => "Cancelled",
        };
        write!(f, "{}", name)
    }
}
