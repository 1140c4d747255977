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

//! # Solver Configuration
//!
//! `SolverConfiguration` bundles everything a solving run needs: the two
//! fixed endpoints, the candidate inventory, the backfocus tolerance and the
//! optional stop conditions. It is built fluently with
//! `SolverConfigurationBuilder` and checked with `validate` before any
//! search starts, so the engine never sees an inconsistent setup.

use crate::item::{Item, ItemId};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use thiserror::Error;

/// Default backfocus tolerance: 5% of the required distance.
pub const DEFAULT_BACKFOCUS_TOLERANCE: f64 = 0.05;

/// Default capacity of the progress event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// Default interval between aggregate progress snapshots.
pub const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_secs(1);

/// Reasons a configuration is rejected.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    #[error("at least two candidate items are required, found {found}")]
    TooFewCandidates { found: usize },
    #[error("backfocus tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),
    #[error("maximum chain length must be at least 2, got {0}")]
    ChainCapTooSmall(usize),
    #[error("maximum chain length {cap} exceeds the {candidates} candidate items")]
    ChainCapExceedsInventory { cap: usize, candidates: usize },
    #[error("stop limit `{0}` must be greater than zero")]
    ZeroStopLimit(&'static str),
    #[error("item {id} is invalid: {reason}")]
    InvalidItem { id: ItemId, reason: &'static str },
    #[error("item {0} appears more than once")]
    DuplicateItem(ItemId),
    #[error("event channel capacity must be greater than zero")]
    InvalidEventCapacity,
}

/// Everything a solving run needs.
#[derive(Clone, Debug)]
pub struct SolverConfiguration {
    target: Item,
    sensor: Item,
    candidates: Vec<Item>,
    backfocus_tolerance: f64,
    max_chain_length: Option<usize>,
    stop_after_solutions: Option<u64>,
    stop_after_perfect_solutions: Option<u64>,
    time_limit: Option<Duration>,
    workers: usize,
    cancellation: Option<Arc<AtomicBool>>,
    event_capacity: usize,
    snapshot_interval: Duration,
}

impl SolverConfiguration {
    /// Starts building a configuration between `target` and `sensor`.
    pub fn builder(target: Item, sensor: Item) -> SolverConfigurationBuilder {
        SolverConfigurationBuilder::new(target, sensor)
    }

    #[inline]
    pub fn target(&self) -> &Item {
        &self.target
    }

    #[inline]
    pub fn sensor(&self) -> &Item {
        &self.sensor
    }

    #[inline]
    pub fn candidates(&self) -> &[Item] {
        &self.candidates
    }

    /// Allowed deviance as a fraction of the required backfocus.
    #[inline]
    pub fn backfocus_tolerance(&self) -> f64 {
        self.backfocus_tolerance
    }

    /// Maximum number of candidate items in one train.
    #[inline]
    pub fn max_chain_length(&self) -> Option<usize> {
        self.max_chain_length
    }

    #[inline]
    pub fn stop_after_solutions(&self) -> Option<u64> {
        self.stop_after_solutions
    }

    #[inline]
    pub fn stop_after_perfect_solutions(&self) -> Option<u64> {
        self.stop_after_perfect_solutions
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Number of worker threads. Zero runs inline on the caller's thread.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// External cooperative cancellation flag, if any.
    #[inline]
    pub fn cancellation(&self) -> Option<&Arc<AtomicBool>> {
        self.cancellation.as_ref()
    }

    #[inline]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    #[inline]
    pub fn snapshot_interval(&self) -> Duration {
        self.snapshot_interval
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.len() < 2 {
            return Err(ConfigError::TooFewCandidates {
                found: self.candidates.len(),
            });
        }
        if !self.backfocus_tolerance.is_finite() || self.backfocus_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.backfocus_tolerance));
        }
        if let Some(cap) = self.max_chain_length {
            if cap < 2 {
                return Err(ConfigError::ChainCapTooSmall(cap));
            }
            if cap > self.candidates.len() {
                return Err(ConfigError::ChainCapExceedsInventory {
                    cap,
                    candidates: self.candidates.len(),
                });
            }
        }
        if self.stop_after_solutions == Some(0) {
            return Err(ConfigError::ZeroStopLimit("stop_after_solutions"));
        }
        if self.stop_after_perfect_solutions == Some(0) {
            return Err(ConfigError::ZeroStopLimit("stop_after_perfect_solutions"));
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroStopLimit("time_limit"));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidEventCapacity);
        }

        let mut seen = FxHashSet::default();
        for item in self.items() {
            validate_item(item)?;
            if !seen.insert(item.id()) {
                return Err(ConfigError::DuplicateItem(item.id()));
            }
        }
        Ok(())
    }

    /// Iterates target, sensor and all candidates.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        [&self.target, &self.sensor]
            .into_iter()
            .chain(self.candidates.iter())
    }
}

fn validate_item(item: &Item) -> Result<(), ConfigError> {
    let checks: [(f64, &'static str); 3] = [
        (item.length_mm(), "length must be finite and non-negative"),
        (item.backfocus_mm(), "backfocus must be finite and non-negative"),
        (item.thread_recess_mm(), "thread recess must be finite and non-negative"),
    ];
    for (value, reason) in checks {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidItem { id: item.id(), reason });
        }
    }
    if item.thread_recess_mm() > item.length_mm() {
        return Err(ConfigError::InvalidItem {
            id: item.id(),
            reason: "thread recess exceeds length",
        });
    }
    Ok(())
}

/// Fluent builder for `SolverConfiguration`.
#[derive(Clone, Debug)]
pub struct SolverConfigurationBuilder {
    config: SolverConfiguration,
}

impl SolverConfigurationBuilder {
    pub fn new(target: Item, sensor: Item) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            config: SolverConfiguration {
                target,
                sensor,
                candidates: Vec::new(),
                backfocus_tolerance: DEFAULT_BACKFOCUS_TOLERANCE,
                max_chain_length: None,
                stop_after_solutions: None,
                stop_after_perfect_solutions: None,
                time_limit: None,
                workers,
                cancellation: None,
                event_capacity: DEFAULT_EVENT_CAPACITY,
                snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
            },
        }
    }

    pub fn candidate(mut self, item: Item) -> Self {
        self.config.candidates.push(item);
        self
    }

    pub fn candidates<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        self.config.candidates.extend(items);
        self
    }

    pub fn backfocus_tolerance(mut self, tolerance: f64) -> Self {
        self.config.backfocus_tolerance = tolerance;
        self
    }

    pub fn max_chain_length(mut self, cap: usize) -> Self {
        self.config.max_chain_length = Some(cap);
        self
    }

    pub fn stop_after_solutions(mut self, limit: u64) -> Self {
        self.config.stop_after_solutions = Some(limit);
        self
    }

    pub fn stop_after_perfect_solutions(mut self, limit: u64) -> Self {
        self.config.stop_after_perfect_solutions = Some(limit);
        self
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.config.cancellation = Some(flag);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn snapshot_interval(mut self, interval: Duration) -> Self {
        self.config.snapshot_interval = interval;
        self
    }

    /// Returns the configuration without validating it.
    pub fn build(self) -> SolverConfiguration {
        self.config
    }

    /// Returns the configuration if it validates.
    pub fn try_build(self) -> Result<SolverConfiguration, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
