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

//! # Job Expansion
//!
//! The branch-and-bound step. Given one job, `Expander::expand` either
//! evaluates a finished train or decides, in this order:
//!
//! 1. fork a terminal child if the tail mates with the sensor,
//! 2. consume the tail,
//! 3. `NoSensorConnection` if no available item can ever reach the sensor,
//! 4. `DeadEnd` if the chain cap is reached or nothing can follow the tail,
//! 5. `OutsideTolerance` if the chain is already too long,
//! 6. otherwise fork one child per compatible item orientation.
//!
//! Cancellation is handled by the caller before a job reaches the expander.

use crate::catalog::{Catalog, SENSOR};
use crate::dependency::DependencyTable;
use crate::job::Job;
use crate::ranking;
use imagetrain_model::chain::{Chain, ChainError, Placement};
use imagetrain_model::compat::compatible;
use imagetrain_model::config::SolverConfiguration;
use imagetrain_model::index::ItemIndex;
use imagetrain_model::item::Item;
use imagetrain_model::solution::{PERFECT_EPSILON_MM, Solution};
use imagetrain_search::outcome::StepOutcome;
use smallvec::SmallVec;

/// What processing a job produced.
#[derive(Debug, Clone)]
pub enum Expansion {
    /// The branch ended or forked; nothing else to hand over.
    Outcome(StepOutcome),
    /// A finished train within tolerance, weight assigned, awaiting dedup.
    Terminal(Solution),
}

/// Required and achieved backfocus distance of a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub required_mm: f64,
    pub achieved_mm: f64,
}

impl Measurement {
    #[inline]
    pub fn deviance(&self) -> f64 {
        (self.required_mm - self.achieved_mm).abs()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    catalog: &'a Catalog,
    dependencies: &'a DependencyTable,
    tolerance: f64,
    max_chain_length: Option<usize>,
}

impl<'a> Expander<'a> {
    pub fn new(
        catalog: &'a Catalog,
        dependencies: &'a DependencyTable,
        config: &SolverConfiguration,
    ) -> Self {
        Self {
            catalog,
            dependencies,
            tolerance: config.backfocus_tolerance(),
            max_chain_length: config.max_chain_length(),
        }
    }

    /// Processes `job`, appending any child jobs to `children`.
    ///
    /// # Errors
    ///
    /// Returns a `ChainError` if a child chain cannot be assembled.
    pub fn expand(&self, job: &Job, children: &mut Vec<Job>) -> Result<Expansion, ChainError> {
        if job.is_terminal() {
            return Ok(self.finish(job));
        }

        let tail = job.chain().tail();
        let tail_end = self.catalog.oriented(tail).sensor_end();
        let mut forked = false;

        if compatible(tail_end, self.catalog.sensor().target_end()) {
            children.push(job.child(job.availability().clone(), Placement::forward(SENSOR))?);
            forked = true;
        }

        let mut availability = job.availability().clone();
        availability.remove(tail.item().get());

        if !availability.intersects(self.dependencies.sensor_reachable()) {
            return Ok(Expansion::Outcome(StepOutcome::NoSensorConnection));
        }

        let dependents = self.dependencies.dependents(tail.item());
        let cap_reached = self
            .max_chain_length
            .is_some_and(|cap| job.num_candidates() >= cap);
        if cap_reached || !availability.intersects(dependents) {
            return Ok(Expansion::Outcome(StepOutcome::DeadEnd));
        }

        if self.tolerance > 0.0 && !availability.intersects(self.dependencies.backfocus_items()) {
            let m = self.measure(job.chain());
            if m.achieved_mm - m.required_mm > self.allowed_deviance(m.required_mm) {
                return Ok(Expansion::Outcome(StepOutcome::OutsideTolerance));
            }
        }

        for index in availability.intersection(dependents) {
            for placement in self.catalog.orientations(ItemIndex::new(index)) {
                if compatible(tail_end, self.catalog.oriented(placement).target_end()) {
                    children.push(job.child(availability.clone(), placement)?);
                    forked = true;
                }
            }
        }

        let outcome = if forked {
            StepOutcome::Forked
        } else {
            StepOutcome::DeadEnd
        };
        Ok(Expansion::Outcome(outcome))
    }

    /// Measures `chain` up to, but excluding, the sensor.
    ///
    /// The reference point is the last item with a backfocus requirement;
    /// only the items after it count toward the achieved length, plus the
    /// sensor's own depth. Without such an item nothing is required and all
    /// candidates count.
    pub fn measure(&self, chain: &Chain) -> Measurement {
        let items = chain
            .placements()
            .filter(|p| p.item() != SENSOR)
            .map(|p| self.catalog.oriented(p))
            .collect::<SmallVec<[&Item; 16]>>();

        let reference = items.iter().rposition(|item| item.defines_backfocus());
        let (required_mm, counted) = match reference {
            Some(position) => (items[position].backfocus_mm(), &items[position + 1..]),
            None => (0.0, items.get(1..).unwrap_or(&[])),
        };
        let achieved_mm = counted
            .iter()
            .map(|item| item.effective_length_mm())
            .sum::<f64>()
            + self.catalog.sensor().backfocus_mm();

        Measurement {
            required_mm,
            achieved_mm,
        }
    }

    #[inline]
    fn allowed_deviance(&self, required_mm: f64) -> f64 {
        required_mm * self.tolerance + PERFECT_EPSILON_MM
    }

    fn finish(&self, job: &Job) -> Expansion {
        let m = self.measure(job.chain());
        if m.deviance() > self.allowed_deviance(m.required_mm) {
            return Expansion::Outcome(StepOutcome::OutsideTolerance);
        }

        let items = job
            .chain()
            .placements()
            .skip(1)
            .filter(|p| p.item() != SENSOR)
            .map(|p| self.catalog.oriented(p).clone())
            .collect::<Vec<_>>();
        let solution = Solution::new(
            self.catalog.target().clone(),
            self.catalog.sensor().clone(),
            items,
            m.required_mm,
            m.achieved_mm,
        );
        let weight = ranking::weight(&solution);
        Expansion::Terminal(solution.with_weight(weight))
    }
}
