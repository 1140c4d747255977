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

//! # Solution Accumulator
//!
//! The deduplicated set of accepted solutions of one run. Admission is
//! decided under a single mutex keyed by signature, so two workers that reach
//! the same physical train through different orientations can never both
//! insert it. The accepted and perfect counters are mirrored in atomics and
//! read lock-free by the solution-limit monitors.
//!
//! Signatures only cover physical properties, so two admissions of the same
//! train may differ in weight when their items carry different insertion
//! preferences. The set keeps the heavier one, which makes the result
//! independent of arrival order.

use imagetrain_model::solution::Solution;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result of offering a solution to the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The solution was new; a copy is returned for reporting.
    Accepted(Solution),
    /// A solution with the same signature was already accepted. The stored
    /// one is replaced if the offered one is heavier.
    Duplicate,
}

#[derive(Debug, Default)]
struct Accepted {
    /// Signature to position in `solutions`.
    seen: FxHashMap<Vec<u8>, usize>,
    solutions: Vec<Solution>,
}

#[derive(Debug, Default)]
pub struct SolutionSet {
    inner: Mutex<Accepted>,
    accepted: AtomicU64,
    perfect: AtomicU64,
}

impl SolutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `solution` unless its signature is already present.
    pub fn offer(&self, solution: Solution) -> Admission {
        let mut inner = self.inner.lock();
        if let Some(&position) = inner.seen.get(solution.signature()) {
            let stored = &mut inner.solutions[position];
            if solution.weight() > stored.weight() {
                *stored = solution;
            }
            return Admission::Duplicate;
        }
        if solution.is_perfect() {
            self.perfect.fetch_add(1, Ordering::Relaxed);
        }
        self.accepted.fetch_add(1, Ordering::Relaxed);
        let position = inner.solutions.len();
        inner.seen.insert(solution.signature().to_vec(), position);
        inner.solutions.push(solution.clone());
        Admission::Accepted(solution)
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn perfect(&self) -> u64 {
        self.perfect.load(Ordering::Relaxed)
    }

    /// Counter of accepted solutions, for `SolutionLimitMonitor::accepted`.
    #[inline]
    pub fn accepted_counter(&self) -> &AtomicU64 {
        &self.accepted
    }

    /// Counter of perfect solutions, for `SolutionLimitMonitor::perfect`.
    #[inline]
    pub fn perfect_counter(&self) -> &AtomicU64 {
        &self.perfect
    }

    /// Consumes the set and returns the solutions ordered by weight
    /// descending, ties broken by signature ascending.
    pub fn into_ranked(self) -> Vec<Solution> {
        let mut solutions = self.inner.into_inner().solutions;
        rank(&mut solutions);
        solutions
    }
}

/// Sorts `solutions` into their reporting order.
pub fn rank(solutions: &mut [Solution]) {
    solutions.sort_unstable_by(|a, b| {
        b.weight()
            .cmp(&a.weight())
            .then_with(|| a.signature().cmp(b.signature()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagetrain_model::connector::SizeClass;
    use imagetrain_model::item::spacer;
    use std::thread;

    fn solution(lengths: &[f64], required: f64, weight: i64) -> Solution {
        let items = lengths.iter().map(|&l| spacer(SizeClass::M42, l)).collect::<Vec<_>>();
        let achieved: f64 = lengths.iter().sum();
        Solution::new(
            spacer(SizeClass::M42, 100.0),
            spacer(SizeClass::M42, 0.0),
            items,
            required,
            achieved,
        )
        .with_weight(weight)
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let set = SolutionSet::new();
        match set.offer(solution(&[10.0, 20.0], 30.0, 5)) {
            Admission::Accepted(s) => assert_eq!(s.num_items(), 2),
            other => panic!("expected Accepted, got {:?}", other),
        }
        assert_eq!(set.offer(solution(&[10.0, 20.0], 30.0, 5)), Admission::Duplicate);
        assert_eq!(set.accepted(), 1);
        assert_eq!(set.perfect(), 1);
    }

    #[test]
    fn test_duplicate_keeps_heavier_weight() {
        let set = SolutionSet::new();
        set.offer(solution(&[10.0, 20.0], 30.0, 5));
        assert_eq!(set.offer(solution(&[10.0, 20.0], 30.0, 9)), Admission::Duplicate);
        assert_eq!(set.offer(solution(&[10.0, 20.0], 30.0, 7)), Admission::Duplicate);
        assert_eq!(set.accepted(), 1);

        let ranked = set.into_ranked();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].weight(), 9);
    }

    #[test]
    fn test_order_matters_for_identity() {
        let set = SolutionSet::new();
        assert!(matches!(set.offer(solution(&[10.0, 20.0], 30.0, 1)), Admission::Accepted(_)));
        assert!(matches!(set.offer(solution(&[20.0, 10.0], 30.0, 1)), Admission::Accepted(_)));
        assert_eq!(set.accepted(), 2);
    }

    #[test]
    fn test_imperfect_not_counted_as_perfect() {
        let set = SolutionSet::new();
        set.offer(solution(&[10.0], 11.0, 1));
        assert_eq!(set.accepted(), 1);
        assert_eq!(set.perfect(), 0);
    }

    #[test]
    fn test_ranked_by_weight_then_signature() {
        let set = SolutionSet::new();
        set.offer(solution(&[3.0], 3.0, 10));
        set.offer(solution(&[2.0], 2.0, 10));
        set.offer(solution(&[1.0], 1.0, 50));

        let ranked = set.into_ranked();
        assert_eq!(ranked[0].weight(), 50);
        assert_eq!(ranked.len(), 3);
        assert!(ranked[1].signature() < ranked[2].signature());
    }

    #[test]
    fn test_concurrent_offers_collapse() {
        let set = SolutionSet::new();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for i in 0..50 {
                        set.offer(solution(&[f64::from(i)], 1.0, 0));
                    }
                });
            }
        });
        assert_eq!(set.accepted(), 50);
        assert_eq!(set.into_ranked().len(), 50);
    }
}
