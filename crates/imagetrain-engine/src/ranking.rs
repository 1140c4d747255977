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

//! # Ranking
//!
//! Scores a solution by how close it lands to the required backfocus, then
//! nudges the score by how well every item's insertion-point preference is
//! honoured. Higher is better.
//!
//! - base: `10000 × clamp(1 − deviance / required, 0, 1)`. Without a
//!   requirement the base is full when the match is exact, zero otherwise.
//! - per item at `d` hops from its preferred end (`0` = adjacent):
//!   flush `+1000` at `d = 0`, else `−200·d`; prefer `+250 − 50·d`;
//!   no preference `−10`.
//! - weight: `floor(100 × (base + Σ))`.

use imagetrain_model::item::InsertionPoint;
use imagetrain_model::solution::Solution;

const BASE_SCALE: f64 = 10_000.0;
const FLUSH_BONUS: f64 = 1_000.0;
const FLUSH_PENALTY_PER_HOP: f64 = 200.0;
const PREFER_BONUS: f64 = 250.0;
const PREFER_PENALTY_PER_HOP: f64 = 50.0;
const UNCONSTRAINED_PENALTY: f64 = 10.0;
const WEIGHT_SCALE: f64 = 100.0;

/// Computes the ranking weight of `solution`.
pub fn weight(solution: &Solution) -> i64 {
    let score = base_score(solution) + placement_score(solution);
    (WEIGHT_SCALE * score).floor() as i64
}

fn base_score(solution: &Solution) -> f64 {
    let required = solution.backfocus_mm();
    let fit = if required > 0.0 {
        (1.0 - solution.deviance() / required).clamp(0.0, 1.0)
    } else if solution.is_perfect() {
        1.0
    } else {
        0.0
    };
    BASE_SCALE * fit
}

fn placement_score(solution: &Solution) -> f64 {
    let n = solution.num_items();
    solution
        .items()
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let from_target = position as f64;
            let from_sensor = (n - 1 - position) as f64;
            insertion_adjustment(item.insertion_point(), from_target, from_sensor)
        })
        .sum()
}

#[inline]
fn insertion_adjustment(point: InsertionPoint, from_target: f64, from_sensor: f64) -> f64 {
    let flush = |d: f64| {
        if d == 0.0 {
            FLUSH_BONUS
        } else {
            -FLUSH_PENALTY_PER_HOP * d
        }
    };
    let prefer = |d: f64| PREFER_BONUS - PREFER_PENALTY_PER_HOP * d;
    match point {
        InsertionPoint::FlushToTarget => flush(from_target),
        InsertionPoint::PreferTarget => prefer(from_target),
        InsertionPoint::NoPreference => -UNCONSTRAINED_PENALTY,
        InsertionPoint::PreferSensor => prefer(from_sensor),
        InsertionPoint::FlushToSensor => flush(from_sensor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagetrain_model::connector::{ConnectorKind, Endpoint, SizeClass};
    use imagetrain_model::item::{Item, spacer};

    fn with_point(point: InsertionPoint) -> Item {
        Item::builder(
            Endpoint::new(ConnectorKind::Receiver, SizeClass::M42),
            Endpoint::new(ConnectorKind::Inserter, SizeClass::M42),
        )
        .length_mm(10.0)
        .insertion_point(point)
        .build()
    }

    fn solution(items: Vec<Item>, required: f64, achieved: f64) -> Solution {
        Solution::new(
            spacer(SizeClass::M42, 1.0),
            spacer(SizeClass::M42, 0.0),
            items,
            required,
            achieved,
        )
    }

    #[test]
    fn test_perfect_unconstrained() {
        let s = solution(vec![spacer(SizeClass::M42, 55.0)], 55.0, 55.0);
        assert_eq!(weight(&s), 100 * (10_000 - 10));
    }

    #[test]
    fn test_deviance_lowers_base() {
        let exact = solution(vec![spacer(SizeClass::M42, 40.0)], 40.0, 40.0);
        let off = solution(vec![spacer(SizeClass::M42, 30.0)], 40.0, 30.0);
        assert!(weight(&exact) > weight(&off));
        assert_eq!(weight(&off), 100 * (7_500 - 10));
    }

    #[test]
    fn test_base_clamps_at_zero() {
        let way_off = solution(Vec::new(), 10.0, 100.0);
        assert_eq!(weight(&way_off), 0);
    }

    #[test]
    fn test_zero_requirement() {
        assert_eq!(weight(&solution(Vec::new(), 0.0, 0.0)), 1_000_000);
        assert_eq!(weight(&solution(Vec::new(), 0.0, 3.0)), 0);
    }

    #[test]
    fn test_flush_rewards_adjacency() {
        let adjacent = solution(
            vec![
                with_point(InsertionPoint::FlushToTarget),
                with_point(InsertionPoint::NoPreference),
            ],
            20.0,
            20.0,
        );
        let distant = solution(
            vec![
                with_point(InsertionPoint::NoPreference),
                with_point(InsertionPoint::FlushToTarget),
            ],
            20.0,
            20.0,
        );
        assert_eq!(weight(&adjacent), 100 * (10_000 + 1_000 - 10));
        assert_eq!(weight(&distant), 100 * (10_000 - 10 - 200));
    }

    #[test]
    fn test_prefer_sensor_counts_from_sensor_end() {
        let s = solution(
            vec![
                with_point(InsertionPoint::PreferSensor),
                with_point(InsertionPoint::NoPreference),
                with_point(InsertionPoint::NoPreference),
            ],
            30.0,
            30.0,
        );
        assert_eq!(weight(&s), 100 * (10_000 + 250 - 100 - 20));
    }
}
