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

use crate::item::{Item, ItemKind, SIGNATURE_LEN};

/// Deviance at or below this value counts as an exact match.
pub const PERFECT_EPSILON_MM: f64 = 1e-9;

/// A complete image train between a target and a sensor.
///
/// Solutions are value-equal by signature: two trains assembled from
/// different catalog entries with identical geometry compare equal.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    target: Item,
    sensor: Item,
    /// The items between target and sensor, orientation already applied.
    items: Vec<Item>,
    backfocus_mm: f64,
    length_mm: f64,
    weight: i64,
    signature: Vec<u8>,
}

impl Solution {
    /// Assembles a solution and computes its signature.
    ///
    /// `backfocus_mm` is the required distance and `length_mm` the achieved
    /// one. The weight is assigned afterwards by the ranking.
    pub fn new(target: Item, sensor: Item, items: Vec<Item>, backfocus_mm: f64, length_mm: f64) -> Self {
        let signature = Self::signature_of(&items);
        Self {
            target,
            sensor,
            items,
            backfocus_mm,
            length_mm,
            weight: 0,
            signature,
        }
    }

    /// Concatenates the signatures of `items` in order.
    pub fn signature_of(items: &[Item]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(items.len() * SIGNATURE_LEN);
        for item in items {
            bytes.extend_from_slice(item.signature().as_bytes());
        }
        bytes
    }

    /// Returns this solution carrying `weight`.
    #[inline]
    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    #[inline]
    pub fn target(&self) -> &Item {
        &self.target
    }

    #[inline]
    pub fn sensor(&self) -> &Item {
        &self.sensor
    }

    /// The items between target and sensor.
    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items between target and sensor.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Iterates the whole train, target first and sensor last.
    pub fn train(&self) -> impl Iterator<Item = &Item> {
        std::iter::once(&self.target)
            .chain(self.items.iter())
            .chain(std::iter::once(&self.sensor))
    }

    /// The required backfocus distance.
    #[inline]
    pub fn backfocus_mm(&self) -> f64 {
        self.backfocus_mm
    }

    /// The achieved distance.
    #[inline]
    pub fn length_mm(&self) -> f64 {
        self.length_mm
    }

    /// `|required - achieved|`.
    #[inline]
    pub fn deviance(&self) -> f64 {
        (self.backfocus_mm - self.length_mm).abs()
    }

    /// Deviance as a fraction of the required backfocus. Zero when no
    /// backfocus is required.
    #[inline]
    pub fn deviance_pct(&self) -> f64 {
        if self.backfocus_mm > 0.0 {
            self.deviance() / self.backfocus_mm
        } else {
            0.0
        }
    }

    /// Returns `true` if the achieved length matches exactly.
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.deviance() <= PERFECT_EPSILON_MM
    }

    #[inline]
    pub fn weight(&self) -> i64 {
        self.weight
    }

    #[inline]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Returns `true` if any item of the train, endpoints included, is of `kind`.
    pub fn contains_kind(&self, kind: ItemKind) -> bool {
        self.train().any(|item| item.kind() == kind)
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for Solution {}

impl std::hash::Hash for Solution {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Weight: {} BF: {:.2}mm Len: {:.2}mm Deviance: {:.3}mm ({:.2}%)",
            self.weight,
            self.backfocus_mm,
            self.length_mm,
            self.deviance(),
            self.deviance_pct() * 100.0
        )?;
        let labels = self.train().map(|item| item.short_label()).collect::<Vec<_>>();
        write!(f, "{}", labels.join(" | "))
    }
}
