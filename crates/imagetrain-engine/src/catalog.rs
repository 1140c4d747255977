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

//! # Item Catalog
//!
//! Assigns every item of a run a dense `ItemIndex`: the target is index `0`,
//! the sensor index `1`, and candidates follow in input order. Reversed
//! copies of reversible candidates are materialized once here, so the search
//! never flips an item and never touches the caller's values.

use imagetrain_model::chain::{Orientation, Placement};
use imagetrain_model::config::SolverConfiguration;
use imagetrain_model::index::ItemIndex;
use imagetrain_model::item::Item;

/// Position of the target in every catalog.
pub const TARGET: ItemIndex = ItemIndex::new(0);

/// Position of the sensor in every catalog.
pub const SENSOR: ItemIndex = ItemIndex::new(1);

/// Index of the first candidate.
const FIRST_CANDIDATE: usize = 2;

/// The items of one run, addressable by `ItemIndex`.
#[derive(Debug, Clone)]
pub struct Catalog {
    forward: Vec<Item>,
    reversed: Vec<Option<Item>>,
}

impl Catalog {
    pub fn new(config: &SolverConfiguration) -> Self {
        let mut forward = Vec::with_capacity(config.candidates().len() + FIRST_CANDIDATE);
        forward.push(config.target().clone());
        forward.push(config.sensor().clone());
        forward.extend(config.candidates().iter().cloned());

        let reversed = forward
            .iter()
            .enumerate()
            .map(|(i, item)| {
                (i >= FIRST_CANDIDATE && item.is_reversible()).then(|| item.reversed())
            })
            .collect();

        Self { forward, reversed }
    }

    /// Number of items, target and sensor included.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Returns the item at `index` in its catalog orientation.
    #[inline]
    pub fn item(&self, index: ItemIndex) -> &Item {
        debug_assert!(
            index.get() < self.len(),
            "called `Catalog::item` with item index out of bounds: the len is {} but the index is {}",
            self.len(),
            index.get()
        );
        &self.forward[index.get()]
    }

    #[inline]
    pub fn target(&self) -> &Item {
        self.item(TARGET)
    }

    #[inline]
    pub fn sensor(&self) -> &Item {
        self.item(SENSOR)
    }

    /// Returns the item of `placement` with its orientation applied.
    #[inline]
    pub fn oriented(&self, placement: Placement) -> &Item {
        match placement.orientation() {
            Orientation::Forward => self.item(placement.item()),
            Orientation::Reversed => {
                let flipped = self.reversed[placement.item().get()].as_ref();
                debug_assert!(
                    flipped.is_some(),
                    "called `Catalog::oriented` with a reversed placement of non-reversible {}",
                    placement.item()
                );
                flipped.unwrap_or_else(|| self.item(placement.item()))
            }
        }
    }

    /// Iterates the usable orientations of the item at `index`.
    #[inline]
    pub fn orientations(&self, index: ItemIndex) -> impl Iterator<Item = Placement> + '_ {
        let reversed = self.reversed[index.get()]
            .is_some()
            .then(|| Placement::new(index, Orientation::Reversed));
        std::iter::once(Placement::forward(index)).chain(reversed)
    }

    /// Iterates the candidate indices.
    #[inline]
    pub fn candidates(&self) -> impl Iterator<Item = ItemIndex> + '_ {
        (FIRST_CANDIDATE..self.len()).map(ItemIndex::new)
    }

    /// Number of candidates with a materialized reversed copy.
    pub fn num_reversible(&self) -> usize {
        self.reversed.iter().filter(|r| r.is_some()).count()
    }
}
