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

//! # Availability Bit Masks
//!
//! `BitMask` is a fixed-length set of dense positions backed by
//! `fixedbitset::FixedBitSet`. The length is chosen once per solving run (the
//! catalog size) and never changes afterwards; every binary operation asserts
//! in debug builds that both operands share that length.
//!
//! The solver uses masks for three things:
//! - the per-branch availability of items,
//! - the one-hop dependency mask of each catalog item,
//! - the set of items that can still reach the sensor.

use fixedbitset::FixedBitSet;

/// A fixed-size set of dense positions.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitMask {
    bits: FixedBitSet,
}

impl BitMask {
    /// Creates an empty mask able to hold positions `0..len`.
    #[inline]
    pub fn new(len: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(len),
        }
    }

    /// Creates a mask of length `len` with every position set.
    #[inline]
    pub fn full(len: usize) -> Self {
        let mut bits = FixedBitSet::with_capacity(len);
        bits.insert_range(..);
        Self { bits }
    }

    /// Returns the number of positions this mask can hold.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if the mask has zero capacity.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.len() == 0
    }

    /// Sets `position`.
    #[inline]
    pub fn insert(&mut self, position: usize) {
        debug_assert!(
            position < self.len(),
            "called `BitMask::insert` with position out of bounds: the len is {} but the position is {}",
            self.len(),
            position
        );
        self.bits.insert(position);
    }

    /// Clears `position`.
    #[inline]
    pub fn remove(&mut self, position: usize) {
        debug_assert!(
            position < self.len(),
            "called `BitMask::remove` with position out of bounds: the len is {} but the position is {}",
            self.len(),
            position
        );
        self.bits.set(position, false);
    }

    /// Returns `true` if `position` is set. Positions beyond the length are
    /// reported as unset.
    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        self.bits.contains(position)
    }

    /// Returns `true` if no position is set.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.bits.ones().next().is_none()
    }

    /// Returns the number of set positions.
    #[inline]
    pub fn count(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Returns `true` if the two masks share at least one set position.
    #[inline]
    pub fn intersects(&self, other: &BitMask) -> bool {
        debug_assert_eq!(self.len(), other.len(), "mask lengths differ");
        !self.bits.is_disjoint(&other.bits)
    }

    /// In-place union with `other`.
    #[inline]
    pub fn union_with(&mut self, other: &BitMask) {
        debug_assert_eq!(self.len(), other.len(), "mask lengths differ");
        self.bits.union_with(&other.bits);
    }

    /// Iterates the positions set in both `self` and `other`, ascending.
    #[inline]
    pub fn intersection<'a>(&'a self, other: &'a BitMask) -> impl Iterator<Item = usize> + 'a {
        debug_assert_eq!(self.len(), other.len(), "mask lengths differ");
        self.bits.intersection(&other.bits)
    }

    /// Iterates all set positions, ascending.
    #[inline]
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }
}

impl std::fmt::Debug for BitMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitMask[")?;
        for position in 0..self.len() {
            write!(f, "{}", if self.contains(position) { '1' } else { '0' })?;
        }
        write!(f, "]")
    }
}

impl FromIterator<usize> for BitMask {
    /// Collects positions into a mask just large enough to hold the largest.
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            bits: FixedBitSet::from_iter(iter),
        }
    }
}
