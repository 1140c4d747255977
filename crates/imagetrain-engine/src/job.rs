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

use crate::catalog::{Catalog, SENSOR, TARGET};
use imagetrain_core::bits::BitMask;
use imagetrain_model::chain::{Chain, ChainError, Placement};

/// One unit of search work: the items still available on this branch and
/// the partial chain built so far.
///
/// Jobs are never mutated once enqueued; expansion derives children.
#[derive(Debug, Clone)]
pub struct Job {
    availability: BitMask,
    chain: Chain,
}

impl Job {
    /// The root job: only the target is placed and every item except the
    /// sensor is available.
    pub fn seed(catalog: &Catalog) -> Self {
        let mut availability = BitMask::full(catalog.len());
        availability.remove(SENSOR.get());
        Self {
            availability,
            chain: Chain::new(Placement::forward(TARGET)),
        }
    }

    #[inline]
    pub fn availability(&self) -> &BitMask {
        &self.availability
    }

    #[inline]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Returns `true` if the chain ends at the sensor.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.chain.tail().item() == SENSOR
    }

    /// Number of candidate items in the chain, excluding target and sensor.
    #[inline]
    pub fn num_candidates(&self) -> usize {
        let endpoints = if self.is_terminal() { 2 } else { 1 };
        self.chain.len() - endpoints
    }

    /// Derives a child with `placement` appended and `availability` as its pool.
    #[inline]
    pub fn child(&self, availability: BitMask, placement: Placement) -> Result<Job, ChainError> {
        Ok(Job {
            availability,
            chain: self.chain.extended(placement)?,
        })
    }
}
