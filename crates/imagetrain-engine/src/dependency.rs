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

//! # Dependency Precomputation
//!
//! For every catalog item this builds a one-hop mask of the candidates that
//! could attach to its sensor-facing end, in any orientation of either item.
//! A second mask marks the candidates that can attach directly to the
//! sensor, and a third the candidates that define a backfocus requirement.
//!
//! With these tables, proving that a partial chain is a dead end is a single
//! AND-and-test over the availability mask.

use crate::catalog::{Catalog, SENSOR};
use imagetrain_core::bits::BitMask;
use imagetrain_model::compat::compatible;
use imagetrain_model::index::ItemIndex;

#[derive(Debug, Clone)]
pub struct DependencyTable {
    dependents: Vec<BitMask>,
    sensor_reachable: BitMask,
    backfocus_items: BitMask,
}

impl DependencyTable {
    pub fn build(catalog: &Catalog) -> Self {
        let len = catalog.len();
        let sensor_end = catalog.sensor().target_end();

        let dependents = ItemIndex::range(len)
            .map(|from| {
                let mut mask = BitMask::new(len);
                if from == SENSOR {
                    return mask;
                }
                for upstream in catalog.orientations(from) {
                    let upstream_end = catalog.oriented(upstream).sensor_end();
                    for to in catalog.candidates().filter(|&to| to != from) {
                        let fits = catalog
                            .orientations(to)
                            .any(|p| compatible(upstream_end, catalog.oriented(p).target_end()));
                        if fits {
                            mask.insert(to.get());
                        }
                    }
                }
                mask
            })
            .collect();

        let mut sensor_reachable = BitMask::new(len);
        let mut backfocus_items = BitMask::new(len);
        for index in catalog.candidates() {
            let reaches = catalog
                .orientations(index)
                .any(|p| compatible(catalog.oriented(p).sensor_end(), sensor_end));
            if reaches {
                sensor_reachable.insert(index.get());
            }
            if catalog.item(index).defines_backfocus() {
                backfocus_items.insert(index.get());
            }
        }

        Self {
            dependents,
            sensor_reachable,
            backfocus_items,
        }
    }

    /// Candidates that can follow the item at `index`.
    #[inline]
    pub fn dependents(&self, index: ItemIndex) -> &BitMask {
        debug_assert!(
            index.get() < self.dependents.len(),
            "called `DependencyTable::dependents` with item index out of bounds: the len is {} but the index is {}",
            self.dependents.len(),
            index.get()
        );
        &self.dependents[index.get()]
    }

    /// Candidates that can attach directly to the sensor.
    #[inline]
    pub fn sensor_reachable(&self) -> &BitMask {
        &self.sensor_reachable
    }

    /// Candidates with a nonzero backfocus requirement.
    #[inline]
    pub fn backfocus_items(&self) -> &BitMask {
        &self.backfocus_items
    }

    /// Total number of one-hop edges, for diagnostics.
    pub fn num_edges(&self) -> usize {
        self.dependents.iter().map(BitMask::count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TARGET;
    use imagetrain_model::config::SolverConfiguration;
    use imagetrain_model::connector::{ConnectorKind, Endpoint, SizeClass};
    use imagetrain_model::item::{Item, spacer};

    fn end(kind: ConnectorKind, size: SizeClass) -> Endpoint {
        Endpoint::new(kind, size)
    }

    fn catalog() -> Catalog {
        let target = Item::builder(Endpoint::terminator(), end(ConnectorKind::Receiver, SizeClass::M42))
            .backfocus_mm(55.0)
            .build();
        let sensor = Item::builder(end(ConnectorKind::Inserter, SizeClass::M48), Endpoint::terminator()).build();
        // 2: M42 -> M42
        let a = Item::builder(
            end(ConnectorKind::Inserter, SizeClass::M42),
            end(ConnectorKind::Receiver, SizeClass::M42),
        )
        .length_mm(10.0)
        .build();
        // 3: M42 -> M48
        let b = Item::builder(
            end(ConnectorKind::Inserter, SizeClass::M42),
            end(ConnectorKind::Receiver, SizeClass::M48),
        )
        .length_mm(20.0)
        .build();
        // 4: M48 -> M42, only usable reversed
        let c = Item::builder(
            end(ConnectorKind::Receiver, SizeClass::M48),
            end(ConnectorKind::Inserter, SizeClass::M42),
        )
        .length_mm(5.0)
        .reversible(true)
        .backfocus_mm(12.0)
        .build();
        let config = SolverConfiguration::builder(target, sensor)
            .candidates([a, b, c, spacer(SizeClass::M12, 1.0)])
            .build();
        Catalog::new(&config)
    }

    #[test]
    fn test_dependents_from_target() {
        let catalog = catalog();
        let table = DependencyTable::build(&catalog);
        let deps = table.dependents(TARGET).ones().collect::<Vec<_>>();
        assert_eq!(deps, vec![2, 3, 4]);
    }

    #[test]
    fn test_dependents_exclude_self_and_sensor() {
        let catalog = catalog();
        let table = DependencyTable::build(&catalog);
        let deps = table.dependents(ItemIndex::new(2));
        assert!(!deps.contains(2));
        assert!(!deps.contains(SENSOR.get()));
        assert!(deps.contains(3));
        assert!(table.dependents(SENSOR).is_clear());
    }

    #[test]
    fn test_sensor_reachable_considers_reversal() {
        let catalog = catalog();
        let table = DependencyTable::build(&catalog);
        assert_eq!(table.sensor_reachable().ones().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_backfocus_items_exclude_target() {
        let catalog = catalog();
        let table = DependencyTable::build(&catalog);
        assert_eq!(table.backfocus_items().ones().collect::<Vec<_>>(), vec![4]);
        assert!(table.num_edges() > 0);
    }
}
