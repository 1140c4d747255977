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

#![allow(dead_code)]

use imagetrain_model::config::{SolverConfiguration, SolverConfigurationBuilder};
use imagetrain_model::connector::{ConnectorKind, Endpoint, SizeClass};
use imagetrain_model::item::{Item, ItemKind, spacer};
use rand::Rng;
use rand::rngs::StdRng;

pub fn end(kind: ConnectorKind, size: SizeClass) -> Endpoint {
    Endpoint::new(kind, size)
}

/// A telescope with an M42 receiver on its sensor side.
pub fn target(backfocus_mm: f64) -> Item {
    Item::builder(Endpoint::terminator(), end(ConnectorKind::Receiver, SizeClass::M42))
        .length_mm(400.0)
        .backfocus_mm(backfocus_mm)
        .build()
}

/// A camera with an inserter of `size` on its target side.
pub fn sensor(size: SizeClass) -> Item {
    Item::builder(end(ConnectorKind::Inserter, size), Endpoint::terminator()).build()
}

/// An adapter tube inserting into `from` and receiving `to`.
pub fn tube(from: SizeClass, to: SizeClass, length_mm: f64, recess_mm: f64) -> Item {
    Item::builder(
        end(ConnectorKind::Inserter, from),
        end(ConnectorKind::Receiver, to),
    )
    .length_mm(length_mm)
    .thread_recess_mm(recess_mm)
    .build()
}

/// A reversible M42 spacer whose two ends are identical.
pub fn symmetric_spacer(length_mm: f64) -> Item {
    Item::builder(
        end(ConnectorKind::Dual, SizeClass::M42),
        end(ConnectorKind::Dual, SizeClass::M42),
    )
    .length_mm(length_mm)
    .reversible(true)
    .build()
}

/// The 55 mm scenario: 10 mm M42, 20 mm M42→M48, 30 mm M48 with 5 mm recess.
pub fn scenario_55(tolerance: f64) -> SolverConfigurationBuilder {
    SolverConfiguration::builder(target(55.0), sensor(SizeClass::M48))
        .candidates([
            tube(SizeClass::M42, SizeClass::M42, 10.0, 0.0),
            tube(SizeClass::M42, SizeClass::M48, 20.0, 0.0),
            tube(SizeClass::M48, SizeClass::M48, 30.0, 5.0),
        ])
        .backfocus_tolerance(tolerance)
}

/// An M42 focal reducer that moves the backfocus reference point.
pub fn reducer(length_mm: f64, backfocus_mm: f64) -> Item {
    Item::builder(
        end(ConnectorKind::Receiver, SizeClass::M42),
        end(ConnectorKind::Inserter, SizeClass::M42),
    )
    .kind(ItemKind::FocalReducer)
    .length_mm(length_mm)
    .backfocus_mm(backfocus_mm)
    .build()
}

/// A random inventory of M42 spacers, Dual/M42 tubes and focal reducers,
/// seeded for replay.
pub fn random_inventory(rng: &mut StdRng, count: usize) -> Vec<Item> {
    (0..count)
        .map(|_| {
            let length = f64::from(rng.gen_range(1..=30_u32));
            match rng.gen_range(0..10_u32) {
                0..=2 => symmetric_spacer(length),
                3 => reducer(length, f64::from(rng.gen_range(10..=40_u32))),
                _ => spacer(SizeClass::M42, length),
            }
        })
        .collect()
}

/// Target/sensor pair for `random_inventory`.
pub fn m42_endpoints(backfocus_mm: f64) -> (Item, Item) {
    let target = Item::builder(Endpoint::terminator(), end(ConnectorKind::Inserter, SizeClass::M42))
        .backfocus_mm(backfocus_mm)
        .build();
    let sensor = Item::builder(end(ConnectorKind::Receiver, SizeClass::M42), Endpoint::terminator()).build();
    (target, sensor)
}

/// A large inventory whose search tree is far too big to finish quickly.
pub fn large_inventory(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| spacer(SizeClass::M42, 1.0 + (i % 7) as f64))
        .collect()
}
