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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use imagetrain_engine::SolverEngine;
use imagetrain_engine::catalog::Catalog;
use imagetrain_engine::dependency::DependencyTable;
use imagetrain_model::config::SolverConfiguration;
use imagetrain_model::connector::{ConnectorKind, Endpoint, SizeClass};
use imagetrain_model::item::{Item, spacer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const SIZES: [SizeClass; 3] = [SizeClass::M42, SizeClass::M48, SizeClass::M42With125Sleeve];

/// A seeded inventory mixing same-size spacers with size-changing adapters.
fn inventory(rng: &mut StdRng, count: usize) -> Vec<Item> {
    (0..count)
        .map(|_| {
            let length = f64::from(rng.gen_range(2..=25_u32));
            if rng.gen_bool(0.6) {
                spacer(SIZES[rng.gen_range(0..SIZES.len())], length)
            } else {
                let from = SIZES[rng.gen_range(0..SIZES.len())];
                let to = SIZES[rng.gen_range(0..SIZES.len())];
                Item::builder(
                    Endpoint::new(ConnectorKind::Receiver, from),
                    Endpoint::new(ConnectorKind::Inserter, to),
                )
                .length_mm(length)
                .thread_recess_mm(1.0)
                .reversible(rng.gen_bool(0.5))
                .build()
            }
        })
        .collect()
}

fn config(count: usize, workers: usize) -> SolverConfiguration {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let target = Item::builder(
        Endpoint::terminator(),
        Endpoint::new(ConnectorKind::Inserter, SizeClass::M42),
    )
    .backfocus_mm(55.0)
    .build();
    let sensor = Item::builder(
        Endpoint::new(ConnectorKind::Receiver, SizeClass::M48),
        Endpoint::terminator(),
    )
    .build();
    SolverConfiguration::builder(target, sensor)
        .candidates(inventory(&mut rng, count))
        .backfocus_tolerance(0.02)
        .workers(workers)
        .build()
}

fn bench_precompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("precompute");
    for count in [16, 64, 256] {
        let config = config(count, 0);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &config, |b, config| {
            b.iter(|| {
                let catalog = Catalog::new(black_box(config));
                DependencyTable::build(&catalog)
            })
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    for workers in [0, 1, 4] {
        let config = config(12, workers);
        let engine = SolverEngine::new();
        group.bench_with_input(BenchmarkId::new("workers", workers), &config, |b, config| {
            b.iter(|| {
                let outcome = engine
                    .solve(black_box(config))
                    .unwrap_or_else(|e| panic!("benchmark solve failed: {}", e));
                black_box(outcome.solutions.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_precompute, bench_solve);
criterion_main!(benches);
