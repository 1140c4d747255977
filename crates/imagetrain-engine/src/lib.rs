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

//! # Imagetrain Engine
//!
//! A parallel branch-and-bound engine that enumerates every adapter chain
//! connecting an optical target to a sensor from an inventory of items, keeps
//! the chains whose length matches the required backfocus within tolerance,
//! and ranks them.
//!
//! ## Modules
//!
//! - `catalog`: dense item indices and materialized reversed copies.
//! - `dependency`: one-hop dependency masks and the sensor-reachable mask.
//! - `job`: a unit of search work (availability mask plus partial chain).
//! - `expand`: the branch-and-bound step deciding terminal, prune or fork.
//! - `queue`: the shared FIFO with its quiescence barrier.
//! - `accumulator`: signature-deduplicated solution set.
//! - `ranking`: solution weights.
//! - `reporter`: bounded progress channel and reporter thread.
//! - `engine`: `SolverEngine`, the public entry point.
//!
//! ## Example
//!
//! ```rust
//! use imagetrain_engine::SolverEngine;
//! use imagetrain_model::config::SolverConfiguration;
//! use imagetrain_model::connector::{ConnectorKind, Endpoint, SizeClass};
//! use imagetrain_model::item::{Item, spacer};
//!
//! let target = Item::builder(
//!     Endpoint::terminator(),
//!     Endpoint::new(ConnectorKind::Inserter, SizeClass::M42),
//! )
//! .backfocus_mm(30.0)
//! .build();
//! let sensor = Item::builder(
//!     Endpoint::new(ConnectorKind::Receiver, SizeClass::M42),
//!     Endpoint::terminator(),
//! )
//! .build();
//!
//! let config = SolverConfiguration::builder(target, sensor)
//!     .candidates([spacer(SizeClass::M42, 10.0), spacer(SizeClass::M42, 20.0)])
//!     .backfocus_tolerance(0.0)
//!     .workers(0)
//!     .build();
//!
//! let outcome = SolverEngine::new().solve(&config).unwrap();
//! assert!(outcome.has_solution());
//! ```

pub mod accumulator;
pub mod catalog;
pub mod dependency;
pub mod engine;
pub mod error;
pub mod expand;
pub mod job;
pub mod queue;
pub mod ranking;
pub mod reporter;

pub use engine::{SolveHandle, SolverEngine};
pub use error::SolveError;
