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

//! # Imagetrain Model
//!
//! **The domain model of the image-train solver.**
//!
//! An image train is the stack of adapters, spacers, filter wheels and
//! other parts that connects a telescope (the *target*) to a camera (the
//! *sensor*). This crate describes those parts and the rules for joining
//! them; the search itself lives in `imagetrain_engine`.
//!
//! ## Architecture
//!
//! * **`index`**: strongly typed `ItemIndex` and `NodeIndex`.
//! * **`connector`**: `ConnectorKind`, `SizeClass` and `Endpoint` with their mating rules.
//! * **`item`**: the immutable `Item` value, its builder and its physical signature.
//! * **`compat`**: the compatibility model (`compatible`, `check`, `can_attach`).
//! * **`chain`**: the index-arena `Chain` holding one partial train.
//! * **`solution`**: the `Solution` value produced by a run.
//! * **`config`**: `SolverConfiguration`, its builder and validation.
//!
//! ## Features
//!
//! * `serde`: derives `Serialize`/`Deserialize` for the value types so
//!   inventories and solutions can be persisted by the host application.

pub mod chain;
pub mod compat;
pub mod config;
pub mod connector;
pub mod index;
pub mod item;
pub mod solution;
