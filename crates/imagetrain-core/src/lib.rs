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

//! # Imagetrain Core
//!
//! Foundational primitives shared by the imagetrain crates. Nothing in here
//! knows about adapters, connectors or optics; the crate only provides the
//! two low-level representations the solver leans on in its hot loop.
//!
//! ## Modules
//!
//! - `utils`: phantom-tagged, strongly typed indices (`TypedIndex<T>`) so the
//!   dense catalog positions of items and chain nodes cannot be mixed up.
//! - `bits`: `BitMask`, a fixed-size bit set sized once per run, supporting
//!   the AND/test/clear operations used for availability and reachability.
//!
//! Refer to each module for detailed APIs and examples.

pub mod bits;
pub mod utils;
