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

//! # Compatibility Model
//!
//! Decides whether the sensor-facing end of one item can mate with the
//! target-facing end of the next. The boolean form is on the solver's hot
//! path; `check` returns the same verdict with a human-readable reason.

use crate::connector::{ConnectorKind, Endpoint, SizeClass};
use crate::item::Item;
use thiserror::Error;

/// Why two ends cannot be joined.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Incompatibility {
    #[error("the upstream end ({0}) is closed")]
    UpstreamClosed(Endpoint),
    #[error("the downstream end ({0}) is closed")]
    DownstreamClosed(Endpoint),
    #[error("connector {upstream} cannot mate with connector {downstream}")]
    Kind {
        upstream: ConnectorKind,
        downstream: ConnectorKind,
    },
    #[error("size {upstream} does not fit size {downstream}")]
    Size {
        upstream: SizeClass,
        downstream: SizeClass,
    },
}

/// Returns `true` if `upstream` (a sensor-facing end) can mate with
/// `downstream` (a target-facing end).
#[inline]
pub fn compatible(upstream: Endpoint, downstream: Endpoint) -> bool {
    upstream.kind().mates_with(downstream.kind()) && upstream.size().mates_with(downstream.size())
}

/// Diagnostic form of [`compatible`].
pub fn check(upstream: Endpoint, downstream: Endpoint) -> Result<(), Incompatibility> {
    if upstream.is_closed() {
        return Err(Incompatibility::UpstreamClosed(upstream));
    }
    if downstream.is_closed() {
        return Err(Incompatibility::DownstreamClosed(downstream));
    }
    if !upstream.kind().mates_with(downstream.kind()) {
        return Err(Incompatibility::Kind {
            upstream: upstream.kind(),
            downstream: downstream.kind(),
        });
    }
    if !upstream.size().mates_with(downstream.size()) {
        return Err(Incompatibility::Size {
            upstream: upstream.size(),
            downstream: downstream.size(),
        });
    }
    Ok(())
}

/// Returns `true` if `next` can follow `prev` as-is.
#[inline]
pub fn follows(prev: &Item, next: &Item) -> bool {
    compatible(prev.sensor_end(), next.target_end())
}

/// Returns `true` if `next` can follow `prev` in either orientation.
#[inline]
pub fn can_attach(prev: &Item, next: &Item) -> bool {
    follows(prev, next) || (next.is_reversible() && compatible(prev.sensor_end(), next.sensor_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [ConnectorKind; 4] = [
        ConnectorKind::Dual,
        ConnectorKind::Terminator,
        ConnectorKind::Inserter,
        ConnectorKind::Receiver,
    ];

    #[test]
    fn test_compatible_is_conjunction_of_kind_and_size() {
        for a_kind in KINDS {
            for b_kind in KINDS {
                for a_size in SizeClass::ALL {
                    for b_size in SizeClass::ALL {
                        let a = Endpoint::new(a_kind, a_size);
                        let b = Endpoint::new(b_kind, b_size);
                        let expected = a_kind.mates_with(b_kind) && a_size.mates_with(b_size);
                        assert_eq!(compatible(a, b), expected, "{} vs {}", a, b);
                        if a_kind == ConnectorKind::Terminator
                            || b_kind == ConnectorKind::Terminator
                            || a_size == SizeClass::Zero
                            || b_size == SizeClass::Zero
                        {
                            assert!(!compatible(a, b));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_check_agrees_with_compatible() {
        for a_kind in KINDS {
            for b_kind in KINDS {
                for a_size in SizeClass::ALL {
                    for b_size in SizeClass::ALL {
                        let a = Endpoint::new(a_kind, a_size);
                        let b = Endpoint::new(b_kind, b_size);
                        assert_eq!(check(a, b).is_ok(), compatible(a, b));
                    }
                }
            }
        }
    }

    #[test]
    fn test_check_reports_reason() {
        let a = Endpoint::new(ConnectorKind::Inserter, SizeClass::M42);
        let b = Endpoint::new(ConnectorKind::Receiver, SizeClass::M48);
        match check(a, b) {
            Err(Incompatibility::Size { upstream, downstream }) => {
                assert_eq!(upstream, SizeClass::M42);
                assert_eq!(downstream, SizeClass::M48);
            }
            other => panic!("expected Size, got {:?}", other),
        }
        let message = check(a, b).unwrap_err().to_string();
        assert!(message.contains("M42"));
    }

    #[test]
    fn test_can_attach_considers_reversal() {
        let prev = Item::builder(
            Endpoint::terminator(),
            Endpoint::new(ConnectorKind::Inserter, SizeClass::M42),
        )
        .build();
        let backwards = Item::builder(
            Endpoint::new(ConnectorKind::Inserter, SizeClass::M48),
            Endpoint::new(ConnectorKind::Receiver, SizeClass::M42),
        );
        let fixed = backwards.clone().reversible(false).build();
        let flippable = backwards.reversible(true).build();

        assert!(!follows(&prev, &fixed));
        assert!(!can_attach(&prev, &fixed));
        assert!(can_attach(&prev, &flippable));
        assert!(follows(&prev, &flippable.reversed()));
    }
}
