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

//! # Connectors
//!
//! Every item has two ends, each described by an `Endpoint`: a connector
//! kind (how it mates) and a size class (what it mates with). The mating
//! rules for both halves live here as `const fn`s so the compatibility model
//! can evaluate them millions of times without touching shared state.

/// The mechanical style of a connection end.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectorKind {
    /// Accepts either an inserter or a receiver.
    Dual,
    /// A closed end. Never mates.
    Terminator,
    /// Male end that slides or threads into a receiver.
    Inserter,
    /// Female end that takes an inserter.
    Receiver,
}

impl ConnectorKind {
    /// Returns `true` if an end of kind `self` can mate with an end of kind `other`.
    #[inline]
    pub const fn mates_with(self, other: ConnectorKind) -> bool {
        use ConnectorKind::*;
        match (self, other) {
            (Terminator, _) | (_, Terminator) => false,
            (Dual, _) | (_, Dual) => true,
            (Inserter, Receiver) | (Receiver, Inserter) => true,
            _ => false,
        }
    }

    /// Stable tag used in item signatures.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            ConnectorKind::Dual => 0,
            ConnectorKind::Terminator => 1,
            ConnectorKind::Inserter => 2,
            ConnectorKind::Receiver => 3,
        }
    }

    /// Glyph drawn on the target-facing side of an item.
    pub const fn target_glyph(self) -> &'static str {
        match self {
            ConnectorKind::Dual => "][",
            ConnectorKind::Terminator => "*",
            ConnectorKind::Inserter => "\\\\",
            ConnectorKind::Receiver => "]",
        }
    }

    /// Glyph drawn on the sensor-facing side of an item.
    pub const fn sensor_glyph(self) -> &'static str {
        match self {
            ConnectorKind::Dual => "][",
            ConnectorKind::Terminator => "X",
            ConnectorKind::Inserter => "//",
            ConnectorKind::Receiver => "[",
        }
    }
}

impl std::fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectorKind::Dual => "Dual",
            ConnectorKind::Terminator => "Terminator",
            ConnectorKind::Inserter => "Inserter",
            ConnectorKind::Receiver => "Receiver",
        };
        write!(f, "{}", name)
    }
}

/// The physical size of a connection end.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeClass {
    /// No connection. Marks a closed end.
    Zero,
    /// M12x0.5 webcam thread.
    M12,
    /// 1" video thread.
    Video1In,
    /// M28.5, the 1.25" filter and eyepiece thread.
    M28_5,
    /// M42 (T/T2) thread.
    M42,
    /// M42 thread carrying a 1.25" sleeve.
    M42With125Sleeve,
    /// M44.5 Maksutov thread.
    M44_5,
    /// M48 wide T thread, 2" filters.
    M48,
    /// M48 thread carrying a 2" sleeve.
    M48With2InSleeve,
    /// Plain 1.25" sleeve.
    Sleeve125,
    /// Plain 2" sleeve.
    Sleeve2In,
    /// Small SCT thread.
    SmallSct,
    /// Large SCT thread, 3.25".
    LargeSct325,
    /// Large SCT thread, 3.28".
    LargeSct328,
}

/// Declared bridges between otherwise distinct sizes. Symmetric, not transitive.
const SIZE_EQUIVALENCES: [(SizeClass, SizeClass); 4] = [
    (SizeClass::M42With125Sleeve, SizeClass::M42),
    (SizeClass::M42With125Sleeve, SizeClass::Sleeve125),
    (SizeClass::M48With2InSleeve, SizeClass::M48),
    (SizeClass::M48With2InSleeve, SizeClass::Sleeve2In),
];

impl SizeClass {
    /// Returns `true` if an end of size `self` can mate with an end of size `other`.
    #[inline]
    pub fn mates_with(self, other: SizeClass) -> bool {
        if self == SizeClass::Zero || other == SizeClass::Zero {
            return false;
        }
        if self == other {
            return true;
        }
        SIZE_EQUIVALENCES
            .iter()
            .any(|&(a, b)| (a == self && b == other) || (a == other && b == self))
    }

    /// Stable tag used in item signatures.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Every size class, in declaration order.
    pub const ALL: [SizeClass; 14] = [
        SizeClass::Zero,
        SizeClass::M12,
        SizeClass::Video1In,
        SizeClass::M28_5,
        SizeClass::M42,
        SizeClass::M42With125Sleeve,
        SizeClass::M44_5,
        SizeClass::M48,
        SizeClass::M48With2InSleeve,
        SizeClass::Sleeve125,
        SizeClass::Sleeve2In,
        SizeClass::SmallSct,
        SizeClass::LargeSct325,
        SizeClass::LargeSct328,
    ];
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SizeClass::Zero => "-",
            SizeClass::M12 => "M12",
            SizeClass::Video1In => "1in video",
            SizeClass::M28_5 => "M28.5",
            SizeClass::M42 => "M42",
            SizeClass::M42With125Sleeve => "M42/1.25in",
            SizeClass::M44_5 => "M44.5",
            SizeClass::M48 => "M48",
            SizeClass::M48With2InSleeve => "M48/2in",
            SizeClass::Sleeve125 => "1.25in",
            SizeClass::Sleeve2In => "2in",
            SizeClass::SmallSct => "SCT",
            SizeClass::LargeSct325 => "SCT 3.25in",
            SizeClass::LargeSct328 => "SCT 3.28in",
        };
        write!(f, "{}", name)
    }
}

/// One end of an item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    kind: ConnectorKind,
    size: SizeClass,
}

impl Endpoint {
    #[inline]
    pub const fn new(kind: ConnectorKind, size: SizeClass) -> Self {
        Self { kind, size }
    }

    /// A closed end.
    #[inline]
    pub const fn terminator() -> Self {
        Self::new(ConnectorKind::Terminator, SizeClass::Zero)
    }

    #[inline]
    pub const fn kind(&self) -> ConnectorKind {
        self.kind
    }

    #[inline]
    pub const fn size(&self) -> SizeClass {
        self.size
    }

    /// Returns `true` if this end is closed, either by kind or by size.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.kind == ConnectorKind::Terminator || self.size == SizeClass::Zero
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.size, self.kind)
    }
}
