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

//! # Items
//!
//! An `Item` is one physical piece of the image train: a telescope, a spacer,
//! a filter wheel, a camera. Items are immutable values. The only transform,
//! `Item::reversed`, returns a flipped clone and leaves the original alone.
//!
//! Each item carries a canonical `ItemSignature` derived solely from its
//! physical properties, so two catalog entries with different names but the
//! same geometry are considered interchangeable by the deduplication logic.

use crate::connector::{ConnectorKind, Endpoint, SizeClass};
use uuid::Uuid;

/// Stable identifier of an inventory item.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(Uuid);

impl ItemId {
    /// Creates a fresh random identifier.
    #[inline]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an item is. Cosmetic except for filtering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Telescope,
    Adapter,
    Spacer,
    FilterWheel,
    FilterDrawer,
    Filter,
    Barlow,
    Diagonal,
    FocalReducer,
    OffAxisGuider,
    Sensor,
    Eyepiece,
    CompressionRing,
    #[default]
    Other,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ItemKind::Telescope => "Telescope",
            ItemKind::Adapter => "Adapter",
            ItemKind::Spacer => "Spacer",
            ItemKind::FilterWheel => "Filter Wheel",
            ItemKind::FilterDrawer => "Filter Drawer",
            ItemKind::Filter => "Filter",
            ItemKind::Barlow => "Barlow",
            ItemKind::Diagonal => "Diagonal",
            ItemKind::FocalReducer => "Focal Reducer",
            ItemKind::OffAxisGuider => "Off-Axis Guider",
            ItemKind::Sensor => "Sensor",
            ItemKind::Eyepiece => "Eyepiece",
            ItemKind::CompressionRing => "Compression Ring",
            ItemKind::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

/// Where in the train an item would like to sit. Only affects ranking.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsertionPoint {
    FlushToTarget,
    PreferTarget,
    #[default]
    NoPreference,
    PreferSensor,
    FlushToSensor,
}

/// Number of bytes in an item signature.
pub const SIGNATURE_LEN: usize = 28;

/// Canonical byte encoding of the physical properties of an item.
///
/// Layout: target end kind and size, sensor end kind and size, then length,
/// backfocus and thread recess as little-endian `f64` bits. The reversible
/// flag and the insertion point are handling hints and are not encoded.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ItemSignature([u8; SIGNATURE_LEN]);

impl ItemSignature {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A single physical component of an image train.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    id: ItemId,
    kind: ItemKind,
    model: String,
    manufacturer: String,
    short_code: String,
    target_end: Endpoint,
    sensor_end: Endpoint,
    length_mm: f64,
    backfocus_mm: f64,
    thread_recess_mm: f64,
    reversible: bool,
    is_reversed: bool,
    insertion_point: InsertionPoint,
}

impl Item {
    /// Starts building an item with the given ends and a fresh id.
    pub fn builder(target_end: Endpoint, sensor_end: Endpoint) -> ItemBuilder {
        ItemBuilder::new(target_end, sensor_end)
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[inline]
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    #[inline]
    pub fn short_code(&self) -> &str {
        &self.short_code
    }

    /// The end facing the telescope.
    #[inline]
    pub fn target_end(&self) -> Endpoint {
        self.target_end
    }

    /// The end facing the camera.
    #[inline]
    pub fn sensor_end(&self) -> Endpoint {
        self.sensor_end
    }

    #[inline]
    pub fn length_mm(&self) -> f64 {
        self.length_mm
    }

    /// Required distance to the focal plane, or `0` if this item does not
    /// define one.
    #[inline]
    pub fn backfocus_mm(&self) -> f64 {
        self.backfocus_mm
    }

    /// Depth by which the thread sinks into the mating item.
    #[inline]
    pub fn thread_recess_mm(&self) -> f64 {
        self.thread_recess_mm
    }

    /// Length this item adds to the train once screwed in.
    #[inline]
    pub fn effective_length_mm(&self) -> f64 {
        self.length_mm - self.thread_recess_mm
    }

    #[inline]
    pub fn is_reversible(&self) -> bool {
        self.reversible
    }

    /// Returns `true` if this value is the flipped orientation of a catalog item.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.is_reversed
    }

    #[inline]
    pub fn insertion_point(&self) -> InsertionPoint {
        self.insertion_point
    }

    /// Returns `true` if this item defines a backfocus requirement.
    #[inline]
    pub fn defines_backfocus(&self) -> bool {
        self.backfocus_mm > 0.0
    }

    /// Returns a copy with the two ends swapped.
    ///
    /// A non-reversible item is returned unchanged.
    pub fn reversed(&self) -> Item {
        let mut flipped = self.clone();
        if self.reversible {
            std::mem::swap(&mut flipped.target_end, &mut flipped.sensor_end);
            flipped.is_reversed = !self.is_reversed;
        }
        flipped
    }

    /// Computes the canonical physical signature of this item.
    pub fn signature(&self) -> ItemSignature {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[0] = self.target_end.kind().code();
        bytes[1] = self.target_end.size().code();
        bytes[2] = self.sensor_end.kind().code();
        bytes[3] = self.sensor_end.size().code();
        bytes[4..12].copy_from_slice(&canonical_bits(self.length_mm));
        bytes[12..20].copy_from_slice(&canonical_bits(self.backfocus_mm));
        bytes[20..28].copy_from_slice(&canonical_bits(self.thread_recess_mm));
        ItemSignature(bytes)
    }

    /// A compact one-line label such as `"Spacer 10mm [M42]"`.
    pub fn short_label(&self) -> String {
        let name = if !self.short_code.is_empty() {
            self.short_code.as_str()
        } else if !self.model.is_empty() {
            self.model.as_str()
        } else {
            return format!("{} {}mm", self.kind, self.length_mm);
        };
        format!("{} {}mm", name, self.length_mm)
    }
}

/// `-0.0` and `0.0` must encode identically.
#[inline]
fn canonical_bits(value: f64) -> [u8; 8] {
    let normalized = if value == 0.0 { 0.0 } else { value };
    normalized.to_bits().to_le_bytes()
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {} {}mm{}{}",
            self.target_end.size(),
            self.target_end.kind().target_glyph(),
            if self.model.is_empty() {
                self.kind.to_string()
            } else {
                self.model.clone()
            },
            self.length_mm,
            self.sensor_end.kind().sensor_glyph(),
            self.sensor_end.size(),
        )?;
        if self.defines_backfocus() {
            write!(f, " (BF {}mm)", self.backfocus_mm)?;
        }
        Ok(())
    }
}

/// Fluent builder for `Item`.
#[derive(Clone, Debug)]
pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    pub fn new(target_end: Endpoint, sensor_end: Endpoint) -> Self {
        Self {
            item: Item {
                id: ItemId::random(),
                kind: ItemKind::Other,
                model: String::new(),
                manufacturer: String::new(),
                short_code: String::new(),
                target_end,
                sensor_end,
                length_mm: 0.0,
                backfocus_mm: 0.0,
                thread_recess_mm: 0.0,
                reversible: false,
                is_reversed: false,
                insertion_point: InsertionPoint::NoPreference,
            },
        }
    }

    pub fn id(mut self, id: ItemId) -> Self {
        self.item.id = id;
        self
    }

    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.item.kind = kind;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.item.model = model.into();
        self
    }

    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.item.manufacturer = manufacturer.into();
        self
    }

    pub fn short_code(mut self, short_code: impl Into<String>) -> Self {
        self.item.short_code = short_code.into();
        self
    }

    pub fn length_mm(mut self, length_mm: f64) -> Self {
        self.item.length_mm = length_mm;
        self
    }

    pub fn backfocus_mm(mut self, backfocus_mm: f64) -> Self {
        self.item.backfocus_mm = backfocus_mm;
        self
    }

    pub fn thread_recess_mm(mut self, thread_recess_mm: f64) -> Self {
        self.item.thread_recess_mm = thread_recess_mm;
        self
    }

    pub fn reversible(mut self, reversible: bool) -> Self {
        self.item.reversible = reversible;
        self
    }

    pub fn insertion_point(mut self, insertion_point: InsertionPoint) -> Self {
        self.item.insertion_point = insertion_point;
        self
    }

    pub fn build(self) -> Item {
        self.item
    }
}

/// Shorthand for a plain threaded tube: receiver toward the target, inserter
/// toward the sensor, both of `size`.
pub fn spacer(size: SizeClass, length_mm: f64) -> Item {
    Item::builder(
        Endpoint::new(ConnectorKind::Receiver, size),
        Endpoint::new(ConnectorKind::Inserter, size),
    )
    .kind(ItemKind::Spacer)
    .length_mm(length_mm)
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asymmetric() -> Item {
        Item::builder(
            Endpoint::new(ConnectorKind::Receiver, SizeClass::M42),
            Endpoint::new(ConnectorKind::Inserter, SizeClass::M48),
        )
        .length_mm(12.5)
        .thread_recess_mm(1.0)
        .reversible(true)
        .build()
    }

    #[test]
    fn test_reverse_twice_restores_original() {
        let item = asymmetric();
        let twice = item.reversed().reversed();
        assert_eq!(item, twice);
    }

    #[test]
    fn test_reverse_swaps_ends_on_a_clone() {
        let item = asymmetric();
        let flipped = item.reversed();
        assert_eq!(flipped.target_end(), item.sensor_end());
        assert_eq!(flipped.sensor_end(), item.target_end());
        assert!(flipped.is_reversed());
        assert!(!item.is_reversed());
        assert_eq!(flipped.id(), item.id());
    }

    #[test]
    fn test_reverse_non_reversible_is_noop() {
        let item = spacer(SizeClass::M42, 10.0);
        assert!(!item.is_reversible());
        assert_eq!(item.reversed(), item);
    }

    #[test]
    fn test_signature_ignores_cosmetics() {
        let a = spacer(SizeClass::M42, 10.0);
        let b = Item::builder(a.target_end(), a.sensor_end())
            .kind(ItemKind::Adapter)
            .model("Other name")
            .manufacturer("Acme")
            .short_code("X1")
            .length_mm(10.0)
            .build();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_signature_tracks_physical_changes() {
        let a = spacer(SizeClass::M42, 10.0);
        let b = spacer(SizeClass::M42, 10.5);
        let c = spacer(SizeClass::M48, 10.0);
        assert_ne!(a.signature(), b.signature());
        assert_ne!(a.signature(), c.signature());
    }

    #[test]
    fn test_symmetric_reversal_keeps_signature() {
        let item = Item::builder(
            Endpoint::new(ConnectorKind::Dual, SizeClass::M42),
            Endpoint::new(ConnectorKind::Dual, SizeClass::M42),
        )
        .length_mm(5.0)
        .reversible(true)
        .build();
        assert_eq!(item.signature(), item.reversed().signature());
    }

    #[test]
    fn test_reversed_item_matches_fixed_twin() {
        let flippable = Item::builder(
            Endpoint::new(ConnectorKind::Receiver, SizeClass::M48),
            Endpoint::new(ConnectorKind::Inserter, SizeClass::M42),
        )
        .length_mm(12.0)
        .reversible(true)
        .build();
        let twin = Item::builder(
            Endpoint::new(ConnectorKind::Inserter, SizeClass::M42),
            Endpoint::new(ConnectorKind::Receiver, SizeClass::M48),
        )
        .length_mm(12.0)
        .insertion_point(InsertionPoint::PreferSensor)
        .build();
        assert_eq!(flippable.reversed().signature(), twin.signature());
        assert_ne!(flippable.signature(), twin.signature());
    }

    #[test]
    fn test_negative_zero_signature() {
        let a = spacer(SizeClass::M42, 0.0);
        let b = spacer(SizeClass::M42, -0.0);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_effective_length() {
        assert_eq!(asymmetric().effective_length_mm(), 11.5);
    }

    #[test]
    fn test_display_uses_glyphs() {
        let item = spacer(SizeClass::M42, 10.0);
        let rendered = item.to_string();
        assert!(rendered.starts_with("M42]"), "got {}", rendered);
        assert!(rendered.ends_with("//M42"), "got {}", rendered);
    }

    #[test]
    fn test_short_label_prefers_code() {
        let item = Item::builder(Endpoint::terminator(), Endpoint::terminator())
            .model("Long model name")
            .short_code("LMN")
            .length_mm(3.0)
            .build();
        assert_eq!(item.short_label(), "LMN 3mm");
    }
}
