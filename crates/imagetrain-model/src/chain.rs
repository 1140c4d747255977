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

//! # Chains
//!
//! A `Chain` is the partial image train of one search branch, stored as an
//! index arena of connector nodes. Each node owns a `Connection` (the item
//! facing the target and the item facing the sensor of one joint) plus an
//! optional link to the next node toward the sensor. A link, once set, can
//! never be replaced.
//!
//! Branching clones the arena, which is a flat copy of a few indices per
//! joint.

use crate::index::{ItemIndex, NodeIndex};
use smallvec::SmallVec;
use thiserror::Error;

/// Structural errors raised while assembling a chain.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainError {
    #[error("connector node {node} already links toward the sensor")]
    AlreadyLinked { node: NodeIndex },
    #[error("connector node {node} is out of bounds for a chain of {len} nodes")]
    NodeOutOfBounds { node: NodeIndex, len: usize },
}

/// The orientation in which a catalog item is used.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Orientation {
    #[default]
    Forward,
    Reversed,
}

impl Orientation {
    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reversed,
            Orientation::Reversed => Orientation::Forward,
        }
    }
}

/// A catalog item in a specific orientation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Placement {
    item: ItemIndex,
    orientation: Orientation,
}

impl Placement {
    #[inline]
    pub const fn new(item: ItemIndex, orientation: Orientation) -> Self {
        Self { item, orientation }
    }

    #[inline]
    pub const fn forward(item: ItemIndex) -> Self {
        Self::new(item, Orientation::Forward)
    }

    #[inline]
    pub const fn item(&self) -> ItemIndex {
        self.item
    }

    #[inline]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.orientation {
            Orientation::Forward => write!(f, "{}", self.item),
            Orientation::Reversed => write!(f, "{}~", self.item),
        }
    }
}

/// One joint: the item facing the target and the item facing the sensor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Connection {
    target_facing: Placement,
    sensor_facing: Placement,
}

impl Connection {
    #[inline]
    pub const fn new(target_facing: Placement, sensor_facing: Placement) -> Self {
        Self {
            target_facing,
            sensor_facing,
        }
    }

    #[inline]
    pub const fn target_facing(&self) -> Placement {
        self.target_facing
    }

    #[inline]
    pub const fn sensor_facing(&self) -> Placement {
        self.sensor_facing
    }
}

/// A node of the chain arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ConnectorNode {
    connection: Connection,
    sensor_link: Option<NodeIndex>,
}

impl ConnectorNode {
    #[inline]
    pub const fn connection(&self) -> Connection {
        self.connection
    }

    #[inline]
    pub const fn sensor_link(&self) -> Option<NodeIndex> {
        self.sensor_link
    }
}

/// Inline node capacity before the arena spills to the heap.
const INLINE_NODES: usize = 8;

/// The ordered placements of one search branch, rooted at the target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chain {
    root: Placement,
    nodes: SmallVec<[ConnectorNode; INLINE_NODES]>,
    tail: Option<NodeIndex>,
}

impl Chain {
    /// Creates a chain holding only `root`.
    pub fn new(root: Placement) -> Self {
        Self {
            root,
            nodes: SmallVec::new(),
            tail: None,
        }
    }

    /// Returns the first placement of the chain.
    #[inline]
    pub fn root(&self) -> Placement {
        self.root
    }

    /// Returns the most recently appended placement.
    #[inline]
    pub fn tail(&self) -> Placement {
        match self.tail {
            Some(node) => self.nodes[node.get()].connection.sensor_facing,
            None => self.root,
        }
    }

    /// Returns the most recently added node, if any.
    #[inline]
    pub fn tail_node(&self) -> Option<NodeIndex> {
        self.tail
    }

    /// Number of placements, including the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() + 1
    }

    /// A chain always contains its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the node at `index`.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> Result<&ConnectorNode, ChainError> {
        self.nodes.get(index.get()).ok_or(ChainError::NodeOutOfBounds {
            node: index,
            len: self.nodes.len(),
        })
    }

    /// Appends `placement` after the current tail and returns the new node.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::AlreadyLinked` if the current tail node already
    /// links onward.
    pub fn extend(&mut self, placement: Placement) -> Result<NodeIndex, ChainError> {
        let connection = Connection::new(self.tail(), placement);
        let new_node = NodeIndex::new(self.nodes.len());
        self.nodes.push(ConnectorNode {
            connection,
            sensor_link: None,
        });
        if let Some(previous) = self.tail {
            if let Err(err) = self.link(previous, new_node) {
                self.nodes.pop();
                return Err(err);
            }
        }
        self.tail = Some(new_node);
        Ok(new_node)
    }

    /// Returns a copy of this chain with `placement` appended.
    pub fn extended(&self, placement: Placement) -> Result<Chain, ChainError> {
        let mut child = self.clone();
        child.extend(placement)?;
        Ok(child)
    }

    /// Sets the sensor-side link of `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::NodeOutOfBounds` if either node does not exist and
    /// `ChainError::AlreadyLinked` if `from` already has a link.
    pub fn link(&mut self, from: NodeIndex, to: NodeIndex) -> Result<(), ChainError> {
        let len = self.nodes.len();
        if to.get() >= len {
            return Err(ChainError::NodeOutOfBounds { node: to, len });
        }
        let node = self
            .nodes
            .get_mut(from.get())
            .ok_or(ChainError::NodeOutOfBounds { node: from, len })?;
        if node.sensor_link.is_some() {
            return Err(ChainError::AlreadyLinked { node: from });
        }
        node.sensor_link = Some(to);
        Ok(())
    }

    /// Iterates the placements from the root toward the sensor by following
    /// node links.
    pub fn placements(&self) -> Placements<'_> {
        Placements {
            chain: self,
            next: if self.nodes.is_empty() {
                None
            } else {
                Some(NodeIndex::new(0))
            },
            yielded_root: false,
        }
    }

    /// Returns `true` if any placement uses `item`.
    pub fn contains(&self, item: ItemIndex) -> bool {
        self.placements().any(|p| p.item() == item)
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, placement) in self.placements().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", placement)?;
        }
        Ok(())
    }
}

/// Iterator returned by [`Chain::placements`].
pub struct Placements<'a> {
    chain: &'a Chain,
    next: Option<NodeIndex>,
    yielded_root: bool,
}

impl Iterator for Placements<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.yielded_root {
            self.yielded_root = true;
            return Some(self.chain.root);
        }
        let current = self.next?;
        let node = self.chain.nodes.get(current.get())?;
        self.next = node.sensor_link;
        Some(node.connection.sensor_facing)
    }
}
