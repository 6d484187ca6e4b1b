//! Road nodes and the dense node table that owns them.

use crate::{NodeId, Point};

/// A polyline vertex.  Immutable once loaded.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

impl Node {
    #[inline]
    pub fn new(id: NodeId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub fn pos(&self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Dense table of nodes indexed by [`NodeId`].
///
/// Slots that the dataset never wrote stay `None`.  Edges hold `NodeId`s
/// into this table instead of copies of the coordinates.
#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    slots: Vec<Option<Node>>,
}

impl NodeTable {
    /// A table with `capacity` absent slots.
    pub fn with_slots(capacity: usize) -> Self {
        Self { slots: vec![None; capacity] }
    }

    /// Store `node` in its id's slot, growing the table if needed.
    ///
    /// Returns `true` if the table had to grow.
    pub fn insert(&mut self, node: Node) -> bool {
        let idx = node.id.index();
        let grew = idx >= self.slots.len();
        if grew {
            self.slots.resize(idx + 1, None);
        }
        self.slots[idx] = Some(node);
        grew
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn pos(&self, id: NodeId) -> Option<Point> {
        self.get(id).map(Node::pos)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of slots, present or absent.  At least the largest id + 1.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of present nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Present nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

impl FromIterator<Node> for NodeTable {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut table = NodeTable::default();
        for node in iter {
            table.insert(node);
        }
        table
    }
}
