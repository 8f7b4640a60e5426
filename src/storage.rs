//! Arena node storage for the Fibonacci heap
//!
//! Nodes are kept in generational [`SlotMap`] arenas instead of individually
//! boxed allocations. Every link between nodes (parent, first child, left and
//! right sibling) is a [`NodeId`], so the parent/child/sibling cycles of the
//! heap never turn into owning cycles or raw pointers.
//!
//! # Segments
//!
//! A heap does not own a single arena but a map of *segments*, each one a
//! `SlotMap` tagged with a process-unique [`SegmentId`]. New nodes go into
//! the heap's home segment. Merging two heaps moves the donor's segments
//! into the receiver wholesale: node ids embed their segment id, so every
//! link stays valid without touching a single node.
//!
//! - The smaller segment map is always moved into the larger one, so a merge
//!   costs O(min(s1, s2)) where s is the number of live segments. Each move
//!   at least doubles the map a segment belongs to, so over any sequence of
//!   merges a segment moves O(log s) times. A heap that never absorbed
//!   another has exactly one segment and merges in O(1).
//! - A segment other than the home segment is dropped as soon as its last
//!   node is freed.
//! - Dropping the store drops every arena; no traversal of the trees happens.
//!
//! # Rings
//!
//! Sibling lists are circular and doubly linked. A node alone in its list
//! points to itself in both directions. [`NodeStore::splice`],
//! [`NodeStore::unlink`] and [`NodeStore::ring`] are the only places that
//! rewrite or walk `left`/`right`.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Generational slot key inside one segment
    pub(crate) struct SlotKey;
}

/// Process-unique identifier of an arena segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SegmentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable address of a node, valid across merges
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    segment: SegmentId,
    slot: SlotKey,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}:{:?})", self.segment.0, self.slot)
    }
}

/// Snapshot of the members of one ring
pub(crate) type Ring = SmallVec<[NodeId; 16]>;

/// A heap element and its links
pub(crate) struct Node<T> {
    pub(crate) key: T,
    /// Number of children; always the length of the `child` ring
    pub(crate) degree: usize,
    /// Cascading-cut bookkeeping. Cleared on link and on promotion to root;
    /// only the unit tests read it while the heap offers no decrease-key.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) marked: bool,
    /// `None` for roots
    pub(crate) parent: Option<NodeId>,
    /// Entry point into the ring of children
    pub(crate) child: Option<NodeId>,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

type Segment<T> = SlotMap<SlotKey, Node<T>>;

/// Owner of every node of one heap
pub(crate) struct NodeStore<T> {
    segments: FxHashMap<SegmentId, Segment<T>>,
    home: SegmentId,
}

impl<T> NodeStore<T> {
    pub(crate) fn new() -> Self {
        Self {
            segments: FxHashMap::default(),
            home: SegmentId::fresh(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut store = Self::new();
        store
            .segments
            .insert(store.home, SlotMap::with_capacity_and_key(capacity));
        store
    }

    /// Allocates a node that forms a ring of its own
    pub(crate) fn alloc(&mut self, key: T) -> NodeId {
        let segment = self.home;
        let slot = self
            .segments
            .entry(segment)
            .or_insert_with(SlotMap::with_key)
            .insert_with_key(|slot| {
                let id = NodeId { segment, slot };
                Node {
                    key,
                    degree: 0,
                    marked: false,
                    parent: None,
                    child: None,
                    left: id,
                    right: id,
                }
            });
        NodeId { segment, slot }
    }

    /// Releases a node and returns its key
    ///
    /// The caller must already have detached the node from every ring and
    /// from its children.
    pub(crate) fn free(&mut self, id: NodeId) -> T {
        let Some(segment) = self.segments.get_mut(&id.segment) else {
            panic!("free of {id:?}: segment not owned by this heap");
        };
        let Some(node) = segment.remove(id.slot) else {
            panic!("free of {id:?}: node already released");
        };
        if segment.is_empty() && id.segment != self.home {
            self.segments.remove(&id.segment);
        }
        node.key
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        match self
            .segments
            .get(&id.segment)
            .and_then(|segment| segment.get(id.slot))
        {
            Some(node) => node,
            None => panic!("dangling {id:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self
            .segments
            .get_mut(&id.segment)
            .and_then(|segment| segment.get_mut(id.slot))
        {
            Some(node) => node,
            None => panic!("dangling {id:?}"),
        }
    }

    /// Joins the ring containing `b` into the ring containing `a`
    ///
    /// `b`'s ring is inserted immediately before `a`, so with `a` taken as
    /// the head of its list this appends at the tail. `a` and `b` must be in
    /// different rings.
    pub(crate) fn splice(&mut self, a: NodeId, b: NodeId) {
        let a_left = self.node(a).left;
        let b_left = self.node(b).left;

        self.node_mut(a_left).right = b;
        self.node_mut(b).left = a_left;
        self.node_mut(b_left).right = a;
        self.node_mut(a).left = b_left;
    }

    /// Removes `x` from its ring, leaving it as a singleton ring
    ///
    /// Returns `x`'s former right neighbor, or `None` if `x` was alone.
    pub(crate) fn unlink(&mut self, x: NodeId) -> Option<NodeId> {
        let (left, right) = {
            let node = self.node(x);
            (node.left, node.right)
        };
        if right == x {
            return None;
        }

        self.node_mut(left).right = right;
        self.node_mut(right).left = left;
        let node = self.node_mut(x);
        node.left = x;
        node.right = x;
        Some(right)
    }

    /// Resets `x` to a singleton ring without touching its old neighbors
    ///
    /// Only valid when every other member of the old ring is reset too.
    pub(crate) fn isolate(&mut self, x: NodeId) {
        let node = self.node_mut(x);
        node.left = x;
        node.right = x;
    }

    /// Collects the members of the ring starting at `start`, following `right`
    pub(crate) fn ring(&self, start: NodeId) -> Ring {
        let mut members = Ring::new();
        let mut current = start;
        loop {
            members.push(current);
            current = self.node(current).right;
            if current == start {
                break;
            }
        }
        members
    }

    /// Takes ownership of every segment of `donor`
    ///
    /// `donor` is left with no nodes and a brand-new home segment id, so
    /// nothing it allocates later can collide with the moved segments.
    /// Returns the number of segments that changed hands.
    pub(crate) fn absorb(&mut self, donor: &mut Self) -> usize {
        let mut moved = std::mem::take(&mut donor.segments);
        let donor_home = std::mem::replace(&mut donor.home, SegmentId::fresh());

        if moved.len() > self.segments.len() {
            std::mem::swap(&mut moved, &mut self.segments);
            // only the donor's home can be empty on the kept side
            if self.segments.get(&donor_home).is_some_and(SlotMap::is_empty) {
                self.segments.remove(&donor_home);
            }
        }
        let home = self.home;
        moved.retain(|id, segment| *id == home || !segment.is_empty());

        let count = moved.len();
        self.segments.extend(moved);
        count
    }

    /// Releases every node
    pub(crate) fn clear(&mut self) {
        self.segments.clear();
    }

    /// Number of nodes currently allocated across all segments
    #[cfg(any(test, feature = "invariant-checks"))]
    pub(crate) fn node_count(&self) -> usize {
        self.segments.values().map(SlotMap::len).sum()
    }

    #[cfg(test)]
    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }
}
