//! Root-list consolidation
//!
//! After `extract_min` the root list may hold many trees. Consolidation links
//! roots of equal degree (the larger key becomes a child of the smaller)
//! until every degree occurs at most once, then rebuilds the root list from
//! the survivors and picks the new minimum. Each link removes one root, which
//! is what pays for the cheap inserts and merges.

use super::FibonacciHeap;
use crate::storage::NodeId;
use smallvec::{smallvec, SmallVec};
use tracing::trace;

/// Golden ratio. A root of degree k has at least PHI^k descendants.
const PHI: f64 = 1.618_033_988_749_895;

/// Slots of headroom above `ceil(log_phi(n))`
const DEGREE_MARGIN: usize = 2;

/// Roots indexed by degree
type DegreeTable = SmallVec<[Option<NodeId>; 64]>;

/// Upper bound on the degree of any root in a heap of `len` nodes, plus margin
pub(super) fn degree_bound(len: usize) -> usize {
    if len < 2 {
        return 1 + DEGREE_MARGIN;
    }
    (len as f64).log(PHI).ceil() as usize + DEGREE_MARGIN
}

impl<T: Ord> FibonacciHeap<T> {
    /// Links equal-degree roots until all root degrees are distinct
    ///
    /// `start` is any node of the root list. The roots are snapshotted
    /// before the pass because linking rewrites the list while we go.
    ///
    /// Tie-break: the root already in the degree table was found earlier and
    /// stays the parent unless the incoming root is strictly smaller.
    pub(super) fn consolidate(&mut self, start: NodeId) {
        let roots = self.store.ring(start);
        let bound = degree_bound(self.len);
        let mut table: DegreeTable = smallvec![None; bound];
        let mut links = 0usize;
        let mut grew = false;
        trace!(roots = roots.len(), bound, "consolidating root list");

        for root in roots {
            let mut winner = root;
            let mut degree = self.store.node(winner).degree;
            loop {
                if degree >= table.len() {
                    table.resize(degree + 1, None);
                    grew = true;
                }
                let Some(occupant) = table[degree].take() else {
                    break;
                };

                let (parent, child) =
                    if self.store.node(winner).key < self.store.node(occupant).key {
                        (winner, occupant)
                    } else {
                        (occupant, winner)
                    };
                self.link(child, parent);
                links += 1;
                winner = parent;
                degree += 1;
            }
            table[degree] = Some(winner);
        }

        // Re-thread the survivors in ascending degree order
        let mut head: Option<NodeId> = None;
        let mut min: Option<NodeId> = None;
        let mut survivors = 0usize;
        for root in table.into_iter().flatten() {
            survivors += 1;
            self.store.isolate(root);
            match head {
                Some(head) => self.store.splice(head, root),
                None => head = Some(root),
            }
            min = match min {
                Some(current) if self.store.node(current).key <= self.store.node(root).key => {
                    Some(current)
                }
                _ => Some(root),
            };
        }
        self.min = min;

        trace!(links, roots = survivors, grew, "consolidation finished");
    }

    /// Makes the root `child` a child of the root `parent`
    ///
    /// `child` leaves the root list, loses its mark and is appended to the
    /// end of `parent`'s child ring. Callers guarantee `parent <= child`.
    fn link(&mut self, child: NodeId, parent: NodeId) {
        self.store.unlink(child);
        let node = self.store.node_mut(child);
        node.parent = Some(parent);
        node.marked = false;

        let parent_node = self.store.node_mut(parent);
        parent_node.degree += 1;
        let first_child = parent_node.child;
        match first_child {
            Some(first) => self.store.splice(first, child),
            None => self.store.node_mut(parent).child = Some(child),
        }
    }
}
