//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert and find_min
//! - O(1) merge when either heap holds a single arena segment, O(log s)
//!   amortized in general (s = live segments, see the `storage` module)
//! - O(log n) amortized extract_min
//!
//! The structure consists of a collection of heap-ordered trees. Roots are
//! linked in a circular doubly linked list and the heap caches the root with
//! the smallest key. Insert and merge only touch the root list; all the
//! restructuring is deferred to [`FibonacciHeap::extract_min`], which promotes
//! the children of the removed minimum to roots and then consolidates the
//! root list so that at most one tree of each degree remains.
//!
//! Nodes are stored in an arena (see the `storage` module) and addressed by
//! index, so merging two heaps moves arena segments instead of nodes.
//!
//! # Determinism
//!
//! Ties are resolved the same way on every run:
//! - insert and merge only replace the cached minimum when the new key is
//!   strictly smaller
//! - during consolidation the root found first keeps the parent role unless
//!   the other root is strictly smaller
//!
//! No decrease-key or delete operation is offered. The `marked` flag of each
//! node is maintained (cleared on link and on promotion to root) but never
//! consulted.

mod consolidate;

use crate::error::{HeapError, HeapResult};
use crate::storage::{NodeId, NodeStore};
use crate::traits::Heap;
use std::fmt;
use tracing::debug;

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert(5);
/// heap.insert(1);
/// assert_eq!(heap.find_min(), Ok(&1));
///
/// let mut other = FibonacciHeap::new();
/// other.insert(0);
/// heap.merge(&mut other);
/// assert!(other.is_empty());
/// assert_eq!(heap.extract_min(), Ok(0));
/// ```
pub struct FibonacciHeap<T> {
    store: NodeStore<T>,
    /// Root with the smallest key; `None` exactly when the heap is empty
    min: Option<NodeId>,
    len: usize,
}

impl<T: Ord> Heap<T> for FibonacciHeap<T> {
    fn new() -> Self {
        Self {
            store: NodeStore::new(),
            min: None,
            len: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, key: T) {
        self.insert(key)
    }

    fn peek(&self) -> HeapResult<&T> {
        self.find_min()
    }

    fn pop(&mut self) -> HeapResult<T> {
        self.extract_min()
    }

    fn merge(&mut self, other: &mut Self) {
        FibonacciHeap::merge(self, other)
    }

    fn clear(&mut self) {
        FibonacciHeap::clear(self)
    }
}

impl<T: Ord> FibonacciHeap<T> {
    /// Creates an empty heap
    pub fn new() -> Self {
        <Self as Heap<T>>::new()
    }

    /// Creates an empty heap with room for `capacity` nodes before the
    /// arena has to grow
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: NodeStore::with_capacity(capacity),
            min: None,
            len: 0,
        }
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts a key into the root list
    ///
    /// The new node becomes the minimum if the heap was empty or its key is
    /// strictly smaller than the current minimum. No restructuring happens.
    ///
    /// **Time Complexity**: O(1) worst-case
    pub fn insert(&mut self, key: T) {
        let node = self.store.alloc(key);

        match self.min {
            Some(min) => {
                self.store.splice(min, node);
                if self.store.node(node).key < self.store.node(min).key {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }

        self.len += 1;
        self.after_mutation();
    }

    /// Returns the minimum key
    ///
    /// # Errors
    /// [`HeapError::EmptyStructure`] if the heap is empty.
    pub fn find_min(&self) -> HeapResult<&T> {
        self.min
            .map(|min| &self.store.node(min).key)
            .ok_or(HeapError::EmptyStructure)
    }

    /// Removes and returns the minimum key
    ///
    /// **Algorithm**:
    /// 1. Promote every child of the minimum to the root list (clearing its
    ///    parent link)
    /// 2. Unlink the minimum from the root list
    /// 3. If no roots remain the heap is now empty; otherwise take any
    ///    remaining root as provisional minimum and consolidate, which
    ///    computes the real one
    ///
    /// **Time Complexity**: O(log n) amortized
    ///
    /// # Errors
    /// [`HeapError::EmptyStructure`] if the heap is empty.
    pub fn extract_min(&mut self) -> HeapResult<T> {
        let min = self.min.ok_or(HeapError::EmptyStructure)?;

        if let Some(first_child) = self.store.node_mut(min).child.take() {
            for child in self.store.ring(first_child) {
                let node = self.store.node_mut(child);
                node.parent = None;
                node.marked = false;
            }
            // The whole child ring joins the root list in one splice
            self.store.splice(min, first_child);
            self.store.node_mut(min).degree = 0;
        }

        let successor = self.store.unlink(min);
        let key = self.store.free(min);
        self.len -= 1;

        match successor {
            Some(next) => {
                self.min = Some(next);
                self.consolidate(next);
            }
            None => self.min = None,
        }

        self.after_mutation();
        Ok(key)
    }

    /// Moves every element of `other` into this heap
    ///
    /// The two root lists are spliced by relinking their boundary nodes and
    /// the smaller of the two minimums is kept (ours on a tie). No node is
    /// visited and no consolidation happens. `other` ends up empty and
    /// remains usable.
    ///
    /// **Time Complexity**: the splice is O(1). Handing over the arena moves
    /// the smaller of the two segment maps, which is O(1) for heaps that
    /// never absorbed another and O(log s) amortized over any merge sequence.
    pub fn merge(&mut self, other: &mut Self) {
        let Some(other_min) = other.min.take() else {
            return;
        };
        let moved = std::mem::take(&mut other.len);
        let segments = self.store.absorb(&mut other.store);

        match self.min {
            Some(min) => {
                self.store.splice(min, other_min);
                if self.store.node(other_min).key < self.store.node(min).key {
                    self.min = Some(other_min);
                }
            }
            None => self.min = Some(other_min),
        }
        self.len += moved;

        debug!(moved, segments, len = self.len, "merged fibonacci heaps");
        self.after_mutation();
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.store.clear();
        self.min = None;
        self.len = 0;
    }

    #[inline]
    fn after_mutation(&self) {
        #[cfg(feature = "invariant-checks")]
        self.assert_invariants();
    }

    /// Walks the whole structure and panics if any invariant is broken:
    /// - every ring is doubly linked consistently
    /// - roots have no parent and none is smaller than the cached minimum
    /// - every child points back to its parent and is not smaller than it
    /// - every degree equals the size of the child ring
    /// - the number of reachable nodes equals `len` and the arena size
    #[cfg(any(test, feature = "invariant-checks"))]
    pub fn assert_invariants(&self) {
        let Some(min) = self.min else {
            assert_eq!(self.len, 0, "no minimum but len is {}", self.len);
            assert_eq!(self.store.node_count(), 0, "empty heap still owns nodes");
            return;
        };

        let roots = self.checked_ring(min);
        let mut pending = Vec::with_capacity(roots.len());
        for &root in &roots {
            let node = self.store.node(root);
            assert!(node.parent.is_none(), "root {root:?} has a parent");
            assert!(
                self.store.node(min).key <= node.key,
                "root {root:?} is smaller than the cached minimum"
            );
            pending.push(root);
        }

        let mut reachable = 0;
        while let Some(id) = pending.pop() {
            reachable += 1;
            let node = self.store.node(id);
            let children = match node.child {
                Some(first) => self.checked_ring(first),
                None => Default::default(),
            };
            assert_eq!(node.degree, children.len(), "degree mismatch at {id:?}");
            for child in children {
                let child_node = self.store.node(child);
                assert_eq!(child_node.parent, Some(id), "bad parent link at {child:?}");
                assert!(node.key <= child_node.key, "heap order violated at {child:?}");
                pending.push(child);
            }
        }

        assert_eq!(reachable, self.len, "reachable nodes differ from len");
        assert_eq!(self.store.node_count(), self.len, "arena holds unreachable nodes");
    }

    #[cfg(any(test, feature = "invariant-checks"))]
    fn checked_ring(&self, start: NodeId) -> crate::storage::Ring {
        let mut members = crate::storage::Ring::new();
        let mut current = start;
        loop {
            assert!(members.len() <= self.len, "ring at {start:?} does not close");
            let right = self.store.node(current).right;
            assert_eq!(self.store.node(right).left, current, "broken back link at {right:?}");
            members.push(current);
            current = right;
            if current == start {
                return members;
            }
        }
    }
}

impl<T: Ord> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for FibonacciHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut heap = Self::with_capacity(iter.size_hint().0);
        heap.extend(iter);
        heap
    }
}

impl<T: Ord> Extend<T> for FibonacciHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.find_min().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::cmp::{Ordering, Reverse};
    use std::io;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    fn drain(heap: &mut FibonacciHeap<i32>) -> Vec<i32> {
        let mut out = Vec::new();
        while let Ok(key) = heap.extract_min() {
            heap.assert_invariants();
            out.push(key);
        }
        out
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        for key in [5, 3, 8, 1, 10] {
            heap.insert(key);
            heap.assert_invariants();
        }

        assert_eq!(heap.len(), 5);
        assert_eq!(heap.find_min(), Ok(&1));
        assert_eq!(drain(&mut heap), vec![1, 3, 5, 8, 10]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_empty_heap() {
        let mut heap: FibonacciHeap<i32> = FibonacciHeap::new();
        assert_eq!(heap.find_min(), Err(HeapError::EmptyStructure));
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyStructure));

        heap.insert(1);
        assert_eq!(heap.extract_min(), Ok(1));
        assert_eq!(heap.find_min(), Err(HeapError::EmptyStructure));
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyStructure));
        heap.assert_invariants();
    }

    #[test]
    fn test_merge() {
        let mut heap1 = FibonacciHeap::new();
        heap1.insert(3);
        heap1.insert(7);

        let mut heap2 = FibonacciHeap::new();
        heap2.insert(2);
        heap2.insert(5);

        heap1.merge(&mut heap2);
        heap1.assert_invariants();
        heap2.assert_invariants();

        assert!(heap2.is_empty());
        assert_eq!(heap2.len(), 0);
        assert_eq!(heap1.len(), 4);
        assert_eq!(heap1.find_min(), Ok(&2));
        assert_eq!(drain(&mut heap1), vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_merge_into_empty_and_from_empty() {
        let mut empty = FibonacciHeap::new();
        let mut full: FibonacciHeap<i32> = [4, 2, 6].into_iter().collect();

        empty.merge(&mut full);
        assert_eq!(empty.len(), 3);
        assert!(full.is_empty());

        let mut nothing = FibonacciHeap::new();
        empty.merge(&mut nothing);
        assert_eq!(empty.len(), 3);
        empty.assert_invariants();
        assert_eq!(drain(&mut empty), vec![2, 4, 6]);
    }

    #[test]
    fn test_donor_reusable_after_merge() {
        let mut receiver: FibonacciHeap<i32> = (0..10).collect();
        let mut donor: FibonacciHeap<i32> = (10..20).collect();
        donor.extract_min().unwrap();

        receiver.merge(&mut donor);
        donor.insert(100);
        donor.insert(-1);
        donor.assert_invariants();

        receiver.merge(&mut donor);
        receiver.assert_invariants();
        assert_eq!(receiver.len(), 21);
        assert_eq!(receiver.extract_min(), Ok(-1));
        assert_eq!(receiver.len(), 20);
    }

    #[test]
    fn test_merge_keeps_receiver_min_on_tie() {
        let mut a = FibonacciHeap::new();
        a.insert(Tagged(1, 'a'));
        let mut b = FibonacciHeap::new();
        b.insert(Tagged(1, 'b'));
        a.merge(&mut b);
        assert_eq!(a.find_min().map(|t| t.1), Ok('a'));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_children_promoted_after_consolidation() {
        let mut heap: FibonacciHeap<i32> = (0..64).rev().collect();
        // First extraction consolidates the 63 remaining roots into trees
        assert_eq!(heap.extract_min(), Ok(0));
        heap.assert_invariants();
        let roots = heap.store.ring(heap.min.unwrap());
        assert!(roots.len() <= 6, "{} roots after consolidation", roots.len());

        for expected in 1..64 {
            assert_eq!(heap.extract_min(), Ok(expected));
            heap.assert_invariants();
        }
    }

    #[test]
    fn test_root_degrees_distinct_after_extract() {
        let mut heap: FibonacciHeap<i32> = (0..100).collect();
        heap.extract_min().unwrap();

        let mut degrees: Vec<usize> = heap
            .store
            .ring(heap.min.unwrap())
            .iter()
            .map(|&id| heap.store.node(id).degree)
            .collect();
        degrees.sort_unstable();
        let before = degrees.len();
        degrees.dedup();
        assert_eq!(before, degrees.len());
        // 99 = 64 + 32 + 2 + 1
        assert_eq!(degrees, vec![0, 1, 5, 6]);
    }

    #[test]
    fn test_duplicate_keys() {
        let mut heap = FibonacciHeap::new();
        for _ in 0..5 {
            heap.insert(7);
            heap.insert(3);
        }
        let drained = drain(&mut heap);
        assert_eq!(drained, vec![3, 3, 3, 3, 3, 7, 7, 7, 7, 7]);
    }

    /// Key whose ordering ignores its tag, to observe tie-breaking
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Tagged(i32, char);

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> Ordering {
            self.0.cmp(&other.0)
        }
    }

    #[test]
    fn test_insert_tie_keeps_existing_min() {
        let mut heap = FibonacciHeap::new();
        heap.insert(Tagged(1, 'a'));
        heap.insert(Tagged(1, 'b'));
        assert_eq!(heap.find_min().map(|t| t.1), Ok('a'));
    }

    #[test]
    fn test_link_tie_first_root_wins() {
        let mut heap = FibonacciHeap::new();
        heap.insert(Tagged(0, 'z'));
        heap.insert(Tagged(1, 'a'));
        heap.insert(Tagged(1, 'b'));
        // Removing 'z' leaves 'a' then 'b' in the root list; 'a' was found
        // first so it stays the root
        heap.extract_min().unwrap();
        heap.assert_invariants();

        let root = heap.min.unwrap();
        assert_eq!(heap.store.node(root).key.1, 'a');
        assert_eq!(heap.store.node(root).degree, 1);
        let child = heap.store.node(root).child.unwrap();
        assert_eq!(heap.store.node(child).key.1, 'b');
    }

    #[test]
    fn test_promoted_child_loses_mark() {
        let mut heap: FibonacciHeap<i32> = (0..3).collect();
        assert_eq!(heap.extract_min(), Ok(0));

        let root = heap.min.unwrap();
        let child = heap.store.node(root).child.unwrap();
        heap.store.node_mut(child).marked = true;

        assert_eq!(heap.extract_min(), Ok(1));
        assert_eq!(heap.min, Some(child));
        assert!(!heap.store.node(child).marked);
        assert!(heap.store.node(child).parent.is_none());
        heap.assert_invariants();
    }

    #[test]
    fn test_reverse_gives_max_heap() {
        let mut heap = FibonacciHeap::new();
        for key in [5, 3, 8, 1, 10] {
            heap.insert(Reverse(key));
        }
        assert_eq!(heap.extract_min(), Ok(Reverse(10)));
        assert_eq!(heap.extract_min(), Ok(Reverse(8)));
    }

    #[test]
    fn test_clear() {
        let mut heap: FibonacciHeap<i32> = (0..50).collect();
        heap.extract_min().unwrap();
        heap.clear();
        heap.assert_invariants();
        assert!(heap.is_empty());
        heap.insert(9);
        assert_eq!(heap.find_min(), Ok(&9));
    }

    /// Key that counts how many times it has been dropped
    struct DropCounter<'a> {
        key: i32,
        drops: &'a Cell<usize>,
    }

    impl Drop for DropCounter<'_> {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl PartialEq for DropCounter<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    impl Eq for DropCounter<'_> {}

    impl PartialOrd for DropCounter<'_> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for DropCounter<'_> {
        fn cmp(&self, other: &Self) -> Ordering {
            self.key.cmp(&other.key)
        }
    }

    #[test]
    fn test_teardown_releases_every_key_once() {
        let drops = Cell::new(0);
        {
            let mut heap = FibonacciHeap::new();
            for key in 0..200 {
                heap.insert(DropCounter { key, drops: &drops });
            }
            let mut other = FibonacciHeap::new();
            for key in 200..300 {
                other.insert(DropCounter { key, drops: &drops });
            }
            heap.merge(&mut other);

            // build deep trees before abandoning the heap
            for _ in 0..10 {
                drop(heap.extract_min().unwrap());
            }
            assert_eq!(drops.get(), 10);
        }
        assert_eq!(drops.get(), 300);
    }

    #[test]
    fn test_teardown_with_shared_keys() {
        let shared = Rc::new(());
        {
            let mut heap = FibonacciHeap::new();
            for key in 0..32 {
                heap.insert((key, Rc::clone(&shared)));
            }
            heap.extract_min().unwrap();
            assert_eq!(Rc::strong_count(&shared), 32);
        }
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn test_debug_output() {
        let heap: FibonacciHeap<i32> = [4, 2].into_iter().collect();
        assert_eq!(format!("{heap:?}"), "FibonacciHeap { len: 2, min: Some(2) }");
    }

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_merge_and_consolidation_emit_events() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();

        let sorted = tracing::subscriber::with_default(subscriber, || {
            let mut heap: FibonacciHeap<i32> = (0..32).rev().collect();
            let mut other: FibonacciHeap<i32> = (32..40).collect();
            heap.merge(&mut other);
            heap.into_sorted_vec()
        });
        assert_eq!(sorted, (0..40).collect::<Vec<_>>());

        let output = logs.contents();
        assert!(output.contains("merged fibonacci heaps"), "{output}");
        assert!(output.contains("moved=8"), "{output}");
        assert!(output.contains("segments=1"), "{output}");
        assert!(output.contains("len=40"), "{output}");
        assert!(output.contains("consolidating root list"), "{output}");
        assert!(output.contains("consolidation finished"), "{output}");
    }

    #[test]
    fn test_no_events_without_merge_or_extract() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let heap: FibonacciHeap<i32> = (0..16).collect();
            assert_eq!(heap.find_min(), Ok(&0));
        });
        assert!(logs.contents().is_empty());
    }

    mod model_check {
        use crate::error::HeapError;
        use crate::fibonacci::FibonacciHeap;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(i32),
            Extract,
            MergeIn(Vec<i32>),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (-50i32..50).prop_map(Op::Insert),
                3 => Just(Op::Extract),
                1 => prop::collection::vec(-50i32..50, 0..12).prop_map(Op::MergeIn),
            ]
        }

        proptest! {
            #[test]
            fn invariants_hold_after_every_operation(ops in prop::collection::vec(op(), 0..200)) {
                let mut heap = FibonacciHeap::new();
                let mut model: Vec<i32> = Vec::new();

                for op in ops {
                    match op {
                        Op::Insert(key) => {
                            heap.insert(key);
                            model.push(key);
                        }
                        Op::Extract => {
                            model.sort_unstable();
                            let expected = if model.is_empty() {
                                Err(HeapError::EmptyStructure)
                            } else {
                                Ok(model.remove(0))
                            };
                            prop_assert_eq!(heap.extract_min(), expected);
                        }
                        Op::MergeIn(keys) => {
                            let mut other: FibonacciHeap<i32> = keys.iter().copied().collect();
                            heap.merge(&mut other);
                            prop_assert!(other.is_empty());
                            model.extend(keys);
                        }
                    }
                    heap.assert_invariants();
                    prop_assert_eq!(heap.len(), model.len());
                    prop_assert_eq!(heap.find_min().ok(), model.iter().min());
                }
            }
        }
    }
}
