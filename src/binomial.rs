//! Binomial Heap implementation
//!
//! A binomial heap is a collection of binomial trees with:
//! - O(log n) insert and pop
//! - O(log n) merge
//! - O(1) peek (the slot of the minimum root is cached)
//!
//! Kept as a baseline next to the Fibonacci heap: it links trees eagerly on
//! every insert and merge instead of deferring the work to extraction.
//!
//! # Algorithm Overview
//!
//! **Binomial Tree Bₖ**: B₀ is a single node; Bₖ is two B_{k-1} trees linked
//! so that the root with the larger key becomes the last child of the other.
//! Bₖ has 2ᵏ nodes and its root's children are B₀, B₁, ..., B_{k-1} in that
//! order.
//!
//! The heap keeps at most one tree per degree, exactly like the bits of the
//! binary representation of `len`. Merging two heaps is binary addition:
//! walk the degrees from 0 upwards with a carry, linking whenever two or
//! three trees meet in the same slot. Popping removes the minimum root and
//! adds its children back the same way.
//!
//! **Tie-break**: when two roots have equal keys the one already in this
//! heap's slot stays the parent.

use crate::error::{HeapError, HeapResult};
use crate::traits::Heap;
use std::fmt;
use std::mem;
use tracing::debug;

/// A binomial tree; `children[i]` has degree `i`
struct Tree<T> {
    key: T,
    children: Vec<Tree<T>>,
}

impl<T: Ord> Tree<T> {
    fn singleton(key: T) -> Self {
        Self {
            key,
            children: Vec::new(),
        }
    }

    fn degree(&self) -> usize {
        self.children.len()
    }
}

/// Links two trees of equal degree; `first` wins ties
fn link<T: Ord>(first: Tree<T>, second: Tree<T>) -> Tree<T> {
    debug_assert_eq!(first.degree(), second.degree());
    let (mut parent, child) = if second.key < first.key {
        (second, first)
    } else {
        (first, second)
    };
    parent.children.push(child);
    parent
}

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::Heap;
/// use mergeable_heaps::binomial::BinomialHeap;
///
/// let mut a: BinomialHeap<i32> = [3, 7].into_iter().collect();
/// let mut b: BinomialHeap<i32> = [2, 5].into_iter().collect();
/// a.merge(&mut b);
/// assert_eq!(a.into_sorted_vec(), vec![2, 3, 5, 7]);
/// ```
pub struct BinomialHeap<T> {
    /// Trees indexed by degree. Each slot holds at most one tree and the
    /// last slot, if any, is occupied.
    trees: Vec<Option<Tree<T>>>,
    /// Slot of the root with the smallest key
    min: Option<usize>,
    len: usize,
}

impl<T: Ord> Heap<T> for BinomialHeap<T> {
    fn new() -> Self {
        Self {
            trees: Vec::new(),
            min: None,
            len: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Adds a B₀ tree at slot 0 and propagates the carry
    ///
    /// **Time Complexity**: O(log n) worst-case
    fn push(&mut self, key: T) {
        let mut carry = Tree::singleton(key);
        let mut degree = 0;
        loop {
            if degree == self.trees.len() {
                self.trees.push(None);
            }
            match self.trees[degree].take() {
                Some(existing) => {
                    carry = link(existing, carry);
                    degree += 1;
                }
                None => {
                    self.trees[degree] = Some(carry);
                    break;
                }
            }
        }

        self.len += 1;
        self.refresh_min();
    }

    fn peek(&self) -> HeapResult<&T> {
        self.min
            .and_then(|slot| self.trees[slot].as_ref())
            .map(|tree| &tree.key)
            .ok_or(HeapError::EmptyStructure)
    }

    /// Removes the minimum root and unions its children back in
    ///
    /// **Time Complexity**: O(log n) worst-case
    fn pop(&mut self) -> HeapResult<T> {
        let Some(Tree { key, children }) = self.min.and_then(|slot| self.trees[slot].take())
        else {
            return Err(HeapError::EmptyStructure);
        };

        self.union(children.into_iter().map(Some).collect());
        self.len -= 1;
        self.refresh_min();
        Ok(key)
    }

    /// Binary-carry union of the two tree sequences
    ///
    /// **Time Complexity**: O(log n) worst-case
    fn merge(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }
        let theirs = mem::take(&mut other.trees);
        let moved = mem::take(&mut other.len);
        other.min = None;

        debug!(moved, ours = self.trees.len(), theirs = theirs.len(), "binomial union");
        self.union(theirs);
        self.len += moved;
        self.refresh_min();
    }

    fn clear(&mut self) {
        self.trees.clear();
        self.min = None;
        self.len = 0;
    }
}

impl<T: Ord> BinomialHeap<T> {
    /// Adds `theirs` (indexed by degree) to our trees with a rippling carry
    fn union(&mut self, theirs: Vec<Option<Tree<T>>>) {
        let width = self.trees.len().max(theirs.len());
        self.trees.resize_with(width, || None);

        let mut theirs = theirs.into_iter();
        let mut carry: Option<Tree<T>> = None;
        for degree in 0..width {
            let mine = self.trees[degree].take();
            let other = theirs.next().flatten();
            let (slot, next_carry) = match (mine, other, carry.take()) {
                (None, None, None) => (None, None),
                (Some(t), None, None) | (None, Some(t), None) | (None, None, Some(t)) => {
                    (Some(t), None)
                }
                (Some(a), Some(b), None) | (Some(a), None, Some(b)) | (None, Some(a), Some(b)) => {
                    (None, Some(link(a, b)))
                }
                (Some(a), Some(b), Some(c)) => (Some(c), Some(link(a, b))),
            };
            self.trees[degree] = slot;
            carry = next_carry;
        }
        if carry.is_some() {
            self.trees.push(carry);
        }

        while matches!(self.trees.last(), Some(None)) {
            self.trees.pop();
        }
    }

    /// Rescans the O(log n) roots; the lowest slot wins ties
    fn refresh_min(&mut self) {
        let mut best: Option<(usize, &T)> = None;
        for (slot, tree) in self.trees.iter().enumerate() {
            let Some(tree) = tree else {
                continue;
            };
            match best {
                Some((_, key)) if *key <= tree.key => {}
                _ => best = Some((slot, &tree.key)),
            }
        }
        self.min = best.map(|(slot, _)| slot);
    }
}

impl<T: Ord> Default for BinomialHeap<T> {
    fn default() -> Self {
        <Self as Heap<T>>::new()
    }
}

impl<T: Ord> FromIterator<T> for BinomialHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::default();
        heap.extend(iter);
        heap
    }
}

impl<T: Ord> Extend<T> for BinomialHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.push(key);
        }
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for BinomialHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinomialHeap")
            .field("len", &self.len)
            .field("min", &self.peek().ok())
            .finish()
    }
}
