//! Common trait for heap data structures
//!
//! Every heap in this crate is a min-heap over keys of a totally ordered type
//! `T`. The [`Heap`] trait exposes the operations they all share so that
//! tests, benchmarks and callers can be written once and run against any of
//! them.
//!
//! Max-heap behavior is obtained by storing `std::cmp::Reverse<T>` keys.

use crate::error::HeapResult;
use crate::iter::DrainSorted;

/// Base trait for mergeable min-heaps
///
/// The API mirrors `std::collections::BinaryHeap` (`push`, `peek`, `pop`)
/// with two differences:
/// - the smallest key is returned first, not the largest
/// - `peek` and `pop` report an empty heap through [`HeapError`](crate::HeapError)
///   instead of `None`
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::{Heap, HeapError};
/// use mergeable_heaps::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Ok(&1));
/// assert_eq!(heap.pop(), Ok(1));
/// assert_eq!(heap.len(), 2);
///
/// heap.clear();
/// assert_eq!(heap.pop(), Err(HeapError::EmptyStructure));
/// ```
pub trait Heap<T: Ord>: Sized {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap holds no elements
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(1) for the Fibonacci heap, O(log n) for the baselines.
    fn push(&mut self, key: T);

    /// Returns the minimum key without removing it
    ///
    /// # Errors
    /// [`HeapError::EmptyStructure`](crate::HeapError::EmptyStructure) if
    /// the heap is empty.
    fn peek(&self) -> HeapResult<&T>;

    /// Removes and returns the minimum key
    ///
    /// # Errors
    /// [`HeapError::EmptyStructure`](crate::HeapError::EmptyStructure) if
    /// the heap is empty.
    ///
    /// # Time Complexity
    /// O(log n), amortized for the Fibonacci heap.
    fn pop(&mut self) -> HeapResult<T>;

    /// Moves every element of `other` into this heap
    ///
    /// `other` is left empty and can be reused afterwards.
    ///
    /// # Time Complexity
    /// O(1) for a Fibonacci heap holding one arena segment and O(log s)
    /// amortized in general, O(log n) for the binomial heap, O(n + m) for
    /// the binary heap.
    fn merge(&mut self, other: &mut Self);

    /// Removes every element
    fn clear(&mut self) {
        while self.pop().is_ok() {}
    }

    /// Returns an iterator that pops keys in non-decreasing order
    ///
    /// Keys not consumed by the iterator stay in the heap.
    fn drain_sorted(&mut self) -> DrainSorted<'_, T, Self> {
        DrainSorted::new(self)
    }

    /// Consumes the heap and returns its keys in non-decreasing order
    fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        sorted.extend(self.drain_sorted());
        sorted
    }
}
