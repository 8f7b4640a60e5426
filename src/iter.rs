//! Sorted iteration over any [`Heap`]
//!
//! These are the counterparts of `BinaryHeap::drain_sorted` and
//! `BinaryHeap::into_sorted_vec` from the standard library, built purely on
//! the [`Heap`] trait so every heap in the crate gets them.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::Heap;
//! use mergeable_heaps::binomial::BinomialHeap;
//! use mergeable_heaps::iter::IntoSorted;
//!
//! let heap: BinomialHeap<i32> = [4, 1, 3].into_iter().collect();
//! let sorted: Vec<i32> = IntoSorted::new(heap).collect();
//! assert_eq!(sorted, vec![1, 3, 4]);
//! ```

use crate::traits::Heap;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Iterator that pops the minimum of a borrowed heap on each step
///
/// Created by [`Heap::drain_sorted`].
pub struct DrainSorted<'a, T: Ord, H: Heap<T>> {
    heap: &'a mut H,
    _phantom: PhantomData<T>,
}

impl<'a, T: Ord, H: Heap<T>> DrainSorted<'a, T, H> {
    pub(crate) fn new(heap: &'a mut H) -> Self {
        Self {
            heap,
            _phantom: PhantomData,
        }
    }
}

impl<T: Ord, H: Heap<T>> Iterator for DrainSorted<'_, T, H> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.heap.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<T: Ord, H: Heap<T>> ExactSizeIterator for DrainSorted<'_, T, H> {}

impl<T: Ord, H: Heap<T>> FusedIterator for DrainSorted<'_, T, H> {}

/// Owning iterator that yields the keys of a heap in non-decreasing order
pub struct IntoSorted<T: Ord, H: Heap<T>> {
    heap: H,
    _phantom: PhantomData<T>,
}

impl<T: Ord, H: Heap<T>> IntoSorted<T, H> {
    /// Wraps `heap`; nothing is popped until the iterator is advanced
    pub fn new(heap: H) -> Self {
        Self {
            heap,
            _phantom: PhantomData,
        }
    }

    /// Returns the heap with whatever keys have not been yielded yet
    pub fn into_inner(self) -> H {
        self.heap
    }
}

impl<T: Ord, H: Heap<T>> Iterator for IntoSorted<T, H> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.heap.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<T: Ord, H: Heap<T>> ExactSizeIterator for IntoSorted<T, H> {}

impl<T: Ord, H: Heap<T>> FusedIterator for IntoSorted<T, H> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BinaryHeap;
    use crate::fibonacci::FibonacciHeap;

    #[test]
    fn test_drain_sorted_partial() {
        let mut heap: FibonacciHeap<i32> = [5, 3, 8, 1, 10].into_iter().collect();

        let first_two: Vec<_> = heap.drain_sorted().take(2).collect();
        assert_eq!(first_two, vec![1, 3]);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Ok(&5));
    }

    #[test]
    fn test_drain_sorted_size_hint() {
        let mut heap: BinaryHeap<i32> = (0..7).collect();
        let mut drain = heap.drain_sorted();
        assert_eq!(drain.len(), 7);
        drain.next();
        assert_eq!(drain.len(), 6);
    }

    #[test]
    fn test_into_sorted_into_inner() {
        let heap: FibonacciHeap<i32> = [2, 9, 4].into_iter().collect();
        let mut iter = IntoSorted::new(heap);
        assert_eq!(iter.next(), Some(2));

        let rest = iter.into_inner();
        assert_eq!(rest.into_sorted_vec(), vec![4, 9]);
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let mut iter = IntoSorted::new(BinaryHeap::from_vec(vec![1]));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
