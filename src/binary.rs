//! Binary Heap implementation
//!
//! A straightforward binary min-heap stored in a contiguous `Vec`, kept as a
//! baseline for the Fibonacci heap.
//!
//! # Time Complexity
//!
//! | Operation  | Complexity |
//! |------------|------------|
//! | `push`     | O(log n)   |
//! | `pop`      | O(log n)   |
//! | `peek`     | O(1)       |
//! | `merge`    | O(n + m)   |
//! | `from_vec` | O(n)       |
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::Heap;
//! use mergeable_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! heap.push(3);
//! heap.push(1);
//! heap.push(2);
//!
//! assert_eq!(heap.peek(), Ok(&1));
//! assert_eq!(heap.pop(), Ok(1));
//! assert_eq!(heap.pop(), Ok(2));
//! assert_eq!(heap.pop(), Ok(3));
//! assert!(heap.pop().is_err());
//! ```

use crate::error::{HeapError, HeapResult};
use crate::traits::Heap;
use std::fmt;

/// A binary min-heap
#[derive(Clone)]
pub struct BinaryHeap<T> {
    /// Keys in heap order: `data[i] <= data[2i + 1]` and `data[i] <= data[2i + 2]`
    data: Vec<T>,
}

impl<T: Ord> Heap<T> for BinaryHeap<T> {
    fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, key: T) {
        self.data.push(key);
        self.sift_up(self.data.len() - 1);
    }

    fn peek(&self) -> HeapResult<&T> {
        self.data.first().ok_or(HeapError::EmptyStructure)
    }

    fn pop(&mut self) -> HeapResult<T> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyStructure);
        }

        let key = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Ok(key)
    }

    /// Appends `other`'s keys and re-heapifies, which is linear and beats
    /// pushing them one at a time
    fn merge(&mut self, other: &mut Self) {
        if other.data.len() > self.data.len() {
            std::mem::swap(&mut self.data, &mut other.data);
        }
        self.data.append(&mut other.data);
        self.rebuild();
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Ord> BinaryHeap<T> {
    /// Creates an empty heap with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Builds a heap from arbitrary keys in O(n)
    pub fn from_vec(data: Vec<T>) -> Self {
        let mut heap = Self { data };
        heap.rebuild();
        heap
    }

    /// Returns the keys in heap order (not sorted)
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Floyd's bottom-up heap construction
    fn rebuild(&mut self) {
        for index in (0..self.data.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.data[index] < self.data[parent] {
                self.data.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.data[left] < self.data[smallest] {
                smallest = left;
            }
            if right < len && self.data[right] < self.data[smallest] {
                smallest = right;
            }

            if smallest == index {
                break;
            }
            self.data.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: Ord> Default for BinaryHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for BinaryHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Ord> Extend<T> for BinaryHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.push(key);
        }
    }
}

impl<T: Ord> From<Vec<T>> for BinaryHeap<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for BinaryHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("len", &self.data.len())
            .field("min", &self.data.first())
            .finish()
    }
}
