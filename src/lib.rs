//! Mergeable Heap Data Structures for Rust
//!
//! This crate provides min-heaps that support insertion, minimum lookup,
//! extraction of the minimum and merging of two heaps.
//!
//! # Heaps
//!
//! - **Fibonacci Heap**: O(1) insert; O(log n) amortized extract-min; merge
//!   splices root lists in O(1) and hands over arena segments in O(log s)
//!   amortized.
//!   Nodes live in an index-addressed arena, so there is no unsafe code and no
//!   reference counting.
//! - **Binomial Heap**: O(log n) insert, extract-min and merge (binary-carry union)
//! - **Binary Heap**: O(log n) insert and extract-min over a `Vec`; O(n + m) merge
//!
//! All of them implement the [`Heap`] trait. Reading or removing the minimum
//! of an empty heap returns [`HeapError::EmptyStructure`].
//!
//! None of the heaps are meant for concurrent mutation. Wrap an instance in a
//! lock if several threads need it.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::fibonacci::FibonacciHeap;
//! use mergeable_heaps::{Heap, HeapError};
//!
//! let mut heap = FibonacciHeap::new();
//! for key in [5, 3, 8, 1, 10] {
//!     heap.push(key);
//! }
//! assert_eq!(heap.peek(), Ok(&1));
//!
//! let mut other = FibonacciHeap::new();
//! other.push(2);
//! heap.merge(&mut other);
//! assert!(other.is_empty());
//!
//! assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3, 5, 8, 10]);
//! assert_eq!(other.pop(), Err(HeapError::EmptyStructure));
//! ```

pub mod binary;
pub mod binomial;
pub mod error;
pub mod fibonacci;
pub mod iter;
mod storage;
pub mod traits;

// Re-export the main trait and error for convenience
pub use error::{HeapError, HeapResult};
pub use traits::Heap;
