//! Error type shared by every heap in the crate

use thiserror::Error;

/// Result alias for heap operations that can observe an empty heap
pub type HeapResult<T> = Result<T, HeapError>;

/// Errors returned by heap operations
///
/// Only reading or removing the minimum can fail. Insertion and merging
/// always succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum HeapError {
    /// `peek` or `pop` was called on a heap holding no elements
    #[error("heap is empty")]
    EmptyStructure,
}
