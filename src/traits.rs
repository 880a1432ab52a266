//! Common traits for heap/priority queue types
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: Base trait for min-heaps without `decrease_key` support
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based `decrease_key`
//!   and `delete`
//!
//! The base [`Heap`] trait follows Rust's standard heap API patterns, while
//! [`DecreaseKeyHeap`] adds the operations needed by algorithms like
//! Dijkstra's shortest path that update priorities of elements already in
//! the queue.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The requested priority is strictly greater than the current one
    InvalidPriorityIncrease,
    /// The handle no longer refers to a live element (already extracted
    /// or deleted)
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidPriorityIncrease => {
                write!(f, "new priority is greater than current priority")
            }
            HeapError::InvalidHandle => {
                write!(f, "handle does not refer to a live element")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for `decrease_key` and `delete`
///
/// This is an opaque identifier for a specific element. Handles may be
/// `Clone` but not necessarily `Copy`, and are only meaningful for the
/// heap currently holding their element.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for min-heap/priority queue data structures
///
/// Unlike `BinaryHeap`, which stores values directly and is a max-heap,
/// these heaps store (priority, item) pairs and order by smallest priority.
///
/// For handle-based priority updates, see [`DecreaseKeyHeap`].
pub trait Heap<T, P: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap holds no elements
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn push(&mut self, priority: P, item: T);

    /// Returns the minimum priority and its item without removing them
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and its item
    ///
    /// # Time Complexity
    /// O(log n) amortized for Fibonacci heaps.
    fn pop(&mut self) -> Option<(P, T)>;

    /// Merges another heap into this one, consuming the other heap
    ///
    /// # Time Complexity
    /// O(1) for Fibonacci heaps (a ring splice).
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` and `delete` support
///
/// Elements inserted through [`push_with_handle`](Self::push_with_handle)
/// can later have their priority lowered or be removed from the middle of
/// the heap, identified by the returned handle.
pub trait DecreaseKeyHeap<T, P: Ord>: Heap<T, P> {
    /// The handle type this heap issues for its elements
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    ///
    /// The handle stays valid until the element is removed by
    /// [`pop`](Heap::pop) or [`delete`](Self::delete). Merging does not
    /// invalidate handles: a handle issued by either heap keeps following
    /// its element into the merged heap.
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Lowers the priority of the element identified by the handle
    ///
    /// Setting the priority equal to its current value is accepted and
    /// changes nothing structurally.
    ///
    /// # Errors
    /// - [`HeapError::InvalidPriorityIncrease`] if `new_priority` is
    ///   strictly greater than the current priority; the heap is left
    ///   unchanged.
    /// - [`HeapError::InvalidHandle`] if the handle's element is no longer
    ///   in the heap.
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Removes the element identified by the handle, wherever it sits
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the handle's element is no longer in
    /// the heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized for Fibonacci heaps.
    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;
}
