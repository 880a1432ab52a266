//! Mergeable priority queue implemented as a Fibonacci heap
//!
//! This crate provides a min-heap over `(priority, item)` pairs with
//! handle-based priority updates:
//!
//! - **insert**: O(1) amortized
//! - **find_min**: O(1)
//! - **merge**: O(1) (ring splice; handles survive the merge)
//! - **decrease_key**: O(1) amortized
//! - **extract_min** / **delete**: O(log n) amortized
//!
//! Every node is its own allocation, so merging splices two root rings
//! without moving any element. Handles carry a validity token tied to
//! their node's lifetime, so a stale handle is reported as an error
//! instead of corrupting the heap.
//!
//! The heap is single-threaded: its multi-step pointer surgery leaves the
//! structure transiently inconsistent, so concurrent use must be
//! serialized externally (one lock per heap, held across each call).
//!
//! # Example
//!
//! ```rust
//! use fibheap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let deploy = heap.insert(5, "deploy");
//! heap.insert(3, "build");
//!
//! heap.decrease_key(&deploy, 1)?;
//! assert_eq!(heap.find_min(), Some((&1, &"deploy")));
//!
//! assert_eq!(heap.extract_min(), Some((1, "deploy")));
//! assert_eq!(heap.extract_min(), Some((3, "build")));
//! assert_eq!(heap.extract_min(), None);
//! # Ok::<(), fibheap::HeapError>(())
//! ```

pub mod fibonacci;
pub mod traits;

pub use fibonacci::{FibHandle, FibonacciHeap};
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
