//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a mergeable priority queue with:
//! - O(1) amortized insert, decrease_key, and merge
//! - O(log n) amortized extract_min and delete
//!
//! The structure is a collection of heap-ordered trees. Roots are linked in
//! a circular doubly linked list (the root ring) and the heap keeps a
//! pointer to the minimum root. Extraction promotes the minimum's children
//! into the root ring and then consolidates trees of equal degree;
//! decrease_key cuts a violating node loose and cascades cuts up through
//! marked ancestors.
//!
//! Every node is its own heap allocation and all structural links
//! (`parent`, `child`, sibling ring) are raw pointers, so merging two
//! heaps is pure pointer surgery and never moves or re-keys an element.
//! Each node also owns a validity token; handles watch it through a weak
//! reference, so a stale [`FibHandle`] is detected and reported instead of
//! dereferenced, even if the allocator has reused the node's address.

use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::{Rc, Weak};

use smallvec::{smallvec, SmallVec};

use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};

/// Handle to an element in a [`FibonacciHeap`]
///
/// A handle stays valid while its element remains in a heap — including
/// across [`FibonacciHeap::merge`], which splices elements from the
/// consumed heap into the surviving one without disturbing them. Once the
/// element is extracted or deleted the handle goes stale, and every later
/// use reports [`HeapError::InvalidHandle`].
///
/// Note: a live handle is tied to the heap that currently holds its
/// element. Using it with an unrelated heap instance is a precondition
/// violation.
#[derive(Clone, Debug)]
pub struct FibHandle {
    node: *const (), // Type-erased pointer to Node<T, P>
    token: Weak<()>,
}

impl PartialEq for FibHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node) && Weak::ptr_eq(&self.token, &other.token)
    }
}

impl Eq for FibHandle {}

impl Handle for FibHandle {}

struct Node<T, P> {
    item: T,
    priority: P,
    /// None for roots.
    parent: Option<NonNull<Node<T, P>>>,
    /// Entry point into the child ring; None when `degree == 0`.
    child: Option<NonNull<Node<T, P>>>,
    /// Sibling ring. A singleton links to itself.
    left: NonNull<Node<T, P>>,
    right: NonNull<Node<T, P>>,
    /// Number of direct children.
    degree: usize,
    /// True iff this non-root node lost a child since it last became a child.
    marked: bool,
    /// Dropped with the node; outstanding handles watch it through a weak.
    token: Rc<()>,
}

/// Fibonacci Heap
///
/// A min-heap over `(priority, item)` pairs with handle-based
/// `decrease_key` and `delete`. Not safe for concurrent mutation; wrap it
/// in a lock if it must be shared across threads.
///
/// # Example
///
/// ```rust
/// use fibheap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Some((&1, &"item")));
/// ```
pub struct FibonacciHeap<T, P: Ord> {
    /// None iff the heap is empty; otherwise the minimal root.
    min: Option<NonNull<Node<T, P>>>,
    len: usize,
    _phantom: PhantomData<(T, P)>,
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            min: None,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns true if `handle` still refers to a live element
    pub fn contains(&self, handle: &FibHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Returns the priority and item behind `handle`, if it is still live
    pub fn get(&self, handle: &FibHandle) -> Option<(&P, &T)> {
        self.resolve(handle).map(|node| unsafe {
            let node = node.as_ptr();
            (&(*node).priority, &(*node).item)
        })
    }

    /// Removes every element from the heap
    pub fn clear(&mut self) {
        let Some(min) = self.min.take() else {
            self.len = 0;
            return;
        };
        // Free every tree iteratively: walk each ring once, queueing child
        // rings before the node itself is dropped.
        unsafe {
            let mut pending: Vec<NonNull<Node<T, P>>> = Vec::new();
            let mut cur = min;
            loop {
                let next = (*cur.as_ptr()).right;
                pending.push(cur);
                if next == min {
                    break;
                }
                cur = next;
            }
            while let Some(node) = pending.pop() {
                if let Some(child) = (*node.as_ptr()).child {
                    let mut c = child;
                    loop {
                        let next = (*c.as_ptr()).right;
                        pending.push(c);
                        if next == child {
                            break;
                        }
                        c = next;
                    }
                }
                drop(Box::from_raw(node.as_ptr()));
            }
        }
        self.len = 0;
    }

    /// Inserts an element with the given priority, returning its handle
    ///
    /// The new node becomes a singleton root spliced next to the current
    /// minimum. O(1), never fails.
    pub fn insert(&mut self, priority: P, item: T) -> FibHandle {
        let token = Rc::new(());
        let weak = Rc::downgrade(&token);
        let node = Box::into_raw(Box::new(Node {
            item,
            priority,
            parent: None,
            child: None,
            left: NonNull::dangling(), // Set immediately below
            right: NonNull::dangling(),
            degree: 0,
            marked: false,
            token,
        }));
        let node_ptr = unsafe { NonNull::new_unchecked(node) };

        unsafe {
            (*node).left = node_ptr;
            (*node).right = node_ptr;

            let old_min = self.min;
            self.add_root(node_ptr);
            if let Some(min) = old_min {
                if (*node).priority < (*min.as_ptr()).priority {
                    self.min = Some(node_ptr);
                }
            }
        }

        self.len += 1;
        FibHandle {
            node: node_ptr.as_ptr() as *const (),
            token: weak,
        }
    }

    /// Returns the minimum priority and its item without removing them
    ///
    /// O(1). `None` iff the heap is empty.
    pub fn find_min(&self) -> Option<(&P, &T)> {
        self.min.map(|min| unsafe {
            let node = min.as_ptr();
            (&(*node).priority, &(*node).item)
        })
    }

    /// Removes and returns the minimum priority and its item
    ///
    /// Promotes the minimum's children into the root ring, unlinks the
    /// minimum, then consolidates equal-degree trees and rescans for the
    /// new minimum. Amortized O(log n). `None` iff the heap is empty.
    pub fn extract_min(&mut self) -> Option<(P, T)> {
        let min = self.min?;

        unsafe {
            // Promote the children: clear parent and mark on each member
            // of the child ring, then splice the whole ring into the root
            // ring.
            if let Some(child) = (*min.as_ptr()).child {
                let mut cur = child;
                loop {
                    (*cur.as_ptr()).parent = None;
                    (*cur.as_ptr()).marked = false;
                    cur = (*cur.as_ptr()).right;
                    if cur == child {
                        break;
                    }
                }
                let min_right = (*min.as_ptr()).right;
                let child_left = (*child.as_ptr()).left;
                (*min.as_ptr()).right = child;
                (*child.as_ptr()).left = min;
                (*child_left.as_ptr()).right = min_right;
                (*min_right.as_ptr()).left = child_left;
            }

            // Unlink the old minimum from the root ring.
            let left = (*min.as_ptr()).left;
            let right = (*min.as_ptr()).right;
            (*left.as_ptr()).right = right;
            (*right.as_ptr()).left = left;

            let node = *Box::from_raw(min.as_ptr());
            self.len -= 1;

            if right == min {
                // The removed root had no siblings and no children.
                self.min = None;
            } else {
                self.min = Some(right);
                self.consolidate(right);
            }
            Some((node.priority, node.item))
        }
    }

    /// Lowers the priority of the element behind `handle`
    ///
    /// Setting a priority equal to the current one is accepted and changes
    /// nothing structurally. If the new priority undercuts the parent's,
    /// the node is cut into the root ring and marked ancestors cascade.
    /// Amortized O(1).
    ///
    /// # Errors
    /// - [`HeapError::InvalidPriorityIncrease`] if `new_priority` is
    ///   strictly greater than the current priority; the heap is untouched.
    /// - [`HeapError::InvalidHandle`] if the element is no longer live.
    pub fn decrease_key(&mut self, handle: &FibHandle, new_priority: P) -> Result<(), HeapError> {
        let node_ptr = self.resolve(handle).ok_or(HeapError::InvalidHandle)?;

        unsafe {
            let node = node_ptr.as_ptr();
            if new_priority > (*node).priority {
                return Err(HeapError::InvalidPriorityIncrease);
            }
            (*node).priority = new_priority;

            if let Some(parent) = (*node).parent {
                if (*node).priority < (*parent.as_ptr()).priority {
                    self.cut(node_ptr, parent);
                    self.cascading_cut(parent);
                }
            }
            if let Some(min) = self.min {
                if (*node).priority < (*min.as_ptr()).priority {
                    self.min = Some(node_ptr);
                }
            }
        }
        Ok(())
    }

    /// Removes the element behind `handle`, wherever it sits in the heap
    ///
    /// Structurally equivalent to decreasing the key to minus infinity and
    /// extracting the minimum: the node is hoisted into the root ring (with
    /// the same cut/cascade the decrease would trigger) and extracted.
    /// Amortized O(log n).
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the element is no longer live.
    pub fn delete(&mut self, handle: &FibHandle) -> Result<(P, T), HeapError> {
        let node_ptr = self.resolve(handle).ok_or(HeapError::InvalidHandle)?;

        unsafe {
            if let Some(parent) = (*node_ptr.as_ptr()).parent {
                self.cut(node_ptr, parent);
                self.cascading_cut(parent);
            }
        }
        self.min = Some(node_ptr);
        self.extract_min().ok_or(HeapError::InvalidHandle)
    }

    /// Merges another heap into this one, consuming it
    ///
    /// Splices the two root rings into one with O(1) pointer surgery; the
    /// resulting minimum is the smaller of the two minimums. Elements are
    /// not moved, so handles issued by either heap keep following their
    /// elements in the merged heap.
    pub fn merge(&mut self, mut other: Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        let (Some(self_min), Some(other_min)) = (self.min, other.min) else {
            return;
        };

        unsafe {
            let self_left = (*self_min.as_ptr()).left;
            let other_left = (*other_min.as_ptr()).left;
            (*self_left.as_ptr()).right = other_min;
            (*other_min.as_ptr()).left = self_left;
            (*other_left.as_ptr()).right = self_min;
            (*self_min.as_ptr()).left = other_left;

            if (*other_min.as_ptr()).priority < (*self_min.as_ptr()).priority {
                self.min = Some(other_min);
            }
        }

        self.len += other.len;
        // The nodes now belong to this heap; keep the consumed heap's Drop
        // from freeing them.
        other.min = None;
        other.len = 0;
    }

    /// Checks the handle's validity token and recovers the node pointer
    ///
    /// The token dies with the node, so a handle whose element was
    /// extracted or deleted resolves to `None` even if the allocation has
    /// been reused since.
    fn resolve(&self, handle: &FibHandle) -> Option<NonNull<Node<T, P>>> {
        if handle.token.strong_count() == 0 {
            return None;
        }
        NonNull::new(handle.node as *mut Node<T, P>)
    }

    /// Splices `node` into the root ring next to the current minimum, or
    /// makes it the sole root of an empty heap
    ///
    /// `node`'s own ring links are overwritten.
    unsafe fn add_root(&mut self, node: NonNull<Node<T, P>>) {
        match self.min {
            Some(min) => {
                let min_left = (*min.as_ptr()).left;
                (*node.as_ptr()).right = min;
                (*node.as_ptr()).left = min_left;
                (*min_left.as_ptr()).right = node;
                (*min.as_ptr()).left = node;
            }
            None => {
                (*node.as_ptr()).left = node;
                (*node.as_ptr()).right = node;
                self.min = Some(node);
            }
        }
    }

    /// Upper bound on any root degree for a heap of `n` elements:
    /// floor(log_phi(n)) + 1
    fn degree_bound(n: usize) -> usize {
        const PHI: f64 = 1.618033988749895;
        ((n as f64).ln() / PHI.ln()).floor() as usize + 1
    }

    /// Merges equal-degree root trees until every root degree is unique
    ///
    /// Called only from `extract_min` with at least one root remaining.
    /// Walks the root ring once into a snapshot (linking below rewires the
    /// ring as it goes), pairs up collisions through a degree table, then
    /// rebuilds the root ring from the occupied slots and rescans for the
    /// minimum.
    unsafe fn consolidate(&mut self, start: NonNull<Node<T, P>>) {
        debug_assert!(self.len > 0, "consolidate on an empty heap");
        let bound = Self::degree_bound(self.len);

        let mut roots: SmallVec<[NonNull<Node<T, P>>; 32]> = SmallVec::new();
        let mut cur = start;
        loop {
            roots.push(cur);
            cur = (*cur.as_ptr()).right;
            if cur == start {
                break;
            }
        }

        let mut table: SmallVec<[Option<NonNull<Node<T, P>>>; 32]> = smallvec![None; bound + 1];

        for root in roots {
            let mut x = root;
            let mut d = (*x.as_ptr()).degree;
            debug_assert!(d <= bound, "root degree exceeds the Fibonacci bound");
            while let Some(mut y) = table[d] {
                // The strictly smaller priority wins; a tie keeps the root
                // currently being processed as the winner.
                if (*y.as_ptr()).priority < (*x.as_ptr()).priority {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                table[d] = None;
                d += 1;
                debug_assert!(d <= bound, "root degree exceeds the Fibonacci bound");
            }
            table[d] = Some(x);
        }

        // Rebuild the root ring from the occupied slots and rescan for the
        // minimum.
        self.min = None;
        for slot in table.into_iter().flatten() {
            match self.min {
                None => {
                    (*slot.as_ptr()).left = slot;
                    (*slot.as_ptr()).right = slot;
                    self.min = Some(slot);
                }
                Some(min) => {
                    self.add_root(slot);
                    if (*slot.as_ptr()).priority < (*min.as_ptr()).priority {
                        self.min = Some(slot);
                    }
                }
            }
        }
    }

    /// Detaches root `child` from the root ring and attaches it under
    /// `parent`, unmarked
    unsafe fn link(&mut self, child: NonNull<Node<T, P>>, parent: NonNull<Node<T, P>>) {
        let left = (*child.as_ptr()).left;
        let right = (*child.as_ptr()).right;
        (*left.as_ptr()).right = right;
        (*right.as_ptr()).left = left;

        (*child.as_ptr()).parent = Some(parent);
        (*child.as_ptr()).marked = false;

        match (*parent.as_ptr()).child {
            Some(entry) => {
                let entry_left = (*entry.as_ptr()).left;
                (*child.as_ptr()).right = entry;
                (*child.as_ptr()).left = entry_left;
                (*entry_left.as_ptr()).right = child;
                (*entry.as_ptr()).left = child;
            }
            None => {
                (*parent.as_ptr()).child = Some(child);
                (*child.as_ptr()).left = child;
                (*child.as_ptr()).right = child;
            }
        }
        (*parent.as_ptr()).degree += 1;
    }

    /// Removes `node` from `parent`'s child ring and splices it into the
    /// root ring, clearing its mark
    unsafe fn cut(&mut self, node: NonNull<Node<T, P>>, parent: NonNull<Node<T, P>>) {
        let left = (*node.as_ptr()).left;
        let right = (*node.as_ptr()).right;
        if right == node {
            // Only child.
            (*parent.as_ptr()).child = None;
        } else {
            (*left.as_ptr()).right = right;
            (*right.as_ptr()).left = left;
            if (*parent.as_ptr()).child == Some(node) {
                (*parent.as_ptr()).child = Some(right);
            }
        }
        (*parent.as_ptr()).degree -= 1;
        (*node.as_ptr()).parent = None;
        (*node.as_ptr()).marked = false;
        self.add_root(node);
    }

    /// Walks parent links upward, cutting marked ancestors
    ///
    /// Iterative rather than recursive: an adversarial decrease_key
    /// sequence can make a cascade arbitrarily long even though its
    /// amortized cost is O(1).
    unsafe fn cascading_cut(&mut self, start: NonNull<Node<T, P>>) {
        let mut node = start;
        loop {
            let Some(parent) = (*node.as_ptr()).parent else {
                // Roots stay unmarked.
                return;
            };
            if !(*node.as_ptr()).marked {
                (*node.as_ptr()).marked = true;
                return;
            }
            self.cut(node, parent);
            node = parent;
        }
    }
}

impl<T, P: Ord> Drop for FibonacciHeap<T, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, P: Ord> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> Heap<T, P> for FibonacciHeap<T, P> {
    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, priority: P, item: T) {
        self.insert(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.find_min()
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.extract_min()
    }

    fn merge(&mut self, other: Self) {
        FibonacciHeap::merge(self, other)
    }
}

impl<T, P: Ord> DecreaseKeyHeap<T, P> for FibonacciHeap<T, P> {
    type Handle = FibHandle;

    fn push_with_handle(&mut self, priority: P, item: T) -> FibHandle {
        self.insert(priority, item)
    }

    fn decrease_key(&mut self, handle: &FibHandle, new_priority: P) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_priority)
    }

    fn delete(&mut self, handle: &FibHandle) -> Result<(P, T), HeapError> {
        FibonacciHeap::delete(self, handle)
    }
}
