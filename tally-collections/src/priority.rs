//! Binary min-heap priority queue.
//!
//! Lower priority numbers are served first. Equal priorities come out in
//! whatever order the heap structure yields; insertion order is not
//! preserved between ties.
//!
//! # Example
//!
//! ```
//! use tally_collections::PriorityQueue;
//!
//! let mut queue = PriorityQueue::new();
//! queue.enqueue("x", 5);
//! queue.enqueue("y", 1);
//! queue.enqueue("z", 3);
//!
//! assert_eq!(queue.dequeue(), Some("y"));
//! assert_eq!(queue.dequeue(), Some("z"));
//! assert_eq!(queue.dequeue(), Some("x"));
//! assert_eq!(queue.dequeue(), None);
//! ```

use core::borrow::Borrow;
use core::fmt;

/// A value tagged with its priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    /// Scheduling priority; lower is served first.
    pub priority: i64,
    /// The stored value.
    pub value: T,
}

/// A min-heap of `(priority, value)` entries stored in a `Vec`.
///
/// For every index `i > 0`, `heap[(i - 1) / 2].priority <= heap[i].priority`.
#[derive(Clone)]
pub struct PriorityQueue<T> {
    heap: Vec<Entry<T>>,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    /// Creates an empty queue.
    #[inline]
    pub const fn new() -> Self {
        Self { heap: Vec::new() }
    }

    /// Creates an empty queue with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of queued entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Adds `value` with the given priority. O(log n).
    pub fn enqueue(&mut self, value: T, priority: i64) {
        self.heap.push(Entry { priority, value });
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the value with the lowest priority. O(log n).
    #[inline]
    pub fn dequeue(&mut self) -> Option<T> {
        self.dequeue_entry().map(|(_, value)| value)
    }

    /// Removes the lowest-priority entry, returning its priority and value.
    pub fn dequeue_entry(&mut self) -> Option<(i64, T)> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let entry = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((entry.priority, entry.value))
    }

    /// Returns the lowest-priority value without removing it. O(1).
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.heap.first().map(|entry| &entry.value)
    }

    /// Returns the lowest priority currently queued.
    #[inline]
    pub fn peek_priority(&self) -> Option<i64> {
        self.heap.first().map(|entry| entry.priority)
    }

    /// Returns the position of the first match in priority order, the same
    /// order [`to_vec`](Self::to_vec) lists.
    pub fn search<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.sorted()
            .into_iter()
            .position(|entry| <T as Borrow<Q>>::borrow(&entry.value) == value)
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Returns the entries in heap (array) order.
    #[inline]
    pub fn as_slice(&self) -> &[Entry<T>] {
        &self.heap
    }

    /// Returns `(priority, value)` pairs sorted by priority.
    ///
    /// Sorts a copy; the heap itself is left as it is. O(n log n).
    pub fn to_vec(&self) -> Vec<(i64, T)>
    where
        T: Clone,
    {
        self.sorted()
            .into_iter()
            .map(|entry| (entry.priority, entry.value.clone()))
            .collect()
    }

    fn sorted(&self) -> Vec<&Entry<T>> {
        let mut entries: Vec<&Entry<T>> = self.heap.iter().collect();
        entries.sort_by_key(|entry| entry.priority);
        entries
    }

    fn sift_up(&mut self, pos: usize) {
        let mut hole = pos;
        while hole > 0 {
            let parent = (hole - 1) / 2;
            if self.heap[hole].priority < self.heap[parent].priority {
                self.heap.swap(hole, parent);
                hole = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, pos: usize) {
        let len = self.heap.len();
        let mut hole = pos;

        // Descend to a leaf, always following the smaller child
        loop {
            let left = 2 * hole + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len && self.heap[right].priority < self.heap[left].priority {
                right
            } else {
                left
            };
            self.heap.swap(hole, smaller);
            hole = smaller;
        }

        // Then sift back up from the leaf
        while hole > pos {
            let parent = (hole - 1) / 2;
            if self.heap[hole].priority < self.heap[parent].priority {
                self.heap.swap(hole, parent);
                hole = parent;
            } else {
                break;
            }
        }
    }

    #[cfg(test)]
    fn assert_heap(&self) {
        for i in 1..self.heap.len() {
            let parent = (i - 1) / 2;
            assert!(
                self.heap[parent].priority <= self.heap[i].priority,
                "heap order violated at {i}"
            );
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.sorted().into_iter().map(|e| (e.priority, &e.value)))
            .finish()
    }
}

impl<T> Extend<(T, i64)> for PriorityQueue<T> {
    fn extend<I: IntoIterator<Item = (T, i64)>>(&mut self, iter: I) {
        for (value, priority) in iter {
            self.enqueue(value, priority);
        }
    }
}

impl<T> FromIterator<(T, i64)> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = (T, i64)>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}
