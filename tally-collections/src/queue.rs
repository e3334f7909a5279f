//! Unbounded FIFO queue over a `VecDeque`.

use core::borrow::Borrow;
use core::fmt;
use std::collections::VecDeque;

/// An unbounded first-in first-out queue.
///
/// Enqueue appends at the back and dequeue removes from the front, both in
/// O(1) (enqueue amortized).
///
/// # Example
///
/// ```
/// use tally_collections::ArrayQueue;
///
/// let mut queue = ArrayQueue::new();
/// queue.enqueue("a");
/// queue.enqueue("b");
///
/// assert_eq!(queue.dequeue(), Some("a"));
/// assert_eq!(queue.peek(), Some(&"b"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArrayQueue<T> {
    items: VecDeque<T>,
}

impl<T> ArrayQueue<T> {
    /// Creates an empty queue.
    #[inline]
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Creates an empty queue with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Returns the number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a value at the back.
    #[inline]
    pub fn enqueue(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Removes and returns the value at the front.
    #[inline]
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Returns the value at the front without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Returns the position from the front of the first match.
    pub fn search<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.items
            .iter()
            .position(|v| <T as Borrow<Q>>::borrow(v) == value)
    }

    /// Removes every element.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns an iterator over values, front first.
    #[inline]
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the stored values, front first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for ArrayQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for ArrayQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
