//! Fixed-capacity circular FIFO queue.
//!
//! Elements occupy `len` consecutive slots (modulo capacity) starting at
//! `front`. The rear index, where the next element lands, is derived as
//! `(front + len) % capacity`, so a full buffer and an empty one are never
//! confused.
//!
//! # Example
//!
//! ```
//! use tally_collections::{QueueState, RingBufferQueue};
//!
//! let mut ring = RingBufferQueue::with_capacity(2);
//! ring.enqueue(1).unwrap();
//! ring.enqueue(2).unwrap();
//! assert!(ring.enqueue(3).is_err()); // Full!
//! assert_eq!(ring.state(), QueueState::Full);
//!
//! ring.resize(4).unwrap();
//! ring.enqueue(3).unwrap();
//! assert_eq!(ring.to_vec(), vec![1, 2, 3]);
//! ```

use core::borrow::Borrow;
use core::fmt;
use std::collections::TryReserveError;

use crate::{Full, ResizeError};

/// Occupancy of a [`RingBufferQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueState {
    /// No elements stored.
    Empty,
    /// Every slot holds an element; enqueue will be rejected.
    Full,
    /// Some but not all slots are occupied.
    Partial,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Full => "full",
            Self::Partial => "partial",
        };
        f.write_str(name)
    }
}

/// A bounded circular queue.
///
/// Enqueue on a full buffer hands the value back in [`Full`] and leaves the
/// contents untouched. Capacity only changes through [`resize`](Self::resize).
pub struct RingBufferQueue<T> {
    slots: Box<[Option<T>]>,
    front: usize,
    len: usize,
}

impl<T> RingBufferQueue<T> {
    /// Creates an empty ring buffer with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be non-zero");

        Self {
            slots: empty_slots(capacity),
            front: 0,
            len: 0,
        }
    }

    /// Returns the number of stored elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no elements are stored.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of unoccupied slots.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.slots.len() - self.len
    }

    /// Returns the current occupancy.
    pub fn state(&self) -> QueueState {
        if self.len == 0 {
            QueueState::Empty
        } else if self.is_full() {
            QueueState::Full
        } else {
            QueueState::Partial
        }
    }

    /// Slot index of the oldest element.
    #[inline]
    pub const fn front_index(&self) -> usize {
        self.front
    }

    /// Slot index where the next enqueued element will be written.
    #[inline]
    pub fn rear_index(&self) -> usize {
        (self.front + self.len) % self.slots.len()
    }

    /// Raw slot contents in physical order, for inspecting the layout.
    #[inline]
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Writes `value` at the rear.
    ///
    /// Returns `Err(Full(value))` if the buffer is full.
    pub fn enqueue(&mut self, value: T) -> Result<(), Full<T>> {
        if self.is_full() {
            log::debug!("ring buffer full at capacity {}, enqueue rejected", self.slots.len());
            return Err(Full(value));
        }

        let rear = self.rear_index();
        self.slots[rear] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the oldest element.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = self.slots[self.front].take();
        debug_assert!(value.is_some(), "occupied slot was empty");
        self.front = (self.front + 1) % self.slots.len();
        self.len -= 1;
        value
    }

    /// Returns the oldest element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.front].as_ref()
    }

    /// Returns the position from the front of the first match.
    pub fn search<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.iter()
            .position(|v| <T as Borrow<Q>>::borrow(v) == value)
    }

    /// Removes every element and resets the front to slot 0.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.front = 0;
        self.len = 0;
    }

    /// Changes the capacity, keeping every element in FIFO order.
    ///
    /// Elements are re-laid at slots `0..len` and the front resets to 0.
    /// The buffer is left untouched when the request is rejected, including
    /// when the new slots cannot be allocated.
    pub fn resize(&mut self, capacity: usize) -> Result<(), ResizeError> {
        if capacity == 0 {
            return Err(ResizeError::Zero);
        }
        if capacity < self.len {
            log::debug!("resize to {capacity} rejected, {} elements stored", self.len);
            return Err(ResizeError::BelowLength {
                requested: capacity,
                len: self.len,
            });
        }

        let mut slots = try_empty_slots(capacity).map_err(|_| {
            log::debug!("resize to {capacity} rejected, allocation failed");
            ResizeError::Allocation {
                requested: capacity,
            }
        })?;
        let cap = self.slots.len();
        for (i, dst) in slots.iter_mut().take(self.len).enumerate() {
            *dst = self.slots[(self.front + i) % cap].take();
        }

        log::debug!("ring buffer resized from {cap} to {capacity} slots");
        self.slots = slots;
        self.front = 0;
        Ok(())
    }

    /// Returns an iterator over values, oldest first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            offset: 0,
        }
    }

    /// Returns the stored values, oldest first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    core::iter::repeat_with(|| None).take(capacity).collect()
}

fn try_empty_slots<T>(capacity: usize) -> Result<Box<[Option<T>]>, TryReserveError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots.into_boxed_slice())
}

impl<T: fmt::Debug> fmt::Debug for RingBufferQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBufferQueue")
            .field("capacity", &self.capacity())
            .field("front", &self.front)
            .field("len", &self.len)
            .field("items", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a RingBufferQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a ring buffer, oldest first.
pub struct Iter<'a, T> {
    ring: &'a RingBufferQueue<T>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.ring.len {
            return None;
        }
        let idx = (self.ring.front + self.offset) % self.ring.slots.len();
        self.offset += 1;
        self.ring.slots[idx].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ring.len - self.offset;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_panics() {
        let _ = RingBufferQueue::<u64>::with_capacity(0);
    }

    #[test]
    fn third_enqueue_into_two_slots_is_rejected() {
        let mut ring = RingBufferQueue::with_capacity(2);
        assert_eq!(ring.state(), QueueState::Empty);

        ring.enqueue(1u64).unwrap();
        assert_eq!(ring.state(), QueueState::Partial);
        ring.enqueue(2).unwrap();

        assert_eq!(ring.enqueue(3), Err(Full(3)));
        assert_eq!(ring.state(), QueueState::Full);
        assert_eq!(ring.to_vec(), vec![1, 2]);
    }

    #[test]
    fn wraparound_keeps_fifo_order() {
        let mut ring = RingBufferQueue::with_capacity(3);
        ring.enqueue(1u64).unwrap();
        ring.enqueue(2).unwrap();
        ring.enqueue(3).unwrap();
        assert_eq!(ring.dequeue(), Some(1));
        assert_eq!(ring.dequeue(), Some(2));
        ring.enqueue(4).unwrap();
        ring.enqueue(5).unwrap();

        assert_eq!(ring.front_index(), 2);
        assert_eq!(ring.rear_index(), 2);
        assert!(ring.is_full());
        assert_eq!(ring.to_vec(), vec![3, 4, 5]);
        assert_eq!(ring.slots(), &[Some(4), Some(5), Some(3)]);
    }

    #[test]
    fn dequeue_empty_returns_none() {
        let mut ring: RingBufferQueue<String> = RingBufferQueue::with_capacity(1);
        assert_eq!(ring.dequeue(), None);
        assert_eq!(ring.peek(), None);
    }

    #[test]
    fn resize_grows_and_keeps_order() {
        let mut ring = RingBufferQueue::with_capacity(2);
        ring.enqueue(1u64).unwrap();
        ring.enqueue(2).unwrap();

        ring.resize(4).unwrap();
        ring.enqueue(3).unwrap();

        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.free_slots(), 1);
        assert_eq!(ring.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn resize_relays_wrapped_elements_from_slot_zero() {
        let mut ring = RingBufferQueue::with_capacity(3);
        for i in 1..=3u64 {
            ring.enqueue(i).unwrap();
        }
        ring.dequeue();
        ring.enqueue(4).unwrap();
        assert_eq!(ring.front_index(), 1);

        ring.resize(5).unwrap();
        assert_eq!(ring.front_index(), 0);
        assert_eq!(ring.rear_index(), 3);
        assert_eq!(ring.slots(), &[Some(2), Some(3), Some(4), None, None]);
    }

    #[test]
    fn resize_shrink_to_len_is_allowed() {
        let mut ring = RingBufferQueue::with_capacity(4);
        ring.enqueue('a').unwrap();
        ring.enqueue('b').unwrap();

        ring.resize(2).unwrap();
        assert!(ring.is_full());
        assert_eq!(ring.to_vec(), vec!['a', 'b']);
    }

    #[test]
    fn resize_rejections_leave_buffer_intact() {
        let mut ring = RingBufferQueue::with_capacity(3);
        ring.enqueue(1u64).unwrap();
        ring.enqueue(2).unwrap();

        assert_eq!(ring.resize(0), Err(ResizeError::Zero));
        assert_eq!(
            ring.resize(1),
            Err(ResizeError::BelowLength { requested: 1, len: 2 })
        );
        assert_eq!(ring.capacity(), 3);
        assert_eq!(ring.to_vec(), vec![1, 2]);
    }

    #[test]
    fn resize_beyond_address_space_is_rejected() {
        let mut ring = RingBufferQueue::with_capacity(2);
        ring.enqueue(1u64).unwrap();

        assert_eq!(
            ring.resize(usize::MAX),
            Err(ResizeError::Allocation { requested: usize::MAX })
        );
        assert_eq!(ring.capacity(), 2);
        assert_eq!(ring.to_vec(), vec![1]);
    }

    #[test]
    fn search_counts_from_front() {
        let mut ring = RingBufferQueue::with_capacity(2);
        ring.enqueue(String::from("p")).unwrap();
        ring.enqueue(String::from("q")).unwrap();
        ring.dequeue();
        ring.enqueue(String::from("r")).unwrap();

        assert_eq!(ring.search("q"), Some(0));
        assert_eq!(ring.search("r"), Some(1));
        assert_eq!(ring.search("p"), None);
    }

    #[test]
    fn clear_resets_front() {
        let mut ring = RingBufferQueue::with_capacity(2);
        ring.enqueue(1u64).unwrap();
        ring.dequeue();
        ring.clear();

        assert_eq!(ring.front_index(), 0);
        assert_eq!(ring.state(), QueueState::Empty);
        assert_eq!(ring.state().to_string(), "empty");
    }
}
