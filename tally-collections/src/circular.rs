//! Circular singly linked list over arena storage.
//!
//! The tail links back to the head whenever the ring is non-empty, so there
//! is no null terminator to stop on. Every walk over the ring ends when it
//! comes back around to `head`.

use core::borrow::Borrow;
use core::fmt;
use core::marker::PhantomData;

use crate::{Key, Node, Storage};

/// A circular singly linked list.
///
/// # Example
///
/// ```
/// use tally_collections::CircularLinkedList;
///
/// let mut ring: CircularLinkedList<u32> = [1, 2, 3].into_iter().collect();
///
/// ring.rotate();
/// assert_eq!(ring.to_vec(), vec![2, 3, 1]);
///
/// assert_eq!(ring.remove(&3), Some(3));
/// assert_eq!(ring.to_vec(), vec![2, 1]);
/// ```
pub struct CircularLinkedList<T, K: Key = usize, S = slab::Slab<Node<T, K>>>
where
    S: Storage<Node<T, K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> CircularLinkedList<T> {
    /// Creates an empty ring backed by a growable slab.
    #[inline]
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }

    /// Creates an empty ring with room for `capacity` nodes.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(slab::Slab::with_capacity(capacity))
    }
}

impl<T> Default for CircularLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key, S> CircularLinkedList<T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty ring over the given storage, dropping anything
    /// already stored in it.
    pub fn with_storage(mut storage: S) -> Self {
        storage.clear();
        Self {
            storage,
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements in the ring.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the ring is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a value after the tail and closes the ring back to the head.
    pub fn insert(&mut self, value: T) -> K {
        let key = self.storage.insert(Node::new(value));

        if self.head.is_none() {
            // A single node links to itself
            // Safety: just inserted
            unsafe { self.storage.get_unchecked_mut(key) }.next = key;
            self.head = key;
        } else {
            // Safety: just inserted; tail is valid when the ring is non-empty
            unsafe { self.storage.get_unchecked_mut(key) }.next = self.head;
            unsafe { self.storage.get_unchecked_mut(self.tail) }.next = key;
        }

        self.tail = key;
        self.len += 1;
        key
    }

    /// Removes the first node from the head whose value equals `value`.
    ///
    /// The scan stops after one revolution. Removing the last remaining
    /// node leaves the ring empty with both ends cleared.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        if self.head.is_none() {
            return None;
        }

        if self.head == self.tail {
            // Safety: head is valid when the ring is non-empty
            let node = unsafe { self.storage.get_unchecked(self.head) };
            if <T as Borrow<Q>>::borrow(&node.value) != value {
                return None;
            }
            let key = self.head;
            self.head = K::NONE;
            self.tail = K::NONE;
            self.len = 0;
            return self.storage.remove(key).map(|node| node.value);
        }

        let mut prev = self.tail;
        let mut curr = self.head;
        loop {
            // Safety: curr came from ring traversal
            let node = unsafe { self.storage.get_unchecked(curr) };
            if <T as Borrow<Q>>::borrow(&node.value) == value {
                break;
            }
            prev = curr;
            curr = node.next;
            if curr == self.head {
                return None;
            }
        }

        // Safety: curr and prev are linked ring nodes
        let next = unsafe { self.storage.get_unchecked(curr) }.next;
        unsafe { self.storage.get_unchecked_mut(prev) }.next = next;

        if curr == self.head {
            self.head = next;
        }
        if curr == self.tail {
            self.tail = prev;
        }

        self.len -= 1;
        self.storage.remove(curr).map(|node| node.value)
    }

    /// Removes and returns the head value.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head.is_none() {
            return None;
        }

        let key = self.head;
        if self.head == self.tail {
            self.head = K::NONE;
            self.tail = K::NONE;
        } else {
            // Safety: head and tail are valid in a non-empty ring
            let next = unsafe { self.storage.get_unchecked(key) }.next;
            unsafe { self.storage.get_unchecked_mut(self.tail) }.next = next;
            self.head = next;
        }

        self.len -= 1;
        self.storage.remove(key).map(|node| node.value)
    }

    /// Advances the ring by one: the head becomes the new tail. O(1).
    pub fn rotate(&mut self) {
        if self.len < 2 {
            return;
        }
        self.tail = self.head;
        // Safety: head is valid in a non-empty ring
        self.head = unsafe { self.storage.get_unchecked(self.head) }.next;
    }

    /// Returns the zero-based position from the head of the first match,
    /// or `None` if absent.
    pub fn search<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.iter()
            .position(|v| <T as Borrow<Q>>::borrow(v) == value)
    }

    /// Returns a reference to the head value.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.storage.get(self.head).map(|node| &node.value)
    }

    /// Returns a reference to the tail value.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.storage.get(self.tail).map(|node| &node.value)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;
    }

    /// Returns an iterator over one revolution of the ring, from the head.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        Iter {
            storage: &self.storage,
            head: self.head,
            current: self.head,
            _marker: PhantomData,
        }
    }

    /// Returns the stored values, head first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    #[cfg(test)]
    fn assert_ring(&self) {
        if self.len == 0 {
            assert!(self.head.is_none() && self.tail.is_none());
            return;
        }
        let mut curr = self.head;
        for _ in 1..self.len {
            curr = self.storage.get(curr).expect("dangling link").next;
        }
        assert_eq!(curr, self.tail, "tail is not len-1 steps from head");
        assert_eq!(self.storage.get(curr).unwrap().next, self.head, "ring not closed");
    }
}

impl<T: fmt::Debug, K: Key, S> fmt::Debug for CircularLinkedList<T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for CircularLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for CircularLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = Self::new();
        ring.extend(iter);
        ring
    }
}

/// Iterator over one revolution of a circular list.
///
/// Stops when the next link leads back to the head it started from.
pub struct Iter<'a, T, K: Key, S> {
    storage: &'a S,
    head: K,
    current: K,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, K: Key, S> Iterator for Iter<'a, T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        // Safety: current came from ring traversal
        let node = unsafe { self.storage.get_unchecked(self.current) };
        self.current = if node.next == self.head {
            K::NONE
        } else {
            node.next
        };

        Some(&node.value)
    }
}
