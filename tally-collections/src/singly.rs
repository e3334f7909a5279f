//! Singly linked list over arena storage.
//!
//! Nodes live in a slab owned by the list and point forward by key. The
//! list tracks head, tail and length, so appends are O(1); removal and
//! search scan from the head.
//!
//! # Example
//!
//! ```
//! use tally_collections::SinglyLinkedList;
//!
//! let mut list: SinglyLinkedList<u64> = SinglyLinkedList::new();
//! list.insert(1);
//! list.insert(2);
//! list.insert(3);
//!
//! assert_eq!(list.search(&2), Some(1));
//! assert_eq!(list.remove(&2), Some(2));
//! assert_eq!(list.search(&2), None);
//! assert_eq!(list.to_vec(), vec![1, 3]);
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::marker::PhantomData;

use crate::{Key, Node, Storage};

/// A singly linked list with a tracked tail.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `K`: Key type linking nodes (default `usize`)
/// - `S`: Node storage (default `slab::Slab<Node<T, K>>`)
pub struct SinglyLinkedList<T, K: Key = usize, S = slab::Slab<Node<T, K>>>
where
    S: Storage<Node<T, K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> SinglyLinkedList<T> {
    /// Creates an empty list backed by a growable slab.
    #[inline]
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }

    /// Creates an empty list with room for `capacity` nodes before the
    /// slab reallocates.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(slab::Slab::with_capacity(capacity))
    }
}

impl<T> Default for SinglyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key, S> SinglyLinkedList<T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty list over the given storage.
    ///
    /// Any nodes already in `storage` are dropped.
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

    /// Returns the number of elements in the list.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a value at the tail. O(1).
    ///
    /// Returns the key of the new node.
    pub fn insert(&mut self, value: T) -> K {
        let key = self.storage.insert(Node::new(value));

        if self.tail.is_some() {
            // Safety: tail is valid when is_some()
            unsafe { self.storage.get_unchecked_mut(self.tail) }.next = key;
        } else {
            self.head = key;
        }

        self.tail = key;
        self.len += 1;
        key
    }

    /// Removes and returns the head value.
    ///
    /// Returns `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head.is_none() {
            return None;
        }

        let key = self.head;
        // Safety: head is valid when is_some()
        self.head = unsafe { self.storage.get_unchecked(key) }.next;
        if self.head.is_none() {
            self.tail = K::NONE;
        }

        self.len -= 1;
        self.storage.remove(key).map(|node| node.value)
    }

    /// Removes the first node (scanning from the head) whose value equals
    /// `value`, and returns the stored value. O(n).
    ///
    /// Returns `None` if no node matches.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let mut prev = K::NONE;
        let mut curr = self.head;

        while curr.is_some() {
            // Safety: curr came from list traversal
            let node = unsafe { self.storage.get_unchecked(curr) };
            if <T as Borrow<Q>>::borrow(&node.value) == value {
                break;
            }
            prev = curr;
            curr = node.next;
        }

        if curr.is_none() {
            return None;
        }

        // Safety: curr is a linked node
        let next = unsafe { self.storage.get_unchecked(curr) }.next;

        if prev.is_some() {
            // Safety: prev is the linked predecessor of curr
            unsafe { self.storage.get_unchecked_mut(prev) }.next = next;
        } else {
            self.head = next;
        }

        if self.tail == curr {
            self.tail = prev;
        }

        self.len -= 1;
        self.storage.remove(curr).map(|node| node.value)
    }

    /// Returns the zero-based position of the first node whose value equals
    /// `value`, or `None` if absent. O(n).
    pub fn search<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.iter()
            .position(|v| <T as Borrow<Q>>::borrow(v) == value)
    }

    /// Returns `true` if any node holds `value`.
    #[inline]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.search(value).is_some()
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

    /// Returns an iterator over references to values, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        Iter {
            storage: &self.storage,
            current: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Returns the stored values, head to tail. O(n), non-destructive.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug, K: Key, S> fmt::Debug for SinglyLinkedList<T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for SinglyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for SinglyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T, K: Key, S> IntoIterator for &'a SinglyLinkedList<T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, K, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over references to list values, head to tail.
///
/// Shared by the singly linked list and the linked stack. It follows
/// `next` links for exactly `remaining` nodes.
pub struct Iter<'a, T, K: Key, S> {
    pub(crate) storage: &'a S,
    pub(crate) current: K,
    pub(crate) remaining: usize,
    pub(crate) _marker: PhantomData<T>,
}

impl<'a, T: 'a, K: Key, S> Iterator for Iter<'a, T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.current.is_none() {
            return None;
        }

        // Safety: the owning container guarantees `remaining` linked nodes
        let node = unsafe { self.storage.get_unchecked(self.current) };
        self.current = node.next;
        self.remaining -= 1;

        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, K: Key, S> ExactSizeIterator for Iter<'a, T, K, S> where
    S: Storage<Node<T, K>, Key = K>
{
}
