//! Doubly linked list over arena storage.
//!
//! Each node carries a back-link, so once a node is located it is unlinked
//! in O(1), and the list can be walked from either end. Locating a value is
//! still a linear scan.
//!
//! # Link Invariant
//!
//! For adjacent nodes `A -> B`, `B.prev == A`. The head has no `prev`, the
//! tail has no `next`. Every insert and removal maintains this, including
//! moving `head`/`tail` when the first or last node goes away.
//!
//! # Example
//!
//! ```
//! use tally_collections::DoublyLinkedList;
//!
//! let mut list: DoublyLinkedList<&str> = ["a", "b", "c"].into_iter().collect();
//!
//! assert_eq!(list.remove(&"b"), Some("b"));
//! assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec!["c", "a"]);
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::marker::PhantomData;

use crate::{DoubleNode, Key, Storage};

/// A doubly linked list with head and tail links.
pub struct DoublyLinkedList<T, K: Key = usize, S = slab::Slab<DoubleNode<T, K>>>
where
    S: Storage<DoubleNode<T, K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> DoublyLinkedList<T> {
    /// Creates an empty list backed by a growable slab.
    #[inline]
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }

    /// Creates an empty list with room for `capacity` nodes.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(slab::Slab::with_capacity(capacity))
    }
}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key, S> DoublyLinkedList<T, K, S>
where
    S: Storage<DoubleNode<T, K>, Key = K>,
{
    /// Creates an empty list over the given storage, dropping anything
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

    // ========================================================================
    // Insert
    // ========================================================================

    /// Appends a value at the tail. O(1).
    pub fn insert(&mut self, value: T) -> K {
        let key = self.storage.insert(DoubleNode::new(value));
        // Safety: just inserted
        unsafe { self.storage.get_unchecked_mut(key) }.prev = self.tail;

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

    /// Prepends a value at the head. O(1).
    pub fn push_front(&mut self, value: T) -> K {
        let key = self.storage.insert(DoubleNode::new(value));
        // Safety: just inserted
        unsafe { self.storage.get_unchecked_mut(key) }.next = self.head;

        if self.head.is_some() {
            // Safety: head is valid when is_some()
            unsafe { self.storage.get_unchecked_mut(self.head) }.prev = key;
        } else {
            self.tail = key;
        }

        self.head = key;
        self.len += 1;
        key
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Removes and returns the head value.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head.is_none() {
            return None;
        }
        let key = self.head;
        Some(self.unlink(key))
    }

    /// Removes and returns the tail value.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.tail.is_none() {
            return None;
        }
        let key = self.tail;
        Some(self.unlink(key))
    }

    /// Removes the first node, scanning from the head, whose value equals
    /// `value`. O(n) to locate, O(1) to unlink.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let key = self.find_from_head(value)?;
        Some(self.unlink(key))
    }

    /// Removes the last node, scanning from the tail, whose value equals
    /// `value`.
    pub fn remove_last<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let mut curr = self.tail;
        while curr.is_some() {
            // Safety: curr came from list traversal
            let node = unsafe { self.storage.get_unchecked(curr) };
            if <T as Borrow<Q>>::borrow(&node.value) == value {
                return Some(self.unlink(curr));
            }
            curr = node.prev;
        }
        None
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Returns the zero-based position of the first match from the head,
    /// or `None` if absent.
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
        self.find_from_head(value).is_some()
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

    /// Returns a double-ended iterator over values, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        Iter {
            storage: &self.storage,
            front: self.head,
            back: self.tail,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Returns the stored values, head to tail.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn find_from_head<Q>(&self, value: &Q) -> Option<K>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let mut curr = self.head;
        while curr.is_some() {
            // Safety: curr came from list traversal
            let node = unsafe { self.storage.get_unchecked(curr) };
            if <T as Borrow<Q>>::borrow(&node.value) == value {
                return Some(curr);
            }
            curr = node.next;
        }
        None
    }

    /// Unlinks a node known to be in this list and frees its slot.
    fn unlink(&mut self, key: K) -> T {
        // Safety: callers only pass keys reached through the list
        let node = unsafe { self.storage.get_unchecked(key) };
        let prev = node.prev;
        let next = node.next;

        if prev.is_some() {
            // Safety: prev is valid when is_some() (link invariant)
            unsafe { self.storage.get_unchecked_mut(prev) }.next = next;
        } else {
            self.head = next;
        }

        if next.is_some() {
            // Safety: next is valid when is_some() (link invariant)
            unsafe { self.storage.get_unchecked_mut(next) }.prev = prev;
        } else {
            self.tail = prev;
        }

        self.len -= 1;
        match self.storage.remove(key) {
            Some(node) => node.value,
            None => unreachable!("linked key {key:?} was vacant"),
        }
    }

    #[cfg(test)]
    fn assert_links(&self) {
        let mut prev = K::NONE;
        let mut curr = self.head;
        let mut count = 0;
        while curr.is_some() {
            let node = self.storage.get(curr).expect("dangling link");
            assert_eq!(node.prev, prev, "back-link broken at {curr:?}");
            prev = curr;
            curr = node.next;
            count += 1;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(count, self.len);
    }
}

impl<T: fmt::Debug, K: Key, S> fmt::Debug for DoublyLinkedList<T, K, S>
where
    S: Storage<DoubleNode<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for DoublyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for DoublyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T, K: Key, S> IntoIterator for &'a DoublyLinkedList<T, K, S>
where
    S: Storage<DoubleNode<T, K>, Key = K>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, K, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterator
// =============================================================================

/// Double-ended iterator over references to list values.
pub struct Iter<'a, T, K: Key, S> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, K: Key, S> Iterator for Iter<'a, T, K, S>
where
    S: Storage<DoubleNode<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // Safety: list invariants guarantee front is valid while remaining > 0
        let node = unsafe { self.storage.get_unchecked(self.front) };
        self.front = node.next;
        self.remaining -= 1;

        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, K: Key, S> DoubleEndedIterator for Iter<'a, T, K, S>
where
    S: Storage<DoubleNode<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // Safety: list invariants guarantee back is valid while remaining > 0
        let node = unsafe { self.storage.get_unchecked(self.back) };
        self.back = node.prev;
        self.remaining -= 1;

        Some(&node.value)
    }
}

impl<'a, T: 'a, K: Key, S> ExactSizeIterator for Iter<'a, T, K, S> where
    S: Storage<DoubleNode<T, K>, Key = K>
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_is_empty() {
        let list: DoublyLinkedList<u64> = DoublyLinkedList::new();
        assert!(list.is_empty());
        assert!(list.front().is_none());
        assert!(list.back().is_none());
        list.assert_links();
    }

    #[test]
    fn insert_links_both_ways() {
        let list: DoublyLinkedList<u64> = [1, 2, 3].into_iter().collect();

        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        list.assert_links();
    }

    #[test]
    fn push_front_then_insert() {
        let mut list = DoublyLinkedList::new();

        list.insert(2);
        list.push_front(1);
        list.insert(3);

        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        list.assert_links();
    }

    #[test]
    fn remove_head_moves_head() {
        let mut list: DoublyLinkedList<u64> = [1, 2, 3].into_iter().collect();

        assert_eq!(list.remove(&1), Some(1));
        assert_eq!(list.front(), Some(&2));
        list.assert_links();
    }

    #[test]
    fn remove_tail_moves_tail() {
        let mut list: DoublyLinkedList<u64> = [1, 2, 3].into_iter().collect();

        assert_eq!(list.remove(&3), Some(3));
        assert_eq!(list.back(), Some(&2));
        list.assert_links();

        list.insert(4);
        assert_eq!(list.to_vec(), vec![1, 2, 4]);
        list.assert_links();
    }

    #[test]
    fn remove_middle_relinks_neighbours() {
        let mut list: DoublyLinkedList<u64> = [1, 2, 3].into_iter().collect();

        assert_eq!(list.remove(&2), Some(2));
        assert_eq!(list.to_vec(), vec![1, 3]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![3, 1]);
        list.assert_links();
    }

    #[test]
    fn remove_only_element_clears_ends() {
        let mut list = DoublyLinkedList::new();
        list.insert("solo");

        assert_eq!(list.remove(&"solo"), Some("solo"));
        assert!(list.is_empty());
        assert!(list.front().is_none());
        assert!(list.back().is_none());
        list.assert_links();
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut list: DoublyLinkedList<u64> = [1, 2].into_iter().collect();
        assert_eq!(list.remove(&7), None);
        assert_eq!(list.len(), 2);
        list.assert_links();
    }

    #[test]
    fn remove_last_scans_from_tail() {
        let mut list: DoublyLinkedList<u64> = [4, 1, 4, 2].into_iter().collect();

        assert_eq!(list.remove_last(&4), Some(4));
        assert_eq!(list.to_vec(), vec![4, 1, 2]);
        list.assert_links();
    }

    #[test]
    fn pop_both_ends() {
        let mut list: DoublyLinkedList<u64> = [1, 2, 3].into_iter().collect();

        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_back(), None);
        list.assert_links();
    }

    #[test]
    fn search_positions() {
        let list: DoublyLinkedList<String> =
            ["a", "b", "c"].into_iter().map(String::from).collect();

        assert_eq!(list.search("c"), Some(2));
        assert_eq!(list.search("q"), None);
        assert!(list.contains("a"));
    }

    #[test]
    fn iter_double_ended_meets_in_middle() {
        let list: DoublyLinkedList<u64> = (1..=5).collect();
        let mut iter = list.iter();

        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn churn_keeps_links_consistent() {
        let mut list = DoublyLinkedList::new();

        for round in 0..50u64 {
            list.insert(round);
            list.insert(round + 1000);
            if round % 3 == 0 {
                list.remove(&round);
            }
            if round % 5 == 0 {
                list.pop_front();
            }
            list.assert_links();
        }
    }
}
