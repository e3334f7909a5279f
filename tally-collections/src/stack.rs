//! LIFO stacks: one over linked nodes, one over a vector.
//!
//! Both report an empty stack through `None` from [`pop`](ArrayStack::pop)
//! and [`peek`](ArrayStack::peek), and list their contents top-first.

use core::borrow::Borrow;
use core::fmt;
use core::marker::PhantomData;

use crate::singly::Iter;
use crate::{Key, Node, Storage};

// =============================================================================
// LinkedStack
// =============================================================================

/// A stack of linked nodes; the top is the head of the chain.
///
/// # Example
///
/// ```
/// use tally_collections::LinkedStack;
///
/// let mut stack: LinkedStack<u32> = LinkedStack::new();
/// stack.push(1);
/// stack.push(2);
///
/// assert_eq!(stack.peek(), Some(&2));
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.pop(), Some(1));
/// assert_eq!(stack.pop(), None);
/// ```
pub struct LinkedStack<T, K: Key = usize, S = slab::Slab<Node<T, K>>>
where
    S: Storage<Node<T, K>, Key = K>,
{
    storage: S,
    top: K,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> LinkedStack<T> {
    /// Creates an empty stack backed by a growable slab.
    #[inline]
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }

    /// Creates an empty stack with room for `capacity` nodes.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(slab::Slab::with_capacity(capacity))
    }
}

impl<T> Default for LinkedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key, S> LinkedStack<T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty stack over the given storage, dropping anything
    /// already stored in it.
    pub fn with_storage(mut storage: S) -> Self {
        storage.clear();
        Self {
            storage,
            top: K::NONE,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements on the stack.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the stack is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pushes a value on top. O(1).
    pub fn push(&mut self, value: T) {
        let key = self.storage.insert(Node::new(value));
        // Safety: just inserted
        unsafe { self.storage.get_unchecked_mut(key) }.next = self.top;
        self.top = key;
        self.len += 1;
    }

    /// Removes and returns the most recently pushed value.
    pub fn pop(&mut self) -> Option<T> {
        if self.top.is_none() {
            return None;
        }

        let key = self.top;
        // Safety: top is valid when is_some()
        self.top = unsafe { self.storage.get_unchecked(key) }.next;
        self.len -= 1;
        self.storage.remove(key).map(|node| node.value)
    }

    /// Returns the top value without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.storage.get(self.top).map(|node| &node.value)
    }

    /// Returns the depth of the first match counted from the top (top is 0).
    pub fn search<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.iter()
            .position(|v| <T as Borrow<Q>>::borrow(v) == value)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.top = K::NONE;
        self.len = 0;
    }

    /// Returns an iterator over values, top first.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        Iter {
            storage: &self.storage,
            current: self.top,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Returns the stored values, top first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug, K: Key, S> fmt::Debug for LinkedStack<T, K, S>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// ArrayStack
// =============================================================================

/// A stack over a `Vec`; the top is the last element.
///
/// `push` is amortized O(1), `pop` and `peek` are O(1).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArrayStack<T> {
    items: Vec<T>,
}

impl<T> ArrayStack<T> {
    /// Creates an empty stack.
    #[inline]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty stack with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a value on top.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Removes and returns the most recently pushed value.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns the top value without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns the depth of the first match counted from the top (top is 0).
    pub fn search<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.iter()
            .position(|v| <T as Borrow<Q>>::borrow(v) == value)
    }

    /// Removes every element.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns an iterator over values, top first (reverse push order).
    #[inline]
    pub fn iter(&self) -> core::iter::Rev<core::slice::Iter<'_, T>> {
        self.items.iter().rev()
    }

    /// Returns the stored values, top first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linked_push_pop_is_lifo() {
        let mut stack = LinkedStack::new();
        for i in 1..=4u64 {
            stack.push(i);
        }

        assert_eq!(stack.len(), 4);
        assert_eq!(stack.pop(), Some(4));
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn linked_peek_does_not_remove() {
        let mut stack = LinkedStack::new();
        assert_eq!(stack.peek(), None);

        stack.push("a");
        stack.push("b");

        assert_eq!(stack.peek(), Some(&"b"));
        assert_eq!(stack.peek(), Some(&"b"));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn linked_to_vec_is_top_first() {
        let mut stack = LinkedStack::new();
        stack.push(1u64);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.to_vec(), vec![3, 2, 1]);
        assert_eq!(stack.search(&3), Some(0));
        assert_eq!(stack.search(&1), Some(2));
        assert_eq!(stack.search(&9), None);
    }

    #[test]
    fn linked_clear_then_reuse() {
        let mut stack = LinkedStack::with_capacity(2);
        stack.push(1u64);
        stack.push(2);
        stack.clear();

        assert!(stack.peek().is_none());
        stack.push(5);
        assert_eq!(stack.to_vec(), vec![5]);
    }

    #[test]
    fn array_push_pop_is_lifo() {
        let mut stack = ArrayStack::new();
        for i in 1..=4u64 {
            stack.push(i);
        }

        assert_eq!(stack.pop(), Some(4));
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn array_to_vec_is_reverse_insertion() {
        let mut stack = ArrayStack::with_capacity(3);
        stack.push('x');
        stack.push('y');
        stack.push('z');

        assert_eq!(stack.to_vec(), vec!['z', 'y', 'x']);
        assert_eq!(stack.peek(), Some(&'z'));
        assert_eq!(stack.search(&'x'), Some(2));
    }

    #[test]
    fn array_empty_signals() {
        let mut stack: ArrayStack<String> = ArrayStack::new();
        assert!(stack.peek().is_none());
        assert!(stack.pop().is_none());
        assert_eq!(format!("{stack:?}"), "[]");
    }
}
