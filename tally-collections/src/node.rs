//! Node types stored in the arenas of the linked containers.
//!
//! Nodes are plain data: a value plus links expressed as keys into the
//! same storage. The owning container is the only thing that rewires them.

use crate::Key;

/// A singly linked node: value and forward link.
///
/// Used by [`SinglyLinkedList`](crate::SinglyLinkedList),
/// [`CircularLinkedList`](crate::CircularLinkedList) and
/// [`LinkedStack`](crate::LinkedStack).
#[derive(Debug, Clone)]
pub struct Node<T, K: Key = usize> {
    pub(crate) value: T,
    pub(crate) next: K,
}

impl<T, K: Key> Node<T, K> {
    /// Creates a new unlinked node.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            next: K::NONE,
        }
    }

    /// Returns the stored value.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the key of the next node, or `K::NONE`.
    #[inline]
    pub fn next(&self) -> K {
        self.next
    }
}

/// A doubly linked node: value, forward link and back-link.
///
/// The back-link is only used for backward traversal and O(1) unlinking;
/// for adjacent nodes `A -> B`, `B.prev == A` unless `B` is the head.
#[derive(Debug, Clone)]
pub struct DoubleNode<T, K: Key = usize> {
    pub(crate) value: T,
    pub(crate) next: K,
    pub(crate) prev: K,
}

impl<T, K: Key> DoubleNode<T, K> {
    /// Creates a new unlinked node.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            next: K::NONE,
            prev: K::NONE,
        }
    }

    /// Returns the stored value.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the key of the next node, or `K::NONE`.
    #[inline]
    pub fn next(&self) -> K {
        self.next
    }

    /// Returns the key of the previous node, or `K::NONE`.
    #[inline]
    pub fn prev(&self) -> K {
        self.prev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_nodes_are_unlinked() {
        let node: Node<&str> = Node::new("a");
        assert_eq!(node.value(), &"a");
        assert!(node.next().is_none());

        let node: DoubleNode<&str> = DoubleNode::new("b");
        assert_eq!(node.value(), &"b");
        assert!(node.next().is_none());
        assert!(node.prev().is_none());
    }
}
