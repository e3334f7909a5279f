//! Classroom containers over index-addressed storage.
//!
//! The linked containers never hold pointers to each other's nodes. Nodes
//! live in a [`Storage`] arena (a `slab::Slab` by default) and link to one
//! another by [`Key`], with `Key::NONE` standing in for a null link:
//!
//! ```text
//! Storage (Slab)           - owns nodes, hands out stable keys
//! Singly/Doubly/Circular   - coordinate keys: head, tail, next, prev
//! ```
//!
//! The array-backed containers wrap a `Vec`, a `VecDeque` or a fixed boxed
//! slice directly.
//!
//! # Quick Start
//!
//! ```
//! use tally_collections::{DoublyLinkedList, RingBufferQueue};
//!
//! let mut list: DoublyLinkedList<&str> = ["a", "b", "c"].into_iter().collect();
//! assert_eq!(list.remove(&"b"), Some("b"));
//! assert_eq!(list.search(&"c"), Some(1));
//!
//! let mut ring = RingBufferQueue::with_capacity(2);
//! ring.enqueue(1).unwrap();
//! ring.enqueue(2).unwrap();
//! assert!(ring.enqueue(3).is_err());
//! ```
//!
//! # Signals
//!
//! Absence is always an `Option`: `search` returns the zero-based position
//! or `None`, and `pop`/`dequeue`/`peek` return `None` on an empty
//! container. The only operations that fail are the bounded ones on
//! [`RingBufferQueue`], which return [`Full`] or [`ResizeError`].
//!
//! # Data Structures
//!
//! | Structure | Backing | Key Operations |
//! |-----------|---------|----------------|
//! | [`SinglyLinkedList`] | slab of [`Node`] | O(1) append, O(n) remove/search |
//! | [`DoublyLinkedList`] | slab of [`DoubleNode`] | O(1) append/pop at both ends |
//! | [`CircularLinkedList`] | slab of [`Node`] | O(1) append/rotate |
//! | [`LinkedStack`] | slab of [`Node`] | O(1) push/pop |
//! | [`ArrayStack`] | `Vec` | amortized O(1) push, O(1) pop |
//! | [`ArrayQueue`] | `VecDeque` | O(1) enqueue/dequeue |
//! | [`RingBufferQueue`] | boxed slots | O(1) enqueue/dequeue, O(n) resize |
//! | [`PriorityQueue`] | `Vec` heap | O(log n) enqueue/dequeue |

#![warn(missing_docs)]

pub mod circular;
pub mod doubly;
pub mod error;
pub mod key;
pub mod node;
pub mod priority;
pub mod queue;
pub mod ring;
pub mod singly;
pub mod stack;
pub mod storage;

pub use circular::CircularLinkedList;
pub use doubly::DoublyLinkedList;
pub use error::{Full, ResizeError};
pub use key::Key;
pub use node::{DoubleNode, Node};
pub use priority::{Entry, PriorityQueue};
pub use queue::ArrayQueue;
pub use ring::{QueueState, RingBufferQueue};
pub use singly::SinglyLinkedList;
pub use stack::{ArrayStack, LinkedStack};
pub use storage::Storage;
