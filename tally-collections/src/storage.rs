//! Storage trait for slab-like arenas with stable keys.
//!
//! Linked containers keep their nodes in an arena and link them by key.
//! A key stays valid until its node is removed, and freed slots are reused
//! by later inserts. Back-links are just keys, so a doubly linked or
//! circular structure never forms an ownership cycle.

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - `slab::Slab<T>` - growable, heap allocated
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Inserts a value, returning its stable key.
    fn insert(&mut self, value: T) -> Self::Key;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored value.
    fn clear(&mut self);

    /// Returns a reference without bounds checking.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without bounds checking.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn insert(&mut self, value: T) -> Self::Key {
        slab::Slab::insert(self, value)
    }

    #[inline]
    fn remove(&mut self, key: Self::Key) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: Self::Key) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        slab::Slab::clear(self);
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T {
        debug_assert!(self.contains(key), "vacant key {key}");
        unsafe { slab::Slab::get_unchecked(self, key) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T {
        debug_assert!(self.contains(key), "vacant key {key}");
        unsafe { slab::Slab::get_unchecked_mut(self, key) }
    }
}
