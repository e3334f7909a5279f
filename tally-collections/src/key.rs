//! Sentinel-based key trait for arena links.
//!
//! Nodes link to each other by key into the owning container's storage.
//! A reserved sentinel (`MAX`) stands in for "no link" so that a node's
//! `next`/`prev` fields stay plain integers instead of `Option<K>`.

/// A copyable key type with a sentinel "none" value.
///
/// # Example
///
/// ```
/// use tally_collections::Key;
///
/// let key: usize = 5;
/// assert!(key.is_some());
/// assert!(usize::NONE.is_none());
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug + 'static {
    /// Sentinel value representing "no key" / null link.
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl Key for usize {
    const NONE: Self = usize::MAX;
}
