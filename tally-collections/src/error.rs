//! Error types returned by the bounded containers.

use core::fmt;

/// Error returned when enqueueing into a full ring buffer.
///
/// Contains the value that could not be stored, so the caller can retry or
/// drop it deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ring buffer is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

/// Error returned when a ring buffer cannot be resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    /// The requested capacity was zero.
    Zero,
    /// The requested capacity cannot hold the elements currently stored.
    BelowLength {
        /// Capacity that was asked for.
        requested: usize,
        /// Number of elements in the buffer at the time.
        len: usize,
    },
    /// The new slots could not be allocated.
    Allocation {
        /// Capacity that was asked for.
        requested: usize,
    },
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "capacity must be at least 1"),
            Self::BelowLength { requested, len } => write!(
                f,
                "capacity {requested} cannot hold the {len} stored elements"
            ),
            Self::Allocation { requested } => {
                write!(f, "cannot allocate {requested} slots")
            }
        }
    }
}

impl std::error::Error for ResizeError {}
