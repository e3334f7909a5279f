//! Memory samplers used to compute per-call memory deltas.
//!
//! A [`MemorySource`] reports a single byte figure at a point in time. The
//! probe samples it before and after an operation and reports the signed
//! difference. Sources that cannot produce a figure return `None`, and the
//! delta is then reported as unknown rather than zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A point-in-time memory figure, in bytes.
pub trait MemorySource {
    /// Returns the current figure, or `None` if it cannot be read.
    fn sample(&self) -> Option<u64>;
}

impl<M: MemorySource + ?Sized> MemorySource for &M {
    #[inline]
    fn sample(&self) -> Option<u64> {
        (**self).sample()
    }
}

/// A source that never has a figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemory;

impl MemorySource for NoMemory {
    #[inline]
    fn sample(&self) -> Option<u64> {
        None
    }
}

// =============================================================================
// Resident set size
// =============================================================================

/// Resident set size of the current process.
///
/// On Linux this is the resident page count from `/proc/self/statm` times
/// the page size. On other unix systems it falls back to the peak resident
/// size from `getrusage`, which never shrinks. Elsewhere it is unavailable.
///
/// Resident memory moves in whole pages, so small operations usually
/// report a delta of zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidentSet;

impl MemorySource for ResidentSet {
    #[inline]
    fn sample(&self) -> Option<u64> {
        resident_bytes()
    }
}

#[cfg(target_os = "linux")]
fn resident_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    // Fields: size resident shared text lib data dt (all in pages)
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(pages * page_size()?)
}

#[cfg(target_os = "linux")]
fn page_size() -> Option<u64> {
    static PAGE_SIZE: std::sync::OnceLock<Option<u64>> = std::sync::OnceLock::new();
    *PAGE_SIZE.get_or_init(|| {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        (size > 0).then_some(size as u64)
    })
}

#[cfg(all(unix, not(target_os = "linux")))]
fn resident_bytes() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // Safety: getrusage fills the struct on success
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // Safety: rc == 0
    let usage = unsafe { usage.assume_init() };
    // ru_maxrss is reported in bytes on macOS and kilobytes elsewhere
    let scale = if cfg!(target_os = "macos") { 1 } else { 1024 };
    u64::try_from(usage.ru_maxrss).ok().map(|v| v * scale)
}

#[cfg(not(unix))]
fn resident_bytes() -> Option<u64> {
    None
}

// =============================================================================
// Counting allocator
// =============================================================================

/// A global allocator that forwards to [`System`] and counts live bytes.
///
/// Install it in a binary to get byte-exact heap deltas:
///
/// ```no_run
/// use tally_probe::{CountingAllocator, measure_with};
///
/// #[global_allocator]
/// static ALLOC: CountingAllocator = CountingAllocator::new();
///
/// let measured = measure_with(&ALLOC, || vec![0u8; 1024]);
/// assert!(measured.memory_delta.unwrap() >= 1024);
/// ```
#[derive(Debug, Default)]
pub struct CountingAllocator {
    live: AtomicUsize,
}

impl CountingAllocator {
    /// Creates an allocator with a zero count.
    pub const fn new() -> Self {
        Self {
            live: AtomicUsize::new(0),
        }
    }

    /// Returns the number of bytes currently allocated through this
    /// allocator.
    #[inline]
    pub fn live_bytes(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            self.live.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            self.live.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        self.live.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            if new_size >= layout.size() {
                self.live
                    .fetch_add(new_size - layout.size(), Ordering::Relaxed);
            } else {
                self.live
                    .fetch_sub(layout.size() - new_size, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}

impl MemorySource for CountingAllocator {
    #[inline]
    fn sample(&self) -> Option<u64> {
        Some(self.live_bytes() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_memory_is_unknown() {
        assert_eq!(NoMemory.sample(), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn resident_set_is_readable_on_linux() {
        let bytes = ResidentSet.sample().expect("statm readable");
        assert!(bytes > 0);
        assert_eq!(bytes % page_size().unwrap(), 0);
    }

    #[test]
    fn counting_allocator_tracks_alloc_and_free() {
        let counter = CountingAllocator::new();
        let layout = Layout::from_size_align(256, 8).unwrap();

        let ptr = unsafe { counter.alloc(layout) };
        assert!(!ptr.is_null());
        assert_eq!(counter.sample(), Some(256));

        let ptr = unsafe { counter.realloc(ptr, layout, 64) };
        assert!(!ptr.is_null());
        assert_eq!(counter.live_bytes(), 64);

        let shrunk = Layout::from_size_align(64, 8).unwrap();
        unsafe { counter.dealloc(ptr, shrunk) };
        assert_eq!(counter.live_bytes(), 0);
    }

    #[test]
    fn references_are_sources() {
        fn read(source: impl MemorySource) -> Option<u64> {
            source.sample()
        }
        let counter = CountingAllocator::new();
        assert_eq!(read(&counter), Some(0));
        assert_eq!(read(&NoMemory), None);
    }
}
