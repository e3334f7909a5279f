//! Elapsed-time and memory-delta measurement around single calls.
//!
//! Wrap any operation in [`measure`] (or [`measure_with`] for an explicit
//! [`MemorySource`]) to get its result back alongside how long it took and
//! how much memory moved while it ran:
//!
//! ```
//! use tally_probe::{NoMemory, Totals, measure_with};
//!
//! let mut totals = Totals::new();
//! for n in [10, 20, 30] {
//!     let measured = measure_with(&NoMemory, || (0..n).sum::<u64>());
//!     totals.record(&measured);
//! }
//!
//! assert_eq!(totals.calls(), 3);
//! assert_eq!(totals.memory_delta(), None);
//! ```
//!
//! The wrapper is transparent: the operation's return value is passed
//! through untouched, and a panic inside it unwinds through the probe.

#![warn(missing_docs)]

mod memory;

pub use memory::{CountingAllocator, MemorySource, NoMemory, ResidentSet};

use std::fmt;
use std::ops::AddAssign;
use std::time::{Duration, Instant};

/// An operation's result together with what it cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measured<R> {
    /// Whatever the operation returned.
    pub result: R,
    /// Wall-clock time between entering and leaving the operation.
    pub elapsed: Duration,
    /// Signed change of the memory figure, or `None` if the source could
    /// not be read before or after.
    pub memory_delta: Option<i64>,
}

impl<R> Measured<R> {
    /// Replaces the result, keeping the measurement.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Measured<U> {
        Measured {
            result: f(self.result),
            elapsed: self.elapsed,
            memory_delta: self.memory_delta,
        }
    }

    /// Discards the result, keeping the measurement.
    pub fn into_parts(self) -> (R, Duration, Option<i64>) {
        (self.result, self.elapsed, self.memory_delta)
    }
}

/// Runs `op` once, sampling the process resident set before and after.
#[inline]
pub fn measure<R>(op: impl FnOnce() -> R) -> Measured<R> {
    measure_with(&ResidentSet, op)
}

/// Runs `op` once, sampling `source` before and after.
pub fn measure_with<M, R>(source: &M, op: impl FnOnce() -> R) -> Measured<R>
where
    M: MemorySource + ?Sized,
{
    let before = source.sample();
    let start = Instant::now();
    let result = op();
    let elapsed = start.elapsed();
    let after = source.sample();

    let memory_delta = match (before, after) {
        (Some(b), Some(a)) => Some(a as i64 - b as i64),
        _ => None,
    };

    log::trace!(
        "measured call: {} ns, memory delta {:?}",
        elapsed.as_nanos(),
        memory_delta
    );

    Measured {
        result,
        elapsed,
        memory_delta,
    }
}

/// Runs a fallible `op` once. An `Err` is returned as is, unmeasured.
pub fn try_measure<R, E>(op: impl FnOnce() -> Result<R, E>) -> Result<Measured<R>, E> {
    let measured = measure(op);
    let result = measured.result?;
    Ok(Measured {
        result,
        elapsed: measured.elapsed,
        memory_delta: measured.memory_delta,
    })
}

// =============================================================================
// Totals
// =============================================================================

/// Running sum of measurements across several calls.
///
/// The memory figure is the sum of the known deltas; it stays `None` only
/// while no recorded call had one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    elapsed: Duration,
    memory_delta: Option<i64>,
    calls: usize,
}

impl Totals {
    /// Creates empty totals.
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            memory_delta: None,
            calls: 0,
        }
    }

    /// Adds one measurement.
    pub fn record<R>(&mut self, measured: &Measured<R>) {
        self.add(measured.elapsed, measured.memory_delta, 1);
    }

    /// Folds another set of totals into this one.
    pub fn merge(&mut self, other: &Totals) {
        self.add(other.elapsed, other.memory_delta, other.calls);
    }

    fn add(&mut self, elapsed: Duration, memory_delta: Option<i64>, calls: usize) {
        self.elapsed += elapsed;
        self.calls += calls;
        if let Some(delta) = memory_delta {
            *self.memory_delta.get_or_insert(0) += delta;
        }
    }

    /// Total wall-clock time.
    #[inline]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total wall-clock time in microseconds.
    #[inline]
    pub fn elapsed_micros(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000_000.0
    }

    /// Sum of the known memory deltas.
    #[inline]
    pub const fn memory_delta(&self) -> Option<i64> {
        self.memory_delta
    }

    /// Number of calls recorded.
    #[inline]
    pub const fn calls(&self) -> usize {
        self.calls
    }
}

impl<R> AddAssign<&Measured<R>> for Totals {
    fn add_assign(&mut self, measured: &Measured<R>) {
        self.record(measured);
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} µs", self.elapsed_micros())?;
        match self.memory_delta {
            Some(bytes) => write!(f, ", {bytes} bytes"),
            None => write!(f, ", memory n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// A source that returns scripted figures in order.
    struct Scripted(Cell<usize>, Vec<Option<u64>>);

    impl MemorySource for Scripted {
        fn sample(&self) -> Option<u64> {
            let i = self.0.get();
            self.0.set(i + 1);
            self.1.get(i).copied().flatten()
        }
    }

    #[test]
    fn result_passes_through() {
        let measured = measure_with(&NoMemory, || "done");
        assert_eq!(measured.result, "done");
        assert_eq!(measured.memory_delta, None);
    }

    #[test]
    fn delta_is_after_minus_before() {
        let grow = Scripted(Cell::new(0), vec![Some(100), Some(160)]);
        assert_eq!(measure_with(&grow, || ()).memory_delta, Some(60));

        let shrink = Scripted(Cell::new(0), vec![Some(160), Some(100)]);
        assert_eq!(measure_with(&shrink, || ()).memory_delta, Some(-60));
    }

    #[test]
    fn missing_sample_makes_delta_unknown() {
        let source = Scripted(Cell::new(0), vec![Some(100), None]);
        assert_eq!(measure_with(&source, || ()).memory_delta, None);
    }

    #[test]
    fn elapsed_covers_the_operation() {
        let measured = measure_with(&NoMemory, || {
            std::thread::sleep(Duration::from_millis(5));
        });
        assert!(measured.elapsed >= Duration::from_millis(5));
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn panics_unwind_through() {
        let _ = measure_with(&NoMemory, || -> u32 { panic!("boom") });
    }

    #[test]
    fn try_measure_passes_errors_unchanged() {
        let err: Result<Measured<u32>, &str> = try_measure(|| Err("nope"));
        assert_eq!(err, Err("nope"));

        let ok = try_measure(|| Ok::<_, &str>(7)).unwrap();
        assert_eq!(ok.result, 7);
    }

    #[test]
    fn totals_sum_known_deltas() {
        let mut totals = Totals::new();
        totals.record(&Measured {
            result: (),
            elapsed: Duration::from_micros(3),
            memory_delta: None,
        });
        assert_eq!(totals.memory_delta(), None);

        totals += &Measured {
            result: (),
            elapsed: Duration::from_micros(4),
            memory_delta: Some(128),
        };
        totals.record(&Measured {
            result: (),
            elapsed: Duration::from_micros(5),
            memory_delta: Some(-28),
        });

        assert_eq!(totals.calls(), 3);
        assert_eq!(totals.elapsed(), Duration::from_micros(12));
        assert_eq!(totals.memory_delta(), Some(100));
        assert_eq!(totals.to_string(), "12.000 µs, 100 bytes");
    }

    #[test]
    fn merge_adds_calls_and_time() {
        let mut a = Totals::new();
        a.record(&measure_with(&NoMemory, || ()));
        let mut b = Totals::new();
        b.record(&Measured {
            result: (),
            elapsed: Duration::from_micros(1),
            memory_delta: Some(8),
        });

        a.merge(&b);
        assert_eq!(a.calls(), 2);
        assert_eq!(a.memory_delta(), Some(8));
        assert!(a.elapsed() >= Duration::from_micros(1));
    }

    #[test]
    fn map_keeps_measurement() {
        let measured = Measured {
            result: 2u32,
            elapsed: Duration::from_nanos(9),
            memory_delta: Some(1),
        };
        let mapped = measured.map(|v| v * 10);
        assert_eq!(mapped.into_parts(), (20, Duration::from_nanos(9), Some(1)));
    }
}

#[cfg(test)]
mod bench_probe {
    use super::*;
    use hdrhistogram::Histogram;

    const ITERATIONS: usize = 100_000;

    fn print_histogram(name: &str, hist: &Histogram<u64>) {
        println!(
            "{:16} p50: {:5} ns | p99: {:5} ns | p999: {:6} ns | max: {:6}",
            name,
            hist.value_at_quantile(0.50),
            hist.value_at_quantile(0.99),
            hist.value_at_quantile(0.999),
            hist.max(),
        );
    }

    #[test]
    #[ignore]
    fn bench_probe_overhead() {
        let counter = CountingAllocator::new();
        let mut none_hist = Histogram::<u64>::new(3).unwrap();
        let mut counting_hist = Histogram::<u64>::new(3).unwrap();
        let mut rss_hist = Histogram::<u64>::new(3).unwrap();

        for i in 0..ITERATIONS as u64 {
            let m = measure_with(&NoMemory, || std::hint::black_box(i));
            none_hist.record(m.elapsed.as_nanos() as u64).unwrap();

            let start = Instant::now();
            std::hint::black_box(measure_with(&counter, || i));
            counting_hist.record(start.elapsed().as_nanos() as u64).unwrap();

            let start = Instant::now();
            std::hint::black_box(measure(|| i));
            rss_hist.record(start.elapsed().as_nanos() as u64).unwrap();
        }

        println!("\nprobe overhead ({ITERATIONS} iterations)");
        print_histogram("inner/none", &none_hist);
        print_histogram("total/counting", &counting_hist);
        print_histogram("total/resident", &rss_hist);
    }
}
