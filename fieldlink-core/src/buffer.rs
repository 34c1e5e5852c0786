//! Rolling Average Buffers for Channel Sample Streams
//!
//! ## Overview
//!
//! Each measured channel keeps the samples of the current report period in a
//! fixed-size ring. The uplink reports the arithmetic mean of whatever the
//! ring holds at send time, so a report always summarizes one period of
//! measurements and never the whole history.
//!
//! ## Design Rationale
//!
//! ### Capacity
//!
//! The storage bound `N` is a const generic, so a buffer is a plain array and
//! never allocates. The *window* is chosen at runtime from the configuration
//! (`report interval / sample interval`) and must not exceed `N`:
//!
//! ```text
//! RollingAverage<f32, 8> with window 3:
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │  a  │  b  │  c  │  -  │  -  │  -  │  -  │  -  │
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!    ↑ next write wraps here after c; slots 3..8 stay unused
//! ```
//!
//! ### Numeric Domain
//!
//! The mean keeps the sample type. Floating-point channels (volts, degrees)
//! accumulate in `f64` and return `f32`. The raw moisture channel stores
//! integers and its mean is an integer division, truncated toward zero, the
//! same value the receiver has always seen for that field.
//!
//! ### Invalid Samples
//!
//! NaN and infinite floats are dropped at [`RollingAverage::feed`]. One bad
//! conversion from a probe would otherwise poison the mean for a whole
//! report period.
//!
//! ## Usage Example
//!
//! ```rust
//! use fieldlink_core::buffer::RollingAverage;
//!
//! let mut voltage: RollingAverage<f32, 8> = RollingAverage::new();
//! assert_eq!(voltage.average(), None);
//!
//! voltage.feed(3.10);
//! voltage.feed(3.20);
//! voltage.feed(3.30);
//! assert!((voltage.average().unwrap() - 3.20).abs() < 1e-6);
//! ```

use crate::constants::{MAX_WINDOW_SAMPLES, VOLTAGE_WINDOW_SAMPLES};

/// Numeric types a channel can average
pub trait Sample: Copy {
    /// Accumulator used while summing a window
    type Acc: Copy;

    /// Empty accumulator
    const ZERO: Self::Acc;

    /// Add one sample to the running sum
    fn accumulate(acc: Self::Acc, value: Self) -> Self::Acc;

    /// Mean of `count` accumulated samples (`count > 0`)
    fn mean(acc: Self::Acc, count: usize) -> Self;

    /// Whether the sample may enter the window
    fn is_valid(&self) -> bool {
        true
    }
}

impl Sample for f32 {
    type Acc = f64;
    const ZERO: f64 = 0.0;

    fn accumulate(acc: f64, value: f32) -> f64 {
        acc + value as f64
    }

    fn mean(acc: f64, count: usize) -> f32 {
        (acc / count as f64) as f32
    }

    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Sample for i32 {
    type Acc = i64;
    const ZERO: i64 = 0;

    fn accumulate(acc: i64, value: i32) -> i64 {
        acc + value as i64
    }

    fn mean(acc: i64, count: usize) -> i32 {
        // Integer division truncates toward zero
        (acc / count as i64) as i32
    }
}

/// Fixed-capacity ring of samples with an on-demand mean
///
/// ## Type Parameters
///
/// - `T`: sample type (`f32` or `i32`)
/// - `N`: storage bound; the runtime window is `1..=N`
///
/// ## Internal Invariants
///
/// - `capacity <= N` and `capacity >= 1`
/// - `len <= capacity`
/// - `write_pos < capacity`
///
/// A zero storage bound is rejected at compile time:
///
/// ```compile_fail
/// use fieldlink_core::buffer::RollingAverage;
///
/// let window = RollingAverage::<f32, 0>::new();
/// ```
#[derive(Debug, Clone)]
pub struct RollingAverage<T: Sample, const N: usize> {
    /// Storage; `None` marks slots never written
    data: [Option<T>; N],

    /// Runtime window length
    capacity: usize,

    /// Index where the next write will occur
    write_pos: usize,

    /// Number of samples currently held
    len: usize,
}

impl<T: Sample, const N: usize> RollingAverage<T, N> {
    const NON_EMPTY: () = assert!(N > 0, "window storage must hold at least one sample");

    /// Creates an empty buffer whose window is the full storage bound
    pub const fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            data: [None; N],
            capacity: N,
            write_pos: 0,
            len: 0,
        }
    }

    /// Creates an empty buffer with a window of `capacity` samples
    ///
    /// The window is clamped to `1..=N`.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.capacity = capacity.clamp(1, N);
        buffer
    }

    /// Appends a sample, evicting the oldest when the window is full
    ///
    /// Returns `false` if the sample was not valid for its type (non-finite
    /// float) and was discarded.
    pub fn feed(&mut self, value: T) -> bool {
        if !value.is_valid() {
            return false;
        }

        self.data[self.write_pos] = Some(value);
        self.write_pos = (self.write_pos + 1) % self.capacity;

        if self.len < self.capacity {
            self.len += 1;
        }

        true
    }

    /// Mean of the held samples, `None` when empty
    pub fn average(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let sum = self.iter().fold(T::ZERO, T::accumulate);
        Some(T::mean(sum, self.len))
    }

    /// Mean of the held samples, or `no_data` when empty
    pub fn average_or(&self, no_data: T) -> T {
        self.average().unwrap_or(no_data)
    }

    /// Number of held samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Runtime window length
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the window is full
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { self.capacity - 1 } else { self.write_pos - 1 };
        self.data[idx]
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Iterate over samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        // Until the window fills, data starts at 0; afterwards the oldest
        // sample sits at write_pos.
        let start = if self.len < self.capacity { 0 } else { self.write_pos };
        (0..self.len).filter_map(move |i| self.data[(start + i) % self.capacity])
    }
}

impl<T: Sample, const N: usize> Default for RollingAverage<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Battery voltage window (volts)
pub type VoltageWindow = RollingAverage<f32, VOLTAGE_WINDOW_SAMPLES>;

/// Temperature window (°C)
pub type TemperatureWindow = RollingAverage<f32, MAX_WINDOW_SAMPLES>;

/// Raw soil moisture window
pub type MoistureWindow = RollingAverage<i32, MAX_WINDOW_SAMPLES>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buffer: RollingAverage<f32, 5> = RollingAverage::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.average(), None);
        assert_eq!(buffer.latest(), None);
    }

    #[test]
    fn voltage_scenario_average() {
        let mut buffer: VoltageWindow = RollingAverage::new();
        buffer.feed(3.10);
        buffer.feed(3.20);
        buffer.feed(3.30);

        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.average(), Some(3.20));
    }

    #[test]
    fn window_overwrites_oldest() {
        let mut buffer = RollingAverage::<f32, 8>::with_capacity(3);

        for i in 0..5 {
            buffer.feed(i as f32);
        }

        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
        let values: Vec<f32> = buffer.iter().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.average(), Some(3.0));
        assert_eq!(buffer.latest(), Some(4.0));
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(RollingAverage::<i32, 4>::with_capacity(0).capacity(), 1);
        assert_eq!(RollingAverage::<i32, 4>::with_capacity(9).capacity(), 4);
    }

    #[test]
    fn single_slot_storage() {
        let mut buffer = RollingAverage::<i32, 1>::with_capacity(0);
        assert_eq!(buffer.capacity(), 1);
        buffer.feed(7);
        buffer.feed(9);
        assert_eq!(buffer.average(), Some(9));
        assert!(buffer.is_full());
    }

    #[test]
    fn integer_average_truncates() {
        let mut buffer = MoistureWindow::with_capacity(3);
        buffer.feed(10);
        buffer.feed(11);
        assert_eq!(buffer.average(), Some(10));

        let mut negative = RollingAverage::<i32, 4>::new();
        negative.feed(-3);
        negative.feed(-4);
        // -3.5 truncates toward zero
        assert_eq!(negative.average(), Some(-3));
    }

    #[test]
    fn integer_average_or_sentinel() {
        let mut buffer = MoistureWindow::with_capacity(3);
        assert_eq!(buffer.average_or(-10), -10);

        buffer.feed(1200);
        assert_eq!(buffer.average_or(-10), 1200);
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let mut buffer = TemperatureWindow::with_capacity(3);
        assert!(!buffer.feed(f32::NAN));
        assert!(!buffer.feed(f32::INFINITY));
        assert!(buffer.is_empty());

        assert!(buffer.feed(21.5));
        assert_eq!(buffer.average(), Some(21.5));
    }

    #[test]
    fn clear_empties_window() {
        let mut buffer = TemperatureWindow::with_capacity(3);
        buffer.feed(1.0);
        buffer.feed(2.0);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.average(), None);

        buffer.feed(5.0);
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![5.0]);
    }
}
