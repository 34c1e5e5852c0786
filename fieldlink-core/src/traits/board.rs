//! Collaborator Traits
//!
//! The drivers around the core (radio modem, LED, sensor probes, battery
//! monitor, console transport) are narrow I/O shims. The core only sees them
//! through these traits, bundled into [`Board`].
//!
//! ## Radio Gate
//!
//! [`Radio::send`] follows the `nb` convention used across embedded Rust:
//!
//! ```text
//! send(frame) ─┬─ Ok(())                 accepted, transmission starts
//!              ├─ Err(WouldBlock)        not ready (joining, busy, duty cycle)
//!              └─ Err(Other(RadioError)) driver refused the frame
//! ```
//!
//! `WouldBlock` is the only signal the orchestrator needs to back off and
//! poll again.
//!
//! ## Example
//!
//! ```rust
//! use fieldlink_core::traits::{
//!     BatteryMonitor, ConsoleSink, LedMode, Radio, RadioError, SamplingControl,
//!     StatusIndicator,
//! };
//! use fieldlink_core::time::Timestamp;
//!
//! #[derive(Default)]
//! struct BenchBoard {
//!     sent: usize,
//! }
//!
//! impl Radio for BenchBoard {
//!     fn send(&mut self, _payload: &[u8]) -> nb::Result<(), RadioError> {
//!         self.sent += 1;
//!         Ok(())
//!     }
//! }
//! impl StatusIndicator for BenchBoard {
//!     fn set_mode(&mut self, _mode: LedMode) {}
//!     fn pulse(&mut self, _duration_ms: Timestamp) {}
//! }
//! impl SamplingControl for BenchBoard {
//!     fn set_sampling_interval(&mut self, _interval_ms: Timestamp) {}
//! }
//! impl BatteryMonitor for BenchBoard {
//!     fn start_measurement(&mut self) -> bool { true }
//! }
//! impl ConsoleSink for BenchBoard {
//!     fn write_line(&mut self, _line: &str) {}
//! }
//!
//! // BenchBoard is now a `fieldlink_core::traits::Board`
//! ```

use crate::time::Timestamp;

/// Errors the radio driver reports synchronously from `send`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// Payload longer than the current data rate allows
    PayloadTooLong,
    /// Driver is not joined to a network and cannot queue the frame
    NotJoined,
    /// Modem rejected the command
    Rejected,
}

/// Uplink transceiver
pub trait Radio {
    /// Hand a frame to the modem
    ///
    /// Returns `WouldBlock` while the modem cannot accept a new frame.
    fn send(&mut self, payload: &[u8]) -> nb::Result<(), RadioError>;
}

/// Status LED modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    /// Dark
    Off,
    /// Continuously lit (transmission in progress)
    On,
    /// Fast blinking (radio fault)
    BlinkFast,
}

/// Status indicator (LED)
pub trait StatusIndicator {
    /// Switch to a steady mode
    fn set_mode(&mut self, mode: LedMode);

    /// Light once for `duration_ms`, then return to the previous mode
    fn pulse(&mut self, duration_ms: Timestamp);
}

/// Sensor drivers' update cadence
pub trait SamplingControl {
    /// Request a new interval between sensor measurements
    fn set_sampling_interval(&mut self, interval_ms: Timestamp);
}

/// Battery voltage monitor
pub trait BatteryMonitor {
    /// Start a measurement
    ///
    /// Returns `false` if a measurement is already running. The result is
    /// delivered later as a battery event.
    fn start_measurement(&mut self) -> bool;
}

/// Line-oriented console output
pub trait ConsoleSink {
    /// Write one line (without terminator)
    fn write_line(&mut self, line: &str);
}

/// Everything the node drives
///
/// Implemented automatically for any type that implements all collaborator
/// traits; boards and test doubles only implement the parts.
pub trait Board: Radio + StatusIndicator + SamplingControl + BatteryMonitor + ConsoleSink {}

impl<T> Board for T where
    T: Radio + StatusIndicator + SamplingControl + BatteryMonitor + ConsoleSink
{
}
