//! Error Types for the Node Core
//!
//! ## Design Philosophy
//!
//! Nothing in the telemetry core is fatal. Missing data is modelled with
//! `Option` and sentinel bytes, a busy radio is polled again later, and a
//! radio fault only changes the status indicator. What remains are errors in
//! how the core is *driven*: a full task table, a stale task id, a malformed
//! console command or uplink payload, an invalid configuration.
//!
//! The error type follows the same rules as the rest of the crate:
//!
//! 1. **Small and `Copy`**: errors are returned from the run loop's hot path
//!    and may be logged from interrupt-adjacent code.
//! 2. **No heap**: messages are `&'static str`, counts are plain integers.
//! 3. **Absorbed, not propagated**: the run loop logs errors and keeps going;
//!    callers outside the loop (tests, tools, board bring-up) get a `Result`.
//!
//! ```rust
//! use fieldlink_core::{NodeError, frame::ReportFrame};
//!
//! match ReportFrame::decode(&[0x01, 0x20]) {
//!     Err(NodeError::FrameLength { expected, actual }) => {
//!         assert_eq!((expected, actual), (8, 2));
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for node operations
pub type NodeResult<T> = Result<T, NodeError>;

/// Errors raised while driving the node core
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    /// Every scheduler slot is occupied
    #[error("Task table full ({capacity} slots)")]
    TaskTableFull {
        /// Number of slots in the table
        capacity: usize,
    },

    /// Slot id does not refer to a registered task
    #[error("Unknown task id {id}")]
    UnknownTask {
        /// The offending slot id
        id: u8,
    },

    /// A `plan_current_*` helper was called outside of a running task
    #[error("No task is currently running")]
    NoCurrentTask,

    /// Inbound event queue is full; the event was dropped
    #[error("Event queue full ({capacity} events)")]
    EventQueueFull {
        /// Queue capacity
        capacity: usize,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which rule was violated
        reason: &'static str,
    },

    /// Configuration document could not be parsed
    #[error("Configuration parse error at line {line}, column {column}")]
    ConfigParse {
        /// 1-based line of the error
        line: usize,
        /// 1-based column of the error
        column: usize,
    },

    /// Uplink payload has the wrong length
    #[error("Frame length {actual}, expected {expected}")]
    FrameLength {
        /// Fixed frame length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Header byte is not a known report cause
    #[error("Unknown report header 0x{0:02x}")]
    UnknownHeader(u8),

    /// Console line is not a known command
    #[error("Unknown console command")]
    UnknownCommand,

    /// Console reply does not fit the line buffer
    #[error("Console line exceeds {capacity} bytes")]
    LineTooLong {
        /// Line buffer capacity
        capacity: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for NodeError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::TaskTableFull { capacity } =>
                defmt::write!(fmt, "Task table full ({} slots)", capacity),
            Self::UnknownTask { id } =>
                defmt::write!(fmt, "Unknown task {}", id),
            Self::NoCurrentTask =>
                defmt::write!(fmt, "No current task"),
            Self::EventQueueFull { capacity } =>
                defmt::write!(fmt, "Event queue full ({})", capacity),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
            Self::ConfigParse { line, column } =>
                defmt::write!(fmt, "Config parse error {}:{}", line, column),
            Self::FrameLength { expected, actual } =>
                defmt::write!(fmt, "Frame length {}, expected {}", actual, expected),
            Self::UnknownHeader(byte) =>
                defmt::write!(fmt, "Unknown header {=u8:x}", byte),
            Self::UnknownCommand =>
                defmt::write!(fmt, "Unknown command"),
            Self::LineTooLong { capacity } =>
                defmt::write!(fmt, "Console line over {} bytes", capacity),
        }
    }
}
