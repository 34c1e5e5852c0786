//! Time Source Abstraction
//!
//! The node core never reads a hardware timer directly. The run loop asks a
//! [`TimeSource`] for the current tick and hands control to an [`Idle`]
//! implementation whenever no task is due.
//!
//! ## Design Goals
//!
//! - **Platform Independence**: RTC tick on the node, `std::time` on a host
//! - **Testability**: a manually advanced clock makes every scenario
//!   deterministic (see [`ManualClock`](crate::time::ManualClock))
//! - **Power**: the idle point is the only place the node may sleep

use crate::time::Timestamp;

/// Source of monotonic time for the run loop
///
/// ## Implementation Requirements
///
/// - `now()` never goes backwards
/// - Ticks are milliseconds since boot
/// - Timestamp overflow is not handled; `u64` milliseconds outlive the node
///
/// ## Example Implementation
///
/// ```rust
/// use fieldlink_core::traits::TimeSource;
/// use fieldlink_core::time::Timestamp;
///
/// struct RtcTick {
///     ticks: Timestamp,
/// }
///
/// impl TimeSource for RtcTick {
///     fn now(&self) -> Timestamp {
///         self.ticks
///     }
/// }
/// ```
pub trait TimeSource {
    /// Current tick in milliseconds since boot
    fn now(&self) -> Timestamp;
}

/// Suspend point of the cooperative run loop
///
/// Called between scheduling passes. A node enters its low-power wait here;
/// it must return early when a hardware event is posted, and no later than
/// `deadline` when one is given. `None` means no task is planned and only an
/// event can wake the node.
pub trait Idle {
    /// Wait until `deadline` or until the next hardware event
    fn wait_until(&mut self, deadline: Option<Timestamp>);
}
