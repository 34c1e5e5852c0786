//! Buffer Sizes and Memory Constraints
//!
//! Every container in the core is fixed-capacity. These bounds size the
//! storage at compile time; the runtime window length chosen by the
//! configuration must fit inside them.

/// Storage bound of a channel averaging window.
///
/// Covers a report period of up to 32 samples (e.g. 16 minutes at 30 s
/// sampling). [`NodeConfig::validate`](crate::config::NodeConfig::validate)
/// rejects configurations that need more.
pub const MAX_WINDOW_SAMPLES: usize = 32;

/// Averaging window of the battery voltage channel.
///
/// Battery measurements are kicked by uplinks rather than by the sampling
/// interval, so this window is fixed.
pub const VOLTAGE_WINDOW_SAMPLES: usize = 8;

/// Inbound hardware event queue capacity.
///
/// Sensors report at most a handful of events per sampling interval; 16
/// leaves room for a burst of radio and button events between passes.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

/// Number of scheduler slots.
///
/// Uplink, battery measurement and mode transition use three; one is spare.
pub const TASK_SLOTS: usize = 4;

/// Longest console line produced by the node.
///
/// Fits the longest `STATUS` line: label prefix plus a finite `f32` printed
/// with one decimal (up to 39 integer digits and a sign).
pub const CONSOLE_LINE_CAPACITY: usize = 96;
