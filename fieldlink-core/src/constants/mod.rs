//! Constants for FieldLink Core
//!
//! Centralized numeric values used throughout the node. Defaults for
//! [`NodeConfig`](crate::config::NodeConfig) are taken from here so the
//! configuration and the documentation never drift apart.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Time**: sampling, reporting and retry intervals
//! - **Frame**: uplink payload layout and sentinels
//! - **Buffers**: fixed capacities of the ring buffers, queues and task table
//!
//! Names carry their units (`_MS`, `_V`) wherever a unit applies.

/// Sampling, reporting and retry intervals.
pub mod time;

/// Uplink report frame layout.
pub mod frame;

/// Fixed capacities for heapless storage.
pub mod buffers;

pub use time::{
    MS_PER_SECOND, MS_PER_MINUTE, MS_PER_HOUR,
    DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_REPORT_INTERVAL_MS,
    SERVICE_SAMPLE_INTERVAL_MS, SERVICE_MODE_DURATION_MS,
};

pub use frame::{
    FRAME_LEN, SENTINEL_U8, SENTINEL_I16, MOISTURE_NO_DATA,
};

pub use buffers::{
    MAX_WINDOW_SAMPLES, VOLTAGE_WINDOW_SAMPLES, EVENT_QUEUE_CAPACITY, TASK_SLOTS,
    CONSOLE_LINE_CAPACITY,
};
