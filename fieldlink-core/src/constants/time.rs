//! Time-Related Constants
//!
//! Intervals and delays used by the scheduler, the uplink orchestrator and
//! the mode transition timer. All values are milliseconds of the node's
//! monotonic tick.

use crate::time::Timestamp;

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: Timestamp = 1000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: Timestamp = 60 * MS_PER_SECOND;

/// Milliseconds per hour.
pub const MS_PER_HOUR: Timestamp = 60 * MS_PER_MINUTE;

// ===== SAMPLING AND REPORTING =====

/// Normal sensor sampling interval.
///
/// Soil probes and the core thermometer are read every 5 minutes once the
/// node leaves service mode.
pub const DEFAULT_SAMPLE_INTERVAL_MS: Timestamp = 5 * MS_PER_MINUTE;

/// Interval between periodic uplink reports.
///
/// Must be a whole multiple of the sampling interval: the averaging window
/// holds `report / sample` samples and spans exactly one report period.
pub const DEFAULT_REPORT_INTERVAL_MS: Timestamp = 15 * MS_PER_MINUTE;

/// Delay from boot until the first (boot) report.
pub const FIRST_REPORT_DELAY_MS: Timestamp = 10 * MS_PER_SECOND;

// ===== SERVICE MODE =====

/// Sampling interval while the node is in service (commissioning) mode.
pub const SERVICE_SAMPLE_INTERVAL_MS: Timestamp = MS_PER_MINUTE;

/// How long service mode lasts after boot.
pub const SERVICE_MODE_DURATION_MS: Timestamp = MS_PER_HOUR;

// ===== RADIO AND BATTERY =====

/// Re-poll delay while the radio is not ready to accept a frame.
pub const RADIO_RETRY_MS: Timestamp = 100;

/// Delay between "send started" and the battery measurement kick.
///
/// Measuring under transmit load gives the worst-case battery voltage.
pub const BATTERY_KICK_DELAY_MS: Timestamp = 20;

/// First battery measurement after boot.
pub const BATTERY_FIRST_MEASURE_MS: Timestamp = 2020;

/// Retry delay while a battery measurement is already in progress.
pub const BATTERY_BUSY_RETRY_MS: Timestamp = 20;

// ===== STATUS INDICATOR =====

/// Length of the LED pulse shown at boot.
pub const BOOT_PULSE_MS: Timestamp = 2 * MS_PER_SECOND;
