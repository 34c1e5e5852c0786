//! Node configuration
//!
//! ## Overview
//!
//! Every timing constant of the node lives in one [`NodeConfig`]. The
//! default is the deployed firmware's behaviour; presets change only what
//! they name.
//!
//! ```text
//! boot ──10 s──▶ first uplink ──15 min──▶ uplink ──15 min──▶ …
//!   │
//!   ├─ sensors every 60 s ──────── 60 min ───▶ sensors every 5 min
//!   └─ battery at 2.02 s, then 20 ms after every transmission start
//! ```
//!
//! ## Validation
//!
//! The averaging window of the sensor channels is
//! `report_interval / sample_interval`, so the sample interval must divide
//! the report interval and the quotient must fit the window storage
//! ([`MAX_WINDOW_SAMPLES`]). [`NodeConfig::validate`] checks this and the
//! non-zero retry delays; [`Node::new`](crate::node::Node::new) refuses an
//! invalid configuration.
//!
//! ## Loading
//!
//! With the `std` feature a configuration can be read from JSON. Missing
//! fields keep their defaults:
//!
//! ```rust
//! # #[cfg(feature = "std")] {
//! use fieldlink_core::config::{HeaderPolicy, NodeConfig};
//!
//! let config = NodeConfig::from_json_str(r#"{ "report_interval_ms": 600000 }"#).unwrap();
//! assert_eq!(config.report_interval_ms, 600_000);
//! assert_eq!(config.window_len(), 2);
//! assert_eq!(config.header_policy, HeaderPolicy::ResetAfterSend);
//! # }
//! ```

use crate::constants::{
    time::{
        BATTERY_BUSY_RETRY_MS, BATTERY_FIRST_MEASURE_MS, BATTERY_KICK_DELAY_MS, BOOT_PULSE_MS,
        FIRST_REPORT_DELAY_MS, RADIO_RETRY_MS,
    },
    DEFAULT_REPORT_INTERVAL_MS, DEFAULT_SAMPLE_INTERVAL_MS, MAX_WINDOW_SAMPLES,
    SERVICE_MODE_DURATION_MS, SERVICE_SAMPLE_INTERVAL_MS,
};
use crate::errors::{NodeError, NodeResult};
use crate::time::Timestamp;

/// What happens to the report cause after a frame went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeaderPolicy {
    /// Every send returns the cause to `update`, so a periodic report after
    /// a button report is labelled as periodic
    #[default]
    ResetAfterSend,
    /// The cause stays as set until a button event changes it
    Sticky,
}

/// Timing and behaviour of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeConfig {
    /// Sensor sampling interval in normal operation
    pub sample_interval_ms: Timestamp,
    /// Interval between periodic uplinks
    pub report_interval_ms: Timestamp,
    /// Delay from boot to the first uplink
    pub first_report_delay_ms: Timestamp,
    /// Delay between radio readiness polls
    pub radio_retry_ms: Timestamp,
    /// Delay from transmission start to the battery measurement
    pub battery_kick_delay_ms: Timestamp,
    /// Delay from boot to the first battery measurement
    pub battery_first_measure_ms: Timestamp,
    /// Delay before retrying a battery measurement the monitor refused
    pub battery_busy_retry_ms: Timestamp,
    /// Sensor sampling interval while in service mode
    pub service_sample_interval_ms: Timestamp,
    /// Length of service mode after boot; 0 disables it
    pub service_duration_ms: Timestamp,
    /// Length of the boot indicator pulse
    pub boot_pulse_ms: Timestamp,
    /// Report cause handling after a send
    pub header_policy: HeaderPolicy,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
            first_report_delay_ms: FIRST_REPORT_DELAY_MS,
            radio_retry_ms: RADIO_RETRY_MS,
            battery_kick_delay_ms: BATTERY_KICK_DELAY_MS,
            battery_first_measure_ms: BATTERY_FIRST_MEASURE_MS,
            battery_busy_retry_ms: BATTERY_BUSY_RETRY_MS,
            service_sample_interval_ms: SERVICE_SAMPLE_INTERVAL_MS,
            service_duration_ms: SERVICE_MODE_DURATION_MS,
            boot_pulse_ms: BOOT_PULSE_MS,
            header_policy: HeaderPolicy::ResetAfterSend,
        }
    }
}

impl NodeConfig {
    /// Accelerated timing for bench testing
    ///
    /// Samples every second, reports every three seconds, and leaves service
    /// mode after ten seconds.
    pub fn bench() -> Self {
        Self {
            sample_interval_ms: 1_000,
            report_interval_ms: 3_000,
            first_report_delay_ms: 1_000,
            service_sample_interval_ms: 500,
            service_duration_ms: 10_000,
            ..Self::default()
        }
    }

    /// Number of samples averaged per sensor channel
    pub fn window_len(&self) -> usize {
        if self.sample_interval_ms == 0 {
            return 0;
        }
        (self.report_interval_ms / self.sample_interval_ms) as usize
    }

    /// Sensor sampling interval to apply at boot
    pub fn boot_sample_interval_ms(&self) -> Timestamp {
        if self.service_duration_ms > 0 {
            self.service_sample_interval_ms
        } else {
            self.sample_interval_ms
        }
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> NodeResult<()> {
        if self.sample_interval_ms == 0 {
            return Err(NodeError::InvalidConfig {
                reason: "sample interval must be non-zero",
            });
        }
        if self.report_interval_ms == 0 {
            return Err(NodeError::InvalidConfig {
                reason: "report interval must be non-zero",
            });
        }
        if self.report_interval_ms % self.sample_interval_ms != 0 {
            return Err(NodeError::InvalidConfig {
                reason: "sample interval must divide report interval",
            });
        }
        if self.window_len() > MAX_WINDOW_SAMPLES {
            return Err(NodeError::InvalidConfig {
                reason: "too many samples per report",
            });
        }
        if self.radio_retry_ms == 0 || self.battery_busy_retry_ms == 0 {
            return Err(NodeError::InvalidConfig {
                reason: "retry delays must be non-zero",
            });
        }
        if self.service_duration_ms > 0 && self.service_sample_interval_ms == 0 {
            return Err(NodeError::InvalidConfig {
                reason: "service sample interval must be non-zero",
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration document
    #[cfg(feature = "std")]
    pub fn from_json_str(json: &str) -> NodeResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| NodeError::ConfigParse {
            line: e.line(),
            column: e.column(),
        })?;

        config.validate()?;
        Ok(config)
    }
}
