//! Telemetry and uplink core for FieldLink sensor nodes
//!
//! Aggregates soil and battery measurements into per-report averages,
//! packs them into an 8-byte uplink frame and decides when the frame goes
//! out over a low-power radio.
//! Designed for battery-powered nodes with a few kilobytes of RAM.
//!
//! Key constraints:
//! - No heap allocation (fixed-size windows, queue and task table)
//! - Single cooperative thread; drivers only post events
//! - Sleep whenever no task is due
//!
//! ```
//! use fieldlink_core::{Node, NodeConfig, events::ButtonEvent};
//! # use fieldlink_core::time::Timestamp;
//! # use fieldlink_core::traits::*;
//! # struct DevKit;
//! # impl Radio for DevKit {
//! #     fn send(&mut self, _: &[u8]) -> nb::Result<(), RadioError> { Ok(()) }
//! # }
//! # impl StatusIndicator for DevKit {
//! #     fn set_mode(&mut self, _: LedMode) {}
//! #     fn pulse(&mut self, _: Timestamp) {}
//! # }
//! # impl SamplingControl for DevKit {
//! #     fn set_sampling_interval(&mut self, _: Timestamp) {}
//! # }
//! # impl BatteryMonitor for DevKit {
//! #     fn start_measurement(&mut self) -> bool { true }
//! # }
//! # impl ConsoleSink for DevKit {
//! #     fn write_line(&mut self, _: &str) {}
//! # }
//! # fn board() -> DevKit { DevKit }
//!
//! let mut node = Node::new(NodeConfig::default(), board()).unwrap();
//!
//! // From the button driver
//! node.post(ButtonEvent::Hold).unwrap();
//!
//! // From the main loop
//! let next_deadline = node.poll(0);
//! assert!(next_deadline.is_some());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod buffer;
pub mod channels;
pub mod config;
pub mod console;
pub mod constants;
pub mod errors;
pub mod events;
pub mod frame;
pub mod mode;
pub mod node;
pub mod orchestrator;
pub mod queue;
pub mod scheduler;
pub mod time;
pub mod traits;

#[cfg(test)]
mod test_support;

// Public API
pub use config::{HeaderPolicy, NodeConfig};
pub use errors::{NodeError, NodeResult};
pub use events::NodeEvent;
pub use frame::{DecodedReport, ReportFrame, ReportHeader};
pub use node::Node;
pub use scheduler::{Plan, Scheduler, TaskId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
