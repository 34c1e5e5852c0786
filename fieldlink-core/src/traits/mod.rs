//! Collaborator and Capability Traits
//!
//! The node core is written against traits only; nothing in it knows which
//! modem, LED driver or timer a board uses.
//!
//! ## Module Organization
//!
//! - [`time`] - Time source and idle point of the run loop
//! - [`board`] - Hardware collaborators driven by the core (radio, LED,
//!   sensors, battery monitor, console)
//! - [`handler`] - Event dispatch capability implemented by the uplink
//!   orchestrator
//!
//! ## Design Philosophy
//!
//! Collaborators are generic parameters, not trait objects. A board type is
//! monomorphised into the node, so calls into drivers compile to direct calls
//! and test doubles cost nothing in production builds.

pub mod board;
pub mod handler;
pub mod time;

pub use board::{
    BatteryMonitor, Board, ConsoleSink, LedMode, Radio, RadioError, SamplingControl,
    StatusIndicator,
};
pub use handler::EventHandler;
pub use time::{Idle, TimeSource};
