//! Simulated board
//!
//! Records every collaborator call with the tick it happened at. The radio
//! and battery monitor refuse a scripted number of requests before they
//! accept, which is how busy hardware looks to the node.

use std::cell::Cell;
use std::rc::Rc;

use fieldlink_core::{
    time::Timestamp,
    traits::{
        BatteryMonitor, ConsoleSink, Idle, LedMode, Radio, RadioError, SamplingControl,
        StatusIndicator, TimeSource,
    },
};

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCall {
    Sent { at: Timestamp, frame: Vec<u8> },
    RadioBusy { at: Timestamp },
    Led(LedMode),
    Pulse(Timestamp),
    SamplingInterval { at: Timestamp, interval_ms: Timestamp },
    BatteryStarted { at: Timestamp },
    BatteryBusy { at: Timestamp },
    Console(String),
}

/// Board double driven by a shared tick
#[derive(Debug, Default)]
pub struct SimBoard {
    /// Current tick, shared with the test so calls can be timestamped
    pub tick: Rc<Cell<Timestamp>>,
    /// Remaining sends to refuse with `WouldBlock`
    pub radio_busy: u32,
    /// Refuse every send with a driver error
    pub radio_fault: bool,
    /// Remaining battery starts to refuse
    pub battery_busy: u32,
    /// Every call in order
    pub calls: Vec<BoardCall>,
}

impl SimBoard {
    fn now(&self) -> Timestamp {
        self.tick.get()
    }

    /// Transmitted frames in order
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        self.calls.iter().filter_map(|call| match call {
            BoardCall::Sent { frame, .. } => Some(frame.as_slice()),
            _ => None,
        })
    }

    /// Console output in order
    pub fn console(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BoardCall::Console(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    /// LED modes in order
    pub fn led(&self) -> Vec<LedMode> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BoardCall::Led(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }

    /// Sampling intervals requested, with the tick of the request
    pub fn sampling(&self) -> Vec<(Timestamp, Timestamp)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BoardCall::SamplingInterval { at, interval_ms } => Some((*at, *interval_ms)),
                _ => None,
            })
            .collect()
    }

    /// Number of `WouldBlock` answers given
    pub fn busy_polls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BoardCall::RadioBusy { .. }))
            .count()
    }

    /// Ticks at which battery measurements started
    pub fn battery_starts(&self) -> Vec<Timestamp> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BoardCall::BatteryStarted { at } => Some(*at),
                _ => None,
            })
            .collect()
    }
}

impl Radio for SimBoard {
    fn send(&mut self, payload: &[u8]) -> nb::Result<(), RadioError> {
        let at = self.now();
        if self.radio_fault {
            return Err(nb::Error::Other(RadioError::Rejected));
        }
        if self.radio_busy > 0 {
            self.radio_busy -= 1;
            self.calls.push(BoardCall::RadioBusy { at });
            return Err(nb::Error::WouldBlock);
        }
        self.calls.push(BoardCall::Sent { at, frame: payload.to_vec() });
        Ok(())
    }
}

impl StatusIndicator for SimBoard {
    fn set_mode(&mut self, mode: LedMode) {
        self.calls.push(BoardCall::Led(mode));
    }

    fn pulse(&mut self, duration_ms: Timestamp) {
        self.calls.push(BoardCall::Pulse(duration_ms));
    }
}

impl SamplingControl for SimBoard {
    fn set_sampling_interval(&mut self, interval_ms: Timestamp) {
        let at = self.now();
        self.calls.push(BoardCall::SamplingInterval { at, interval_ms });
    }
}

impl BatteryMonitor for SimBoard {
    fn start_measurement(&mut self) -> bool {
        let at = self.now();
        if self.battery_busy > 0 {
            self.battery_busy -= 1;
            self.calls.push(BoardCall::BatteryBusy { at });
            return false;
        }
        self.calls.push(BoardCall::BatteryStarted { at });
        true
    }
}

impl ConsoleSink for SimBoard {
    fn write_line(&mut self, line: &str) {
        self.calls.push(BoardCall::Console(line.to_string()));
    }
}

/// Clock sharing its tick with a [`SimBoard`]
///
/// Waiting jumps to the deadline, like `ManualClock`.
#[derive(Debug, Clone)]
pub struct SimClock {
    pub tick: Rc<Cell<Timestamp>>,
}

impl SimClock {
    /// Jump to `tick` (never backwards)
    pub fn set(&self, tick: Timestamp) {
        self.tick.set(self.tick.get().max(tick));
    }
}

impl TimeSource for SimClock {
    fn now(&self) -> Timestamp {
        self.tick.get()
    }
}

impl Idle for SimClock {
    fn wait_until(&mut self, deadline: Option<Timestamp>) {
        if let Some(deadline) = deadline {
            self.set(deadline);
        }
    }
}
