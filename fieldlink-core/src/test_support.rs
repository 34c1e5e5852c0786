//! Recording board for unit tests

use crate::time::Timestamp;
use crate::traits::{
    BatteryMonitor, ConsoleSink, LedMode, Radio, RadioError, SamplingControl, StatusIndicator,
};

/// Board double that records every call
///
/// `radio_busy` and `battery_busy` count down: each refused call
/// decrements them until the collaborator accepts.
#[derive(Debug, Default)]
pub struct MockBoard {
    pub sent: Vec<Vec<u8>>,
    pub radio_busy: u32,
    pub radio_fault: bool,
    pub led: Vec<LedMode>,
    pub pulses: Vec<Timestamp>,
    pub sampling: Vec<Timestamp>,
    pub battery_busy: u32,
    pub battery_starts: u32,
    pub console: Vec<String>,
}

impl Radio for MockBoard {
    fn send(&mut self, payload: &[u8]) -> nb::Result<(), RadioError> {
        if self.radio_fault {
            return Err(nb::Error::Other(RadioError::Rejected));
        }
        if self.radio_busy > 0 {
            self.radio_busy -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.sent.push(payload.to_vec());
        Ok(())
    }
}

impl StatusIndicator for MockBoard {
    fn set_mode(&mut self, mode: LedMode) {
        self.led.push(mode);
    }

    fn pulse(&mut self, duration_ms: Timestamp) {
        self.pulses.push(duration_ms);
    }
}

impl SamplingControl for MockBoard {
    fn set_sampling_interval(&mut self, interval_ms: Timestamp) {
        self.sampling.push(interval_ms);
    }
}

impl BatteryMonitor for MockBoard {
    fn start_measurement(&mut self) -> bool {
        if self.battery_busy > 0 {
            self.battery_busy -= 1;
            return false;
        }
        self.battery_starts += 1;
        true
    }
}

impl ConsoleSink for MockBoard {
    fn write_line(&mut self, line: &str) {
        self.console.push(line.to_string());
    }
}
