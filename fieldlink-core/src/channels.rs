//! Per-channel averaging windows
//!
//! The node owns one [`RollingAverage`](crate::buffer::RollingAverage) per
//! measured quantity. Sensor drivers only ever push into them (through
//! events); the encoder and the console only ever read a [`ChannelSnapshot`].

use crate::buffer::{MoistureWindow, TemperatureWindow, VoltageWindow};
use crate::constants::VOLTAGE_WINDOW_SAMPLES;
use crate::events::{Channel, Reading};

/// Averages of all channels at one instant
///
/// `None` means the channel received no samples during the current window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSnapshot {
    /// Battery voltage (V)
    pub voltage: Option<f32>,
    /// Soil temperature (°C)
    pub soil_temperature: Option<f32>,
    /// Raw soil capacitance
    pub soil_moisture: Option<i32>,
    /// Core temperature (°C)
    pub core_temperature: Option<f32>,
}

/// The node's averaging windows
#[derive(Debug, Clone)]
pub struct Channels {
    voltage: VoltageWindow,
    soil_temperature: TemperatureWindow,
    soil_moisture: MoistureWindow,
    core_temperature: TemperatureWindow,
}

impl Channels {
    /// Create empty windows
    ///
    /// Sensor channels hold `window` samples (one report period); the battery
    /// channel always holds the last [`VOLTAGE_WINDOW_SAMPLES`] measurements.
    pub fn new(window: usize) -> Self {
        Self {
            voltage: VoltageWindow::with_capacity(VOLTAGE_WINDOW_SAMPLES),
            soil_temperature: TemperatureWindow::with_capacity(window),
            soil_moisture: MoistureWindow::with_capacity(window),
            core_temperature: TemperatureWindow::with_capacity(window),
        }
    }

    /// Store a reading in its channel's window
    ///
    /// Returns `false` if the value was rejected (non-finite).
    pub fn feed(&mut self, reading: Reading) -> bool {
        match reading {
            Reading::BatteryVoltage(v) => self.voltage.feed(v),
            Reading::SoilTemperature(t) => self.soil_temperature.feed(t),
            Reading::SoilMoisture(raw) => self.soil_moisture.feed(i32::from(raw)),
            Reading::CoreTemperature(t) => self.core_temperature.feed(t),
        }
    }

    /// Current averages
    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            voltage: self.voltage.average(),
            soil_temperature: self.soil_temperature.average(),
            soil_moisture: self.soil_moisture.average(),
            core_temperature: self.core_temperature.average(),
        }
    }

    /// Number of samples currently held for `channel`
    pub fn samples(&self, channel: Channel) -> usize {
        match channel {
            Channel::BatteryVoltage => self.voltage.len(),
            Channel::SoilTemperature => self.soil_temperature.len(),
            Channel::SoilMoisture => self.soil_moisture.len(),
            Channel::CoreTemperature => self.core_temperature.len(),
        }
    }

    /// Window length of `channel`
    pub fn window(&self, channel: Channel) -> usize {
        match channel {
            Channel::BatteryVoltage => self.voltage.capacity(),
            Channel::SoilTemperature => self.soil_temperature.capacity(),
            Channel::SoilMoisture => self.soil_moisture.capacity(),
            Channel::CoreTemperature => self.core_temperature.capacity(),
        }
    }
}
