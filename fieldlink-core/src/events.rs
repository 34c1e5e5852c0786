//! Hardware Events Delivered to the Node Core
//!
//! ## Overview
//!
//! Drivers never call into the core directly. Each interrupt-side notification
//! (a probe finished measuring, the modem changed state, the button was
//! clicked) becomes a [`NodeEvent`] posted to the inbound
//! [`EventQueue`](crate::queue::EventQueue). The run loop drains the queue at
//! the start of every scheduling pass and dispatches each event to the
//! [`EventHandler`](crate::traits::EventHandler) capability interface.
//!
//! ```text
//! probe / modem / button ISR ──→ EventQueue ──→ run loop ──→ on_*_event()
//!                                   (bounded)     (single thread)
//! ```
//!
//! ## Memory Model
//!
//! Events are small `Copy` values (at most 12 bytes) so the queue stays a
//! plain array with no allocation:
//!
//! ```text
//! NodeEvent size breakdown:
//! ├── Discriminants: 2 bytes
//! ├── Largest variant (Reading::SoilTemperature): 4 bytes + tag
//! └── Padding to 4-byte alignment
//! ```

/// Measured quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    /// Battery voltage (V)
    BatteryVoltage = 0,
    /// Soil temperature (°C)
    SoilTemperature = 1,
    /// Raw soil capacitance (sensor units)
    SoilMoisture = 2,
    /// Core (board) temperature (°C)
    CoreTemperature = 3,
}

impl Channel {
    /// All channels in report order
    pub const ALL: [Channel; 4] = [
        Channel::BatteryVoltage,
        Channel::SoilTemperature,
        Channel::SoilMoisture,
        Channel::CoreTemperature,
    ];

    /// Label used on the console
    pub const fn label(&self) -> &'static str {
        match self {
            Channel::BatteryVoltage => "Voltage",
            Channel::SoilTemperature => "Soil temperature",
            Channel::SoilMoisture => "Soil Moisture",
            Channel::CoreTemperature => "Core temperature",
        }
    }

    /// Unit of the channel's averages
    pub const fn unit(&self) -> &'static str {
        match self {
            Channel::BatteryVoltage => "V",
            Channel::SoilTemperature | Channel::CoreTemperature => "°C",
            Channel::SoilMoisture => "",
        }
    }
}

/// A finished measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Battery voltage in volts
    BatteryVoltage(f32),
    /// Soil temperature in °C
    SoilTemperature(f32),
    /// Raw soil capacitance
    SoilMoisture(u16),
    /// Core temperature in °C
    CoreTemperature(f32),
}

impl Reading {
    /// Channel this reading belongs to
    pub const fn channel(&self) -> Channel {
        match self {
            Reading::BatteryVoltage(_) => Channel::BatteryVoltage,
            Reading::SoilTemperature(_) => Channel::SoilTemperature,
            Reading::SoilMoisture(_) => Channel::SoilMoisture,
            Reading::CoreTemperature(_) => Channel::CoreTemperature,
        }
    }
}

/// Sensor driver notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// A measurement is ready
    Reading(Reading),
    /// The driver failed to read the given channel
    Error(Channel),
}

/// Radio modem notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RadioEvent {
    /// Modem is idle and accepts commands
    Ready = 0,
    /// Modem reported a fault
    Error = 1,
    /// Transmission of the last frame began
    SendStarted = 2,
    /// Transmission of the last frame finished
    SendDone = 3,
    /// Network join succeeded
    JoinSuccess = 4,
    /// Network join failed
    JoinError = 5,
}

/// Button notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ButtonEvent {
    /// Button went down
    Press = 0,
    /// Short press released
    Click = 1,
    /// Button held past the hold threshold
    Hold = 2,
}

/// Everything a driver can post to the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    /// From a sensor or the battery monitor
    Sensor(SensorEvent),
    /// From the radio modem
    Radio(RadioEvent),
    /// From the button
    Button(ButtonEvent),
}

impl NodeEvent {
    /// Sensor reading event
    pub const fn reading(reading: Reading) -> Self {
        NodeEvent::Sensor(SensorEvent::Reading(reading))
    }

    /// Battery monitor "voltage updated" event
    pub const fn battery_voltage(volts: f32) -> Self {
        Self::reading(Reading::BatteryVoltage(volts))
    }

    /// Sensor failure event
    pub const fn sensor_error(channel: Channel) -> Self {
        NodeEvent::Sensor(SensorEvent::Error(channel))
    }
}

impl From<SensorEvent> for NodeEvent {
    fn from(event: SensorEvent) -> Self {
        NodeEvent::Sensor(event)
    }
}

impl From<Reading> for NodeEvent {
    fn from(reading: Reading) -> Self {
        NodeEvent::reading(reading)
    }
}

impl From<RadioEvent> for NodeEvent {
    fn from(event: RadioEvent) -> Self {
        NodeEvent::Radio(event)
    }
}

impl From<ButtonEvent> for NodeEvent {
    fn from(event: ButtonEvent) -> Self {
        NodeEvent::Button(event)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NodeEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            NodeEvent::Sensor(SensorEvent::Reading(r)) =>
                defmt::write!(fmt, "Reading(ch={=u8})", r.channel() as u8),
            NodeEvent::Sensor(SensorEvent::Error(ch)) =>
                defmt::write!(fmt, "SensorError(ch={=u8})", *ch as u8),
            NodeEvent::Radio(e) => defmt::write!(fmt, "Radio({=u8})", *e as u8),
            NodeEvent::Button(e) => defmt::write!(fmt, "Button({=u8})", *e as u8),
        }
    }
}
