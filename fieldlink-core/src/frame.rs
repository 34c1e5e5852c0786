//! Uplink Report Frame Encoding
//!
//! ## Overview
//!
//! A report is eight bytes: a header cause followed by one fixed-point field
//! per channel. Narrowband uplinks charge airtime per byte, so there is no
//! tagging, no length prefix and no self-description; the receiver parses
//! by position.
//!
//! ```text
//! 01 20 00 d7 04 bc 00 e6
//! │  │  └─┬─┘ └─┬─┘ └─┬─┘
//! │  │    │     │     └── core temperature  23.0 °C
//! │  │    │     └──────── soil moisture     1212 raw
//! │  │    └────────────── soil temperature  21.5 °C
//! │  └─────────────────── voltage           3.2 V
//! └────────────────────── header            periodic update
//! ```
//!
//! ## Field Encoding
//!
//! | Field        | Defined                       | Absent       |
//! |--------------|-------------------------------|--------------|
//! | voltage      | `ceil(V × 10)` as `u8`        | `0xFF`       |
//! | temperatures | `round(T × 10)` as `i16` BE   | `0xFF, 0xFF` |
//! | moisture     | raw average as `i16` BE       | `0xFF, 0xFF` |
//!
//! Absence is always written, never elided, so the frame length is constant.
//!
//! ## Sentinel Collisions
//!
//! All-ones must never be a real value. Voltage codes saturate at `0xFE`
//! (25.4 V). An `i16` field that would encode as `-1` (a temperature in
//! `[-0.15, -0.05)` °C) is written as `0` instead. Every other field
//! saturates at the `i16` bounds.
//!
//! The encoder is a pure function of its inputs: it has no side effects and
//! cannot fail. Rounding uses `libm` so the bytes are identical on the node
//! and on a host.

use core::fmt;

use crate::channels::ChannelSnapshot;
use crate::constants::frame::{
    CORE_TEMPERATURE_OFFSET, DECI_SCALE, FRAME_LEN, HEADER_OFFSET, MOISTURE_NO_DATA,
    SENTINEL_I16, SENTINEL_U8, SOIL_MOISTURE_OFFSET, SOIL_TEMPERATURE_OFFSET,
    VOLTAGE_CODE_MAX, VOLTAGE_OFFSET,
};
use crate::errors::{NodeError, NodeResult};

/// Why a report was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ReportHeader {
    /// First report after power-up
    Boot = 0x00,
    /// Periodic report
    Update = 0x01,
    /// Button clicked
    ButtonClick = 0x02,
    /// Button held
    ButtonHold = 0x03,
}

impl ReportHeader {
    /// Wire code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Name used by the decoders
    pub const fn name(self) -> &'static str {
        match self {
            ReportHeader::Boot => "BOOT",
            ReportHeader::Update => "UPDATE",
            ReportHeader::ButtonClick => "BUTTON_CLICK",
            ReportHeader::ButtonHold => "BUTTON_HOLD",
        }
    }
}

impl TryFrom<u8> for ReportHeader {
    type Error = NodeError;

    fn try_from(code: u8) -> NodeResult<Self> {
        match code {
            0x00 => Ok(ReportHeader::Boot),
            0x01 => Ok(ReportHeader::Update),
            0x02 => Ok(ReportHeader::ButtonClick),
            0x03 => Ok(ReportHeader::ButtonHold),
            other => Err(NodeError::UnknownHeader(other)),
        }
    }
}

impl fmt::Display for ReportHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size uplink payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFrame([u8; FRAME_LEN]);

impl ReportFrame {
    /// Encode a report from the header cause and the channel averages
    ///
    /// ```rust
    /// use fieldlink_core::channels::ChannelSnapshot;
    /// use fieldlink_core::frame::{ReportFrame, ReportHeader};
    ///
    /// let snapshot = ChannelSnapshot { voltage: Some(3.2), ..Default::default() };
    /// let frame = ReportFrame::encode(ReportHeader::Update, &snapshot);
    ///
    /// assert_eq!(frame.as_bytes(), &[0x01, 32, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    /// ```
    pub fn encode(header: ReportHeader, snapshot: &ChannelSnapshot) -> Self {
        let mut bytes = [SENTINEL_U8; FRAME_LEN];

        bytes[HEADER_OFFSET] = header.code();
        bytes[VOLTAGE_OFFSET] = encode_voltage(snapshot.voltage);
        put_i16(&mut bytes, SOIL_TEMPERATURE_OFFSET, encode_deci(snapshot.soil_temperature));
        put_i16(&mut bytes, SOIL_MOISTURE_OFFSET, encode_raw(snapshot.soil_moisture));
        put_i16(&mut bytes, CORE_TEMPERATURE_OFFSET, encode_deci(snapshot.core_temperature));

        Self(bytes)
    }

    /// Parse a received payload
    ///
    /// The payload must be exactly [`FRAME_LEN`] bytes with a known header.
    pub fn decode(payload: &[u8]) -> NodeResult<DecodedReport> {
        let bytes: [u8; FRAME_LEN] = payload.try_into().map_err(|_| NodeError::FrameLength {
            expected: FRAME_LEN,
            actual: payload.len(),
        })?;

        let header = ReportHeader::try_from(bytes[HEADER_OFFSET])?;

        let voltage = match bytes[VOLTAGE_OFFSET] {
            SENTINEL_U8 => None,
            code => Some(code as f32 / DECI_SCALE),
        };

        Ok(DecodedReport {
            header,
            values: ChannelSnapshot {
                voltage,
                soil_temperature: get_i16(&bytes, SOIL_TEMPERATURE_OFFSET)
                    .map(|v| v as f32 / DECI_SCALE),
                soil_moisture: get_i16(&bytes, SOIL_MOISTURE_OFFSET).map(i32::from),
                core_temperature: get_i16(&bytes, CORE_TEMPERATURE_OFFSET)
                    .map(|v| v as f32 / DECI_SCALE),
            },
        })
    }

    /// Header cause carried by this frame
    pub fn header(&self) -> u8 {
        self.0[HEADER_OFFSET]
    }

    /// Raw payload
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for ReportFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A parsed report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedReport {
    /// Why the report was sent
    pub header: ReportHeader,
    /// Channel averages; sentinel fields are `None`
    pub values: ChannelSnapshot,
}

fn encode_voltage(volts: Option<f32>) -> u8 {
    match volts.filter(|v| v.is_finite()) {
        Some(v) => libm::ceilf(v * DECI_SCALE).clamp(0.0, VOLTAGE_CODE_MAX as f32) as u8,
        None => SENTINEL_U8,
    }
}

fn encode_deci(value: Option<f32>) -> i16 {
    match value.filter(|v| v.is_finite()) {
        Some(v) => avoid_sentinel(saturate_i16(libm::roundf(v * DECI_SCALE) as i32)),
        None => SENTINEL_I16,
    }
}

fn encode_raw(value: Option<i32>) -> i16 {
    match value {
        Some(raw) if raw != MOISTURE_NO_DATA => avoid_sentinel(saturate_i16(raw)),
        _ => SENTINEL_I16,
    }
}

fn saturate_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

fn avoid_sentinel(value: i16) -> i16 {
    if value == SENTINEL_I16 { 0 } else { value }
}

fn put_i16(bytes: &mut [u8; FRAME_LEN], offset: usize, value: i16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

fn get_i16(bytes: &[u8; FRAME_LEN], offset: usize) -> Option<i16> {
    match i16::from_be_bytes([bytes[offset], bytes[offset + 1]]) {
        SENTINEL_I16 => None,
        value => Some(value),
    }
}
