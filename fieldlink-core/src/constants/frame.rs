//! Report Frame Layout
//!
//! ```text
//! byte  0      1        2   3      4   5      6   7
//!     ┌──────┬───────┬──────────┬──────────┬──────────┐
//!     │header│voltage│ soil temp│ moisture │ core temp│
//!     └──────┴───────┴──────────┴──────────┴──────────┘
//!       u8     u8      i16 BE     i16 BE     i16 BE
//! ```
//!
//! Absent fields keep every bit set. The receiver parses positionally, so the
//! layout never changes with the number of present fields.

/// Total frame length in bytes.
pub const FRAME_LEN: usize = 8;

/// Offset of the header cause byte.
pub const HEADER_OFFSET: usize = 0;

/// Offset of the battery voltage byte.
pub const VOLTAGE_OFFSET: usize = 1;

/// Offset of the soil temperature (i16, big-endian).
pub const SOIL_TEMPERATURE_OFFSET: usize = 2;

/// Offset of the raw soil moisture (i16, big-endian).
pub const SOIL_MOISTURE_OFFSET: usize = 4;

/// Offset of the core temperature (i16, big-endian).
pub const CORE_TEMPERATURE_OFFSET: usize = 6;

/// Sentinel for an absent single-byte field.
pub const SENTINEL_U8: u8 = 0xFF;

/// Sentinel for an absent two-byte field (`0xFF, 0xFF`).
pub const SENTINEL_I16: i16 = -1;

/// Largest voltage code that is not the sentinel (25.4 V).
pub const VOLTAGE_CODE_MAX: u8 = SENTINEL_U8 - 1;

/// Fixed-point scale of voltage and temperature fields (tenths).
pub const DECI_SCALE: f32 = 10.0;

/// Average reported by an empty raw moisture stream.
///
/// Raw capacitance readings are unsigned, so a negative value can never be a
/// real reading.
pub const MOISTURE_NO_DATA: i32 = -10;
