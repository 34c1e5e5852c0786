//! Decode FieldLink uplink payloads
//!
//! ```text
//! $ fieldlink-decode 012000d704bc00e6
//! header:           UPDATE
//! voltage:          3.2 V
//! soil temperature: 21.5 °C
//! soil moisture:    1212
//! core temperature: 23.0 °C
//!
//! $ fieldlink-decode --json 01ffffff04bcffff
//! {"header":"UPDATE","voltage":null,"soil_temperature":null,"soil_moisture":1212,"core_temperature":null}
//! ```

use std::process::ExitCode;

use fieldlink_core::events::Channel;
use fieldlink_core::{DecodedReport, NodeError, ReportFrame};

fn main() -> ExitCode {
    let mut json = false;
    let mut payloads = Vec::new();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("usage: fieldlink-decode [--json] <hex payload>...");
                return ExitCode::SUCCESS;
            }
            _ => payloads.push(arg),
        }
    }

    if payloads.is_empty() {
        eprintln!("usage: fieldlink-decode [--json] <hex payload>...");
        return ExitCode::FAILURE;
    }

    let mut status = ExitCode::SUCCESS;
    for payload in &payloads {
        match decode_hex_payload(payload) {
            Ok(report) if json => println!("{}", to_json(&report)),
            Ok(report) => print_report(&report),
            Err(e) => {
                eprintln!("{}: {}", payload, e);
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}

fn decode_hex_payload(text: &str) -> Result<DecodedReport, NodeError> {
    let bytes = parse_hex(text).ok_or(NodeError::FrameLength {
        expected: fieldlink_core::constants::FRAME_LEN,
        actual: text.len() / 2,
    })?;
    ReportFrame::decode(&bytes)
}

/// Hex string to bytes; whitespace, `:` separators and a `0x` prefix are allowed
fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();

    if digits.len() % 2 != 0 {
        return None;
    }

    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}

fn print_report(report: &DecodedReport) {
    let values = &report.values;
    println!("{:<18}{}", "header:", report.header);
    for channel in Channel::ALL {
        let label = format!("{}:", channel.label().to_lowercase());
        let value = match channel {
            Channel::BatteryVoltage => values.voltage.map(|v| format!("{:.1}", v)),
            Channel::SoilTemperature => values.soil_temperature.map(|v| format!("{:.1}", v)),
            Channel::SoilMoisture => values.soil_moisture.map(|v| v.to_string()),
            Channel::CoreTemperature => values.core_temperature.map(|v| format!("{:.1}", v)),
        };
        match value {
            Some(value) if channel.unit().is_empty() => println!("{:<18}{}", label, value),
            Some(value) => println!("{:<18}{} {}", label, value, channel.unit()),
            None => println!("{:<18}-", label),
        }
    }
}

fn to_json(report: &DecodedReport) -> serde_json::Value {
    let values = &report.values;
    serde_json::json!({
        "header": report.header.name(),
        "voltage": values.voltage,
        "soil_temperature": values.soil_temperature,
        "soil_moisture": values.soil_moisture,
        "core_temperature": values.core_temperature,
    })
}
