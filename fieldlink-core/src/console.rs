//! AT-style console
//!
//! The node answers a small line protocol on its debug UART:
//!
//! ```text
//! > AT$SEND
//! < OK
//! > AT$STATUS
//! < $STATUS: "Voltage",3.2
//! < $STATUS: "Soil temperature",
//! < $STATUS: "Soil Moisture",1212
//! < $STATUS: "Core temperature",23.0
//! < OK
//! > AT+CLAC
//! < AT$SEND
//! < AT$STATUS
//! < AT+CLAC
//! < AT$HELP
//! < OK
//! > AT$FOO
//! < ERROR
//! ```
//!
//! Commands are case-insensitive, surrounding whitespace is ignored, and the
//! `AT` prefix and the `$`/`+` sigil are optional. A channel without data
//! prints nothing after the comma.

use core::fmt::Write;
use core::str::FromStr;

use heapless::String;

use crate::channels::ChannelSnapshot;
use crate::constants::CONSOLE_LINE_CAPACITY;
use crate::errors::{NodeError, NodeResult};
use crate::events::Channel;

/// Reply to a successful command
pub const OK: &str = "OK";
/// Reply to an unknown command
pub const ERROR: &str = "ERROR";
/// Printed when the network join succeeds
pub const JOIN_OK: &str = "$JOIN_OK";
/// Printed when the network join fails
pub const JOIN_ERROR: &str = "$JOIN_ERROR";
/// Printed when a sensor driver reports a failure
pub const SENSOR_ERROR: &str = "$STATUS: \"Sensor Error\",";

/// One console line
pub type Line = String<CONSOLE_LINE_CAPACITY>;

/// Console commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Bare `AT`: liveness check, answers `OK`
    Ping,
    /// Send a report now
    Send,
    /// Print the current channel averages
    Status,
    /// `AT+CLAC`: list every command
    ListCommands,
    /// `AT$HELP`: list every command with a short description
    Help,
}

/// Name and description of a console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    /// Command as typed after `AT`, sigil included
    pub name: &'static str,
    /// One-line description printed by `AT$HELP`
    pub hint: &'static str,
    /// Parsed form
    pub command: Command,
}

/// Command table in listing order
pub const COMMANDS: [CommandInfo; 4] = [
    CommandInfo {
        name: "$SEND",
        hint: "Immediately send packet",
        command: Command::Send,
    },
    CommandInfo {
        name: "$STATUS",
        hint: "Show status",
        command: Command::Status,
    },
    CommandInfo {
        name: "+CLAC",
        hint: "List all available AT commands",
        command: Command::ListCommands,
    },
    CommandInfo {
        name: "$HELP",
        hint: "This help",
        command: Command::Help,
    },
];

impl FromStr for Command {
    type Err = NodeError;

    fn from_str(line: &str) -> NodeResult<Self> {
        let line = line.trim();
        let line = strip_prefix_ignore_case(line, "AT").unwrap_or(line);
        if line.is_empty() {
            return Ok(Command::Ping);
        }

        let word = line.strip_prefix(['$', '+']).unwrap_or(line);
        COMMANDS
            .iter()
            .find(|info| info.name[1..].eq_ignore_ascii_case(word))
            .map(|info| info.command)
            .ok_or(NodeError::UnknownCommand)
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// `STATUS` line for one channel
pub fn status_line(channel: Channel, snapshot: &ChannelSnapshot) -> NodeResult<Line> {
    let mut line = Line::new();
    write_status(&mut line, channel, snapshot)?;
    Ok(line)
}

/// All `STATUS` lines in reporting order
pub fn status_lines(snapshot: &ChannelSnapshot) -> impl Iterator<Item = NodeResult<Line>> + '_ {
    Channel::ALL.into_iter().map(move |channel| status_line(channel, snapshot))
}

/// `AT+CLAC` line for one command
pub fn list_line(info: &CommandInfo) -> NodeResult<Line> {
    let mut line = Line::new();
    fitted::<CONSOLE_LINE_CAPACITY>(write!(line, "AT{}", info.name))?;
    Ok(line)
}

/// `AT$HELP` line for one command
pub fn help_line(info: &CommandInfo) -> NodeResult<Line> {
    let mut line = Line::new();
    fitted::<CONSOLE_LINE_CAPACITY>(write!(line, "AT{} {}", info.name, info.hint))?;
    Ok(line)
}

fn write_status<const N: usize>(
    line: &mut String<N>,
    channel: Channel,
    snapshot: &ChannelSnapshot,
) -> NodeResult<()> {
    let result = write!(line, "$STATUS: \"{}\",", channel.label()).and_then(|()| match channel {
        Channel::BatteryVoltage => write_deci(line, snapshot.voltage),
        Channel::SoilTemperature => write_deci(line, snapshot.soil_temperature),
        Channel::SoilMoisture => match snapshot.soil_moisture {
            Some(raw) => write!(line, "{}", raw),
            None => Ok(()),
        },
        Channel::CoreTemperature => write_deci(line, snapshot.core_temperature),
    });
    fitted::<N>(result)
}

fn write_deci<const N: usize>(line: &mut String<N>, value: Option<f32>) -> core::fmt::Result {
    match value {
        Some(v) => write!(line, "{:.1}", v),
        None => Ok(()),
    }
}

fn fitted<const N: usize>(result: core::fmt::Result) -> NodeResult<()> {
    result.map_err(|_| NodeError::LineTooLong { capacity: N })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_optional_prefixes() {
        assert_eq!("AT$SEND".parse::<Command>(), Ok(Command::Send));
        assert_eq!("$status".parse::<Command>(), Ok(Command::Status));
        assert_eq!("  send \r\n".parse::<Command>(), Ok(Command::Send));
        assert_eq!("at$Status".parse::<Command>(), Ok(Command::Status));
        assert_eq!("AT".parse::<Command>(), Ok(Command::Ping));
        assert_eq!("AT+CLAC".parse::<Command>(), Ok(Command::ListCommands));
        assert_eq!("at+clac".parse::<Command>(), Ok(Command::ListCommands));
        assert_eq!("AT$HELP".parse::<Command>(), Ok(Command::Help));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
    }

    #[test]
    fn every_listed_command_parses() {
        for info in &COMMANDS {
            let typed = format!("AT{}", info.name);
            assert_eq!(typed.parse::<Command>(), Ok(info.command));
        }
    }

    #[test]
    fn command_listing_and_help() {
        let list: Vec<Line> = COMMANDS.iter().map(|c| list_line(c).unwrap()).collect();
        let list: Vec<&str> = list.iter().map(|l| l.as_str()).collect();
        assert_eq!(list, ["AT$SEND", "AT$STATUS", "AT+CLAC", "AT$HELP"]);

        let help = help_line(&COMMANDS[0]).unwrap();
        assert_eq!(help.as_str(), "AT$SEND Immediately send packet");
        let help = help_line(&COMMANDS[2]).unwrap();
        assert_eq!(help.as_str(), "AT+CLAC List all available AT commands");
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!("AT$REBOOT".parse::<Command>(), Err(NodeError::UnknownCommand));
        assert_eq!("SENDX".parse::<Command>(), Err(NodeError::UnknownCommand));
        assert_eq!("AT$".parse::<Command>(), Err(NodeError::UnknownCommand));
        assert_eq!("AT+".parse::<Command>(), Err(NodeError::UnknownCommand));
    }

    #[test]
    fn status_with_values() {
        let snapshot = ChannelSnapshot {
            voltage: Some(3.2),
            soil_temperature: Some(21.44),
            soil_moisture: Some(1234),
            core_temperature: Some(22.0),
        };

        let lines: Vec<Line> = status_lines(&snapshot).map(Result::unwrap).collect();
        assert_eq!(lines[0].as_str(), "$STATUS: \"Voltage\",3.2");
        assert_eq!(lines[1].as_str(), "$STATUS: \"Soil temperature\",21.4");
        assert_eq!(lines[2].as_str(), "$STATUS: \"Soil Moisture\",1234");
        assert_eq!(lines[3].as_str(), "$STATUS: \"Core temperature\",22.0");
    }

    #[test]
    fn empty_channel_prints_nothing_after_comma() {
        let snapshot = ChannelSnapshot::default();
        let line = status_line(Channel::SoilTemperature, &snapshot).unwrap();
        assert_eq!(line.as_str(), "$STATUS: \"Soil temperature\",");
    }

    #[test]
    fn extreme_values_fit_the_line() {
        let snapshot = ChannelSnapshot {
            voltage: Some(f32::MAX),
            soil_temperature: Some(f32::MIN),
            soil_moisture: Some(i32::MIN),
            core_temperature: Some(3.0e38),
        };

        for (channel, line) in Channel::ALL.into_iter().zip(status_lines(&snapshot)) {
            let line = line.unwrap();
            let prefix = format!("$STATUS: \"{}\",", channel.label());
            assert!(line.starts_with(&prefix), "{}", line);
            assert!(line.len() > prefix.len(), "value missing: {}", line);
        }

        let line = status_line(Channel::CoreTemperature, &snapshot).unwrap();
        assert!(line.ends_with(".0"), "{}", line);
        assert!(line.len() > 60);
    }

    #[test]
    fn overflow_is_reported() {
        let snapshot = ChannelSnapshot {
            core_temperature: Some(3.0e38),
            ..ChannelSnapshot::default()
        };
        let mut short = String::<32>::new();
        assert_eq!(
            write_status(&mut short, Channel::CoreTemperature, &snapshot),
            Err(NodeError::LineTooLong { capacity: 32 })
        );
    }
}
