//! Uplink Orchestrator
//!
//! ## Overview
//!
//! Decides *when* a report frame goes out and what the status indicator
//! shows meanwhile. It owns the report cause (header) and two scheduler
//! tasks: the uplink task and the battery measurement task.
//!
//! ```text
//!            periodic deadline / SEND / button click, hold
//!   ┌──────┐ ───────────────────────────────────────────▶ ┌─────────────────┐
//!   │ Idle │                                               │ WaitingForRadio │──┐ radio busy:
//!   └──────┘ ◀─────────┐                                   └─────────────────┘◀─┘ poll again
//!       ▲     send done│ready                                     │ radio accepts
//!       │     error    │                                          ▼ frame
//!       │          ┌─────────┐                                    │
//!       └──────────│ Sending │◀───────────────────────────────────┘
//!                  └─────────┘
//! ```
//!
//! ## Timing
//!
//! - The periodic deadline is re-armed one report interval from the moment
//!   the radio accepted the frame, not from when the attempt began.
//! - A busy radio is polled every `radio_retry_ms`; the orchestrator never
//!   gives up and has no timeout of its own.
//! - The battery is measured shortly after every transmission start, when
//!   the supply is under load. A measurement already running is never
//!   interrupted; the battery task retries until the monitor accepts.
//!
//! ## Indicator
//!
//! | Event            | LED        |
//! |------------------|------------|
//! | send started     | on         |
//! | send done, ready | off        |
//! | radio error      | fast blink |

use crate::config::{HeaderPolicy, NodeConfig};
use crate::console;
use crate::events::{ButtonEvent, RadioEvent, SensorEvent};
use crate::frame::{ReportFrame, ReportHeader};
use crate::node::{Context, TaskTable};
use crate::scheduler::{Plan, TaskId};
use crate::time::Timestamp;
use crate::traits::{Board, EventHandler, LedMode};

/// Uplink state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UplinkState {
    /// Nothing in flight; waiting for the next trigger
    Idle,
    /// A frame is due and the radio is polled until it accepts
    WaitingForRadio,
    /// The radio accepted a frame and has not reported completion
    Sending,
}

/// Uplink counters since boot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UplinkStats {
    /// Frames handed to the radio
    pub frames_sent: u32,
    /// Polls that found the radio busy
    pub radio_busy_polls: u32,
    /// Frames the radio driver refused
    pub send_failures: u32,
    /// Radio error events
    pub radio_errors: u32,
    /// Battery measurements deferred because one was running
    pub battery_busy: u32,
}

/// Report trigger and radio supervision
#[derive(Debug, Clone)]
pub struct UplinkOrchestrator {
    state: UplinkState,
    header: ReportHeader,
    config: NodeConfig,
    uplink_task: TaskId,
    battery_task: TaskId,
    last_frame: Option<ReportFrame>,
    last_send_at: Option<Timestamp>,
    stats: UplinkStats,
}

impl UplinkOrchestrator {
    /// Create the orchestrator for already registered tasks
    ///
    /// The first frame after boot carries the `boot` cause.
    pub fn new(config: &NodeConfig, uplink_task: TaskId, battery_task: TaskId) -> Self {
        Self {
            state: UplinkState::Idle,
            header: ReportHeader::Boot,
            config: *config,
            uplink_task,
            battery_task,
            last_frame: None,
            last_send_at: None,
            stats: UplinkStats::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> UplinkState {
        self.state
    }

    /// Cause the next frame will carry
    pub fn header(&self) -> ReportHeader {
        self.header
    }

    /// Counters since boot
    pub fn stats(&self) -> &UplinkStats {
        &self.stats
    }

    /// Last frame handed to the radio
    pub fn last_frame(&self) -> Option<&ReportFrame> {
        self.last_frame.as_ref()
    }

    /// Tick at which the radio last accepted a frame
    pub fn last_send_at(&self) -> Option<Timestamp> {
        self.last_send_at
    }

    /// Slot of the uplink task
    pub fn uplink_task(&self) -> TaskId {
        self.uplink_task
    }

    /// Slot of the battery task
    pub fn battery_task(&self) -> TaskId {
        self.battery_task
    }

    /// Start an uplink now, bypassing the periodic deadline
    ///
    /// `cause` replaces the header when given; `None` keeps the current one.
    pub fn trigger(&mut self, cause: Option<ReportHeader>, scheduler: &mut TaskTable) {
        if let Some(header) = cause {
            self.header = header;
        }

        self.state = UplinkState::WaitingForRadio;
        if let Err(_e) = scheduler.plan_now(self.uplink_task) {
            log_warn!("Cannot plan uplink: {}", _e);
        }
    }

    /// Body of the uplink task: pass the radio gate or poll again
    pub fn run_uplink<B: Board>(&mut self, cx: &mut Context<'_, B>) -> Plan {
        self.state = UplinkState::WaitingForRadio;

        let frame = ReportFrame::encode(self.header, &cx.channels.snapshot());

        match cx.board.send(frame.as_bytes()) {
            Ok(()) => {
                self.stats.frames_sent += 1;
                self.state = UplinkState::Sending;
                self.last_frame = Some(frame);
                self.last_send_at = Some(cx.now);
                log_info!(
                    "Frame sent at {} ms: header={} bytes={:02x?}",
                    cx.now,
                    self.header,
                    frame.as_bytes()
                );

                if self.config.header_policy == HeaderPolicy::ResetAfterSend {
                    self.header = ReportHeader::Update;
                }
                self.plan_battery(cx.scheduler, self.config.battery_kick_delay_ms);

                Plan::After(self.config.report_interval_ms)
            }
            Err(nb::Error::WouldBlock) => {
                self.stats.radio_busy_polls += 1;
                log_debug!("Radio not ready, polling again in {} ms", self.config.radio_retry_ms);
                Plan::After(self.config.radio_retry_ms)
            }
            Err(nb::Error::Other(_e)) => {
                self.stats.send_failures += 1;
                self.state = UplinkState::Idle;
                log_warn!("Radio refused frame: {:?}", _e);
                cx.board.set_mode(LedMode::BlinkFast);
                Plan::After(self.config.report_interval_ms)
            }
        }
    }

    /// Body of the battery task: start a measurement unless one is running
    pub fn run_battery<B: Board>(&mut self, cx: &mut Context<'_, B>) -> Plan {
        if cx.board.start_measurement() {
            Plan::Park
        } else {
            self.stats.battery_busy += 1;
            log_debug!("Battery measurement in progress, retrying");
            Plan::After(self.config.battery_busy_retry_ms)
        }
    }

    fn plan_battery(&self, scheduler: &mut TaskTable, delay: u64) {
        if let Err(_e) = scheduler.plan_relative(self.battery_task, delay) {
            log_warn!("Cannot plan battery measurement: {}", _e);
        }
    }
}

impl<B: Board> EventHandler<B> for UplinkOrchestrator {
    fn on_sensor_event(&mut self, event: SensorEvent, cx: &mut Context<'_, B>) {
        match event {
            SensorEvent::Reading(reading) => {
                if !cx.channels.feed(reading) {
                    log_warn!("Dropped invalid {} sample", reading.channel().label());
                }
            }
            SensorEvent::Error(_channel) => {
                log_warn!("{} sensor error", _channel.label());
                cx.board.write_line(console::SENSOR_ERROR);
            }
        }
    }

    fn on_radio_event(&mut self, event: RadioEvent, cx: &mut Context<'_, B>) {
        match event {
            RadioEvent::SendStarted => {
                cx.board.set_mode(LedMode::On);
                self.plan_battery(cx.scheduler, self.config.battery_kick_delay_ms);
            }
            RadioEvent::SendDone | RadioEvent::Ready => {
                cx.board.set_mode(LedMode::Off);
                if self.state == UplinkState::Sending {
                    self.state = UplinkState::Idle;
                }
            }
            RadioEvent::Error => {
                self.stats.radio_errors += 1;
                log_warn!("Radio error");
                cx.board.set_mode(LedMode::BlinkFast);
                if self.state == UplinkState::Sending {
                    self.state = UplinkState::Idle;
                }
            }
            RadioEvent::JoinSuccess => {
                log_info!("Network joined");
                cx.board.write_line(console::JOIN_OK);
            }
            RadioEvent::JoinError => {
                log_warn!("Network join failed");
                cx.board.write_line(console::JOIN_ERROR);
            }
        }
    }

    fn on_button_event(&mut self, event: ButtonEvent, cx: &mut Context<'_, B>) {
        match event {
            ButtonEvent::Click => self.trigger(Some(ReportHeader::ButtonClick), cx.scheduler),
            ButtonEvent::Hold => self.trigger(Some(ReportHeader::ButtonHold), cx.scheduler),
            ButtonEvent::Press => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::Channels;
    use crate::node::Task;
    use crate::test_support::MockBoard;

    struct Fixture {
        scheduler: TaskTable,
        channels: Channels,
        board: MockBoard,
        uplink: UplinkOrchestrator,
    }

    impl Fixture {
        fn new(config: NodeConfig) -> Self {
            let mut scheduler = TaskTable::new();
            let uplink_task = scheduler.register(Task::Uplink, 10_000).unwrap();
            let battery_task = scheduler.register(Task::BatteryMeasure, 2_020).unwrap();
            Self {
                scheduler,
                channels: Channels::new(config.window_len()),
                board: MockBoard::default(),
                uplink: UplinkOrchestrator::new(&config, uplink_task, battery_task),
            }
        }

        fn with<R>(
            &mut self,
            f: impl FnOnce(&mut UplinkOrchestrator, &mut Context<'_, MockBoard>) -> R,
        ) -> R {
            let mut cx = Context {
                now: self.scheduler.now(),
                scheduler: &mut self.scheduler,
                channels: &mut self.channels,
                board: &mut self.board,
            };
            f(&mut self.uplink, &mut cx)
        }
    }

    #[test]
    fn busy_radio_is_polled_again() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.board.radio_busy = 1;

        let plan = fx.with(|up, cx| up.run_uplink(cx));
        assert_eq!(plan, Plan::After(100));
        assert_eq!(fx.uplink.state(), UplinkState::WaitingForRadio);
        assert_eq!(fx.uplink.stats().radio_busy_polls, 1);
        assert!(fx.board.sent.is_empty());
    }

    #[test]
    fn accepted_frame_rearms_and_resets_header() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.scheduler.set_now(10_000);

        let plan = fx.with(|up, cx| up.run_uplink(cx));
        assert_eq!(plan, Plan::After(900_000));
        assert_eq!(fx.uplink.state(), UplinkState::Sending);
        assert_eq!(fx.board.sent.len(), 1);
        assert_eq!(fx.board.sent[0][0], ReportHeader::Boot.code());
        assert_eq!(fx.uplink.header(), ReportHeader::Update);
        assert_eq!(fx.scheduler.due(fx.uplink.battery_task()), Some(10_020));
        assert_eq!(fx.uplink.last_send_at(), Some(10_000));
    }

    #[test]
    fn send_time_only_moves_on_accepted_frames() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.board.radio_busy = 1;
        fx.scheduler.set_now(10_000);
        fx.with(|up, cx| up.run_uplink(cx));
        assert_eq!(fx.uplink.last_send_at(), None);

        fx.scheduler.set_now(10_100);
        fx.with(|up, cx| up.run_uplink(cx));
        assert_eq!(fx.uplink.last_send_at(), Some(10_100));

        fx.board.radio_fault = true;
        fx.scheduler.set_now(910_100);
        fx.with(|up, cx| up.run_uplink(cx));
        assert_eq!(fx.uplink.last_send_at(), Some(10_100));
    }

    #[test]
    fn sticky_policy_keeps_header() {
        let config = NodeConfig {
            header_policy: HeaderPolicy::Sticky,
            ..NodeConfig::default()
        };
        let mut fx = Fixture::new(config);

        fx.with(|up, cx| up.on_button_event(ButtonEvent::Click, cx));
        fx.with(|up, cx| up.run_uplink(cx));
        assert_eq!(fx.uplink.header(), ReportHeader::ButtonClick);
    }

    #[test]
    fn driver_refusal_blinks_and_waits_for_next_period() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.board.radio_fault = true;

        let plan = fx.with(|up, cx| up.run_uplink(cx));
        assert_eq!(plan, Plan::After(900_000));
        assert_eq!(fx.uplink.state(), UplinkState::Idle);
        assert_eq!(fx.uplink.stats().send_failures, 1);
        assert_eq!(fx.board.led.last(), Some(&LedMode::BlinkFast));
    }

    #[test]
    fn radio_events_drive_indicator_and_state() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.with(|up, cx| up.run_uplink(cx));

        fx.with(|up, cx| up.on_radio_event(RadioEvent::SendStarted, cx));
        assert_eq!(fx.board.led.last(), Some(&LedMode::On));

        fx.with(|up, cx| up.on_radio_event(RadioEvent::SendDone, cx));
        assert_eq!(fx.board.led.last(), Some(&LedMode::Off));
        assert_eq!(fx.uplink.state(), UplinkState::Idle);

        fx.with(|up, cx| up.run_uplink(cx));
        fx.with(|up, cx| up.on_radio_event(RadioEvent::Error, cx));
        assert_eq!(fx.board.led.last(), Some(&LedMode::BlinkFast));
        assert_eq!(fx.uplink.state(), UplinkState::Idle);
        assert_eq!(fx.uplink.stats().radio_errors, 1);
    }

    #[test]
    fn button_press_is_ignored() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.with(|up, cx| up.on_button_event(ButtonEvent::Press, cx));

        assert_eq!(fx.uplink.state(), UplinkState::Idle);
        assert_eq!(fx.uplink.header(), ReportHeader::Boot);
        assert_eq!(fx.scheduler.due(fx.uplink.uplink_task()), Some(10_000));
    }

    #[test]
    fn button_hold_triggers_immediately() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.with(|up, cx| up.on_button_event(ButtonEvent::Hold, cx));

        assert_eq!(fx.uplink.state(), UplinkState::WaitingForRadio);
        assert_eq!(fx.uplink.header(), ReportHeader::ButtonHold);
        assert_eq!(fx.scheduler.next_deadline(), Some(0));
    }

    #[test]
    fn battery_task_retries_while_busy() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.board.battery_busy = 1;

        assert_eq!(fx.with(|up, cx| up.run_battery(cx)), Plan::After(20));
        assert_eq!(fx.with(|up, cx| up.run_battery(cx)), Plan::Park);
        assert_eq!(fx.board.battery_starts, 1);
        assert_eq!(fx.uplink.stats().battery_busy, 1);
    }

    #[test]
    fn sensor_events_feed_channels_and_report_errors() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.with(|up, cx| {
            let reading = crate::events::Reading::SoilMoisture(1212);
            up.on_sensor_event(SensorEvent::Reading(reading), cx);
            let failed = crate::events::Channel::SoilTemperature;
            up.on_sensor_event(SensorEvent::Error(failed), cx);
        });

        assert_eq!(fx.channels.snapshot().soil_moisture, Some(1212));
        assert_eq!(fx.board.console, vec![String::from("$STATUS: \"Sensor Error\",")]);
    }

    #[test]
    fn join_results_reach_console() {
        let mut fx = Fixture::new(NodeConfig::default());
        fx.with(|up, cx| {
            up.on_radio_event(RadioEvent::JoinSuccess, cx);
            up.on_radio_event(RadioEvent::JoinError, cx);
        });
        assert_eq!(fx.board.console, vec!["$JOIN_OK", "$JOIN_ERROR"]);
    }
}
