//! Node Context and Run Loop
//!
//! ## Overview
//!
//! [`Node`] owns everything the firmware keeps between events: the task
//! table, the averaging windows, the inbound event queue, the uplink
//! orchestrator, the service mode timer and the board. There are no globals;
//! drivers post events, the run loop polls.
//!
//! ```text
//!  drivers ──post()──▶ ┌────────────┐
//!                      │ EventQueue │──▶ EventHandler (orchestrator)
//!                      └────────────┘          │ plans tasks
//!                                              ▼
//!  run loop ──poll(now)──▶ Scheduler ──▶ Uplink / BatteryMeasure / ServiceModeExit
//!        ▲                     │
//!        └── Idle::wait_until(next deadline)
//! ```
//!
//! ## Scheduling Pass
//!
//! [`Node::poll`] first drains the event queue, so a button press handled
//! in this pass can trigger an uplink in the same pass, then runs every due
//! task. It returns the next deadline for the idle point.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let mut node = Node::new(NodeConfig::default(), board)?;
//! let mut clock = SystemClock::new();
//! loop {
//!     let deadline = node.poll(clock.now());
//!     clock.wait_until(deadline);
//! }
//! ```

use crate::channels::{ChannelSnapshot, Channels};
use crate::config::NodeConfig;
use crate::console::{self, Command};
use crate::constants::{EVENT_QUEUE_CAPACITY, TASK_SLOTS};
use crate::errors::NodeResult;
use crate::events::NodeEvent;
use crate::mode::ServiceModeTimer;
use crate::orchestrator::{UplinkOrchestrator, UplinkState, UplinkStats};
use crate::queue::{EventQueue, QueueStats};
use crate::scheduler::{Plan, Scheduler};
use crate::time::Timestamp;
use crate::traits::{Board, EventHandler, Idle, LedMode, TimeSource};

/// Tasks the node schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Radio gate and report transmission
    Uplink,
    /// Kick off a battery voltage measurement
    BatteryMeasure,
    /// Leave service mode
    ServiceModeExit,
}

/// The node's task table
pub type TaskTable = Scheduler<Task, TASK_SLOTS>;

/// What handlers and task bodies may touch
pub struct Context<'a, B> {
    /// Tick of the current pass
    pub now: Timestamp,
    /// Task table, for planning
    pub scheduler: &'a mut TaskTable,
    /// Averaging windows
    pub channels: &'a mut Channels,
    /// Hardware collaborators
    pub board: &'a mut B,
}

/// A field sensor node
pub struct Node<B: Board> {
    config: NodeConfig,
    board: B,
    scheduler: TaskTable,
    channels: Channels,
    events: EventQueue<EVENT_QUEUE_CAPACITY>,
    uplink: UplinkOrchestrator,
    service: Option<ServiceModeTimer>,
}

impl<B: Board> Node<B> {
    /// Boot the node at tick 0
    ///
    /// Validates the configuration, signals boot on the indicator, registers
    /// the uplink and battery tasks and enters service mode.
    pub fn new(config: NodeConfig, mut board: B) -> NodeResult<Self> {
        config.validate()?;

        board.set_mode(LedMode::Off);
        board.pulse(config.boot_pulse_ms);

        let mut scheduler = TaskTable::new();
        let uplink_task = scheduler.register(Task::Uplink, config.first_report_delay_ms)?;
        let battery_task =
            scheduler.register(Task::BatteryMeasure, config.battery_first_measure_ms)?;
        let service = ServiceModeTimer::arm(&config, &mut scheduler, &mut board)?;

        log_info!(
            "Node up: report every {} ms, {} samples per report",
            config.report_interval_ms,
            config.window_len()
        );

        Ok(Self {
            channels: Channels::new(config.window_len()),
            uplink: UplinkOrchestrator::new(&config, uplink_task, battery_task),
            events: EventQueue::new(),
            config,
            board,
            scheduler,
            service,
        })
    }

    /// Queue a driver event for the next pass
    pub fn post(&mut self, event: impl Into<NodeEvent>) -> NodeResult<()> {
        let result = self.events.push(event.into());
        if let Err(_e) = &result {
            log_warn!("Event dropped: {}", _e);
        }
        result
    }

    /// Execute one console line and write the replies
    ///
    /// Answers `OK` after the command output, or `ERROR` when the line is not
    /// a command or a reply cannot be formatted.
    pub fn command(&mut self, line: &str) -> NodeResult<Command> {
        match line.parse::<Command>().and_then(|command| self.execute(command)) {
            Ok(command) => {
                self.board.write_line(console::OK);
                Ok(command)
            }
            Err(e) => {
                log_warn!("Console: {}", e);
                self.board.write_line(console::ERROR);
                Err(e)
            }
        }
    }

    fn execute(&mut self, command: Command) -> NodeResult<Command> {
        match command {
            Command::Ping => {}
            Command::Send => self.uplink.trigger(None, &mut self.scheduler),
            Command::Status => {
                let snapshot = self.channels.snapshot();
                for line in console::status_lines(&snapshot) {
                    self.board.write_line(&line?);
                }
            }
            Command::ListCommands => {
                for info in &console::COMMANDS {
                    self.board.write_line(&console::list_line(info)?);
                }
            }
            Command::Help => {
                for info in &console::COMMANDS {
                    self.board.write_line(&console::help_line(info)?);
                }
            }
        }
        Ok(command)
    }

    /// One scheduling pass at `now`
    ///
    /// Dispatches queued events, then runs due tasks. Returns the next
    /// deadline, or `None` when only an event can wake the node.
    pub fn poll(&mut self, now: Timestamp) -> Option<Timestamp> {
        self.scheduler.set_now(now);

        while let Some(event) = self.events.pop() {
            self.dispatch(event);
        }

        let Self {
            board,
            scheduler,
            channels,
            uplink,
            service,
            ..
        } = self;

        scheduler.run_pending(now, |_id, task, scheduler| {
            let mut cx = Context {
                now: scheduler.now(),
                scheduler,
                channels: &mut *channels,
                board: &mut *board,
            };

            match task {
                Task::Uplink => uplink.run_uplink(&mut cx),
                Task::BatteryMeasure => uplink.run_battery(&mut cx),
                Task::ServiceModeExit => match service.as_mut() {
                    Some(timer) => timer.fire(cx.board),
                    None => Plan::Unregister,
                },
            }
        });

        self.scheduler.next_deadline()
    }

    /// Drive the node from `clock` until it reaches `end`
    ///
    /// Used by simulations and host builds; the node firmware calls
    /// [`poll`](Self::poll) from its own main loop.
    pub fn run_until<C>(&mut self, clock: &mut C, end: Timestamp)
    where
        C: TimeSource + Idle,
    {
        loop {
            let now = clock.now();
            let deadline = self.poll(now);
            if now >= end {
                break;
            }
            clock.wait_until(Some(deadline.map_or(end, |d| d.min(end))));
        }
    }

    fn dispatch(&mut self, event: NodeEvent) {
        let mut cx = Context {
            now: self.scheduler.now(),
            scheduler: &mut self.scheduler,
            channels: &mut self.channels,
            board: &mut self.board,
        };
        self.uplink.handle(event, &mut cx);
    }

    /// Active configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Current channel averages
    pub fn snapshot(&self) -> ChannelSnapshot {
        self.channels.snapshot()
    }

    /// Averaging windows
    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    /// Uplink state
    pub fn uplink_state(&self) -> UplinkState {
        self.uplink.state()
    }

    /// Uplink orchestrator (header, last frame, task slots)
    pub fn uplink(&self) -> &UplinkOrchestrator {
        &self.uplink
    }

    /// Uplink counters
    pub fn uplink_stats(&self) -> &UplinkStats {
        self.uplink.stats()
    }

    /// Event queue counters
    pub fn queue_stats(&self) -> &QueueStats {
        self.events.stats()
    }

    /// Whether the node still samples at the service rate
    pub fn in_service_mode(&self) -> bool {
        self.service.as_ref().is_some_and(ServiceModeTimer::is_active)
    }

    /// Task table
    pub fn scheduler(&self) -> &TaskTable {
        &self.scheduler
    }

    /// Board
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Board, mutably (for test doubles and bring-up)
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}
