//! Cooperative Task Scheduler
//!
//! ## Overview
//!
//! Everything the node does after boot is a *task*: a small closed-set
//! payload (what to run, with which parameter) sitting in a numbered slot
//! together with its due-time. One thread of control runs due tasks to
//! completion, one at a time, earliest due-time first. There is no
//! preemption, so tasks never race and need no locks.
//!
//! ```text
//! slot │ task            │ due
//! ─────┼─────────────────┼────────────
//!   0  │ Uplink          │ 900 010 ms
//!   1  │ BatteryMeasure  │ (parked)
//!   2  │ ServiceModeExit │ 3 600 000 ms
//!   3  │ (free)          │
//! ```
//!
//! ## Re-planning
//!
//! A slot has at most one due-time. Every `plan_*` call *replaces* it; two
//! calls before the task runs leave only the second. Nothing repeats on its
//! own: a task that wants to run again says so in the [`Plan`] it returns,
//! which keeps every state machine transition visible at the call site and
//! testable without a live timer.
//!
//! ## Scheduling Pass
//!
//! [`Scheduler::run_pending`] runs every task that is due at the given tick.
//! A task runs at most once per pass: a task that plans itself "now" runs at
//! the start of the next pass, after pending hardware events have been
//! handled. When nothing is due, [`Scheduler::next_deadline`] tells the run
//! loop how long it may sleep.

use crate::errors::{NodeError, NodeResult};
use crate::time::Timestamp;

/// Slot identifier returned by [`Scheduler::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u8);

impl TaskId {
    /// Slot index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a task wants after it has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Stay registered without a due-time (unless re-planned during the run)
    Park,
    /// Run again in the next pass, ahead of everything else
    Now,
    /// Run again after this many milliseconds
    After(Timestamp),
    /// Run again at this tick
    At(Timestamp),
    /// Free the slot; the task never runs again
    Unregister,
}

/// Due-time used for `plan_now`: earlier than any real tick
const DUE_NOW: Timestamp = 0;

#[derive(Debug, Clone, Copy)]
struct Slot<T> {
    task: T,
    due: Option<Timestamp>,
}

/// Fixed-size task table with a cooperative run loop
///
/// `T` is the task payload (typically a small `Copy` enum), `N` the number
/// of slots.
///
/// ## Example
///
/// ```rust
/// use fieldlink_core::scheduler::{Plan, Scheduler};
///
/// let mut scheduler: Scheduler<&str, 4> = Scheduler::new();
/// let blink = scheduler.register("blink", 500).unwrap();
///
/// // Nothing due yet
/// assert_eq!(scheduler.run_pending(100, |_, _, _| Plan::Park), 0);
/// assert_eq!(scheduler.next_deadline(), Some(500));
///
/// // Runs once and re-arms itself
/// let ran = scheduler.run_pending(500, |id, task, _| {
///     assert_eq!((id, task), (blink, "blink"));
///     Plan::After(500)
/// });
/// assert_eq!(ran, 1);
/// assert_eq!(scheduler.due(blink), Some(1000));
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<T, const N: usize> {
    slots: [Option<Slot<T>>; N],
    current: Option<TaskId>,
    now: Timestamp,
}

impl<T: Copy, const N: usize> Scheduler<T, N> {
    /// Create an empty task table at tick 0
    pub const fn new() -> Self {
        Self {
            slots: [None; N],
            current: None,
            now: 0,
        }
    }

    /// Tick used for relative planning
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Advance the scheduler's notion of time
    ///
    /// Ticks never go backwards; an earlier value is ignored.
    pub fn set_now(&mut self, now: Timestamp) {
        self.now = self.now.max(now);
    }

    /// Put a task in the first free slot, due `initial_delay` from now
    pub fn register(&mut self, task: T, initial_delay: Timestamp) -> NodeResult<TaskId> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(NodeError::TaskTableFull { capacity: N })?;

        self.slots[index] = Some(Slot {
            task,
            due: Some(self.now.saturating_add(initial_delay)),
        });

        Ok(TaskId(index as u8))
    }

    /// Free a slot; the task will not run again even if it was due
    pub fn unregister(&mut self, id: TaskId) -> NodeResult<()> {
        self.slot_mut(id)?;
        self.slots[id.index()] = None;
        Ok(())
    }

    /// Make a task due immediately, ahead of anything merely due
    pub fn plan_now(&mut self, id: TaskId) -> NodeResult<()> {
        self.slot_mut(id)?.due = Some(DUE_NOW);
        Ok(())
    }

    /// Make a task due at an absolute tick
    pub fn plan_absolute(&mut self, id: TaskId, at: Timestamp) -> NodeResult<()> {
        self.slot_mut(id)?.due = Some(at);
        Ok(())
    }

    /// Make a task due `delta` milliseconds from now
    pub fn plan_relative(&mut self, id: TaskId, delta: Timestamp) -> NodeResult<()> {
        let at = self.now.saturating_add(delta);
        self.plan_absolute(id, at)
    }

    /// Remove a task's due-time without freeing its slot
    pub fn park(&mut self, id: TaskId) -> NodeResult<()> {
        self.slot_mut(id)?.due = None;
        Ok(())
    }

    /// Re-plan the running task to run again immediately
    pub fn plan_current_now(&mut self) -> NodeResult<()> {
        let id = self.current.ok_or(NodeError::NoCurrentTask)?;
        self.plan_now(id)
    }

    /// Re-plan the running task `delta` milliseconds from now
    pub fn plan_current_relative(&mut self, delta: Timestamp) -> NodeResult<()> {
        let id = self.current.ok_or(NodeError::NoCurrentTask)?;
        self.plan_relative(id, delta)
    }

    /// Task currently executing, if any
    pub fn current(&self) -> Option<TaskId> {
        self.current
    }

    /// Due-time of a task (`None` if parked or not registered)
    pub fn due(&self, id: TaskId) -> Option<Timestamp> {
        self.slots.get(id.index())?.as_ref()?.due
    }

    /// Payload of a registered task
    pub fn task(&self, id: TaskId) -> Option<T> {
        self.slots.get(id.index())?.as_ref().map(|slot| slot.task)
    }

    /// Check if a slot holds a task
    pub fn is_registered(&self, id: TaskId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no task is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Earliest due-time of any task
    ///
    /// This is how long the run loop may sleep. `None` means nothing is
    /// planned.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.slots.iter().flatten().filter_map(|slot| slot.due).min()
    }

    /// Run every task due at `now`, earliest due-time first
    ///
    /// `run` receives the slot id, the payload and the scheduler itself, so a
    /// task may re-plan other tasks. Its returned [`Plan`] is applied before
    /// the next task is chosen. Returns the number of tasks executed.
    pub fn run_pending<F>(&mut self, now: Timestamp, mut run: F) -> usize
    where
        F: FnMut(TaskId, T, &mut Self) -> Plan,
    {
        self.set_now(now);

        let mut ran = [false; N];
        let mut count = 0;

        while let Some(id) = self.next_due(&ran) {
            ran[id.index()] = true;

            let Some(task) = self.begin(id) else { continue };
            let plan = run(id, task, self);
            self.finish(id, plan);
            count += 1;
        }

        count
    }

    /// Earliest due slot (ties go to the lowest index) not yet run this pass
    fn next_due(&self, ran: &[bool; N]) -> Option<TaskId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(index, _)| !ran[*index])
            .filter_map(|(index, slot)| {
                let due = slot.as_ref()?.due?;
                (due <= self.now).then_some((due, index))
            })
            .min()
            .map(|(_, index)| TaskId(index as u8))
    }

    /// Clear the due-time and mark the task as current
    fn begin(&mut self, id: TaskId) -> Option<T> {
        let slot = self.slots[id.index()].as_mut()?;
        slot.due = None;
        self.current = Some(id);
        Some(slot.task)
    }

    /// Apply the task's plan and leave the task context
    fn finish(&mut self, id: TaskId, plan: Plan) {
        self.current = None;

        let now = self.now;
        let Some(slot) = self.slots[id.index()].as_mut() else {
            // Unregistered while running
            return;
        };

        match plan {
            Plan::Park => {}
            Plan::Now => slot.due = Some(DUE_NOW),
            Plan::After(delta) => slot.due = Some(now.saturating_add(delta)),
            Plan::At(at) => slot.due = Some(at),
            Plan::Unregister => self.slots[id.index()] = None,
        }
    }

    fn slot_mut(&mut self, id: TaskId) -> NodeResult<&mut Slot<T>> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(NodeError::UnknownTask { id: id.0 })
    }
}

impl<T: Copy, const N: usize> Default for Scheduler<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
