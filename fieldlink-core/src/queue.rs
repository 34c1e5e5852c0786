//! Bounded Inbound Event Queue
//!
//! ## Overview
//!
//! Hardware notifications are not handled where they arise. Drivers post a
//! [`NodeEvent`] here and return; the run loop drains the queue at the start
//! of each scheduling pass, so every handler runs on the single thread of
//! control and never in interrupt context.
//!
//! ```text
//! Producers (driver callbacks)          Consumer (run loop)
//!      ↓                                      ↑
//!   push() ────→ [ e0 | e1 | e2 | .. ] ────→ pop()
//!      ↓
//!   full → dropped, counted, Err
//! ```
//!
//! ## Capacity
//!
//! The queue is a `heapless::Deque`, sized at compile time. A full queue
//! rejects the newest event rather than overwriting the oldest: a dropped
//! sensor sample only thins one averaging window, while losing an already
//! queued radio event could leave the status LED in the wrong state.
//!
//! ## Statistics
//!
//! [`QueueStats`] tracks pushes, pops, drops and the deepest backlog seen,
//! which is the number to look at when sizing
//! [`EVENT_QUEUE_CAPACITY`](crate::constants::EVENT_QUEUE_CAPACITY).

use heapless::Deque;

use crate::errors::{NodeError, NodeResult};
use crate::events::NodeEvent;

/// Queue health counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Total events accepted
    pub pushed: u32,
    /// Total events handed to the run loop
    pub popped: u32,
    /// Events rejected because the queue was full
    pub dropped: u32,
    /// Maximum queue depth seen
    pub max_depth: u32,
}

/// Bounded FIFO of hardware events
///
/// ## Example
///
/// ```rust
/// use fieldlink_core::queue::EventQueue;
/// use fieldlink_core::events::{NodeEvent, ButtonEvent};
///
/// let mut queue: EventQueue<4> = EventQueue::new();
/// queue.push(NodeEvent::Button(ButtonEvent::Click)).unwrap();
///
/// while let Some(event) = queue.pop() {
///     // dispatch event
///     # let _ = event;
/// }
/// ```
pub struct EventQueue<const N: usize> {
    events: Deque<NodeEvent, N>,
    stats: QueueStats,
}

impl<const N: usize> EventQueue<N> {
    /// Create new empty queue
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
            stats: QueueStats {
                pushed: 0,
                popped: 0,
                dropped: 0,
                max_depth: 0,
            },
        }
    }

    /// Append an event
    ///
    /// Fails with [`NodeError::EventQueueFull`] when the queue is at capacity;
    /// the event is dropped and counted.
    pub fn push(&mut self, event: NodeEvent) -> NodeResult<()> {
        if self.events.push_back(event).is_err() {
            self.stats.dropped = self.stats.dropped.saturating_add(1);
            return Err(NodeError::EventQueueFull { capacity: N });
        }

        self.stats.pushed = self.stats.pushed.saturating_add(1);
        let depth = self.events.len() as u32;
        if depth > self.stats.max_depth {
            self.stats.max_depth = depth;
        }

        Ok(())
    }

    /// Take the oldest event
    pub fn pop(&mut self) -> Option<NodeEvent> {
        let event = self.events.pop_front()?;
        self.stats.popped = self.stats.popped.saturating_add(1);
        Some(event)
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Check if queue is full
    pub fn is_full(&self) -> bool {
        self.events.is_full()
    }

    /// Queue statistics
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    /// Discard all queued events (statistics are kept)
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ButtonEvent, RadioEvent};

    #[test]
    fn queue_basic() {
        let mut queue = EventQueue::<4>::new();

        queue.push(NodeEvent::battery_voltage(3.1)).unwrap();
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.pop(), Some(NodeEvent::battery_voltage(3.1)));
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = EventQueue::<4>::new();
        queue.push(RadioEvent::SendStarted.into()).unwrap();
        queue.push(RadioEvent::SendDone.into()).unwrap();

        assert_eq!(queue.pop(), Some(NodeEvent::Radio(RadioEvent::SendStarted)));
        assert_eq!(queue.pop(), Some(NodeEvent::Radio(RadioEvent::SendDone)));
    }

    #[test]
    fn queue_full_drops_newest() {
        let mut queue = EventQueue::<2>::new();
        queue.push(ButtonEvent::Click.into()).unwrap();
        queue.push(ButtonEvent::Hold.into()).unwrap();
        assert!(queue.is_full());

        let err = queue.push(ButtonEvent::Press.into()).unwrap_err();
        assert_eq!(err, NodeError::EventQueueFull { capacity: 2 });

        let stats = queue.stats();
        assert_eq!(stats.pushed, 2);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.max_depth, 2);

        // Oldest events survive
        assert_eq!(queue.pop(), Some(NodeEvent::Button(ButtonEvent::Click)));
        assert_eq!(queue.pop(), Some(NodeEvent::Button(ButtonEvent::Hold)));
        assert_eq!(queue.stats().popped, 2);
    }
}
