//! One-shot timers on the engine's logical clock.
//!
//! The classifier does not sleep or spawn threads; its two timing races are
//! deadlines on the same millisecond clock that sample timestamps live on.
//! [`TimerQueue`] holds those deadlines and hands back the payload of each
//! timer that has come due whenever the clock advances.
//!
//! Cancellation is synchronous: `cancel` removes the timer's registration
//! immediately, and a heap entry whose registration is gone is discarded
//! rather than fired. A canceled timer can therefore never fire late, even
//! though its entry may still be sitting in the heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a scheduled timer.
    pub(crate) struct TimerId;
}

/// Registration for a pending timer.
#[derive(Debug)]
struct TimerData<T> {
    payload: T,
}

/// An entry in the timer heap (min-ordered by deadline).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    deadline: f64,
    /// Schedule order, so equal deadlines fire first-scheduled-first.
    seq: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .deadline
            .total_cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending one-shot timers, each carrying a payload describing what it
/// resolves.
#[derive(Debug)]
pub(crate) struct TimerQueue<T> {
    /// Registrations for timers that have neither fired nor been canceled.
    timers: SlotMap<TimerId, TimerData<T>>,
    /// Heap of (possibly stale) fire entries, earliest deadline first.
    queue: BinaryHeap<TimerQueueEntry>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedules a one-shot timer at `deadline`.
    ///
    /// Returns the timer id that can be used to cancel it.
    pub fn schedule(&mut self, deadline: f64, payload: T) -> TimerId {
        let id = self.timers.insert(TimerData { payload });
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(TimerQueueEntry { id, deadline, seq });
        tracing::trace!(target: "horizon_touch::timer", ?id, deadline, "timer scheduled");
        id
    }

    /// Cancels a pending timer.
    ///
    /// Returns `true` if the timer was still pending. The stale heap entry is
    /// discarded lazily the next time it reaches the front.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let canceled = self.timers.remove(id).is_some();
        if canceled {
            tracing::trace!(target: "horizon_touch::timer", ?id, "timer canceled");
        }
        canceled
    }

    /// Pops the earliest timer with `deadline <= now`, if any.
    ///
    /// Call in a loop to drain everything due. Heap entries whose
    /// registration has been canceled are skipped.
    pub fn pop_due(&mut self, now: f64) -> Option<(TimerId, T)> {
        while let Some(entry) = self.queue.peek() {
            if entry.deadline > now {
                return None;
            }

            let entry = self.queue.pop().expect("peeked entry is present");
            let Some(data) = self.timers.remove(entry.id) else {
                // Canceled after scheduling; the registration is gone.
                continue;
            };

            tracing::trace!(target: "horizon_touch::timer", id = ?entry.id, "timer fired");
            return Some((entry.id, data.payload));
        }
        None
    }

    /// The earliest pending deadline, if any.
    ///
    /// Stale entries at the front of the heap are dropped on the way.
    pub fn next_deadline(&mut self) -> Option<f64> {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                return Some(entry.deadline);
            }
            self.queue.pop();
        }
        None
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// Number of timers that have neither fired nor been canceled.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(30.0, "c");
        queue.schedule(10.0, "a");
        queue.schedule(20.0, "b");

        assert_eq!(queue.pop_due(50.0).map(|(_, p)| p), Some("a"));
        assert_eq!(queue.pop_due(50.0).map(|(_, p)| p), Some("b"));
        assert_eq!(queue.pop_due(50.0).map(|(_, p)| p), Some("c"));
        assert_eq!(queue.pop_due(50.0), None);
    }

    #[test]
    fn test_not_due_until_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(100.0, "late");

        assert_eq!(queue.pop_due(99.9), None);
        assert!(queue.pop_due(100.0).is_some());
    }

    #[test]
    fn test_equal_deadlines_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(10.0, "first");
        queue.schedule(10.0, "second");

        assert_eq!(queue.pop_due(10.0).map(|(_, p)| p), Some("first"));
        assert_eq!(queue.pop_due(10.0).map(|(_, p)| p), Some("second"));
    }

    #[test]
    fn test_canceled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let keep = queue.schedule(10.0, "keep");
        let drop = queue.schedule(5.0, "drop");

        assert!(queue.cancel(drop));
        assert!(!queue.cancel(drop));

        assert_eq!(queue.pop_due(50.0).map(|(id, p)| (id == keep, p)), Some((true, "keep")));
        assert_eq!(queue.pop_due(50.0), None);
    }

    #[test]
    fn test_next_deadline_skips_canceled_entries() {
        let mut queue = TimerQueue::new();
        let early = queue.schedule(5.0, "early");
        queue.schedule(25.0, "late");

        assert_eq!(queue.next_deadline(), Some(5.0));
        queue.cancel(early);
        assert_eq!(queue.next_deadline(), Some(25.0));
        assert_eq!(queue.active_count(), 1);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut queue = TimerQueue::new();
        queue.schedule(1.0, "a");
        queue.schedule(2.0, "b");

        queue.clear();
        assert_eq!(queue.active_count(), 0);
        assert_eq!(queue.next_deadline(), None);
        assert_eq!(queue.pop_due(10.0), None);
    }
}
