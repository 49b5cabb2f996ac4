//! Per-contact session records.
//!
//! A [`ContactSession`] exists exactly as long as its contact is active: it
//! is created on `Started`, updated by every later sample for the same id,
//! and destroyed on `Ended` or engine teardown. The session owns the
//! contact's two race handles and the previous-sample state the move-delta
//! composer diffs against — so when a host reuses an identifier for a new
//! contact, nothing from the old contact can leak into the new one.

use crate::event::{MoveDelta, TouchPhase, TouchSample};
use crate::timer::TimerId;

/// Book-keeping for one active contact.
#[derive(Debug)]
pub(crate) struct ContactSession {
    /// The sample that opened the session; a long-press is emitted with it.
    start: TouchSample,
    /// Phase of the most recent sample observed for this contact.
    last_phase: TouchPhase,
    /// Most recent sample; move deltas diff against it.
    last_sample: TouchSample,
    /// Pending press race. `None` once resolved either way.
    press_timer: Option<TimerId>,
    /// Pending long-press race. `None` once fired or canceled.
    long_press_timer: Option<TimerId>,
}

impl ContactSession {
    /// Opens a session from its `Started` sample and freshly-armed races.
    pub fn new(start: TouchSample, press_timer: TimerId, long_press_timer: TimerId) -> Self {
        Self {
            start,
            last_phase: TouchPhase::Started,
            last_sample: start,
            press_timer: Some(press_timer),
            long_press_timer: Some(long_press_timer),
        }
    }

    /// Records `sample` as the contact's newest move and returns the delta
    /// against the previous sample.
    ///
    /// The first move of a session diffs against the `Started` sample, so
    /// the delta measures displacement from the touch-down point. Returns
    /// `None` if the recorded previous phase is `Ended` — a stale pair that
    /// cannot occur while sessions die with their `Ended`, kept as a guard.
    pub fn observe_move(&mut self, sample: TouchSample) -> Option<MoveDelta> {
        let delta = if self.last_phase == TouchPhase::Ended {
            None
        } else {
            Some(sample.delta_from(&self.last_sample))
        };
        self.last_phase = TouchPhase::Moved;
        self.last_sample = sample;
        delta
    }

    /// Takes the pending long-press race handle, leaving the race resolved.
    pub fn take_long_press_timer(&mut self) -> Option<TimerId> {
        self.long_press_timer.take()
    }

    /// Marks the long-press race as fired and returns the `Started` sample
    /// the emission carries.
    pub fn long_press_fired(&mut self) -> TouchSample {
        self.long_press_timer = None;
        self.start
    }

    /// Marks the press race as resolved without a press (window elapsed).
    pub fn press_window_elapsed(&mut self) {
        self.press_timer = None;
    }

    /// Tears the session down, yielding whatever race handles are still
    /// pending so the caller can cancel them.
    pub fn into_race_timers(self) -> (Option<TimerId>, Option<TimerId>) {
        (self.press_timer, self.long_press_timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Point;
    use crate::timer::TimerQueue;

    fn make_sample(x: f64, y: f64, timestamp: f64) -> TouchSample {
        TouchSample::new(1, Point::new(x, y), Point::new(x, y), timestamp)
    }

    fn make_session(start: TouchSample) -> ContactSession {
        let mut timers = TimerQueue::new();
        let press = timers.schedule(start.timestamp + 200.0, ());
        let long_press = timers.schedule(start.timestamp + 700.0, ());
        ContactSession::new(start, press, long_press)
    }

    #[test]
    fn test_first_move_diffs_against_start() {
        let mut session = make_session(make_sample(0.0, 0.0, 0.0));

        let delta = session
            .observe_move(make_sample(10.0, 5.0, 16.0))
            .expect("move has a previous sample");
        assert_eq!(delta.local, Point::new(10.0, 5.0));
        assert_eq!(delta.elapsed, 16.0);
    }

    #[test]
    fn test_consecutive_moves_diff_pairwise() {
        let mut session = make_session(make_sample(0.0, 0.0, 0.0));

        session.observe_move(make_sample(10.0, 5.0, 16.0));
        let delta = session
            .observe_move(make_sample(12.0, 9.0, 32.0))
            .expect("move has a previous sample");
        assert_eq!(delta.local, Point::new(2.0, 4.0));
        assert_eq!(delta.elapsed, 16.0);
    }

    #[test]
    fn test_race_handles_are_single_shot() {
        let mut session = make_session(make_sample(0.0, 0.0, 0.0));

        assert!(session.take_long_press_timer().is_some());
        assert!(session.take_long_press_timer().is_none());

        session.press_window_elapsed();
        let (press, long_press) = session.into_race_timers();
        assert!(press.is_none());
        assert!(long_press.is_none());
    }
}
