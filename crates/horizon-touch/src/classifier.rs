//! Contact classification from raw touch samples.
//!
//! This module provides the engine's public entry point,
//! [`ContactClassifier`]: feed it raw start/move/end samples and it appends
//! classified [`ContactAction`] values to an output sink, resolving the
//! press and long-press races on a logical clock.
//!
//! # Usage
//!
//! ```
//! use horizon_touch::{ContactClassifier, Point, TouchPhase, TouchSample};
//!
//! let mut classifier = ContactClassifier::new();
//!
//! let down = TouchSample::new(1, Point::new(4.0, 4.0), Point::new(4.0, 4.0), 0.0);
//! let up = TouchSample::new(1, Point::new(4.0, 4.0), Point::new(4.0, 4.0), 50.0);
//! classifier.process(TouchPhase::Started, down)?;
//! classifier.process(TouchPhase::Ended, up)?;
//!
//! // Started, Ended, and — because the contact lifted inside the press
//! // window — Pressed.
//! assert_eq!(classifier.sink().len(), 3);
//! # Ok::<(), horizon_touch::Error>(())
//! ```
//!
//! # Time
//!
//! The classifier never sleeps. Its clock is the millisecond domain of
//! sample timestamps: `process` advances it to each sample's timestamp, and
//! hosts with idle contacts call [`ContactClassifier::advance`] (for
//! example from a wake-up scheduled at
//! [`ContactClassifier::next_deadline`]) so a long-press can fire without
//! any further input. Whenever the clock advances, races whose deadline has
//! been reached resolve *before* the sample that advanced it is
//! interpreted; this is what makes an end at the exact press deadline too
//! late to press, and a move at the exact long-press deadline too late to
//! cancel.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::event::{ContactAction, ContactId, TouchPhase, TouchSample};
use crate::session::ContactSession;
use crate::timer::TimerQueue;

/// Default press window in milliseconds.
///
/// An `Ended` must arrive strictly within this window after `Started` for
/// the contact to classify as a press.
pub const DEFAULT_PRESS_TIMEOUT_MS: f64 = 200.0;

/// Default long-press delay in milliseconds.
///
/// A contact must stay down, with no move or end, for this long to classify
/// as a long-press.
pub const DEFAULT_LONG_PRESS_DELAY_MS: f64 = 700.0;

/// Append-only collector for classified actions.
///
/// The classifier only ever appends; it never reads the sink back, so any
/// ordered collector works.
pub trait ActionSink {
    /// Appends one classified action.
    fn push(&mut self, action: ContactAction);
}

impl ActionSink for Vec<ContactAction> {
    fn push(&mut self, action: ContactAction) {
        Vec::push(self, action);
    }
}

/// Configuration for the classifier's two timing races.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Press window in milliseconds. Defaults to
    /// [`DEFAULT_PRESS_TIMEOUT_MS`].
    pub press_timeout_ms: f64,
    /// Long-press delay in milliseconds. Defaults to
    /// [`DEFAULT_LONG_PRESS_DELAY_MS`].
    pub long_press_delay_ms: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            press_timeout_ms: DEFAULT_PRESS_TIMEOUT_MS,
            long_press_delay_ms: DEFAULT_LONG_PRESS_DELAY_MS,
        }
    }
}

impl ClassifierConfig {
    /// Both windows must be finite and strictly positive.
    fn validate(&self) -> Result<()> {
        if !(self.press_timeout_ms.is_finite() && self.press_timeout_ms > 0.0) {
            return Err(Error::InvalidConfig {
                field: "press_timeout_ms",
            });
        }
        if !(self.long_press_delay_ms.is_finite() && self.long_press_delay_ms > 0.0) {
            return Err(Error::InvalidConfig {
                field: "long_press_delay_ms",
            });
        }
        Ok(())
    }
}

/// What a fired timer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RaceTask {
    /// The press window elapsed without an end; the press race resolves
    /// empty.
    PressWindowElapsed { contact: ContactId },
    /// The long-press delay elapsed uninterrupted; emit a long-press.
    LongPressDue { contact: ContactId },
}

/// Classifies raw touch samples into [`ContactAction`] values.
///
/// Each active contact is tracked independently under its [`ContactId`]; an
/// arbitrary number may be active at once, and the races of one contact
/// never affect another's. For a single contact, actions are appended in
/// event arrival order, except `Pressed`/`LongPressed` which are appended
/// at the moment their race resolves.
#[derive(Debug)]
pub struct ContactClassifier<S: ActionSink = Vec<ContactAction>> {
    config: ClassifierConfig,
    /// One session per currently-active contact.
    sessions: HashMap<ContactId, ContactSession>,
    timers: TimerQueue<RaceTask>,
    sink: S,
    /// Logical clock in sample-timestamp milliseconds. Never moves backward.
    clock: f64,
    closed: bool,
}

impl ContactClassifier<Vec<ContactAction>> {
    /// Creates a classifier with default configuration, collecting actions
    /// into a `Vec`.
    pub fn new() -> Self {
        Self::build(ClassifierConfig::default(), Vec::new())
    }

    /// Creates a classifier with the given configuration, collecting
    /// actions into a `Vec`.
    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        Self::with_sink(config, Vec::new())
    }
}

impl Default for ContactClassifier<Vec<ContactAction>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ActionSink> ContactClassifier<S> {
    /// Creates a classifier that appends into `sink`.
    pub fn with_sink(config: ClassifierConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, sink))
    }

    fn build(config: ClassifierConfig, sink: S) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
            timers: TimerQueue::new(),
            sink,
            clock: f64::NEG_INFINITY,
            closed: false,
        }
    }

    /// Feeds one raw sample of the given phase into the engine.
    ///
    /// Advances the logical clock to `sample.timestamp` (races due by then
    /// resolve first), then routes by phase. Never blocks; appends zero or
    /// more actions to the sink. Phases form a closed enum, so there is no
    /// unknown-kind input to tolerate.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedSample`] if any numeric field of `sample` is
    /// non-finite (nothing is emitted and no state changes), or
    /// [`Error::Closed`] if [`close`](Self::close) has been called.
    pub fn process(&mut self, phase: TouchPhase, sample: TouchSample) -> Result<()> {
        if self.closed {
            tracing::debug!(
                target: "horizon_touch::classifier",
                contact = sample.id,
                "sample rejected: classifier is closed"
            );
            return Err(Error::Closed);
        }
        sample.validate()?;

        self.run_due_timers(sample.timestamp);
        match phase {
            TouchPhase::Started => self.on_started(sample),
            TouchPhase::Moved => self.on_moved(sample),
            TouchPhase::Ended => self.on_ended(sample),
        }
        Ok(())
    }

    /// Advances the logical clock to `now`, resolving every race whose
    /// deadline has been reached.
    ///
    /// A no-op once closed, and when `now` is behind the clock.
    pub fn advance(&mut self, now: f64) {
        if self.closed {
            return;
        }
        self.run_due_timers(now);
    }

    /// The earliest pending race deadline, if any.
    ///
    /// Hosts can schedule a single wake-up at this instant and call
    /// [`advance`](Self::advance) from it.
    pub fn next_deadline(&mut self) -> Option<f64> {
        self.timers.next_deadline()
    }

    /// Cancels every pending race and releases all session state.
    ///
    /// Idempotent. After this returns, no further action is ever appended —
    /// advancing the clock past old deadlines fires nothing — and `process`
    /// rejects input with [`Error::Closed`].
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.timers.clear();
        self.sessions.clear();
        tracing::debug!(target: "horizon_touch::classifier", "classifier closed");
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of currently-active contacts.
    pub fn active_contact_count(&self) -> usize {
        self.sessions.len()
    }

    /// Iterator over the currently-active contact ids.
    pub fn active_contact_ids(&self) -> impl Iterator<Item = ContactId> + '_ {
        self.sessions.keys().copied()
    }

    /// The output sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the output sink (for example to drain consumed
    /// actions).
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the classifier, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Advances the clock and drains every due timer, earliest first.
    fn run_due_timers(&mut self, now: f64) {
        if now > self.clock {
            self.clock = now;
        }
        while let Some((_, task)) = self.timers.pop_due(self.clock) {
            match task {
                RaceTask::PressWindowElapsed { contact } => {
                    if let Some(session) = self.sessions.get_mut(&contact) {
                        session.press_window_elapsed();
                    }
                }
                RaceTask::LongPressDue { contact } => {
                    if let Some(session) = self.sessions.get_mut(&contact) {
                        let start = session.long_press_fired();
                        tracing::trace!(
                            target: "horizon_touch::classifier",
                            contact,
                            "long-press resolved"
                        );
                        self.sink.push(ContactAction::LongPressed { sample: start });
                    }
                }
            }
        }
    }

    fn on_started(&mut self, sample: TouchSample) {
        let contact = sample.id;
        if let Some(stale) = self.sessions.remove(&contact) {
            // A second Started without an Ended; drop the stale races rather
            // than leak them alongside the new ones.
            tracing::debug!(
                target: "horizon_touch::classifier",
                contact,
                "restarting contact with an open session"
            );
            self.cancel_races(stale);
        }

        self.sink.push(ContactAction::Started { sample });

        let now = self.clock;
        let press = self.timers.schedule(
            now + self.config.press_timeout_ms,
            RaceTask::PressWindowElapsed { contact },
        );
        let long_press = self.timers.schedule(
            now + self.config.long_press_delay_ms,
            RaceTask::LongPressDue { contact },
        );
        self.sessions
            .insert(contact, ContactSession::new(sample, press, long_press));
    }

    fn on_moved(&mut self, sample: TouchSample) {
        match self.sessions.get_mut(&sample.id) {
            Some(session) => {
                let delta = session.observe_move(sample);
                self.sink.push(ContactAction::Moved { sample, delta });
                // A move interrupts the long-press race, never the press race.
                if let Some(timer) = session.take_long_press_timer() {
                    self.timers.cancel(timer);
                }
            }
            None => {
                // No session for this id; classify the move bare rather than
                // drop out-of-order input.
                self.sink.push(ContactAction::Moved {
                    sample,
                    delta: None,
                });
            }
        }
    }

    fn on_ended(&mut self, sample: TouchSample) {
        self.sink.push(ContactAction::Ended { sample });

        let Some(session) = self.sessions.remove(&sample.id) else {
            return;
        };
        let (press, long_press) = session.into_race_timers();
        if let Some(timer) = press {
            // Still pending means the window had not elapsed when the clock
            // reached this sample: the end wins the press race.
            self.timers.cancel(timer);
            self.sink.push(ContactAction::Pressed { sample });
        }
        if let Some(timer) = long_press {
            self.timers.cancel(timer);
        }
    }

    fn cancel_races(&mut self, session: ContactSession) {
        let (press, long_press) = session.into_race_timers();
        if let Some(timer) = press {
            self.timers.cancel(timer);
        }
        if let Some(timer) = long_press {
            self.timers.cancel(timer);
        }
    }
}

/// A thread-safe wrapper around [`ContactClassifier`].
///
/// For hosts that feed samples from an event-loop callback while a timer
/// callback drives [`advance`](ContactClassifier::advance) — the engine
/// itself stays single-threaded behind the lock.
pub struct SharedContactClassifier<S: ActionSink = Vec<ContactAction>> {
    inner: Mutex<ContactClassifier<S>>,
}

impl SharedContactClassifier<Vec<ContactAction>> {
    /// Creates a shared classifier with default configuration.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ContactClassifier::new()),
        }
    }
}

impl Default for SharedContactClassifier<Vec<ContactAction>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ActionSink> SharedContactClassifier<S> {
    /// Creates a shared classifier that appends into `sink`.
    pub fn with_sink(config: ClassifierConfig, sink: S) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(ContactClassifier::with_sink(config, sink)?),
        })
    }

    /// See [`ContactClassifier::process`].
    pub fn process(&self, phase: TouchPhase, sample: TouchSample) -> Result<()> {
        self.inner.lock().process(phase, sample)
    }

    /// See [`ContactClassifier::advance`].
    pub fn advance(&self, now: f64) {
        self.inner.lock().advance(now);
    }

    /// See [`ContactClassifier::next_deadline`].
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner.lock().next_deadline()
    }

    /// See [`ContactClassifier::close`].
    pub fn close(&self) {
        self.inner.lock().close();
    }

    /// See [`ContactClassifier::is_closed`].
    pub fn is_closed(&self) -> bool {
        self.inner.lock().is_closed()
    }

    /// See [`ContactClassifier::active_contact_count`].
    pub fn active_contact_count(&self) -> usize {
        self.inner.lock().active_contact_count()
    }

    /// Locks the classifier for direct access (for example to read the
    /// sink).
    pub fn lock(&self) -> parking_lot::MutexGuard<'_, ContactClassifier<S>> {
        self.inner.lock()
    }
}
