//! Touch contact classification for Horizon applications.
//!
//! This crate turns a raw stream of per-contact pointer events — started,
//! moved, ended, each tagged with a contact identifier — into higher-level
//! actions:
//!
//! - **Started / Moved / Ended**: the raw phases, passed through, with each
//!   `Moved` carrying the positional and temporal delta against the
//!   contact's previous sample
//! - **Pressed**: the contact lifted quickly enough to count as a tap
//! - **Long-pressed**: the contact stayed down, unmoved, long enough to
//!   count as a sustained hold
//!
//! Any number of contacts may be active concurrently; each is tracked
//! independently by its identifier, and the press/long-press timing races
//! of one contact never interfere with another's.
//!
//! The engine is a library-level component embedded by a host event
//! dispatcher: it owns no event loop and no threads, and it tells the host
//! via [`ContactClassifier::next_deadline`] when it next needs the clock
//! advanced.
//!
//! # Example
//!
//! ```
//! use horizon_touch::{ContactAction, ContactClassifier, Point, TouchPhase, TouchSample};
//!
//! let mut classifier = ContactClassifier::new();
//!
//! // A contact touches down and holds still.
//! let down = TouchSample::new(1, Point::new(10.0, 10.0), Point::new(10.0, 10.0), 0.0);
//! classifier.process(TouchPhase::Started, down)?;
//!
//! // Nothing else happens; the host advances the clock past the
//! // long-press delay.
//! classifier.advance(750.0);
//!
//! assert!(matches!(classifier.sink()[0], ContactAction::Started { .. }));
//! assert!(matches!(classifier.sink()[1], ContactAction::LongPressed { .. }));
//! # Ok::<(), horizon_touch::Error>(())
//! ```

mod classifier;
mod error;
mod event;
pub mod logging;
mod session;
mod timer;

pub use classifier::{
    ActionSink, ClassifierConfig, ContactClassifier, DEFAULT_LONG_PRESS_DELAY_MS,
    DEFAULT_PRESS_TIMEOUT_MS, SharedContactClassifier,
};
pub use error::{Error, Result};
pub use event::{ContactAction, ContactId, MoveDelta, Point, TouchPhase, TouchSample};
