//! Raw touch samples and the classified actions produced from them.
//!
//! A host event dispatcher reports low-level contact activity as
//! [`TouchSample`] values tagged with a [`TouchPhase`]. The classifier turns
//! those into [`ContactAction`] values: the three raw phases passed through,
//! plus presses and long-presses resolved by the timing races.

use crate::error::{Error, Result};

/// Identifies one physical contact for the duration of its started→ended
/// lifetime.
///
/// Identifiers are only unique among currently-active contacts; hosts may
/// reuse an id for a new contact once the previous one has ended.
pub type ContactId = u64;

/// A 2D position, or a displacement between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point {
    /// The origin / zero displacement.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point from its components.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The phase of a raw touch sample, supplied by the host alongside the
/// sample itself (never inferred by the engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The contact touched down.
    Started,
    /// The contact moved while down.
    Moved,
    /// The contact lifted.
    Ended,
}

/// One raw touch sample as reported by the host event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    /// The contact this sample belongs to.
    pub id: ContactId,
    /// Position relative to the touched element.
    pub local: Point,
    /// Position relative to the page.
    pub page: Point,
    /// Monotonic milliseconds on the host's event clock.
    pub timestamp: f64,
}

impl TouchSample {
    /// Creates a sample from its parts.
    pub fn new(id: ContactId, local: Point, page: Point, timestamp: f64) -> Self {
        Self {
            id,
            local,
            page,
            timestamp,
        }
    }

    /// Field-wise difference of this sample against an earlier one of the
    /// same contact.
    pub fn delta_from(&self, earlier: &TouchSample) -> MoveDelta {
        MoveDelta {
            local: Point::new(
                self.local.x - earlier.local.x,
                self.local.y - earlier.local.y,
            ),
            page: Point::new(self.page.x - earlier.page.x, self.page.y - earlier.page.y),
            elapsed: self.timestamp - earlier.timestamp,
        }
    }

    /// Rejects samples with NaN or infinite fields before they can reach
    /// session or race state.
    pub(crate) fn validate(&self) -> Result<()> {
        let fields = [
            ("local.x", self.local.x),
            ("local.y", self.local.y),
            ("page.x", self.page.x),
            ("page.y", self.page.y),
            ("timestamp", self.timestamp),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(Error::MalformedSample { field });
            }
        }
        Ok(())
    }
}

/// Field-wise difference between two consecutive samples of one contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDelta {
    /// Displacement in element coordinates.
    pub local: Point,
    /// Displacement in page coordinates.
    pub page: Point,
    /// Elapsed milliseconds between the two samples.
    pub elapsed: f64,
}

/// A classified action appended to the output sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactAction {
    /// A contact touched down.
    Started {
        /// The raw sample that opened the contact.
        sample: TouchSample,
    },
    /// A contact moved.
    Moved {
        /// The raw sample.
        sample: TouchSample,
        /// Difference against the contact's previous sample. `None` when no
        /// live session provided a previous sample to diff against.
        delta: Option<MoveDelta>,
    },
    /// A contact lifted.
    Ended {
        /// The raw sample that closed the contact.
        sample: TouchSample,
    },
    /// The contact lifted quickly enough after touching down to count as a
    /// tap. Carries the `Ended` sample that won the press race.
    Pressed {
        /// The raw sample.
        sample: TouchSample,
    },
    /// The contact stayed down, unmoved, long enough to count as a sustained
    /// hold. Carries the original `Started` sample.
    LongPressed {
        /// The raw sample.
        sample: TouchSample,
    },
}

impl ContactAction {
    /// The contact this action belongs to.
    pub fn contact(&self) -> ContactId {
        self.sample().id
    }

    /// The raw sample the action was classified from.
    pub fn sample(&self) -> &TouchSample {
        match self {
            Self::Started { sample }
            | Self::Moved { sample, .. }
            | Self::Ended { sample }
            | Self::Pressed { sample }
            | Self::LongPressed { sample } => sample,
        }
    }

    /// The move delta, for `Moved` actions that have one.
    pub fn delta(&self) -> Option<&MoveDelta> {
        match self {
            Self::Moved {
                delta: Some(delta), ..
            } => Some(delta),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sample(id: ContactId, x: f64, y: f64, timestamp: f64) -> TouchSample {
        TouchSample::new(id, Point::new(x, y), Point::new(x, y), timestamp)
    }

    #[test]
    fn test_delta_from_earlier_sample() {
        let start = make_sample(1, 0.0, 0.0, 0.0);
        let moved = make_sample(1, 10.0, 5.0, 16.0);

        let delta = moved.delta_from(&start);
        assert_eq!(delta.local, Point::new(10.0, 5.0));
        assert_eq!(delta.page, Point::new(10.0, 5.0));
        assert_eq!(delta.elapsed, 16.0);
    }

    #[test]
    fn test_delta_can_be_negative() {
        let a = make_sample(1, 20.0, 8.0, 100.0);
        let b = make_sample(1, 12.0, 10.0, 116.0);

        let delta = b.delta_from(&a);
        assert_eq!(delta.local, Point::new(-8.0, 2.0));
        assert_eq!(delta.elapsed, 16.0);
    }

    #[test]
    fn test_validate_accepts_finite_sample() {
        assert!(make_sample(1, 3.5, -2.0, 42.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_fields() {
        let mut sample = make_sample(1, 0.0, 0.0, 0.0);
        sample.local.y = f64::NAN;
        assert_eq!(
            sample.validate(),
            Err(Error::MalformedSample { field: "local.y" })
        );

        let mut sample = make_sample(1, 0.0, 0.0, 0.0);
        sample.timestamp = f64::INFINITY;
        assert_eq!(
            sample.validate(),
            Err(Error::MalformedSample { field: "timestamp" })
        );
    }

    #[test]
    fn test_action_accessors() {
        let sample = make_sample(7, 1.0, 2.0, 3.0);
        let action = ContactAction::Moved {
            sample,
            delta: Some(sample.delta_from(&make_sample(7, 0.0, 0.0, 0.0))),
        };

        assert_eq!(action.contact(), 7);
        assert_eq!(action.sample().timestamp, 3.0);
        assert!(action.delta().is_some());
        assert!(ContactAction::Started { sample }.delta().is_none());
    }
}
