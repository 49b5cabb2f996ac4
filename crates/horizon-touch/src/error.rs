//! Error types for Horizon Touch.

use thiserror::Error;

/// The main error type for touch classification operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A raw sample carried a NaN or infinite numeric field.
    ///
    /// Malformed samples are rejected at the input boundary before any
    /// session or race state is touched.
    #[error("touch sample field `{field}` is not a finite number")]
    MalformedSample {
        /// Name of the offending field.
        field: &'static str,
    },

    /// `process` was called after the classifier was closed.
    #[error("classifier has been closed")]
    Closed,

    /// A configuration value was zero, negative, or non-finite.
    #[error("configuration value `{field}` must be a positive number of milliseconds")]
    InvalidConfig {
        /// Name of the offending configuration field.
        field: &'static str,
    },
}

/// A specialized Result type for touch classification operations.
pub type Result<T> = std::result::Result<T, Error>;
