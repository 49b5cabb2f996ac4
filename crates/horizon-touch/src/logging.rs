//! Logging facilities for Horizon Touch.
//!
//! The crate is instrumented with the `tracing` crate and emits no output
//! of its own; install a subscriber in the host application to see logs:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Timer scheduling and firing log at trace level; lifecycle edges (close,
//! rejected input, session replacement) log at debug level.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=horizon_touch::timer=trace`.
pub mod targets {
    /// Classification pipeline target.
    pub const CLASSIFIER: &str = "horizon_touch::classifier";
    /// Timer queue target.
    pub const TIMER: &str = "horizon_touch::timer";
}
