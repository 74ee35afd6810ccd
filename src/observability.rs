//! Logging infrastructure for compaction decisions.
//!
//! The crate uses `tracing` for structured logging. All events use target
//! "mergetree" and include an `event` field for filtering.
//!
//! ## Library Integration
//!
//! No global subscriber is ever installed. Applications configure tracing via
//! `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: module/subsystem (e.g., "compaction", "levels")
//! - Use `%` for Display, `?` for Debug formatting

/// Target for all log events emitted by this crate.
pub(crate) const MERGETREE_TARGET: &str = "mergetree";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "compaction",
///     event = "universal_pick",
///     rule = "size_ratio",
///     output_level = 3,
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::MERGETREE_TARGET, $($field)*)
    };
}

/// Macro for trace-level log events.
macro_rules! log_trace {
    ($($field:tt)*) => {
        ::tracing::trace!(target: $crate::observability::MERGETREE_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_trace;
