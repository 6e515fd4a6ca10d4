//! Pod log constants.

/// Number of trailing lines returned when the caller does not ask for a count.
pub const DEFAULT_TAIL_LINES: usize = 100;

/// Tail applied when following a log stream.
pub const FOLLOW_TAIL_LINES: usize = 1;

/// How often a followed log is polled for new output, in milliseconds.
pub const FOLLOW_POLL_INTERVAL_MS: u64 = 1000;
