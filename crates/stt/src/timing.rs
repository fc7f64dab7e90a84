use std::time::Instant;

use jiff::Timestamp;

/// Milliseconds elapsed since `started`, saturating
pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// UTC ISO-8601 rendering with millisecond precision
pub(crate) fn iso8601(timestamp: Timestamp) -> String {
    format!("{timestamp:.3}")
}
