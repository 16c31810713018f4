//! Numeric encodings R uses for time values.

use jiff::{SignedDuration, Timestamp};

/// `POSIXct` representation: fractional seconds since 1970-01-01 00:00:00 UTC.
pub fn posixct_seconds(ts: Timestamp) -> f64 {
    ts.as_duration().as_secs_f64()
}

/// `difftime` representation in `units = "secs"`.
pub fn difftime_seconds(d: SignedDuration) -> f64 {
    d.as_secs_f64()
}
