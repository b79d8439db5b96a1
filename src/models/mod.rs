pub mod appointment;
pub mod location;
pub mod patient;
pub mod provider;
pub mod token;

use chrono::{DateTime, NaiveDateTime, Timelike};

/// Render a naive timestamp the way the vendor API does: ISO 8601 without
/// offset, with microseconds only when they are non-zero.
pub fn iso_naive(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Parse a client-supplied timestamp. Offsets are normalised to UTC;
/// timestamps without an offset are taken as UTC already.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
