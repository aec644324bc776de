//! Human-readable timestamps for commit messages and issue titles.

use chrono::{DateTime, Local, TimeZone};

/// Format used in commit messages and update titles.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The current local time, e.g. `2024-09-14 16:02:11`.
pub fn now() -> String {
    format(&Local::now())
}

/// Format `at` with [`TIMESTAMP_FORMAT`] in its own time zone.
pub fn format<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}
