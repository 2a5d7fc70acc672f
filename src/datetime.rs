//! Date/time utilities for filedrop.

use std::time::SystemTime;

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::{FiledropError, Result};

/// Format used for modification times in file listings.
pub const LISTING_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse an IANA timezone name (e.g. "Asia/Tokyo", "UTC").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| FiledropError::Config(format!("unknown timezone: {name}")))
}

/// Format a filesystem timestamp.
///
/// # Arguments
///
/// * `time` - Timestamp to format
/// * `timezone` - Zone to display in; the host's local zone when `None`
/// * `format` - Output format string (e.g., "%Y-%m-%d %H:%M")
pub fn format_system_time(time: SystemTime, timezone: Option<Tz>, format: &str) -> String {
    let utc: DateTime<Utc> = time.into();
    match timezone {
        Some(tz) => utc.with_timezone(&tz).format(format).to_string(),
        None => utc.with_timezone(&Local).format(format).to_string(),
    }
}

/// Whole seconds since the Unix epoch.
pub fn unix_seconds(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp()
}
