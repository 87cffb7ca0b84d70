//! Duration and hour formatting for tables, status lines and exports.
//!
//! ```rust
//! use arealog::libs::formatter::{format_duration, format_hours};
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&Duration::seconds(3725)), "01:02:05");
//! assert_eq!(format_hours(1.0 / 6.0), "0.17");
//! ```

use chrono::{Duration, NaiveDateTime};

/// `HH:MM:SS`; negative durations render as zero and hours may exceed 24.
pub fn format_duration(duration: &Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// `HH:MM:SS` for a seconds value. NaN renders as zero; values outside the
/// representable range saturate.
pub fn format_seconds(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round();
    let duration = if millis.is_nan() {
        Duration::zero()
    } else {
        Duration::try_milliseconds(millis as i64).unwrap_or(if millis > 0.0 { Duration::MAX } else { Duration::zero() })
    };
    format_duration(&duration)
}

/// Decimal hours with two places.
pub fn format_hours(hours: f64) -> String {
    format!("{:.2}", hours)
}

pub fn format_time(value: &NaiveDateTime) -> String {
    value.format("%H:%M:%S").to_string()
}

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Display key for a group; entries without a department code share the empty key.
pub fn group_label(key: &str) -> &str {
    if key.is_empty() {
        "(none)"
    } else {
        key
    }
}
