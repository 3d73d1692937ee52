//! Helper functions and utilities
//!
//! This module contains small parsing and formatting helpers shared by the
//! handlers and the moderation coordinator.

use chrono::{DateTime, Duration, Utc};

/// Parse a command argument as a non-negative integer.
///
/// Surrounding whitespace is ignored; signs, fractions and empty input are
/// rejected.
pub fn parse_non_negative(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Moment until which a removed member stays banned
pub fn ban_until(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// Render a minute count as a short human readable duration
pub fn format_minutes(minutes: i64) -> String {
    let days = minutes / (60 * 24);
    let hours = (minutes % (60 * 24)) / 60;
    let mins = minutes % 60;

    match (days, hours, mins) {
        (0, 0, m) => format!("{} min", m),
        (0, h, 0) => format!("{} h", h),
        (0, h, m) => format!("{} h {} min", h, m),
        (d, 0, 0) => format!("{} d", d),
        (d, h, _) => format!("{} d {} h", d, h),
    }
}
