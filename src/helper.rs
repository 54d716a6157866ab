//! Small helpers shared by the store and the CLI: dates, ids and previews.
use std::fmt::Write;

use chrono::{
    format::{Item, StrftimeItems},
    DateTime, TimeZone,
};
use log::warn;

use crate::{DiaryError, Note, Result};

/// Default creation-date rendering, e.g. "3/7/2025 9:05:12 PM"
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y %-I:%M:%S %p";

/// Rejects strftime strings chrono cannot render
pub fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(DiaryError::ConfigError {
            message: format!("Invalid date format: '{}'", format),
        });
    }
    Ok(())
}

/// Renders `time` with `format`, falling back to the default format if `format` is invalid
pub fn format_timestamp<Tz>(time: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    if validate_date_format(format).is_ok() && write!(out, "{}", time.format(format)).is_ok() {
        return out;
    }

    warn!("Falling back to default date format (got '{}')", format);
    out.clear();
    // the default format is static and valid
    let _ = write!(out, "{}", time.format(DEFAULT_DATE_FORMAT));
    out
}

/// Picks an id for a new note: the creation time in milliseconds, bumped past
/// the largest existing id when the clock has not moved on.
pub fn next_note_id(now_millis: i64, notes: &[Note]) -> i64 {
    match notes.iter().map(|n| n.id).max() {
        Some(max_id) if max_id >= now_millis => max_id + 1,
        _ => now_millis,
    }
}

/// Generate a single-line preview for compact listings
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
