use chrono::{DateTime, Utc};

use super::Timezone;
use crate::wms::UpstreamDate;

/// Customer-facing date format: "March 5, 2026, 02:30 PM"
const DISPLAY_FORMAT: &str = "%B %-d, %Y, %I:%M %p";

pub(crate) fn format_instant(at: DateTime<Utc>, timezone: Timezone) -> String {
    timezone.to_fixed_offset(at).format(DISPLAY_FORMAT).to_string()
}

/// Render an upstream date for display. Missing dates read "Unknown Date",
/// values that cannot be interpreted read "Invalid Date".
pub(crate) fn format_display_date(date: Option<&UpstreamDate>, timezone: Timezone) -> String {
    let Some(date) = date else {
        return "Unknown Date".to_string();
    };
    match date.to_utc() {
        Some(at) => format_instant(at, timezone),
        None => "Invalid Date".to_string(),
    }
}
