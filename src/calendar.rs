//! Add-to-calendar link
//!
//! Builds a Google Calendar "render template" URL. No network access.

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

const CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";

/// Characters `encodeURIComponent` leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Compact UTC form used in the `dates` parameter
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// The celebration itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub details: String,
    pub location: String,
}

impl Default for CalendarEvent {
    fn default() -> Self {
        Self {
            title: "Vasant Mahotsava 🌸".to_string(),
            // 2026-02-14 20:00 IST
            start: from_unix(1_771_079_400),
            // 2026-02-14 23:30 IST
            end: from_unix(1_771_092_000),
            details: "Virtual celebration of love, Indian style.\n\n\
                      8 PM - Virtual Dinner\n\
                      9 PM - Roasting Session\n\
                      10 PM - Virtual Long Drive"
                .to_string(),
            location: "Google Meet".to_string(),
        }
    }
}

impl CalendarEvent {
    /// `START/END` in compact UTC form
    pub fn dates(&self) -> String {
        format!(
            "{}/{}",
            self.start.format(STAMP_FORMAT),
            self.end.format(STAMP_FORMAT)
        )
    }

    /// Full calendar URL with every free-text field percent-encoded
    pub fn link(&self) -> String {
        format!(
            "{}&text={}&dates={}&details={}&location={}",
            CALENDAR_BASE,
            encode_component(&self.title),
            self.dates(),
            encode_component(&self.details),
            encode_component(&self.location),
        )
    }
}

/// Link for the default event
pub fn generate_calendar_link() -> String {
    CalendarEvent::default().link()
}

/// Percent-encode like `encodeURIComponent`
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
