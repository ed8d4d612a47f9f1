use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::schema::default_date_formats;

/// Extracts the calendar date from payment timestamps.
#[derive(Debug, Clone)]
pub struct DateParser {
    formats: Vec<String>,
}

impl DateParser {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    /// RFC 3339 first (offset kept, local date taken), then each configured
    /// format as a timestamp and then as a bare date.
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.date_naive());
        }

        self.formats.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(value, format)
                .map(|dt| dt.date())
                .or_else(|_| NaiveDate::parse_from_str(value, format))
                .ok()
        })
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(default_date_formats())
    }
}
