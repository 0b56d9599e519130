//! Display policy for post and comment timestamps:
//! same calendar day shows the time, anything younger than a year shows
//! day/month and time, older items show the full date.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Offset, Utc};

#[derive(Debug, Clone, Copy)]
pub struct TimestampFormatter {
    offset: FixedOffset,
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimestampFormatter {
    /// Out-of-range offsets fall back to UTC
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(0)
    }

    pub fn format(&self, ts: DateTime<Utc>) -> String {
        self.format_at(ts, Utc::now())
    }

    pub fn format_at(&self, ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let local = ts.with_timezone(&self.offset);
        let local_now = now.with_timezone(&self.offset);

        if local.date_naive() == local_now.date_naive() {
            local.format("%H:%M").to_string()
        } else if now.signed_duration_since(ts) < Duration::days(365) {
            format!("{}/{} {}", local.day(), local.month(), local.format("%H:%M"))
        } else {
            local.format("%d/%m/%Y").to_string()
        }
    }
}
