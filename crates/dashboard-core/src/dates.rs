use chrono::{Months, NaiveDate, NaiveDateTime};

// ── OrderDateParser ───────────────────────────────────────────────────────────

/// Parses the order-date strings found in exported sales spreadsheets.
pub struct OrderDateParser;

impl OrderDateParser {
    /// Date-only patterns, tried in order.
    const DATE_FORMATS: &'static [&'static str] =
        &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];

    /// Date-time patterns; the time component is discarded.
    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    /// Parse `s` into a calendar date, returning `None` when no pattern fits.
    ///
    /// Handles ISO `2016-11-08`, US `11/8/2016`, day-first `08-11-2016`,
    /// `2016/11/08`, and any of those followed by a time of day.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }

        // RFC 3339 with an offset: keep the local calendar date.
        chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.date_naive())
    }
}

// ── Month arithmetic ──────────────────────────────────────────────────────────

/// Move `date` by `months` calendar months, clamping the day to the end of
/// the target month (Jan 31 + 1 month = Feb 28/29).
///
/// Saturates at the representable date limits instead of failing.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let magnitude = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    };
    shifted.unwrap_or(if months >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
