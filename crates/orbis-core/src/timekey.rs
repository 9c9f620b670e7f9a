//! Canonical parsing and formatting for agenda time keys.
//!
//! Every operation that touches a `"YYYY-MM-DD HH:MM"` key goes through this
//! module, so validation and normalization happen exactly once. Bare dates
//! additionally accept the `DD/MM/YYYY` surface form and are normalized to
//! ISO before any store lookup.

use chrono::{NaiveDate, NaiveDateTime};

/// Store key format: date plus minute-precision time.
pub const KEY_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Date-only format used for day-prefix operations.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Alternate date surface form (`22/09/2025`), normalized to ISO.
const DATE_FORMAT_ALT: &str = "%d/%m/%Y";

/// Parse a `"YYYY-MM-DD HH:MM"` key. Returns `None` for anything that is not
/// a real calendar timestamp (bad shape, month 13, hour 25, trailing junk).
pub fn parse_key(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), KEY_FORMAT).ok()
}

/// Render a timestamp as its canonical zero-padded store key.
pub fn format_key(when: NaiveDateTime) -> String {
    when.format(KEY_FORMAT).to_string()
}

/// Parse a bare date, accepting `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, DATE_FORMAT_ALT))
        .ok()
}

/// Render a date as its canonical `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
