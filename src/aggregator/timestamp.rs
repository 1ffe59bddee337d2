use crate::error::{AppError, AppResult};
use chrono::{DateTime, NaiveDateTime, Utc};

/// One entry in the ordered list of publication-date layouts.
///
/// `Named` layouts end in an abbreviated zone name (`MST`, `GMT`). Most
/// such names carry no reliable offset, so the wall-clock time is taken
/// as UTC. `Offset` layouts end in a numeric zone (`-0700`) which is
/// honored. `Rfc3339` accepts both plain and fractional-second forms.
enum Layout {
    Named(&'static str),
    Offset(&'static str),
    Rfc3339,
}

/// Layouts in the order they are attempted. First success wins; for
/// well-formed inputs at most one entry matches.
const LAYOUTS: &[Layout] = &[
    // RFC 822
    Layout::Named("%d %b %y %H:%M"),
    // RFC 822, numeric zone
    Layout::Offset("%d %b %y %H:%M %z"),
    // RFC 850
    Layout::Named("%A, %d-%b-%y %H:%M:%S"),
    // RFC 1123
    Layout::Named("%a, %d %b %Y %H:%M:%S"),
    // RFC 1123, numeric zone
    Layout::Offset("%a, %d %b %Y %H:%M:%S %z"),
    // RFC 3339, with or without fractional seconds
    Layout::Rfc3339,
];

/// Parse a publication-date string of unknown format into a canonical
/// instant, trying each known layout in order.
pub fn normalize_pub_date(raw: &str) -> AppResult<DateTime<Utc>> {
    for layout in LAYOUTS {
        let parsed = match layout {
            Layout::Named(fmt) => parse_named_zone(raw, fmt),
            Layout::Offset(fmt) => DateTime::parse_from_str(raw, fmt)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        };

        if let Some(instant) = parsed {
            return Ok(instant);
        }
    }

    Err(AppError::UnparseableTimestamp(raw.to_string()))
}

/// Parse a layout whose trailing token is an abbreviated zone name. The
/// token must be purely alphabetic so that numeric-zone inputs fall
/// through to their own layout instead of being misread as UTC.
fn parse_named_zone(raw: &str, fmt: &str) -> Option<DateTime<Utc>> {
    let (datetime_part, zone) = raw.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    NaiveDateTime::parse_from_str(datetime_part, fmt)
        .ok()
        .map(|naive| naive.and_utc())
}
