use chrono::{Days, Local, NaiveDate};

use crate::error::AppError;

/// Canonical display format for entry dates, e.g. "Mon Jan 01 2024".
/// Stable, and parseable back with the same format string.
pub const DISPLAY_FORMAT: &str = "%a %b %d %Y";

const ISO_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Date normalization for exercise submissions. A missing or unparseable
/// date is never an error: it becomes the current date. Date-shaped strings
/// naming no real day ("2024-02-31") still count as parseable and roll over
/// into the following month.
pub fn submission_date(raw: Option<&str>) -> NaiveDate {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return today(),
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, ISO_FORMAT) {
        return date;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DISPLAY_FORMAT) {
        return date;
    }

    rolled_over_date(raw).unwrap_or_else(today)
}

/// Strict parsing for from/to query parameters: anything that is not an
/// exact ISO calendar date fails the request.
pub fn parse_query_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), ISO_FORMAT).map_err(|_| {
        AppError::InvalidQuery(format!("'{}' is not a valid calendar date", raw))
    })
}

// Accepts year-month-day with out-of-range components and rolls them over:
// month 13 lands in January of the next year, Feb 31 lands on Mar 2.
fn rolled_over_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split(['-', '/']).collect();
    let [year, month, day] = parts[..] else {
        return None;
    };

    let year: i64 = year.trim().parse().ok()?;
    let month: i64 = month.trim().parse().ok()?;
    let day: i64 = day.trim().parse().ok()?;

    if !(1..=9999).contains(&year) || !(1..=9999).contains(&month) || !(1..=9999).contains(&day) {
        return None;
    }

    let year = year + (month - 1) / 12;
    let month = ((month - 1) % 12 + 1) as u32;

    let first_of_month = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    first_of_month.checked_add_days(Days::new((day - 1) as u64))
}
