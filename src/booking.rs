//! Table booking input parsing.
//!
//! Bookings arrive as free text: first a date and time, then a party size.
//! Both parsers are pure so the dialogue engine stays clock-free; callers
//! supply `now`.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

// "14.08 19:30", "14.08.2026 19:30"; also tolerates "-" and "/" separators.
static DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[./-](\d{1,2})(?:[./-](\d{4}))?\s+(\d{1,2}):(\d{2})$").unwrap()
});

/// Parse a booking date and time. Without an explicit year, the nearest
/// future occurrence is assumed. Dates not strictly in the future are
/// rejected.
pub fn parse_booking_datetime(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime, &'static str> {
    let caps = DATETIME_RE.captures(input.trim()).ok_or("format")?;

    let day: u32 = caps[1].parse().map_err(|_| "format")?;
    let month: u32 = caps[2].parse().map_err(|_| "format")?;
    let hour: u32 = caps[4].parse().map_err(|_| "format")?;
    let minute: u32 = caps[5].parse().map_err(|_| "format")?;

    let build = |year: i32| {
        NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(hour, minute, 0))
    };

    let date = match caps.get(3) {
        Some(year) => {
            let year: i32 = year.as_str().parse().map_err(|_| "format")?;
            build(year).ok_or("invalid_date")?
        }
        None => {
            let this_year = build(now.year()).ok_or("invalid_date")?;
            if this_year > now {
                this_year
            } else {
                build(now.year() + 1).ok_or("invalid_date")?
            }
        }
    };

    if date <= now {
        return Err("in_the_past");
    }

    Ok(date)
}

/// Parse a party size within `[1, max]`.
pub fn parse_party_size(input: &str, max: u32) -> Result<u32, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    let size: u32 = trimmed.parse().map_err(|_| "not_a_number")?;

    if size < 1 || size > max {
        return Err("out_of_range");
    }

    Ok(size)
}
