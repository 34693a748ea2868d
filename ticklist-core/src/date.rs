//! Natural language date and time input
//!
//! Supports various formats:
//! - ISO dates: "2026-01-25", "2026-01-25T09:30", "2026-01-25 09:30"
//! - Human dates: "Jan 25", "January 25 2026"
//! - Relative: "today", "tomorrow", "monday", "next friday"
//! - Offset: "in 3 days", "in 1 week"
//! - Any of the above followed by a time: "tomorrow 9am", "jan 25 at 14:30"

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday,
};
use regex::Regex;

use crate::error::{CoreError, Result};

// Trailing time-of-day, optionally introduced by "at"
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<date>.*?)\s+(?:at\s+)?)?(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>am|pm)?$")
        .expect("Invalid time regex pattern")
});

/// Parse a date/time string relative to `now`
///
/// A date without a time resolves to the start of that day; a time without a
/// date resolves to today.
pub fn parse_datetime(input: &str, now: DateTime<Local>) -> Result<DateTime<Local>> {
    let input = input.trim().to_lowercase();

    // datetime-local style input
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&input, format) {
            return to_local(naive);
        }
    }

    let today = now.date_naive();

    if let Some((date_part, time)) = split_time(&input)? {
        let date = match date_part {
            Some(text) => parse_date_from(text, today)?,
            None => today,
        };
        return to_local(date.and_time(time));
    }

    let date = parse_date_from(&input, today)?;
    to_local(date.and_time(NaiveTime::MIN))
}

/// Parse a date string into a NaiveDate relative to `today`
pub fn parse_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim().to_lowercase();

    if let Some(date) = try_parse_relative(&input, today) {
        return Ok(date);
    }

    if let Some(date) = try_parse_weekday(&input, today) {
        return Ok(date);
    }

    if let Some(date) = try_parse_offset(&input, today) {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
        return Ok(date);
    }

    // Formats that carry a year
    let full_formats = ["%b %d %Y", "%B %d %Y", "%m/%d/%Y", "%d %b %Y", "%d %B %Y"];
    for format in &full_formats {
        if let Ok(date) = NaiveDate::parse_from_str(&input, format) {
            return Ok(date);
        }
    }

    // Formats without a year: next occurrence from today. chrono needs a year
    // to build a date, so parse with the current one appended.
    let partial_formats = ["%b %d", "%B %d", "%m/%d"];
    for format in &partial_formats {
        let with_year = format!("{} {}", input, today.year());
        let format_with_year = format!("{} %Y", format);
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, &format_with_year) {
            if date < today {
                return date
                    .with_year(today.year() + 1)
                    .ok_or_else(|| CoreError::parse("Invalid date"));
            }
            return Ok(date);
        }
    }

    Err(CoreError::parse(format!(
        "Could not parse date '{}'. Try formats like: 'tomorrow 9am', 'Jan 25', '2026-01-25 14:30', 'next monday', 'in 3 days'",
        input
    )))
}

fn split_time(input: &str) -> Result<Option<(Option<&str>, NaiveTime)>> {
    let Some(caps) = TIME_REGEX.captures(input) else {
        return Ok(None);
    };

    let minute = caps.name("minute");
    let meridiem = caps.name("meridiem").map(|m| m.as_str());

    // A bare number ("jan 25") is a day, not a time
    if minute.is_none() && meridiem.is_none() {
        return Ok(None);
    }

    let mut hour: u32 = caps["hour"]
        .parse()
        .map_err(|e| CoreError::parse_with_source("Invalid hour", e))?;
    let minute: u32 = match minute {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|e| CoreError::parse_with_source("Invalid minute", e))?,
        None => 0,
    };

    match meridiem {
        Some("am") if hour == 12 => hour = 0,
        Some("pm") if hour < 12 => hour += 12,
        _ => {}
    }

    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| CoreError::parse(format!("Invalid time in '{}'", input)))?;

    let date_part = caps
        .name("date")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty());

    Ok(Some((date_part, time)))
}

fn to_local(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| CoreError::parse(format!("{} does not exist in the local timezone", naive)))
}

fn try_parse_relative(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => None,
    }
}

fn try_parse_weekday(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let weekday_str = input.strip_prefix("next ").unwrap_or(input);

    let target_weekday = match weekday_str {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };

    // Next occurrence, never today
    let days = (target_weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    let days_until = if days == 0 { 7 } else { days as u64 };

    today.checked_add_days(Days::new(days_until))
}

fn try_parse_offset(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let rest = input.strip_prefix("in ")?.trim();
    let parts: Vec<&str> = rest.split_whitespace().collect();

    if parts.len() != 2 {
        return None;
    }

    let num: u64 = parts[0].parse().ok()?;

    match parts[1] {
        "day" | "days" => today.checked_add_days(Days::new(num)),
        "week" | "weeks" => today.checked_add_days(Days::new(num.checked_mul(7)?)),
        _ => None,
    }
}

/// Short timestamp label: "Jan 25, 9:30 AM"
pub fn format_stamp(dt: DateTime<Local>) -> String {
    dt.format("%b %-d, %-I:%M %p").to_string()
}

/// Format a date for human-readable display relative to `today`
///
/// Returns strings like: "Today", "Tomorrow", "Mon Jan 27", "3 days ago"
pub fn format_relative(date: NaiveDate, today: NaiveDate) -> String {
    let diff = date.signed_duration_since(today).num_days();

    match diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=6 => date.format("%a %b %d").to_string(),
        7..=365 => date.format("%b %d").to_string(),
        _ if diff < 0 => format!("{} days ago", -diff),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike};

    fn now() -> DateTime<Local> {
        // A Tuesday
        Local.with_ymd_and_hms(2026, 1, 20, 15, 45, 0).unwrap()
    }

    #[test]
    fn test_parse_today_tomorrow() {
        let today = now().date_naive();
        assert_eq!(parse_date_from("today", today).unwrap(), today);
        assert_eq!(
            parse_date_from("tomorrow", today).unwrap(),
            today + Duration::days(1)
        );
    }

    #[test]
    fn test_parse_iso_date() {
        let date = parse_date_from("2026-01-25", now().date_naive()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 25).unwrap());
    }

    #[test]
    fn test_parse_weekday() {
        let today = now().date_naive();
        let date = parse_date_from("monday", today).unwrap();
        assert_eq!(date.weekday(), Weekday::Mon);
        assert!(date > today);

        // Same weekday jumps a full week
        let date = parse_date_from("next tuesday", today).unwrap();
        assert_eq!(date, today + Duration::days(7));
    }

    #[test]
    fn test_parse_offset() {
        let today = now().date_naive();
        assert_eq!(
            parse_date_from("in 3 days", today).unwrap(),
            today + Duration::days(3)
        );
        assert_eq!(
            parse_date_from("in 2 weeks", today).unwrap(),
            today + Duration::days(14)
        );
    }

    #[test]
    fn test_huge_offset_is_an_error() {
        assert!(parse_datetime("in 3000000000000000000 weeks", now()).is_err());
        assert!(parse_datetime("in 18446744073709551615 days", now()).is_err());
        assert!(parse_date_from("in 5000000 weeks", now().date_naive()).is_err());
    }

    #[test]
    fn test_partial_date_rolls_to_next_year() {
        let today = now().date_naive();
        assert_eq!(
            parse_date_from("jan 10", today).unwrap(),
            NaiveDate::from_ymd_opt(2027, 1, 10).unwrap()
        );
        assert_eq!(
            parse_date_from("feb 3", today).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
        );
    }

    #[test]
    fn test_parse_datetime_with_time() {
        let dt = parse_datetime("tomorrow 9am", now()).unwrap();
        assert_eq!(dt.date_naive(), now().date_naive() + Duration::days(1));
        assert_eq!((dt.hour(), dt.minute()), (9, 0));

        let dt = parse_datetime("2026-02-01 at 14:30", now()).unwrap();
        assert_eq!((dt.hour(), dt.minute()), (14, 30));

        let dt = parse_datetime("12am", now()).unwrap();
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_datetime_local_format() {
        let dt = parse_datetime("2026-01-25T09:30", now()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2026, 1, 25).unwrap());
        assert_eq!((dt.hour(), dt.minute()), (9, 30));
    }

    #[test]
    fn test_date_only_is_start_of_day() {
        let dt = parse_datetime("2026-01-25", now()).unwrap();
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_datetime("whenever", now()).is_err());
        assert!(parse_datetime("tomorrow 25:00", now()).is_err());
    }

    #[test]
    fn test_format_relative() {
        let today = now().date_naive();
        assert_eq!(format_relative(today, today), "Today");
        assert_eq!(format_relative(today + Duration::days(1), today), "Tomorrow");
        assert_eq!(format_relative(today - Duration::days(3), today), "3 days ago");
    }

    #[test]
    fn test_format_stamp() {
        let dt = Local.with_ymd_and_hms(2026, 1, 5, 21, 7, 0).unwrap();
        assert_eq!(format_stamp(dt), "Jan 5, 9:07 PM");
    }
}
