//! Date/time parsing and reminder validation.
//!
//! Input is wall-clock local time in the fixed formats `YYYY-MM-DD` and
//! `HH:MM` (24h); everything else is rejected with
//! [`ValidationError::InvalidFormat`]. Parsed instants are converted to UTC
//! once, at parse time, and stay UTC through the rest of the engine.

use crate::error::ValidationError;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Minimum lead of a reminder before its deadline, in minutes.
pub const MIN_LEAD_MINUTES: i64 = 5;

/// Parse a `YYYY-MM-DD` date and `HH:MM` time pair into a UTC instant.
///
/// The pair is interpreted as local wall-clock time. Empty strings,
/// out-of-range fields and any other shape (including non-zero-padded
/// fields) are rejected.
pub fn parse(date_str: &str, time_str: &str) -> Result<DateTime<Utc>, ValidationError> {
    let date = parse_date(date_str)?;
    let time = parse_time(time_str)?;
    to_utc(date.and_time(time))
}

/// Parse a reminder time whose date portion may be blank.
///
/// A blank or absent date is substituted with the current local date,
/// resolved once here at parse time and never re-resolved later.
pub fn parse_reminder(
    date_str: Option<&str>,
    time_str: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    parse_reminder_on(date_str, time_str, Local::now().date_naive())
}

/// Validate the reminder lead rule against a deadline.
///
/// A reminder at or after the deadline is [`ValidationError::TooLate`]; one
/// strictly before but within [`MIN_LEAD_MINUTES`] of it is
/// [`ValidationError::TooClose`]. Exactly the minimum lead is accepted.
pub fn validate_reminder(
    reminder: DateTime<Utc>,
    deadline: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if reminder >= deadline {
        return Err(ValidationError::TooLate);
    }
    if deadline - reminder < Duration::minutes(MIN_LEAD_MINUTES) {
        return Err(ValidationError::TooClose);
    }
    Ok(())
}

/// Render an instant as `YYYY-MM-DD HH:MM` in local time.
///
/// Used for the display strings embedded in confirmation payloads.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// `parse_reminder` with the substitute date injected, for testability.
pub(crate) fn parse_reminder_on(
    date_str: Option<&str>,
    time_str: &str,
    today: NaiveDate,
) -> Result<DateTime<Utc>, ValidationError> {
    match date_str {
        Some(s) if !s.trim().is_empty() => parse(s, time_str),
        _ => {
            let time = parse_time(time_str)?;
            to_utc(today.and_time(time))
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    // Fixed width rules out lenient forms like "2025-3-1".
    if s.len() != 10 {
        return Err(ValidationError::InvalidFormat(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidFormat(s.to_string()))
}

fn parse_time(s: &str) -> Result<NaiveTime, ValidationError> {
    if s.len() != 5 {
        return Err(ValidationError::InvalidFormat(s.to_string()));
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| ValidationError::InvalidFormat(s.to_string()))
}

fn to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>, ValidationError> {
    // A local time skipped by a DST transition has no instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ValidationError::InvalidFormat(naive.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(date: &str, time: &str) -> DateTime<Utc> {
        parse(date, time).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        let parsed = parse("2025-03-10", "17:00").unwrap();
        assert_eq!(format_instant(parsed), "2025-03-10 17:00");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let cases = [
            ("", "17:00"),
            ("2025-03-10", ""),
            ("2025/03/10", "17:00"),
            ("10-03-2025", "17:00"),
            ("2025-3-10", "17:00"),
            ("2025-03-10", "5:00"),
            ("2025-03-10", "17:00:00"),
            ("not-a-date", "17:00"),
            ("2025-03-10", "later"),
        ];
        for (date, time) in cases {
            assert!(
                matches!(parse(date, time), Err(ValidationError::InvalidFormat(_))),
                "expected InvalidFormat for {date:?} {time:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse("2025-13-01", "12:00").is_err());
        assert!(parse("2025-02-30", "12:00").is_err());
        assert!(parse("2025-03-10", "24:00").is_err());
        assert!(parse("2025-03-10", "12:60").is_err());
    }

    #[test]
    fn test_reminder_blank_date_uses_given_day() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let from_blank = parse_reminder_on(Some("  "), "16:50", today).unwrap();
        let from_none = parse_reminder_on(None, "16:50", today).unwrap();
        let explicit = parse_reminder_on(Some("2025-03-10"), "16:50", today).unwrap();

        assert_eq!(from_blank, explicit);
        assert_eq!(from_none, explicit);
    }

    #[test]
    fn test_reminder_blank_date_still_validates_time() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(parse_reminder_on(None, "25:00", today).is_err());
    }

    #[test]
    fn test_validate_reminder_boundaries() {
        let deadline = instant("2025-03-10", "17:00");

        // Exactly the minimum lead is fine.
        assert!(validate_reminder(instant("2025-03-10", "16:55"), deadline).is_ok());
        // One minute inside the lead window.
        assert_eq!(
            validate_reminder(instant("2025-03-10", "16:56"), deadline),
            Err(ValidationError::TooClose)
        );
        // At the deadline.
        assert_eq!(
            validate_reminder(deadline, deadline),
            Err(ValidationError::TooLate)
        );
        // After the deadline.
        assert_eq!(
            validate_reminder(instant("2025-03-10", "17:30"), deadline),
            Err(ValidationError::TooLate)
        );
        // Comfortably early.
        assert!(validate_reminder(instant("2025-03-10", "08:00"), deadline).is_ok());
    }

    #[test]
    fn test_sub_minute_precision_near_lead() {
        let deadline = instant("2025-03-10", "17:00");
        let reminder = deadline - Duration::minutes(5) + Duration::seconds(1);
        assert_eq!(
            validate_reminder(reminder, deadline),
            Err(ValidationError::TooClose)
        );
    }
}
