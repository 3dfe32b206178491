use chrono::{NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HOUR_MINUTE: Regex = Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").unwrap();
}

/// Parses a wall-clock time written as `HH:MM` (a single-digit hour is accepted)
pub fn parse_hour_minute(value: &str) -> Option<NaiveTime> {
    let captures = HOUR_MINUTE.captures(value.trim())?;
    let hour = captures[1].parse().ok()?;
    let minute = captures[2].parse().ok()?;

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Formats a time as zero-padded `HH:MM`
pub fn format_hour_minute(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_hour_minute() {
        assert_eq!(
            parse_hour_minute("09:05"),
            NaiveTime::from_hms_opt(9, 5, 0)
        );
        assert_eq!(parse_hour_minute("7:30"), NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(
            parse_hour_minute("23:59"),
            NaiveTime::from_hms_opt(23, 59, 0)
        );
    }

    #[test]
    fn test_parse_hour_minute_rejects_garbage() {
        for value in ["24:00", "12:60", "1200", "12:5", "", "noon", "12:00:00"] {
            assert_eq!(parse_hour_minute(value), None, "{value}");
        }
    }

    #[test]
    fn test_format_pads() {
        let time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(format_hour_minute(time), "08:00");
    }
}
