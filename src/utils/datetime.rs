use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{Local, NaiveDateTime};

use crate::utils::constants::LATE_MARKER;
use crate::Error;

/// Converts a due date like `3/4/16 8p` or `3/4/16 11:59p` into the form `MM/DD/YYYY H[:MM]` (24 hour clock)
/// <br> Strings that are already in that form are returned unchanged
pub fn normalize_due_date(due_date: &str) -> Result<String, Error> {
    let invalid = |reason: &str| Error::DateTime(format!("'{}' {}", due_date, reason));

    let (date, hour) = due_date.trim().split_once(' ').ok_or_else(|| invalid("has no hour"))?;

    let parts = date.split('/').collect::<Vec<&str>>();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit())) {
        return Err(invalid("is not in the form M/D/YY"));
    }

    let pad = |part: &str| match part.len() {
        1 => Ok(format!("0{}", part)),
        2 => Ok(part.to_string()),
        _ => Err(invalid("has a malformed month or day")),
    };
    let month = pad(parts[0])?;
    let day = pad(parts[1])?;
    let year = match parts[2].len() {
        2 => format!("20{}", parts[2]),
        4 => parts[2].to_string(),
        _ => return Err(invalid("has a malformed year")),
    };

    let hour = hour.trim();
    let (clock, suffix) = match hour.chars().last().map(|c| c.to_ascii_lowercase()) {
        Some(suffix @ ('a' | 'p')) => (&hour[..hour.len() - 1], Some(suffix)),
        _ => (hour, None),
    };

    let (hours, minutes) = match clock.split_once(':') {
        Some((hours, minutes)) => (hours, Some(minutes)),
        None => (clock, None),
    };
    if hours.is_empty() || hours.len() > 2 || !hours.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("has a malformed hour"));
    }
    if let Some(minutes) = minutes {
        if minutes.len() != 2 || !minutes.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("has malformed minutes"));
        }
    }

    let mut hours = hours.parse::<u32>().map_err(|e| invalid(&format!("has a malformed hour ({})", e)))?;
    if let Some(suffix) = suffix {
        if !(1..=12).contains(&hours) {
            return Err(invalid("has a 12 hour clock hour outside of 1-12"));
        }
        hours = match (suffix, hours) {
            ('a', 12) => 0,
            ('p', 12) => 12,
            ('p', hours) => hours + 12,
            (_, hours) => hours,
        };
    }

    Ok(match minutes {
        Some(minutes) => format!("{}/{}/{} {}:{}", month, day, year, hours, minutes),
        None => format!("{}/{}/{} {}", month, day, year, hours),
    })
}

/// Parses a due date into a [NaiveDateTime] (tries `%m/%d/%Y %H` first and `%m/%d/%Y %H:%M` second)
pub fn parse_due_date(due_date: &str) -> Result<NaiveDateTime, Error> {
    let normalized = normalize_due_date(due_date)?;

    if let Some(date_time) = parse_hour_only(&normalized) {
        return Ok(date_time);
    }

    NaiveDateTime::parse_from_str(&normalized, "%m/%d/%Y %H:%M")
        .map_err(|e| Error::DateTime(format!("failed to parse due date '{}' ('{}'): {}", due_date, normalized, e)))
}

fn parse_hour_only(normalized: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, normalized, StrftimeItems::new("%m/%d/%Y %H")).ok()?;
    parsed.set_minute(0).ok()?;
    parsed.to_naive_datetime_with_offset(0).ok()
}

/// Returns the late marker if `due` is strictly before `now` and an empty string otherwise
pub fn lateness_at(due: &NaiveDateTime, now: &NaiveDateTime) -> &'static str {
    if due < now {
        LATE_MARKER
    } else {
        ""
    }
}

/// Same as [lateness_at] but compares against the current local time
pub fn is_late(due_date: &str) -> Result<&'static str, Error> {
    let due = parse_due_date(due_date)?;
    Ok(lateness_at(&due, &Local::now().naive_local()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn normalizes_loose_dates() {
        assert_eq!(normalize_due_date("3/4/16 8").unwrap(), "03/04/2016 8");
        assert_eq!(normalize_due_date("3/4/16 8p").unwrap(), "03/04/2016 20");
        assert_eq!(normalize_due_date("12/25/16 11:59p").unwrap(), "12/25/2016 23:59");
        assert_eq!(normalize_due_date("1/9/17 9:30a").unwrap(), "01/09/2017 9:30");
        assert_eq!(normalize_due_date("1/9/17 12a").unwrap(), "01/09/2017 0");
        assert_eq!(normalize_due_date("1/9/17 12:15p").unwrap(), "01/09/2017 12:15");
    }

    #[test]
    fn normalizing_is_idempotent() {
        for raw in ["3/4/16 8p", "12/25/16 11:59p", "1/9/17 9:30a", "10/10/18 7"] {
            let once = normalize_due_date(raw).unwrap();
            assert_eq!(normalize_due_date(&once).unwrap(), once);
        }
    }

    #[test]
    fn parses_both_formats() {
        assert_eq!(parse_due_date("3/4/16 8p").unwrap(), at(2016, 3, 4, 20, 0));
        assert_eq!(parse_due_date("3/4/16 8:45").unwrap(), at(2016, 3, 4, 8, 45));
        assert_eq!(parse_due_date("03/04/2016 23:59").unwrap(), at(2016, 3, 4, 23, 59));
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in ["", "tomorrow", "3/4/16", "3/4 8p", "13/4/16 8", "3/32/16 8", "3/4/16 25", "3/4/16 8:5", "3/4/16 13p", "a/b/cc 8"] {
            assert!(matches!(parse_due_date(raw), Err(Error::DateTime(_))), "'{}' should not parse", raw);
        }
    }

    #[test]
    fn late_only_when_strictly_past() {
        let due = at(2016, 3, 4, 20, 0);
        assert_eq!(lateness_at(&due, &(due + Duration::minutes(1))), LATE_MARKER);
        assert_eq!(lateness_at(&due, &due), "");
        assert_eq!(lateness_at(&due, &(due - Duration::minutes(1))), "");
    }

    #[test]
    fn is_late_uses_current_time() {
        assert_eq!(is_late("1/1/16 8a").unwrap(), LATE_MARKER);
        assert_eq!(is_late("1/1/99 8a").unwrap(), "");
    }
}
