//! Best-effort normalization of site-native time strings.
//!
//! Publishers print times like `"Updated 9:15 PM ET, Tue March 3, 2020"` or
//! `"March 3, 2020 at 9:15 p.m. EST"`. [`parse_time_str`] turns those into a
//! UTC instant, or `None` when the string can't be understood. Failures are
//! logged and never propagate.
//!
//! Parsing is a token scan: clock times, meridiem markers, month and weekday
//! names, day/year numbers, numeric dates and zone abbreviations are picked
//! out, filler words are skipped, and anything else rejects the string.
//! Rejected strings get one more try through [`dateparser`], which covers
//! ISO 8601 and RFC forms.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Zone abbreviations understood in time strings.
static TZINFOS: Lazy<HashMap<&'static str, Tz>> = Lazy::new(|| {
    use chrono_tz::America::{Chicago, Denver, Los_Angeles, New_York};
    HashMap::from([
        ("EST", New_York),
        ("est", New_York),
        ("ET", New_York),
        ("et", New_York),
        ("EDT", New_York),
        ("CST", Chicago),
        ("CDT", Chicago),
        ("CT", Chicago),
        ("MST", Denver),
        ("MDT", Denver),
        ("MT", Denver),
        ("PST", Los_Angeles),
        ("PDT", Los_Angeles),
        ("PT", Los_Angeles),
        ("UTC", Tz::UTC),
        ("GMT", Tz::UTC),
        ("Z", Tz::UTC),
    ])
});

static UPDATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"updated?(.*)$").unwrap());
static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?(am|pm)?$").unwrap());
static HOUR_MERIDIEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})(am|pm)$").unwrap());
static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());
static US_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,4})(?:st|nd|rd|th)?$").unwrap());

const FILLER: &[&str] = &["at", "on", "and", "of", "-", "/", "'", "|"];
const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];
const WEEKDAYS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("unknown token '{0}'")]
    UnknownToken(String),
    #[error("string does not contain a date")]
    NoDate,
    #[error("date or time out of range")]
    OutOfRange,
    #[error("local time does not exist in {0}")]
    Nonexistent(Tz),
}

/// Parse a raw time string into a UTC instant, logging on failure.
pub fn parse_time_str(time_str: &str) -> Option<DateTime<Utc>> {
    if time_str.trim().is_empty() {
        return None;
    }
    let working = normalize_time_str(time_str);
    match parse_fuzzy(&working, Utc::now()) {
        Ok(parsed) => {
            debug!(%time_str, %parsed, "Parsed time string");
            Some(parsed)
        }
        Err(fuzzy_err) => match dateparser::parse_with_timezone(time_str.trim(), &Utc) {
            Ok(parsed) => {
                debug!(%time_str, %parsed, "Parsed time string with fallback parser");
                Some(parsed)
            }
            Err(e) => {
                warn!(%time_str, error = %fuzzy_err, fallback_error = %e, "Could not parse time string");
                None
            }
        },
    }
}

/// Lowercase, keep only what follows an "update(d)" marker, and normalize
/// informal Eastern-time suffixes to `EST`.
pub fn normalize_time_str(time_str: &str) -> String {
    let mut working = time_str.to_lowercase();
    if let Some(rest) = UPDATED_RE.captures(&working).and_then(|c| c.get(1)) {
        working = rest.as_str().to_string();
    }
    working.replace(" et", " est").replace(" est", " EST")
}

#[derive(Debug, Default)]
struct Fields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    pm: Option<bool>,
    tz: Option<Tz>,
}

impl Fields {
    fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none() && self.hour.is_none()
    }
}

/// Token-scan `s`; missing date parts default to `now`'s date, a missing
/// zone means UTC.
fn parse_fuzzy(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, TimeParseError> {
    let tokens: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .map(|t| t.trim_matches(|c: char| matches!(c, ':' | '(' | ')' | '[' | ']')))
        .filter(|t| !t.is_empty())
        .collect();

    let mut fields = Fields::default();
    for (i, raw) in tokens.iter().enumerate() {
        if let Some(pm) = meridiem(raw) {
            fields.pm = Some(pm);
            continue;
        }
        if let Some(tz) = zone(raw) {
            fields.tz = Some(tz);
            continue;
        }
        let token = raw.to_lowercase();
        let token = token.trim_matches('.');
        if token.is_empty() || FILLER.contains(&token) {
            continue;
        }

        if let Some(caps) = CLOCK_RE.captures(token) {
            fields.hour = Some(number(&caps[1]));
            fields.minute = Some(number(&caps[2]));
            fields.second = caps.get(3).map(|m| number(m.as_str()));
            if let Some(m) = caps.get(4) {
                fields.pm = Some(m.as_str() == "pm");
            }
        } else if let Some(caps) = HOUR_MERIDIEM_RE.captures(token) {
            fields.hour = Some(number(&caps[1]));
            fields.pm = Some(&caps[2] == "pm");
        } else if let Some(caps) = ISO_DATE_RE.captures(token) {
            fields.year = Some(number(&caps[1]) as i32);
            fields.month = Some(number(&caps[2]));
            fields.day = Some(number(&caps[3]));
        } else if let Some(caps) = US_DATE_RE.captures(token) {
            fields.month = Some(number(&caps[1]));
            fields.day = Some(number(&caps[2]));
            fields.year = Some(full_year(&caps[3]));
        } else if let Some(month) = month(token) {
            fields.month = Some(month);
        } else if is_weekday(token) {
            continue;
        } else if let Some(caps) = NUMBER_RE.captures(token) {
            let digits = &caps[1];
            let next_is_meridiem = tokens.get(i + 1).is_some_and(|t| meridiem(t).is_some());
            if next_is_meridiem && digits.len() <= 2 {
                fields.hour = Some(number(digits));
                fields.minute.get_or_insert(0);
            } else if digits.len() == 4 {
                fields.year = Some(number(digits) as i32);
            } else if fields.day.is_none() && digits.len() <= 2 {
                fields.day = Some(number(digits));
            } else if fields.year.is_none() {
                fields.year = Some(full_year(digits));
            } else {
                return Err(TimeParseError::UnknownToken(token.to_string()));
            }
        } else {
            return Err(TimeParseError::UnknownToken(token.to_string()));
        }
    }

    if fields.is_empty() {
        return Err(TimeParseError::NoDate);
    }
    resolve(fields, now)
}

fn resolve(fields: Fields, now: DateTime<Utc>) -> Result<DateTime<Utc>, TimeParseError> {
    let today = match fields.tz {
        Some(tz) => now.with_timezone(&tz).date_naive(),
        None => now.date_naive(),
    };
    let date = NaiveDate::from_ymd_opt(
        fields.year.unwrap_or(today.year()),
        fields.month.unwrap_or(today.month()),
        fields.day.unwrap_or(today.day()),
    )
    .ok_or(TimeParseError::OutOfRange)?;

    let mut hour = fields.hour.unwrap_or(0);
    match fields.pm {
        Some(true) if hour < 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }
    let local: NaiveDateTime = date
        .and_hms_opt(hour, fields.minute.unwrap_or(0), fields.second.unwrap_or(0))
        .ok_or(TimeParseError::OutOfRange)?;

    match fields.tz {
        Some(tz) => tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(TimeParseError::Nonexistent(tz)),
        None => Ok(Utc.from_utc_datetime(&local)),
    }
}

fn meridiem(token: &str) -> Option<bool> {
    match token.to_lowercase().as_str() {
        "am" | "a.m." | "a.m" => Some(false),
        "pm" | "p.m." | "p.m" => Some(true),
        _ => None,
    }
}

fn zone(token: &str) -> Option<Tz> {
    TZINFOS
        .get(token)
        .or_else(|| TZINFOS.get(token.to_uppercase().as_str()))
        .copied()
}

fn month(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|name| {
            *name == token || ((token.len() == 3 || token == "sept") && name.starts_with(token))
        })
        .map(|i| i as u32 + 1)
}

fn is_weekday(token: &str) -> bool {
    WEEKDAYS
        .iter()
        .any(|name| *name == token || (token.len() == 3 && name.starts_with(token)))
}

fn number(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

fn full_year(digits: &str) -> i32 {
    let year = number(digits) as i32;
    if digits.len() <= 2 { 2000 + year } else { year }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};
    use chrono_tz::America::New_York;

    fn eastern(dt: DateTime<Utc>) -> DateTime<Tz> {
        dt.with_timezone(&New_York)
    }

    #[test]
    fn test_normalize_updated_prefix_and_et() {
        assert_eq!(
            normalize_time_str("Updated 9:15 PM ET, Tue March 3, 2020"),
            " 9:15 pm EST, tue march 3, 2020"
        );
        assert_eq!(normalize_time_str("Update: 10:02 am est"), ": 10:02 am EST");
        assert_eq!(normalize_time_str("March 3, 2020"), "march 3, 2020");
    }

    #[test]
    fn test_cnn_updated_string() {
        let parsed = parse_time_str("Updated 9:15 PM ET, Tue March 3, 2020").unwrap();
        let local = eastern(parsed);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2020, 3, 3).unwrap());
        assert_eq!((local.hour(), local.minute()), (21, 15));
        assert_eq!(local.weekday(), Weekday::Tue);
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 4, 2, 15, 0).unwrap());
    }

    #[test]
    fn test_daylight_time_is_respected() {
        let parsed = parse_time_str("June 3, 2020 at 9:15 p.m. EST").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 6, 4, 1, 15, 0).unwrap());
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_time_str("not a date"), None);
        assert_eq!(parse_time_str(""), None);
        assert_eq!(parse_time_str("   "), None);
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let parsed = parse_time_str("March 3, 2020").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_numeric_us_date_with_zone() {
        let parsed = parse_time_str("03/03/2020 09:15 AM EST").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 3, 14, 15, 0).unwrap());

        let short_year = parse_time_str("03/03/20 12:30 PM EDT").unwrap();
        assert_eq!(short_year, Utc.with_ymd_and_hms(2020, 3, 3, 17, 30, 0).unwrap());
    }

    #[test]
    fn test_abbreviated_month_and_ordinal() {
        let parsed = parse_time_str("Tue., Mar. 3rd, 2020, 9pm ET").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 4, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_hill_style_date() {
        let parsed = parse_time_str("03/03/20 09:15 PM EST").unwrap();
        assert_eq!(eastern(parsed).hour(), 21);
    }

    #[test]
    fn test_fallback_parser_handles_rfc3339() {
        let parsed = parse_time_str("2020-03-03T21:15:00-05:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 4, 2, 15, 0).unwrap());
    }

    #[test]
    fn test_time_only_defaults_to_today() {
        let now = Utc.with_ymd_and_hms(2021, 7, 1, 12, 0, 0).unwrap();
        let parsed = parse_fuzzy("10:30 am", now).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 7, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_fuzzy_errors() {
        let now = Utc::now();
        assert_eq!(
            parse_fuzzy("not a date", now),
            Err(TimeParseError::UnknownToken("not".to_string()))
        );
        assert_eq!(parse_fuzzy("at on", now), Err(TimeParseError::NoDate));
        assert_eq!(parse_fuzzy("february 30 2020", now), Err(TimeParseError::OutOfRange));
        assert_eq!(parse_fuzzy("25:00", now), Err(TimeParseError::OutOfRange));
    }
}
