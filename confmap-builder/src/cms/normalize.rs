///! Raw CMS entries -> map-ready conference records

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use confmap_common::ConferenceRecord;
use serde::{Deserialize, Serialize};

use super::types::RawConference;

/// How the conference date is shown in the popup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// As delivered by the CMS
    #[default]
    Raw,
    /// "in 3 months", "2 days ago"
    Relative,
}

/// Accepts RFC 3339, a naive ISO timestamp, or a bare date. Naive values are UTC.
fn parse_cms_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn plural(n: i64, one: &str, unit: &str) -> String {
    if n <= 1 {
        one.to_string()
    } else {
        format!("{} {}", n, unit)
    }
}

/// Human distance between `target` and `now`, using the usual
/// "a few seconds" .. "N years" buckets.
pub fn format_relative(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = target.signed_duration_since(now);
    let future = delta.num_milliseconds() > 0;

    let seconds = (delta.num_milliseconds().abs() as f64 / 1000.0).round();
    let minutes = (seconds / 60.0).round();
    let hours = (minutes / 60.0).round();
    let days = (hours / 24.0).round();

    let text = if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        plural(minutes as i64, "a minute", "minutes")
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        plural(hours as i64, "an hour", "hours")
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        plural(days as i64, "a day", "days")
    } else if days < 46.0 {
        "a month".to_string()
    } else if days < 320.0 {
        plural((days / 30.4).round() as i64, "a month", "months")
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        plural((days / 365.0).round() as i64, "a year", "years")
    };

    if future {
        format!("in {}", text)
    } else {
        format!("{} ago", text)
    }
}

fn display_date(raw: &str, style: DateStyle, now: DateTime<Utc>) -> String {
    match style {
        DateStyle::Raw => raw.to_string(),
        DateStyle::Relative => match parse_cms_date(raw) {
            Some(date) => format_relative(date, now),
            None => {
                tracing::debug!("Unparseable conference date '{}', keeping as-is", raw);
                raw.to_string()
            }
        },
    }
}

/// Convert CMS entries in order. Missing or garbage coordinates become NaN so
/// the record stays in the list but is not renderable.
pub fn normalize_records(
    raw: Vec<RawConference>,
    style: DateStyle,
    now: DateTime<Utc>,
) -> Vec<ConferenceRecord> {
    raw.into_iter()
        .map(|item| {
            let lat = item.lat.as_ref().map_or(f64::NAN, |c| c.as_f64());
            let lng = item.lng.as_ref().map_or(f64::NAN, |c| c.as_f64());
            ConferenceRecord {
                date: display_date(&item.date, style, now),
                title: item.title,
                location: item.location,
                lat,
                lng,
                conference_url: item.conference_url,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::types::Coordinate;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_relative_buckets() {
        let now = now();
        let cases = [
            (Duration::seconds(10), "in a few seconds"),
            (Duration::seconds(-60), "a minute ago"),
            (Duration::minutes(10), "in 10 minutes"),
            (Duration::minutes(-60), "an hour ago"),
            (Duration::hours(5), "in 5 hours"),
            (Duration::hours(30), "in a day"),
            (Duration::days(-3), "3 days ago"),
            (Duration::days(30), "in a month"),
            (Duration::days(92), "in 3 months"),
            (Duration::days(400), "in a year"),
            (Duration::days(-800), "2 years ago"),
        ];
        for (offset, expected) in cases {
            assert_eq!(format_relative(now + offset, now), expected, "offset {:?}", offset);
        }
    }

    #[test]
    fn test_parse_cms_date_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 6, 13, 0, 0, 0).unwrap();
        assert_eq!(parse_cms_date("2026-06-13T00:00:00"), Some(expected));
        assert_eq!(parse_cms_date("2026-06-13T00:00:00Z"), Some(expected));
        assert_eq!(parse_cms_date("2026-06-13"), Some(expected));
        assert_eq!(parse_cms_date("next summer"), None);
    }

    #[test]
    fn test_normalize_records() {
        let raw = vec![
            RawConference {
                title: "React Summit".to_string(),
                location: "Amsterdam".to_string(),
                lat: Some(Coordinate::Text("52.3676".to_string())),
                lng: Some(Coordinate::Number(4.9041)),
                date: "2026-10-19T12:00:00".to_string(),
                conference_url: "https://reactsummit.com".to_string(),
            },
            RawConference {
                title: "Nowhere Conf".to_string(),
                location: "".to_string(),
                lat: None,
                lng: Some(Coordinate::Text("east".to_string())),
                date: "soon".to_string(),
                conference_url: "".to_string(),
            },
        ];

        let records = normalize_records(raw, DateStyle::Relative, now());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lat, 52.3676);
        assert_eq!(records[0].date, "in 3 days");
        assert!(records[0].is_renderable());
        assert_eq!(records[1].date, "soon");
        assert!(!records[1].is_renderable());
    }

    #[test]
    fn test_raw_style_keeps_date() {
        let raw = vec![RawConference {
            title: "T".to_string(),
            location: "L".to_string(),
            lat: Some(Coordinate::Number(1.0)),
            lng: Some(Coordinate::Number(2.0)),
            date: "2026-06-13T00:00:00".to_string(),
            conference_url: "https://example.com".to_string(),
        }];
        let records = normalize_records(raw, DateStyle::Raw, now());
        assert_eq!(records[0].date, "2026-06-13T00:00:00");
    }
}
