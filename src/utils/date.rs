//! Date parsing and pattern helpers.
//!
//! Item dates arrive as free-form front-matter strings; bucket keys are
//! rendered from strftime patterns like `"%Y/%m/%d"`, where each
//! `/`-separated segment adds one level to the date hierarchy.

use chrono::format::{Fixed, Item, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Datetime formats tried after RFC 3339 fails.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse an item date string.
///
/// Accepts RFC 3339 (`"2017-03-05T12:30:00Z"`), a bare datetime, or a bare
/// date. Returns `None` for anything else; callers treat unparsable dates
/// as undated rather than failing the run.
pub fn parse_item_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Render a date with a strftime pattern.
///
/// Returns `None` when the pattern itself is invalid, so a bad
/// `date_format` degrades to "no date" instead of aborting mid-run.
pub fn format_date(date: &NaiveDateTime, pattern: &str) -> Option<String> {
    let items = checked_items(pattern)?;
    Some(date.format_with_items(items.into_iter()).to_string())
}

/// Cumulative prefixes of a `/`-separated pattern.
///
/// `"%Y/%m/%d"` → `["%Y", "%Y/%m", "%Y/%m/%d"]`.
pub fn hierarchy_prefixes(pattern: &str) -> Vec<String> {
    let segments: Vec<&str> = pattern.split('/').collect();
    (1..=segments.len())
        .map(|depth| segments[..depth].join("/"))
        .collect()
}

/// Render every cumulative bucket key for a date.
///
/// `2017-03-05` under `"%Y/%m"` → `["2017", "2017/03"]`.
pub fn segment_keys(date: &NaiveDateTime, pattern: &str) -> Vec<String> {
    hierarchy_prefixes(pattern)
        .iter()
        .filter_map(|prefix| format_date(date, prefix))
        .collect()
}

/// Strictly parse a bucket key against a full pattern.
///
/// The key must consume the entire pattern. Month and day default to the
/// first when the pattern does not cover them; the year always has to come
/// from the key itself. Partial keys (a `"%Y"`-shaped key under a
/// `"%Y/%m"` pattern) fail.
pub fn parse_bucket_key(key: &str, pattern: &str) -> Option<NaiveDate> {
    let items = checked_items(pattern)?;
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, key, items.iter()).ok()?;

    // Conflicting (already parsed) fields keep their value from the key.
    let _ = parsed.set_month(1);
    let _ = parsed.set_day(1);

    parsed.to_naive_date().ok()
}

/// Collect a pattern into format items, rejecting invalid specifiers.
/// Offset specifiers are rejected too since item dates carry no zone.
fn checked_items(pattern: &str) -> Option<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    let ok = items.iter().all(|item| match item {
        Item::Error => false,
        Item::Fixed(fixed) => !matches!(
            fixed,
            Fixed::TimezoneName
                | Fixed::TimezoneOffset
                | Fixed::TimezoneOffsetColon
                | Fixed::TimezoneOffsetColonZ
                | Fixed::TimezoneOffsetDoubleColon
                | Fixed::TimezoneOffsetTripleColon
                | Fixed::TimezoneOffsetZ
        ),
        _ => true,
    });
    ok.then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_item_date_rfc3339() {
        let parsed = parse_item_date("2017-03-05T12:30:00Z").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2017, 3, 5).unwrap());

        // Offset variants normalize to UTC
        let parsed = parse_item_date("2017-03-05T01:00:00+02:00").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2017, 3, 4).unwrap());
    }

    #[test]
    fn test_parse_item_date_bare_date() {
        assert_eq!(parse_item_date("2017-03-05"), Some(date(2017, 3, 5)));
        assert_eq!(parse_item_date("  2017-03-05  "), Some(date(2017, 3, 5)));
    }

    #[test]
    fn test_parse_item_date_bare_datetime() {
        let parsed = parse_item_date("2017-03-05T12:30:00").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2017, 3, 5).unwrap());

        let parsed = parse_item_date("2017-03-05 12:30:00").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2017, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_item_date_invalid() {
        assert_eq!(parse_item_date("next tuesday"), None);
        assert_eq!(parse_item_date("2017-13-05"), None);
        assert_eq!(parse_item_date(""), None);
    }

    #[test]
    fn test_format_date() {
        let d = date(2017, 3, 5);
        assert_eq!(format_date(&d, "%Y/%m/%d"), Some("2017/03/05".into()));
        assert_eq!(format_date(&d, "%Y"), Some("2017".into()));
        assert_eq!(format_date(&d, "%Y-%b"), Some("2017-Mar".into()));
    }

    #[test]
    fn test_format_date_invalid_pattern() {
        let d = date(2017, 3, 5);
        assert_eq!(format_date(&d, "%Q"), None);
        assert_eq!(format_date(&d, "%Y/%"), None);
    }

    #[test]
    fn test_format_date_rejects_offset_specifiers() {
        let d = date(2017, 3, 5);
        assert_eq!(format_date(&d, "%Y %z"), None);
        assert_eq!(format_date(&d, "%Z"), None);
    }

    #[test]
    fn test_hierarchy_prefixes() {
        assert_eq!(
            hierarchy_prefixes("%Y/%m/%d"),
            vec!["%Y", "%Y/%m", "%Y/%m/%d"]
        );
        assert_eq!(hierarchy_prefixes("%Y"), vec!["%Y"]);
    }

    #[test]
    fn test_segment_keys() {
        let d = date(2017, 3, 5);
        assert_eq!(segment_keys(&d, "%Y/%m"), vec!["2017", "2017/03"]);
        assert_eq!(segment_keys(&d, "%Y"), vec!["2017"]);
    }

    #[test]
    fn test_parse_bucket_key_full_depth() {
        assert_eq!(
            parse_bucket_key("2017/03/05", "%Y/%m/%d"),
            NaiveDate::from_ymd_opt(2017, 3, 5)
        );
    }

    #[test]
    fn test_parse_bucket_key_defaults_month_and_day() {
        assert_eq!(
            parse_bucket_key("2017", "%Y"),
            NaiveDate::from_ymd_opt(2017, 1, 1)
        );
        assert_eq!(
            parse_bucket_key("2017/03", "%Y/%m"),
            NaiveDate::from_ymd_opt(2017, 3, 1)
        );
    }

    #[test]
    fn test_parse_bucket_key_rejects_partial_keys() {
        // A year-only key never satisfies a deeper pattern
        assert_eq!(parse_bucket_key("2017", "%Y/%m"), None);
        assert_eq!(parse_bucket_key("2017/03", "%Y/%m/%d"), None);
        // Trailing garbage is rejected too
        assert_eq!(parse_bucket_key("2017/03", "%Y"), None);
    }

    #[test]
    fn test_parse_bucket_key_rejects_non_dates() {
        assert_eq!(parse_bucket_key("tags", "%Y"), None);
        assert_eq!(parse_bucket_key("2017/13", "%Y/%m"), None);
        assert_eq!(parse_bucket_key("", "%Y"), None);
    }
}
