use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// A kickoff timestamp that could not be parsed. Recoverable: the matcher
/// skips the affected event instead of aborting the run.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unparseable kickoff timestamp: {raw:?}")]
pub struct KickoffParseError {
    pub raw: String,
}

/// Normalize the ISO-8601 variants the bookmaker APIs emit to a canonical
/// form with a `Z` suffix: `2025-03-01T19:00:00Z`.
///
/// Handles space separators, explicit `+00:00`/`+0000` offsets (with or
/// without fractional seconds) and a lowercase `z`.
pub fn normalize_iso_datetime(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut s = raw.replace(' ', "T");
    for offset in ["+00:00", "+0000"] {
        if let Some(stripped) = s.strip_suffix(offset) {
            s = format!("{}Z", trim_fractional_seconds(stripped));
            break;
        }
    }
    if s.ends_with('z') {
        s.pop();
        s.push('Z');
    }
    s
}

fn trim_fractional_seconds(s: &str) -> &str {
    if let Some(dot) = s.rfind('.') {
        let frac = &s[dot + 1..];
        if !frac.is_empty() && frac.len() <= 6 && frac.bytes().all(|b| b.is_ascii_digit()) {
            return &s[..dot];
        }
    }
    s
}

/// Parse a (normalized or raw) kickoff string to `DateTime<Utc>`.
/// Timestamps without an offset are taken as UTC.
pub fn parse_kickoff(raw: &str) -> Result<DateTime<Utc>, KickoffParseError> {
    let normalized = normalize_iso_datetime(raw);
    let naive = normalized.strip_suffix('Z').unwrap_or(&normalized);

    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(dt.and_utc());
        }
    }
    Err(KickoffParseError {
        raw: raw.to_string(),
    })
}

/// True when the two instants are at most `minutes` apart.
pub fn within_time_window(a: DateTime<Utc>, b: DateTime<Utc>, minutes: i64) -> bool {
    (a - b).num_seconds().abs() <= minutes * 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalize_handles_offset_forms() {
        assert_eq!(
            normalize_iso_datetime("2025-03-01T19:00:00+00:00"),
            "2025-03-01T19:00:00Z"
        );
        assert_eq!(
            normalize_iso_datetime("2025-03-01T19:00:00.123456+00:00"),
            "2025-03-01T19:00:00Z"
        );
        assert_eq!(
            normalize_iso_datetime("2025-03-01T19:00:00+0000"),
            "2025-03-01T19:00:00Z"
        );
    }

    #[test]
    fn normalize_handles_space_separator_and_lowercase_z() {
        assert_eq!(
            normalize_iso_datetime("2025-03-01 19:00:00z"),
            "2025-03-01T19:00:00Z"
        );
    }

    #[test]
    fn normalize_leaves_canonical_input_alone() {
        assert_eq!(
            normalize_iso_datetime("2025-03-01T19:00:00Z"),
            "2025-03-01T19:00:00Z"
        );
        assert_eq!(normalize_iso_datetime(""), "");
    }

    #[test]
    fn parse_accepts_z_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap();
        assert_eq!(parse_kickoff("2025-03-01T19:00:00Z").unwrap(), expected);
        assert_eq!(parse_kickoff("2025-03-01T19:00:00").unwrap(), expected);
        assert_eq!(parse_kickoff("2025-03-01T19:00").unwrap(), expected);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_kickoff("not a date").unwrap_err();
        assert_eq!(err.raw, "not a date");
    }

    #[test]
    fn time_window_is_inclusive() {
        let a = Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 3, 1, 19, 12, 0).unwrap();
        let c = Utc.with_ymd_and_hms(2025, 3, 1, 19, 12, 1).unwrap();
        assert!(within_time_window(a, b, 12));
        assert!(within_time_window(b, a, 12));
        assert!(!within_time_window(a, c, 12));
    }
}
