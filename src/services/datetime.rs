use crate::cli::DateTimeMode;
use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

fn strict_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("static timestamp pattern")
    })
}

/// Strict mode: `YYYY-MM-DDTHH:MM:SSZ` naming a real instant. No offsets other
/// than the literal `Z`, no fractional seconds.
pub fn is_timestamp(s: &str, mode: DateTimeMode) -> bool {
    match mode {
        DateTimeMode::Strict => {
            strict_shape().is_match(s)
                && NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ").is_ok()
        }
        DateTimeMode::Rfc3339 => DateTime::parse_from_rfc3339(s).is_ok(),
    }
}

pub fn describe(mode: DateTimeMode) -> &'static str {
    match mode {
        DateTimeMode::Strict => "a UTC timestamp shaped YYYY-MM-DDTHH:MM:SSZ",
        DateTimeMode::Rfc3339 => "an RFC 3339 timestamp",
    }
}
