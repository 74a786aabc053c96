//! Number and date formatting for stat cards, tables and chart labels

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const COMPACT_UNITS: [&str; 5] = ["", "K", "M", "B", "T"];

/// `value` with exactly `decimals` fraction digits and `,` thousands separators.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (fixed.as_str(), None),
    };
    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Short form with a K/M/B/T suffix and at most `decimals` fraction digits.
pub fn format_compact(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let mut scaled = value.abs();
    let mut unit = 0;
    while scaled >= 1000.0 && unit < COMPACT_UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }
    let mut rendered = trim_fraction(format!("{:.*}", decimals, scaled));
    // Rounding can produce "1000" of the current unit.
    if rendered == "1000" && unit < COMPACT_UNITS.len() - 1 {
        unit += 1;
        rendered = "1".to_string();
    }
    if rendered == "0" {
        return rendered;
    }
    format!("{}{}{}", sign, rendered, COMPACT_UNITS[unit])
}

/// Percentage with one decimal, as used by share and margin columns.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}

/// Backend timestamp as UTC. Naive values are taken to be UTC already.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "5 minutes ago" style age of `raw`; unparseable input is returned as is.
pub fn format_relative(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let elapsed = now - then;
    if elapsed.num_seconds() < 0 {
        return "just now".to_string();
    }
    let (count, unit) = match elapsed.num_seconds() {
        0..60 => return "just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 86_400 * 30 => (s / 86_400, "day"),
        s if s < 86_400 * 365 => (s / (86_400 * 30), "month"),
        s => (s / (86_400 * 365), "year"),
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{} ago", count, unit, plural)
}

/// Absolute date and time, e.g. "Jan 5, 2025, 3:04 PM".
pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%b %-d, %Y, %-I:%M %p").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Calendar date only, e.g. "Jan 5, 2025".
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1234567.0, 0), "1,234,567");
        assert_eq!(format_number(1234.5, 2), "1,234.50");
        assert_eq!(format_number(-98765.432, 1), "-98,765.4");
        assert_eq!(format_number(-0.01, 0), "0");
        assert_eq!(format_number(f64::NAN, 2), "0");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(950.0, 1), "950");
        assert_eq!(format_compact(1234.0, 1), "1.2K");
        assert_eq!(format_compact(1000.0, 1), "1K");
        assert_eq!(format_compact(2_500_000.0, 1), "2.5M");
        assert_eq!(format_compact(3_210_000_000.0, 2), "3.21B");
        assert_eq!(format_compact(999_999.0, 1), "1M");
        assert_eq!(format_compact(999.99, 1), "1K");
        assert_eq!(format_compact(-4200.0, 1), "-4.2K");
        assert_eq!(format_compact(f64::NAN, 1), "0");
    }

    #[test]
    fn test_relative_dates() {
        let now = parse_timestamp("2025-03-10T12:00:00Z").unwrap();
        assert_eq!(format_relative("2025-03-10T11:59:30", now), "just now");
        assert_eq!(format_relative("2025-03-10T11:55:00", now), "5 minutes ago");
        assert_eq!(format_relative("2025-03-10T11:00:00+00:00", now), "1 hour ago");
        assert_eq!(format_relative("2025-03-07", now), "3 days ago");
        assert_eq!(format_relative("2024-01-01T00:00:00", now), "1 year ago");
        assert_eq!(format_relative("not a date", now), "not a date");
    }

    #[test]
    fn test_absolute_dates() {
        assert_eq!(format_date_time("2025-01-05T15:04:00.123"), "Jan 5, 2025, 3:04 PM");
        assert_eq!(format_date("2025-01-05"), "Jan 5, 2025");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.345), "12.3%");
    }
}
