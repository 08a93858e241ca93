use chrono::{DateTime, SecondsFormat, Utc};

/// Shown instead of an amount that is not a finite number.
pub const INVALID_AMOUNT: &str = "—";

/// Format an amount as whole US dollars: `$124,500`, `-$1,200`.
///
/// Rounds half away from zero. The sign follows the unrounded value, so
/// `-0.4` reads `-$0`; a zero result (`0.0` or `-0.0`) reads `$0`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        log::warn!("Cannot format non-finite amount {}", value);
        return INVALID_AMOUNT.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if value < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO-8601 UTC timestamp with millisecond precision (`2024-12-05T14:30:00.000Z`).
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar date part of a UTC instant (`2024-12-05`).
pub fn iso_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Form fields left blank are stored as absent.
pub fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(124500.0), "$124,500");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(0.0), "$0");
    }

    #[test]
    fn test_format_currency_rounds_to_whole_dollars() {
        assert_eq!(format_currency(27000.5), "$27,001");
        assert_eq!(format_currency(1234.49), "$1,234");
        assert_eq!(format_currency(-1200.0), "-$1,200");
    }

    #[test]
    fn test_format_currency_edge_values() {
        assert_eq!(format_currency(-0.4), "-$0");
        assert_eq!(format_currency(-0.0), "$0");
        assert_eq!(format_currency(f64::INFINITY), INVALID_AMOUNT);
        assert_eq!(format_currency(f64::MAX * 2.0), INVALID_AMOUNT);
        assert_eq!(format_currency(f64::NAN), INVALID_AMOUNT);
    }

    #[test]
    fn test_iso_timestamp_millis() {
        let at = Utc.with_ymd_and_hms(2024, 12, 5, 14, 30, 0).unwrap();
        assert_eq!(iso_timestamp(at), "2024-12-05T14:30:00.000Z");
        assert_eq!(iso_date(at), "2024-12-05");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty("Acme"), Some("Acme".to_string()));
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Acme Corporation", "acme"));
        assert!(contains_ignore_case("Acme", ""));
        assert!(!contains_ignore_case("Acme", "globex"));
    }
}
