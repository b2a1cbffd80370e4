//! Common utilities and helper functions
//!
//! Key standardization and the lenient field parsers shared by the schedule
//! normalizer and the order ingestors.

pub mod error;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Standardize a join-key component: trim surrounding whitespace and upper-case
pub fn standardize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Standardize an optional key component, mapping blank values to `None`
pub fn standardize_optional_key(value: Option<&str>) -> Option<String> {
    value
        .map(standardize_key)
        .filter(|standardized| !standardized.is_empty())
}

/// Naive layouts tried after RFC 3339, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a forecast timestamp leniently
///
/// Accepts RFC 3339, ISO-8601 without seconds or without an offset, a bare
/// date, and the day-first layout used by Brazilian terminals. Values without
/// an offset are taken as UTC. Returns `None` for anything else.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    // "2025-01-10T10:00Z" is valid ISO-8601 but not RFC 3339
    let naive = value.strip_suffix('Z').unwrap_or(value);

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|midnight| Utc.from_utc_datetime(&midnight));
        }
    }

    None
}

/// Parse a quantity leniently
///
/// Accepts plain decimals (`300`, `300.5`) and separated layouts where the
/// right-most of `,`/`.` is the decimal mark and the other one groups
/// thousands (`300,5`, `1.234,5`, `1,234.5`). Thousands groups must be
/// exactly three digits; anything ambiguous or non-finite yields `None`.
pub fn parse_quantity(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = match value.parse::<f64>() {
        Ok(parsed) => parsed,
        Err(_) if value.contains(',') => parse_separated(value)?,
        Err(_) => return None,
    };

    parsed.is_finite().then_some(parsed)
}

fn parse_separated(value: &str) -> Option<f64> {
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };

    let decimal_at = digits.rfind([',', '.'])?;
    let decimal = digits[decimal_at..].chars().next()?;
    let thousands = if decimal == ',' { '.' } else { ',' };
    let (integer, fraction) = (&digits[..decimal_at], &digits[decimal_at + 1..]);

    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(fraction) {
        return None;
    }

    let mut groups = integer.split(thousands);
    let lead = groups.next()?;
    let grouped = integer.contains(thousands);
    if !all_digits(lead) || (grouped && lead.len() > 3) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && all_digits(group)) {
        return None;
    }

    format!("{sign}{}.{fraction}", integer.replace(thousands, ""))
        .parse::<f64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_key() {
        assert_eq!(standardize_key(" msc bruna "), "MSC BRUNA");
        assert_eq!(standardize_key("123e"), "123E");
    }

    #[test]
    fn test_standardize_optional_key_blank() {
        assert_eq!(standardize_optional_key(Some("   ")), None);
        assert_eq!(standardize_optional_key(None), None);
        assert_eq!(standardize_optional_key(Some(" 9a ")), Some("9A".to_string()));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 12, 8, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-01-12T08:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-12T08:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-12T08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-12T05:00:00-03:00"), Some(expected));
        assert_eq!(parse_timestamp("12/01/2025 08:00"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 12, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-01-12"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert_eq!(parse_timestamp("a confirmar"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("300"), Some(300.0));
        assert_eq!(parse_quantity(" 300.5 "), Some(300.5));
        assert_eq!(parse_quantity("300,5"), Some(300.5));
        assert_eq!(parse_quantity("1.234,5"), Some(1234.5));
        assert_eq!(parse_quantity("trezentos"), None);
        assert_eq!(parse_quantity("NaN"), None);
    }

    #[test]
    fn test_parse_quantity_thousands_separators() {
        assert_eq!(parse_quantity("1,234.5"), Some(1234.5));
        assert_eq!(parse_quantity("1.234,5"), Some(1234.5));
        assert_eq!(parse_quantity("1.234.567,89"), Some(1_234_567.89));
        assert_eq!(parse_quantity("12,345,678.5"), Some(12_345_678.5));
        assert_eq!(parse_quantity("-1.500,00"), Some(-1500.0));
        assert_eq!(parse_quantity("1500,25"), Some(1500.25));
    }

    #[test]
    fn test_parse_quantity_ambiguous_is_none() {
        assert_eq!(parse_quantity("1,2,3"), None);
        assert_eq!(parse_quantity("12,34.5"), None);
        assert_eq!(parse_quantity("1.23,5"), None);
        assert_eq!(parse_quantity("1234.567,5"), None);
        assert_eq!(parse_quantity("300,"), None);
        assert_eq!(parse_quantity(",5"), None);
    }
}
