use chrono::NaiveDate;

use crate::types::Orientation;

const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parses a decimal written with either `,` or `.` as the decimal separator,
/// optionally with thousands separators, a currency prefix or a unit suffix.
pub fn parse_decimal(raw: &str) -> f64 {
    let trimmed = raw
        .trim()
        .trim_start_matches('$')
        .trim_end_matches(|c: char| {
            c.is_alphabetic() || c == '²' || c == '%' || c.is_whitespace()
        });
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let normalized = normalize_separators(&cleaned);
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn normalize_separators(s: &str) -> String {
    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');
    match (last_comma, last_dot) {
        (Some(c), Some(d)) => {
            let (decimal, thousands) = if c > d { (',', '.') } else { ('.', ',') };
            s.chars()
                .filter(|ch| *ch != thousands)
                .map(|ch| if ch == decimal { '.' } else { ch })
                .collect()
        }
        (Some(_), None) => {
            if s.matches(',').count() == 1 {
                s.replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        (None, Some(_)) => {
            if s.matches('.').count() == 1 {
                s.to_string()
            } else {
                s.replace('.', "")
            }
        }
        (None, None) => s.to_string(),
    }
}

/// Whole-number field: truncates toward zero, negatives become 0.
pub fn parse_count(raw: &str) -> u32 {
    let v = parse_decimal(raw);
    if v <= 0.0 {
        0
    } else if v >= u32::MAX as f64 {
        u32::MAX
    } else {
        v.trunc() as u32
    }
}

pub fn parse_billing_days(raw: &str, default_days: u32) -> u32 {
    let v = parse_decimal(raw);
    let days = if v > 0.0 { v.trunc() as u32 } else { default_days };
    days.max(1)
}

pub fn parse_orientation(raw: &str) -> Orientation {
    if raw.trim().eq_ignore_ascii_case("landscape") {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Length of a billing period counting both the first and the last day.
pub fn billing_days_between(start: &str, end: &str, default_days: u32) -> u32 {
    match (parse_date(start), parse_date(end)) {
        (Some(s), Some(e)) if e >= s => (e - s).num_days() as u32 + 1,
        _ => {
            log::warn!(
                "billing period '{}'..'{}' is not a valid date range, using {} days",
                start,
                end,
                default_days
            );
            default_days
        }
    }
}

/// Half-up rounding on the fractional part left after truncation.
pub fn round_special(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let whole = value.trunc();
    let fraction = value - whole;
    if fraction >= 0.5 {
        whole as i64 + 1
    } else {
        whole as i64
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_resolve_to_the_last_one() {
        assert_eq!(normalize_separators("1.234,5"), "1234.5");
        assert_eq!(normalize_separators("1,234.5"), "1234.5");
        assert_eq!(normalize_separators("1,234,567"), "1234567");
        assert_eq!(normalize_separators("1.234.567"), "1234567");
        assert_eq!(normalize_separators("6,5"), "6.5");
    }
}
