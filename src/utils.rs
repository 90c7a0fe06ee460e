// Utility functions
use chrono::{DateTime, Utc};

/// Suffix used in export file names, e.g. `20240131_154500`.
pub fn file_stamp(at: &DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats with thousands separators: `1234567.891` -> `1,234,567.89`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn format_price(price: f64) -> String {
    if price.abs() < 1.0 {
        format!("${:.6}", price)
    } else {
        format!("${}", format_thousands(price, 2))
    }
}

/// Compact money: `$1.23T`, `$45.60B`, `$7.00M`.
pub fn format_compact_usd(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, unit) in UNITS {
        if value.abs() >= scale {
            return format!("${:.2}{}", value / scale, unit);
        }
    }
    format!("${:.2}", value)
}

pub fn format_change(change: f64) -> String {
    format!("{:+.2}%", change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 15, 45, 0).unwrap();
        assert_eq!(file_stamp(&at), "20240131_154500");
    }

    #[test]
    fn thousands() {
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(999.0, 0), "999");
        assert_eq!(format_thousands(-1000.5, 1), "-1,000.5");
    }

    #[test]
    fn money_and_change() {
        assert_eq!(format_price(0.5), "$0.500000");
        assert_eq!(format_price(64250.1), "$64,250.10");
        assert_eq!(format_compact_usd(1.25e12), "$1.25T");
        assert_eq!(format_compact_usd(512.0), "$512.00");
        assert_eq!(format_change(-1.234), "-1.23%");
        assert_eq!(format_change(2.0), "+2.00%");
    }
}
