// Turns display text from the market table into numbers.

fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '$' | ',' | '+'))
        .collect()
}

/// Parses `$1,234.56`, `$12.5B`, `980K` into a plain USD amount.
pub fn parse_money(text: &str) -> Option<f64> {
    let cleaned = clean(text);
    let last = cleaned.chars().last()?;
    let (number, scale) = match last.to_ascii_uppercase() {
        'K' => (&cleaned[..cleaned.len() - 1], 1e3),
        'M' => (&cleaned[..cleaned.len() - 1], 1e6),
        'B' => (&cleaned[..cleaned.len() - 1], 1e9),
        'T' => (&cleaned[..cleaned.len() - 1], 1e12),
        _ => (cleaned.as_str(), 1.0),
    };
    let value = number.parse::<f64>().ok()? * scale;
    value.is_finite().then_some(value)
}

/// Market cap cells may render both `$1.2T` and `$1,234,567,890`; the full value wins.
pub fn parse_market_cap(text: &str) -> Option<f64> {
    let segments: Vec<&str> = text
        .split('$')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    segments
        .iter()
        .find(|s| s.ends_with(|c: char| c.is_ascii_digit()))
        .or_else(|| segments.first())
        .and_then(|s| parse_money(s))
}

/// Parses `1.25%`, `-0.4 %`. `negative` flips an unsigned value (caret-down icons).
pub fn parse_percent(text: &str, negative: bool) -> Option<f64> {
    let cleaned: String = clean(text).chars().filter(|&c| c != '%').collect();
    let value = cleaned.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    if negative && value > 0.0 {
        Some(-value)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_plain_and_suffixed() {
        assert_eq!(parse_money("$64,250.12"), Some(64250.12));
        assert_eq!(parse_money(" $0.9998 "), Some(0.9998));
        assert_eq!(parse_money("$12.5B"), Some(12.5e9));
        assert_eq!(parse_money("980k"), Some(980_000.0));
        assert_eq!(parse_money("--"), None);
        // overflows to infinity once the suffix is applied
        assert_eq!(parse_money("9e307T"), None);
        assert_eq!(parse_money(""), None);
    }

    #[test]
    fn market_cap_prefers_full_value() {
        assert_eq!(
            parse_market_cap("$1.27T$1,269,870,123,456"),
            Some(1_269_870_123_456.0)
        );
        assert_eq!(parse_market_cap("$45.5B"), Some(45.5e9));
        assert_eq!(parse_market_cap("n/a"), None);
        assert_eq!(parse_market_cap("$9e307T"), None);
    }

    #[test]
    fn percent_sign_handling() {
        assert_eq!(parse_percent("1.25%", false), Some(1.25));
        assert_eq!(parse_percent("1.25%", true), Some(-1.25));
        assert_eq!(parse_percent("-0.40 %", false), Some(-0.4));
        assert_eq!(parse_percent("+3%", false), Some(3.0));
        assert_eq!(parse_percent("%", false), None);
    }
}
