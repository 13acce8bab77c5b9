//! Parsing and formatting of localized currency strings.
//!
//! Listing prices are stored as the user typed them, in pt-BR notation
//! (`"150.000,00"`): dots group thousands, the comma is the decimal
//! separator. Filtering and sorting need the numeric value back.

/// Parse a localized currency string into its numeric value.
///
/// Every character except digits and the decimal comma is discarded, so
/// `"R$ 150.000,00"` and `"150000,00"` both parse to `150000.0`. Input
/// with no digits yields `None`.
#[must_use]
pub fn parse_currency(value: &str) -> Option<f64> {
    let filtered: String = value.chars().filter(|c| c.is_ascii_digit() || *c == ',').collect();
    if !filtered.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    // First comma is the decimal separator; anything after a second comma
    // is malformed and ignored.
    let normalized = match filtered.split_once(',') {
        Some((int_part, rest)) => {
            let frac: String = rest.chars().take_while(char::is_ascii_digit).collect();
            format!("{int_part}.{frac}")
        }
        None => filtered,
    };

    normalized.parse::<f64>().ok()
}

/// Format a numeric value as a pt-BR currency string, e.g. `R$ 180.000,00`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouped_value() {
        assert_eq!(parse_currency("150.000,00"), Some(150_000.0));
        assert_eq!(parse_currency("R$ 1.234,56"), Some(1234.56));
    }

    #[test]
    fn test_parse_plain_values() {
        assert_eq!(parse_currency("1000"), Some(1000.0));
        assert_eq!(parse_currency("99,9"), Some(99.9));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("a combinar"), None);
        assert_eq!(parse_currency("R$ ,"), None);
    }

    #[test]
    fn test_parse_ignores_trailing_garbage() {
        // Only the first comma is the decimal separator.
        assert_eq!(parse_currency("1,2,3"), Some(1.2));
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_currency(180_000.0), "R$ 180.000,00");
        assert_eq!(format_currency(1_234_567.89), "R$ 1.234.567,89");
    }

    #[test]
    fn test_format_small_values() {
        assert_eq!(format_currency(0.5), "R$ 0,50");
        assert_eq!(format_currency(10.0), "R$ 10,00");
    }

    #[test]
    fn test_round_trip() {
        let price = parse_currency("150.000,00").unwrap();
        assert_eq!(format_currency(price), "R$ 150.000,00");
    }
}
