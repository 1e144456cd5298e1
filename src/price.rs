//! Price coercion.

use rust_decimal::Decimal;
use serde_json::Number;
use std::str::FromStr;

/// Exponents past this are out of range (positive) or round to zero
/// (negative) for any mantissa a `Decimal` can hold.
const MAX_EXPONENT: i64 = 64;

/// Parses a price from text, or fails.
///
/// Accepts plain decimal notation (`12.50`, `-3`) and scientific notation
/// (`1.5e2`), with surrounding whitespace ignored. A single `_` is allowed
/// between two digits. Currency symbols, thousands separators, `NaN`,
/// infinities and values outside the `Decimal` range are rejected.
///
/// Digits beyond the 28 fractional places a `Decimal` carries are rounded,
/// whichever notation the value is written in.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() || !underscores_between_digits(text) {
        return None;
    }
    Decimal::from_str(text)
        .ok()
        .or_else(|| parse_scientific(text))
}

fn underscores_between_digits(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    })
}

/// Rewrites `<mantissa>e<exponent>` as plain decimal text so it goes through
/// the same parser, and the same rounding, as any other price.
fn parse_scientific(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = text.split_once(|c| c == 'e' || c == 'E')?;
    let mantissa = Decimal::from_str(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    if mantissa.is_zero() {
        return Some(Decimal::ZERO);
    }
    if exponent > MAX_EXPONENT {
        return None;
    }
    if exponent < -MAX_EXPONENT {
        return Some(Decimal::ZERO);
    }

    let digits = mantissa.mantissa().unsigned_abs().to_string();
    let shift = exponent - i64::from(mantissa.scale());
    let mut plain = String::new();
    if mantissa.is_sign_negative() {
        plain.push('-');
    }
    if shift >= 0 {
        plain.push_str(&digits);
        plain.push_str(&"0".repeat(shift.unsigned_abs() as usize));
    } else {
        let fraction = shift.unsigned_abs() as usize;
        if fraction >= digits.len() {
            plain.push_str("0.");
            plain.push_str(&"0".repeat(fraction - digits.len()));
            plain.push_str(&digits);
        } else {
            let (whole, frac) = digits.split_at(digits.len() - fraction);
            plain.push_str(whole);
            plain.push('.');
            plain.push_str(frac);
        }
    }
    Decimal::from_str(&plain).ok()
}

/// Native JSON numbers go through the same parser via their canonical text,
/// so `12.5` and `"12.5"` always coerce to the same value.
pub fn number_to_price(number: &Number) -> Option<Decimal> {
    parse_price(&number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plain_decimal() {
        assert_eq!(parse_price("12.50"), Some(dec!(12.50)));
        assert_eq!(parse_price("10"), Some(dec!(10)));
        assert_eq!(parse_price("0"), Some(dec!(0)));
        assert_eq!(parse_price("-3.25"), Some(dec!(-3.25)));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(parse_price("  7.5\n"), Some(dec!(7.5)));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_price("1.5e2"), Some(dec!(150)));
    }

    #[test]
    fn test_rejects_non_numeric_text() {
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("   "), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn test_rejects_currency_and_separators() {
        assert_eq!(parse_price("$12.50"), None);
        assert_eq!(parse_price("12.50 EUR"), None);
        assert_eq!(parse_price("1,000.00"), None);
    }

    #[test]
    fn test_native_number_matches_text() {
        let native: Number = serde_json::from_str("12.50").unwrap();
        assert_eq!(number_to_price(&native), parse_price("12.50"));
        let integer: Number = 5.into();
        assert_eq!(number_to_price(&integer), Some(dec!(5)));
    }

    #[test]
    fn test_negative_and_fractional_exponents() {
        assert_eq!(parse_price("-2.5e-1"), Some(dec!(-0.25)));
        assert_eq!(parse_price("125E-2"), Some(dec!(1.25)));
        assert_eq!(parse_price("0e500"), Some(dec!(0)));
        assert_eq!(parse_price("1e"), None);
        assert_eq!(parse_price("e5"), None);
    }

    #[test]
    fn test_underscores_only_between_digits() {
        assert_eq!(parse_price("1_000"), Some(dec!(1000)));
        assert_eq!(parse_price("1__0"), None);
        assert_eq!(parse_price("_10"), None);
        assert_eq!(parse_price("10_"), None);
        assert_eq!(parse_price("1_.5"), None);
        assert_eq!(parse_price("1e1_"), None);
    }

    #[test]
    fn test_tiny_values_round_the_same_in_every_notation() {
        let plain = parse_price("0.00000000000000000000000000001");
        assert_eq!(plain, Some(dec!(0)));
        assert_eq!(parse_price("1e-29"), plain);
        assert_eq!(parse_price("1e-400"), plain);

        let native: Number = serde_json::from_str("1e-30").unwrap();
        assert_eq!(number_to_price(&native), plain);

        assert_eq!(parse_price("1.5e-28"), parse_price("0.00000000000000000000000000015"));
    }

    #[test]
    fn test_number_out_of_range() {
        let huge: Number = serde_json::from_str("1e300").unwrap();
        assert_eq!(number_to_price(&huge), None);
    }
}
