//! Money type and amount normalization
//!
//! Amounts are stored as integer minor units (cents) with an explicit
//! currency code, avoiding floating-point precision issues. The
//! normalization helpers convert the heterogeneous legacy representations
//! (plain numbers, locale-formatted strings) into this canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary amount: integer minor units plus a currency code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (cents)
    pub cents: i64,

    /// Currency code (e.g. "USD"); never empty in validated data
    pub currency: String,
}

impl Money {
    /// Create a Money amount from cents and a currency code
    pub fn new(cents: i64, currency: impl Into<String>) -> Self {
        Self {
            cents,
            currency: currency.into(),
        }
    }

    /// Create a zero amount in the given currency
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(0, currency)
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Normalize a major-unit number into canonical Money
    ///
    /// Multiplies by 100 and rounds half-away-from-zero to the nearest
    /// integer. Non-finite input normalizes to zero cents.
    pub fn from_number(amount: f64, currency: impl Into<String>) -> Self {
        let cents = if amount.is_finite() {
            (amount * 100.0).round() as i64
        } else {
            0
        };
        Self::new(cents, currency)
    }

    /// The major-unit numeric value of this amount
    pub fn to_number(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Normalize a locale-formatted amount string into canonical Money
    ///
    /// Whitespace is stripped, the rightmost comma or period is treated as
    /// the decimal separator, and any other separators are collapsed as
    /// thousands grouping. Accepts both `"1.234,56"` and `"1,234.56"`.
    /// Unparsable input normalizes to zero cents rather than failing.
    pub fn parse_locale(value: &str, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();

        let (negative, digits) = match compact.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, compact.as_str()),
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
        {
            return Self::zero(currency);
        }

        let normalized = match digits.rfind(|c| c == ',' || c == '.') {
            Some(pos) => {
                let int_part: String = digits[..pos]
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect();
                let frac_part = &digits[pos + 1..];
                format!("{}.{}", int_part, frac_part)
            }
            None => digits.to_string(),
        };

        match normalized.parse::<f64>() {
            Ok(num) if num.is_finite() => {
                Self::from_number(if negative { -num } else { num }, currency)
            }
            _ => Self::zero(currency),
        }
    }

    /// Renormalize with a fallback currency when the stored code is empty
    pub fn or_currency(mut self, fallback: &str) -> Self {
        if self.currency.is_empty() {
            self.currency = fallback.to_string();
        }
        self
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} {}",
            sign,
            (self.cents / 100).abs(),
            (self.cents % 100).abs(),
            self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number_rounds_half_away_from_zero() {
        assert_eq!(Money::from_number(10.505, "USD").cents, 1051);
        assert_eq!(Money::from_number(-10.505, "USD").cents, -1051);
        assert_eq!(Money::from_number(0.005, "USD").cents, 1);
        assert_eq!(Money::from_number(-0.005, "USD").cents, -1);
    }

    #[test]
    fn test_from_number_non_finite() {
        assert_eq!(Money::from_number(f64::NAN, "USD").cents, 0);
        assert_eq!(Money::from_number(f64::INFINITY, "USD").cents, 0);
    }

    #[test]
    fn test_parse_locale_european() {
        let m = Money::parse_locale("1.234,56", "EUR");
        assert_eq!(m.cents, 123456);
        assert_eq!(m.currency, "EUR");
    }

    #[test]
    fn test_parse_locale_english() {
        let m = Money::parse_locale("1,234.56", "USD");
        assert_eq!(m.cents, 123456);
    }

    #[test]
    fn test_parse_locale_plain_and_signed() {
        assert_eq!(Money::parse_locale("42", "USD").cents, 4200);
        assert_eq!(Money::parse_locale("-10.50", "USD").cents, -1050);
        assert_eq!(Money::parse_locale(" 1 234,50 ", "USD").cents, 123450);
    }

    #[test]
    fn test_parse_locale_unparsable_is_zero() {
        assert_eq!(Money::parse_locale("abc", "USD").cents, 0);
        assert_eq!(Money::parse_locale("", "USD").cents, 0);
        assert_eq!(Money::parse_locale("$10", "USD").cents, 0);
    }

    #[test]
    fn test_round_trip_integers_and_two_decimals() {
        for cents in [0i64, 1, 99, 100, 123456, -123456, 10_000_000] {
            let m = Money::new(cents, "USD");
            let back = Money::from_number(m.to_number(), "USD");
            assert_eq!(back, m);
        }
    }

    #[test]
    fn test_round_trip_locale_strings() {
        for raw in ["1.234,56", "1,234.56"] {
            let m = Money::parse_locale(raw, "USD");
            let back = Money::from_number(m.to_number(), "USD");
            assert_eq!(back, m);
        }
    }

    #[test]
    fn test_or_currency() {
        let m = Money::new(100, "").or_currency("USD");
        assert_eq!(m.currency, "USD");

        let m = Money::new(100, "EUR").or_currency("USD");
        assert_eq!(m.currency, "EUR");
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(1050, "USD").to_string(), "10.50 USD");
        assert_eq!(Money::new(-1050, "EUR").to_string(), "-10.50 EUR");
        assert_eq!(Money::new(5, "USD").to_string(), "0.05 USD");
    }

    #[test]
    fn test_serialization_shape() {
        let m = Money::new(1050, "USD");
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"cents":1050,"currency":"USD"}"#);

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_float_cents_rejected() {
        let err = serde_json::from_str::<Money>(r#"{"cents":10.5,"currency":"USD"}"#);
        assert!(err.is_err());
    }
}
