//! Price display using decimal arithmetic.
//!
//! Prices are carried as [`Decimal`] everywhere so cart totals are exact
//! sums. Display follows the storefront's locale: Brazilian real with a dot
//! as the thousands separator and a comma before the cents.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency prefix used when displaying prices.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Format a price for display (e.g., `R$ 1.234,56`).
///
/// Amounts are rounded half-away-from-zero to two decimal places.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    // `{:.2}` on a two-place decimal always yields "<int>.<2 digits>"
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!(
        "{sign}{CURRENCY_SYMBOL} {},{cents}",
        group_thousands(int_part)
    )
}

/// Insert `.` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_simple() {
        assert_eq!(format_price(Decimal::new(2999, 2)), "R$ 29,99");
    }

    #[test]
    fn test_format_price_zero() {
        assert_eq!(format_price(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_format_price_thousands() {
        assert_eq!(format_price(Decimal::new(123_456, 2)), "R$ 1.234,56");
        assert_eq!(format_price(Decimal::new(123_456_789, 2)), "R$ 1.234.567,89");
    }

    #[test]
    fn test_format_price_rounds_to_cents() {
        assert_eq!(format_price(Decimal::new(10_005, 3)), "R$ 10,01");
        assert_eq!(format_price(Decimal::new(5, 0)), "R$ 5,00");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(Decimal::new(-150, 2)), "-R$ 1,50");
    }
}
