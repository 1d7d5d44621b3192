//! Display formatting shared by the presenter and the report.
//!
//! Currency matches an en-US locale with no fraction digits: `$1,234,567`,
//! negatives as `$-1,234`. Rounding is half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Group an integer string's digits in threes: `1234567` -> `1,234,567`.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Round to whole units and group thousands: `-1234.5` -> `-1,235`.
pub fn format_grouped(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_thousands(&digits);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_currency(value: Decimal) -> String {
    format!("${}", format_grouped(value))
}

/// Fixed one decimal place: `2625` -> `2625.0`, `0.2404` -> `0.2`.
pub fn format_one_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded.to_string()
}

/// Shortest plain rendering: `50.00` -> `50`, `12.50` -> `12.5`.
pub fn format_plain(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(dec!(654000)), "$654,000");
        assert_eq!(format_currency(dec!(24000)), "$24,000");
        assert_eq!(format_currency(dec!(999.5)), "$1,000");
        assert_eq!(format_currency(dec!(12)), "$12");
        assert_eq!(format_currency(Decimal::ZERO), "$0");
        assert_eq!(format_currency(dec!(-19000)), "$-19,000");
        assert_eq!(format_currency(dec!(-0.4)), "$0");
        assert_eq!(format_currency(dec!(1234567.49)), "$1,234,567");
    }

    #[test]
    fn test_one_decimal() {
        assert_eq!(format_one_decimal(dec!(2625)), "2625.0");
        assert_eq!(format_one_decimal(dec!(0.24038)), "0.2");
        assert_eq!(format_one_decimal(dec!(0.25)), "0.3");
        assert_eq!(format_one_decimal(dec!(-12.34)), "-12.3");
    }

    #[test]
    fn test_plain() {
        assert_eq!(format_plain(dec!(50.00)), "50");
        assert_eq!(format_plain(dec!(12.50)), "12.5");
    }
}
