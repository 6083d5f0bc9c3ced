//! Precision utilities for decimal number formatting
//!
//! CCXT의 decimal_to_precision 함수를 Rust로 구현

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rounding modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round towards positive infinity
    Up,
    /// Round towards negative infinity
    Down,
    /// Round towards zero
    TowardsZero,
    /// Round to nearest, ties go to even (banker's rounding)
    HalfEven,
    /// Round to nearest, ties go up
    HalfUp,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::Up => RoundingStrategy::ToPositiveInfinity,
            RoundingMode::Down => RoundingStrategy::ToNegativeInfinity,
            RoundingMode::TowardsZero => RoundingStrategy::ToZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

/// Precision modes
///
/// A market records the mode next to each precision value, since a tick of `1`
/// and a count of `1` decimal place look the same as numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionMode {
    /// Number of decimal places (e.g., 2 means 0.01)
    #[default]
    DecimalPlaces,
    /// Tick size (e.g., 0.0001 means multiples of 0.0001)
    TickSize,
}

/// Padding modes for string output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// No padding
    NoPadding,
    /// Pad with zeros to specified precision
    PadWithZeros,
}

/// Format a decimal number with specified precision
///
/// # Arguments
/// * `value` - The decimal value to format
/// * `precision` - The precision value (interpretation depends on mode)
/// * `rounding_mode` - How to round the number
/// * `precision_mode` - How to interpret the precision value
/// * `padding_mode` - Whether to pad with zeros
pub fn decimal_to_precision(
    value: Decimal,
    precision: Decimal,
    rounding_mode: RoundingMode,
    precision_mode: PrecisionMode,
    padding_mode: PaddingMode,
) -> String {
    match precision_mode {
        PrecisionMode::DecimalPlaces => {
            let places = precision.trunc().to_i32().unwrap_or(0);
            format_decimal_places(value, places, rounding_mode, padding_mode)
        },
        PrecisionMode::TickSize => format_tick_size(value, precision, rounding_mode, padding_mode),
    }
}

/// Round to a market precision value, returning a number.
pub fn round_to_precision(
    value: Decimal,
    precision: Decimal,
    precision_mode: PrecisionMode,
    rounding_mode: RoundingMode,
) -> Decimal {
    let rounded = match precision_mode {
        PrecisionMode::DecimalPlaces => {
            round_decimal(value, precision.to_i32().unwrap_or(0), rounding_mode)
        },
        PrecisionMode::TickSize => round_tick(value, precision, rounding_mode),
    };
    rounded.normalize()
}

fn format_decimal_places(
    value: Decimal,
    places: i32,
    rounding_mode: RoundingMode,
    padding_mode: PaddingMode,
) -> String {
    let rounded = round_decimal(value, places, rounding_mode);

    if padding_mode == PaddingMode::NoPadding {
        remove_trailing_zeros(&rounded.to_string())
    } else if places <= 0 {
        format!("{}", rounded.trunc())
    } else {
        format!("{:.1$}", rounded, places as usize)
    }
}

fn format_tick_size(
    value: Decimal,
    tick_size: Decimal,
    rounding_mode: RoundingMode,
    padding_mode: PaddingMode,
) -> String {
    if tick_size.is_zero() {
        return value.to_string();
    }

    let rounded_value = round_tick(value, tick_size, rounding_mode);

    if padding_mode == PaddingMode::NoPadding {
        remove_trailing_zeros(&rounded_value.to_string())
    } else {
        let places = tick_size.normalize().scale() as usize;
        format!("{rounded_value:.places$}")
    }
}

// Results that would leave the Decimal range keep the input value.
fn round_tick(value: Decimal, tick_size: Decimal, mode: RoundingMode) -> Decimal {
    if tick_size.is_zero() {
        return value;
    }
    value
        .checked_div(tick_size)
        .and_then(|steps| round_to_integer(steps, mode).checked_mul(tick_size))
        .unwrap_or(value)
}

fn round_decimal(value: Decimal, places: i32, mode: RoundingMode) -> Decimal {
    if places >= 0 {
        return value.round_dp_with_strategy(places.unsigned_abs(), mode.strategy());
    }

    // negative places round to a power of ten
    Decimal::TEN
        .checked_powi(i64::from(places.unsigned_abs()))
        .and_then(|factor| {
            value
                .checked_div(factor)
                .and_then(|scaled| round_to_integer(scaled, mode).checked_mul(factor))
        })
        .unwrap_or(value)
}

fn round_to_integer(value: Decimal, mode: RoundingMode) -> Decimal {
    value.round_dp_with_strategy(0, mode.strategy())
}

fn remove_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }

    let trimmed = s.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

/// Amount to precision - truncates toward zero like CCXT's `amountToPrecision`
///
/// Without a known precision the amount is passed through unchanged.
pub fn amount_to_precision(
    amount: Decimal,
    precision: Option<Decimal>,
    precision_mode: PrecisionMode,
) -> String {
    match precision {
        Some(p) => decimal_to_precision(
            amount,
            p,
            RoundingMode::TowardsZero,
            precision_mode,
            PaddingMode::NoPadding,
        ),
        None => remove_trailing_zeros(&amount.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_places() {
        assert_eq!(
            decimal_to_precision(
                dec!(1.23456789),
                dec!(4),
                RoundingMode::HalfUp,
                PrecisionMode::DecimalPlaces,
                PaddingMode::NoPadding
            ),
            "1.2346"
        );
    }

    #[test]
    fn test_tick_size() {
        let result = decimal_to_precision(
            dec!(1.23456),
            dec!(0.01),
            RoundingMode::HalfUp,
            PrecisionMode::TickSize,
            PaddingMode::NoPadding,
        );
        assert_eq!(result, "1.23");
    }

    #[test]
    fn test_padding() {
        let result = decimal_to_precision(
            dec!(1.5),
            dec!(0.001),
            RoundingMode::HalfUp,
            PrecisionMode::TickSize,
            PaddingMode::PadWithZeros,
        );
        assert_eq!(result, "1.500");
    }

    #[test]
    fn test_precision_mode_default_and_serde() {
        assert_eq!(PrecisionMode::default(), PrecisionMode::DecimalPlaces);
        assert_eq!(
            serde_json::to_value(PrecisionMode::TickSize).unwrap(),
            serde_json::json!("tick_size")
        );
    }

    #[test]
    fn test_round_to_precision() {
        let places = PrecisionMode::DecimalPlaces;
        let tick = PrecisionMode::TickSize;
        assert_eq!(round_to_precision(dec!(1.5), dec!(2), places, RoundingMode::HalfUp), dec!(1.5));
        assert_eq!(round_to_precision(dec!(0.125), dec!(2), places, RoundingMode::HalfUp), dec!(0.13));
        assert_eq!(round_to_precision(dec!(0.125), dec!(0.05), tick, RoundingMode::HalfUp), dec!(0.15));
        assert_eq!(round_to_precision(dec!(0.0149), dec!(0.01), tick, RoundingMode::HalfUp), dec!(0.01));
    }

    #[test]
    fn test_whole_number_tick_size() {
        let tick = PrecisionMode::TickSize;
        assert_eq!(amount_to_precision(dec!(2.37), Some(dec!(1.00000000)), tick), "2");
        assert_eq!(amount_to_precision(dec!(237), Some(dec!(10)), tick), "230");
        assert_eq!(round_to_precision(dec!(2.5), dec!(1), tick, RoundingMode::HalfUp), dec!(3));
        // the same number read as decimal places
        assert_eq!(
            amount_to_precision(dec!(2.37), Some(dec!(1)), PrecisionMode::DecimalPlaces),
            "2.3"
        );
    }

    #[test]
    fn test_large_amount_with_many_decimal_places() {
        let places = PrecisionMode::DecimalPlaces;
        assert_eq!(amount_to_precision(dec!(100000000000), Some(dec!(18)), places), "100000000000");
        assert_eq!(amount_to_precision(dec!(100000000000.5), Some(dec!(19)), places), "100000000000.5");
        assert_eq!(amount_to_precision(dec!(1.5), Some(dec!(40)), places), "1.5");
        assert_eq!(
            round_to_precision(dec!(79228162514264337593543950335), dec!(18), places, RoundingMode::HalfUp),
            dec!(79228162514264337593543950335)
        );
        assert_eq!(
            round_to_precision(dec!(123456789012.123456789012345), dec!(18), places, RoundingMode::HalfUp),
            dec!(123456789012.123456789012345)
        );
    }

    #[test]
    fn test_negative_decimal_places() {
        let result = decimal_to_precision(
            dec!(1234.5),
            dec!(-2),
            RoundingMode::TowardsZero,
            PrecisionMode::DecimalPlaces,
            PaddingMode::NoPadding,
        );
        assert_eq!(result, "1200");
    }

    #[test]
    fn test_amount_to_precision() {
        assert_eq!(
            amount_to_precision(dec!(1.23456789), Some(dec!(4)), PrecisionMode::DecimalPlaces),
            "1.2345"
        );
        assert_eq!(
            amount_to_precision(dec!(1.23456789), Some(dec!(0.01)), PrecisionMode::TickSize),
            "1.23"
        );
        assert_eq!(amount_to_precision(dec!(-1.239), Some(dec!(2)), PrecisionMode::DecimalPlaces), "-1.23");
        assert_eq!(amount_to_precision(dec!(1.2300), None, PrecisionMode::TickSize), "1.23");
    }

    #[test]
    fn test_trailing_zeros() {
        assert_eq!(remove_trailing_zeros("1.23000"), "1.23");
        assert_eq!(remove_trailing_zeros("1.00"), "1");
        assert_eq!(remove_trailing_zeros("123"), "123");
    }
}
