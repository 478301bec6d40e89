//! Pricing
//!
//! Minor-unit arithmetic shared by line items and totals collectors.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Errors that can occur during minor-unit price arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A multiplication or conversion could not be represented in minor units.
    #[error("price calculation overflowed minor units")]
    Overflow,
}

/// Multiply a minor-unit amount by a decimal factor, rounding half away from zero.
///
/// Used both for `unit price × quantity` and for currency conversion.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in an `i64`.
pub fn multiply_minor(minor: i64, factor: Decimal) -> Result<i64, PricingError> {
    let applied = Decimal::from(minor)
        .checked_mul(factor)
        .ok_or(PricingError::Overflow)?;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

/// Sum minor-unit amounts.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the sum does not fit in an `i64`.
pub fn sum_minor(amounts: impl IntoIterator<Item = i64>) -> Result<i64, PricingError> {
    amounts
        .into_iter()
        .try_fold(0_i64, |acc, amount| {
            acc.checked_add(amount).ok_or(PricingError::Overflow)
        })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn multiply_minor_by_whole_quantity() -> TestResult {
        assert_eq!(multiply_minor(1000, Decimal::from(2))?, 2000);

        Ok(())
    }

    #[test]
    fn multiply_minor_rounds_half_away_from_zero() -> TestResult {
        // 333 * 1.5 = 499.5
        assert_eq!(multiply_minor(333, Decimal::new(15, 1))?, 500);
        assert_eq!(multiply_minor(-333, Decimal::new(15, 1))?, -500);

        Ok(())
    }

    #[test]
    fn multiply_minor_overflow_returns_error() {
        let result = multiply_minor(i64::MAX, Decimal::from(2));

        assert_eq!(result, Err(PricingError::Overflow));
    }

    #[test]
    fn sum_minor_adds_amounts() -> TestResult {
        assert_eq!(sum_minor([100, 250, -50])?, 300);
        assert_eq!(sum_minor(std::iter::empty())?, 0);

        Ok(())
    }

    #[test]
    fn sum_minor_overflow_returns_error() {
        assert_eq!(sum_minor([i64::MAX, 1]), Err(PricingError::Overflow));
    }
}
