//! Gift pricing adjuster

use rusty_money::Money;
use tracing::debug;

use crate::{
    gifts::is_gift,
    pricing::{PricingError, sum_minor},
    totals::{ShippingAssignment, Total, TotalCode, TotalCollector, TotalsError},
};

/// Takes gift lines out of the subtotal and zeroes their prices.
///
/// Must run after [`SubtotalCollector`](super::SubtotalCollector): the amount taken out is
/// the row total the subtotal collector gave each gift line.
#[derive(Debug, Clone, Copy, Default)]
pub struct GiftPricingAdjuster;

impl<'a> TotalCollector<'a> for GiftPricingAdjuster {
    fn code(&self) -> &'static str {
        "gift_item"
    }

    fn collect(
        &self,
        assignment: &mut ShippingAssignment<'_, 'a>,
        total: &mut Total<'a>,
    ) -> Result<(), TotalsError> {
        let gift_total = sum_minor(
            assignment
                .items()
                .filter(|item| is_gift(*item))
                .map(|item| item.row_total().to_minor_units()),
        )?;

        let gift_base_total = sum_minor(
            assignment
                .items()
                .filter(|item| is_gift(*item))
                .map(|item| item.base_row_total().to_minor_units()),
        )?;

        debug!(gift_total, gift_base_total, "adjusting gift lines");

        total.add_total_amount(
            TotalCode::Subtotal,
            Money::from_minor(
                gift_total.checked_neg().ok_or(PricingError::Overflow)?,
                total.currency(),
            ),
        )?;

        total.add_base_total_amount(
            TotalCode::Subtotal,
            Money::from_minor(
                gift_base_total.checked_neg().ok_or(PricingError::Overflow)?,
                total.base_currency(),
            ),
        )?;

        for item in assignment.items_mut().filter(|item| is_gift(&**item)) {
            item.zero_calculation_prices()?;
        }

        Ok(())
    }
}
