//! Subtotal collector

use crate::totals::{ShippingAssignment, Total, TotalCode, TotalCollector, TotalsError};

/// Prices every line from its product price and sums row totals into the subtotal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtotalCollector;

impl<'a> TotalCollector<'a> for SubtotalCollector {
    fn code(&self) -> &'static str {
        "subtotal"
    }

    fn collect(
        &self,
        assignment: &mut ShippingAssignment<'_, 'a>,
        total: &mut Total<'a>,
    ) -> Result<(), TotalsError> {
        let currency = assignment.currency();
        let rate = assignment.base_to_quote_rate();

        for item in assignment.items_mut() {
            item.reprice(currency, rate)?;

            total.add_total_amount(TotalCode::Subtotal, *item.row_total())?;
            total.add_base_total_amount(TotalCode::Subtotal, *item.base_row_total())?;
        }

        Ok(())
    }
}
