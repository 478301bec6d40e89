//! Grand total collector

use crate::totals::{ShippingAssignment, Total, TotalCode, TotalCollector, TotalsError};

/// Adds the subtotal to the grand total.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrandTotalCollector;

impl<'a> TotalCollector<'a> for GrandTotalCollector {
    fn code(&self) -> &'static str {
        "grand_total"
    }

    fn collect(
        &self,
        _assignment: &mut ShippingAssignment<'_, 'a>,
        total: &mut Total<'a>,
    ) -> Result<(), TotalsError> {
        total.add_total_amount(TotalCode::GrandTotal, total.subtotal())?;
        total.add_base_total_amount(TotalCode::GrandTotal, total.base_subtotal())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use crate::cart::Cart;

    use super::*;

    #[test]
    fn grand_total_follows_subtotal() -> TestResult {
        let mut cart = Cart::new(GBP);
        let mut total = Total::new(GBP, USD);
        total.add_total_amount(TotalCode::Subtotal, Money::from_minor(1234, GBP))?;
        total.add_base_total_amount(TotalCode::Subtotal, Money::from_minor(1500, USD))?;

        GrandTotalCollector.collect(&mut ShippingAssignment::from_cart(&mut cart), &mut total)?;

        assert_eq!(total.grand_total(), Money::from_minor(1234, GBP));
        assert_eq!(total.base_grand_total(), Money::from_minor(1500, USD));

        Ok(())
    }
}
