//! Totals
//!
//! Cart total collection. A [`TotalsCollector`] reconciles gift lines, then runs an
//! ordered list of [`TotalCollector`]s over the cart's shipping assignment. Each
//! collector prices lines or adjusts the running [`Total`].

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::Cart,
    gifts::{GiftError, GiftItemManager},
    items::LineItem,
    pricing::PricingError,
};

pub mod gifts;
pub mod grand_total;
pub mod subtotal;

pub use gifts::GiftPricingAdjuster;
pub use grand_total::GrandTotalCollector;
pub use subtotal::SubtotalCollector;

/// Errors that can occur while collecting totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// Gift reconciliation failed before collection started.
    #[error(transparent)]
    Gift(#[from] GiftError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Wrapped line pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Amounts tracked on a [`Total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalCode {
    /// Sum of line row totals
    Subtotal,

    /// Amount the customer is charged
    GrandTotal,
}

/// Running totals for one cart, in the cart currency and the base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Total<'a> {
    subtotal: Money<'a, Currency>,
    base_subtotal: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
    base_grand_total: Money<'a, Currency>,
}

impl<'a> Total<'a> {
    /// Zeroed totals in the given currencies.
    pub fn new(currency: &'a Currency, base_currency: &'a Currency) -> Self {
        Self {
            subtotal: Money::from_minor(0, currency),
            base_subtotal: Money::from_minor(0, base_currency),
            grand_total: Money::from_minor(0, currency),
            base_grand_total: Money::from_minor(0, base_currency),
        }
    }

    /// Subtotal, in the cart currency.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Subtotal, in the base currency.
    pub fn base_subtotal(&self) -> Money<'a, Currency> {
        self.base_subtotal
    }

    /// Grand total, in the cart currency.
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Grand total, in the base currency.
    pub fn base_grand_total(&self) -> Money<'a, Currency> {
        self.base_grand_total
    }

    /// Returns the amount for `code`, in the cart currency.
    pub fn total_amount(&self, code: TotalCode) -> Money<'a, Currency> {
        match code {
            TotalCode::Subtotal => self.subtotal,
            TotalCode::GrandTotal => self.grand_total,
        }
    }

    /// Returns the amount for `code`, in the base currency.
    pub fn base_total_amount(&self, code: TotalCode) -> Money<'a, Currency> {
        match code {
            TotalCode::Subtotal => self.base_subtotal,
            TotalCode::GrandTotal => self.base_grand_total,
        }
    }

    /// Add `amount` (which may be negative) to the cart-currency amount for `code`.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if `amount` is not in the cart currency.
    pub fn add_total_amount(
        &mut self,
        code: TotalCode,
        amount: Money<'a, Currency>,
    ) -> Result<(), MoneyError> {
        let slot = match code {
            TotalCode::Subtotal => &mut self.subtotal,
            TotalCode::GrandTotal => &mut self.grand_total,
        };

        *slot = slot.add(amount)?;

        Ok(())
    }

    /// Add `amount` (which may be negative) to the base-currency amount for `code`.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if `amount` is not in the base currency.
    pub fn add_base_total_amount(
        &mut self,
        code: TotalCode,
        amount: Money<'a, Currency>,
    ) -> Result<(), MoneyError> {
        let slot = match code {
            TotalCode::Subtotal => &mut self.base_subtotal,
            TotalCode::GrandTotal => &mut self.base_grand_total,
        };

        *slot = slot.add(amount)?;

        Ok(())
    }

    /// Currency of the cart-currency amounts.
    pub fn currency(&self) -> &'a Currency {
        self.subtotal.currency()
    }

    /// Currency of the base-currency amounts.
    pub fn base_currency(&self) -> &'a Currency {
        self.base_subtotal.currency()
    }
}

/// The lines of a cart being collected, with the pricing context they share.
#[derive(Debug)]
pub struct ShippingAssignment<'c, 'a> {
    items: SmallVec<[&'c mut LineItem<'a>; 8]>,
    currency: &'static Currency,
    base_to_quote_rate: Decimal,
}

impl<'c, 'a> ShippingAssignment<'c, 'a> {
    /// Every line of the cart in a single assignment.
    pub fn from_cart(cart: &'c mut Cart<'a>) -> Self {
        let currency = cart.currency();
        let base_to_quote_rate = cart.base_to_quote_rate();

        Self {
            items: cart.iter_mut().collect(),
            currency,
            base_to_quote_rate,
        }
    }

    /// Iterate over the lines.
    pub fn items(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter().map(|item| &**item)
    }

    /// Iterate mutably over the lines.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut LineItem<'a>> {
        self.items.iter_mut().map(|item| &mut **item)
    }

    /// Currency the customer is charged in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Base to cart currency exchange rate.
    pub fn base_to_quote_rate(&self) -> Decimal {
        self.base_to_quote_rate
    }
}

/// One step of total collection.
pub trait TotalCollector<'a>: fmt::Debug {
    /// Code identifying the collector in logs.
    fn code(&self) -> &'static str;

    /// Price lines and/or adjust the running totals.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if line pricing or money arithmetic fails.
    fn collect(
        &self,
        assignment: &mut ShippingAssignment<'_, 'a>,
        total: &mut Total<'a>,
    ) -> Result<(), TotalsError>;
}

/// Runs gift reconciliation followed by an ordered list of collectors.
#[derive(Debug, Default)]
pub struct TotalsCollector<'a> {
    gift_manager: Option<GiftItemManager<'a>>,
    collectors: Vec<Box<dyn TotalCollector<'a> + 'a>>,
}

impl<'a> TotalsCollector<'a> {
    /// A collector with no steps.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gift_manager: None,
            collectors: Vec::new(),
        }
    }

    /// Subtotal, gift pricing adjustment and grand total, in that order.
    #[must_use]
    pub fn with_default_collectors() -> Self {
        Self::new()
            .with_collector(SubtotalCollector)
            .with_collector(GiftPricingAdjuster)
            .with_collector(GrandTotalCollector)
    }

    /// Reconcile gift lines with this manager before every collection.
    #[must_use]
    pub fn with_gift_manager(mut self, manager: GiftItemManager<'a>) -> Self {
        self.gift_manager = Some(manager);
        self
    }

    /// Append a collector to run after the existing ones.
    #[must_use]
    pub fn with_collector(mut self, collector: impl TotalCollector<'a> + 'a) -> Self {
        self.collectors.push(Box::new(collector));
        self
    }

    /// Codes of the configured collectors, in run order.
    pub fn collector_codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.collectors.iter().map(|collector| collector.code())
    }

    /// Reconcile gifts, collect totals and store them on the cart.
    ///
    /// # Errors
    ///
    /// - [`TotalsError::Gift`]: reconciliation failed; no totals are collected.
    /// - [`TotalsError::Money`] / [`TotalsError::Pricing`]: a collector failed.
    #[tracing::instrument(name = "totals.collect", skip_all, fields(lines = tracing::field::Empty), err)]
    pub fn collect(&self, cart: &mut Cart<'a>) -> Result<Total<'a>, TotalsError> {
        if let Some(manager) = &self.gift_manager {
            manager.reconcile(cart)?;
        }

        tracing::Span::current().record("lines", cart.len());

        let mut total = Total::new(cart.currency(), cart.base_currency());

        {
            let mut assignment = ShippingAssignment::from_cart(cart);

            for collector in &self.collectors {
                collector.collect(&mut assignment, &mut total)?;

                debug!(
                    collector = collector.code(),
                    subtotal = %total.subtotal(),
                    grand_total = %total.grand_total(),
                    "collected"
                );
            }
        }

        cart.set_totals(total.clone());

        Ok(total)
    }
}
