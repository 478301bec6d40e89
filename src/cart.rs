//! Cart

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    items::{LineItem, LineItemKey},
    pricing::PricingError,
    products::Product,
    totals::Total,
};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart base currency (SKU, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart base currency is {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A line item was not found in the cart.
    #[error("Item {0:?} not found")]
    ItemNotFound(LineItemKey),

    /// A quantity outside the accepted range was requested.
    #[error("Invalid quantity {0}")]
    InvalidQuantity(Decimal),

    /// Wrapped line pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Request payload accompanying [`Cart::add_product`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyRequest {
    /// Quantity to add
    pub qty: Decimal,
}

impl BuyRequest {
    /// Create a request for the given quantity.
    pub fn qty(qty: impl Into<Decimal>) -> Self {
        Self { qty: qty.into() }
    }
}

impl Default for BuyRequest {
    fn default() -> Self {
        Self { qty: Decimal::ONE }
    }
}

/// Cart
///
/// Owns an ordered list of line items. Keys are assigned on add and never reused
/// while the cart is alive.
#[derive(Debug)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    keys: SlotMap<LineItemKey, ()>,
    currency: &'static Currency,
    base_currency: &'static Currency,
    base_to_quote_rate: Decimal,
    totals: Option<Total<'a>>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in a single currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_base_currency(currency, currency, Decimal::ONE)
    }

    /// Create an empty cart whose products are priced in `base_currency` and
    /// converted into `currency` at `base_to_quote_rate`.
    #[must_use]
    pub fn with_base_currency(
        currency: &'static Currency,
        base_currency: &'static Currency,
        base_to_quote_rate: Decimal,
    ) -> Self {
        Cart {
            items: Vec::new(),
            keys: SlotMap::with_key(),
            currency,
            base_currency,
            base_to_quote_rate,
            totals: None,
        }
    }

    /// Add a line for the product, or increase the quantity of the line that
    /// already represents it.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: the requested quantity is not positive.
    /// - [`CartError::CurrencyMismatch`]: the product is not priced in the base currency.
    /// - [`CartError::Pricing`]: the line's row totals overflowed.
    pub fn add_product(
        &mut self,
        product: &Product<'a>,
        request: Option<BuyRequest>,
    ) -> Result<LineItemKey, CartError> {
        let qty = request.unwrap_or_default().qty;

        if qty <= Decimal::ZERO {
            return Err(CartError::InvalidQuantity(qty));
        }

        let product_currency = product.price.currency();

        if product_currency != self.base_currency {
            return Err(CartError::CurrencyMismatch(
                product.sku.clone(),
                product_currency.iso_alpha_code,
                self.base_currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.items.iter_mut().find(|item| item.represents(product)) {
            existing.set_qty(existing.qty() + qty);
            existing.calc_row_total()?;

            return Ok(existing.key());
        }

        let key = self.keys.insert(());
        let mut item = LineItem::from_product(key, product, qty)?;

        item.reprice(self.currency, self.base_to_quote_rate)?;

        self.items.push(item);

        Ok(key)
    }

    /// Delete a line from the cart, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the cart has no line with that key.
    pub fn delete_item(&mut self, key: LineItemKey) -> Result<LineItem<'a>, CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.key() == key)
            .ok_or(CartError::ItemNotFound(key))?;

        self.keys.remove(key);

        Ok(self.items.remove(position))
    }

    /// Set the quantity of a line and recompute its row totals.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: the quantity is negative.
    /// - [`CartError::ItemNotFound`]: the cart has no line with that key.
    /// - [`CartError::Pricing`]: the new row total overflows.
    pub fn set_quantity(&mut self, key: LineItemKey, qty: Decimal) -> Result<(), CartError> {
        if qty < Decimal::ZERO {
            return Err(CartError::InvalidQuantity(qty));
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.key() == key)
            .ok_or(CartError::ItemNotFound(key))?;

        item.set_qty(qty);
        item.calc_row_total()?;

        Ok(())
    }

    /// Get a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the cart has no line with that key.
    pub fn get_item(&self, key: LineItemKey) -> Result<&LineItem<'a>, CartError> {
        self.items
            .iter()
            .find(|item| item.key() == key)
            .ok_or(CartError::ItemNotFound(key))
    }

    /// Iterate over the lines in the cart, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter()
    }

    /// Iterate mutably over the lines in the cart, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LineItem<'a>> {
        self.items.iter_mut()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency the customer is charged in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Get the currency products are priced in.
    #[must_use]
    pub fn base_currency(&self) -> &'static Currency {
        self.base_currency
    }

    /// Get the base to cart currency exchange rate.
    #[must_use]
    pub fn base_to_quote_rate(&self) -> Decimal {
        self.base_to_quote_rate
    }

    /// Totals from the last collection, if any.
    pub fn totals(&self) -> Option<&Total<'a>> {
        self.totals.as_ref()
    }

    pub(crate) fn set_totals(&mut self, totals: Total<'a>) {
        self.totals = Some(totals);
    }
}
