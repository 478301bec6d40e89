//! Items
//!
//! Cart line items. A line is created by [`Cart::add_product`](crate::cart::Cart::add_product)
//! from a [`Product`] and carries the product's options along with its own quantity and
//! price fields. Price fields are filled in by the totals collectors.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

use crate::{
    options::ItemOptions,
    pricing::{PricingError, multiply_minor},
    products::{AttributeSetId, Product, ProductKey},
};

new_key_type! {
    /// Line Item Key
    pub struct LineItemKey;
}

/// A cart line item.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    key: LineItemKey,
    product: ProductKey,
    sku: String,
    name: String,
    attribute_set: AttributeSetId,
    qty: Decimal,

    /// Unit price of the product, in the base currency
    price: Money<'a, Currency>,

    calculation_price: Money<'a, Currency>,
    base_calculation_price: Money<'a, Currency>,
    row_total: Money<'a, Currency>,
    base_row_total: Money<'a, Currency>,
    options: ItemOptions,
}

impl<'a> LineItem<'a> {
    /// Creates a line for the given product, priced in the product's (base) currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the row total cannot be represented in minor units.
    pub fn from_product(
        key: LineItemKey,
        product: &Product<'a>,
        qty: Decimal,
    ) -> Result<Self, PricingError> {
        let mut item = Self {
            key,
            product: product.key,
            sku: product.sku.clone(),
            name: product.name.clone(),
            attribute_set: product.attribute_set,
            qty,
            price: product.price,
            calculation_price: product.price,
            base_calculation_price: product.price,
            row_total: product.price,
            base_row_total: product.price,
            options: product.options.clone(),
        };

        item.calc_row_total()?;

        Ok(item)
    }

    /// Returns the line's key within its cart.
    pub fn key(&self) -> LineItemKey {
        self.key
    }

    /// Returns the product the line was created from.
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the product SKU.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Returns the product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute set of the product.
    pub fn attribute_set(&self) -> AttributeSetId {
        self.attribute_set
    }

    /// Returns the quantity.
    pub fn qty(&self) -> Decimal {
        self.qty
    }

    pub(crate) fn set_qty(&mut self, qty: Decimal) {
        self.qty = qty;
    }

    /// Returns the product unit price, in the base currency.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the unit price used for row totals, in the cart currency.
    pub fn calculation_price(&self) -> &Money<'a, Currency> {
        &self.calculation_price
    }

    /// Returns the unit price used for base row totals, in the base currency.
    pub fn base_calculation_price(&self) -> &Money<'a, Currency> {
        &self.base_calculation_price
    }

    /// Returns the row total, in the cart currency.
    pub fn row_total(&self) -> &Money<'a, Currency> {
        &self.row_total
    }

    /// Returns the row total, in the base currency.
    pub fn base_row_total(&self) -> &Money<'a, Currency> {
        &self.base_row_total
    }

    /// Returns the custom options.
    pub fn options(&self) -> &ItemOptions {
        &self.options
    }

    /// Returns the custom options, mutably.
    pub fn options_mut(&mut self) -> &mut ItemOptions {
        &mut self.options
    }

    /// Resets calculation prices from the product price and recomputes row totals.
    ///
    /// The cart price is the base price converted at `rate` into `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the conversion or row totals overflow.
    pub fn reprice(&mut self, currency: &'a Currency, rate: Decimal) -> Result<(), PricingError> {
        let converted = multiply_minor(self.price.to_minor_units(), rate)?;

        self.base_calculation_price = self.price;
        self.calculation_price = Money::from_minor(converted, currency);

        self.calc_row_total()
    }

    /// Forces both calculation prices to zero and recomputes row totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the row totals cannot be recomputed.
    pub fn zero_calculation_prices(&mut self) -> Result<(), PricingError> {
        self.calculation_price = Money::from_minor(0, self.calculation_price.currency());
        self.base_calculation_price = Money::from_minor(0, self.base_calculation_price.currency());

        self.calc_row_total()
    }

    /// Recomputes row totals as calculation price × quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a row total does not fit in minor units.
    pub fn calc_row_total(&mut self) -> Result<(), PricingError> {
        let row = multiply_minor(self.calculation_price.to_minor_units(), self.qty)?;
        let base_row = multiply_minor(self.base_calculation_price.to_minor_units(), self.qty)?;

        self.row_total = Money::from_minor(row, self.calculation_price.currency());
        self.base_row_total = Money::from_minor(base_row, self.base_calculation_price.currency());

        Ok(())
    }

    /// Whether this line represents the given product with the given options.
    pub fn represents(&self, product: &Product<'_>) -> bool {
        self.product == product.key && self.sku == product.sku && self.options == product.options
    }
}
