//! Fixtures
//!
//! YAML fixture sets used by the demo and tests. A set named `bags` is made of
//! `products/bags.yml`, `carts/bags.yml` and `rules/bags.yml` under the base path.

use std::{fs, path::PathBuf};

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{BuyRequest, Cart, CartError},
    catalog::InMemoryCatalog,
    fixtures::{carts::CartFixture, products::ProductsFixture, rules::RulesFixture},
    gifts::rules::free_bottle::FreeBottleConfig,
    products::ProductKey,
};

pub mod carts;
pub mod products;
pub mod rules;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid quantity or exchange rate
    #[error("Invalid number: {0}")]
    InvalidNumber(f64),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// No cart loaded
    #[error("No cart loaded")]
    NoCart,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: InMemoryCatalog<'a>,

    /// Cart lines, resolved to catalog keys
    lines: Vec<(ProductKey, Decimal)>,

    /// Cart currency and base to cart rate, once a cart is loaded
    cart_currency: Option<(&'static Currency, Decimal)>,

    rule_config: FreeBottleConfig,

    /// Currency all products are priced in
    currency: Option<&'static Currency>,
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: InMemoryCatalog::new(),
            lines: Vec::new(),
            cart_currency: None,
            rule_config: FreeBottleConfig::default(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (sku, product_fixture) in fixture.products {
            let product = product_fixture.into_product(sku)?;
            let currency = product.price.currency();

            match self.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => self.currency = Some(currency),
            }

            self.catalog.insert(product);
        }

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file. Products must be loaded first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced products don't exist.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let base_currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        let currency = match fixture.currency.as_deref() {
            Some(code) => products::parse_currency(code)?,
            None => base_currency,
        };

        let rate = match fixture.rate {
            Some(rate) => Decimal::from_f64(rate).ok_or(FixtureError::InvalidNumber(rate))?,
            None => Decimal::ONE,
        };

        self.cart_currency = Some((currency, rate));
        self.lines.clear();

        for line in fixture.lines {
            let product = self
                .catalog
                .get_by_sku(&line.sku)
                .ok_or_else(|| FixtureError::ProductNotFound(line.sku.clone()))?;

            let qty = Decimal::from_f64(line.qty).ok_or(FixtureError::InvalidNumber(line.qty))?;

            self.lines.push((product.key, qty));
        }

        Ok(self)
    }

    /// Load gifting rule configuration from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_rules(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rules").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RulesFixture = serde_norway::from_str(&contents)?;

        self.rule_config = fixture.free_bottle;

        Ok(self)
    }

    /// Load a complete fixture set (products, cart and rules with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(name)?
            .load_cart(name)?
            .load_rules(name)?;

        Ok(fixture)
    }

    /// Catalog of loaded products
    pub fn catalog(&self) -> &InMemoryCatalog<'a> {
        &self.catalog
    }

    /// Free bottle rule configuration
    pub fn rule_config(&self) -> &FreeBottleConfig {
        &self.rule_config
    }

    /// Currency of the loaded products
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Build a fresh cart holding the loaded lines.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCart`] if no cart was loaded, or a [`CartError`] if a line
    /// cannot be added.
    pub fn cart(&self) -> Result<Cart<'a>, FixtureError> {
        let (currency, rate) = self.cart_currency.ok_or(FixtureError::NoCart)?;
        let base_currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        let mut cart = Cart::with_base_currency(currency, base_currency, rate);

        for &(key, qty) in &self.lines {
            let product = self
                .catalog
                .get(key)
                .ok_or_else(|| FixtureError::ProductNotFound(format!("{key:?}")))?;

            cart.add_product(product, Some(BuyRequest::qty(qty)))?;
        }

        Ok(cart)
    }
}
