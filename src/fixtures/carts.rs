//! Cart Fixtures

use serde::Deserialize;

/// Cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart currency code; defaults to the product currency
    #[serde(default)]
    pub currency: Option<String>,

    /// Base to cart currency exchange rate
    #[serde(default)]
    pub rate: Option<f64>,

    /// Lines added to the cart, in order
    #[serde(default)]
    pub lines: Vec<CartLineFixture>,
}

/// Cart line in YAML
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product SKU
    pub sku: String,

    /// Quantity to add
    #[serde(default = "default_qty")]
    pub qty: f64,
}

fn default_qty() -> f64 {
    1.0
}
