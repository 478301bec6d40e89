//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

use crate::options::ItemOptions;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Attribute set identifier used to classify products (e.g. bags).
pub type AttributeSetId = u32;

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Catalog key, assigned by the catalog that owns the product
    pub key: ProductKey,

    /// Product SKU
    pub sku: String,

    /// Product name
    pub name: String,

    /// Attribute set the product belongs to
    pub attribute_set: AttributeSetId,

    /// Product price, in the base currency
    pub price: Money<'a, Currency>,

    /// Custom options copied onto the line item created from this product
    pub options: ItemOptions,
}

impl<'a> Product<'a> {
    /// Create a new product with no custom options.
    pub fn new(
        key: ProductKey,
        sku: impl Into<String>,
        name: impl Into<String>,
        attribute_set: AttributeSetId,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            key,
            sku: sku.into(),
            name: name.into(),
            attribute_set,
            price,
            options: ItemOptions::default(),
        }
    }
}
