//! Item Options
//!
//! Custom options carried by a product on its way into the cart and copied onto
//! the line item it creates.

/// Custom options attached to a product or a cart line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemOptions {
    /// Whether the item is a complimentary gift.
    pub is_gift: bool,

    /// Code of the gifting rule that created the item, if any.
    pub gift_type: Option<String>,
}

impl ItemOptions {
    /// Options for an item created by the given gifting rule.
    pub fn gift_from(rule_code: impl Into<String>) -> Self {
        Self {
            is_gift: true,
            gift_type: Some(rule_code.into()),
        }
    }

    /// Returns the gifting rule code, if set.
    pub fn gift_type(&self) -> Option<&str> {
        self.gift_type.as_deref()
    }
}
