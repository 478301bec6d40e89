//! Gift Marker

use crate::{items::LineItem, options::ItemOptions, products::Product};

/// Anything that carries custom item options and can therefore be tagged as a gift.
pub trait Giftable {
    /// Returns the custom options.
    fn options(&self) -> &ItemOptions;

    /// Returns the custom options, mutably.
    fn options_mut(&mut self) -> &mut ItemOptions;
}

impl Giftable for Product<'_> {
    fn options(&self) -> &ItemOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ItemOptions {
        &mut self.options
    }
}

impl Giftable for LineItem<'_> {
    fn options(&self) -> &ItemOptions {
        self.options()
    }

    fn options_mut(&mut self) -> &mut ItemOptions {
        self.options_mut()
    }
}

/// Tag a product or line as a gift. Returns the same object.
pub fn mark_as_gift<T: Giftable + ?Sized>(target: &mut T) -> &mut T {
    target.options_mut().is_gift = true;
    target
}

/// Record which rule a product or line was given away by. Returns the same object.
pub fn mark_with_rule<'t, T: Giftable + ?Sized>(target: &'t mut T, rule_code: &str) -> &'t mut T {
    target.options_mut().gift_type = Some(rule_code.to_string());
    target
}

/// Whether the product or line is tagged as a gift.
pub fn is_gift<T: Giftable + ?Sized>(target: &T) -> bool {
    target.options().is_gift
}

/// Whether the line is a gift of `sku` created by the rule with code `rule_code`.
///
/// The line must carry the gift flag as well as the rule code.
pub fn is_gift_from_rule(item: &LineItem<'_>, sku: &str, rule_code: &str) -> bool {
    is_gift(item) && item.sku() == sku && item.options().gift_type() == Some(rule_code)
}
