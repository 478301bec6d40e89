//! Gifting Rules

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    cart::Cart,
    gifts::GiftError,
    items::{LineItem, LineItemKey},
    products::Product,
};

pub mod free_bottle;

/// A gifting policy.
///
/// Each operation is evaluated against the same cart snapshot and the gift lines it
/// currently holds, and must be recomputed from them on every call: rules are shared
/// across carts and must not cache anything derived from a cart.
///
/// The three decisions are applied together. A rule should not ask to both remove a
/// line and resize it in the same pass; if it does, the removal wins.
pub trait GiftingRule<'a>: fmt::Debug {
    /// Code identifying the rule on the gift lines it creates.
    fn code(&self) -> &str;

    /// Products to add as new gift lines. The rule marks them with its own code.
    ///
    /// # Errors
    ///
    /// Returns a [`GiftError`] if the rule is misconfigured or a product cannot be loaded.
    fn gifts_to_add(
        &self,
        cart: &Cart<'a>,
        current_gifts: &[&LineItem<'a>],
    ) -> Result<Vec<Product<'a>>, GiftError>;

    /// Keys of current gift lines to delete.
    ///
    /// # Errors
    ///
    /// Returns a [`GiftError`] if the decision cannot be made.
    fn gifts_to_remove(
        &self,
        cart: &Cart<'a>,
        current_gifts: &[&LineItem<'a>],
    ) -> Result<SmallVec<[LineItemKey; 4]>, GiftError>;

    /// Target quantities for current gift lines that need resizing.
    ///
    /// # Errors
    ///
    /// Returns a [`GiftError`] if the decision cannot be made.
    fn gift_item_qty_updates(
        &self,
        cart: &Cart<'a>,
        current_gifts: &[&LineItem<'a>],
    ) -> Result<FxHashMap<LineItemKey, Decimal>, GiftError>;
}

/// Gifting rule object shared between managers and carts.
pub type Rule<'a> = Arc<dyn GiftingRule<'a> + 'a>;

/// Convert any gifting rule implementation into a shared rule object.
pub fn rule<'a, R>(rule: R) -> Rule<'a>
where
    R: GiftingRule<'a> + 'a,
{
    Arc::new(rule)
}
