//! Gift Item Manager
//!
//! Runs one reconciliation pass of a [`GiftingRule`](crate::gifts::rules::GiftingRule)
//! against a cart.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    gifts::{
        GiftError,
        marker::{is_gift, mark_as_gift},
        rules::Rule,
    },
    items::{LineItem, LineItemKey},
    products::Product,
};

/// Everything a rule decided in one pass, checked against the gift lines it was shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftDecisions<'a> {
    /// Keys of the gift lines present when the rule was asked, in cart order
    pub current: SmallVec<[LineItemKey; 4]>,

    /// Gift lines to delete
    pub to_remove: SmallVec<[LineItemKey; 4]>,

    /// Target quantities for gift lines
    pub qty_updates: FxHashMap<LineItemKey, Decimal>,

    /// Products to add as new gift lines
    pub to_add: Vec<Product<'a>>,
}

impl GiftDecisions<'_> {
    /// Whether applying the decisions would leave the cart unchanged.
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.qty_updates.is_empty() && self.to_add.is_empty()
    }
}

/// Counts of the changes made by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Gift lines deleted
    pub removed: usize,

    /// Gift lines resized
    pub updated: usize,

    /// Gift lines added
    pub added: usize,
}

impl ReconcileSummary {
    /// Whether the pass left the cart unchanged.
    pub fn is_empty(&self) -> bool {
        self.removed == 0 && self.updated == 0 && self.added == 0
    }
}

/// Applies a gifting rule's decisions to carts.
#[derive(Debug, Clone)]
pub struct GiftItemManager<'a> {
    rule: Rule<'a>,
}

impl<'a> GiftItemManager<'a> {
    /// Create a manager for the given rule.
    pub fn new(rule: Rule<'a>) -> Self {
        Self { rule }
    }

    /// Returns the rule this manager applies.
    pub fn rule(&self) -> &Rule<'a> {
        &self.rule
    }

    /// Ask the rule what should change, without touching the cart.
    ///
    /// Removals and quantity updates are restricted to the current gift lines;
    /// anything else the rule names is dropped. Duplicate removals are collapsed.
    ///
    /// # Errors
    ///
    /// Returns the first [`GiftError`] raised by the rule.
    pub fn decide(&self, cart: &Cart<'a>) -> Result<GiftDecisions<'a>, GiftError> {
        let current_gifts = current_gifts(cart);
        let current: SmallVec<[LineItemKey; 4]> =
            current_gifts.iter().map(|item| item.key()).collect();

        let requested_removals = self.rule.gifts_to_remove(cart, &current_gifts)?;
        let to_add = self.rule.gifts_to_add(cart, &current_gifts)?;
        let requested_updates = self.rule.gift_item_qty_updates(cart, &current_gifts)?;

        let mut to_remove = SmallVec::new();

        for key in requested_removals {
            if !current.contains(&key) {
                warn!(rule = self.rule.code(), ?key, "ignoring removal of a non-gift line");
            } else if !to_remove.contains(&key) {
                to_remove.push(key);
            }
        }

        let qty_updates = requested_updates
            .into_iter()
            .filter(|(key, _)| {
                let known = current.contains(key);

                if !known {
                    warn!(rule = self.rule.code(), ?key, "ignoring quantity update of a non-gift line");
                }

                known
            })
            .collect();

        Ok(GiftDecisions {
            current,
            to_remove,
            qty_updates,
            to_add,
        })
    }

    /// Bring the cart's gift lines in line with the rule.
    ///
    /// Removals are applied first, then quantity updates, then additions. A line
    /// that is both removed and resized is only removed. Every added product is
    /// tagged as a gift.
    ///
    /// # Errors
    ///
    /// Returns the first [`GiftError`] raised by the rule or the cart. Changes
    /// applied before the failure are kept.
    #[tracing::instrument(
        name = "gifts.manager.reconcile",
        skip(self, cart),
        fields(
            rule = self.rule.code(),
            current_gifts = tracing::field::Empty,
            removed = tracing::field::Empty,
            updated = tracing::field::Empty,
            added = tracing::field::Empty
        ),
        err
    )]
    pub fn reconcile(&self, cart: &mut Cart<'a>) -> Result<ReconcileSummary, GiftError> {
        let decisions = self.decide(cart)?;

        tracing::Span::current().record("current_gifts", decisions.current.len());

        let mut summary = ReconcileSummary::default();

        for key in &decisions.to_remove {
            cart.delete_item(*key)?;
            summary.removed += 1;
        }

        for key in &decisions.current {
            if decisions.to_remove.contains(key) {
                continue;
            }

            if let Some(qty) = decisions.qty_updates.get(key) {
                cart.set_quantity(*key, *qty)?;
                summary.updated += 1;
            }
        }

        for mut product in decisions.to_add {
            mark_as_gift(&mut product);
            cart.add_product(&product, None)?;
            summary.added += 1;
        }

        let span = tracing::Span::current();
        span.record("removed", summary.removed);
        span.record("updated", summary.updated);
        span.record("added", summary.added);

        debug!(
            removed = summary.removed,
            updated = summary.updated,
            added = summary.added,
            "reconciled gift lines"
        );

        Ok(summary)
    }
}

/// Every line in the cart tagged as a gift, whichever rule created it.
pub fn current_gifts<'c, 'a>(cart: &'c Cart<'a>) -> SmallVec<[&'c LineItem<'a>; 4]> {
    cart.iter().filter(|item| is_gift(*item)).collect()
}
