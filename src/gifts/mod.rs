//! Gifts
//!
//! Lifecycle management for complimentary cart lines. A [`GiftingRule`] decides which
//! gift lines a cart should hold and the [`GiftItemManager`] applies those decisions.
//! Gift lines are then priced at zero by
//! [`GiftPricingAdjuster`](crate::totals::gifts::GiftPricingAdjuster).

use thiserror::Error;

use crate::{cart::CartError, catalog::CatalogError};

pub mod manager;
pub mod marker;
pub mod rules;

pub use manager::{GiftItemManager, ReconcileSummary};
pub use marker::{Giftable, is_gift, is_gift_from_rule, mark_as_gift, mark_with_rule};
pub use rules::{GiftingRule, Rule, rule};

/// Errors raised while reconciling gift lines.
#[derive(Debug, Error, PartialEq)]
pub enum GiftError {
    /// A rule's gift SKU does not resolve to a catalog product.
    #[error("The gift SKU {0} does not exist")]
    UnknownGiftSku(String),

    /// Wrapped catalog lookup error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Wrapped cart mutation error.
    #[error(transparent)]
    Cart(#[from] CartError),
}

impl GiftError {
    /// Whether the error points at a misconfigured rule rather than a runtime failure.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnknownGiftSku(_))
    }
}
