//! Lattice Gifts prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{BuyRequest, Cart, CartError},
    catalog::{Catalog, CatalogError, InMemoryCatalog},
    gifts::{
        GiftError, GiftItemManager, GiftingRule, ReconcileSummary, Rule, is_gift,
        is_gift_from_rule, mark_as_gift, mark_with_rule, rule,
        rules::free_bottle::{FreeBottleConfig, FreeBottleWithAnyBag},
    },
    items::{LineItem, LineItemKey},
    options::ItemOptions,
    products::{AttributeSetId, Product, ProductKey},
    receipt::{Receipt, ReceiptError},
    totals::{
        GiftPricingAdjuster, GrandTotalCollector, SubtotalCollector, Total, TotalCode,
        TotalCollector, TotalsCollector, TotalsError,
    },
};
