//! Free bottle with any bag
//!
//! Gives away one water bottle while the cart holds at least one bag, and never more
//! bottles than bags.

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    cart::Cart,
    catalog::Catalog,
    gifts::{GiftError, marker::is_gift_from_rule, marker::mark_with_rule, rules::GiftingRule},
    items::{LineItem, LineItemKey},
    products::{AttributeSetId, Product},
};

/// Attribute set that classifies a product as a bag.
pub const BAG_ATTRIBUTE_SET_ID: AttributeSetId = 15;

/// SKU of the bottle given away.
pub const GIFT_SKU: &str = "24-UG06";

/// Code recorded on the gift lines this rule creates.
pub const RULE_CODE: &str = "free_bottle";

/// Free bottle rule configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FreeBottleConfig {
    /// Attribute set identifying bags
    pub bag_attribute_set: AttributeSetId,

    /// SKU of the gift product
    pub gift_sku: String,

    /// Rule code stored on gift lines
    pub rule_code: String,
}

impl Default for FreeBottleConfig {
    fn default() -> Self {
        Self {
            bag_attribute_set: BAG_ATTRIBUTE_SET_ID,
            gift_sku: GIFT_SKU.to_string(),
            rule_code: RULE_CODE.to_string(),
        }
    }
}

/// Free bottle with any bag gifting rule.
#[derive(Debug)]
pub struct FreeBottleWithAnyBag<C> {
    config: FreeBottleConfig,
    catalog: C,
}

impl<C> FreeBottleWithAnyBag<C> {
    /// Create the rule with the default configuration.
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, FreeBottleConfig::default())
    }

    /// Create the rule with a custom configuration.
    pub fn with_config(catalog: C, config: FreeBottleConfig) -> Self {
        Self { config, catalog }
    }

    /// Returns the rule configuration.
    pub fn config(&self) -> &FreeBottleConfig {
        &self.config
    }

    /// Whole bags in the cart. Fractional remainders do not earn a bottle.
    fn count_bags(&self, cart: &Cart<'_>) -> Decimal {
        cart.iter()
            .filter(|item| item.attribute_set() == self.config.bag_attribute_set)
            .map(LineItem::qty)
            .sum::<Decimal>()
            .floor()
    }

    fn gift_bottles<'i, 'a>(
        &self,
        current_gifts: &[&'i LineItem<'a>],
    ) -> SmallVec<[&'i LineItem<'a>; 2]> {
        current_gifts
            .iter()
            .copied()
            .filter(|item| is_gift_from_rule(item, &self.config.gift_sku, &self.config.rule_code))
            .collect()
    }

    fn create_gift_bottle<'a>(&self) -> Result<Product<'a>, GiftError>
    where
        C: Catalog<'a>,
    {
        let gift_id = self
            .catalog
            .id_by_sku(&self.config.gift_sku)
            .ok_or_else(|| GiftError::UnknownGiftSku(self.config.gift_sku.clone()))?;

        let mut product = self.catalog.load(gift_id)?;

        mark_with_rule(&mut product, &self.config.rule_code);

        Ok(product)
    }
}

impl<'a, C> GiftingRule<'a> for FreeBottleWithAnyBag<C>
where
    C: Catalog<'a> + fmt::Debug,
{
    fn code(&self) -> &str {
        &self.config.rule_code
    }

    fn gifts_to_add(
        &self,
        cart: &Cart<'a>,
        current_gifts: &[&LineItem<'a>],
    ) -> Result<Vec<Product<'a>>, GiftError> {
        let bottles = self.gift_bottles(current_gifts);
        let bag_count = self.count_bags(cart);

        trace!(rule = %self.config.rule_code, %bag_count, bottles = bottles.len(), "gifts to add");

        if bottles.is_empty() && bag_count > Decimal::ZERO {
            return Ok(vec![self.create_gift_bottle()?]);
        }

        Ok(Vec::new())
    }

    fn gifts_to_remove(
        &self,
        cart: &Cart<'a>,
        current_gifts: &[&LineItem<'a>],
    ) -> Result<SmallVec<[LineItemKey; 4]>, GiftError> {
        let bag_count = self.count_bags(cart);

        if bag_count.is_zero() {
            return Ok(self
                .gift_bottles(current_gifts)
                .iter()
                .map(|item| item.key())
                .collect());
        }

        Ok(SmallVec::new())
    }

    fn gift_item_qty_updates(
        &self,
        cart: &Cart<'a>,
        current_gifts: &[&LineItem<'a>],
    ) -> Result<FxHashMap<LineItemKey, Decimal>, GiftError> {
        let bag_count = self.count_bags(cart);
        let bottles = self.gift_bottles(current_gifts);
        let bottle_count: Decimal = bottles.iter().map(|item| item.qty()).sum();

        let mut updates = FxHashMap::default();

        // Only the first bottle is resized; at most one bottle line is expected per cart.
        if let Some(first) = bottles.first().filter(|_| bottle_count > bag_count) {
            updates.insert(first.key(), bag_count);
        }

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        cart::BuyRequest,
        catalog::{CatalogError, InMemoryCatalog},
        gifts::marker::{is_gift, mark_as_gift},
        products::ProductKey,
    };

    use super::*;

    fn catalog<'a>() -> InMemoryCatalog<'a> {
        let mut catalog = InMemoryCatalog::new();

        catalog.insert(Product::new(
            ProductKey::default(),
            "24-MB01",
            "Joust Duffle Bag",
            BAG_ATTRIBUTE_SET_ID,
            Money::from_minor(3400, USD),
        ));
        catalog.insert(Product::new(
            ProductKey::default(),
            GIFT_SKU,
            "Affirm Water Bottle",
            11,
            Money::from_minor(700, USD),
        ));
        catalog.insert(Product::new(
            ProductKey::default(),
            "24-WG02",
            "Didi Sport Watch",
            12,
            Money::from_minor(9200, USD),
        ));

        catalog
    }

    fn add<'a>(
        cart: &mut Cart<'a>,
        catalog: &InMemoryCatalog<'a>,
        sku: &str,
        qty: i64,
    ) -> TestResult<LineItemKey> {
        let product = catalog.get_by_sku(sku).ok_or("missing product")?.clone();

        Ok(cart.add_product(&product, Some(BuyRequest::qty(qty)))?)
    }

    fn add_gift_bottle<'a>(
        cart: &mut Cart<'a>,
        catalog: &InMemoryCatalog<'a>,
        rule_code: &str,
        qty: i64,
    ) -> TestResult<LineItemKey> {
        let mut product = catalog.get_by_sku(GIFT_SKU).ok_or("missing product")?.clone();
        mark_with_rule(mark_as_gift(&mut product), rule_code);

        Ok(cart.add_product(&product, Some(BuyRequest::qty(qty)))?)
    }

    fn gifts<'c, 'a>(cart: &'c Cart<'a>) -> Vec<&'c LineItem<'a>> {
        cart.iter().filter(|item| is_gift(*item)).collect()
    }

    #[test]
    fn adds_bottle_when_bag_in_cart() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 1)?;

        let added = rule.gifts_to_add(&cart, &gifts(&cart))?;

        assert_eq!(added.len(), 1);
        assert_eq!(added.first().map(|p| p.sku.as_str()), Some(GIFT_SKU));
        assert_eq!(
            added.first().and_then(|p| p.options.gift_type()),
            Some(RULE_CODE)
        );

        Ok(())
    }

    #[test]
    fn does_not_add_bottle_without_bags() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-WG02", 3)?;

        assert!(rule.gifts_to_add(&cart, &gifts(&cart))?.is_empty());

        Ok(())
    }

    #[test]
    fn does_not_add_second_bottle() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 2)?;
        add_gift_bottle(&mut cart, &catalog, RULE_CODE, 1)?;

        assert!(rule.gifts_to_add(&cart, &gifts(&cart))?.is_empty());

        Ok(())
    }

    #[test]
    fn ignores_bottles_from_other_rules() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 1)?;
        add_gift_bottle(&mut cart, &catalog, "free_bottle_with_watch", 1)?;

        let current = gifts(&cart);

        assert_eq!(rule.gifts_to_add(&cart, &current)?.len(), 1);
        assert!(rule.gift_item_qty_updates(&cart, &current)?.is_empty());

        Ok(())
    }

    #[test]
    fn removes_bottles_when_no_bags() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        let bottle = add_gift_bottle(&mut cart, &catalog, RULE_CODE, 1)?;
        let other = add_gift_bottle(&mut cart, &catalog, "other_rule", 1)?;

        let removed = rule.gifts_to_remove(&cart, &gifts(&cart))?;

        assert_eq!(removed.as_slice(), [bottle]);
        assert!(!removed.contains(&other));

        Ok(())
    }

    #[test]
    fn keeps_bottle_when_bag_in_cart() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 1)?;
        add_gift_bottle(&mut cart, &catalog, RULE_CODE, 1)?;

        assert!(rule.gifts_to_remove(&cart, &gifts(&cart))?.is_empty());

        Ok(())
    }

    #[test]
    fn clamps_bottle_quantity_to_bag_count() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 2)?;
        let bottle = add_gift_bottle(&mut cart, &catalog, RULE_CODE, 5)?;

        let updates = rule.gift_item_qty_updates(&cart, &gifts(&cart))?;

        assert_eq!(updates.len(), 1);
        assert_eq!(updates.get(&bottle), Some(&Decimal::TWO));

        Ok(())
    }

    #[test]
    fn leaves_quantity_within_bag_count() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 3)?;
        add_gift_bottle(&mut cart, &catalog, RULE_CODE, 3)?;

        assert!(rule.gift_item_qty_updates(&cart, &gifts(&cart))?.is_empty());

        Ok(())
    }

    #[test]
    fn counts_bag_quantities_across_lines() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 1)?;
        add(&mut cart, &catalog, "24-WG02", 4)?;

        assert_eq!(rule.count_bags(&cart), Decimal::ONE);

        Ok(())
    }

    #[test]
    fn half_a_bag_earns_no_bottle() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        let bag = catalog.get_by_sku("24-MB01").ok_or("missing product")?.clone();
        cart.add_product(&bag, Some(BuyRequest::qty(Decimal::new(5, 1))))?;

        assert_eq!(rule.count_bags(&cart), Decimal::ZERO);
        assert!(rule.gifts_to_add(&cart, &gifts(&cart))?.is_empty());

        let bottle = add_gift_bottle(&mut cart, &catalog, RULE_CODE, 1)?;

        assert_eq!(rule.gifts_to_remove(&cart, &gifts(&cart))?.as_slice(), [bottle]);

        Ok(())
    }

    #[test]
    fn fractional_bags_round_down_for_clamping() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(&catalog);
        let mut cart = Cart::new(USD);
        let bag = catalog.get_by_sku("24-MB01").ok_or("missing product")?.clone();
        cart.add_product(&bag, Some(BuyRequest::qty(Decimal::new(15, 1))))?;
        add_gift_bottle(&mut cart, &catalog, RULE_CODE, 1)?;

        assert_eq!(rule.count_bags(&cart), Decimal::ONE);
        assert!(rule.gift_item_qty_updates(&cart, &gifts(&cart))?.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_gift_sku_is_a_configuration_error() -> TestResult {
        let catalog = catalog();
        let config = FreeBottleConfig {
            gift_sku: "missing".to_string(),
            ..FreeBottleConfig::default()
        };
        let rule = FreeBottleWithAnyBag::with_config(&catalog, config);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 1)?;

        let result = rule.gifts_to_add(&cart, &gifts(&cart));

        assert_eq!(result, Err(GiftError::UnknownGiftSku("missing".to_string())));

        Ok(())
    }

    #[derive(Debug)]
    struct StaleCatalog;

    impl<'a> Catalog<'a> for StaleCatalog {
        fn id_by_sku(&self, _sku: &str) -> Option<ProductKey> {
            Some(ProductKey::default())
        }

        fn load(&self, key: ProductKey) -> Result<Product<'a>, CatalogError> {
            Err(CatalogError::NotFound(key))
        }
    }

    #[test]
    fn catalog_load_failure_propagates() -> TestResult {
        let catalog = catalog();
        let rule = FreeBottleWithAnyBag::new(StaleCatalog);
        let mut cart = Cart::new(USD);
        add(&mut cart, &catalog, "24-MB01", 1)?;

        let result = rule.gifts_to_add(&cart, &gifts(&cart));

        assert_eq!(
            result,
            Err(GiftError::Catalog(CatalogError::NotFound(ProductKey::default())))
        );

        Ok(())
    }

    #[test]
    fn config_deserializes_with_defaults() -> TestResult {
        let config: FreeBottleConfig = serde_norway::from_str("gift_sku: 24-UG07\n")?;

        assert_eq!(config.gift_sku, "24-UG07");
        assert_eq!(config.bag_attribute_set, BAG_ATTRIBUTE_SET_ID);
        assert_eq!(config.rule_code, RULE_CODE);

        Ok(())
    }
}
