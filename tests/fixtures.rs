//! Integration tests for the bundled fixture sets.
//!
//! The `bags` set holds two tees, a duffle bag and a shoulder pack. Reconciling
//! it adds a single free Affirm Water Bottle:
//!
//! - Logan Tee: 2 x $24.00 = $48.00
//! - Joust Duffle Bag: $34.00
//! - Strive Shoulder Pack: $32.00
//! - Affirm Water Bottle: free (was $7.00)
//!
//! Expected total: $114.00

use std::fs;

use rusty_money::{
    Money,
    iso::{EUR, GBP, USD},
};
use tempfile::TempDir;
use testresult::TestResult;

use lattice_gifts::{fixtures::Fixture, prelude::*};

fn collector_for<'a>(fixture: &'a Fixture<'a>) -> TotalsCollector<'a> {
    let free_bottle =
        FreeBottleWithAnyBag::with_config(fixture.catalog(), fixture.rule_config().clone());

    TotalsCollector::with_default_collectors()
        .with_gift_manager(GiftItemManager::new(rule(free_bottle)))
}

#[test]
fn bags_fixture_gets_one_free_bottle() -> TestResult {
    let fixture = Fixture::from_set("bags")?;
    let mut cart = fixture.cart()?;

    assert_eq!(cart.len(), 3);

    let total = collector_for(&fixture).collect(&mut cart)?;

    assert_eq!(cart.len(), 4);
    assert_eq!(total.grand_total(), Money::from_minor(11400, USD));

    let receipt = Receipt::from_cart(&cart)?;
    assert_eq!(receipt.gift_count(), 1);

    let mut out = Vec::new();
    receipt.write_to(&mut out)?;
    let output = String::from_utf8(out)?;

    assert!(output.contains("Affirm Water Bottle"));
    assert!(output.contains("Free gift (was $7.00)"));

    Ok(())
}

#[test]
fn tees_fixture_is_converted_without_gifts() -> TestResult {
    let fixture = Fixture::from_set("tees")?;
    let mut cart = fixture.cart()?;

    let total = collector_for(&fixture).collect(&mut cart)?;

    assert_eq!(cart.len(), 1);
    assert_eq!(total.grand_total(), Money::from_minor(1800, EUR));
    assert_eq!(total.base_grand_total(), Money::from_minor(2000, USD));

    Ok(())
}

#[test]
fn custom_rule_fixture_changes_the_gift() -> TestResult {
    let dir = TempDir::new()?;

    for kind in ["products", "carts", "rules"] {
        fs::create_dir_all(dir.path().join(kind))?;
    }

    fs::write(
        dir.path().join("products").join("custom.yml"),
        "products:\n  BAG:\n    name: Bag\n    attribute_set: 20\n    price: 10.00 GBP\n  PEN:\n    name: Pen\n    attribute_set: 3\n    price: 1.50 GBP\n",
    )?;
    fs::write(
        dir.path().join("carts").join("custom.yml"),
        "lines:\n  - sku: BAG\n    qty: 2\n",
    )?;
    fs::write(
        dir.path().join("rules").join("custom.yml"),
        "free_bottle:\n  bag_attribute_set: 20\n  gift_sku: PEN\n  rule_code: free_pen\n",
    )?;

    let mut fixture = Fixture::with_base_path(dir.path());
    fixture
        .load_products("custom")?
        .load_cart("custom")?
        .load_rules("custom")?;

    let mut cart = fixture.cart()?;
    collector_for(&fixture).collect(&mut cart)?;

    let pen = cart.iter().find(|item| is_gift(*item)).ok_or("missing gift")?;

    assert_eq!(pen.sku(), "PEN");
    assert_eq!(pen.options().gift_type(), Some("free_pen"));
    assert_eq!(
        cart.totals().map(Total::grand_total),
        Some(Money::from_minor(2000, GBP))
    );

    Ok(())
}
