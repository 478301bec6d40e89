//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, gifts::is_gift, items::LineItem};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The cart has no collected totals.
    #[error("Cart totals have not been collected")]
    MissingTotals,

    /// IO error
    #[error("IO error")]
    IO,
}

/// A printed cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Product name
    pub name: String,

    /// Quantity
    pub qty: Decimal,

    /// Unit price charged, in the cart currency
    pub unit_price: Money<'a, Currency>,

    /// Row total charged, in the cart currency
    pub row_total: Money<'a, Currency>,

    /// Product unit price, in the base currency
    pub price: Money<'a, Currency>,

    /// Whether the line is a gift
    pub gift: bool,
}

impl<'a> From<&LineItem<'a>> for ReceiptLine<'a> {
    fn from(item: &LineItem<'a>) -> Self {
        Self {
            name: item.name().to_string(),
            qty: item.qty(),
            unit_price: *item.calculation_price(),
            row_total: *item.row_total(),
            price: *item.price(),
            gift: is_gift(item),
        }
    }
}

/// Final receipt for a collected cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 10]>,
    subtotal: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> Receipt<'a> {
    /// Capture the lines and collected totals of a cart.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::MissingTotals`] if totals have not been collected for the cart.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, ReceiptError> {
        let totals = cart.totals().ok_or(ReceiptError::MissingTotals)?;

        Ok(Self {
            lines: cart.iter().map(ReceiptLine::from).collect(),
            subtotal: totals.subtotal(),
            total: totals.grand_total(),
        })
    }

    /// Printed lines, in cart order.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Subtotal charged, gift lines excluded.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount charged.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Number of gift lines.
    #[must_use]
    pub fn gift_count(&self) -> usize {
        self.lines.iter().filter(|line| line.gift).count()
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Row Total", "Note"]);

        let mut gift_rows: SmallVec<[usize; 4]> = SmallVec::new();

        for (idx, line) in self.lines.iter().enumerate() {
            let note = if line.gift {
                gift_rows.push(idx + 1);
                format!("Free gift (was {})", line.price)
            } else {
                String::new()
            };

            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.qty.normalize().to_string(),
                line.unit_price.to_string(),
                line.row_total.to_string(),
                note,
            ]);
        }

        write_receipt_table(&mut out, builder, &gift_rows)?;
        write_receipt_summary(&mut out, self)
    }
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    gift_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    for &row in gift_rows {
        table.modify((row, 5), color_green());
    }

    let table_str = dim_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

const DIM: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Right-aligned subtotal and total rows under the table. The total is bold.
fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let rows = [
        ("Subtotal:", receipt.subtotal().to_string(), ""),
        ("Total:", receipt.total().to_string(), BOLD),
    ];

    let label_width = rows.iter().map(|(label, ..)| label.len()).max().unwrap_or_default();
    let value_width = rows
        .iter()
        .map(|(_, value, _)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value, style) in &rows {
        let reset = if style.is_empty() { "" } else { RESET };

        writeln!(out, " {style}{label:>label_width$}  {value:>value_width$}{reset}  ")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Dims every run of box-drawing characters in a rendered table.
fn dim_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut dimmed = false;

    for ch in table.chars() {
        let border = matches!(ch, '\u{2500}'..='\u{257F}');

        if border != dimmed {
            out.push_str(if border { DIM } else { RESET });
            dimmed = border;
        }

        out.push(ch);
    }

    if dimmed {
        out.push_str(RESET);
    }

    out
}

fn color_green() -> Color {
    Color::new("\x1b[32m", RESET)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        cart::BuyRequest,
        gifts::{mark_as_gift, mark_with_rule},
        products::{Product, ProductKey},
        totals::TotalsCollector,
    };

    use super::*;

    fn collected_cart<'a>() -> Result<Cart<'a>, Box<dyn std::error::Error>> {
        let mut cart = Cart::new(USD);
        let bag = Product::new(ProductKey::default(), "24-MB01", "Joust Duffle Bag", 15, Money::from_minor(3400, USD));
        let mut bottle = Product::new(ProductKey::default(), "24-UG06", "Affirm Water Bottle", 11, Money::from_minor(700, USD));
        mark_with_rule(mark_as_gift(&mut bottle), "free_bottle");

        cart.add_product(&bag, Some(BuyRequest::qty(2)))?;
        cart.add_product(&bottle, Some(BuyRequest::qty(2)))?;

        TotalsCollector::with_default_collectors().collect(&mut cart)?;

        Ok(cart)
    }

    #[test]
    fn from_cart_requires_totals() {
        let cart = Cart::new(USD);

        assert!(matches!(Receipt::from_cart(&cart), Err(ReceiptError::MissingTotals)));
    }

    #[test]
    fn from_cart_captures_lines_and_totals() -> TestResult {
        let cart = collected_cart()?;
        let receipt = Receipt::from_cart(&cart)?;

        assert_eq!(receipt.lines().len(), 2);
        assert_eq!(receipt.gift_count(), 1);
        assert_eq!(receipt.subtotal(), Money::from_minor(6800, USD));
        assert_eq!(receipt.total(), Money::from_minor(6800, USD));

        let gift = receipt.lines().get(1).ok_or("missing gift line")?;
        assert!(gift.gift);
        assert_eq!(gift.row_total, Money::from_minor(0, USD));
        assert_eq!(gift.price, Money::from_minor(700, USD));

        Ok(())
    }

    #[test]
    fn write_to_renders_gift_note_and_totals() -> TestResult {
        let cart = collected_cart()?;
        let receipt = Receipt::from_cart(&cart)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains("Joust Duffle Bag"));
        assert!(output.contains("Affirm Water Bottle"));
        assert!(output.contains("Free gift (was $7.00)"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Total:"));
        assert!(output.contains("$68.00"));

        Ok(())
    }

    #[test]
    fn summary_right_aligns_labels_and_values() -> TestResult {
        let receipt = Receipt::from_cart(&collected_cart()?)?;

        let mut out = Vec::new();
        write_receipt_summary(&mut out, &receipt)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains(" Subtotal:  $68.00  \n"));
        assert!(output.contains(" \x1b[1m   Total:  $68.00\x1b[0m  \n"));

        Ok(())
    }

    #[test]
    fn dim_borders_wraps_box_runs() {
        assert_eq!(dim_borders("a──b"), "a\x1b[90m──\x1b[0mb");
        assert_eq!(dim_borders("╰─"), "\x1b[90m╰─\x1b[0m");
    }
}
