//! Receipt
//!
//! Terminal rendering of carts and completed checkouts.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::Cart,
    display::{DisplayCurrency, DisplayError},
    items::LineItem,
    pricing::CartTotals,
    session::OrderSummary,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Converting the total to the display currency failed.
    #[error(transparent)]
    Display(#[from] DisplayError),

    /// Writing the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Write the contents of a cart as a table followed by its totals.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the total cannot be converted or the output cannot be
/// written.
pub fn write_cart(
    mut out: impl io::Write,
    cart: &Cart,
    display: &DisplayCurrency,
) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;

        return Ok(());
    }

    write_lines(&mut out, cart.items())?;
    write_summary(&mut out, cart.totals(), display)
}

/// Write a completed checkout.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the total cannot be converted or the output cannot be
/// written.
pub fn write_order(
    mut out: impl io::Write,
    order: &OrderSummary,
    display: &DisplayCurrency,
) -> Result<(), ReceiptError> {
    writeln!(out, "Order placed")?;

    write_lines(&mut out, order.items())?;
    write_summary(&mut out, order.totals(), display)
}

fn write_lines(out: &mut impl io::Write, items: &[LineItem]) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Category", "Unit Price", "Qty", "Line Total"]);

    for item in items {
        let line_total = item
            .line_total()
            .map_or_else(|| "overflow".to_string(), format_amount);

        builder.push_record([
            item.id().to_string(),
            item_label(item),
            item.category().to_string(),
            format_amount(item.unit_price()),
            item.quantity().to_string(),
            line_total,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_summary(
    out: &mut impl io::Write,
    totals: CartTotals,
    display: &DisplayCurrency,
) -> Result<(), ReceiptError> {
    let display_total = display.display_total(&totals)?;

    writeln!(out, " Items:    {}", totals.item_count)?;
    writeln!(out, " Subtotal: {}", format_amount(totals.subtotal))?;
    writeln!(out, " Total:    {display_total}")?;

    Ok(())
}

fn item_label(item: &LineItem) -> String {
    match item.variant() {
        Some(variant) => format!("{} ({variant})", item.name()),
        None => item.name().to_string(),
    }
}

fn format_amount(amount: Decimal) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::items::NewLineItem;

    use super::*;

    fn render(cart: &Cart) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();

        write_cart(&mut out, cart, &DisplayCurrency::default())?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn empty_cart_renders_placeholder() -> TestResult {
        assert_eq!(render(&Cart::new())?, "Cart is empty\n");

        Ok(())
    }

    #[test]
    fn cart_renders_lines_and_totals() -> TestResult {
        let mut cart = Cart::new();

        let shirt = NewLineItem::new("p1", "Shirt", Decimal::new(1050, 2)).with_variant("M");

        cart.add_item(shirt.clone())?;
        cart.add_item(shirt)?;
        cart.add_item(NewLineItem::new("p2", "Cap", Decimal::from(4)).with_category("hats"))?;

        let output = render(&cart)?;

        assert!(output.contains("Shirt (M)"), "missing variant label in {output}");
        assert!(output.contains("21.00"), "missing line total in {output}");
        assert!(output.contains("hats"), "missing category in {output}");
        assert!(output.contains(" Items:    3"), "missing item count in {output}");
        assert!(output.contains(" Subtotal: 25.00"), "missing subtotal in {output}");

        Ok(())
    }
}
