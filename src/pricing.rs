//! Pricing

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::items::{LineItem, LineItemId};

/// Errors that can occur while calculating cart totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A single line's unit price times quantity does not fit in a decimal.
    #[error("line total for {0} overflows")]
    LineOverflow(LineItemId),

    /// The sum of line totals, or of quantities, does not fit.
    #[error("cart subtotal overflows")]
    SubtotalOverflow,
}

/// Totals derived from a cart's line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of unit price times quantity over every line
    pub subtotal: Decimal,

    /// Sum of quantities over every line
    pub item_count: u64,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            item_count: 0,
        }
    }

    fn add_line(self, item: &LineItem) -> Result<Self, PricingError> {
        let line_total = item
            .line_total()
            .ok_or_else(|| PricingError::LineOverflow(item.id().clone()))?;

        let subtotal = self
            .subtotal
            .checked_add(line_total)
            .ok_or(PricingError::SubtotalOverflow)?;

        let item_count = self
            .item_count
            .checked_add(u64::from(item.quantity()))
            .ok_or(PricingError::SubtotalOverflow)?;

        Ok(Self {
            subtotal,
            item_count,
        })
    }
}

/// Calculates the totals of a list of line items from scratch.
///
/// # Errors
///
/// - [`PricingError::LineOverflow`]: a line total does not fit in a decimal.
/// - [`PricingError::SubtotalOverflow`]: the subtotal or the item count overflows.
pub fn totals(items: &[LineItem]) -> Result<CartTotals, PricingError> {
    items.iter().try_fold(CartTotals::zero(), CartTotals::add_line)
}
