//! Checkout

use serde::Serialize;
use thiserror::Error;

use crate::{cart::Cart, items::LineItem, pricing::CartTotals};

/// Errors raised when completing a checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// What a completed checkout bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    items: Vec<LineItem>,
    totals: CartTotals,
}

impl OrderSummary {
    pub(crate) fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            totals: cart.totals(),
        }
    }

    /// Purchased lines in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Totals at the time of checkout.
    pub fn totals(&self) -> CartTotals {
        self.totals
    }
}
