//! Cart

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::{
    items::{LineItem, LineItemId, NewLineItem},
    pricing::{CartTotals, PricingError, totals},
};

mod commands;

pub use commands::CartCommand;

/// Errors raised by cart operations.
///
/// A failed operation leaves the cart exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line was offered with a unit price below zero.
    #[error("line item {0} has a negative unit price")]
    NegativePrice(LineItemId),

    /// A quantity would exceed the supported maximum.
    #[error("quantity of line item {0} exceeds the supported maximum")]
    QuantityOverflow(LineItemId),

    /// Totals could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How a repeated add of an existing line treats the newer candidate's fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Only bump the quantity; the first-seen name, image, category and prices stay.
    #[default]
    KeepFirst,

    /// Bump the quantity and overwrite display fields and prices with the newer candidate's.
    Refresh,
}

/// Shopping cart aggregate.
///
/// Holds the ordered line items and totals derived from them. Every operation recomputes
/// the totals, so they are never out of step with the items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
    totals: CartTotals,
    policy: MergePolicy,
}

impl Cart {
    /// Create a new empty cart with the default merge policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty cart with the given merge policy.
    pub fn with_policy(policy: MergePolicy) -> Self {
        Self {
            items: Vec::new(),
            totals: CartTotals::zero(),
            policy,
        }
    }

    /// Rebuild a cart from previously persisted line items.
    ///
    /// Items are taken in order. Lines with a zero quantity or a negative unit price are
    /// dropped one by one, and repeated ids are collapsed into the first occurrence with their
    /// quantities summed. Totals are always recalculated.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityOverflow`]: collapsing repeated ids overflows a quantity.
    /// - [`CartError::Pricing`]: the totals overflow.
    pub fn restore(
        items: impl IntoIterator<Item = LineItem>,
        policy: MergePolicy,
    ) -> Result<Self, CartError> {
        let mut restored: Vec<LineItem> = Vec::new();

        for item in items {
            if item.quantity() == 0 {
                continue;
            }

            if item.unit_price() < Decimal::ZERO {
                warn!(
                    id = %item.id(),
                    price = %item.unit_price(),
                    "dropping restored line with negative price"
                );

                continue;
            }

            match restored.iter_mut().find(|existing| existing.id() == item.id()) {
                Some(existing) => {
                    let quantity = existing
                        .quantity()
                        .checked_add(item.quantity())
                        .ok_or_else(|| CartError::QuantityOverflow(item.id().clone()))?;

                    existing.set_quantity(quantity);
                }
                None => restored.push(item),
            }
        }

        Self::from_items(restored, policy)
    }

    fn from_items(items: Vec<LineItem>, policy: MergePolicy) -> Result<Self, CartError> {
        let totals = totals(&items)?;

        Ok(Self {
            items,
            totals,
            policy,
        })
    }

    /// Compute the cart that results from applying `command`, leaving `self` untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the command is rejected or the new totals overflow.
    pub fn apply(&self, command: &CartCommand) -> Result<Self, CartError> {
        let mut items = self.items.clone();

        command.apply_to(&mut items, self.policy)?;

        Self::from_items(items, self.policy)
    }

    /// Apply `command` in place.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the command is rejected; the cart is left unchanged.
    pub fn execute(&mut self, command: &CartCommand) -> Result<(), CartError> {
        *self = self.apply(command)?;

        Ok(())
    }

    /// Add one unit of a product variant.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] for a negative unit price or a quantity overflow.
    pub fn add_item(&mut self, item: NewLineItem) -> Result<(), CartError> {
        self.execute(&CartCommand::Add(item))
    }

    /// Remove a line; missing ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Pricing`] only if the remaining totals cannot be calculated.
    pub fn remove_item(&mut self, id: &LineItemId) -> Result<(), CartError> {
        self.execute(&CartCommand::Remove(id.clone()))
    }

    /// Set a line's absolute quantity; zero or below removes it, missing ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::QuantityOverflow`] if the quantity does not fit a line.
    pub fn set_quantity(&mut self, id: &LineItemId, quantity: i64) -> Result<(), CartError> {
        self.execute(&CartCommand::SetQuantity {
            id: id.clone(),
            quantity,
        })
    }

    /// Remove every line and reset totals to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.totals = CartTotals::zero();
    }

    /// Get a line by id.
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Derived totals.
    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    /// Sum of unit price times quantity.
    pub fn subtotal(&self) -> Decimal {
        self.totals.subtotal
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.totals.item_count
    }

    /// Merge policy for repeated adds.
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
