//! Cart commands
//!
//! Each command is a state transition over an ordered list of line items. Transitions never
//! touch totals or persistence; [`Cart::apply`](super::Cart::apply) recomputes the former and
//! the session layer handles the latter.

use rust_decimal::Decimal;

use crate::items::{LineItem, LineItemId, NewLineItem};

use super::{CartError, MergePolicy};

/// A mutation that can be applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add one unit of a product variant, collapsing into an existing line with the same id.
    Add(NewLineItem),

    /// Remove a line. Missing ids are ignored.
    Remove(LineItemId),

    /// Set a line's quantity. Zero or negative removes the line; missing ids are ignored.
    SetQuantity {
        /// Line to update
        id: LineItemId,

        /// Absolute quantity
        quantity: i64,
    },

    /// Remove every line.
    Clear,
}

impl CartCommand {
    /// Applies the command to `items` in place.
    pub(super) fn apply_to(
        &self,
        items: &mut Vec<LineItem>,
        policy: MergePolicy,
    ) -> Result<(), CartError> {
        match self {
            Self::Add(candidate) => add(items, candidate, policy),
            Self::Remove(id) => {
                remove(items, id);

                Ok(())
            }
            Self::SetQuantity { id, quantity } => set_quantity(items, id, *quantity),
            Self::Clear => {
                items.clear();

                Ok(())
            }
        }
    }
}

fn add(
    items: &mut Vec<LineItem>,
    candidate: &NewLineItem,
    policy: MergePolicy,
) -> Result<(), CartError> {
    let id = candidate.id();

    if candidate.unit_price < Decimal::ZERO {
        return Err(CartError::NegativePrice(id));
    }

    match items.iter_mut().find(|item| item.id() == &id) {
        Some(existing) => {
            let quantity = existing
                .quantity()
                .checked_add(1)
                .ok_or(CartError::QuantityOverflow(id))?;

            if policy == MergePolicy::Refresh {
                existing.refresh_from(candidate);
            }

            existing.set_quantity(quantity);
        }
        None => items.push(candidate.clone().into_line_item(1)),
    }

    Ok(())
}

fn remove(items: &mut Vec<LineItem>, id: &LineItemId) {
    items.retain(|item| item.id() != id);
}

fn set_quantity(
    items: &mut Vec<LineItem>,
    id: &LineItemId,
    quantity: i64,
) -> Result<(), CartError> {
    if quantity <= 0 {
        remove(items, id);

        return Ok(());
    }

    let Some(existing) = items.iter_mut().find(|item| item.id() == id) else {
        return Ok(());
    };

    let Ok(quantity) = u32::try_from(quantity) else {
        return Err(CartError::QuantityOverflow(id.clone()));
    };

    existing.set_quantity(quantity);

    Ok(())
}
