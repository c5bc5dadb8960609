//! Cart sessions
//!
//! A [`CartSession`] pairs a [`Cart`] with the [`SnapshotStore`] it is persisted to. The
//! session restores the cart once when it opens and writes the items back after every
//! successful mutation. Persistence is best-effort: failures are logged and never fail the
//! mutation, because the in-memory cart is the source of truth for the running session.

use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartCommand, CartError, MergePolicy},
    items::{LineItemId, NewLineItem},
    snapshot::{SnapshotStore, codec},
};

mod checkout;
mod shared;

pub use checkout::{CheckoutError, OrderSummary};
pub use shared::SharedCartSession;

/// A cart owned by one session, persisted through an injected store.
#[derive(Debug)]
pub struct CartSession<S> {
    cart: Cart,
    store: S,
}

impl<S: SnapshotStore> CartSession<S> {
    /// Open a session, restoring whatever cart the store holds.
    ///
    /// A missing, unreadable or invalid snapshot yields an empty cart.
    pub fn open(store: S, policy: MergePolicy) -> Self {
        let cart = restore_cart(&store, policy);

        Self { cart, store }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the session, returning the cart and its store.
    pub fn into_parts(self) -> (Cart, S) {
        (self.cart, self.store)
    }

    /// Apply a command, then persist the resulting items.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the command is rejected. Nothing is persisted in that case.
    #[tracing::instrument(name = "cart.session.execute", skip(self), err)]
    pub fn execute(&mut self, command: CartCommand) -> Result<(), CartError> {
        self.cart = self.cart.apply(&command)?;

        debug!(
            lines = self.cart.len(),
            item_count = self.cart.item_count(),
            subtotal = %self.cart.subtotal(),
            "cart updated"
        );

        self.persist();

        Ok(())
    }

    /// Add one unit of a product variant.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] for a negative unit price or a quantity overflow.
    pub fn add_item(&mut self, item: NewLineItem) -> Result<(), CartError> {
        self.execute(CartCommand::Add(item))
    }

    /// Remove a line; missing ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Pricing`] only if the remaining totals cannot be calculated.
    pub fn remove_item(&mut self, id: &LineItemId) -> Result<(), CartError> {
        self.execute(CartCommand::Remove(id.clone()))
    }

    /// Set a line's absolute quantity; zero or below removes it, missing ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::QuantityOverflow`] if the quantity does not fit a line.
    pub fn set_quantity(&mut self, id: &LineItemId, quantity: i64) -> Result<(), CartError> {
        self.execute(CartCommand::SetQuantity {
            id: id.clone(),
            quantity,
        })
    }

    /// Empty the cart and persist the empty snapshot.
    pub fn clear(&mut self) {
        self.cart.clear();

        debug!("cart cleared");

        self.persist();
    }

    /// Close out the cart for checkout: return what was bought and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::EmptyCart`] if there is nothing to check out.
    pub fn complete_checkout(&mut self) -> Result<OrderSummary, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = OrderSummary::from_cart(&self.cart);

        self.clear();

        info!(
            lines = summary.items().len(),
            item_count = summary.totals().item_count,
            subtotal = %summary.totals().subtotal,
            "checkout completed"
        );

        Ok(summary)
    }

    fn persist(&mut self) {
        let result =
            codec::encode(self.cart.items()).and_then(|bytes| self.store.save(&bytes));

        if let Err(error) = result {
            warn!(%error, "failed to persist cart snapshot");
        }
    }
}

fn restore_cart<S: SnapshotStore>(store: &S, policy: MergePolicy) -> Cart {
    let bytes = match store.load() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Cart::with_policy(policy),
        Err(error) => {
            warn!(%error, "failed to load cart snapshot, starting empty");

            return Cart::with_policy(policy);
        }
    };

    let items = match codec::decode(&bytes) {
        Ok(items) => items,
        Err(error) => {
            warn!(%error, "discarding unreadable cart snapshot");

            return Cart::with_policy(policy);
        }
    };

    match Cart::restore(items, policy) {
        Ok(cart) => {
            debug!(
                lines = cart.len(),
                item_count = cart.item_count(),
                "restored cart snapshot"
            );

            cart
        }
        Err(error) => {
            warn!(%error, "discarding invalid cart snapshot");

            Cart::with_policy(policy)
        }
    }
}
