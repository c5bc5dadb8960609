//! Shared sessions

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    cart::{Cart, CartError},
    items::{LineItemId, NewLineItem},
    snapshot::SnapshotStore,
};

use super::{CartSession, CheckoutError, OrderSummary};

/// Cloneable handle to a session used from several threads or tasks.
///
/// Each operation holds the session lock for the whole transition and snapshot write, so
/// concurrent calls for the same owner never interleave their read-modify-write.
#[derive(Debug)]
pub struct SharedCartSession<S> {
    inner: Arc<Mutex<CartSession<S>>>,
}

impl<S> Clone for SharedCartSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SnapshotStore> SharedCartSession<S> {
    /// Wrap a session for shared use.
    pub fn new(session: CartSession<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartSession<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut CartSession<S>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the current cart.
    pub fn cart(&self) -> Cart {
        self.lock().cart().clone()
    }

    /// See [`CartSession::add_item`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] for a negative unit price or a quantity overflow.
    pub fn add_item(&self, item: NewLineItem) -> Result<(), CartError> {
        self.lock().add_item(item)
    }

    /// See [`CartSession::remove_item`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Pricing`] only if the remaining totals cannot be calculated.
    pub fn remove_item(&self, id: &LineItemId) -> Result<(), CartError> {
        self.lock().remove_item(id)
    }

    /// See [`CartSession::set_quantity`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::QuantityOverflow`] if the quantity does not fit a line.
    pub fn set_quantity(&self, id: &LineItemId, quantity: i64) -> Result<(), CartError> {
        self.lock().set_quantity(id, quantity)
    }

    /// See [`CartSession::clear`].
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// See [`CartSession::complete_checkout`].
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::EmptyCart`] if there is nothing to check out.
    pub fn complete_checkout(&self) -> Result<OrderSummary, CheckoutError> {
        self.lock().complete_checkout()
    }
}
