//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartCommand, CartError, MergePolicy},
    display::{DisplayCurrency, DisplayError},
    items::{LineItem, LineItemId, NewLineItem},
    pricing::{CartTotals, PricingError},
    receipt::ReceiptError,
    session::{CartSession, CheckoutError, OrderSummary, SharedCartSession},
    snapshot::{FileStore, MemoryStore, SnapshotError, SnapshotStore},
};
