//! Tally
//!
//! Tally is a shopping cart aggregate: ordered line items, totals that are always derived
//! from them, and a pluggable snapshot store that lets a cart survive restarts.

pub mod cart;
pub mod display;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod session;
pub mod snapshot;
