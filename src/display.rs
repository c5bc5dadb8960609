//! Display currency
//!
//! Cart prices are kept in the store's base currency. Storefront screens show totals in a
//! display currency obtained by multiplying by a fixed rate; that conversion lives here and
//! is never stored on the cart.

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::pricing::CartTotals;

/// Fixed base-to-display multiplier used by the storefront.
pub const DEFAULT_DISPLAY_RATE: Decimal = Decimal::from_parts(15_000, 0, 0, false, 0);

/// Errors raised while converting to the display currency.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    /// The converted amount does not fit in a decimal.
    #[error("amount {0} overflows when converted to the display currency")]
    Overflow(Decimal),

    /// No ISO currency has the given code.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),
}

/// Currency and fixed rate used to present base-currency amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayCurrency {
    currency: &'static Currency,
    rate: Decimal,
}

impl Default for DisplayCurrency {
    fn default() -> Self {
        Self::new(iso::IDR, DEFAULT_DISPLAY_RATE)
    }
}

impl DisplayCurrency {
    /// Create a display currency with the given multiplier.
    pub fn new(currency: &'static Currency, rate: Decimal) -> Self {
        Self { currency, rate }
    }

    /// Create a display currency from an ISO 4217 code.
    ///
    /// # Errors
    ///
    /// Returns a [`DisplayError::UnknownCurrency`] if no currency has the code.
    pub fn from_code(code: &str, rate: Decimal) -> Result<Self, DisplayError> {
        let currency = iso::find(&code.to_ascii_uppercase())
            .ok_or_else(|| DisplayError::UnknownCurrency(code.to_string()))?;

        Ok(Self::new(currency, rate))
    }

    /// Target currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Base-to-display multiplier.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Convert a base-currency amount.
    ///
    /// # Errors
    ///
    /// Returns a [`DisplayError::Overflow`] if the converted amount does not fit.
    pub fn convert(&self, amount: Decimal) -> Result<Money<'static, Currency>, DisplayError> {
        let converted = amount
            .checked_mul(self.rate)
            .ok_or(DisplayError::Overflow(amount))?;

        Ok(Money::from_decimal(converted, self.currency))
    }

    /// Convert a cart's subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`DisplayError::Overflow`] if the converted subtotal does not fit.
    pub fn display_total(
        &self,
        totals: &CartTotals,
    ) -> Result<Money<'static, Currency>, DisplayError> {
        self.convert(totals.subtotal)
    }
}
