//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are bare amounts; the store sells in a single configured
//! currency, so [`CurrencyCode`] lives in configuration rather than on every
//! price.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Locale;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices may not be negative.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount in the store currency's standard unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Error returned when parsing an unknown currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyError(pub String);

/// ISO 4217 currency codes the storefront can be configured to sell in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    SAR,
    AED,
    KWD,
    EGP,
    USD,
}

impl CurrencyCode {
    /// The ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SAR => "SAR",
            Self::AED => "AED",
            Self::KWD => "KWD",
            Self::EGP => "EGP",
            Self::USD => "USD",
        }
    }

    /// The display symbol for the given locale.
    #[must_use]
    pub const fn symbol(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::SAR, Locale::Ar) => "ر.س",
            (Self::AED, Locale::Ar) => "د.إ",
            (Self::KWD, Locale::Ar) => "د.ك",
            (Self::EGP, Locale::Ar) => "ج.م",
            (Self::USD, _) => "$",
            (Self::SAR, Locale::En) => "SAR",
            (Self::AED, Locale::En) => "AED",
            (Self::KWD, Locale::En) => "KWD",
            (Self::EGP, Locale::En) => "EGP",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAR" => Ok(Self::SAR),
            "AED" => Ok(Self::AED),
            "KWD" => Ok(Self::KWD),
            "EGP" => Ok(Self::EGP),
            "USD" => Ok(Self::USD),
            _ => Err(CurrencyError(s.to_owned())),
        }
    }
}
