//! Core types for Breeze.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod locale;
pub mod phone;
pub mod price;
pub mod product;

pub use email::{Email, EmailError};
pub use id::*;
pub use locale::{Locale, LocaleError};
pub use phone::{Phone, PhoneError};
pub use price::{CurrencyCode, CurrencyError, Price, PriceError};
pub use product::{Capacity, Product};
