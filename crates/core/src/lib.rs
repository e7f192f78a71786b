//! Breeze Core - Shared types library.
//!
//! This crate provides common types used across all Breeze components:
//! - `storefront` - Client-side cart, compare and favorites engines
//! - `cli` - Terminal client for browsing, cart management and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, locales, contacts and the
//!   product snapshot carried by the storefront lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
