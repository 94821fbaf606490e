//! Corner Shop Core - Shared domain types.
//!
//! This crate provides the domain types used by the storefront:
//! - products and their identifiers
//! - the session cart and its resolution against the catalog
//! - immutable order records
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no file access,
//! no HTTP. Persistence and request handling live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, carts and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
