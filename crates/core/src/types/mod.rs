//! Core types for Corner Shop.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use cart::{Cart, CartEntry, CartLine, CartSummary};
pub use id::*;
pub use order::{Buyer, Order, OrderItem};
pub use price::{Price, PriceError};
pub use product::Product;
