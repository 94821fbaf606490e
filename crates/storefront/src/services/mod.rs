//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Name and category filtering
//! - `cart` - Cart resolution and audited cart changes
//! - `checkout` - Stock-checked order placement
//! - `admin` - Admin authentication and product upserts
//!
//! Services borrow the shared [`Storage`](crate::store::Storage) and never
//! touch the session; handlers load and store session state around them.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
