//! Apex Core - Shared domain types.
//!
//! This crate provides the types shared by every Apex component:
//! - `storefront` - JSON API server (auth, catalog, orders)
//! - `cli` - Command-line tools for migrations, seeding and admin accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Database encodings are gated behind the `sqlite` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, sizes and roles
//! - [`cart`] - The shopping cart a client keeps between visits

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartItem};
pub use types::*;
