//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, login and bearer tokens
//! - `catalog` - Product reads and admin product management
//! - `orders` - Atomic order placement and order history

pub mod auth;
pub mod catalog;
pub mod orders;
