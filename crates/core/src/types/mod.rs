//! Core types for Apex.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod line;
pub mod price;
pub mod shipping;
pub mod sizes;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use line::{LineItem, merge_lines};
pub use price::{Price, PriceError};
pub use shipping::{ShippingError, ShippingInfo};
pub use sizes::{Sizes, SizesError};
pub use status::*;
