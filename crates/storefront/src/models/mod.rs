//! Domain models for the storefront.
//!
//! These types are validated domain objects, separate from the row types in
//! [`crate::db`]. Response types serialize with camelCase field names.

pub mod identity;
pub mod order;
pub mod product;
pub mod user;

pub use identity::CurrentUser;
pub use order::{NewOrder, Order, OrderDetail, OrderItemDetail};
pub use product::{Product, ProductInput};
pub use user::User;
