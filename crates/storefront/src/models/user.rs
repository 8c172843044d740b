//! User domain types.

use serde::Serialize;

use apex_core::{Email, Role, UserId};

/// A store account as exposed over the API.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email address; unique across accounts.
    pub email: Email,
    /// Account role.
    pub role: Role,
}
