//! The authenticated caller.

use serde::{Deserialize, Serialize};

use apex_core::{Email, Role, UserId};

/// Identity asserted by a verified bearer token.
///
/// The role is as of token issuance; tokens are not re-checked against the
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

impl CurrentUser {
    /// Whether the caller is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
