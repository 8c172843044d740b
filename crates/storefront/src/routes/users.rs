//! User administration handlers.

use axum::{Json, extract::State};

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

/// GET /api/users
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}
