//! Authentication route handlers.
//!
//! Registration and login return a bearer token together with the user.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::auth::{AuthService, AuthSession};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for `GET /api/auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<AuthSession>> {
    let session = AuthService::new(state.pool(), state.tokens())
        .register(&body.name, &body.email, &body.password)
        .await?;
    Ok(Json(session))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthSession>> {
    let session = AuthService::new(state.pool(), state.tokens())
        .login(&body.email, &body.password)
        .await?;
    Ok(Json(session))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<MeResponse>> {
    let user = AuthService::new(state.pool(), state.tokens())
        .current_user(&identity)
        .await?;
    Ok(Json(MeResponse { user }))
}
