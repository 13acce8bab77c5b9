//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use vitrine_common::AppResult;
use vitrine_core::RegisterInput;
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated session response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub username: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub token: Option<String>,
}

impl From<vitrine_db::entities::user::Model> for SessionResponse {
    fn from(user: vitrine_db::entities::user::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            name: user.name,
            is_admin: user.is_admin,
            token: user.token,
        }
    }
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.account_service.register(req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Log in with username and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state
        .account_service
        .login(&req.username, &req.password)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
