use axum::{extract::State, http::StatusCode, Json};

use crate::auth::service::{self, AuthResponse, LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = service::register(state.users.as_ref(), &state.tokens, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = service::login(state.users.as_ref(), &state.tokens, request).await?;
    Ok(Json(response))
}
