use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::api::dtos::responses::UserResponse;
use std::sync::Arc;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("Username and password must not be empty".to_string()));
    }

    let user = state.auth_service
        .register(payload.username, payload.email, payload.password)
        .await?;

    info!("User registered: {}", user.id);

    Ok(Json(UserResponse::from(user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth_service.login(&payload.username, &payload.password).await?;

    info!("User logged in: {}", payload.username);

    Ok(Json(tokens))
}

pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth_service.refresh(&payload.refresh_token).await?;

    info!("Token refreshed for user: {}", payload.user_id);

    Ok(Json(tokens))
}
