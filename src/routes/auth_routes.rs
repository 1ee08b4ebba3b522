//! Rutas de autenticación: login con usuario + PIN, logout

use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use validator::Validate;

use crate::models::user::{LoginRequest, LoginResponse};
use crate::models::ApiResponse;
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    request.validate()?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_credentials(request.username.trim(), request.pin.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid username or PIN".to_string()))?;

    let token = state.create_session(user.id).await;
    tracing::info!("🔑 Sesión iniciada para '{}'", user.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        username: user.username,
        role: user.role,
        driver_id: user.driver_id,
    })))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        state.remove_session(token).await;
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
