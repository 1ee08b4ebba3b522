//! Middleware de autenticación
//!
//! Extractores de Axum que resuelven el token Bearer contra el mapa de
//! sesiones y cargan el usuario activo. `ManagerUser` añade el guard
//! de rol para las rutas solo-manager.

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};

use crate::models::user::User;
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Usuario autenticado de la sesión
pub struct AuthUser(pub User);

/// Usuario autenticado con rol manager
pub struct ManagerUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("invalid Authorization header".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let user_id = state
            .session_user_id(token)
            .await
            .ok_or_else(|| AppError::Unauthorized("invalid or expired session".to_string()))?;

        let user = UserRepository::new(state.pool.clone())
            .find_active_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("user is no longer active".to_string()))?;

        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ManagerUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.role.is_manager() {
            return Err(AppError::Forbidden(
                "manager role required".to_string(),
            ));
        }

        Ok(ManagerUser(user))
    }
}
