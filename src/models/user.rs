//! Modelo de User
//!
//! Usuarios de la aplicación: manager (visibilidad total) o driver
//! (restringido a sus propios registros, sin cifras financieras).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Rol del usuario - mapea a la columna TEXT `role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Driver,
}

impl Role {
    pub fn is_manager(self) -> bool {
        matches!(self, Role::Manager)
    }
}

/// User - mapea exactamente a la tabla `users`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// PIN compartido, opaco para el core (el original lo guarda en claro)
    #[serde(skip_serializing)]
    pub pin: String,
    pub role: Role,
    pub active: bool,
    /// Conductor emparejado 1:1, si existe
    pub driver_id: Option<i64>,
}

/// Request de login con usuario + PIN
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,

    #[validate(length(min = 1, max = 20))]
    pub pin: String,
}

/// Response de login: token de sesión opaco
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub driver_id: Option<i64>,
}
