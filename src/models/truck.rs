//! Modelo de Truck
//!
//! Catálogo de camiones referenciado por viajes y repostajes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Truck - mapea exactamente a la tabla `trucks`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Truck {
    pub id: i64,
    /// Matrícula, única en la flota
    pub plate: String,
    pub description: Option<String>,
}

/// Request para dar de alta un camión
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTruckRequest {
    #[validate(length(min = 1, max = 20))]
    pub plate: String,

    #[validate(length(max = 200))]
    pub description: Option<String>,
}
