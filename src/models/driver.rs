//! Modelo de Driver
//!
//! Catálogo de conductores; opcionalmente emparejados 1:1 con un
//! usuario de rol driver creado en el mismo alta.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Driver - mapea exactamente a la tabla `drivers`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
}

/// Request para dar de alta un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 20))]
    pub national_id: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    /// Si es true se crea también un usuario driver con username = name
    #[serde(default)]
    pub create_user: bool,

    #[validate(length(min = 1, max = 20))]
    pub pin: Option<String>,
}
