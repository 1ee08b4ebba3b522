//! Modelo de DutyHoursRecord
//!
//! Parte diario de horas del conductor (tacógrafo manual): conducción,
//! disponibilidad y descanso. Clave única `(driver_id, date)`; una
//! segunda entrada para el mismo día sobrescribe la anterior.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Horas de descanso por defecto cuando el parte no las indica
pub const DEFAULT_REST_HOURS: f64 = 11.0;

/// DutyHoursRecord - mapea exactamente a la tabla `duty_hours`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DutyHoursRecord {
    pub id: i64,
    pub driver_id: i64,
    pub date: String,
    pub driving_hours: f64,
    pub availability_hours: f64,
    pub rest_hours: f64,
    pub comment: Option<String>,
    pub created_by: Option<i64>,
}

/// Request para registrar (o sobrescribir) el parte de un día
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewDutyHoursRequest {
    #[validate(length(min = 1))]
    pub date: String,

    /// Ignorado para drivers: se fuerza a su propio conductor
    pub driver_id: Option<i64>,

    #[validate(range(min = 0.0, max = 24.0))]
    pub driving_hours: f64,

    #[validate(range(min = 0.0, max = 24.0))]
    pub availability_hours: f64,

    #[validate(range(min = 0.0, max = 24.0))]
    pub rest_hours: Option<f64>,

    #[validate(length(max = 300))]
    pub comment: Option<String>,
}
