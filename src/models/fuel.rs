//! Modelo de FuelPurchase
//!
//! Repostajes: append-only, siempre con ticket. Un repostaje sin
//! justificante se rechaza en validación.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// FuelPurchase - mapea exactamente a la tabla `fuel_purchases`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelPurchase {
    pub id: i64,
    pub date: String,
    pub truck_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub liters: f64,
    pub price_per_liter: f64,
    /// Siempre liters × price_per_liter (comportamiento canónico)
    pub amount: f64,
    pub odometer: Option<f64>,
    pub station: Option<String>,
    /// Referencia al ticket subido; obligatoria
    pub document_ref: String,
    pub created_by: Option<i64>,
}

/// Request para registrar un repostaje
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewFuelPurchaseRequest {
    #[validate(length(min = 1))]
    pub date: String,

    pub truck_id: Option<i64>,

    /// Ignorado para drivers: se fuerza a su propio conductor
    pub driver_id: Option<i64>,

    pub liters: f64,

    pub price_per_liter: f64,

    pub odometer: Option<f64>,

    #[validate(length(max = 100))]
    pub station: Option<String>,

    pub document_ref: Option<String>,
}

/// Repostaje con etiquetas para listados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FuelPurchaseWithLabels {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub purchase: FuelPurchase,
    pub truck_plate: Option<String>,
    pub driver_name: Option<String>,
}
