//! Modelo de Trip
//!
//! Un viaje es un tramo de un camión entre dos puntos en fechas dadas.
//! Los tramos EMPTY (reposicionamiento en vacío) no llevan peso, peajes,
//! parking ni documento CMR, y su ingreso por defecto es 0.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Tipo de tramo - mapea a la columna TEXT `leg_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum LegType {
    Loaded,
    Empty,
}

impl LegType {
    /// Normaliza la entrada del formulario: cualquier cosa que no sea
    /// exactamente EMPTY se trata como LOADED.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_uppercase()) {
            Some(v) if v == "EMPTY" => LegType::Empty,
            _ => LegType::Loaded,
        }
    }

    pub fn is_empty_leg(self) -> bool {
        matches!(self, LegType::Empty)
    }
}

/// Trip - mapea exactamente a la tabla `trips`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub leg_type: LegType,
    pub departure_date: String,
    pub arrival_date: String,
    pub origin: String,
    pub destination: String,
    pub weight_kg: f64,
    pub revenue: f64,
    pub odometer_start: f64,
    pub odometer_end: f64,
    pub toll_cost: f64,
    pub parking_cost: f64,
    pub truck_id: Option<i64>,
    pub driver_id: Option<i64>,
    /// Referencia opaca al CMR subido; el core nunca toca bytes
    pub document_ref: Option<String>,
    pub created_by: Option<i64>,
}

impl Trip {
    /// Distancia recorrida, nunca negativa
    pub fn distance(&self) -> f64 {
        (self.odometer_end - self.odometer_start).max(0.0)
    }
}

/// Request para registrar un viaje
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewTripRequest {
    /// LOADED | EMPTY; cualquier otro valor se normaliza a LOADED
    pub leg_type: Option<String>,

    #[validate(length(min = 1))]
    pub departure_date: String,

    #[validate(length(min = 1))]
    pub arrival_date: String,

    #[validate(length(min = 1, max = 200))]
    pub origin: String,

    #[validate(length(min = 1, max = 200))]
    pub destination: String,

    #[validate(range(min = 0.0))]
    pub weight_kg: Option<f64>,

    /// Solo manager; para el resto siempre se calcula
    pub revenue: Option<f64>,

    /// En blanco para drivers: se rellena con el último odómetro del camión
    pub odometer_start: Option<f64>,

    pub odometer_end: Option<f64>,

    #[validate(range(min = 0.0))]
    pub toll_cost: Option<f64>,

    #[validate(range(min = 0.0))]
    pub parking_cost: Option<f64>,

    pub truck_id: Option<i64>,

    /// Ignorado para drivers: se fuerza a su propio conductor
    pub driver_id: Option<i64>,

    pub document_ref: Option<String>,
}

/// Viaje enriquecido para listados: etiquetas de camión/conductor
/// y cifras derivadas del motor de costes
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TripWithLabels {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub trip: Trip,
    pub truck_plate: Option<String>,
    pub driver_name: Option<String>,
}

/// Viaje enriquecido con las cifras derivadas para display
#[derive(Debug, Serialize)]
pub struct TripView {
    #[serde(flatten)]
    pub trip: Trip,
    pub truck_plate: Option<String>,
    pub driver_name: Option<String>,
    pub distance_km: f64,
    pub variable_cost: f64,
    pub allocated_fixed_cost: f64,
    pub profit: f64,
}

/// Registro plano para el export CSV (manager)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TripExportRow {
    pub leg_type: LegType,
    pub departure_date: String,
    pub arrival_date: String,
    pub origin: String,
    pub destination: String,
    pub weight_kg: f64,
    pub revenue: f64,
    pub odometer_start: f64,
    pub odometer_end: f64,
    pub toll_cost: f64,
    pub parking_cost: f64,
    pub truck_plate: Option<String>,
    pub driver_name: Option<String>,
    pub document_ref: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_to_loaded() {
        assert_eq!(LegType::normalize(None), LegType::Loaded);
        assert_eq!(LegType::normalize(Some("LOADED")), LegType::Loaded);
        assert_eq!(LegType::normalize(Some("empty ")), LegType::Empty);
        assert_eq!(LegType::normalize(Some("whatever")), LegType::Loaded);
    }
}
