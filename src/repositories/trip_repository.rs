//! Repositorio de viajes
//!
//! El alta de un viaje resuelve el odómetro inicial por defecto y
//! persiste dentro de una única transacción, de forma que dos altas
//! concurrentes para el mismo camión no lean el mismo odómetro viejo.

use sqlx::SqlitePool;

use crate::models::trip::{LegType, Trip, TripExportRow, TripWithLabels};
use crate::services::access_policy::Scope;
use crate::utils::errors::{AppError, AppResult};

/// Borrador ya filtrado por la política de acceso, listo para persistir
#[derive(Debug)]
pub struct TripDraft {
    pub leg_type: LegType,
    pub departure_date: String,
    pub arrival_date: String,
    pub origin: String,
    pub destination: String,
    pub weight_kg: f64,
    /// `Some` solo cuando el manager fuerza el ingreso
    pub explicit_revenue: Option<f64>,
    /// `None` cuando un driver lo deja en blanco: se resuelve en la
    /// transacción con el último odómetro del camión
    pub odometer_start: Option<f64>,
    pub odometer_end: f64,
    pub toll_cost: f64,
    pub parking_cost: f64,
    pub truck_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub document_ref: Option<String>,
    pub created_by: i64,
}

pub struct TripRepository {
    pool: SqlitePool,
}

impl TripRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserta un viaje. El fallback del odómetro, la validación
    /// `end >= start` y el cálculo del ingreso ocurren dentro de la
    /// misma transacción; si la validación falla no se persiste nada.
    pub async fn insert(&self, draft: TripDraft, tariff_per_km: f64) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let odometer_start = match draft.odometer_start {
            Some(value) => value,
            None => match draft.truck_id {
                Some(truck_id) => {
                    let last: Option<(f64,)> = sqlx::query_as(
                        "SELECT odometer_end FROM trips WHERE truck_id = ? ORDER BY id DESC LIMIT 1",
                    )
                    .bind(truck_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                    last.map(|(km,)| km).unwrap_or(0.0)
                }
                None => 0.0,
            },
        };

        if draft.odometer_end < odometer_start {
            return Err(AppError::Validation(
                "odometer_end cannot be less than odometer_start".to_string(),
            ));
        }

        let distance = (draft.odometer_end - odometer_start).max(0.0);

        let revenue = match draft.explicit_revenue {
            Some(value) => value,
            None => match draft.leg_type {
                LegType::Loaded => distance * tariff_per_km,
                LegType::Empty => 0.0,
            },
        };

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (
                leg_type, departure_date, arrival_date, origin, destination,
                weight_kg, revenue, odometer_start, odometer_end,
                toll_cost, parking_cost, truck_id, driver_id, document_ref, created_by
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(draft.leg_type)
        .bind(&draft.departure_date)
        .bind(&draft.arrival_date)
        .bind(&draft.origin)
        .bind(&draft.destination)
        .bind(draft.weight_kg)
        .bind(revenue)
        .bind(odometer_start)
        .bind(draft.odometer_end)
        .bind(draft.toll_cost)
        .bind(draft.parking_cost)
        .bind(draft.truck_id)
        .bind(draft.driver_id)
        .bind(&draft.document_ref)
        .bind(draft.created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(trip)
    }

    /// Listado con etiquetas, pre-filtrado por el scope de la política
    pub async fn list(&self, scope: &Scope, limit: i64) -> AppResult<Vec<TripWithLabels>> {
        let trips = match scope {
            Scope::All => {
                sqlx::query_as::<_, TripWithLabels>(
                    r#"
                    SELECT t.*, c.plate AS truck_plate, d.name AS driver_name
                    FROM trips t
                    LEFT JOIN trucks c ON c.id = t.truck_id
                    LEFT JOIN drivers d ON d.id = t.driver_id
                    ORDER BY t.id DESC
                    LIMIT ?
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            Scope::Driver(driver_id) => {
                sqlx::query_as::<_, TripWithLabels>(
                    r#"
                    SELECT t.*, c.plate AS truck_plate, d.name AS driver_name
                    FROM trips t
                    LEFT JOIN trucks c ON c.id = t.truck_id
                    LEFT JOIN drivers d ON d.id = t.driver_id
                    WHERE t.driver_id = ?
                    ORDER BY t.id DESC
                    LIMIT ?
                    "#,
                )
                .bind(driver_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(trips)
    }

    /// Viajes de un mes `YYYY-MM` dentro del scope, para los KPIs
    pub async fn month_trips(&self, month: &str, scope: &Scope) -> AppResult<Vec<Trip>> {
        let trips = match scope {
            Scope::All => {
                sqlx::query_as::<_, Trip>(
                    "SELECT * FROM trips WHERE substr(departure_date, 1, 7) = ?",
                )
                .bind(month)
                .fetch_all(&self.pool)
                .await?
            }
            Scope::Driver(driver_id) => {
                sqlx::query_as::<_, Trip>(
                    "SELECT * FROM trips WHERE substr(departure_date, 1, 7) = ? AND driver_id = ?",
                )
                .bind(month)
                .bind(driver_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(trips)
    }

    /// Registros planos para el export CSV del manager
    pub async fn export_rows(&self) -> AppResult<Vec<TripExportRow>> {
        let rows = sqlx::query_as::<_, TripExportRow>(
            r#"
            SELECT t.leg_type, t.departure_date, t.arrival_date, t.origin, t.destination,
                   t.weight_kg, t.revenue, t.odometer_start, t.odometer_end,
                   t.toll_cost, t.parking_cost,
                   c.plate AS truck_plate, d.name AS driver_name, t.document_ref
            FROM trips t
            LEFT JOIN trucks c ON c.id = t.truck_id
            LEFT JOIN drivers d ON d.id = t.driver_id
            ORDER BY t.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
