//! Repositorio de repostajes

use sqlx::SqlitePool;

use crate::models::fuel::{FuelPurchase, FuelPurchaseWithLabels};
use crate::services::access_policy::Scope;
use crate::utils::errors::AppResult;

/// Borrador validado de repostaje
#[derive(Debug)]
pub struct FuelDraft {
    pub date: String,
    pub truck_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub liters: f64,
    pub price_per_liter: f64,
    pub amount: f64,
    pub odometer: Option<f64>,
    pub station: Option<String>,
    pub document_ref: String,
    pub created_by: i64,
}

pub struct FuelRepository {
    pool: SqlitePool,
}

impl FuelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, draft: FuelDraft) -> AppResult<FuelPurchase> {
        let purchase = sqlx::query_as::<_, FuelPurchase>(
            r#"
            INSERT INTO fuel_purchases (
                date, truck_id, driver_id, liters, price_per_liter, amount,
                odometer, station, document_ref, created_by
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&draft.date)
        .bind(draft.truck_id)
        .bind(draft.driver_id)
        .bind(draft.liters)
        .bind(draft.price_per_liter)
        .bind(draft.amount)
        .bind(draft.odometer)
        .bind(&draft.station)
        .bind(&draft.document_ref)
        .bind(draft.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(purchase)
    }

    pub async fn list(&self, scope: &Scope, limit: i64) -> AppResult<Vec<FuelPurchaseWithLabels>> {
        let purchases = match scope {
            Scope::All => {
                sqlx::query_as::<_, FuelPurchaseWithLabels>(
                    r#"
                    SELECT r.*, c.plate AS truck_plate, d.name AS driver_name
                    FROM fuel_purchases r
                    LEFT JOIN trucks c ON c.id = r.truck_id
                    LEFT JOIN drivers d ON d.id = r.driver_id
                    ORDER BY r.id DESC
                    LIMIT ?
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            Scope::Driver(driver_id) => {
                sqlx::query_as::<_, FuelPurchaseWithLabels>(
                    r#"
                    SELECT r.*, c.plate AS truck_plate, d.name AS driver_name
                    FROM fuel_purchases r
                    LEFT JOIN trucks c ON c.id = r.truck_id
                    LEFT JOIN drivers d ON d.id = r.driver_id
                    WHERE r.driver_id = ?
                    ORDER BY r.id DESC
                    LIMIT ?
                    "#,
                )
                .bind(driver_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(purchases)
    }

    /// Importe total repostado en un mes `YYYY-MM` dentro del scope
    pub async fn month_amount(&self, month: &str, scope: &Scope) -> AppResult<f64> {
        let row: (Option<f64>,) = match scope {
            Scope::All => {
                sqlx::query_as(
                    "SELECT SUM(amount) FROM fuel_purchases WHERE substr(date, 1, 7) = ?",
                )
                .bind(month)
                .fetch_one(&self.pool)
                .await?
            }
            Scope::Driver(driver_id) => {
                sqlx::query_as(
                    "SELECT SUM(amount) FROM fuel_purchases WHERE substr(date, 1, 7) = ? AND driver_id = ?",
                )
                .bind(month)
                .bind(driver_id)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(row.0.unwrap_or(0.0))
    }
}
