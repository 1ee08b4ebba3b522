//! Repositorio de partes de horas (tacógrafo)
//!
//! Upsert con clave compuesta `(driver_id, date)`: la segunda entrada
//! para el mismo día sobrescribe la anterior, sin histórico.

use sqlx::SqlitePool;

use crate::models::duty_hours::DutyHoursRecord;
use crate::services::access_policy::Scope;
use crate::utils::errors::AppResult;

pub struct DutyHoursRepository {
    pool: SqlitePool,
}

impl DutyHoursRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn upsert(
        &self,
        driver_id: i64,
        date: &str,
        driving_hours: f64,
        availability_hours: f64,
        rest_hours: f64,
        comment: Option<&str>,
        created_by: i64,
    ) -> AppResult<DutyHoursRecord> {
        let record = sqlx::query_as::<_, DutyHoursRecord>(
            r#"
            INSERT INTO duty_hours (
                driver_id, date, driving_hours, availability_hours, rest_hours, comment, created_by
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(driver_id, date) DO UPDATE SET
                driving_hours = excluded.driving_hours,
                availability_hours = excluded.availability_hours,
                rest_hours = excluded.rest_hours,
                comment = excluded.comment
            RETURNING *
            "#,
        )
        .bind(driver_id)
        .bind(date)
        .bind(driving_hours)
        .bind(availability_hours)
        .bind(rest_hours)
        .bind(comment)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Partes de un conductor en `[start, end]` inclusive, en orden de fecha
    pub async fn window(
        &self,
        driver_id: i64,
        start: &str,
        end: &str,
    ) -> AppResult<Vec<DutyHoursRecord>> {
        let records = sqlx::query_as::<_, DutyHoursRecord>(
            r#"
            SELECT * FROM duty_hours
            WHERE driver_id = ? AND date BETWEEN ? AND ?
            ORDER BY date ASC
            "#,
        )
        .bind(driver_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Sumas de conducción y disponibilidad de un mes dentro del scope
    pub async fn month_sums(&self, month: &str, scope: &Scope) -> AppResult<(f64, f64)> {
        let row: (Option<f64>, Option<f64>) = match scope {
            Scope::All => {
                sqlx::query_as(
                    r#"
                    SELECT SUM(driving_hours), SUM(availability_hours)
                    FROM duty_hours
                    WHERE substr(date, 1, 7) = ?
                    "#,
                )
                .bind(month)
                .fetch_one(&self.pool)
                .await?
            }
            Scope::Driver(driver_id) => {
                sqlx::query_as(
                    r#"
                    SELECT SUM(driving_hours), SUM(availability_hours)
                    FROM duty_hours
                    WHERE substr(date, 1, 7) = ? AND driver_id = ?
                    "#,
                )
                .bind(month)
                .bind(driver_id)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok((row.0.unwrap_or(0.0), row.1.unwrap_or(0.0)))
    }
}
