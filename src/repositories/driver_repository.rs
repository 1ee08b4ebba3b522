//! Repositorio de conductores

use sqlx::SqlitePool;

use crate::models::driver::Driver;
use crate::utils::errors::AppResult;

pub struct DriverRepository {
    pool: SqlitePool,
}

impl DriverRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        national_id: Option<&str>,
        phone: Option<&str>,
    ) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (name, national_id, phone)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(national_id)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    /// Conductor de id más bajo; regla de compatibilidad para usuarios
    /// driver sin conductor enlazado
    pub async fn lowest_id(&self) -> AppResult<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM drivers ORDER BY id ASC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id,)| id))
    }

    pub async fn list(&self) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(drivers)
    }
}
