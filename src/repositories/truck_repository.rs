//! Repositorio de camiones

use sqlx::SqlitePool;

use crate::models::truck::Truck;
use crate::utils::errors::{conflict_error, AppError, AppResult};

pub struct TruckRepository {
    pool: SqlitePool,
}

impl TruckRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Alta de camión; matrícula duplicada se devuelve como `Conflict`
    pub async fn create(&self, plate: &str, description: Option<&str>) -> AppResult<Truck> {
        let result = sqlx::query_as::<_, Truck>(
            r#"
            INSERT INTO trucks (plate, description)
            VALUES (?, ?)
            RETURNING *
            "#,
        )
        .bind(plate)
        .bind(description)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(truck) => Ok(truck),
            Err(e) if AppError::is_unique_violation(&e) => {
                Err(conflict_error("Truck", "plate", plate))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Truck>> {
        let trucks = sqlx::query_as::<_, Truck>("SELECT * FROM trucks ORDER BY plate ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(trucks)
    }
}
