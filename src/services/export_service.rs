//! Export de viajes a CSV (solo manager)

use sqlx::SqlitePool;

use crate::repositories::TripRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct ExportService {
    trips: TripRepository,
}

impl ExportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            trips: TripRepository::new(pool),
        }
    }

    /// Todos los viajes como CSV plano, con matrícula y conductor resueltos
    pub async fn trips_csv(&self) -> AppResult<Vec<u8>> {
        let rows = self.trips.export_rows().await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV buffer error: {}", e)))
    }
}
