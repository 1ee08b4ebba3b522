//! Repositorio de settings
//!
//! Clave/valor TEXT con semántica de default: una clave ausente o con
//! valor no numérico devuelve el default del llamador, nunca un error
//! de configuración.

use sqlx::SqlitePool;

use crate::models::settings::{keys, CostParameters, UpdateSettingsRequest};
use crate::utils::errors::AppResult;

pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Valor numérico de una clave, o `default` si falta o no parsea
    pub async fn get_f64(&self, key: &str, default: f64) -> AppResult<f64> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .and_then(|(value,)| value.trim().parse::<f64>().ok())
            .unwrap_or(default))
    }

    /// Upsert de una clave; el valor se guarda como texto
    pub async fn set(&self, key: &str, value: f64) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings(key, value) VALUES(?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Escribe la clave solo si todavía no existe (siembra de arranque)
    pub async fn ensure_default(&self, key: &str, value: f64) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO settings(key, value) VALUES(?, ?)")
            .bind(key)
            .bind(value.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Carga el snapshot tipado completo de parámetros de coste
    pub async fn load_parameters(&self) -> AppResult<CostParameters> {
        let d = CostParameters::default();
        Ok(CostParameters {
            driver_salary_month: self
                .get_f64(keys::DRIVER_SALARY_MONTH, d.driver_salary_month)
                .await?,
            target_km_month: self.get_f64(keys::TARGET_KM_MONTH, d.target_km_month).await?,
            truck_lease_month: self
                .get_f64(keys::TRUCK_LEASE_MONTH, d.truck_lease_month)
                .await?,
            accounting_fee_month: self
                .get_f64(keys::ACCOUNTING_FEE_MONTH, d.accounting_fee_month)
                .await?,
            self_employed_fee_month: self
                .get_f64(keys::SELF_EMPLOYED_FEE_MONTH, d.self_employed_fee_month)
                .await?,
            standing_order_fee_month: self
                .get_f64(keys::STANDING_ORDER_FEE_MONTH, d.standing_order_fee_month)
                .await?,
            cargo_insurance_year: self
                .get_f64(keys::CARGO_INSURANCE_YEAR, d.cargo_insurance_year)
                .await?,
            tariff_per_km: self.get_f64(keys::TARIFF_PER_KM, d.tariff_per_km).await?,
            consumption_l_100km: self
                .get_f64(keys::CONSUMPTION_L_100KM, d.consumption_l_100km)
                .await?,
            fuel_price_estimate: self
                .get_f64(keys::FUEL_PRICE_ESTIMATE, d.fuel_price_estimate)
                .await?,
        })
    }

    /// Siembra todos los parámetros reconocidos en el primer arranque
    pub async fn seed_defaults(&self) -> AppResult<()> {
        let d = CostParameters::default();
        self.ensure_default(keys::DRIVER_SALARY_MONTH, d.driver_salary_month).await?;
        self.ensure_default(keys::TARGET_KM_MONTH, d.target_km_month).await?;
        self.ensure_default(keys::TRUCK_LEASE_MONTH, d.truck_lease_month).await?;
        self.ensure_default(keys::ACCOUNTING_FEE_MONTH, d.accounting_fee_month).await?;
        self.ensure_default(keys::SELF_EMPLOYED_FEE_MONTH, d.self_employed_fee_month).await?;
        self.ensure_default(keys::STANDING_ORDER_FEE_MONTH, d.standing_order_fee_month).await?;
        self.ensure_default(keys::CARGO_INSURANCE_YEAR, d.cargo_insurance_year).await?;
        self.ensure_default(keys::TARIFF_PER_KM, d.tariff_per_km).await?;
        self.ensure_default(keys::CONSUMPTION_L_100KM, d.consumption_l_100km).await?;
        self.ensure_default(keys::FUEL_PRICE_ESTIMATE, d.fuel_price_estimate).await?;
        Ok(())
    }

    /// Aplica las actualizaciones del manager; los campos ausentes no se tocan
    pub async fn apply_update(&self, update: &UpdateSettingsRequest) -> AppResult<()> {
        if let Some(v) = update.driver_salary_month {
            self.set(keys::DRIVER_SALARY_MONTH, v).await?;
        }
        if let Some(v) = update.target_km_month {
            self.set(keys::TARGET_KM_MONTH, v).await?;
        }
        if let Some(v) = update.truck_lease_month {
            self.set(keys::TRUCK_LEASE_MONTH, v).await?;
        }
        if let Some(v) = update.accounting_fee_month {
            self.set(keys::ACCOUNTING_FEE_MONTH, v).await?;
        }
        if let Some(v) = update.self_employed_fee_month {
            self.set(keys::SELF_EMPLOYED_FEE_MONTH, v).await?;
        }
        if let Some(v) = update.standing_order_fee_month {
            self.set(keys::STANDING_ORDER_FEE_MONTH, v).await?;
        }
        if let Some(v) = update.cargo_insurance_year {
            self.set(keys::CARGO_INSURANCE_YEAR, v).await?;
        }
        if let Some(v) = update.tariff_per_km {
            self.set(keys::TARIFF_PER_KM, v).await?;
        }
        if let Some(v) = update.consumption_l_100km {
            self.set(keys::CONSUMPTION_L_100KM, v).await?;
        }
        if let Some(v) = update.fuel_price_estimate {
            self.set(keys::FUEL_PRICE_ESTIMATE, v).await?;
        }
        Ok(())
    }
}
