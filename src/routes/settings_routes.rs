//! Rutas de ajustes (solo manager): parámetros de coste + derivados

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::middleware::ManagerUser;
use crate::models::settings::{CostParameters, UpdateSettingsRequest};
use crate::repositories::SettingsRepository;
use crate::services::cost_service;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/", put(update_settings))
}

/// Parámetros vigentes + cifras derivadas de la página de ajustes
#[derive(Debug, Serialize)]
struct SettingsView {
    #[serde(flatten)]
    parameters: CostParameters,
    monthly_fixed_cost: f64,
    fixed_cost_per_km: f64,
    estimated_monthly_fuel_cost: f64,
}

async fn load_view(pool: sqlx::SqlitePool) -> Result<SettingsView, AppError> {
    let parameters = SettingsRepository::new(pool).load_parameters().await?;
    Ok(SettingsView {
        monthly_fixed_cost: cost_service::monthly_fixed_cost(&parameters),
        fixed_cost_per_km: cost_service::fixed_cost_per_km(&parameters),
        estimated_monthly_fuel_cost: cost_service::estimated_monthly_fuel_cost(&parameters),
        parameters,
    })
}

async fn get_settings(
    State(state): State<AppState>,
    ManagerUser(_user): ManagerUser,
) -> Result<Json<SettingsView>, AppError> {
    Ok(Json(load_view(state.pool.clone()).await?))
}

async fn update_settings(
    State(state): State<AppState>,
    ManagerUser(_user): ManagerUser,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsView>, AppError> {
    SettingsRepository::new(state.pool.clone())
        .apply_update(&request)
        .await?;

    Ok(Json(load_view(state.pool.clone()).await?))
}
