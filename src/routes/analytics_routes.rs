//! Rutas de métricas: KPIs mensuales y dashboard

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::analytics::{DashboardView, MonthlyKpis};
use crate::services::{CostService, LedgerService};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_month;

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/kpis/monthly", get(monthly_kpis))
        .route("/dashboard", get(dashboard))
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    /// Mes `YYYY-MM`; por defecto el actual
    month: Option<String>,
}

fn resolve_month(query: MonthQuery) -> Result<String, AppError> {
    match query.month {
        Some(month) => parse_month(&month),
        None => Ok(chrono::Utc::now().format("%Y-%m").to_string()),
    }
}

async fn monthly_kpis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyKpis>, AppError> {
    let month = resolve_month(query)?;
    let policy = LedgerService::new(state.pool.clone()).policy_for(&user).await?;

    let kpis = CostService::new(state.pool.clone())
        .monthly_kpis(&month, &policy.scope)
        .await?;

    Ok(Json(kpis))
}

async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let month = resolve_month(query)?;
    let policy = LedgerService::new(state.pool.clone()).policy_for(&user).await?;

    let view = CostService::new(state.pool.clone())
        .dashboard(&month, &policy.scope)
        .await?;

    Ok(Json(view))
}
