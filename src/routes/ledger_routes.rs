//! Rutas del ledger: viajes, repostajes y partes de horas
//!
//! Handlers finos: parsean el request, delegan en `LedgerService` y
//! devuelven la entidad persistida. El export CSV es solo manager.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::middleware::{AuthUser, ManagerUser};
use crate::models::duty_hours::{DutyHoursRecord, NewDutyHoursRequest};
use crate::models::fuel::{FuelPurchaseWithLabels, NewFuelPurchaseRequest};
use crate::models::trip::{NewTripRequest, Trip, TripView};
use crate::models::ApiResponse;
use crate::services::{CostService, ExportService, LedgerService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_trip))
        .route("/", get(list_trips))
        .route("/export.csv", get(export_trips_csv))
}

pub fn create_fuel_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_fuel_purchase))
        .route("/", get(list_fuel_purchases))
}

pub fn create_duty_hours_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_duty_hours))
        .route("/weekly", get(weekly_duty_hours))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WeeklyQuery {
    driver_id: Option<i64>,
    /// Fin de la ventana de 7 días; por defecto hoy
    end_date: Option<String>,
}

async fn submit_trip(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewTripRequest>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let service = LedgerService::new(state.pool.clone());
    let trip = service.submit_trip(&user, request).await?;
    Ok(Json(ApiResponse::success(trip)))
}

async fn list_trips(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TripView>>, AppError> {
    let service = LedgerService::new(state.pool.clone());
    let trips = service.list_trips(&user, query.limit).await?;
    Ok(Json(trips))
}

async fn export_trips_csv(
    State(state): State<AppState>,
    ManagerUser(_user): ManagerUser,
) -> Result<impl IntoResponse, AppError> {
    let csv = ExportService::new(state.pool.clone()).trips_csv().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=trips.csv",
            ),
        ],
        csv,
    ))
}

async fn submit_fuel_purchase(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewFuelPurchaseRequest>,
) -> Result<Json<ApiResponse<crate::models::fuel::FuelPurchase>>, AppError> {
    let service = LedgerService::new(state.pool.clone());
    let purchase = service.submit_fuel_purchase(&user, request).await?;
    Ok(Json(ApiResponse::success(purchase)))
}

async fn list_fuel_purchases(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FuelPurchaseWithLabels>>, AppError> {
    let service = LedgerService::new(state.pool.clone());
    let purchases = service.list_fuel_purchases(&user, query.limit).await?;
    Ok(Json(purchases))
}

async fn submit_duty_hours(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewDutyHoursRequest>,
) -> Result<Json<ApiResponse<DutyHoursRecord>>, AppError> {
    let service = LedgerService::new(state.pool.clone());
    let record = service.submit_duty_hours(&user, request).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn weekly_duty_hours(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<crate::models::analytics::WeeklyDutyHours>, AppError> {
    let ledger = LedgerService::new(state.pool.clone());
    let driver_id = ledger.duty_driver_for(&user, query.driver_id).await?;

    let end_date = query
        .end_date
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let summary = CostService::new(state.pool.clone())
        .weekly_duty_hours(driver_id, &end_date)
        .await?;

    Ok(Json(summary))
}
