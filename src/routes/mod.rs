//! Rutas de la API
//!
//! Este módulo monta los routers por recurso bajo `/api`.

pub mod analytics_routes;
pub mod auth_routes;
pub mod fleet_routes;
pub mod ledger_routes;
pub mod settings_routes;

use axum::Router;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes::create_auth_router())
        .nest("/trucks", fleet_routes::create_truck_router())
        .nest("/drivers", fleet_routes::create_driver_router())
        .nest("/trips", ledger_routes::create_trip_router())
        .nest("/fuel", ledger_routes::create_fuel_router())
        .nest("/duty-hours", ledger_routes::create_duty_hours_router())
        .nest("/settings", settings_routes::create_settings_router())
        .merge(analytics_routes::create_analytics_router())
}
