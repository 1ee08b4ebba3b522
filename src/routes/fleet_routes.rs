//! Rutas de flota: camiones y conductores (altas solo manager)

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::middleware::{AuthUser, ManagerUser};
use crate::models::driver::{CreateDriverRequest, Driver};
use crate::models::truck::{CreateTruckRequest, Truck};
use crate::models::ApiResponse;
use crate::repositories::{DriverRepository, TruckRepository, UserRepository};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::optional_text;

pub fn create_truck_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_truck))
        .route("/", get(list_trucks))
}

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_driver))
        .route("/", get(list_drivers))
}

async fn create_truck(
    State(state): State<AppState>,
    ManagerUser(_user): ManagerUser,
    Json(request): Json<CreateTruckRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    request.validate()?;

    let repository = TruckRepository::new(state.pool.clone());
    let plate = request.plate.trim();

    match repository.create(plate, optional_text(request.description).as_deref()).await {
        Ok(truck) => Ok(Json(ApiResponse::success(truck))),
        // Matrícula duplicada: aviso no fatal, no se persiste nada
        Err(AppError::Conflict(msg)) => {
            tracing::warn!("Alta de camión ignorada: {}", msg);
            Ok(Json(ApiResponse::warning(msg)))
        }
        Err(e) => Err(e),
    }
}

async fn list_trucks(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<Truck>>, AppError> {
    let trucks = TruckRepository::new(state.pool.clone()).list().await?;
    Ok(Json(trucks))
}

async fn create_driver(
    State(state): State<AppState>,
    ManagerUser(_user): ManagerUser,
    Json(request): Json<CreateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    request.validate()?;

    let drivers = DriverRepository::new(state.pool.clone());
    let name = request.name.trim().to_string();

    let driver = drivers
        .create(
            &name,
            optional_text(request.national_id).as_deref(),
            optional_text(request.phone).as_deref(),
        )
        .await?;

    // Usuario driver opcional emparejado 1:1; un username duplicado no
    // deshace el alta del conductor, solo se reporta
    if request.create_user {
        let pin = request
            .pin
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("pin is required to create a user".to_string()))?;

        let users = UserRepository::new(state.pool.clone());
        match users.create_driver_user(&name, pin, driver.id).await {
            Ok(_) => {}
            Err(AppError::Conflict(msg)) => {
                tracing::warn!("Usuario driver no creado: {}", msg);
                return Ok(Json(ApiResponse::success_with_warning(driver, msg)));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Json(ApiResponse::success(driver)))
}

async fn list_drivers(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<Driver>>, AppError> {
    let drivers = DriverRepository::new(state.pool.clone()).list().await?;
    Ok(Json(drivers))
}
