//! Servicio del ledger
//!
//! Valida y persiste los tres flujos de eventos (viajes, repostajes,
//! partes de horas) aplicando la política de acceso antes de tocar la
//! base de datos. Los errores de validación nunca persisten nada.

use sqlx::SqlitePool;
use validator::Validate;

use crate::models::duty_hours::{DutyHoursRecord, NewDutyHoursRequest, DEFAULT_REST_HOURS};
use crate::models::fuel::{FuelPurchase, FuelPurchaseWithLabels, NewFuelPurchaseRequest};
use crate::models::settings::{keys, CostParameters};
use crate::models::trip::{LegType, NewTripRequest, Trip, TripView};
use crate::models::user::User;
use crate::repositories::{
    DriverRepository, DutyHoursRepository, FuelDraft, FuelRepository, SettingsRepository,
    TripDraft, TripRepository,
};
use crate::services::access_policy::AccessPolicy;
use crate::services::cost_service;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{optional_text, parse_date, require_text};

/// Límites de los listados, heredados de la aplicación original
const TRIP_LIST_LIMIT: i64 = 200;
const FUEL_LIST_LIMIT: i64 = 300;

pub struct LedgerService {
    trips: TripRepository,
    fuel: FuelRepository,
    duty_hours: DutyHoursRepository,
    settings: SettingsRepository,
    drivers: DriverRepository,
}

impl LedgerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            trips: TripRepository::new(pool.clone()),
            fuel: FuelRepository::new(pool.clone()),
            duty_hours: DutyHoursRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
        }
    }

    /// Política de acceso del usuario, resuelta una vez por request
    pub async fn policy_for(&self, user: &User) -> AppResult<AccessPolicy> {
        AccessPolicy::resolve(user, &self.drivers).await
    }

    /// Registra un viaje aplicando el algoritmo de alta completo:
    /// normaliza el tipo de tramo, fuerza a cero los campos de un tramo
    /// vacío, resuelve el odómetro inicial y calcula el ingreso salvo
    /// override explícito del manager.
    pub async fn submit_trip(&self, user: &User, request: NewTripRequest) -> AppResult<Trip> {
        request.validate()?;
        let policy = self.policy_for(user).await?;

        let leg_type = LegType::normalize(request.leg_type.as_deref());

        let departure_date = require_text("departure_date", &request.departure_date)?;
        parse_date("departure_date", &departure_date)?;
        let arrival_date = require_text("arrival_date", &request.arrival_date)?;
        parse_date("arrival_date", &arrival_date)?;
        let origin = require_text("origin", &request.origin)?;
        let destination = require_text("destination", &request.destination)?;

        let odometer_end = request
            .odometer_end
            .ok_or_else(|| AppError::Validation("odometer_end is required".to_string()))?;

        // Un tramo vacío no lleva peso, peajes, parking ni CMR
        let (weight_kg, toll_cost, parking_cost, document_ref) = if leg_type.is_empty_leg() {
            (0.0, 0.0, 0.0, None)
        } else {
            (
                request.weight_kg.unwrap_or(0.0),
                request.toll_cost.unwrap_or(0.0),
                request.parking_cost.unwrap_or(0.0),
                optional_text(request.document_ref),
            )
        };

        let driver_id = policy.assigned_driver(request.driver_id);

        let explicit_revenue = if policy.can_override_revenue {
            request.revenue
        } else {
            None
        };

        // Manager: un odómetro en blanco es 0. Driver: en blanco delega
        // en el fallback al último odómetro del camión, dentro de la
        // transacción de inserción.
        let odometer_start = if policy.can_assign_driver {
            Some(request.odometer_start.unwrap_or(0.0))
        } else {
            request.odometer_start
        };

        let tariff = self
            .settings
            .get_f64(keys::TARIFF_PER_KM, CostParameters::default().tariff_per_km)
            .await?;

        let draft = TripDraft {
            leg_type,
            departure_date,
            arrival_date,
            origin,
            destination,
            weight_kg,
            explicit_revenue,
            odometer_start,
            odometer_end,
            toll_cost,
            parking_cost,
            truck_id: request.truck_id,
            driver_id,
            document_ref,
            created_by: user.id,
        };

        self.trips.insert(draft, tariff).await
    }

    /// Registra un repostaje. Sin ticket no hay repostaje.
    pub async fn submit_fuel_purchase(
        &self,
        user: &User,
        request: NewFuelPurchaseRequest,
    ) -> AppResult<FuelPurchase> {
        request.validate()?;
        let policy = self.policy_for(user).await?;

        let date = require_text("date", &request.date)?;
        parse_date("date", &date)?;

        if request.liters <= 0.0 {
            return Err(AppError::Validation(
                "liters must be greater than 0".to_string(),
            ));
        }
        if request.price_per_liter <= 0.0 {
            return Err(AppError::Validation(
                "price_per_liter must be greater than 0".to_string(),
            ));
        }

        let document_ref = optional_text(request.document_ref).ok_or_else(|| {
            AppError::Validation(
                "document_ref is required: a fuel purchase needs its ticket".to_string(),
            )
        })?;

        let draft = FuelDraft {
            date,
            truck_id: request.truck_id,
            driver_id: policy.assigned_driver(request.driver_id),
            liters: request.liters,
            price_per_liter: request.price_per_liter,
            amount: request.liters * request.price_per_liter,
            odometer: request.odometer,
            station: optional_text(request.station),
            document_ref,
            created_by: user.id,
        };

        self.fuel.insert(draft).await
    }

    /// Registra (o sobrescribe) el parte de horas de un día
    pub async fn submit_duty_hours(
        &self,
        user: &User,
        request: NewDutyHoursRequest,
    ) -> AppResult<DutyHoursRecord> {
        request.validate()?;
        let policy = self.policy_for(user).await?;

        let date = require_text("date", &request.date)?;
        parse_date("date", &date)?;

        let driver_id = policy
            .assigned_driver(request.driver_id)
            .ok_or_else(|| AppError::Validation("driver_id is required".to_string()))?;

        let rest_hours = request.rest_hours.unwrap_or(DEFAULT_REST_HOURS);

        self.duty_hours
            .upsert(
                driver_id,
                &date,
                request.driving_hours,
                request.availability_hours,
                rest_hours,
                optional_text(request.comment).as_deref(),
                user.id,
            )
            .await
    }

    /// Listado de viajes del scope del usuario, enriquecido con las
    /// cifras derivadas del motor de costes
    pub async fn list_trips(&self, user: &User, limit: Option<i64>) -> AppResult<Vec<TripView>> {
        let policy = self.policy_for(user).await?;
        let params = self.settings.load_parameters().await?;

        let rows = self
            .trips
            .list(&policy.scope, limit.unwrap_or(TRIP_LIST_LIMIT))
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let distance_km = row.trip.distance();
                let variable_cost = cost_service::trip_variable_cost(&row.trip);
                let allocated_fixed_cost =
                    cost_service::trip_allocated_fixed_cost(&row.trip, &params);
                let profit = cost_service::trip_profit(&row.trip, &params);
                TripView {
                    trip: row.trip,
                    truck_plate: row.truck_plate,
                    driver_name: row.driver_name,
                    distance_km,
                    variable_cost,
                    allocated_fixed_cost,
                    profit,
                }
            })
            .collect())
    }

    pub async fn list_fuel_purchases(
        &self,
        user: &User,
        limit: Option<i64>,
    ) -> AppResult<Vec<FuelPurchaseWithLabels>> {
        let policy = self.policy_for(user).await?;
        self.fuel
            .list(&policy.scope, limit.unwrap_or(FUEL_LIST_LIMIT))
            .await
    }

    /// Conductor efectivo para consultas de horas: el pedido si es
    /// manager, el propio si es driver
    pub async fn duty_driver_for(&self, user: &User, requested: Option<i64>) -> AppResult<i64> {
        let policy = self.policy_for(user).await?;
        policy
            .assigned_driver(requested)
            .ok_or_else(|| AppError::Validation("driver_id is required".to_string()))
    }
}
