//! Motor de imputación de costes
//!
//! Funciones puras sobre el snapshot de parámetros + filas del ledger.
//! El motor nunca muta datos: deriva cifras de una lectura. El gasoil
//! no entra en el beneficio por viaje; se concilia a nivel de mes.

use chrono::Duration;
use sqlx::SqlitePool;

use crate::models::analytics::{DashboardView, MonthlyKpis, WeeklyDutyHours};
use crate::models::settings::CostParameters;
use crate::models::trip::Trip;
use crate::repositories::{
    DutyHoursRepository, FuelRepository, SettingsRepository, TripRepository,
};
use crate::services::access_policy::Scope;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_date;

/// Coste fijo total del mes: partidas mensuales + seguro anual /12
pub fn monthly_fixed_cost(p: &CostParameters) -> f64 {
    p.driver_salary_month
        + p.truck_lease_month
        + p.accounting_fee_month
        + p.self_employed_fee_month
        + p.standing_order_fee_month
        + p.cargo_insurance_year / 12.0
}

/// Coste fijo por km; 0 si no hay km objetivo (evita división por cero)
pub fn fixed_cost_per_km(p: &CostParameters) -> f64 {
    if p.target_km_month <= 0.0 {
        return 0.0;
    }
    monthly_fixed_cost(p) / p.target_km_month
}

/// Gasoil estimado del mes a km objetivo
pub fn estimated_monthly_fuel_cost(p: &CostParameters) -> f64 {
    p.target_km_month * p.consumption_l_100km / 100.0 * p.fuel_price_estimate
}

/// Peajes + parking de un viaje
pub fn trip_variable_cost(trip: &Trip) -> f64 {
    trip.toll_cost + trip.parking_cost
}

/// Coste fijo imputado a un viaje por su distancia
pub fn trip_allocated_fixed_cost(trip: &Trip, p: &CostParameters) -> f64 {
    trip.distance() * fixed_cost_per_km(p)
}

/// Beneficio del viaje, sin gasoil (se concilia mensualmente)
pub fn trip_profit(trip: &Trip, p: &CostParameters) -> f64 {
    trip.revenue - (trip_variable_cost(trip) + trip_allocated_fixed_cost(trip, p))
}

/// Agrega las filas de un mes en los KPIs del dashboard
pub fn aggregate_month(
    month: &str,
    trips: &[Trip],
    real_fuel_cost: f64,
    driving_hours: f64,
    availability_hours: f64,
    p: &CostParameters,
) -> MonthlyKpis {
    let mut total_km = 0.0;
    let mut empty_km = 0.0;
    let mut revenue = 0.0;
    let mut variable_cost = 0.0;

    for trip in trips {
        let distance = trip.distance();
        total_km += distance;
        if trip.leg_type.is_empty_leg() {
            empty_km += distance;
        }
        revenue += trip.revenue;
        variable_cost += trip_variable_cost(trip);
    }

    let fixed_per_km = fixed_cost_per_km(p);
    let allocated_fixed_cost = total_km * fixed_per_km;
    let net_profit = revenue - (variable_cost + allocated_fixed_cost + real_fuel_cost);

    let empty_ratio_pct = if total_km > 0.0 {
        empty_km / total_km * 100.0
    } else {
        0.0
    };
    let loaded_ratio_pct = if total_km > 0.0 {
        100.0 - empty_ratio_pct
    } else {
        0.0
    };

    MonthlyKpis {
        month: month.to_string(),
        total_km,
        empty_km,
        empty_ratio_pct,
        loaded_ratio_pct,
        revenue,
        variable_cost,
        allocated_fixed_cost,
        real_fuel_cost,
        estimated_fuel_cost: estimated_monthly_fuel_cost(p),
        net_profit,
        driving_hours,
        availability_hours,
        fixed_cost_per_km: fixed_per_km,
        tariff_per_km: p.tariff_per_km,
    }
}

/// Servicio de lectura: KPIs mensuales, dashboard y ventana semanal
pub struct CostService {
    settings: SettingsRepository,
    trips: TripRepository,
    fuel: FuelRepository,
    duty_hours: DutyHoursRepository,
}

impl CostService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            settings: SettingsRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            fuel: FuelRepository::new(pool.clone()),
            duty_hours: DutyHoursRepository::new(pool),
        }
    }

    /// KPIs de un mes `YYYY-MM`, pre-filtrados por el scope del usuario
    pub async fn monthly_kpis(&self, month: &str, scope: &Scope) -> AppResult<MonthlyKpis> {
        let params = self.settings.load_parameters().await?;
        let trips = self.trips.month_trips(month, scope).await?;
        let real_fuel = self.fuel.month_amount(month, scope).await?;
        let (driving, availability) = self.duty_hours.month_sums(month, scope).await?;

        Ok(aggregate_month(
            month,
            &trips,
            real_fuel,
            driving,
            availability,
            &params,
        ))
    }

    /// Dashboard del mes: KPIs + actividad reciente dentro del scope
    pub async fn dashboard(&self, month: &str, scope: &Scope) -> AppResult<DashboardView> {
        let kpis = self.monthly_kpis(month, scope).await?;
        let recent_trips = self.trips.list(scope, 6).await?;

        Ok(DashboardView { kpis, recent_trips })
    }

    /// Suma de horas en la ventana de 7 días que termina en `end_date`.
    /// Los días sin parte suman 0, no son un error.
    pub async fn weekly_duty_hours(
        &self,
        driver_id: i64,
        end_date: &str,
    ) -> AppResult<WeeklyDutyHours> {
        let end = parse_date("end_date", end_date)?;
        let start = end - Duration::days(6);
        let start_str = start.format("%Y-%m-%d").to_string();

        let days = self
            .duty_hours
            .window(driver_id, &start_str, end_date)
            .await?;

        let mut driving_hours = 0.0;
        let mut availability_hours = 0.0;
        let mut rest_hours = 0.0;
        for day in &days {
            driving_hours += day.driving_hours;
            availability_hours += day.availability_hours;
            rest_hours += day.rest_hours;
        }

        Ok(WeeklyDutyHours {
            driver_id,
            start_date: start_str,
            end_date: end_date.to_string(),
            driving_hours,
            availability_hours,
            rest_hours,
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::LegType;

    fn params() -> CostParameters {
        CostParameters::default()
    }

    fn trip(leg_type: LegType, start: f64, end: f64, revenue: f64, tolls: f64) -> Trip {
        Trip {
            id: 0,
            leg_type,
            departure_date: "2025-03-01".to_string(),
            arrival_date: "2025-03-02".to_string(),
            origin: "Madrid".to_string(),
            destination: "Valencia".to_string(),
            weight_kg: 0.0,
            revenue,
            odometer_start: start,
            odometer_end: end,
            toll_cost: tolls,
            parking_cost: 0.0,
            truck_id: None,
            driver_id: None,
            document_ref: None,
            created_by: None,
        }
    }

    #[test]
    fn monthly_fixed_cost_includes_insurance_twelfth() {
        let p = params();
        // 3100 + 1650 + 250 + 300 + 30 + 1200/12
        assert!((monthly_fixed_cost(&p) - 5430.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_cost_per_km_guards_zero_target() {
        let mut p = params();
        p.target_km_month = 0.0;
        assert_eq!(fixed_cost_per_km(&p), 0.0);
        p.target_km_month = -5.0;
        assert_eq!(fixed_cost_per_km(&p), 0.0);
        p.target_km_month = 12000.0;
        assert!((fixed_cost_per_km(&p) - 5430.0 / 12000.0).abs() < 1e-12);
    }

    #[test]
    fn estimated_fuel_follows_target_km() {
        let p = params();
        // 12000 * 30 / 100 * 1.09
        assert!((estimated_monthly_fuel_cost(&p) - 3924.0).abs() < 1e-9);
    }

    #[test]
    fn trip_profit_excludes_fuel() {
        let p = params();
        let t = trip(LegType::Loaded, 0.0, 500.0, 475.0, 20.0);
        let expected = 475.0 - (20.0 + 500.0 * fixed_cost_per_km(&p));
        assert!((trip_profit(&t, &p) - expected).abs() < 1e-9);
    }

    #[test]
    fn aggregate_month_totals_and_empty_ratio() {
        let p = params();
        let trips = vec![
            trip(LegType::Loaded, 100.0, 200.0, 95.0, 5.0),
            trip(LegType::Empty, 200.0, 250.0, 0.0, 0.0),
        ];
        let kpis = aggregate_month("2025-03", &trips, 0.0, 0.0, 0.0, &p);

        assert!((kpis.total_km - 150.0).abs() < 1e-9);
        assert!((kpis.empty_km - 50.0).abs() < 1e-9);
        assert!((kpis.empty_ratio_pct - 33.333333).abs() < 1e-3);
        assert!((kpis.revenue - 95.0).abs() < 1e-9);
        assert!((kpis.variable_cost - 5.0).abs() < 1e-9);
    }

    #[test]
    fn aggregate_month_with_no_trips_has_zero_ratio() {
        let p = params();
        let kpis = aggregate_month("2025-03", &[], 0.0, 0.0, 0.0, &p);
        assert_eq!(kpis.total_km, 0.0);
        assert_eq!(kpis.empty_ratio_pct, 0.0);
        assert_eq!(kpis.loaded_ratio_pct, 0.0);
    }

    #[test]
    fn net_profit_subtracts_real_fuel() {
        let p = params();
        let trips = vec![trip(LegType::Loaded, 0.0, 100.0, 95.0, 5.0)];
        let kpis = aggregate_month("2025-03", &trips, 50.0, 0.0, 0.0, &p);
        let expected = 95.0 - (5.0 + 100.0 * fixed_cost_per_km(&p) + 50.0);
        assert!((kpis.net_profit - expected).abs() < 1e-9);
    }
}
