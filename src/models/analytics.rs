//! Modelos de métricas derivadas
//!
//! KPIs mensuales del dashboard y resumen semanal de horas. Todo se
//! deriva del ledger + settings en lectura; nada de esto se persiste.

use serde::Serialize;

use crate::models::duty_hours::DutyHoursRecord;
use crate::models::trip::TripWithLabels;

/// KPIs financieros y operativos de un mes `YYYY-MM`
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyKpis {
    pub month: String,
    pub total_km: f64,
    pub empty_km: f64,
    /// empty_km / total_km en %, 0 si no hay kilómetros
    pub empty_ratio_pct: f64,
    pub loaded_ratio_pct: f64,
    pub revenue: f64,
    /// Peajes + parking del mes
    pub variable_cost: f64,
    /// km totales × coste fijo por km
    pub allocated_fixed_cost: f64,
    /// Suma de importes de repostajes del mes
    pub real_fuel_cost: f64,
    /// km objetivo × consumo/100 × precio estimado
    pub estimated_fuel_cost: f64,
    /// revenue − variable − fijo imputado − gasoil real
    pub net_profit: f64,
    pub driving_hours: f64,
    pub availability_hours: f64,
    /// Coste fijo por km vigente al calcular
    pub fixed_cost_per_km: f64,
    pub tariff_per_km: f64,
}

/// Dashboard: KPIs del mes + actividad reciente
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub kpis: MonthlyKpis,
    pub recent_trips: Vec<TripWithLabels>,
}

/// Resumen de horas en la ventana de 7 días `[end_date − 6, end_date]`
#[derive(Debug, Serialize)]
pub struct WeeklyDutyHours {
    pub driver_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub driving_hours: f64,
    pub availability_hours: f64,
    pub rest_hours: f64,
    /// Solo los días con parte registrado; los ausentes suman 0
    pub days: Vec<DutyHoursRecord>,
}
