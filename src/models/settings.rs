//! Parámetros de coste configurables
//!
//! La tabla `settings` es un clave/valor TEXT; las claves conservan los
//! nombres históricos de la base de datos. El código nunca lee claves
//! sueltas: trabaja sobre el snapshot tipado `CostParameters` cargado
//! una vez por operación.

use serde::{Deserialize, Serialize};

/// Claves reconocidas en la tabla `settings` (nombres históricos)
pub mod keys {
    pub const DRIVER_SALARY_MONTH: &str = "salario_chofer_mes";
    pub const TARGET_KM_MONTH: &str = "km_objetivo_mes";
    pub const TRUCK_LEASE_MONTH: &str = "alquiler_camion_mes";
    pub const ACCOUNTING_FEE_MONTH: &str = "gestoria_mes";
    pub const SELF_EMPLOYED_FEE_MONTH: &str = "autonomo_mes";
    pub const STANDING_ORDER_FEE_MONTH: &str = "domiciliacion_mes";
    pub const CARGO_INSURANCE_YEAR: &str = "seguro_mercancias_anual";
    pub const TARIFF_PER_KM: &str = "tarifa_km";
    pub const CONSUMPTION_L_100KM: &str = "consumo_l_100";
    pub const FUEL_PRICE_ESTIMATE: &str = "precio_gasoil_est";
}

/// Snapshot tipado de los parámetros de coste
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostParameters {
    /// Coste de empleo del conductor €/mes
    pub driver_salary_month: f64,
    /// Kilometraje objetivo al mes para imputar costes fijos
    pub target_km_month: f64,
    /// Alquiler/leasing del camión €/mes
    pub truck_lease_month: f64,
    /// Gestoría €/mes
    pub accounting_fee_month: f64,
    /// Cuota de autónomo €/mes
    pub self_employed_fee_month: f64,
    /// Domiciliaciones €/mes
    pub standing_order_fee_month: f64,
    /// Seguro de mercancías €/año
    pub cargo_insurance_year: f64,
    /// Tarifa facturada €/km en tramos cargados
    pub tariff_per_km: f64,
    /// Consumo estimado L/100km
    pub consumption_l_100km: f64,
    /// Precio estimado del gasoil €/L
    pub fuel_price_estimate: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        // Valores sembrados en el primer arranque
        Self {
            driver_salary_month: 3100.0,
            target_km_month: 12000.0,
            truck_lease_month: 1650.0,
            accounting_fee_month: 250.0,
            self_employed_fee_month: 300.0,
            standing_order_fee_month: 30.0,
            cargo_insurance_year: 1200.0,
            tariff_per_km: 0.95,
            consumption_l_100km: 30.0,
            fuel_price_estimate: 1.09,
        }
    }
}

/// Request del manager para actualizar parámetros; los campos ausentes
/// no se tocan
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    pub driver_salary_month: Option<f64>,
    pub target_km_month: Option<f64>,
    pub truck_lease_month: Option<f64>,
    pub accounting_fee_month: Option<f64>,
    pub self_employed_fee_month: Option<f64>,
    pub standing_order_fee_month: Option<f64>,
    pub cargo_insurance_year: Option<f64>,
    pub tariff_per_km: Option<f64>,
    pub consumption_l_100km: Option<f64>,
    pub fuel_price_estimate: Option<f64>,
}
