//! Política de acceso
//!
//! Traduce `(rol, identidad)` a un valor único por request: qué filas
//! del ledger se ven, si se puede asignar conductor y si se puede
//! forzar el ingreso de un viaje. Todas las operaciones del ledger
//! consumen este valor en lugar de re-derivar la lógica de rol.

use crate::models::user::{Role, User};
use crate::repositories::DriverRepository;
use crate::utils::errors::{AppError, AppResult};

/// Filas visibles: todo el ledger o solo las de un conductor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Driver(i64),
}

impl Scope {
    pub fn driver_id(&self) -> Option<i64> {
        match self {
            Scope::All => None,
            Scope::Driver(id) => Some(*id),
        }
    }
}

/// Política resuelta una vez por request
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    pub scope: Scope,
    /// Manager: elige conductor libremente. Driver: siempre el suyo.
    pub can_assign_driver: bool,
    /// Manager: puede forzar el ingreso de un viaje
    pub can_override_revenue: bool,
}

impl AccessPolicy {
    pub fn manager() -> Self {
        Self {
            scope: Scope::All,
            can_assign_driver: true,
            can_override_revenue: true,
        }
    }

    pub fn driver(driver_id: i64) -> Self {
        Self {
            scope: Scope::Driver(driver_id),
            can_assign_driver: false,
            can_override_revenue: false,
        }
    }

    /// Resuelve la política para un usuario. Un usuario driver sin
    /// conductor enlazado cae al conductor de id más bajo (regla de
    /// compatibilidad heredada); si el registro está vacío no hay
    /// identidad que asignar y la operación se rechaza.
    pub async fn resolve(user: &User, drivers: &DriverRepository) -> AppResult<Self> {
        match user.role {
            Role::Manager => Ok(Self::manager()),
            Role::Driver => {
                let driver_id = match user.driver_id {
                    Some(id) => id,
                    None => drivers.lowest_id().await?.ok_or_else(|| {
                        AppError::Validation("no drivers registered".to_string())
                    })?,
                };
                Ok(Self::driver(driver_id))
            }
        }
    }

    /// Conductor efectivo de un registro: lo pedido para managers,
    /// forzado al propio para drivers
    pub fn assigned_driver(&self, requested: Option<i64>) -> Option<i64> {
        if self.can_assign_driver {
            requested
        } else {
            self.scope.driver_id()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_keeps_requested_driver() {
        let policy = AccessPolicy::manager();
        assert_eq!(policy.assigned_driver(Some(7)), Some(7));
        assert_eq!(policy.assigned_driver(None), None);
    }

    #[test]
    fn driver_is_always_forced_to_own_id() {
        let policy = AccessPolicy::driver(3);
        assert_eq!(policy.assigned_driver(Some(7)), Some(3));
        assert_eq!(policy.assigned_driver(None), Some(3));
        assert!(!policy.can_override_revenue);
    }
}
