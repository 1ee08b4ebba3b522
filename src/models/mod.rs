//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema SQLite, junto con sus requests/responses de la API.

pub mod analytics;
pub mod driver;
pub mod duty_hours;
pub mod fuel;
pub mod settings;
pub mod trip;
pub mod truck;
pub mod user;

use serde::Serialize;

/// Response genérica de la API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Aviso no fatal (p.ej. matrícula o username duplicados)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            warning: None,
            data: Some(data),
        }
    }

    pub fn success_with_warning(data: T, warning: String) -> Self {
        Self {
            success: true,
            warning: Some(warning),
            data: Some(data),
        }
    }

    /// Aviso no fatal sin entidad persistida (p.ej. matrícula duplicada)
    pub fn warning(warning: String) -> Self {
        Self {
            success: false,
            warning: Some(warning),
            data: None,
        }
    }
}
