//! Utilidades de validación
//!
//! Funciones helper para validar fechas y campos de texto que llegan
//! desde el shell web antes de tocar el ledger.

use chrono::NaiveDate;

use crate::utils::errors::{AppError, AppResult};

/// Valida que un string sea una fecha `YYYY-MM-DD`
pub fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{} must be a YYYY-MM-DD date", field)))
}

/// Valida que un string sea un mes `YYYY-MM`
pub fn parse_month(value: &str) -> AppResult<String> {
    // Se valida contra el primer día; el ledger filtra por prefijo de texto.
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("month must be YYYY-MM".to_string()))?;
    Ok(value.to_string())
}

/// Valida que un campo obligatorio no esté vacío y lo devuelve recortado
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Normaliza un campo opcional: `None` si viene vacío
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert!(parse_date("fecha", "2025-03-14").is_ok());
        assert!(parse_date("fecha", "14/03/2025").is_err());
        assert!(parse_date("fecha", "").is_err());
    }

    #[test]
    fn require_text_trims_and_rejects_empty() {
        assert_eq!(require_text("origen", "  Madrid ").unwrap(), "Madrid");
        assert!(require_text("origen", "   ").is_err());
    }

    #[test]
    fn optional_text_maps_blank_to_none() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" Repsol ".to_string())), Some("Repsol".to_string()));
        assert_eq!(optional_text(None), None);
    }
}
