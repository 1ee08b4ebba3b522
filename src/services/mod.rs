//! Services module
//!
//! Este módulo contiene la lógica de negocio: política de acceso,
//! ledger (altas + listados), motor de costes y export.

pub mod access_policy;
pub mod cost_service;
pub mod export_service;
pub mod ledger_service;

pub use access_policy::{AccessPolicy, Scope};
pub use cost_service::CostService;
pub use export_service::ExportService;
pub use ledger_service::LedgerService;
