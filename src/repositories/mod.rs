//! Repositorios de acceso a datos
//!
//! Un repositorio por tabla; queries runtime con `query_as`, sin
//! macros de verificación contra una base de datos en compilación.

pub mod driver_repository;
pub mod duty_hours_repository;
pub mod fuel_repository;
pub mod settings_repository;
pub mod trip_repository;
pub mod truck_repository;
pub mod user_repository;

pub use driver_repository::DriverRepository;
pub use duty_hours_repository::DutyHoursRepository;
pub use fuel_repository::{FuelDraft, FuelRepository};
pub use settings_repository::SettingsRepository;
pub use trip_repository::{TripDraft, TripRepository};
pub use truck_repository::TruckRepository;
pub use user_repository::UserRepository;
