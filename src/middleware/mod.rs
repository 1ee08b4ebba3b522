//! Middleware de la aplicación

pub mod auth;

pub use auth::{AuthUser, ManagerUser};
