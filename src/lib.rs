//! Fleet Ledger - backend de gestión de flota
//!
//! Registra viajes, repostajes y partes de horas de una flota pequeña
//! y deriva KPIs financieros por viaje y por mes a partir de unos
//! parámetros de coste configurables.

pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
