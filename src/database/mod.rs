//! Acceso a la base de datos

pub mod connection;

pub use connection::{create_pool, init, init_in_memory, init_schema, seed};
