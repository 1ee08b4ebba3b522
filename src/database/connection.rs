//! Conexión a SQLite y creación del schema
//!
//! El schema se crea de forma idempotente en el arranque, seguido de
//! la siembra de parámetros de coste y usuarios demo.

use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::models::user::Role;
use crate::repositories::{SettingsRepository, UserRepository};

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(database_url: Option<&str>) -> Result<SqlitePool> {
    let database_url = match database_url {
        Some(url) => url.to_string(),
        None => std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:transporte.db".to_string()),
    };

    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Crea las tablas si no existen
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          username TEXT NOT NULL UNIQUE,
          pin TEXT NOT NULL,
          role TEXT NOT NULL CHECK(role IN ('manager','driver')),
          active INTEGER NOT NULL DEFAULT 1,
          driver_id INTEGER,
          FOREIGN KEY (driver_id) REFERENCES drivers(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trucks (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          plate TEXT NOT NULL UNIQUE,
          description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS drivers (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          national_id TEXT,
          phone TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trips (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          leg_type TEXT NOT NULL DEFAULT 'LOADED' CHECK(leg_type IN ('LOADED','EMPTY')),
          departure_date TEXT NOT NULL,
          arrival_date TEXT NOT NULL,
          origin TEXT NOT NULL,
          destination TEXT NOT NULL,
          weight_kg REAL NOT NULL DEFAULT 0,
          revenue REAL NOT NULL DEFAULT 0,
          odometer_start REAL NOT NULL,
          odometer_end REAL NOT NULL,
          toll_cost REAL NOT NULL DEFAULT 0,
          parking_cost REAL NOT NULL DEFAULT 0,
          truck_id INTEGER,
          driver_id INTEGER,
          document_ref TEXT,
          created_by INTEGER,
          FOREIGN KEY (truck_id) REFERENCES trucks(id),
          FOREIGN KEY (driver_id) REFERENCES drivers(id),
          FOREIGN KEY (created_by) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fuel_purchases (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          date TEXT NOT NULL,
          truck_id INTEGER,
          driver_id INTEGER,
          liters REAL NOT NULL DEFAULT 0,
          price_per_liter REAL NOT NULL DEFAULT 0,
          amount REAL NOT NULL DEFAULT 0,
          odometer REAL,
          station TEXT,
          document_ref TEXT NOT NULL,
          created_by INTEGER,
          FOREIGN KEY (truck_id) REFERENCES trucks(id),
          FOREIGN KEY (driver_id) REFERENCES drivers(id),
          FOREIGN KEY (created_by) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS duty_hours (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          driver_id INTEGER NOT NULL,
          date TEXT NOT NULL,
          driving_hours REAL NOT NULL DEFAULT 0,
          availability_hours REAL NOT NULL DEFAULT 0,
          rest_hours REAL NOT NULL DEFAULT 11,
          comment TEXT,
          created_by INTEGER,
          UNIQUE(driver_id, date),
          FOREIGN KEY (driver_id) REFERENCES drivers(id),
          FOREIGN KEY (created_by) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Siembra de primer arranque: parámetros de coste y usuarios demo
pub async fn seed(pool: &SqlitePool) -> Result<()> {
    let settings = SettingsRepository::new(pool.clone());
    settings.seed_defaults().await?;

    let users = UserRepository::new(pool.clone());
    users.ensure_user("Admin", "9999", Role::Manager, None).await?;
    users.ensure_user("Mohsin", "1111", Role::Driver, None).await?;

    Ok(())
}

/// Pool listo para usar: schema creado y defaults sembrados
pub async fn init(database_url: Option<&str>) -> Result<SqlitePool> {
    let pool = create_pool(database_url).await?;
    init_schema(&pool).await?;
    seed(&pool).await?;
    Ok(pool)
}

/// Base de datos en memoria con schema y siembra, para tests.
/// Una sola conexión: cada conexión `:memory:` sería una base distinta.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    seed(&pool).await?;
    Ok(pool)
}
