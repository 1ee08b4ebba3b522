//! Repositorio de usuarios

use sqlx::SqlitePool;

use crate::models::user::{Role, User};
use crate::utils::errors::{conflict_error, AppError, AppResult};

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Login: usuario activo con ese username + PIN
    pub async fn find_by_credentials(&self, username: &str, pin: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = ? AND pin = ? AND active = 1",
        )
        .bind(username)
        .bind(pin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_active_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ? AND active = 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Usuario driver emparejado a un conductor; username duplicado
    /// se devuelve como `Conflict`
    pub async fn create_driver_user(
        &self,
        username: &str,
        pin: &str,
        driver_id: i64,
    ) -> AppResult<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, pin, role, active, driver_id)
            VALUES (?, ?, 'driver', 1, ?)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(pin)
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if AppError::is_unique_violation(&e) => {
                Err(conflict_error("User", "username", username))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Siembra de arranque: crea el usuario solo si no existe
    pub async fn ensure_user(
        &self,
        username: &str,
        pin: &str,
        role: Role,
        driver_id: Option<i64>,
    ) -> AppResult<()> {
        let role_text = match role {
            Role::Manager => "manager",
            Role::Driver => "driver",
        };

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (username, pin, role, active, driver_id)
            VALUES (?, ?, ?, 1, ?)
            "#,
        )
        .bind(username)
        .bind(pin)
        .bind(role_text)
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
