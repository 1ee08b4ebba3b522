//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, incluido el mapa de sesiones en memoria.

use std::collections::HashMap;
use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::config::environment::EnvironmentConfig;

/// Sesión autenticada con expiración
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: i64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    pub fn new(user_id: i64, ttl_hours: i64) -> Self {
        Self {
            user_id,
            expires_at: chrono::Utc::now() + chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: EnvironmentConfig,
    pub sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Crea una sesión para el usuario y devuelve su token opaco
    pub async fn create_session(&self, user_id: i64) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let session = Session::new(user_id, self.config.session_ttl_hours);
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Usuario de un token vigente, si existe
    pub async fn session_user_id(&self, token: &str) -> Option<i64> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|s| !s.is_expired())
            .map(|s| s.user_id)
    }

    pub async fn remove_session(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Limpia sesiones expiradas
    pub async fn cleanup_expired_sessions(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired());
    }
}
