use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use fleet_ledger::config::environment::EnvironmentConfig;
use fleet_ledger::database;
use fleet_ledger::routes;
use fleet_ledger::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Fleet Ledger - Transporte360");
    info!("================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos: pool + schema + siembra de defaults
    let pool = match database::init(Some(&config.database_url)).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = config.server_addr().parse()?;
    info!("🔧 Entorno: {}", config.environment);

    let app_state = AppState::new(pool, config);

    // Barrido periódico de sesiones expiradas
    let session_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            session_state.cleanup_expired_sessions().await;
        }
    });

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", routes::create_api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/login - Login con usuario + PIN");
    info!("   POST /api/auth/logout - Cerrar sesión");
    info!("🚛 Flota:");
    info!("   POST /api/trucks - Alta de camión (manager)");
    info!("   GET  /api/trucks - Listar camiones");
    info!("   POST /api/drivers - Alta de conductor (manager)");
    info!("   GET  /api/drivers - Listar conductores");
    info!("📒 Ledger:");
    info!("   POST /api/trips - Registrar viaje");
    info!("   GET  /api/trips - Listar viajes (scope por rol)");
    info!("   GET  /api/trips/export.csv - Export CSV (manager)");
    info!("   POST /api/fuel - Registrar repostaje");
    info!("   GET  /api/fuel - Listar repostajes (scope por rol)");
    info!("   POST /api/duty-hours - Parte de horas del día");
    info!("   GET  /api/duty-hours/weekly - Resumen 7 días");
    info!("⚙️ Ajustes y métricas:");
    info!("   GET  /api/settings - Parámetros de coste (manager)");
    info!("   PUT  /api/settings - Actualizar parámetros (manager)");
    info!("   GET  /api/kpis/monthly - KPIs del mes");
    info!("   GET  /api/dashboard - KPIs + actividad reciente");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de health check
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-ledger",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
