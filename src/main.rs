//!
//! Charging-station reservation service.
//! Reads configuration from TOML file (~/.config/evreserve/config.toml).

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use evreserve::application::{
    AuthService, ReservationService, StationService, TextReceiptGenerator,
};
use evreserve::config::AppConfig;
use evreserve::{create_api_router, default_config_path, InMemoryStorage, Storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("EVRESERVE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting EV Reserve...");

    // ── Storage and services ───────────────────────────────────
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());

    // Single global write lock: conflict detection and the deletion guard
    // are check-then-act sequences that must not interleave.
    let write_lock = Arc::new(Mutex::new(()));

    // Receipt emission re-creates the directory as needed; a bad path
    // is reported here at startup, not at the first accept.
    if let Err(e) = tokio::fs::create_dir_all(&app_cfg.export.directory).await {
        error!(
            "Failed to create export directory {}: {}",
            app_cfg.export.directory.display(),
            e
        );
    }

    let receipts = Arc::new(TextReceiptGenerator::new(
        storage.clone(),
        app_cfg.export.directory.clone(),
    ));
    let reservations = Arc::new(ReservationService::new(
        storage.clone(),
        receipts,
        write_lock.clone(),
    ));
    let stations = Arc::new(StationService::new(
        storage.clone(),
        reservations.clone(),
        write_lock,
    ));
    let auth = Arc::new(AuthService::new(storage.clone()));

    // ── REST API server with graceful shutdown ─────────────────
    let router = create_api_router(auth, stations, reservations);

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("EV Reserve shutdown complete");
    Ok(())
}
