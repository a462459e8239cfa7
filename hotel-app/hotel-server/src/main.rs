use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use hotel_api::{build_router, AppState};
use hotel_infrastructure::{
    create_pool, run_migrations, PgMasterUserRepository, PgTenantConnector, PgTenantDirectory,
};
use hotel_shared::config::AppConfig;

fn load_config() -> anyhow::Result<AppConfig> {
    AppConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e.into()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry; the guard flushes buffered log lines on exit
    let _log_guard = hotel_shared::telemetry::init_telemetry();

    info!("Hotel server starting...");

    // Returning the error drops the guard, which flushes the log line
    let config = load_config()?;

    // Connect to the master database
    info!("Connecting to master database...");
    let pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    // Wire adapters into the app state
    let connector = PgTenantConnector::new(Duration::from_secs(
        config.database.acquire_timeout_seconds.max(1),
    ));
    let state = AppState::new(
        &config,
        Arc::new(PgTenantDirectory::new(pool.clone())),
        Arc::new(PgMasterUserRepository::new(pool)),
        Arc::new(connector),
    );

    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
