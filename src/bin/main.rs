use std::net::SocketAddr;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use qau_api::bootstrap::initialize_admin_user;
use qau_api::static_service::{init_database_connection, init_file_store};
use qau_api::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!("Starting application...");

    let db = init_database_connection().await?;

    if APP_CONFIG.run_migrations {
        tracing::info!("Running database migrations...");
        Migrator::up(db, None)
            .await
            .context("Failed to run migrations")?;
    }

    let files = init_file_store();
    files
        .ensure_root()
        .await
        .context("Failed to create media root")?;
    tracing::info!(media_root = %files.root().display(), "File store ready");

    if let Err(e) = initialize_admin_user(db).await {
        tracing::error!(error = %e, "Failed to initialize admin user");
        tracing::warn!("Continuing without admin user initialization...");
    }

    let app = app::create_app();

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {http_address}"))?;
    tracing::info!("HTTP server listening on {}", &http_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
