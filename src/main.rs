//! Crucible - Application Entry Point
//!
//! This is the main entry point for the Crucible server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use bollard::Docker;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crucible::{
    config::CONFIG,
    handlers,
    scheduler::Scheduler,
    state::AppState,
};

/// Rotating log file: one active file plus up to 5 hourly backups,
/// mirroring the source's `RotatingFileHandler` sizing in spirit (exact
/// byte-based rollover isn't exposed by `tracing-appender`, so rotation is
/// time-based instead).
const LOG_DIRECTORY: &str = "logs";
const LOG_FILE_PREFIX: &str = "crucible.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let file_appender = RollingFileAppender::new(Rotation::HOURLY, LOG_DIRECTORY, LOG_FILE_PREFIX);
    let (file_writer, _file_guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    tracing::info!("Starting Crucible server...");

    tracing::info!("Connecting to Docker at {}...", CONFIG.docker.socket_path);
    let docker = Docker::connect_with_unix(
        &CONFIG.docker.socket_path,
        120,
        bollard::API_DEFAULT_VERSION,
    )?;

    let docker_info = docker.version().await?;
    tracing::info!(
        "Connected to Docker version: {}",
        docker_info.version.unwrap_or_default()
    );

    let scheduler = Arc::new(Scheduler::start(&CONFIG, docker));
    let state = AppState::new(scheduler, CONFIG.clone());

    let app = Router::new()
        .merge(handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
