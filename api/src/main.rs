use api::app;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::{net::SocketAddr, sync::Arc};
use tracing_appender::rolling;
use util::{
    config::AppConfig, media::LocalMediaStore, paths::ensure_dir, state::AppState,
    supervisor::Supervisor,
};

#[tokio::main]
async fn main() {
    let config = AppConfig::global();

    // Load configuration and initialize logging
    let _log_guard = init_logging(&config.log_file, config.log_to_stdout);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Set up dependencies
    let db = db::connect(&config.database_path)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let media_root = ensure_dir(config.media_root()).expect("Failed to create media storage root");
    let media = Arc::new(LocalMediaStore::new(media_root, config.media_base_url.clone()));
    let supervisor = Supervisor::new();
    let app_state = AppState::new(db, media, supervisor.clone());

    // Build app router
    let app = app(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    tracing::info!(%addr, env = %config.env, "Starting {}", config.project_name);
    println!(
        "Starting {} on http://{}:{}",
        config.project_name, config.host, config.port
    );

    let shutdown = {
        let supervisor = supervisor.clone();
        async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown requested"),
                _ = supervisor.failed() => {}
            }
        }
    };

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .expect("Server crashed");

    if supervisor.is_failed() {
        let reason = supervisor.failure_reason().unwrap_or_default();
        tracing::error!(reason = %reason, "Exiting after background task failure");
        std::process::exit(1);
    }

    supervisor.wait_idle().await;
}

fn init_logging(log_file: &str, log_to_stdout: bool) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
