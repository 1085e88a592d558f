use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursewatch::catalog::CatalogHttpClient;
use coursewatch::config::Config;
use coursewatch::db::repository;
use coursewatch::error::AppError;
use coursewatch::services::{RefreshScheduler, RefreshService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_file_logging(&config.log_dir)?;

    info!(
        "coursewatch starting (semester: {}, database: {})",
        config.semester, config.database_url
    );

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    repository::ensure_schema(&pool).await?;

    let catalog = Arc::new(CatalogHttpClient::new(&config)?);
    let service = RefreshService::new(pool, catalog);
    let scheduler = RefreshScheduler::new(
        service,
        Duration::from_secs(config.refresh_interval_secs),
        Duration::from_secs(config.error_backoff_secs),
    );

    scheduler.start().await;

    Ok(())
}

fn init_file_logging(log_dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        AppError::Config(format!(
            "failed to create log directory '{}': {e}",
            log_dir.display()
        ))
    })?;

    let log_path = log_dir.join("coursewatch.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| {
            AppError::Config(format!(
                "failed to open log file '{}': {e}",
                log_path.display()
            ))
        })?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "coursewatch=debug".to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file)),
        )
        .init();

    Ok(())
}
