use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at startup. Every value has a default so
/// the daemon runs with no environment set at all.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub log_dir: PathBuf,
    pub catalog_url: String,
    pub semester: String,
    pub refresh_interval_secs: u64,
    pub error_backoff_secs: u64,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://courses.db".to_string()),
            log_dir: env::var("COURSEWATCH_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs")),
            catalog_url: env::var("COURSEWATCH_CATALOG_URL").unwrap_or_else(|_| {
                "https://querycourse.ntust.edu.tw/querycourse/api/courses".to_string()
            }),
            semester: env::var("COURSEWATCH_SEMESTER").unwrap_or_else(|_| "1131".to_string()),
            refresh_interval_secs: env_u64("COURSEWATCH_REFRESH_INTERVAL_SECS", 3600),
            error_backoff_secs: env_u64("COURSEWATCH_ERROR_BACKOFF_SECS", 1800),
            http_timeout_secs: env_u64("COURSEWATCH_HTTP_TIMEOUT_SECS", 30),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
