//! Bootstrap utilities for the consumer binary.

use backon::Retryable;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::retry::connection_backoff;
use crate::config::{PostgresConfig, LOG_ENV_VAR, LOG_FORMAT_ENV_VAR};

/// Initialize tracing with the LEDGER_LOG environment variable.
///
/// Defaults to "info" level if LEDGER_LOG is not set. `LEDGER_LOG_FORMAT=json`
/// switches to one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV_VAR)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Connect to PostgreSQL with exponential backoff retry.
///
/// Gives up after `connect_retries` failed attempts and returns the last error.
pub async fn connect_postgres(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    let pool = (|| async {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.uri)
            .await
    })
    .retry(connection_backoff().with_max_times(config.connect_retries))
    .notify(|err: &sqlx::Error, dur| {
        warn!(error = %err, delay_ms = dur.as_millis() as u64, "Failed to connect to PostgreSQL, retrying");
    })
    .await?;

    info!(max_connections = config.max_connections, "Connected to PostgreSQL");
    Ok(pool)
}
