//! Storage configuration types.

use serde::Deserialize;

/// Storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// PostgreSQL-specific configuration.
    pub postgres: PostgresConfig,
}

/// PostgreSQL-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    /// PostgreSQL connection URI.
    pub uri: String,
    /// Upper bound of the connection pool.
    pub max_connections: u32,
    /// Connection attempts at startup before giving up.
    pub connect_retries: usize,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://localhost:5432/ledger".to_string(),
            max_connections: 10,
            connect_retries: 30,
        }
    }
}
