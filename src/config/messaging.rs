//! Messaging configuration types.

use serde::Deserialize;

/// Consumer group used when neither the config file nor the environment
/// names one.
pub const DEFAULT_CONSUMER_GROUP: &str = "transaction-consumer-group-01";

/// Messaging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    pub kafka: KafkaSettings,
    pub topics: TopicSettings,
    /// Publish ledger change events after each write.
    pub publish_ledger_events: bool,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            kafka: KafkaSettings::default(),
            topics: TopicSettings::default(),
            publish_ledger_events: true,
        }
    }
}

/// Kafka connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KafkaSettings {
    /// Kafka bootstrap servers (comma-separated).
    pub bootstrap_servers: String,
    /// Prepended to every topic name.
    pub topic_prefix: String,
    pub group_id: String,
    pub sasl_username: Option<String>,
    pub sasl_password: Option<String>,
    /// Defaults to PLAIN when credentials are set.
    pub sasl_mechanism: Option<String>,
    pub security_protocol: Option<String>,
    pub ssl_ca_location: Option<String>,
}

impl Default for KafkaSettings {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:9092".to_string(),
            topic_prefix: String::new(),
            group_id: DEFAULT_CONSUMER_GROUP.to_string(),
            sasl_username: None,
            sasl_password: None,
            sasl_mechanism: None,
            security_protocol: None,
            ssl_ca_location: None,
        }
    }
}

/// Settings of the document topics created at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TopicSettings {
    pub partitions: i32,
    pub replication: i32,
    pub retention_hours: u64,
    /// Create missing topics at startup.
    pub auto_create: bool,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            partitions: 5,
            replication: 1,
            retention_hours: 168,
            auto_create: true,
        }
    }
}
