//! Kafka transport.
//!
//! Document topics are consumed by one `StreamConsumer` subscribed to every
//! registered topic. Ledger change events are produced to
//! `{topic_prefix}{ledger}-transaction-changed`, keyed by `{shopid}:{docno}`
//! so the events of one document stay ordered.

use std::time::Duration;

use async_trait::async_trait;
use backon::ExponentialBuilder;
use futures::StreamExt;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::error::RDKafkaErrorCode;
use rdkafka::message::{BorrowedMessage, Message};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::{ClientConfig, Offset};
use tracing::{debug, error, info, warn};

use super::dispatch::process_message;
use super::{BusError, LedgerEvent, LedgerEventPublisher, Result};
use crate::config::{KafkaSettings, TopicSettings};
use crate::consumer::ConsumerRegistry;

const MILLIS_PER_HOUR: u64 = 60 * 60 * 1000;

/// rdkafka client properties for one broker cluster.
#[derive(Clone, Debug)]
pub struct KafkaConfig {
    pub bootstrap_servers: String,
    /// Prepended to every topic name.
    pub topic_prefix: String,
    pub group_id: String,
    security: Vec<(&'static str, String)>,
}

impl KafkaConfig {
    pub fn new(bootstrap_servers: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            topic_prefix: String::new(),
            group_id: group_id.into(),
            security: Vec::new(),
        }
    }

    /// Build from loaded settings.
    ///
    /// SASL is enabled only when both username and password are set; it
    /// defaults to `PLAIN` over `SASL_SSL` unless the settings say otherwise.
    pub fn from_settings(settings: &KafkaSettings) -> Self {
        let sasl = settings
            .sasl_username
            .as_ref()
            .zip(settings.sasl_password.as_ref());

        let mut security = Vec::new();
        let protocol = settings
            .security_protocol
            .clone()
            .or_else(|| sasl.map(|_| "SASL_SSL".to_string()));
        if let Some(protocol) = protocol {
            security.push(("security.protocol", protocol));
        }
        if let Some((username, password)) = sasl {
            let mechanism = settings.sasl_mechanism.as_deref().unwrap_or("PLAIN");
            security.push(("sasl.mechanism", mechanism.to_string()));
            security.push(("sasl.username", username.clone()));
            security.push(("sasl.password", password.clone()));
        }
        if let Some(ca) = &settings.ssl_ca_location {
            security.push(("ssl.ca.location", ca.clone()));
        }

        Self {
            topic_prefix: settings.topic_prefix.clone(),
            security,
            ..Self::new(&settings.bootstrap_servers, &settings.group_id)
        }
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", &self.bootstrap_servers);
        for (key, value) in &self.security {
            config.set(*key, value);
        }
        config
    }

    fn producer_config(&self) -> ClientConfig {
        let mut config = self.client_config();
        config.set("message.timeout.ms", "5000");
        config.set("acks", "all");
        config.set("enable.idempotence", "true");
        config
    }

    /// Offsets are committed by the runner, never automatically.
    fn consumer_config(&self) -> ClientConfig {
        let mut config = self.client_config();
        config.set("group.id", &self.group_id);
        config.set("enable.auto.commit", "false");
        config.set("auto.offset.reset", "earliest");
        config
    }
}

fn new_topics<'a>(
    topics: &'a [String],
    settings: &TopicSettings,
    retention: &'a str,
) -> Vec<NewTopic<'a>> {
    topics
        .iter()
        .map(|name| {
            NewTopic::new(
                name,
                settings.partitions,
                TopicReplication::Fixed(settings.replication),
            )
            .set("retention.ms", retention)
        })
        .collect()
}

/// Create `topics` if they do not exist yet.
pub async fn ensure_topics(
    config: &KafkaConfig,
    topics: &[String],
    settings: &TopicSettings,
) -> Result<()> {
    let admin: AdminClient<DefaultClientContext> = config
        .client_config()
        .create()
        .map_err(|e| BusError::Connection(format!("Failed to create Kafka admin client: {}", e)))?;

    let retention = (settings.retention_hours * MILLIS_PER_HOUR).to_string();
    let requested = new_topics(topics, settings, &retention);

    let results = admin
        .create_topics(&requested, &AdminOptions::new())
        .await
        .map_err(|e| BusError::Admin(format!("Failed to create topics: {}", e)))?;

    let mut created = 0;
    for result in results {
        match result {
            Ok(topic) => {
                debug!(topic = %topic, "Created topic");
                created += 1;
            }
            Err((_, RDKafkaErrorCode::TopicAlreadyExists)) => {}
            Err((topic, code)) => {
                return Err(BusError::Admin(format!(
                    "Failed to create topic {}: {}",
                    topic, code
                )));
            }
        }
    }

    info!(
        requested = topics.len(),
        created,
        partitions = settings.partitions,
        "Kafka topics ensured"
    );
    Ok(())
}

/// Publishes ledger change events to Kafka.
pub struct KafkaLedgerPublisher {
    producer: FutureProducer,
    topic_prefix: String,
}

impl KafkaLedgerPublisher {
    pub fn new(config: &KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = config
            .producer_config()
            .create()
            .map_err(|e| BusError::Connection(format!("Failed to create Kafka producer: {}", e)))?;

        info!(
            bootstrap_servers = %config.bootstrap_servers,
            topic_prefix = %config.topic_prefix,
            "Connected Kafka producer"
        );

        Ok(Self {
            producer,
            topic_prefix: config.topic_prefix.clone(),
        })
    }
}

#[async_trait]
impl LedgerEventPublisher for KafkaLedgerPublisher {
    async fn publish(&self, event: &LedgerEvent) -> Result<()> {
        let topic = event.ledger.changed_topic(&self.topic_prefix);
        let key = event.key();
        let payload = serde_json::to_vec(event)?;

        let record = FutureRecord::to(&topic).payload(&payload).key(&key);

        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(e, _)| BusError::Publish(format!("Failed to publish: {}", e)))?;

        debug!(topic = %topic, key = %key, "Published ledger event");
        Ok(())
    }
}

/// Consumes every registered document topic and dispatches each message.
pub struct KafkaConsumerRunner {
    consumer: StreamConsumer,
    registry: ConsumerRegistry,
    backoff: ExponentialBuilder,
}

impl KafkaConsumerRunner {
    pub fn new(
        config: &KafkaConfig,
        registry: ConsumerRegistry,
        backoff: ExponentialBuilder,
    ) -> Result<Self> {
        if config.group_id.is_empty() {
            return Err(BusError::Subscribe("No consumer group configured".to_string()));
        }

        let consumer: StreamConsumer = config
            .consumer_config()
            .create()
            .map_err(|e| BusError::Connection(format!("Failed to create Kafka consumer: {}", e)))?;

        Ok(Self {
            consumer,
            registry,
            backoff,
        })
    }

    /// Consume until `shutdown` resolves.
    ///
    /// Offsets are committed after success or an undecodable message. A
    /// message whose consumer kept failing is not committed; the partition is
    /// rewound to it so it is delivered again.
    pub async fn run(&self, shutdown: impl std::future::Future<Output = ()>) -> Result<()> {
        let topics = self.registry.topics();
        let topic_refs: Vec<&str> = topics.iter().map(|s| s.as_str()).collect();
        self.consumer
            .subscribe(&topic_refs)
            .map_err(|e| BusError::Subscribe(format!("Failed to subscribe to topics: {}", e)))?;

        info!(topics = topics.len(), "Subscribed to Kafka topics");

        let mut stream = self.consumer.stream();
        tokio::pin!(shutdown);

        loop {
            let message = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping consumer");
                    break;
                }
                next = stream.next() => match next {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        error!(error = %e, "Kafka consumer error");
                        continue;
                    }
                    None => break,
                },
            };

            let topic = message.topic();
            let Some(payload) = message.payload() else {
                warn!(topic = %topic, offset = message.offset(), "Received message with no payload");
                self.commit(&message);
                continue;
            };

            debug!(
                topic = %topic,
                partition = message.partition(),
                offset = message.offset(),
                "Received message"
            );

            let result = process_message(&self.registry, topic, payload, self.backoff).await;

            if result.should_ack() {
                self.commit(&message);
            } else if let Err(e) = self.consumer.seek(
                topic,
                message.partition(),
                Offset::Offset(message.offset()),
                Duration::from_secs(5),
            ) {
                error!(
                    topic = %topic,
                    partition = message.partition(),
                    offset = message.offset(),
                    error = %e,
                    "Failed to rewind to failed message"
                );
            }
        }

        Ok(())
    }

    fn commit(&self, message: &BorrowedMessage<'_>) {
        if let Err(e) = self.consumer.commit_message(message, CommitMode::Async) {
            error!(error = %e, "Failed to commit offset");
        }
    }
}
