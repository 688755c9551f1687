//! Kafka data source.
//!
//! Subscribes to a topic with rdkafka (librdkafka bindings) and decodes each
//! record payload as a UTF-8 JSON message.
//!
//! ## Example
//!
//! ```rust,no_run
//! use buzzwatch::config::Settings;
//! use buzzwatch::source::{KafkaSource, MessageSource, Polled};
//!
//! let settings = Settings::default();
//! let mut source = KafkaSource::connect(&settings)?;
//!
//! loop {
//!     match source.poll()? {
//!         Polled::Ready(message) => println!("length {}", message.message_length),
//!         Polled::Idle => std::thread::sleep(std::time::Duration::from_millis(50)),
//!         Polled::Exhausted => break,
//!     }
//! }
//! # Ok::<(), buzzwatch::SourceError>(())
//! ```

use std::fmt;
use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::Message as _;
use tracing::{debug, info};

use super::{MessageSource, Polled};
use crate::config::Settings;
use crate::error::SourceError;
use crate::message::Message;

/// How long to wait for the broker to answer the initial metadata request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A data source that consumes a Kafka topic.
///
/// The broker is probed once when connecting; after that, any client or
/// payload error is returned from [`poll`](MessageSource::poll) and the
/// caller stops consuming. There is no reconnect.
pub struct KafkaSource {
    consumer: BaseConsumer,
    topic: String,
    server: String,
    description: String,
}

impl KafkaSource {
    /// Connect to the configured broker and subscribe to the topic.
    pub fn connect(settings: &Settings) -> Result<Self, SourceError> {
        Self::connect_with_timeout(settings, CONNECT_TIMEOUT)
    }

    /// Connect with an explicit timeout for the reachability probe.
    pub fn connect_with_timeout(
        settings: &Settings,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let consumer: BaseConsumer = ClientConfig::new()
            .set("bootstrap.servers", &settings.kafka_server)
            .set("group.id", &settings.kafka_group_id)
            .set("auto.offset.reset", "latest")
            .set("enable.auto.commit", "true")
            .create()
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        // librdkafka connects lazily; a metadata round-trip proves the broker is there.
        consumer
            .fetch_metadata(Some(&settings.project_topic), timeout)
            .map_err(|e| SourceError::Connection(format!("{}: {}", settings.kafka_server, e)))?;

        consumer
            .subscribe(&[settings.project_topic.as_str()])
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        info!(
            "Kafka consumer connected to {}, listening to topic '{}'",
            settings.kafka_server, settings.project_topic
        );

        Ok(Self {
            consumer,
            topic: settings.project_topic.clone(),
            server: settings.kafka_server.clone(),
            description: format!("kafka: {}/{}", settings.kafka_server, settings.project_topic),
        })
    }

    /// The subscribed topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl MessageSource for KafkaSource {
    fn poll(&mut self) -> Result<Polled, SourceError> {
        let record = match self.consumer.poll(Duration::ZERO) {
            None => return Ok(Polled::Idle),
            Some(Err(e)) => {
                return Err(SourceError::Connection(format!("{}: {}", self.server, e)));
            }
            Some(Ok(record)) => record,
        };

        let location = format!(
            "{}[{}]@{}",
            record.topic(),
            record.partition(),
            record.offset()
        );
        let payload = record.payload().unwrap_or_default();

        let message =
            Message::from_slice(payload).map_err(|e| SourceError::malformed(location.as_str(), e))?;
        debug!("Received from Kafka at {}", location);

        Ok(Polled::Ready(message))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for KafkaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaSource")
            .field("server", &self.server)
            .field("topic", &self.topic)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_fails_without_broker() {
        let settings = Settings {
            // Reserved port on loopback: nothing listens there
            kafka_server: "127.0.0.1:1".to_string(),
            ..Settings::default()
        };

        let err = KafkaSource::connect_with_timeout(&settings, Duration::from_millis(500))
            .unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
        assert!(err.to_string().contains("127.0.0.1:1"));
    }
}
