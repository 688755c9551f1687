//! Message sources and source selection.
//!
//! A run consumes from exactly one source, chosen once at startup:
//!
//! 1. **Broker mode** ([`KafkaSource`], `kafka` feature): subscribe to the
//!    configured topic.
//! 2. **File mode** ([`FileSource`]): replay newline-delimited JSON records
//!    from the data file, pacing one record per interval.
//!
//! If broker support is not compiled in, is disabled, or fails to connect,
//! [`select_source`] falls back to file mode. There is no retry in either
//! direction.

mod file;
#[cfg(feature = "kafka")]
mod kafka;

pub use file::{FileSource, LineSource};
#[cfg(feature = "kafka")]
pub use kafka::KafkaSource;

use std::fmt::Debug;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::Settings;
use crate::error::SourceError;
use crate::message::Message;

/// Whether this build can consume from a Kafka broker.
pub const BROKER_AVAILABLE: bool = cfg!(feature = "kafka");

/// Outcome of polling a source once.
#[derive(Debug, Clone, PartialEq)]
pub enum Polled {
    /// A record was decoded.
    Ready(Message),
    /// Nothing available right now (pacing delay or empty broker poll).
    Idle,
    /// The source has no more records.
    Exhausted,
}

/// Trait for pulling messages one at a time.
///
/// `poll` must not block: the caller interleaves it with redraws and
/// keyboard handling on a single thread. Any error is terminal for the
/// source; callers stop polling after the first `Err`.
pub trait MessageSource: Send + Debug {
    /// Poll for the next record.
    fn poll(&mut self) -> Result<Polled, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}

/// Choose the source for this run.
///
/// Tries the broker first when `use_broker` is set and broker support is
/// available; otherwise, or when connecting fails, opens the data file.
/// Returns the file error if the file is missing as well.
pub fn select_source(
    settings: &Settings,
    pace: Duration,
    use_broker: bool,
) -> Result<Box<dyn MessageSource>, SourceError> {
    if use_broker && BROKER_AVAILABLE {
        match connect_broker(settings) {
            Ok(source) => return Ok(source),
            Err(e) => warn!(
                "Kafka consumer error for {} ({}), falling back to file consumption",
                settings.kafka_server, e
            ),
        }
    } else if use_broker {
        warn!("Kafka not available, falling back to file consumption");
    } else {
        info!("Broker disabled, using file consumption");
    }

    match FileSource::open(&settings.data_file, pace) {
        Ok(source) => {
            info!("Reading messages from {}", settings.data_file.display());
            Ok(Box::new(source))
        }
        Err(e) => {
            error!("{}", e);
            Err(e)
        }
    }
}

#[cfg(feature = "kafka")]
fn connect_broker(settings: &Settings) -> Result<Box<dyn MessageSource>, SourceError> {
    Ok(Box::new(KafkaSource::connect(settings)?))
}

#[cfg(not(feature = "kafka"))]
fn connect_broker(_settings: &Settings) -> Result<Box<dyn MessageSource>, SourceError> {
    Err(SourceError::Connection(
        "built without the `kafka` feature".to_string(),
    ))
}
