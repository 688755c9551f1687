//! Runtime settings read from the environment.
//!
//! | Variable         | Default                  |
//! |------------------|--------------------------|
//! | `PROJECT_TOPIC`  | `buzzline-topic`         |
//! | `KAFKA_SERVER`   | `localhost:9092`         |
//! | `KAFKA_GROUP_ID` | `buzzwatch`              |
//! | `DATA_FILE`      | `data/project_live.json` |

use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, Map};
use serde::Deserialize;

pub const DEFAULT_TOPIC: &str = "buzzline-topic";
pub const DEFAULT_SERVER: &str = "localhost:9092";
pub const DEFAULT_GROUP_ID: &str = "buzzwatch";
pub const DEFAULT_DATA_FILE: &str = "data/project_live.json";

/// Connection and input settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Kafka topic to subscribe to.
    pub project_topic: String,
    /// Kafka bootstrap server address.
    pub kafka_server: String,
    /// Consumer group used for the subscription.
    pub kafka_group_id: String,
    /// Newline-delimited JSON file replayed in file mode.
    pub data_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_topic: DEFAULT_TOPIC.to_string(),
            kafka_server: DEFAULT_SERVER.to_string(),
            kafka_group_id: DEFAULT_GROUP_ID.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_map(vars: Map<String, String>) -> Result<Self> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<Map<String, String>>) -> Result<Self> {
        let config = Config::builder()
            .set_default("project_topic", DEFAULT_TOPIC)?
            .set_default("kafka_server", DEFAULT_SERVER)?
            .set_default("kafka_group_id", DEFAULT_GROUP_ID)?
            .set_default("data_file", DEFAULT_DATA_FILE)?
            .add_source(Environment::default().source(vars))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_map(Map::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.project_topic, "buzzline-topic");
        assert_eq!(settings.kafka_server, "localhost:9092");
        assert_eq!(settings.data_file, PathBuf::from("data/project_live.json"));
    }

    #[test]
    fn test_overrides_from_environment() {
        let settings = Settings::from_map(vars(&[
            ("PROJECT_TOPIC", "lengths"),
            ("KAFKA_SERVER", "broker:29092"),
            ("DATA_FILE", "/tmp/replay.json"),
        ]))
        .unwrap();

        assert_eq!(settings.project_topic, "lengths");
        assert_eq!(settings.kafka_server, "broker:29092");
        assert_eq!(settings.kafka_group_id, DEFAULT_GROUP_ID);
        assert_eq!(settings.data_file, PathBuf::from("/tmp/replay.json"));
    }

    #[test]
    fn test_unrelated_variables_ignored() {
        let settings = Settings::from_map(vars(&[("HOME", "/root"), ("TERM", "xterm")])).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
