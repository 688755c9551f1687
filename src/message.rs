//! Message records consumed from the broker or the replay file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Longest summary shown in the recent-message panel.
const SUMMARY_MAX_CHARS: usize = 96;

/// A single JSON message.
///
/// Only `message_length` is interpreted; it defaults to zero when absent.
/// All other fields are kept as-is so they can be shown in the log panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_length: u64,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Message {
    /// Create a message carrying only a length.
    pub fn with_length(message_length: u64) -> Self {
        Self {
            message_length,
            fields: Map::new(),
        }
    }

    /// Decode a message from a line of text.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim())
    }

    /// Decode a message from a raw payload (must be UTF-8 JSON).
    pub fn from_slice(payload: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(payload)
    }

    /// One-line rendering for display, truncated to a fixed width.
    pub fn summary(&self) -> String {
        let rest = if let Some(Value::String(text)) = self.fields.get("message") {
            text.clone()
        } else {
            Value::Object(self.fields.clone()).to_string()
        };
        let line = format!("len={} {}", self.message_length, rest);

        if line.chars().count() > SUMMARY_MAX_CHARS {
            let mut truncated: String = line.chars().take(SUMMARY_MAX_CHARS - 1).collect();
            truncated.push('…');
            truncated
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = r#"{
            "message": "I just shared a meme! It was amazing.",
            "author": "Alice",
            "timestamp": "2025-01-29 14:35:20",
            "category": "humor",
            "sentiment": 0.87,
            "keyword_mentioned": "meme",
            "message_length": 42
        }"#;

        let message = Message::parse(json).unwrap();
        assert_eq!(message.message_length, 42);
        assert_eq!(message.fields.get("author"), Some(&Value::from("Alice")));
        assert!(!message.fields.contains_key("message_length"));
    }

    #[test]
    fn test_missing_length_defaults_to_zero() {
        let message = Message::parse(r#"{"author": "Bob"}"#).unwrap();
        assert_eq!(message.message_length, 0);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(Message::parse("5").is_err());
        assert!(Message::parse("[1, 2]").is_err());
        assert!(Message::parse("not json").is_err());
    }

    #[test]
    fn test_rejects_non_integer_length() {
        assert!(Message::parse(r#"{"message_length": "long"}"#).is_err());
        assert!(Message::parse(r#"{"message_length": -3}"#).is_err());
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        assert!(Message::from_slice(&[0x7b, 0xff, 0xfe, 0x7d]).is_err());
        let message = Message::from_slice(br#"{"message_length": 7}"#).unwrap();
        assert_eq!(message.message_length, 7);
    }

    #[test]
    fn test_summary_prefers_message_text() {
        let message = Message::parse(r#"{"message": "hello", "message_length": 5}"#).unwrap();
        assert_eq!(message.summary(), "len=5 hello");
    }

    #[test]
    fn test_summary_truncates() {
        let text = "x".repeat(500);
        let message = Message::parse(&format!(r#"{{"message": "{}"}}"#, text)).unwrap();
        let summary = message.summary();
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(summary.ends_with('…'));
    }
}
