//! Error types for message sources.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a consumption loop.
///
/// Every variant is terminal for the source that produced it: the app logs
/// it, stops polling, and keeps the chart as it stands.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing data file does not exist.
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Broker connection or client failure.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Reading from the underlying stream failed.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be decoded as a message.
    #[error("Malformed record at {location}: {reason}")]
    Malformed { location: String, reason: String },
}

/// Coarse classification of [`SourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing file, broker unreachable, or stream failure.
    Unavailable,
    /// JSON decode failure on a single record.
    MalformedRecord,
}

impl ErrorKind {
    /// Short label used as a prefix in logs and the status bar.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Unavailable => "source unavailable",
            ErrorKind::MalformedRecord => "malformed record",
        }
    }
}

impl SourceError {
    /// Build a malformed-record error.
    pub fn malformed(location: impl Into<String>, reason: impl ToString) -> Self {
        SourceError::Malformed {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify this error for logs and the status bar.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::NotFound(_) | SourceError::Connection(_) | SourceError::Io(_) => {
                ErrorKind::Unavailable
            }
            SourceError::Malformed { .. } => ErrorKind::MalformedRecord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_split() {
        assert_eq!(
            SourceError::NotFound(PathBuf::from("data/x.json")).kind(),
            ErrorKind::Unavailable
        );
        assert_eq!(
            SourceError::Connection("refused".into()).kind(),
            ErrorKind::Unavailable
        );
        assert_eq!(
            SourceError::malformed("line 3", "expected value").kind(),
            ErrorKind::MalformedRecord
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ErrorKind::Unavailable.label(), "source unavailable");
        assert_eq!(ErrorKind::MalformedRecord.label(), "malformed record");
    }

    #[test]
    fn test_display_includes_context() {
        let err = SourceError::NotFound(PathBuf::from("data/project_live.json"));
        assert_eq!(err.to_string(), "Data file not found: data/project_live.json");

        let err = SourceError::malformed("line 7", "EOF while parsing");
        assert_eq!(err.to_string(), "Malformed record at line 7: EOF while parsing");
    }
}
