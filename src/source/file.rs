//! File-based data source.
//!
//! Replays newline-delimited JSON records, one record per pacing interval.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::{MessageSource, Polled};
use crate::error::SourceError;
use crate::message::Message;

/// A data source that reads one JSON record per line from any buffered
/// reader.
///
/// After each record, the next one is held back until `pace` has elapsed,
/// so a replay file plays at roughly the rate it was produced. Every line
/// is a record: a line that does not decode (blank, invalid JSON, or not
/// UTF-8) is a malformed-record error that ends the replay.
pub struct LineSource<R> {
    reader: R,
    origin: String,
    description: String,
    pace: Duration,
    next_due: Option<Instant>,
    line_number: usize,
    exhausted: bool,
    buf: Vec<u8>,
}

/// Replay source backed by a file on disk.
pub type FileSource = LineSource<BufReader<File>>;

impl<R: BufRead> LineSource<R> {
    /// Create a source over the given reader.
    ///
    /// `origin` names the input in error messages and the TUI header.
    pub fn new(reader: R, origin: &str, pace: Duration) -> Self {
        Self {
            reader,
            origin: origin.to_string(),
            description: format!("file: {}", origin),
            pace,
            next_due: None,
            line_number: 0,
            exhausted: false,
            buf: Vec::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read and decode the next line.
    fn next_record(&mut self) -> Result<Option<Message>, SourceError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        Message::from_slice(self.buf.trim_ascii()).map(Some).map_err(|e| {
            SourceError::malformed(format!("{} line {}", self.origin, self.line_number), e)
        })
    }
}

impl FileSource {
    /// Open the replay file at `path`.
    ///
    /// Fails with [`SourceError::NotFound`] if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P, pace: Duration) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            _ => SourceError::Io(e),
        })?;

        Ok(Self::new(
            BufReader::new(file),
            &path.display().to_string(),
            pace,
        ))
    }
}

impl<R: BufRead + Send> MessageSource for LineSource<R> {
    fn poll(&mut self) -> Result<Polled, SourceError> {
        if self.exhausted {
            return Ok(Polled::Exhausted);
        }

        if let Some(due) = self.next_due {
            if Instant::now() < due {
                return Ok(Polled::Idle);
            }
        }

        match self.next_record()? {
            Some(message) => {
                debug!("Read from {} line {}", self.origin, self.line_number);
                self.next_due = Some(Instant::now() + self.pace);
                Ok(Polled::Ready(message))
            }
            None => {
                info!(
                    "Reached end of {} after {} lines",
                    self.origin, self.line_number
                );
                self.exhausted = true;
                Ok(Polled::Exhausted)
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<R> fmt::Debug for LineSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSource")
            .field("origin", &self.origin)
            .field("pace", &self.pace)
            .field("line_number", &self.line_number)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn sample_lines() -> &'static str {
        concat!(
            r#"{"message": "a", "author": "Alice", "message_length": 1}"#,
            "\n",
            r#"{"message": "bb", "author": "Bob", "message_length": 2}"#,
            "\n",
            r#"{"message": "bb", "author": "Bob", "message_length": 2}"#,
            "\n",
        )
    }

    fn drain(source: &mut impl MessageSource) -> Result<Vec<u64>, SourceError> {
        let mut lengths = Vec::new();
        loop {
            match source.poll()? {
                Polled::Ready(message) => lengths.push(message.message_length),
                Polled::Idle => continue,
                Polled::Exhausted => return Ok(lengths),
            }
        }
    }

    #[test]
    fn test_reads_each_line() {
        let mut source = LineSource::new(Cursor::new(sample_lines()), "test", Duration::ZERO);
        assert_eq!(drain(&mut source).unwrap(), vec![1, 2, 2]);
        assert_eq!(source.line_number(), 3);

        // Stays exhausted
        assert_eq!(source.poll().unwrap(), Polled::Exhausted);
    }

    #[test]
    fn test_blank_line_ends_replay() {
        let data = "{\"message_length\": 1}\n\n{\"message_length\": 2}\n";
        let mut source = LineSource::new(Cursor::new(data), "replay.json", Duration::ZERO);

        assert_eq!(
            source.poll().unwrap(),
            Polled::Ready(Message::with_length(1))
        );
        let err = source.poll().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(err.to_string().contains("replay.json line 2"));
        assert_eq!(source.line_number(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut data = b"{\"message_length\": 1}\n".to_vec();
        data.extend_from_slice(b"{\"message\": \"\xff\"}\n");
        let mut source = LineSource::new(Cursor::new(data), "replay.json", Duration::ZERO);

        assert!(matches!(source.poll().unwrap(), Polled::Ready(_)));
        let err = source.poll().unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = "{\"message_length\": 4}\r\n{\"message_length\": 5}";
        let mut source = LineSource::new(Cursor::new(data), "test", Duration::ZERO);
        assert_eq!(drain(&mut source).unwrap(), vec![4, 5]);
    }

    #[test]
    fn test_paces_between_records() {
        let mut source =
            LineSource::new(Cursor::new(sample_lines()), "test", Duration::from_secs(3600));

        // First record is immediate, the next one waits for the pace interval
        assert!(matches!(source.poll().unwrap(), Polled::Ready(_)));
        assert_eq!(source.poll().unwrap(), Polled::Idle);
        assert_eq!(source.poll().unwrap(), Polled::Idle);
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let data = "{\"message_length\": 1}\nnot valid json\n{\"message_length\": 2}\n";
        let mut source = LineSource::new(Cursor::new(data), "replay.json", Duration::ZERO);

        assert!(matches!(source.poll().unwrap(), Polled::Ready(_)));
        let err = source.poll().unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
        assert!(err.to_string().contains("replay.json line 2"));
    }

    #[test]
    fn test_file_source_open() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_lines()).unwrap();

        let mut source = FileSource::open(file.path(), Duration::ZERO).unwrap();
        assert_eq!(
            source.description(),
            format!("file: {}", file.path().display())
        );
        assert_eq!(drain(&mut source).unwrap(), vec![1, 2, 2]);
    }

    #[test]
    fn test_file_source_missing_file() {
        let err = FileSource::open("/nonexistent/path/project_live.json", Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_empty_file_is_exhausted() {
        let file = NamedTempFile::new().unwrap();
        let mut source = FileSource::open(file.path(), Duration::ZERO).unwrap();
        assert_eq!(source.poll().unwrap(), Polled::Exhausted);
    }
}
