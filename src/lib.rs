//! # buzzwatch
//!
//! A live terminal histogram of message lengths.
//!
//! Messages are JSON objects read either from a Kafka topic or, as a
//! fallback, from a newline-delimited JSON replay file. Each message's
//! `message_length` field (zero when absent) is tallied into a histogram
//! that is redrawn as a bar chart after every message.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │ source  │───▶│   app    │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (input) │    │ (tally)  │    │(render) │    │         │ │
//! │  └─────────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       ▲                                                     │
//! │       └── KafkaSource | FileSource  (chosen once)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`MessageSource`] trait, file replay and Kafka
//!   consumption, and [`select_source`]
//! - **[`data`]**: the [`Histogram`] aggregator and the recent-message log
//! - **[`app`]**: drives the source one poll at a time and owns view state
//! - **[`ui`]**: ratatui rendering of the chart, table, and chrome
//!
//! Everything runs on one thread. A source error ends consumption; the
//! chart keeps its last state until the user quits.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Consume from Kafka if built with `--features kafka`, else replay the file
//! PROJECT_TOPIC=buzzline-topic KAFKA_SERVER=localhost:9092 buzzwatch
//!
//! # Replay a file quickly and write the histogram as JSON
//! buzzwatch --file data/project_live.json --pace 0 --export histogram.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::io::Cursor;
//! use std::time::Duration;
//! use buzzwatch::{App, LineSource, Theme};
//!
//! let data = "{\"message_length\": 1}\n{\"message_length\": 2}\n{\"message_length\": 2}\n";
//! let source = LineSource::new(Cursor::new(data), "inline", Duration::ZERO);
//! let mut app = App::with_theme(Box::new(source), Theme::dark());
//!
//! while app.is_consuming() {
//!     app.tick();
//! }
//! assert_eq!(app.histogram.count(2), 2);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod logging;
pub mod message;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, SourceStatus, View};
pub use config::Settings;
pub use data::{Histogram, RecentMessages};
pub use error::{ErrorKind, SourceError};
pub use message::Message;
pub use source::{select_source, FileSource, LineSource, MessageSource, Polled};
pub use ui::Theme;
