//! Data models for consumed messages.
//!
//! ## Submodules
//!
//! - [`histogram`]: The message-length frequency distribution ([`Histogram`])
//! - [`recent`]: Bounded log of recent messages and the ingest rate
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "1s", "500ms")
//!
//! ## Data Flow
//!
//! ```text
//! Message (one JSON record)
//!        │
//!        ├──▶ Histogram::record_message()   (bar chart, table)
//!        │
//!        └──▶ RecentMessages::record()      (activity panel, rate)
//! ```

pub mod duration;
pub mod histogram;
pub mod recent;

pub use histogram::Histogram;
pub use recent::{RecentEntry, RecentMessages};
