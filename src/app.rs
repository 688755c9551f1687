//! Application state: consumption, aggregation, and navigation.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{error, info};

use crate::data::{Histogram, RecentMessages};
use crate::error::SourceError;
use crate::message::Message;
use crate::source::{MessageSource, Polled};
use crate::ui::table::SortColumn;
use crate::ui::Theme;

/// How long a temporary status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Bar chart of counts per message length.
    Chart,
    /// Table of lengths with counts and share.
    Table,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Chart => View::Table,
            View::Table => View::Chart,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views: previous and next coincide
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Chart => "Chart",
            View::Table => "Table",
        }
    }
}

/// State of the consumption loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// Still polling the source.
    Consuming,
    /// The source ran out of records.
    Exhausted,
    /// The loop ended on an error (or never started).
    Failed(String),
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Option<Box<dyn MessageSource>>,
    source_description: String,
    pub status: SourceStatus,

    // Aggregates
    pub histogram: Histogram,
    pub recent: RecentMessages,
    /// Number of chart updates triggered by processed messages.
    pub chart_updates: u64,

    // Table view
    pub selected_row: usize,
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App consuming from the given source.
    pub fn new(source: Box<dyn MessageSource>) -> Self {
        Self::with_theme(source, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(source: Box<dyn MessageSource>, theme: Theme) -> Self {
        let description = source.description().to_string();
        Self::build(Some(source), description, SourceStatus::Consuming, theme)
    }

    /// Create an App for a run where no source could be opened.
    ///
    /// The chart stays empty and the error is shown in the status bar.
    pub fn unavailable(err: &SourceError, theme: Theme) -> Self {
        Self::build(
            None,
            "no source".to_string(),
            SourceStatus::Failed(format!("{}: {}", err.kind().label(), err)),
            theme,
        )
    }

    fn build(
        source: Option<Box<dyn MessageSource>>,
        source_description: String,
        status: SourceStatus,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Chart,
            show_help: false,
            source,
            source_description,
            status,
            histogram: Histogram::new(),
            recent: RecentMessages::new(),
            chart_updates: 0,
            selected_row: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Whether the source is still being polled.
    pub fn is_consuming(&self) -> bool {
        self.source.is_some()
    }

    /// Poll the source once.
    ///
    /// Returns true if a message was processed and the chart needs a redraw.
    /// An exhausted or failed source is dropped; the aggregates are kept.
    pub fn tick(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };

        match source.poll() {
            Ok(Polled::Ready(message)) => {
                self.process_message(message);
                true
            }
            Ok(Polled::Idle) => false,
            Ok(Polled::Exhausted) => {
                info!(
                    "Source {} exhausted after {} messages",
                    self.source_description,
                    self.histogram.total()
                );
                self.status = SourceStatus::Exhausted;
                self.source = None;
                false
            }
            Err(e) => {
                let label = e.kind().label();
                error!("{} while consuming from {}: {}", label, self.source_description, e);
                self.status = SourceStatus::Failed(format!("{}: {}", label, e));
                self.source = None;
                false
            }
        }
    }

    /// Fold one message into the histogram and request a redraw.
    pub fn process_message(&mut self, message: Message) {
        info!("Processing message: {}", message.summary());
        self.histogram.record_message(&message);
        self.recent.record(&message);
        self.chart_updates += 1;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move table selection down by n rows.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.histogram.distinct().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
    }

    /// Move table selection up by n rows.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_row = self.histogram.distinct().saturating_sub(1);
    }

    /// Cycle to the next sort column for the table.
    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Buckets in table order.
    pub fn sorted_buckets(&self) -> Vec<(u64, u64)> {
        let mut buckets: Vec<(u64, u64)> = self.histogram.buckets().collect();
        crate::ui::table::sort_buckets_by(&mut buckets, self.sort_column, self.sort_ascending);
        buckets
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Histogram state as JSON.
    pub fn export_json(&self) -> serde_json::Value {
        let status = match &self.status {
            SourceStatus::Consuming => "consuming".to_string(),
            SourceStatus::Exhausted => "exhausted".to_string(),
            SourceStatus::Failed(err) => format!("failed: {}", err),
        };

        let buckets: Vec<serde_json::Value> = self
            .histogram
            .buckets()
            .map(|(length, count)| serde_json::json!({ "message_length": length, "count": count }))
            .collect();

        serde_json::json!({
            "source": self.source_description,
            "status": status,
            "summary": {
                "total_messages": self.histogram.total(),
                "distinct_lengths": self.histogram.distinct(),
                "mean_length": self.histogram.mean(),
                "mode_length": self.histogram.mode(),
            },
            "buckets": buckets,
        })
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.export_json())?;
        std::fs::write(path, json)?;
        info!("Exported histogram to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LineSource;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn app_for(data: &'static str) -> App {
        let source = LineSource::new(Cursor::new(data), "test", Duration::ZERO);
        App::with_theme(Box::new(source), Theme::dark())
    }

    fn run_to_end(app: &mut App) {
        while app.is_consuming() {
            app.tick();
        }
    }

    #[test]
    fn test_counts_match_processed_messages() {
        let mut app = app_for(
            "{\"message_length\": 1}\n{\"message_length\": 2}\n{\"message_length\": 2}\n",
        );
        run_to_end(&mut app);

        assert_eq!(app.status, SourceStatus::Exhausted);
        assert_eq!(app.histogram.buckets().collect::<Vec<_>>(), vec![(1, 1), (2, 2)]);
        assert_eq!(app.chart_updates, 3);
        assert_eq!(app.recent.len(), 3);
    }

    #[test]
    fn test_malformed_record_stops_loop() {
        let mut app = app_for("{\"message_length\": 1}\n{oops\n{\"message_length\": 5}\n");
        run_to_end(&mut app);

        // The record after the bad line is never read
        assert!(matches!(
            app.status,
            SourceStatus::Failed(ref e) if e.starts_with("malformed record:") && e.contains("line 2")
        ));
        assert_eq!(app.histogram.total(), 1);
        assert_eq!(app.histogram.count(5), 0);
        assert!(!app.tick());
    }

    #[test]
    fn test_unavailable_performs_no_updates() {
        let err = SourceError::NotFound(PathBuf::from("data/project_live.json"));
        let mut app = App::unavailable(&err, Theme::dark());

        assert!(!app.is_consuming());
        assert!(!app.tick());
        assert_eq!(app.chart_updates, 0);
        assert!(app.histogram.is_empty());
        assert!(matches!(
            app.status,
            SourceStatus::Failed(ref e) if e.starts_with("source unavailable:") && e.contains("not found")
        ));
    }

    #[test]
    fn test_same_message_twice_counts_twice() {
        let mut app = app_for("");
        let message = Message::with_length(9);
        app.process_message(message.clone());
        app.process_message(message);
        assert_eq!(app.histogram.count(9), 2);
    }

    #[test]
    fn test_view_cycle() {
        let mut app = app_for("");
        assert_eq!(app.current_view, View::Chart);
        app.next_view();
        assert_eq!(app.current_view, View::Table);
        app.prev_view();
        assert_eq!(app.current_view, View::Chart);
    }

    #[test]
    fn test_selection_clamped_to_buckets() {
        let mut app = app_for("");
        for length in [3, 1, 2] {
            app.process_message(Message::with_length(length));
        }

        app.select_next_n(10);
        assert_eq!(app.selected_row, 2);
        app.select_prev_n(1);
        assert_eq!(app.selected_row, 1);
        app.select_first();
        assert_eq!(app.selected_row, 0);
        app.select_last();
        assert_eq!(app.selected_row, 2);
    }

    #[test]
    fn test_sorted_buckets_by_count_descending() {
        let mut app = app_for("");
        for length in [4, 7, 7, 7, 2, 2] {
            app.process_message(Message::with_length(length));
        }

        app.cycle_sort();
        app.toggle_sort_direction();
        assert_eq!(app.sort_column, SortColumn::Count);
        assert_eq!(app.sorted_buckets(), vec![(7, 3), (2, 2), (4, 1)]);
    }

    #[test]
    fn test_export_state() {
        let mut app = app_for("{\"message_length\": 3}\n{}\n");
        run_to_end(&mut app);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["status"], "exhausted");
        assert_eq!(value["summary"]["total_messages"], 2);
        assert_eq!(value["buckets"][0]["message_length"], 0);
        assert_eq!(value["buckets"][1]["count"], 1);
    }

    #[test]
    fn test_status_message_visible() {
        let mut app = app_for("");
        assert!(app.get_status_message().is_none());
        app.set_status_message("Exported".to_string());
        assert_eq!(app.get_status_message(), Some("Exported"));
    }
}
