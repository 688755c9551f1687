//! Recent message log for the activity panel and ingest rate.

use std::collections::VecDeque;
use std::time::Instant;

use crate::message::Message;

/// Maximum number of recent messages to keep.
const MAX_RECENT_SIZE: usize = 60;

/// A processed message as shown in the activity panel.
#[derive(Debug, Clone)]
pub struct RecentEntry {
    /// Sequence number (1-based) of the message since startup.
    pub sequence: u64,
    pub length: u64,
    pub summary: String,
    pub received_at: Instant,
}

/// Bounded window of recently processed messages.
#[derive(Debug, Clone, Default)]
pub struct RecentMessages {
    entries: VecDeque<RecentEntry>,
    sequence: u64,
}

impl RecentMessages {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message received now.
    pub fn record(&mut self, message: &Message) {
        self.record_at(message, Instant::now());
    }

    /// Record a message with an explicit arrival time.
    pub fn record_at(&mut self, message: &Message, received_at: Instant) {
        self.sequence += 1;
        self.entries.push_back(RecentEntry {
            sequence: self.sequence,
            length: message.message_length,
            summary: message.summary(),
            received_at,
        });
        if self.entries.len() > MAX_RECENT_SIZE {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest entries first.
    pub fn newest_first(&self) -> impl Iterator<Item = &RecentEntry> {
        self.entries.iter().rev()
    }

    /// Arrival time of the last message.
    pub fn last_received(&self) -> Option<Instant> {
        self.entries.back().map(|e| e.received_at)
    }

    /// Messages per second across the window.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn rate(&self) -> Option<f64> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = self.entries.front()?.received_at;
        let last = self.entries.back()?.received_at;
        let elapsed = last.duration_since(first).as_secs_f64();

        if elapsed > 0.0 {
            Some((self.entries.len() - 1) as f64 / elapsed)
        } else {
            None
        }
    }

    /// Recent lengths normalized to 0-7 for sparkline display, oldest first.
    pub fn length_sparkline(&self) -> Vec<u8> {
        let Some(max) = self.entries.iter().map(|e| e.length).max() else {
            return Vec::new();
        };
        let max = max.max(1) as f64;

        self.entries
            .iter()
            .map(|e| ((e.length as f64 / max * 7.0) as u8).min(7))
            .collect()
    }
}
