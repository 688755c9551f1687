//! Frequency distribution of message lengths.

use std::collections::BTreeMap;

use crate::message::Message;

/// Message-length histogram.
///
/// Maps each observed length to the number of messages with that length,
/// and keeps the ordered list of samples alongside it. Counts only ever
/// grow; there is no deduplication, so recording the same message twice
/// adds two to its bucket.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    counts: BTreeMap<u64, u64>,
    samples: Vec<u64>,
}

impl Histogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed length.
    pub fn record(&mut self, length: u64) {
        self.samples.push(length);
        *self.counts.entry(length).or_insert(0) += 1;
    }

    /// Record the length carried by a message.
    pub fn record_message(&mut self, message: &Message) {
        self.record(message.message_length);
    }

    /// Count for a single length (zero if never seen).
    pub fn count(&self, length: u64) -> u64 {
        self.counts.get(&length).copied().unwrap_or(0)
    }

    /// Total number of recorded messages.
    pub fn total(&self) -> u64 {
        self.samples.len() as u64
    }

    /// Number of distinct lengths.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in arrival order.
    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    /// `(length, count)` pairs sorted by length.
    pub fn buckets(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&length, &count)| (length, count))
    }

    /// Largest bucket count, zero when empty.
    pub fn max_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Most frequent length. Ties resolve to the smallest length.
    pub fn mode(&self) -> Option<u64> {
        let max = self.max_count();
        self.buckets().find(|&(_, count)| count == max && max > 0).map(|(length, _)| length)
    }

    /// Mean length over all samples.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u128 = self.samples.iter().map(|&s| s as u128).sum();
        Some(sum as f64 / self.samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let hist = Histogram::new();
        assert!(hist.is_empty());
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.distinct(), 0);
        assert_eq!(hist.max_count(), 0);
        assert!(hist.mode().is_none());
        assert!(hist.mean().is_none());
    }

    #[test]
    fn test_lengths_one_two_two() {
        let mut hist = Histogram::new();
        let lines = [
            r#"{"message": "a", "message_length": 1}"#,
            r#"{"message": "bb", "message_length": 2}"#,
            r#"{"message": "bb", "message_length": 2}"#,
        ];
        for line in lines {
            hist.record_message(&Message::parse(line).unwrap());
        }

        let buckets: Vec<_> = hist.buckets().collect();
        assert_eq!(buckets, vec![(1, 1), (2, 2)]);
        assert_eq!(hist.samples(), &[1, 2, 2]);
        assert_eq!(hist.mode(), Some(2));
    }

    #[test]
    fn test_missing_length_counts_as_zero() {
        let mut hist = Histogram::new();
        hist.record_message(&Message::parse(r#"{"author": "Eve"}"#).unwrap());
        assert_eq!(hist.count(0), 1);
    }

    #[test]
    fn test_no_deduplication() {
        let mut hist = Histogram::new();
        let message = Message::with_length(17);
        hist.record_message(&message);
        hist.record_message(&message);
        assert_eq!(hist.count(17), 2);
    }

    #[test]
    fn test_count_sum_matches_total() {
        let mut hist = Histogram::new();
        let lengths = [5, 3, 5, 9, 0, 3, 5, 12, 12, 1];
        for length in lengths {
            hist.record(length);
        }

        let sum: u64 = hist.buckets().map(|(_, count)| count).sum();
        assert_eq!(sum, lengths.len() as u64);
        assert_eq!(hist.total(), lengths.len() as u64);
        assert_eq!(hist.distinct(), 6);
    }

    #[test]
    fn test_buckets_sorted_by_length() {
        let mut hist = Histogram::new();
        for length in [40, 2, 17, 2] {
            hist.record(length);
        }
        let keys: Vec<u64> = hist.buckets().map(|(length, _)| length).collect();
        assert_eq!(keys, vec![2, 17, 40]);
    }

    #[test]
    fn test_mode_tie_takes_smallest() {
        let mut hist = Histogram::new();
        for length in [9, 4, 9, 4] {
            hist.record(length);
        }
        assert_eq!(hist.mode(), Some(4));
        assert_eq!(hist.mean(), Some(6.5));
    }
}
