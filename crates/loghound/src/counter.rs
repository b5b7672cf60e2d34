//! Counter — deduplicating tally of normalized records.
//!
//! Keyed by record identity (normalized text); counts distinct timestamps
//! per identity, so an exact re-scan of the same occurrence counts once
//! while repeats of the same crash at new times each count.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use crate::record::Record;

#[derive(Debug, Default)]
pub struct Counter {
    /// First-seen record per identity, in discovery order.
    order: Vec<Record>,
    /// Distinct timestamps observed per identity. `None` (unknown timestamp)
    /// is one distinct value, so shape-less records still count once.
    stamps: HashMap<Record, BTreeSet<Option<String>>>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, record: Record) {
        let stamp = record.timestamp.clone();
        match self.stamps.entry(record) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().insert(stamp);
            }
            Entry::Vacant(entry) => {
                self.order.push(entry.key().clone());
                entry.insert(BTreeSet::from([stamp]));
            }
        }
    }

    /// Per-identity occurrence counts in discovery order. Repeatable; does
    /// not mutate the tally.
    pub fn result(&self) -> Vec<(&Record, usize)> {
        self.order
            .iter()
            .map(|record| (record, self.stamps[record].len()))
            .collect()
    }

    /// Consume the tally into owned `(record, count)` pairs.
    pub fn into_result(mut self) -> Vec<(Record, usize)> {
        self.order
            .drain(..)
            .map(|record| {
                let count = self.stamps[&record].len();
                (record, count)
            })
            .collect()
    }

    /// Reset for reuse across scanning sessions.
    pub fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(text: &str, timestamp: Option<&str>) -> Record {
        Record {
            text: text.to_string(),
            timestamp: timestamp.map(str::to_string),
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn test_distinct_timestamps_counted() {
        let mut counter = Counter::new();
        counter.put(record("text1", Some("01-01 00:00:00.000")));
        counter.put(record("text2", Some("01-01 00:00:00.001")));
        counter.put(record("text2", Some("01-01 00:00:00.002")));

        let result = counter.result();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].1, 1);
        assert_eq!(result[1].1, 2);
    }

    #[test]
    fn test_duplicate_timestamp_counts_once() {
        let mut counter = Counter::new();
        for _ in 0..3 {
            counter.put(record("same", Some("01-01 00:00:00.000")));
        }
        assert_eq!(counter.result()[0].1, 1);
    }

    #[test]
    fn test_unknown_timestamp_counts_at_least_once() {
        let mut counter = Counter::new();
        counter.put(record("same", None));
        counter.put(record("same", None));
        counter.put(record("same", Some("01-01 00:00:00.000")));
        // None collapses to one distinct value alongside the known stamp.
        assert_eq!(counter.result()[0].1, 2);
    }

    #[test]
    fn test_result_is_repeatable() {
        let mut counter = Counter::new();
        counter.put(record("text", Some("a")));
        assert_eq!(counter.result(), counter.result());
        assert_eq!(counter.len(), 1);
    }

    #[test]
    fn test_discovery_order_preserved() {
        let mut counter = Counter::new();
        counter.put(record("c", Some("1")));
        counter.put(record("a", Some("1")));
        counter.put(record("b", Some("1")));
        counter.put(record("a", Some("2")));

        let texts: Vec<&str> = counter.result().iter().map(|(r, _)| r.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_clear_resets() {
        let mut counter = Counter::new();
        counter.put(record("text", Some("a")));
        counter.clear();
        assert!(counter.is_empty());
        assert!(counter.result().is_empty());

        counter.put(record("text", Some("b")));
        assert_eq!(counter.len(), 1);
    }

    #[test]
    fn test_into_result_counts_match() {
        let mut counter = Counter::new();
        counter.put(record("x", Some("1")));
        counter.put(record("x", Some("2")));
        let owned = counter.into_result();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].1, 2);
    }
}
