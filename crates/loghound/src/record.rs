//! Record — raw blocks and their normalized, de-identified form.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// A contiguous run of raw log lines judged to represent one occurrence of a
/// crash/anomaly, plus the index of the catalog signature that claimed it.
#[derive(Debug, Clone)]
pub struct Block {
    pub lines: Vec<String>,
    pub signature: usize,
}

/// The normalized result of processing one [`Block`].
///
/// Identity is the normalized text alone: two records compare (and hash)
/// equal iff their `text` is equal, regardless of timestamp or fields. This
/// is what lets the same crash at different times/PIDs collapse into one
/// aggregation key.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Timestamp-stripped, redacted block text — the record's identity.
    pub text: String,
    /// Timestamp of the occurrence; `None` when the log-line shape was not
    /// recognized. Used only for counting distinct occurrences.
    pub timestamp: Option<String>,
    /// Extracted fields (process name, exception name, ...). Not part of
    /// identity.
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn proc_name(&self) -> Option<&str> {
        self.field("proc_name")
    }

    pub fn ex_name(&self) -> Option<&str> {
        self.field("ex_name")
    }

    pub fn ex_desc(&self) -> Option<&str> {
        self.field("ex_desc")
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(text: &str, timestamp: Option<&str>, proc: Option<&str>) -> Record {
        let mut fields = BTreeMap::new();
        if let Some(proc) = proc {
            fields.insert("proc_name".to_string(), proc.to_string());
        }
        Record {
            text: text.to_string(),
            timestamp: timestamp.map(str::to_string),
            fields,
        }
    }

    #[test]
    fn test_identity_ignores_timestamp_and_fields() {
        let a = record("same text", Some("01-01 00:00:00.000"), Some("com.a"));
        let b = record("same text", Some("01-02 11:11:11.111"), Some("com.b"));
        let c = record("other text", Some("01-01 00:00:00.000"), Some("com.a"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hash_follows_identity() {
        let a = record("same text", Some("01-01 00:00:00.000"), None);
        let b = record("same text", None, Some("com.b"));

        let mut map = HashMap::new();
        map.insert(a, 1u32);
        // Same identity — must land on the same bucket entry.
        assert!(map.contains_key(&b));
    }

    #[test]
    fn test_field_accessors() {
        let r = record("t", None, Some("com.example.app"));
        assert_eq!(r.proc_name(), Some("com.example.app"));
        assert_eq!(r.ex_name(), None);
    }
}
