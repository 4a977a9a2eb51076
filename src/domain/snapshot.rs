//! Metric snapshots and input validation
//!
//! A snapshot is an insertion-ordered mapping of metric name to value plus a
//! mandatory `timestamp` entry (seconds since the Unix epoch).

use super::value::MetricValue;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Key holding the sample time in a snapshot
pub const TIMESTAMP_KEY: &str = "timestamp";

/// One sample of system metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSnapshot {
    entries: Vec<(String, MetricValue)>,
}

impl MetricSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, keeping the original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a reading by key
    pub fn value(&self, key: &str) -> Option<MetricValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// Look up a value by key as a plain number
    pub fn get(&self, key: &str) -> Option<f64> {
        self.value(key).map(MetricValue::as_f64)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Sample time, if present
    pub fn timestamp(&self) -> Option<f64> {
        self.get(TIMESTAMP_KEY)
    }

    /// Entries in insertion order, including the timestamp
    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Metric entries in insertion order, excluding the timestamp
    pub fn metrics(&self) -> impl Iterator<Item = (&str, MetricValue)> {
        self.iter().filter(|(k, _)| *k != TIMESTAMP_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<MetricValue>> FromIterator<(K, V)> for MetricSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.insert(key, value);
        }
        snapshot
    }
}

impl Serialize for MetricSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = MetricSnapshot;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of metric names to numeric values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut snapshot = MetricSnapshot::new();
        while let Some((key, value)) = access.next_entry::<String, MetricValue>()? {
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }
}

impl<'de> Deserialize<'de> for MetricSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// Checks that a snapshot carries every required key
pub struct MetricsValidator;

impl MetricsValidator {
    /// Keys every snapshot must contain
    pub const REQUIRED_KEYS: [&'static str; 5] = ["cpu", "memory", "disk", "network", TIMESTAMP_KEY];

    /// Validate a snapshot, returning every problem found (empty if valid)
    pub fn validate(snapshot: &MetricSnapshot) -> Vec<String> {
        if snapshot.is_empty() {
            return vec!["Invalid metrics format".to_string()];
        }

        Self::REQUIRED_KEYS
            .iter()
            .filter(|key| !snapshot.contains_key(key))
            .map(|key| format!("Missing required key: {}", key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_snapshot() -> MetricSnapshot {
        MetricSnapshot::new()
            .with("cpu", 50.0)
            .with("memory", 60.0)
            .with("disk", 70.0)
            .with("network", 40.0)
            .with(TIMESTAMP_KEY, 1_700_000_000.0)
    }

    #[test]
    fn test_valid_metrics() {
        assert!(MetricsValidator::validate(&full_snapshot()).is_empty());
    }

    #[test]
    fn test_empty_snapshot_is_invalid_format() {
        let errors = MetricsValidator::validate(&MetricSnapshot::new());
        assert_eq!(errors, vec!["Invalid metrics format".to_string()]);
    }

    #[test]
    fn test_missing_keys_reported_independently() {
        let snapshot = MetricSnapshot::new().with("cpu", 50.0);
        let errors = MetricsValidator::validate(&snapshot);
        assert_eq!(
            errors,
            vec![
                "Missing required key: memory",
                "Missing required key: disk",
                "Missing required key: network",
                "Missing required key: timestamp",
            ]
        );
    }

    #[test]
    fn test_extra_keys_are_not_errors() {
        let snapshot = full_snapshot().with("gpu", 99.0);
        assert!(MetricsValidator::validate(&snapshot).is_empty());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut snapshot = full_snapshot();
        snapshot.insert("cpu", 95.0);
        assert_eq!(snapshot.get("cpu"), Some(95.0));
        assert_eq!(snapshot.iter().next(), Some(("cpu", MetricValue::Float(95.0))));
        assert_eq!(snapshot.len(), 5);
    }

    #[test]
    fn test_metrics_skip_timestamp() {
        let snapshot = full_snapshot();
        let names: Vec<&str> = snapshot.metrics().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["cpu", "memory", "disk", "network"]);
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let json = r#"{"network": 10, "cpu": 85.5, "timestamp": 1700000000, "memory": 1, "disk": 2}"#;
        let snapshot: MetricSnapshot = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["network", "cpu", "timestamp", "memory", "disk"]);
        assert_eq!(snapshot.get("cpu"), Some(85.5));
        assert_eq!(snapshot.timestamp(), Some(1_700_000_000.0));
        assert_eq!(snapshot.value("network"), Some(MetricValue::Int(10)));
        assert_eq!(snapshot.value("cpu"), Some(MetricValue::Float(85.5)));
    }

    #[test]
    fn test_collect_from_pairs() {
        let snapshot: MetricSnapshot = [("cpu", 91_i64), ("cpu", 93_i64)].into_iter().collect();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.value("cpu"), Some(MetricValue::Int(93)));
    }

    #[test]
    fn test_deserialize_rejects_non_numeric() {
        let result: Result<MetricSnapshot, _> = serde_json::from_str(r#"{"cpu": "high"}"#);
        assert!(result.is_err());
    }
}
