//! The node snapshot as published by the crawler.
//!
//! Each node is encoded as a fixed-position JSON array rather than an object, so
//! `RawNodeRecord` goes through a tuple on the way in and out.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ProjectorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    /// Capture time of the snapshot, in seconds.
    pub timestamp: u64,
    /// Declared node count, may exceed `nodes.len()`.
    pub total_nodes: u64,
    /// Keyed by address, kept in document order.
    pub nodes: IndexMap<String, RawNodeRecord>,
}

impl RawDataset {
    /// Decode a snapshot document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProjectorError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Records that can be placed on the map, in document order.
    pub fn eligible(&self) -> impl Iterator<Item = (&str, &RawNodeRecord)> + '_ {
        self.nodes
            .iter()
            .filter(|(_, record)| record.is_eligible())
            .map(|(addr, record)| (addr.as_str(), record))
    }
}

type RecordTuple = (
    u32,
    String,
    u64,
    u64,
    u64,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<f64>,
    Option<String>,
    Option<String>,
    Option<String>,
);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RecordTuple", into = "RecordTuple")]
pub struct RawNodeRecord {
    pub protocol_version: u32,
    pub user_agent: String,
    pub last_seen: u64,
    pub services: u64,
    pub block_height: u64,
    pub hostname: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub asn: Option<String>,
    pub isp: Option<String>,
}

impl RawNodeRecord {
    /// Both city and country are known, and so is the position to draw them at.
    pub fn is_eligible(&self) -> bool {
        self.city.is_some() && self.country_code.is_some() && self.coordinates().is_some()
    }

    /// `(latitude, longitude)` if both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

impl From<RecordTuple> for RawNodeRecord {
    fn from(t: RecordTuple) -> Self {
        Self {
            protocol_version: t.0,
            user_agent: t.1,
            last_seen: t.2,
            services: t.3,
            block_height: t.4,
            hostname: t.5,
            city: t.6,
            country_code: t.7,
            latitude: t.8,
            longitude: t.9,
            timezone: t.10,
            asn: t.11,
            isp: t.12,
        }
    }
}

impl From<RawNodeRecord> for RecordTuple {
    fn from(r: RawNodeRecord) -> Self {
        (
            r.protocol_version,
            r.user_agent,
            r.last_seen,
            r.services,
            r.block_height,
            r.hostname,
            r.city,
            r.country_code,
            r.latitude,
            r.longitude,
            r.timezone,
            r.asn,
            r.isp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "timestamp": 1700000000,
        "total_nodes": 3,
        "nodes": {
            "a": [70015, "UA", 0, 0, 800000, null, "Paris", "FR", 48.8, 2.3, null, null, null],
            "b": [70015, "UA", 0, 0, 800500, null, null, null, 0, 0, null, null, null],
            "c": [70015, "UA", 0, 0, 799000, null, "Berlin", "DE", 52.5, 13.4, null, null, null]
        }
    }"#;

    #[test]
    fn decode_snapshot() {
        let dataset = RawDataset::from_slice(DOC.as_bytes()).unwrap();

        assert_eq!(dataset.timestamp, 1_700_000_000);
        assert_eq!(dataset.total_nodes, 3);
        assert_eq!(dataset.nodes.keys().collect::<Vec<_>>(), ["a", "b", "c"]);

        let paris = &dataset.nodes["a"];
        assert_eq!(paris.protocol_version, 70015);
        assert_eq!(paris.user_agent, "UA");
        assert_eq!(paris.block_height, 800_000);
        assert_eq!(paris.city.as_deref(), Some("Paris"));
        assert_eq!(paris.coordinates(), Some((48.8, 2.3)));
        assert!(paris.hostname.is_none());
    }

    #[test]
    fn eligibility_needs_city_and_country() {
        let dataset = RawDataset::from_slice(DOC.as_bytes()).unwrap();
        let eligible: Vec<_> = dataset.eligible().map(|(addr, _)| addr).collect();
        assert_eq!(eligible, ["a", "c"]);
    }

    #[test]
    fn record_without_coordinates_is_not_eligible() {
        let record = RawNodeRecord {
            city: Some("Oslo".to_string()),
            country_code: Some("NO".to_string()),
            latitude: None,
            longitude: Some(10.7),
            ..Default::default()
        };
        assert!(!record.is_eligible());
    }

    #[test]
    fn missing_top_level_field_is_rejected() {
        let doc = r#"{ "timestamp": 1, "nodes": {} }"#;
        let err = RawDataset::from_slice(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, ProjectorError::InvalidDataset(_)));
    }

    #[test]
    fn non_array_node_is_rejected() {
        let doc = r#"{ "timestamp": 1, "total_nodes": 1, "nodes": { "a": { "city": "Paris" } } }"#;
        assert!(RawDataset::from_slice(doc.as_bytes()).is_err());
    }
}
