use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::RawNodeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStatus {
    Observed,
    Simulated,
}

impl fmt::Display for PointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observed => f.write_str("observed"),
            Self::Simulated => f.write_str("simulated"),
        }
    }
}

/// A single marker on the map, with what its detail popup shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPoint {
    /// Node address, or a synthetic id for simulated points.
    pub ip: String,
    pub status: PointStatus,
    pub block_height: u64,
    pub version: String,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl DisplayPoint {
    /// Build a point from an eligible record. Returns `None` if the record
    /// lacks any of the fields a marker needs.
    pub(crate) fn from_record(
        ip: String,
        status: PointStatus,
        record: &RawNodeRecord,
    ) -> Option<Self> {
        let (lat, lon) = record.coordinates()?;

        Some(Self {
            ip,
            status,
            block_height: record.block_height,
            version: record.user_agent.clone(),
            city: record.city.clone()?,
            country: record.country_code.clone()?,
            lat,
            lon,
        })
    }
}
