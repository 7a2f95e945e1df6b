//! What the map front end draws: a GeoJSON layer of node markers, the stats
//! readout and the mode selector.

use chrono::{DateTime, Utc};
use projector::{DisplayMode, DisplayPoint, Projector, SummaryStats};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrap display points into a GeoJSON `FeatureCollection` for the map's node layer.
pub fn feature_collection(points: &[DisplayPoint]) -> Value {
    let features: Vec<Value> = points
        .iter()
        .map(|point| {
            json!({
                "type": "Feature",
                "properties": {
                    "ip": point.ip,
                    "city": point.city,
                    "country": point.country,
                    "version": point.version,
                    "status": point.status,
                    "blockHeight": point.block_height,
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [point.lon, point.lat],
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// The stats overlay, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readout {
    pub total_nodes: String,
    pub consensus_height: String,
    pub last_updated: String,
}

impl From<&SummaryStats> for Readout {
    fn from(stats: &SummaryStats) -> Self {
        Self {
            total_nodes: compact_count(stats.total_nodes),
            consensus_height: thousands(stats.consensus_height),
            last_updated: utc_datetime(stats.timestamp),
        }
    }
}

/// An entry of the mode selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeOption {
    pub mode: DisplayMode,
    pub active: bool,
    /// Number of simulated nodes the tier shows, absent for the observed view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_nodes: Option<usize>,
}

pub fn mode_options(projector: &Projector, active: Option<DisplayMode>) -> Vec<ModeOption> {
    DisplayMode::ALL
        .into_iter()
        .map(|mode| ModeOption {
            mode,
            active: active == Some(mode),
            simulated_nodes: match mode {
                DisplayMode::Observed => None,
                DisplayMode::Simulated(tier) => Some(projector.target_count(tier)),
            },
        })
        .collect()
}

/// `950`, `12.3K`, `1.5M`.
pub fn compact_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// `817500` -> `817,500`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Unix seconds as `YYYY-MM-DD HH:MM:SS UTC`, or `unknown` past the calendar range.
pub fn utc_datetime(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
