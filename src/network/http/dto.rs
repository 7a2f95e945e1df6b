//! DTO (Data Transfer Object) for HTTP requests and responses.
//!
//! We use JSON as the DTO format, field names follow the map front end (camelCase).

use projector::{DisplayMode, DisplayPoint, SummaryStats};
use serde::{Deserialize, Serialize};

use crate::render::{ModeOption, Readout};

#[derive(Debug, Deserialize)]
pub struct PointsReq {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModeReq {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderErrorReq {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResp {
    #[serde(flatten)]
    pub stats: SummaryStats,
    pub readout: Readout,
}

impl From<SummaryStats> for StatsResp {
    fn from(stats: SummaryStats) -> Self {
        Self {
            readout: Readout::from(&stats),
            stats,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PointsResp<'a> {
    pub mode: DisplayMode,
    pub count: usize,
    pub points: &'a [DisplayPoint],
}

impl<'a> PointsResp<'a> {
    pub fn new(mode: DisplayMode, points: &'a [DisplayPoint]) -> Self {
        Self {
            mode,
            count: points.len(),
            points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModesResp {
    pub active: Option<DisplayMode>,
    pub modes: Vec<ModeOption>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stats_resp_is_flat() {
        let resp = StatsResp::from(SummaryStats {
            total_nodes: 3,
            consensus_height: 800_500,
            timestamp: 0,
        });

        let value = serde_json::to_value(resp).unwrap();
        assert_eq!(value["totalNodes"], 3);
        assert_eq!(value["consensusHeight"], 800_500);
        assert_eq!(value["readout"]["consensusHeight"], "800,500");
        assert_eq!(value["readout"]["lastUpdated"], "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn points_resp_carries_mode_label() {
        let value = serde_json::to_value(PointsResp::new(DisplayMode::Observed, &[])).unwrap();
        assert_eq!(value, json!({"mode": "observed", "count": 0, "points": []}));
    }
}
