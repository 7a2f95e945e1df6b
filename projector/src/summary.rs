use serde::{Deserialize, Serialize};

use crate::dataset::RawDataset;

/// Dataset-wide figures for the stats readout. They do not depend on the display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_nodes: u64,
    pub consensus_height: u64,
    pub timestamp: u64,
}

/// Summarize a snapshot.
///
/// `total_nodes` is passed through as declared, not recounted. An empty node
/// mapping has a consensus height of 0.
pub fn compute_summary(dataset: &RawDataset) -> SummaryStats {
    let consensus_height = dataset
        .nodes
        .values()
        .map(|record| record.block_height)
        .max()
        .unwrap_or(0);

    SummaryStats {
        total_nodes: dataset.total_nodes,
        consensus_height,
        timestamp: dataset.timestamp,
    }
}
