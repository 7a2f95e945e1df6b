//! Lifecycle events of a map session.

use std::fmt::Debug;

use log::{error, info};
use projector::DisplayMode;

use crate::error::ErrorKind;

/// A point the session has reached.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    DatasetLoaded {
        total_nodes: u64,
        records: usize,
        timestamp: u64,
    },
    ModeChanged {
        mode: DisplayMode,
        points: usize,
    },
    ErrorOccurred {
        kind: ErrorKind,
        detail: String,
    },
}

pub trait StageObserver: Debug + Send + Sync {
    fn stage_reached(&self, stage: &Stage);
}

/// Writes every stage to the log.
#[derive(Debug, Clone, Default)]
pub struct LogObserver;

impl StageObserver for LogObserver {
    fn stage_reached(&self, stage: &Stage) {
        match stage {
            Stage::DatasetLoaded {
                total_nodes,
                records,
                timestamp,
            } => info!(
                "📣 [SESSION] dataset loaded: {total_nodes} nodes declared, {records} records, captured at {timestamp}"
            ),
            Stage::ModeChanged { mode, points } => {
                info!("📣 [SESSION] mode changed to {mode}: displaying {points} points")
            }
            Stage::ErrorOccurred { kind, detail } => {
                error!("❌ [SESSION] {kind}: {detail}")
            }
        }
    }
}
