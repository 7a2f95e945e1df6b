//! Shapes a snapshot of observed Bitcoin nodes into the points a world map draws.
//!
//! The real view shows the first eligible nodes of the snapshot. The simulation
//! tiers resample eligible nodes with some positional jitter to suggest how a
//! larger network would look.

mod dataset;
mod error;
mod mode;
mod point;
mod project;
mod summary;

pub use dataset::{RawDataset, RawNodeRecord};
pub use error::ProjectorError;
pub use mode::{DisplayMode, SimulationTier};
pub use point::{DisplayPoint, PointStatus};
pub use project::{Projector, TierTable, DEFAULT_JITTER_DEGREES};
pub use summary::{compute_summary, SummaryStats};
