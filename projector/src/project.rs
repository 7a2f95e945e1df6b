use std::num::NonZeroUsize;

use rand::Rng;
use serde::Deserialize;

use crate::{
    dataset::{RawDataset, RawNodeRecord},
    error::ProjectorError,
    mode::{DisplayMode, SimulationTier},
    point::{DisplayPoint, PointStatus},
};

/// Default positional jitter applied to simulated points, in degrees.
pub const DEFAULT_JITTER_DEGREES: f64 = 0.05;

/// Target point count of each simulation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl TierTable {
    pub fn target(&self, tier: SimulationTier) -> usize {
        match tier {
            SimulationTier::Low => self.low,
            SimulationTier::Medium => self.medium,
            SimulationTier::High => self.high,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            low: 1200,
            medium: 2400,
            high: 3600,
        }
    }
}

/// Turns a node snapshot into the points drawn for a display mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    tiers: TierTable,
    jitter: f64,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            jitter: DEFAULT_JITTER_DEGREES,
        }
    }
}

impl Projector {
    /// `jitter` bounds the offset added to each simulated coordinate, in degrees.
    /// Negative values are taken by magnitude, NaN and infinities are rejected.
    pub fn new(tiers: TierTable, jitter: f64) -> Result<Self, ProjectorError> {
        if !jitter.is_finite() {
            return Err(ProjectorError::InvalidJitter(jitter));
        }

        Ok(Self {
            tiers,
            jitter: jitter.abs(),
        })
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Number of synthetic points a tier asks for, before any cap.
    pub fn target_count(&self, tier: SimulationTier) -> usize {
        self.tiers.target(tier)
    }

    /// Compute the points to draw for `mode`, at most `max_points` of them.
    ///
    /// Observed mode keeps the first `max_points` eligible records in document
    /// order and does not touch `rng`. Simulated modes sample eligible records
    /// uniformly with replacement and jitter their positions.
    ///
    /// Fails with [`ProjectorError::EmptyPool`] if no record is eligible.
    pub fn compute_display_points<R: Rng + ?Sized>(
        &self,
        dataset: &RawDataset,
        mode: DisplayMode,
        max_points: NonZeroUsize,
        rng: &mut R,
    ) -> Result<Vec<DisplayPoint>, ProjectorError> {
        let pool: Vec<(&str, &RawNodeRecord)> = dataset.eligible().collect();
        if pool.is_empty() {
            return Err(ProjectorError::EmptyPool(mode));
        }

        let points = match mode {
            DisplayMode::Observed => pool
                .into_iter()
                .take(max_points.get())
                .filter_map(|(addr, record)| {
                    DisplayPoint::from_record(addr.to_string(), PointStatus::Observed, record)
                })
                .collect(),
            DisplayMode::Simulated(tier) => {
                let count = self.target_count(tier).min(max_points.get());
                self.simulate(&pool, count, rng)
            }
        };

        Ok(points)
    }

    fn simulate<R: Rng + ?Sized>(
        &self,
        pool: &[(&str, &RawNodeRecord)],
        count: usize,
        rng: &mut R,
    ) -> Vec<DisplayPoint> {
        (0..count)
            .filter_map(|i| {
                let (_, record) = pool[rng.gen_range(0..pool.len())];
                let mut point = DisplayPoint::from_record(
                    format!("simulated-{i}"),
                    PointStatus::Simulated,
                    record,
                )?;
                point.lat += self.offset(rng);
                point.lon += self.offset(rng);
                Some(point)
            })
            .collect()
    }

    fn offset<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter == 0.0 {
            return 0.0;
        }
        rng.gen_range(-self.jitter..=self.jitter)
    }
}
