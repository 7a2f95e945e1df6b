//! Display modes offered by the map's mode selector.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ProjectorError;

/// Intensity of a simulated node population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationTier {
    Low,
    Medium,
    High,
}

impl SimulationTier {
    pub const ALL: [SimulationTier; 3] = [Self::Low, Self::Medium, Self::High];

    /// The share of the global population the tier stands for.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "0.01%",
            Self::Medium => "0.1%",
            Self::High => "1%",
        }
    }
}

/// Exactly one mode is active at a time; switching replaces every display point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DisplayMode {
    #[default]
    Observed,
    Simulated(SimulationTier),
}

impl DisplayMode {
    /// All selectable modes, in selector order.
    pub const ALL: [DisplayMode; 4] = [
        Self::Observed,
        Self::Simulated(SimulationTier::Low),
        Self::Simulated(SimulationTier::Medium),
        Self::Simulated(SimulationTier::High),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Observed => "observed",
            Self::Simulated(tier) => tier.label(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayMode {
    type Err = ProjectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "live" is what the map overlay used to call the observed view.
        match s.trim() {
            "observed" | "live" => Ok(Self::Observed),
            "0.01%" | "low" => Ok(Self::Simulated(SimulationTier::Low)),
            "0.1%" | "medium" => Ok(Self::Simulated(SimulationTier::Medium)),
            "1%" | "high" => Ok(Self::Simulated(SimulationTier::High)),
            other => Err(ProjectorError::InvalidMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for DisplayMode {
    type Error = ProjectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DisplayMode> for String {
    fn from(mode: DisplayMode) -> Self {
        mode.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for mode in DisplayMode::ALL {
            assert_eq!(mode.label().parse::<DisplayMode>().unwrap(), mode);
        }
    }

    #[test]
    fn live_is_an_alias_of_observed() {
        assert_eq!("live".parse::<DisplayMode>().unwrap(), DisplayMode::Observed);
        assert!(!DisplayMode::Observed.is_simulated());
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "10%".parse::<DisplayMode>().unwrap_err();
        assert!(matches!(err, ProjectorError::InvalidMode(s) if s == "10%"));
    }

    #[test]
    fn mode_serializes_as_label() {
        let mode = DisplayMode::Simulated(SimulationTier::Medium);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"0.1%\"");

        let parsed: DisplayMode = serde_json::from_str("\"1%\"").unwrap();
        assert_eq!(parsed, DisplayMode::Simulated(SimulationTier::High));
    }
}
