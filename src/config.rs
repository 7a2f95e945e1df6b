use std::{fs, num::NonZeroUsize};

use projector::{DisplayMode, Projector, TierTable, DEFAULT_JITTER_DEGREES};
use serde::{Deserialize, Deserializer};

use crate::error::Error;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Where the node snapshot is read from, a file path or an `http(s)://` URL.
    pub data_source: String,
    /// The address to listen on for HTTP Server.
    pub http_addr: String,
    /// Projection settings.
    #[serde(default)]
    pub projection: ProjectionConfig,
}

/// Caps, jitter and tier sizes used when computing display points.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Most points drawn in observed mode.
    pub max_observed_points: NonZeroUsize,
    /// Most points drawn in a simulation tier.
    pub max_simulated_points: NonZeroUsize,
    /// Half-width of the jitter applied to simulated points, in degrees.
    #[serde(deserialize_with = "finite_degrees")]
    pub jitter_degrees: f64,
    /// Seed for the simulation sampler. Random if not provided.
    pub seed: Option<u64>,
    /// Target count of each simulation tier.
    pub tiers: TierTable,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_observed_points: NonZeroUsize::new(1200).unwrap_or(NonZeroUsize::MIN),
            max_simulated_points: NonZeroUsize::new(2000).unwrap_or(NonZeroUsize::MIN),
            jitter_degrees: DEFAULT_JITTER_DEGREES,
            seed: None,
            tiers: TierTable::default(),
        }
    }
}

impl ProjectionConfig {
    /// The render cap that applies to `mode`.
    pub fn max_points(&self, mode: DisplayMode) -> NonZeroUsize {
        if mode.is_simulated() {
            self.max_simulated_points
        } else {
            self.max_observed_points
        }
    }

    pub fn projector(&self) -> Result<Projector, Error> {
        Ok(Projector::new(self.tiers, self.jitter_degrees)?)
    }
}

fn finite_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let degrees = f64::deserialize(deserializer)?;
    if degrees.is_finite() {
        Ok(degrees)
    } else {
        Err(serde::de::Error::custom(format!(
            "jitter_degrees must be finite, got {degrees}"
        )))
    }
}

impl Config {
    /// Load the configuration from the given path.
    pub fn load(path: &str) -> Result<Self, Error> {
        let content =
            fs::read_to_string(path).map_err(|_| Error::ConfigNotExist(path.to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use projector::SimulationTier;

    use super::*;

    #[test]
    fn load_config() {
        let mut config_file = project_root::get_project_root().unwrap();
        config_file.push("config-template.toml");
        let path_str = config_file.to_str().unwrap();

        let Config {
            data_source,
            http_addr,
            projection,
        } = Config::load(path_str).unwrap();

        assert_eq!(data_source, "./data/bitnodes.json");
        assert_eq!(http_addr, "127.0.0.1:8000");
        assert_eq!(projection.max_observed_points.get(), 1200);
        assert_eq!(projection.max_simulated_points.get(), 2000);
        assert_eq!(projection.jitter_degrees, 0.05);
        assert_eq!(projection.seed, None);
        assert_eq!(projection.tiers.target(SimulationTier::Low), 1200);
        assert_eq!(projection.tiers.target(SimulationTier::Medium), 2400);
        assert_eq!(projection.tiers.target(SimulationTier::High), 3600);
    }

    #[test]
    fn projection_section_is_optional() {
        let config: Config = toml::from_str(
            r#"
            data_source = "https://example.org/bitnodes.json"
            http_addr = "0.0.0.0:8080"
            "#,
        )
        .unwrap();

        let projection = config.projection;
        assert_eq!(projection.max_points(DisplayMode::Observed).get(), 1200);
        let tier = DisplayMode::Simulated(SimulationTier::High);
        assert_eq!(projection.max_points(tier).get(), 2000);
        assert_eq!(projection.projector().unwrap(), Projector::default());
    }

    #[test]
    fn zero_cap_is_rejected() {
        let res = toml::from_str::<Config>(
            r#"
            data_source = "bitnodes.json"
            http_addr = "127.0.0.1:8000"

            [projection]
            max_observed_points = 0
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn non_finite_jitter_is_rejected() {
        for jitter in ["nan", "inf", "-inf"] {
            let res = toml::from_str::<Config>(&format!(
                r#"
                data_source = "bitnodes.json"
                http_addr = "127.0.0.1:8000"

                [projection]
                jitter_degrees = {jitter}
                "#
            ));
            let err = res.unwrap_err();
            assert!(err.to_string().contains("jitter_degrees must be finite"));
        }
    }

    #[test]
    fn projector_rejects_jitter_set_in_code() {
        let projection = ProjectionConfig {
            jitter_degrees: f64::NAN,
            ..Default::default()
        };
        let err = projection.projector().unwrap_err();
        assert!(matches!(err, Error::InvalidProjection(_)));
    }

    #[test]
    fn missing_config_file() {
        let err = Config::load("./no-such-config.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotExist(path) if path == "./no-such-config.toml"));
    }
}
