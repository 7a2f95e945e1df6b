use crate::mode::DisplayMode;

#[derive(thiserror::Error, Debug)]
pub enum ProjectorError {
    #[error("No node has both city and country, cannot project mode '{0}'")]
    EmptyPool(DisplayMode),
    #[error("Unknown display mode: {0}")]
    InvalidMode(String),
    #[error("Jitter must be a finite number of degrees, got {0}")]
    InvalidJitter(f64),
    #[error("Invalid dataset: {0}")]
    InvalidDataset(#[from] serde_json::Error),
}
