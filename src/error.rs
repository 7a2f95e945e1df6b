use std::fmt;

use projector::ProjectorError;
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Config file not exist: {0}")]
    ConfigNotExist(String),
    #[error(transparent)]
    InvalidConfig(#[from] toml::de::Error),
    #[error("Invalid projection settings: {0}")]
    InvalidProjection(String),
    #[error("Invalid http address: {0}")]
    InvalidHttpAddr(#[from] std::net::AddrParseError),
    #[error("Failed to fetch dataset: {0}")]
    DatasetFetch(String),
    #[error("Malformed dataset: {0}")]
    DatasetParse(String),
    #[error(transparent)]
    EmptyPool(ProjectorError),
    #[error("Map failed to initialize: {0}")]
    RenderingInit(String),
    #[error("{0}")]
    InvalidMode(String),
    #[error("Dataset is still loading")]
    NotReady,
}

impl From<ProjectorError> for Error {
    fn from(err: ProjectorError) -> Self {
        match err {
            ProjectorError::EmptyPool(_) => Error::EmptyPool(err),
            ProjectorError::InvalidMode(_) => Error::InvalidMode(err.to_string()),
            ProjectorError::InvalidJitter(_) => Error::InvalidProjection(err.to_string()),
            ProjectorError::InvalidDataset(err) => Error::DatasetParse(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::DatasetFetch(err.to_string())
    }
}

/// The category of a failure, as reported to the map front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DatasetFetch,
    DatasetParse,
    EmptyPool,
    RenderingInit,
    InvalidMode,
    NotReady,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigNotExist(_)
            | Error::InvalidConfig(_)
            | Error::InvalidProjection(_)
            | Error::InvalidHttpAddr(_) => ErrorKind::Config,
            Error::DatasetFetch(_) => ErrorKind::DatasetFetch,
            Error::DatasetParse(_) => ErrorKind::DatasetParse,
            Error::EmptyPool(_) => ErrorKind::EmptyPool,
            Error::RenderingInit(_) => ErrorKind::RenderingInit,
            Error::InvalidMode(_) => ErrorKind::InvalidMode,
            Error::NotReady => ErrorKind::NotReady,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::DatasetFetch => "dataset_fetch",
            ErrorKind::DatasetParse => "dataset_parse",
            ErrorKind::EmptyPool => "empty_pool",
            ErrorKind::RenderingInit => "rendering_init",
            ErrorKind::InvalidMode => "invalid_mode",
            ErrorKind::NotReady => "not_ready",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use projector::DisplayMode;

    use super::*;

    #[test]
    fn projector_errors_keep_their_kind() {
        let err = Error::from(ProjectorError::EmptyPool(DisplayMode::Observed));
        assert_eq!(err.kind(), ErrorKind::EmptyPool);
        assert!(err.to_string().contains("observed"));

        let err = Error::from("2%".parse::<DisplayMode>().unwrap_err());
        assert_eq!(err.kind(), ErrorKind::InvalidMode);
        assert_eq!(err.to_string(), "Unknown display mode: 2%");

        let decode = serde_json::from_str::<projector::RawDataset>("[]").unwrap_err();
        let err = Error::from(ProjectorError::from(decode));
        assert_eq!(err.kind(), ErrorKind::DatasetParse);

        let err = Error::from(ProjectorError::InvalidJitter(f64::NAN));
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn kind_display_matches_serialized_name() {
        let json = serde_json::to_string(&ErrorKind::RenderingInit).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorKind::RenderingInit));
    }
}
