//! Where the node snapshot comes from.

use std::{fmt::Debug, path::PathBuf};

use async_trait::async_trait;
use log::info;
use projector::RawDataset;
use reqwest::Client;

use crate::error::Error;

/// A single read-only retrieval of the snapshot document.
#[async_trait]
pub trait DatasetSource: Debug + Send + Sync {
    /// Fetch the raw document bytes.
    async fn fetch(&self) -> Result<Vec<u8>, Error>;

    /// Fetch and decode the snapshot.
    async fn load(&self) -> Result<RawDataset, Error> {
        let bytes = self.fetch().await?;
        Ok(RawDataset::from_slice(&bytes)?)
    }
}

/// Pick a source for `location`: URLs go over HTTP, anything else is a file path.
pub fn from_location(location: &str) -> Box<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, Error> {
        info!("📣 >> [DATA] reading {}", self.path.display());
        tokio::fs::read(&self.path)
            .await
            .map_err(|err| Error::DatasetFetch(format!("{}: {err}", self.path.display())))
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, Error> {
        info!("📣 >> [DATA] GET {}", self.url);
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        info!("📣 << [DATA] response status: {status}");

        if !status.is_success() {
            return Err(Error::DatasetFetch(format!("{} returned {status}", self.url)));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn load_bundled_snapshot() {
        let mut path = project_root::get_project_root().unwrap();
        path.push("data/bitnodes.json");

        let dataset = FileSource::new(path).load().await.unwrap();
        assert_eq!(dataset.timestamp, 1_700_000_000);
        assert_eq!(dataset.total_nodes, 6);
        assert_eq!(dataset.nodes.len(), 6);
        assert_eq!(dataset.eligible().count(), 4);
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let err = FileSource::new("./no/such/bitnodes.json")
            .load()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DatasetFetch);
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timestamp": 1, "total_nodes": 1, "nodes": {{"a": 5}}}}"#).unwrap();

        let err = FileSource::new(file.path()).load().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DatasetParse);
    }

    #[test]
    fn location_picks_the_transport() {
        let source = from_location("https://bitnodes.example/snapshot.json");
        assert!(format!("{source:?}").starts_with("HttpSource"));

        let source = from_location("./data/bitnodes.json");
        assert!(format!("{source:?}").starts_with("FileSource"));
    }
}
