// src/fetch/mod.rs
use crate::error::PipelineError;
use reqwest::blocking::Client;
use std::{fs, path::PathBuf};
use tracing::{debug, info, instrument};

/// Anything that can hand back the raw markup for a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, PipelineError>;
}

/// Blocking HTTP GET with a browser-like `User-Agent`; without it the
/// source site answers 403.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(PipelineError::Client)?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        let network = |source: reqwest::Error| PipelineError::Network {
            url: url.to_string(),
            source,
        };
        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(network)?;
        debug!(status = %resp.status(), "response");
        let body = resp.text().map_err(network)?;
        info!(bytes = body.len(), "fetched page");
        Ok(body)
    }
}

/// Serves a saved copy of the page from disk, whatever URL is asked for.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for FileSource {
    fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        info!(path = %self.path.display(), url, "reading page from file");
        fs::read_to_string(&self.path).map_err(|source| PipelineError::Source {
            path: self.path.clone(),
            source,
        })
    }
}
