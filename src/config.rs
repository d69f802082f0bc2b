use crate::error::PipelineError;
use crate::process::locate::check_class;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/List_of_most-streamed_songs_on_Spotify";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TABLE_CLASS: &str = "wikitable";
pub const DEFAULT_STREAMS_INDEX: usize = 3;
pub const DEFAULT_DB_PATH: &str = "spotify_data.db";
pub const DEFAULT_TABLE_NAME: &str = "most_streamed_songs";
pub const DEFAULT_CHART_PATH: &str = "top_songs.svg";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_CHART_TITLE: &str = "Top 10 Most Streamed Songs on Spotify";

/// Picks the column the streams figure is read from.
///
/// A configured `name` wins when the normalized header carries it; otherwise
/// the column at `index` is used. The page's header label for this column has
/// changed across revisions, which is why position is the default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnSelector {
    pub name: Option<String>,
    pub index: usize,
}

impl Default for ColumnSelector {
    fn default() -> Self {
        Self {
            name: None,
            index: DEFAULT_STREAMS_INDEX,
        }
    }
}

impl ColumnSelector {
    /// Resolve against a normalized header row.
    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        self.name
            .as_deref()
            .and_then(|name| headers.iter().position(|h| h == name))
            .or_else(|| (self.index < headers.len()).then_some(self.index))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub url: String,
    pub user_agent: String,
    /// CSS class marking the target table.
    pub table_selector: String,
    pub streams_column: ColumnSelector,
    pub db_path: PathBuf,
    pub table_name: String,
    pub chart_path: PathBuf,
    pub top_n: usize,
    pub chart_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            table_selector: DEFAULT_TABLE_CLASS.into(),
            streams_column: ColumnSelector::default(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE_NAME.into(),
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            top_n: DEFAULT_TOP_N,
            chart_title: DEFAULT_CHART_TITLE.into(),
        }
    }
}

impl Config {
    /// Load a YAML config file. Keys left out keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        Url::parse(&self.url)
            .map_err(|e| PipelineError::Config(format!("url `{}`: {e}", self.url)))?;
        check_class(&self.table_selector)?;
        if self.table_name.trim().is_empty() {
            return Err(PipelineError::Config("table_name is empty".into()));
        }
        if self.top_n == 0 {
            return Err(PipelineError::Config("top_n must be at least 1".into()));
        }
        Ok(())
    }
}
