use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a pipeline run.
///
/// Schema drift (a missing column) and unparsable numbers are not in here:
/// those are absorbed by the stages that meet them and only logged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("failed to read page source {}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no <table> with class `{class}` in document")]
    TableNotFound { class: String },

    #[error("failed to store table `{table}`")]
    Storage {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to render chart: {0}")]
    Render(String),

    #[error("failed to build table")]
    Data(#[from] arrow::error::ArrowError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
