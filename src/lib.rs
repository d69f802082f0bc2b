pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod sqlite;

pub use error::PipelineError;
