// src/process/mod.rs
pub mod convert;
pub mod filter;
pub mod locate;
pub mod raw_table;
pub mod schema;
pub mod trimming;
pub mod utils;

use crate::config::ColumnSelector;
use crate::error::PipelineError;
use arrow::record_batch::RecordBatch;
use scraper::Html;
use tracing::info;

pub use convert::STREAMS_COLUMN;
pub use filter::KeyFieldPolicy;
pub use raw_table::RawTable;

/// Markup → raw rows: parse, locate the table, pull cell text.
pub fn extract_table(html: &str, class: &str) -> Result<RawTable, PipelineError> {
    let doc = Html::parse_document(html);
    let table = locate::locate_table(&doc, class)?;
    Ok(raw_table::extract_rows(table))
}

/// Raw rows → filtered typed table: normalize headers, clean Song/Artist,
/// derive streams, drop rows without key fields.
pub fn build_table(
    raw: &RawTable,
    streams_column: &ColumnSelector,
    policy: &KeyFieldPolicy,
) -> Result<RecordBatch, PipelineError> {
    let normalized = schema::normalize(raw)?;
    let cleaned = trimming::apply_trimming(&normalized, &trimming::TEXT_COLUMNS)?;
    let coerced = convert::coerce_streams(&cleaned, streams_column)?;
    let filtered = policy.apply(&coerced)?;
    info!(
        rows = filtered.num_rows(),
        columns = filtered.num_columns(),
        "table ready"
    );
    Ok(filtered)
}
