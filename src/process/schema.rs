use crate::process::raw_table::RawTable;
use crate::process::utils::clean_header;
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Clean every header label. Order and count are kept exactly; collisions and
/// empty names are left alone.
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    headers.iter().map(|h| clean_header(h)).collect()
}

/// Position of the first column called `name`, if the header has one.
pub fn column_index(batch: &RecordBatch, name: &str) -> Option<usize> {
    batch
        .schema()
        .fields()
        .iter()
        .position(|f| f.name() == name)
}

/// Every column position called `name` (duplicate labels are legal).
pub fn column_indices(batch: &RecordBatch, name: &str) -> Vec<usize> {
    batch
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| f.name() == name)
        .map(|(i, _)| i)
        .collect()
}

pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

/// Build a batch of nullable text columns under the normalized header.
///
/// Short rows are padded with nulls. Cells past the header width have no
/// column to land in and are dropped.
pub fn normalize(raw: &RawTable) -> Result<RecordBatch, ArrowError> {
    let headers = normalize_headers(&raw.headers);
    let width = headers.len();

    let overflow = raw.rows.iter().filter(|r| r.len() > width).count();
    if overflow > 0 {
        warn!(rows = overflow, width, "rows wider than header; extra cells dropped");
    }

    let fields: Vec<Field> = headers
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();

    let columns: Vec<ArrayRef> = (0..width)
        .map(|i| {
            let col: StringArray = raw.rows.iter().map(|row| row.get(i)).collect();
            Arc::new(col) as ArrayRef
        })
        .collect();

    debug!(columns = width, rows = raw.rows.len(), "normalized schema");
    RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &RecordBatchOptions::new().with_row_count(Some(raw.rows.len())),
    )
}
