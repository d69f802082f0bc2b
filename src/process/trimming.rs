use crate::process::utils::clean_text;
use arrow::{
    array::{ArrayRef, StringArray},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

/// Columns whose text gets citation markers and quotes stripped.
pub const TEXT_COLUMNS: [&str; 2] = ["Song", "Artist"];

/// Apply [`clean_text`] to every text column whose name is in `names`.
/// Names the header doesn't have are skipped.
pub fn apply_trimming(batch: &RecordBatch, names: &[&str]) -> Result<RecordBatch, ArrowError> {
    let schema = batch.schema();
    for name in names {
        if !schema.fields().iter().any(|f| f.name() == name) {
            debug!(column = %name, "column absent; not cleaned");
        }
    }

    let mut cols = Vec::with_capacity(batch.num_columns());
    for (i, field) in schema.fields().iter().enumerate() {
        let arr = batch.column(i);
        if names.contains(&field.name().as_str()) {
            if let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() {
                let cleaned: StringArray = sarr.iter().map(|opt| opt.map(clean_text)).collect();
                cols.push(Arc::new(cleaned) as ArrayRef);
                continue;
            }
        }
        cols.push(arr.clone());
    }

    RecordBatch::try_new(schema, cols)
}
