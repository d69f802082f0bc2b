use crate::config::ColumnSelector;
use crate::process::schema::{column_index, column_names};
use crate::process::utils::coerce_number;
use arrow::{
    array::{Array, ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, FieldRef, Schema},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of the derived numeric column.
pub const STREAMS_COLUMN: &str = "Streams (billions)";

/// Derive the `Streams (billions)` float column from the column `selector`
/// picks. Unparsable cells become nulls; this never fails on content.
///
/// An existing column with that name is replaced where it stands, otherwise
/// the new column is appended.
pub fn coerce_streams(
    batch: &RecordBatch,
    selector: &ColumnSelector,
) -> Result<RecordBatch, ArrowError> {
    let headers = column_names(batch);
    let values: Float64Array = match selector.resolve(&headers) {
        Some(src) => {
            debug!(source = %headers[src], index = src, "coercing streams column");
            match batch.column(src).as_any().downcast_ref::<StringArray>() {
                Some(sarr) => sarr.iter().map(|opt| opt.and_then(coerce_number)).collect(),
                None => {
                    warn!(index = src, "streams source is not a text column; all values null");
                    Float64Array::new_null(batch.num_rows())
                }
            }
        }
        None => {
            warn!(
                index = selector.index,
                name = ?selector.name,
                columns = headers.len(),
                "streams source column missing; all values null"
            );
            Float64Array::new_null(batch.num_rows())
        }
    };

    let parsed = values.len() - values.null_count();
    debug!(parsed, missing = values.null_count(), "streams coerced");

    let field: FieldRef = Arc::new(Field::new(STREAMS_COLUMN, DataType::Float64, true));
    let values = Arc::new(values) as ArrayRef;

    let mut fields: Vec<FieldRef> = batch.schema().fields().iter().cloned().collect();
    let mut cols: Vec<ArrayRef> = batch.columns().to_vec();
    match column_index(batch, STREAMS_COLUMN) {
        Some(i) => {
            fields[i] = field;
            cols[i] = values;
        }
        None => {
            fields.push(field);
            cols.push(values);
        }
    }

    RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        cols,
        &RecordBatchOptions::new().with_row_count(Some(batch.num_rows())),
    )
}

/// Typed view of the streams column, if the batch has one.
pub fn streams(batch: &RecordBatch) -> Option<&Float64Array> {
    column_index(batch, STREAMS_COLUMN)
        .and_then(|i| batch.column(i).as_any().downcast_ref::<Float64Array>())
}
