use crate::process::schema::column_indices;
use crate::process::trimming::TEXT_COLUMNS;
use arrow::{
    array::{Array, BooleanArray},
    compute::filter_record_batch,
    error::ArrowError,
    record_batch::RecordBatch,
};
use tracing::{info, warn};

/// Which rows are kept.
///
/// A row must carry a value in every `required` column. Nothing else is
/// checked: an empty string counts as a value, and a row whose streams figure
/// could not be parsed is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFieldPolicy {
    pub required: Vec<String>,
}

impl Default for KeyFieldPolicy {
    fn default() -> Self {
        Self {
            required: TEXT_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl KeyFieldPolicy {
    /// Keep rows with all required fields present. A required column the
    /// header lacks means no row has it, so every row goes.
    pub fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
        let mut keep = vec![true; batch.num_rows()];

        for name in &self.required {
            let positions = column_indices(batch, name);
            if positions.is_empty() {
                warn!(column = %name, "required column missing; dropping all rows");
                keep.iter_mut().for_each(|k| *k = false);
                continue;
            }
            for pos in positions {
                let col = batch.column(pos);
                for (row, k) in keep.iter_mut().enumerate() {
                    if col.is_null(row) {
                        *k = false;
                    }
                }
            }
        }

        let mask = BooleanArray::from(keep);
        let out = filter_record_batch(batch, &mask)?;
        info!(
            kept = out.num_rows(),
            dropped = batch.num_rows() - out.num_rows(),
            "filtered rows"
        );
        Ok(out)
    }
}
