use crate::error::PipelineError;
use arrow::{
    array::{Array, Float64Array, StringArray},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use rusqlite::{params_from_iter, types::Value, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Somewhere a finished table can be written to.
pub trait TableSink {
    /// Store `batch` as `table`, dropping whatever was stored under that name.
    fn replace_table(&self, table: &str, batch: &RecordBatch) -> Result<(), PipelineError>;
}

/// Single-file SQLite store. The connection only lives for one call.
pub struct SqliteSink {
    path: PathBuf,
}

impl SqliteSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSink for SqliteSink {
    #[instrument(level = "info", skip(self, batch), fields(path = %self.path.display(), rows = batch.num_rows()))]
    fn replace_table(&self, table: &str, batch: &RecordBatch) -> Result<(), PipelineError> {
        let storage = |source: rusqlite::Error| PipelineError::Storage {
            table: table.to_string(),
            source,
        };
        let mut conn = open_disk_db(&self.path).map_err(storage)?;
        write_table(&mut conn, table, batch).map_err(storage)?;
        info!("table replaced");
        Ok(())
    }
}

/// Open a SQLite database on disk at `path`, creating the file if it doesn't exist.
pub fn open_disk_db(path: impl AsRef<Path>) -> rusqlite::Result<Connection> {
    Connection::open(path)
}

pub fn open_mem_db() -> rusqlite::Result<Connection> {
    Connection::open_in_memory()
}

/// `"name"` with embedded quotes doubled.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(dt: &DataType) -> &'static str {
    match dt {
        DataType::Float64 => "REAL",
        _ => "TEXT",
    }
}

/// Drop, recreate and fill `table` inside one transaction.
pub fn write_table(conn: &mut Connection, table: &str, batch: &RecordBatch) -> rusqlite::Result<()> {
    let schema = batch.schema();
    let ident = quote_ident(table);
    let column_defs = schema
        .fields()
        .iter()
        .map(|f| format!("{} {}", quote_ident(f.name()), sql_type(f.data_type())))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; schema.fields().len()].join(", ");

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {ident}"), [])?;
    tx.execute(&format!("CREATE TABLE {ident} ({column_defs})"), [])?;
    {
        let mut stmt = tx.prepare(&format!("INSERT INTO {ident} VALUES ({placeholders})"))?;
        for row in 0..batch.num_rows() {
            let values = batch.columns().iter().map(|col| cell_value(col.as_ref(), row));
            stmt.execute(params_from_iter(values))?;
        }
    }
    tx.commit()?;
    debug!(table, rows = batch.num_rows(), "rows inserted");
    Ok(())
}

fn cell_value(col: &dyn Array, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
        return Value::Text(s.value(row).to_string());
    }
    if let Some(f) = col.as_any().downcast_ref::<Float64Array>() {
        return Value::Real(f.value(row));
    }
    Value::Null
}

/// Column names and every row of `table`, in rowid order.
pub fn read_table(conn: &Connection, table: &str) -> rusqlite::Result<(Vec<String>, Vec<Vec<Value>>)> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {} ORDER BY rowid", quote_ident(table)))?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = names.len();
    let rows = stmt
        .query_map([], |row| (0..width).map(|i| row.get::<_, Value>(i)).collect())?
        .collect::<rusqlite::Result<Vec<Vec<Value>>>>()?;
    Ok((names, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnSelector;
    use crate::process::{build_table, KeyFieldPolicy, RawTable};
    use anyhow::Result;
    use tempfile::tempdir;

    fn sample() -> Result<RecordBatch> {
        let rows = vec![
            vec!["Song", "Artist(s)", "Year", "Streams (billions)"],
            vec!["\"Blinding Lights\"", "The Weeknd", "2019", "4.8"],
            vec!["\"Shape of You\"", "Ed Sheeran", "2017", "4.1"],
            vec!["\"Unknown\"", "Someone", "2020", "N/A"],
        ];
        let raw = RawTable::from_rows(
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        );
        Ok(build_table(&raw, &ColumnSelector::default(), &KeyFieldPolicy::default())?)
    }

    #[test]
    fn round_trip_through_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("songs.db");
        let batch = sample()?;

        SqliteSink::new(&path).replace_table("most_streamed_songs", &batch)?;

        let conn = open_disk_db(&path)?;
        let (names, rows) = read_table(&conn, "most_streamed_songs")?;
        assert_eq!(names, vec!["Song", "Artist", "Year", "Streams (billions)"]);
        assert_eq!(rows.len(), batch.num_rows());
        assert_eq!(rows[0][0], Value::Text("Blinding Lights".into()));
        assert_eq!(rows[1][1], Value::Text("Ed Sheeran".into()));
        match rows[0][3] {
            Value::Real(v) => assert!((v - 4.8).abs() < 1e-9),
            ref other => panic!("expected REAL, got {other:?}"),
        }
        assert_eq!(rows[2][3], Value::Null);
        Ok(())
    }

    #[test]
    fn replace_drops_previous_contents() -> Result<()> {
        let mut conn = open_mem_db()?;
        conn.execute_batch(
            "CREATE TABLE \"most_streamed_songs\" (old_col INTEGER);
             INSERT INTO \"most_streamed_songs\" VALUES (1), (2), (3), (4), (5);",
        )?;

        let batch = sample()?;
        write_table(&mut conn, "most_streamed_songs", &batch)?;
        write_table(&mut conn, "most_streamed_songs", &batch)?;

        let (names, rows) = read_table(&conn, "most_streamed_songs")?;
        assert_eq!(names.len(), 4);
        assert!(!names.contains(&"old_col".to_string()));
        assert_eq!(rows.len(), 3);
        Ok(())
    }

    #[test]
    fn column_types_follow_arrow_types() -> Result<()> {
        let mut conn = open_mem_db()?;
        write_table(&mut conn, "t", &sample()?)?;
        let ty: String = conn.query_row(
            "SELECT type FROM pragma_table_info('t') WHERE name = 'Streams (billions)'",
            [],
            |r| r.get(0),
        )?;
        assert_eq!(ty, "REAL");
        Ok(())
    }

    #[test]
    fn unwritable_path_is_storage_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("missing_dir").join("songs.db");
        let err = SqliteSink::new(path)
            .replace_table("t", &sample()?)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Storage { .. }));
        Ok(())
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("Streams (billions)"), "\"Streams (billions)\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
