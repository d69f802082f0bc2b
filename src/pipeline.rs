use crate::chart::{rank_top, BarChart, ChartRenderer, LABEL_COLUMN, X_LABEL};
use crate::config::Config;
use crate::error::PipelineError;
use crate::fetch::PageSource;
use crate::process::{self, schema, KeyFieldPolicy, STREAMS_COLUMN};
use crate::sqlite::TableSink;
use arrow::record_batch::RecordBatch;
use tracing::info;

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub columns: Vec<String>,
    pub table: RecordBatch,
    pub chart: BarChart,
}

/// One full pass: fetch → extract → build table → store → chart.
///
/// Every side effect goes through the three collaborators, so a run can be
/// driven without network, disk or display.
pub fn run(
    config: &Config,
    source: &dyn PageSource,
    sink: &dyn TableSink,
    renderer: &dyn ChartRenderer,
) -> Result<RunSummary, PipelineError> {
    let html = source.fetch(&config.url)?;
    let raw = process::extract_table(&html, &config.table_selector)?;
    drop(html);

    let columns = schema::normalize_headers(&raw.headers);
    println!("Actual columns found: {:?}", columns);

    let table = process::build_table(&raw, &config.streams_column, &KeyFieldPolicy::default())?;

    sink.replace_table(&config.table_name, &table)?;
    println!("Data stored in SQLite successfully.");

    let chart = BarChart {
        title: config.chart_title.clone(),
        x_label: X_LABEL.to_string(),
        bars: rank_top(&table, LABEL_COLUMN, STREAMS_COLUMN, config.top_n),
    };
    renderer.render(&chart)?;
    info!(rows = table.num_rows(), bars = chart.bars.len(), "run complete");

    Ok(RunSummary {
        columns,
        table,
        chart,
    })
}
