use anyhow::{Context, Result};
use clap::Parser;
use songscraper::{
    chart::SvgChartRenderer,
    config::Config,
    fetch::{FileSource, HttpFetcher, PageSource},
    pipeline,
    sqlite::SqliteSink,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Scrape the most-streamed-songs table, store it in SQLite and chart the top rows.
#[derive(Parser, Debug)]
struct Args {
    /// YAML config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page to scrape
    #[arg(long)]
    url: Option<String>,

    /// Read the page from a saved HTML file instead of the network
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// CSS class marking the target table
    #[arg(long)]
    table_class: Option<String>,

    /// Header label of the streams column (falls back to --streams-index)
    #[arg(long)]
    streams_column: Option<String>,

    /// Position of the streams column, 0-based
    #[arg(long)]
    streams_index: Option<usize>,

    /// SQLite file to write
    #[arg(long)]
    db: Option<PathBuf>,

    /// Table name inside the SQLite file
    #[arg(long)]
    table: Option<String>,

    /// Where to write the SVG chart
    #[arg(long)]
    chart: Option<PathBuf>,

    /// How many rows to chart
    #[arg(long)]
    top: Option<usize>,
}

impl Args {
    fn into_config(self) -> Result<(Config, Option<PathBuf>)> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(url) = self.url {
            cfg.url = url;
        }
        if let Some(class) = self.table_class {
            cfg.table_selector = class;
        }
        if let Some(name) = self.streams_column {
            cfg.streams_column.name = Some(name);
        }
        if let Some(index) = self.streams_index {
            cfg.streams_column.index = index;
        }
        if let Some(db) = self.db {
            cfg.db_path = db;
        }
        if let Some(table) = self.table {
            cfg.table_name = table;
        }
        if let Some(chart) = self.chart {
            cfg.chart_path = chart;
        }
        if let Some(top) = self.top {
            cfg.top_n = top;
        }
        cfg.validate()?;
        Ok((cfg, self.html_file))
    }
}

fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let (cfg, html_file) = Args::parse().into_config()?;
    info!(url = %cfg.url, db = %cfg.db_path.display(), "startup");

    let source: Box<dyn PageSource> = match html_file {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpFetcher::new(&cfg.user_agent)?),
    };
    let sink = SqliteSink::new(&cfg.db_path);
    let renderer = SvgChartRenderer::new(&cfg.chart_path);

    let summary = pipeline::run(&cfg, source.as_ref(), &sink, &renderer)?;
    info!(
        rows = summary.table.num_rows(),
        charted = summary.chart.bars.len(),
        chart = %cfg.chart_path.display(),
        "all done"
    );
    Ok(())
}
