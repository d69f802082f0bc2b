use crate::error::PipelineError;
use crate::process::schema::column_index;
use arrow::{
    array::{Array, Float64Array, StringArray},
    record_batch::RecordBatch,
};
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

pub const LABEL_COLUMN: &str = "Song";
pub const X_LABEL: &str = "Streams (Billions)";

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Bars ordered highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub bars: Vec<Bar>,
}

/// The `n` highest rows by `value_column`, highest first, ties in table order.
/// Rows without a value are never ranked.
pub fn rank_top(batch: &RecordBatch, label_column: &str, value_column: &str, n: usize) -> Vec<Bar> {
    let labels = column_index(batch, label_column)
        .and_then(|i| batch.column(i).as_any().downcast_ref::<StringArray>());
    let values = column_index(batch, value_column)
        .and_then(|i| batch.column(i).as_any().downcast_ref::<Float64Array>());
    let (Some(labels), Some(values)) = (labels, values) else {
        warn!(label_column, value_column, "cannot rank: column missing");
        return Vec::new();
    };

    let mut ranked: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|v| (row, v)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(n)
        .map(|(row, value)| Bar {
            label: if labels.is_null(row) {
                String::new()
            } else {
                labels.value(row).to_string()
            },
            value,
        })
        .collect()
}

/// Displays a ranked chart somehow.
pub trait ChartRenderer {
    fn render(&self, chart: &BarChart) -> Result<(), PipelineError>;
}

/// Horizontal bar chart written as an SVG file.
pub struct SvgChartRenderer {
    pub path: PathBuf,
    pub size: (u32, u32),
}

impl SvgChartRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: (1200, 600),
        }
    }
}

fn render_err(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Render(e.to_string())
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &BarChart) -> Result<(), PipelineError> {
        if chart.bars.is_empty() {
            warn!("nothing to chart; skipped");
            return Ok(());
        }

        let n = chart.bars.len();
        let max = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
        let x_max = if max > 0.0 { max * 1.05 } else { 1.0 };

        // plotters' y axis grows upwards: rank 0 goes in the top slot.
        let slot = |rank: usize| n - 1 - rank;
        let label_for = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(y) if *y < n => chart.bars[slot(*y)].label.clone(),
            _ => String::new(),
        };

        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24).into_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(280)
            .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())
            .map_err(render_err)?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .x_desc(chart.x_label.as_str())
            .y_labels(n)
            .y_label_formatter(&label_for)
            .draw()
            .map_err(render_err)?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(rank, bar)| {
            let y = slot(rank);
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(y)),
                    (bar.value, SegmentValue::Exact(y + 1)),
                ],
                GREEN.filled(),
            )
        }))
        .map_err(render_err)?;

        root.present().map_err(render_err)?;
        info!(path = %self.path.display(), bars = n, "chart written");
        Ok(())
    }
}
