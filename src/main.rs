//! EDA 401k - Exploratory analysis of 401k contributions
//!
//! Loads the raw CSV, derives `year` and `month` from the date column,
//! prints summary statistics and renders the amount distribution per month.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::{Context, Result};
use charts::{ChartData, StaticChartRenderer};
use config::{AnalysisConfig, CONFIG_FILE};
use data::{DataLoader, DataProcessor, MONTH_COLUMN};
use gui::BoxPlotViewer;
use std::path::Path;
use stats::StatsCalculator;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalysisConfig::load_or_default(Path::new(CONFIG_FILE))?;
    run(&config)
}

fn run(config: &AnalysisConfig) -> Result<()> {
    let df = DataLoader::load_csv(&config.input_path).context("Loading dataset")?;
    println!("{}", df.head(Some(config.head_rows)));

    log::debug!("Columns: {:?}", DataLoader::column_names(&df));
    log::debug!("Numeric columns: {:?}", DataLoader::numeric_columns(&df));

    let df = DataProcessor::derive_calendar_columns(df, &config.date_column)
        .context("Deriving calendar columns")?;
    println!("{}", df.head(Some(config.preview_rows)));
    log::info!("Derived columns added, table is {} x {}", df.height(), df.width());

    let summary = StatsCalculator::describe(&df);
    if summary.is_empty() {
        println!("No numeric columns to summarize");
    } else {
        println!("{}", summary.to_dataframe()?);
    }
    if let Some(amount) = summary.column(&config.value_column) {
        log::info!(
            "{}: n={} mean={:.2} median={:.2}",
            amount.name,
            amount.count,
            amount.mean,
            amount.median
        );
    }

    let chart = ChartData::from_dataframe(&df, MONTH_COLUMN, &config.value_column, config.month_order)
        .context("Grouping values by month")?;
    StaticChartRenderer::render_boxplot(&chart, &config.figure_path, config.figure_size)
        .context("Rendering box plot")?;

    if config.show_window {
        BoxPlotViewer::new(chart, summary).run()?;
    }

    Ok(())
}
