//! Chart Plotter Module
//! Groups values by category and draws the interactive box plot with egui_plot.

use crate::charts::PALETTE_RGB;
use crate::config::MonthOrder;
use crate::data::DataLoader;
use crate::stats::{BoxStats, StatsCalculator};
use egui::Color32;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

const PLOT_HEIGHT: f32 = 400.0;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{column}' not found")]
    ColumnMissing { column: String },
    #[error("Column '{column}' is not numeric ({dtype})")]
    NotNumeric { column: String, dtype: DataType },
    #[error("Cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Chart window failed: {0}")]
    Window(String),
}

/// Values of one numeric column grouped by a categorical column.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub title: String,
    pub group_col: String,
    pub value_col: String,
    /// Categories in x-axis order
    pub group_order: Vec<String>,
    pub data_by_group: HashMap<String, Vec<f64>>,
}

impl ChartData {
    /// Group `value_col` by `group_col`. Rows with a null category or a
    /// missing value are dropped.
    pub fn from_dataframe(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
        order: MonthOrder,
    ) -> Result<Self, ChartError> {
        let groups = Self::require_column(df, group_col)?.cast(&DataType::String)?;
        let values = Self::require_column(df, value_col)?;
        if !DataLoader::is_numeric(values.dtype()) {
            return Err(ChartError::NotNumeric {
                column: value_col.to_string(),
                dtype: values.dtype().clone(),
            });
        }
        let values = values.cast(&DataType::Float64)?;

        let mut group_order: Vec<String> = Vec::new();
        let mut data_by_group: HashMap<String, Vec<f64>> = HashMap::new();

        for (group, value) in groups.str()?.into_iter().zip(values.f64()?.into_iter()) {
            let (Some(group), Some(value)) = (group, value) else {
                continue;
            };
            if value.is_nan() {
                continue;
            }
            if !data_by_group.contains_key(group) {
                group_order.push(group.to_string());
            }
            data_by_group
                .entry(group.to_string())
                .or_default()
                .push(value);
        }

        if order == MonthOrder::Calendar {
            // stable: unknown labels keep their appearance order after Dec
            group_order.sort_by_key(|g| Self::calendar_rank(g));
        }

        log::debug!(
            "Grouped '{}' by '{}' into {} categories",
            value_col,
            group_col,
            group_order.len()
        );

        Ok(Self {
            title: format!("{} by {}", value_col, group_col),
            group_col: group_col.to_string(),
            value_col: value_col.to_string(),
            group_order,
            data_by_group,
        })
    }

    /// Box statistics per category, in x-axis order.
    pub fn box_stats(&self) -> Vec<BoxStats> {
        self.group_order
            .iter()
            .filter_map(|group| {
                let values = self.data_by_group.get(group)?;
                StatsCalculator::compute_box_stats(group, values)
            })
            .collect()
    }

    fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ChartError> {
        df.column(name).map_err(|_| ChartError::ColumnMissing {
            column: name.to_string(),
        })
    }

    fn calendar_rank(label: &str) -> usize {
        MONTHS
            .iter()
            .position(|m| *m == label)
            .unwrap_or(MONTHS.len())
    }
}

/// Draws box plots using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a category.
    pub fn get_group_color(group_index: usize) -> Color32 {
        let (r, g, b) = PALETTE_RGB[group_index % PALETTE_RGB.len()];
        Color32::from_rgb(r, g, b)
    }

    /// Draw one box per category with outlier points.
    /// X-axis: categories, Y-axis: values
    pub fn draw_boxplot_chart(ui: &mut egui::Ui, chart_data: &ChartData) {
        let boxes = chart_data.box_stats();

        let x_labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();

        Plot::new(format!("boxplot_{}", chart_data.value_col))
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart_data.group_col.clone())
            .y_axis_label(chart_data.value_col.clone())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < x_labels.len() && (mark.value - idx).abs() < 1e-6 {
                    x_labels[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, stats) in boxes.iter().enumerate() {
                    let color = Self::get_group_color(i);
                    let x = i as f64;

                    let box_elem = BoxElem::new(
                        x,
                        BoxSpread::new(
                            stats.whisker_low,
                            stats.q1,
                            stats.median,
                            stats.q3,
                            stats.whisker_high,
                        ),
                    )
                    .box_width(0.6)
                    .whisker_width(0.3)
                    .fill(color.gamma_multiply(0.5))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&stats.label));

                    if !stats.outliers.is_empty() {
                        let points: PlotPoints =
                            stats.outliers.iter().map(|&y| [x, y]).collect();
                        plot_ui.points(
                            Points::new(points)
                                .radius(3.0)
                                .filled(false)
                                .color(Color32::DARK_GRAY),
                        );
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn month_table() -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Column::new("month".into(), vec![Some("Mar"), Some("Jan"), Some("Mar"), None, Some("Jan"), Some("Feb")]),
            Column::new("401k_amount".into(), vec![Some(300.0), Some(100.0), Some(310.0), Some(999.0), None, Some(200.0)]),
        ])?)
    }

    #[test]
    fn groups_follow_appearance_order() -> Result<()> {
        let chart = ChartData::from_dataframe(&month_table()?, "month", "401k_amount", MonthOrder::Appearance)?;

        assert_eq!(chart.group_order, vec!["Mar", "Jan", "Feb"]);
        assert_eq!(chart.data_by_group["Mar"], vec![300.0, 310.0]);
        assert_eq!(chart.data_by_group["Jan"], vec![100.0]);
        Ok(())
    }

    #[test]
    fn calendar_order_sorts_months() -> Result<()> {
        let chart = ChartData::from_dataframe(&month_table()?, "month", "401k_amount", MonthOrder::Calendar)?;
        assert_eq!(chart.group_order, vec!["Jan", "Feb", "Mar"]);

        let labels: Vec<String> = chart.box_stats().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar"]);
        Ok(())
    }

    #[test]
    fn unknown_labels_sort_last() -> Result<()> {
        let df = DataFrame::new(vec![
            Column::new("month".into(), vec!["later", "Dec", "Jan"]),
            Column::new("401k_amount".into(), vec![1.0, 2.0, 3.0]),
        ])?;

        let chart = ChartData::from_dataframe(&df, "month", "401k_amount", MonthOrder::Calendar)?;
        assert_eq!(chart.group_order, vec!["Jan", "Dec", "later"]);
        Ok(())
    }

    #[test]
    fn non_numeric_value_column_is_rejected() -> Result<()> {
        let df = DataFrame::new(vec![
            Column::new("month".into(), vec!["Jan", "Feb"]),
            Column::new("name".into(), vec!["Ann", "Bob"]),
        ])?;

        let err = ChartData::from_dataframe(&df, "month", "name", MonthOrder::Appearance).unwrap_err();
        assert!(matches!(err, ChartError::NotNumeric { ref column, .. } if column == "name"));
        Ok(())
    }

    #[test]
    fn integer_value_column_is_accepted() -> Result<()> {
        let df = DataFrame::new(vec![
            Column::new("month".into(), vec!["Jan", "Jan"]),
            Column::new("401k_amount".into(), vec![500i64, 700]),
        ])?;

        let chart = ChartData::from_dataframe(&df, "month", "401k_amount", MonthOrder::Appearance)?;
        assert_eq!(chart.data_by_group["Jan"], vec![500.0, 700.0]);
        Ok(())
    }

    #[test]
    fn missing_value_column() -> Result<()> {
        let err = ChartData::from_dataframe(&month_table()?, "month", "amount", MonthOrder::Appearance)
            .unwrap_err();
        assert!(matches!(err, ChartError::ColumnMissing { ref column } if column == "amount"));
        Ok(())
    }
}
