//! Statistics Calculator Module
//! Descriptive statistics over numeric columns and box plot statistics.

use crate::data::DataLoader;
use polars::prelude::*;
use statrs::statistics::Statistics;

/// Row labels of the summary table, in display order.
pub const STATISTIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Statistics for a single numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            name: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl ColumnStats {
    /// Values in `STATISTIC_LABELS` order.
    pub fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.median,
            self.p75,
            self.max,
        ]
    }
}

/// Summary of every numeric column of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub columns: Vec<ColumnStats>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Display table: one row per statistic, one column per numeric field.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        if self.is_empty() {
            return Ok(DataFrame::default());
        }

        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new("statistic".into(), STATISTIC_LABELS.to_vec()));
        for stats in &self.columns {
            columns.push(Column::new(stats.name.as_str().into(), stats.as_row().to_vec()));
        }

        DataFrame::new(columns)
    }
}

/// Box plot statistics for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Describe every numeric column; non-numeric columns are skipped.
    pub fn describe(df: &DataFrame) -> Summary {
        let columns = df
            .get_columns()
            .iter()
            .filter(|col| DataLoader::is_numeric(col.dtype()))
            .map(|col| {
                let values = Self::column_values(col);
                let mut stats = Self::compute_descriptive_stats(&values);
                stats.name = col.name().to_string();
                stats
            })
            .collect();

        Summary { columns }
    }

    /// Non-null, non-NaN values of a column as f64.
    pub fn column_values(col: &Column) -> Vec<f64> {
        col.cast(&DataType::Float64)
            .ok()
            .map(|as_f64| {
                as_f64
                    .f64()
                    .map(|ca| {
                        ca.into_iter()
                            .flatten()
                            .filter(|v| !v.is_nan())
                            .collect::<Vec<f64>>()
                    })
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::default();
        }

        let sorted = Self::sorted(values);

        ColumnStats {
            name: String::new(),
            count: n,
            mean: values.iter().mean(),
            // sample standard deviation; NaN for a single value
            std: values.iter().std_dev(),
            min: Statistics::min(values.iter()),
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: Statistics::max(values.iter()),
        }
    }

    /// Box, whiskers and outliers for one category. `None` when there are no values.
    pub fn compute_box_stats(label: &str, values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxStats {
            label: label.to_string(),
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }
}
