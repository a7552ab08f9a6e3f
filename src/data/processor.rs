//! Data Processor Module
//! Derives calendar columns (year, month) from the raw date column.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;

pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{column}' not found")]
    ColumnMissing { column: String },
    #[error("Row {row}: cannot parse '{value}' as a calendar date")]
    DateParse { row: usize, value: String },
}

/// Handles column derivation on a loaded table.
pub struct DataProcessor;

impl DataProcessor {
    /// Append both `year` and `month`.
    pub fn derive_calendar_columns(
        df: DataFrame,
        date_col: &str,
    ) -> Result<DataFrame, ProcessorError> {
        let df = Self::add_year_column(df, date_col)?;
        Self::add_month_column(df, date_col)
    }

    /// Append `year`: the first 4 characters of the raw date string, verbatim.
    pub fn add_year_column(mut df: DataFrame, date_col: &str) -> Result<DataFrame, ProcessorError> {
        let dates = Self::date_strings(&df, date_col)?;
        let years: Vec<Option<String>> = (&dates)
            .into_iter()
            .map(|v| v.map(|s| s.chars().take(4).collect()))
            .collect();

        df.with_column(Column::new(YEAR_COLUMN.into(), years))?;
        log::debug!("Derived '{}' from '{}'", YEAR_COLUMN, date_col);
        Ok(df)
    }

    /// Append `month`: abbreviated month name of the parsed date.
    ///
    /// Aborts on the first value that is not a calendar date. Null dates map
    /// to null months.
    pub fn add_month_column(
        mut df: DataFrame,
        date_col: &str,
    ) -> Result<DataFrame, ProcessorError> {
        let dates = Self::date_strings(&df, date_col)?;
        let mut months: Vec<Option<String>> = Vec::with_capacity(dates.len());

        for (row, value) in (&dates).into_iter().enumerate() {
            let month = match value {
                Some(raw) => {
                    let date = Self::parse_date(raw).ok_or_else(|| ProcessorError::DateParse {
                        row,
                        value: raw.to_string(),
                    })?;
                    Some(date.format("%b").to_string())
                }
                None => None,
            };
            months.push(month);
        }

        df.with_column(Column::new(MONTH_COLUMN.into(), months))?;
        log::debug!("Derived '{}' from '{}'", MONTH_COLUMN, date_col);
        Ok(df)
    }

    /// Parse a date string that starts with a 4-digit year.
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|dt| dt.date())
            })
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    }

    /// The date column as strings; non-string dtypes are cast first.
    fn date_strings(df: &DataFrame, date_col: &str) -> Result<StringChunked, ProcessorError> {
        let column = df
            .column(date_col)
            .map_err(|_| ProcessorError::ColumnMissing {
                column: date_col.to_string(),
            })?;
        let as_string = column.cast(&DataType::String)?;
        Ok(as_string.str()?.clone())
    }
}
