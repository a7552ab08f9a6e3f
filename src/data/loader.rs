//! CSV Data Loader Module
//! Reads the raw dataset into a Polars DataFrame.

use polars::prelude::*;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows scanned for dtype inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot access {path}: {source}")]
    FileAccess { path: PathBuf, source: io::Error },
    #[error("Failed to parse CSV {path}: {source}")]
    Parse { path: PathBuf, source: PolarsError },
}

/// Loads delimited text files with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row.
    ///
    /// The file is opened before any parsing so a missing or unreadable path
    /// fails without a partial read. The handle is dropped on return.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if path.is_dir() {
            return Err(LoaderError::FileAccess {
                path: path.to_path_buf(),
                source: io::Error::other("is a directory"),
            });
        }

        let file = File::open(path).map_err(|source| LoaderError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|source| LoaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    /// Column names in table order.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Names of the columns with a numeric dtype.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| Self::is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    pub fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn write_csv(content: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn loads_header_and_every_data_line() -> Result<()> {
        let file = write_csv(
            "id,date,401k_amount\n\
             1,2021-01-05,500.0\n\
             2,2021-02-10,600.0\n\
             3,2021-02-28,650.5\n",
        )?;

        let df = DataLoader::load_csv(file.path())?;
        assert_eq!(df.height(), 3);
        assert_eq!(
            DataLoader::column_names(&df),
            vec!["id", "date", "401k_amount"]
        );
        Ok(())
    }

    #[test]
    fn infers_numeric_and_string_columns() -> Result<()> {
        let file = write_csv("id,name,date,401k_amount\n1,Ann,2021-01-05,500.0\n2,Bob,2021-02-10,600\n")?;

        let df = DataLoader::load_csv(file.path())?;
        assert_eq!(df.column("id")?.dtype(), &DataType::Int64);
        assert_eq!(df.column("401k_amount")?.dtype(), &DataType::Float64);
        assert_eq!(df.column("date")?.dtype(), &DataType::String);
        assert_eq!(DataLoader::numeric_columns(&df), vec!["id", "401k_amount"]);
        Ok(())
    }

    #[test]
    fn missing_path_is_file_access_error() -> Result<()> {
        let dir = tempdir()?;
        let err = DataLoader::load_csv(&dir.path().join("MOCK_DATA.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileAccess { .. }));
        Ok(())
    }

    #[test]
    fn directory_is_file_access_error() -> Result<()> {
        let dir = tempdir()?;
        let err = DataLoader::load_csv(dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::FileAccess { .. }));
        Ok(())
    }

    #[test]
    fn ragged_rows_are_parse_errors() -> Result<()> {
        let file = write_csv("id,date\n1,2021-01-05\n2,2021-02-10,600.0,extra\n")?;

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
        Ok(())
    }
}
