// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads the HR dataset with Polars and normalises the column
// types once, so later steps only ever see two dtypes:
//
//   String dtype          → String (trimmed, "" = missing)
//   everything else       → cast to Float64
//   NaN / ±inf / null     → missing
//
// A missing or malformed file is fatal for training; the error
// names the path.
//
// Reference: Polars user guide (CSV reading)

use std::{fs::File, path::Path};

use anyhow::{bail, Context, Result};
use polars::prelude::*;

use crate::domain::traits::TableSource;

/// Loads the training table from a CSV file with a header row.
pub struct CsvLoader {
    path: String,
}

impl CsvLoader {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn read_frame(&self) -> Result<DataFrame> {
        let path = Path::new(&self.path);
        if !path.is_file() {
            bail!("Dataset file '{}' does not exist", self.path);
        }

        let file = File::open(path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path))?;

        // Scan every row for schema inference; a late string value in
        // an otherwise numeric column must not break parsing.
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(file)
            .finish()
            .with_context(|| format!("Malformed CSV in '{}'", self.path))
    }
}

impl TableSource for CsvLoader {
    fn load_table(&self) -> Result<DataFrame> {
        let df = self.read_frame()?;
        if df.height() == 0 || df.width() == 0 {
            bail!("Dataset '{}' contains no rows", self.path);
        }

        let df = normalize(&df)
            .with_context(|| format!("Cannot convert columns of '{}'", self.path))?;

        tracing::info!(
            "Loaded {} rows x {} columns from '{}'",
            df.height(),
            df.width(),
            self.path
        );
        Ok(df)
    }
}

fn normalize(df: &DataFrame) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let name   = series.name().clone();

        let normalized = if let Ok(ca) = series.str() {
            let values: StringChunked = ca
                .into_iter()
                .map(|v| v.map(str::trim).filter(|s| !s.is_empty()))
                .collect();
            tracing::debug!("Column '{}' typed as categorical", name);
            values.with_name(name).into_series()
        } else {
            let cast = series
                .cast(&DataType::Float64)
                .with_context(|| format!("Column '{name}' is neither text nor numeric"))?;
            let values: Float64Chunked = cast
                .f64()
                .with_context(|| format!("Column '{name}' did not cast to Float64"))?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect();
            tracing::debug!("Column '{}' typed as numeric", name);
            values.with_name(name).into_series()
        };

        columns.push(normalized.into());
    }

    DataFrame::new(columns).context("Cannot rebuild the table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_types_and_missing_values() {
        let f = write_csv(
            "Age,Department,Attrition\n\
             30,Sales,Yes\n\
             ,Research & Development,No\n\
             45, ,No\n",
        );
        let df = CsvLoader::new(f.path().to_str().unwrap()).load_table().unwrap();

        assert_eq!(crate::data::table::column_names(&df), vec!["Age", "Department", "Attrition"]);

        let age: Vec<Option<f64>> = df.column("Age").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(age, vec![Some(30.0), None, Some(45.0)]);

        let dept: Vec<Option<&str>> = df.column("Department").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(dept, vec![Some("Sales"), Some("Research & Development"), None]);
    }

    #[test]
    fn test_integer_columns_become_float() {
        let f = write_csv("JobLevel,Attrition\n1,No\n3,Yes\n");
        let df = CsvLoader::new(f.path().to_str().unwrap()).load_table().unwrap();
        assert_eq!(df.column("JobLevel").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = CsvLoader::new("/definitely/not/here.csv").load_table().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn test_header_only_is_fatal() {
        let f = write_csv("Age,Attrition\n");
        assert!(CsvLoader::new(f.path().to_str().unwrap()).load_table().is_err());
    }
}
