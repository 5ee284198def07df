use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::clean::clean_records;
use crate::error::Result;
use crate::model::Dataset;

/// Reads a headered CSV with the reader's default schema inference. All columns and
/// the file's row order are preserved.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(file)
        .finish()?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded csv"
    );

    Ok(df)
}

pub fn load_payroll_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    load_csv(path)
}

pub fn load_spending_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    load_csv(path)
}

/// Loads and cleans in one step.
pub fn load_and_clean(path: impl AsRef<Path>, dataset: Dataset) -> Result<DataFrame> {
    let raw = load_csv(path)?;
    Ok(clean_records(&raw, dataset)?)
}
