use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Ok(Self::Parquet),
            _ => bail!(
                "cannot infer output format from {}; pass --format",
                path.display()
            ),
        }
    }
}

pub fn write_frame(df: &DataFrame, path: &Path, format: Option<OutputFormat>) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => OutputFormat::from_path(path)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut frame = df.clone();

    match format {
        OutputFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut frame)
                .context("failed to write csv output")?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Zstd(None))
                .with_statistics(StatisticsOptions::full())
                .finish(&mut frame)
                .context("failed to write parquet output")?;
        }
    }

    info!(path = %path.display(), rows = df.height(), format = ?format, "wrote output");
    Ok(())
}

/// Renders the first `limit` rows as a terminal table.
pub fn preview_table(df: &DataFrame, limit: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| Cell::new(name.as_str())),
    );

    let columns = df.get_columns();
    for row in 0..df.height().min(limit) {
        let cells = columns.iter().map(|column| match column.get(row) {
            Ok(AnyValue::Null) | Err(_) => Cell::new(""),
            Ok(AnyValue::String(text)) => Cell::new(text),
            Ok(value) => Cell::new(value.to_string()),
        });
        table.add_row(cells);
    }

    table
}
