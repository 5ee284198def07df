use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::coerce::{parse_amount, parse_fiscal_year, text_column};
use crate::model::{Dataset, AGENCY_COLUMN, FISCAL_YEAR_COLUMN};
use crate::normalize::normalize_agency_name;

#[derive(Debug, Error)]
pub enum CleaningError {
    #[error("{dataset} data is missing required column '{column}'")]
    MissingColumn {
        dataset: Dataset,
        column: &'static str,
    },
    #[error("{dataset} row {row}: agency name is missing")]
    MissingAgency { dataset: Dataset, row: usize },
    #[error("{dataset} row {row}: cannot parse fiscal year {}", display_cell(.value))]
    MalformedFiscalYear {
        dataset: Dataset,
        row: usize,
        value: Option<String>,
    },
    #[error("{dataset} row {row}: cannot parse {column} {}", display_cell(.value))]
    MalformedAmount {
        dataset: Dataset,
        column: &'static str,
        row: usize,
        value: Option<String>,
    },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

fn display_cell(value: &Option<String>) -> String {
    match value {
        Some(text) => format!("{text:?}"),
        None => "<missing>".to_string(),
    }
}

pub fn clean_payroll_data(df: &DataFrame) -> Result<DataFrame, CleaningError> {
    clean_records(df, Dataset::Payroll)
}

pub fn clean_spending_data(df: &DataFrame) -> Result<DataFrame, CleaningError> {
    clean_records(df, Dataset::Spending)
}

/// Projects a raw payroll or spending frame onto `agency_key`, `fiscal_year` and the
/// dataset's amount column.
///
/// The whole frame is rejected on the first missing agency, unparseable fiscal year or
/// unparseable amount; rows are never skipped or null-filled. The input is only read.
pub fn clean_records(df: &DataFrame, dataset: Dataset) -> Result<DataFrame, CleaningError> {
    let agencies = required_column(df, dataset, AGENCY_COLUMN)?;
    let fiscal_years = required_column(df, dataset, FISCAL_YEAR_COLUMN)?;
    let amount_column = dataset.amount_source_column();
    let amounts = required_column(df, dataset, amount_column)?;

    let agency_keys = agencies
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(normalize_agency_name)
                .ok_or(CleaningError::MissingAgency { dataset, row })
        })
        .collect::<Result<Vec<String>, _>>()?;

    let years = fiscal_years
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .and_then(parse_fiscal_year)
                .ok_or_else(|| CleaningError::MalformedFiscalYear {
                    dataset,
                    row,
                    value: value.map(str::to_string),
                })
        })
        .collect::<Result<Vec<i64>, _>>()?;

    let totals = amounts
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .and_then(parse_amount)
                .ok_or_else(|| CleaningError::MalformedAmount {
                    dataset,
                    column: amount_column,
                    row,
                    value: value.map(str::to_string),
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let [key_name, year_name, amount_name] = dataset.output_columns();
    let cleaned = DataFrame::new(vec![
        Series::new(key_name.into(), agency_keys).into(),
        Series::new(year_name.into(), years).into(),
        Series::new(amount_name.into(), totals).into(),
    ])?;

    debug!(dataset = %dataset, rows = cleaned.height(), "cleaned records");

    Ok(cleaned)
}

fn required_column(
    df: &DataFrame,
    dataset: Dataset,
    name: &'static str,
) -> Result<StringChunked, CleaningError> {
    text_column(df, name)?.ok_or(CleaningError::MissingColumn {
        dataset,
        column: name,
    })
}
