use polars::prelude::*;
use serde::Serialize;

use crate::coerce::{parse_amount, parse_fiscal_year, text_column};
use crate::model::{Dataset, AGENCY_COLUMN, FISCAL_YEAR_COLUMN};

/// Findings from checking a raw frame against the input contract. Row indices are
/// 0-based data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractReport {
    pub rows: usize,
    pub missing_columns: Vec<String>,
    pub blank_agency_rows: Vec<usize>,
    pub bad_fiscal_year_rows: Vec<usize>,
    pub bad_amount_rows: Vec<usize>,
}

impl ContractReport {
    pub fn is_clean(&self) -> bool {
        self.missing_columns.is_empty()
            && self.blank_agency_rows.is_empty()
            && self.bad_fiscal_year_rows.is_empty()
            && self.bad_amount_rows.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.missing_columns.len()
            + self.blank_agency_rows.len()
            + self.bad_fiscal_year_rows.len()
            + self.bad_amount_rows.len()
    }
}

/// Collects every contract violation in a raw payroll or spending frame instead of
/// stopping at the first one. Diagnostic only: cleaning stays all-or-nothing.
pub fn inspect_raw_frame(df: &DataFrame, dataset: Dataset) -> PolarsResult<ContractReport> {
    let mut report = ContractReport {
        rows: df.height(),
        ..ContractReport::default()
    };

    for name in dataset.required_columns() {
        if df.column(name).is_err() {
            report.missing_columns.push(name.to_string());
        }
    }

    if let Some(agencies) = text_column(df, AGENCY_COLUMN)? {
        report.blank_agency_rows = failing_rows(&agencies, |value| !value.trim().is_empty());
    }

    if let Some(years) = text_column(df, FISCAL_YEAR_COLUMN)? {
        report.bad_fiscal_year_rows =
            failing_rows(&years, |value| parse_fiscal_year(value).is_some());
    }

    if let Some(amounts) = text_column(df, dataset.amount_source_column())? {
        report.bad_amount_rows = failing_rows(&amounts, |value| parse_amount(value).is_some());
    }

    Ok(report)
}

/// Rows that are null or fail `accept`.
fn failing_rows(values: &StringChunked, accept: impl Fn(&str) -> bool) -> Vec<usize> {
    values
        .into_iter()
        .enumerate()
        .filter(|(_, value)| !value.is_some_and(&accept))
        .map(|(row, _)| row)
        .collect()
}
