use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const AGENCY_COLUMN: &str = "Agency";
pub const FISCAL_YEAR_COLUMN: &str = "FiscalYear";

pub const AGENCY_KEY: &str = "agency_key";
pub const FISCAL_YEAR: &str = "fiscal_year";

/// The two raw record layouts. They share `Agency` and `FiscalYear` and differ only in
/// the name of the amount column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Payroll,
    Spending,
}

impl Dataset {
    /// Amount column as it appears in the raw CSV header.
    pub fn amount_source_column(&self) -> &'static str {
        match self {
            Dataset::Payroll => "TotalPay",
            Dataset::Spending => "TotalSpending",
        }
    }

    /// Amount column name in the cleaned output.
    pub fn amount_column(&self) -> &'static str {
        match self {
            Dataset::Payroll => "total_pay",
            Dataset::Spending => "total_spending",
        }
    }

    pub fn required_columns(&self) -> [&'static str; 3] {
        [AGENCY_COLUMN, FISCAL_YEAR_COLUMN, self.amount_source_column()]
    }

    pub fn output_columns(&self) -> [&'static str; 3] {
        [AGENCY_KEY, FISCAL_YEAR, self.amount_column()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Payroll => "payroll",
            Dataset::Spending => "spending",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown dataset '{0}' (expected 'payroll' or 'spending')")]
pub struct ParseDatasetError(pub String);

impl FromStr for Dataset {
    type Err = ParseDatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payroll" => Ok(Dataset::Payroll),
            "spending" => Ok(Dataset::Spending),
            _ => Err(ParseDatasetError(s.to_string())),
        }
    }
}
