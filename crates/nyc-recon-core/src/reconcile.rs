use std::collections::BTreeSet;

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::model::{Dataset, AGENCY_KEY, FISCAL_YEAR};

pub const SPENDING_MINUS_PAY: &str = "spending_minus_pay";

/// Joins cleaned payroll and spending frames on exact (`agency_key`, `fiscal_year`).
///
/// Amounts are summed per key within each dataset before a full outer join, so keys
/// present on one side only keep a null for the other side's total. Output columns:
/// `agency_key`, `fiscal_year`, `total_pay`, `total_spending`, `spending_minus_pay`,
/// sorted by agency key then fiscal year.
pub fn reconcile(payroll: &DataFrame, spending: &DataFrame) -> PolarsResult<DataFrame> {
    let pay_col = Dataset::Payroll.amount_column();
    let spend_col = Dataset::Spending.amount_column();

    let joined = totals_by_key(payroll, Dataset::Payroll)
        .join(
            totals_by_key(spending, Dataset::Spending),
            [col(AGENCY_KEY), col(FISCAL_YEAR)],
            [col(AGENCY_KEY), col(FISCAL_YEAR)],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .select([
            col(AGENCY_KEY),
            col(FISCAL_YEAR),
            col(pay_col),
            col(spend_col),
            (col(spend_col) - col(pay_col)).alias(SPENDING_MINUS_PAY),
        ])
        .sort([AGENCY_KEY, FISCAL_YEAR], SortMultipleOptions::default())
        .collect()?;

    debug!(rows = joined.height(), "reconciled payroll and spending");

    Ok(joined)
}

fn totals_by_key(df: &DataFrame, dataset: Dataset) -> LazyFrame {
    let amount = dataset.amount_column();
    df.clone()
        .lazy()
        .group_by([col(AGENCY_KEY), col(FISCAL_YEAR)])
        .agg([col(amount).sum().alias(amount)])
}

/// Agency keys split by which cleaned dataset mentions them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyCoverage {
    pub shared: Vec<String>,
    pub payroll_only: Vec<String>,
    pub spending_only: Vec<String>,
}

impl KeyCoverage {
    /// True when both datasets mention exactly the same agencies.
    pub fn is_exact_match(&self) -> bool {
        self.payroll_only.is_empty() && self.spending_only.is_empty()
    }
}

pub fn agency_key_coverage(payroll: &DataFrame, spending: &DataFrame) -> PolarsResult<KeyCoverage> {
    let payroll_keys = key_set(payroll)?;
    let spending_keys = key_set(spending)?;

    Ok(KeyCoverage {
        shared: payroll_keys.intersection(&spending_keys).cloned().collect(),
        payroll_only: payroll_keys.difference(&spending_keys).cloned().collect(),
        spending_only: spending_keys.difference(&payroll_keys).cloned().collect(),
    })
}

fn key_set(df: &DataFrame) -> PolarsResult<BTreeSet<String>> {
    Ok(df
        .column(AGENCY_KEY)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}
