//! Text-to-number coercion shared by the cleaner and the contract checks.

use polars::prelude::*;

/// Parses a fiscal year cell. Integer literals are accepted as-is; finite float
/// literals are truncated toward zero (`2023.0` and `2023.5` both give 2023).
pub fn parse_fiscal_year(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(year) = trimmed.parse::<i64>() {
        return Some(year);
    }

    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    // i64::MAX as f64 rounds up to 2^63, which does not fit in i64
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

/// Removes every literal `$` and `,` from an amount cell.
pub fn strip_currency(raw: &str) -> String {
    raw.chars().filter(|c| *c != '$' && *c != ',').collect()
}

/// Parses an amount cell after stripping currency symbols and thousands separators.
/// `NaN` and infinities are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let stripped = strip_currency(raw);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Reads a column through a cast to String so integer, float and text columns all go
/// through the same textual coercion. `None` when the column is absent.
pub(crate) fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Option<StringChunked>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let as_text = column.cast(&DataType::String)?;
    Ok(Some(as_text.str()?.clone()))
}
