use std::collections::BTreeSet;
use std::path::PathBuf;

use nyc_recon_core::io::load_csv;
use nyc_recon_core::{
    clean_payroll_data, clean_records, clean_spending_data, CleaningError, Dataset,
};
use polars::prelude::*;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn column_names(df: &DataFrame) -> BTreeSet<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn single_payroll_row_is_normalized_and_typed() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Dept of Transportation"],
        "FiscalYear" => &["2023"],
        "TotalPay" => &["$65,000.00"],
    )?;

    let cleaned = clean_payroll_data(&raw).expect("clean payroll");

    assert_eq!(cleaned.height(), 1);
    assert_eq!(
        cleaned.column("agency_key")?.str()?.get(0),
        Some("dept of transportation")
    );
    assert_eq!(cleaned.column("fiscal_year")?.i64()?.get(0), Some(2023));
    assert_eq!(cleaned.column("total_pay")?.f64()?.get(0), Some(65000.0));

    Ok(())
}

#[test]
fn payroll_output_has_exactly_three_typed_columns() -> PolarsResult<()> {
    let raw = load_csv(fixture_path("payroll_sample.csv")).expect("load payroll fixture");
    let cleaned = clean_payroll_data(&raw).expect("clean payroll");

    let expected: BTreeSet<String> = Dataset::Payroll
        .output_columns()
        .into_iter()
        .map(String::from)
        .collect();
    assert!(expected.contains("total_pay"));
    assert_eq!(column_names(&cleaned), expected);
    assert_eq!(cleaned.column("fiscal_year")?.dtype(), &DataType::Int64);
    assert_eq!(cleaned.column("total_pay")?.dtype(), &DataType::Float64);
    assert_eq!(cleaned.column("agency_key")?.dtype(), &DataType::String);
    assert_eq!(cleaned.height(), raw.height());

    Ok(())
}

#[test]
fn spending_output_has_exactly_three_typed_columns() -> PolarsResult<()> {
    let raw = load_csv(fixture_path("spending_sample.csv")).expect("load spending fixture");
    let cleaned = clean_spending_data(&raw).expect("clean spending");

    let expected: BTreeSet<String> = ["agency_key", "fiscal_year", "total_spending"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(column_names(&cleaned), expected);
    assert_eq!(cleaned.column("fiscal_year")?.dtype(), &DataType::Int64);
    assert_eq!(cleaned.column("total_spending")?.dtype(), &DataType::Float64);
    assert_eq!(cleaned.height(), raw.height());

    let totals = cleaned.column("total_spending")?.f64()?;
    assert_eq!(totals.get(0), Some(1_500_000.0));
    assert_eq!(totals.get(2), Some(310_000.25));

    Ok(())
}

#[test]
fn fixture_agency_keys_match_across_datasets() {
    let payroll = clean_payroll_data(&load_csv(fixture_path("payroll_sample.csv")).unwrap())
        .expect("clean payroll");
    let spending = clean_spending_data(&load_csv(fixture_path("spending_sample.csv")).unwrap())
        .expect("clean spending");

    let keys = |df: &DataFrame| -> BTreeSet<String> {
        df.column("agency_key")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(String::from)
            .collect()
    };

    assert_eq!(keys(&payroll), keys(&spending));
    assert_eq!(keys(&payroll).len(), 3);
}

#[test]
fn non_numeric_amount_fails_whole_operation() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Dept of Transportation", "Police Department"],
        "FiscalYear" => &["2023", "2023"],
        "TotalPay" => &["$65,000.00", "N/A"],
    )?;

    let err = clean_payroll_data(&raw).unwrap_err();
    match err {
        CleaningError::MalformedAmount {
            dataset,
            column,
            row,
            value,
        } => {
            assert_eq!(dataset, Dataset::Payroll);
            assert_eq!(column, "TotalPay");
            assert_eq!(row, 1);
            assert_eq!(value.as_deref(), Some("N/A"));
        }
        other => panic!("unexpected error: {other}"),
    }

    Ok(())
}

#[test]
fn bad_amount_fixture_is_rejected() {
    let raw = load_csv(fixture_path("payroll_bad_amount.csv")).expect("load fixture");
    let err = clean_payroll_data(&raw).unwrap_err();
    assert!(matches!(err, CleaningError::MalformedAmount { row: 1, .. }));
    assert!(err.to_string().contains("N/A"));
}

#[test]
fn missing_amount_is_not_null_filled() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Police Department", "Fire Department"],
        "FiscalYear" => &[2023i64, 2023],
        "TotalSpending" => &[Some("$10.00"), None],
    )?;

    let err = clean_spending_data(&raw).unwrap_err();
    assert!(matches!(
        err,
        CleaningError::MalformedAmount {
            row: 1,
            value: None,
            ..
        }
    ));
    assert!(err.to_string().contains("<missing>"));

    Ok(())
}

#[test]
fn non_numeric_fiscal_year_fails() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Police Department"],
        "FiscalYear" => &["FY2023"],
        "TotalPay" => &["$1.00"],
    )?;

    let err = clean_payroll_data(&raw).unwrap_err();
    assert!(matches!(
        err,
        CleaningError::MalformedFiscalYear { row: 0, .. }
    ));
    assert!(err.to_string().contains("fiscal year"));

    Ok(())
}

#[test]
fn numeric_input_columns_are_accepted() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Police Department", "Fire Department"],
        "FiscalYear" => &[2023.0f64, 2024.0],
        "TotalPay" => &[1000.5f64, 20.0],
    )?;

    let cleaned = clean_payroll_data(&raw).expect("clean numeric columns");
    let years = cleaned.column("fiscal_year")?.i64()?;
    let totals = cleaned.column("total_pay")?.f64()?;

    assert_eq!(years.get(0), Some(2023));
    assert_eq!(years.get(1), Some(2024));
    assert_eq!(totals.get(0), Some(1000.5));

    Ok(())
}

#[test]
fn fractional_fiscal_year_is_truncated() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Parks"],
        "FiscalYear" => &[2023.5f64],
        "TotalPay" => &["$1.00"],
    )?;

    let cleaned = clean_payroll_data(&raw).expect("clean fractional year");

    assert_eq!(cleaned.height(), 1);
    assert_eq!(cleaned.column("fiscal_year")?.i64()?.get(0), Some(2023));
    assert_eq!(cleaned.column("total_pay")?.f64()?.get(0), Some(1.0));

    Ok(())
}

#[test]
fn infinite_amount_fails() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Parks"],
        "FiscalYear" => &["2023"],
        "TotalSpending" => &["-inf"],
    )?;

    let err = clean_spending_data(&raw).unwrap_err();
    assert!(matches!(err, CleaningError::MalformedAmount { row: 0, .. }));

    Ok(())
}

#[test]
fn missing_required_column_is_reported() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["Police Department"],
        "FiscalYear" => &["2023"],
        "TotalPay" => &["$1.00"],
    )?;

    let err = clean_records(&raw, Dataset::Spending).unwrap_err();
    assert!(matches!(
        err,
        CleaningError::MissingColumn {
            column: "TotalSpending",
            ..
        }
    ));

    Ok(())
}

#[test]
fn null_agency_is_rejected() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &[None, Some("Police Department")],
        "FiscalYear" => &["2023", "2023"],
        "TotalPay" => &["$1.00", "$2.00"],
    )?;

    let err = clean_payroll_data(&raw).unwrap_err();
    assert!(matches!(err, CleaningError::MissingAgency { row: 0, .. }));

    Ok(())
}

#[test]
fn input_frame_is_left_untouched() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => &["  Dept of Transportation "],
        "FiscalYear" => &["2023"],
        "TotalPay" => &["$65,000.00"],
        "Title" => &["Engineer"],
    )?;
    let snapshot = raw.clone();

    clean_payroll_data(&raw).expect("clean payroll");

    assert!(raw.equals(&snapshot));
    assert_eq!(raw.width(), 4);

    Ok(())
}

#[test]
fn empty_frame_cleans_to_empty_frame() -> PolarsResult<()> {
    let raw = df!(
        "Agency" => Vec::<&str>::new(),
        "FiscalYear" => Vec::<i64>::new(),
        "TotalPay" => Vec::<&str>::new(),
    )?;

    let cleaned = clean_payroll_data(&raw).expect("clean empty frame");
    assert_eq!(cleaned.height(), 0);
    assert_eq!(cleaned.width(), 3);

    Ok(())
}
