//! CSV loader for earnings history.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Values are
//! trimmed before parsing.
//!
//! | Column          | Required | Type    | Notes                                                  |
//! |-----------------|----------|---------|--------------------------------------------------------|
//! | `year`          | yes      | integer | Calendar year from 1900 to 2200, e.g. `2023`           |
//! | `salary`        | yes      | decimal | `$` prefix and comma separators allowed (quote commas); at most 1,000,000,000 |
//! | `visa_category` | no       | string  | `working`, `student`, `skilled`, `temporary`, `other`; empty means `working` |
//!
//! ### Example
//!
//! ```csv
//! year,salary,visa_category
//! 2022,"48,000",working
//! 2023,61000.50,skilled
//! 2024,55000,
//! ```
//!
//! Years between the earliest and latest row that have no row of their own
//! are left blank when the history is applied to a session.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use super_core::input::{MAX_SALARY, parse_decimal};
use super_core::{
    EarningsRecord, EstimatorSession, MAX_YEAR, MIN_YEAR, SessionError, VisaCategory,
    is_plausible_year,
};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    year: i32,
    salary: String,
    visa_category: Option<String>,
}

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Structurally invalid CSV, a missing required column or a
    /// non-integer year.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `salary` cell that is not an amount. Rows are 1-based, header
    /// excluded.
    #[error("invalid salary '{value}' on row {row}")]
    InvalidSalary { value: String, row: usize },

    #[error("negative salary {value} on row {row}")]
    NegativeSalary { value: Decimal, row: usize },

    #[error("salary {value} on row {row} exceeds the maximum of {max}")]
    SalaryTooLarge {
        value: Decimal,
        max: Decimal,
        row: usize,
    },

    #[error("year {year} on row {row} is outside {min} to {max}")]
    YearOutOfRange {
        year: i32,
        min: i32,
        max: i32,
        row: usize,
    },

    #[error("unrecognised visa category '{value}' on row {row}")]
    InvalidVisaCategory { value: String, row: usize },

    #[error("year {year} appears again on row {row}")]
    DuplicateYear { year: i32, row: usize },

    #[error("no earnings rows found")]
    Empty,
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<EarningsRecord, CsvLoadError> {
    if !is_plausible_year(row.year) {
        return Err(CsvLoadError::YearOutOfRange {
            year: row.year,
            min: MIN_YEAR,
            max: MAX_YEAR,
            row: row_number,
        });
    }

    let salary = parse_decimal(&row.salary).map_err(|_| CsvLoadError::InvalidSalary {
        value: row.salary.clone(),
        row: row_number,
    })?;
    if salary < Decimal::ZERO {
        return Err(CsvLoadError::NegativeSalary {
            value: salary,
            row: row_number,
        });
    }
    if salary > MAX_SALARY {
        return Err(CsvLoadError::SalaryTooLarge {
            value: salary,
            max: MAX_SALARY,
            row: row_number,
        });
    }

    let visa_category = match row.visa_category.as_deref().map(str::trim) {
        None | Some("") => VisaCategory::default(),
        Some(code) => {
            VisaCategory::parse(code).ok_or_else(|| CsvLoadError::InvalidVisaCategory {
                value: code.to_string(),
                row: row_number,
            })?
        }
    };

    Ok(EarningsRecord::new(row.year, salary, visa_category))
}

/// Parses CSV text into earnings records, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is malformed.
/// * [`CsvLoadError::InvalidSalary`], [`CsvLoadError::NegativeSalary`],
///   [`CsvLoadError::SalaryTooLarge`], [`CsvLoadError::YearOutOfRange`] or
///   [`CsvLoadError::InvalidVisaCategory`] for a bad cell.
/// * [`CsvLoadError::DuplicateYear`] if a year has two rows.
/// * [`CsvLoadError::Empty`] if there are no data rows.
pub fn load_from_str(input: &str) -> Result<Vec<EarningsRecord>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let mut records: Vec<EarningsRecord> = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row_number = idx + 1;
        let record = convert_row(result?, row_number)?;
        if records.iter().any(|r| r.year == record.year) {
            return Err(CsvLoadError::DuplicateYear {
                year: record.year,
                row: row_number,
            });
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(CsvLoadError::Empty);
    }
    debug!(rows = records.len(), "parsed earnings CSV");
    Ok(records)
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<EarningsRecord>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

/// Sets the session's range to span `records` and copies each record onto
/// its year.
pub fn apply_to_session(
    session: &mut EstimatorSession,
    records: &[EarningsRecord],
) -> Result<(), SessionError> {
    let (Some(first), Some(last)) = (
        records.iter().map(|r| r.year).min(),
        records.iter().map(|r| r.year).max(),
    ) else {
        return Ok(());
    };

    session.set_arrival(first);
    session.set_departure(last);

    let range = session.range();
    for (index, _) in range.years().enumerate() {
        session.set_salary_amount(index, Decimal::ZERO)?;
        session.set_visa_category(index, VisaCategory::default())?;
    }
    for record in records {
        if let Some(index) = range.position(record.year) {
            session.set_salary_amount(index, record.salary)?;
            session.set_visa_category(index, record.visa_category)?;
        }
    }
    Ok(())
}
