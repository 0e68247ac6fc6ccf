//! Grilse CSV validation
//!
//! Checks the parsed grid for structural and semantic problems. Errors are
//! accumulated across the whole grid and reported as one batch so an
//! uploader can fix an entire spreadsheet in a single round trip. Row and
//! column positions are 1-based; the header is row 1.

use std::collections::HashSet;

use serde::Serialize;

use rcr_common::months::month_number;

use super::parser::CsvGrid;

/// Kinds of validation failure, serialized verbatim into the `errors` array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CsvErrorKind {
    MissingWeightHeader,
    ColumnDisallowed,
    DuplicateHeaders,
    MissingMonthHeader,
    RowHeaderDiscrepancy,
    NotWholeNumber,
    DuplicateWeight,
    InvalidProbability,
}

/// One validation failure at a grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CsvError {
    #[serde(rename = "errorType")]
    pub error_type: CsvErrorKind,
    pub row: usize,
    pub col: usize,
}

impl CsvError {
    fn new(error_type: CsvErrorKind, row: usize, col: usize) -> Self {
        Self { error_type, row, col }
    }
}

/// Validate the whole grid.
///
/// Header rules run first; data rows are only checked when the header is
/// clean (row errors against a broken header would be noise). Within each
/// stage every violation is collected before failing.
pub fn validate_grid(grid: &CsvGrid) -> Result<(), Vec<CsvError>> {
    let Some(header) = grid.first() else {
        // The parser never produces an empty grid
        return Ok(());
    };

    let mut errors = Vec::new();

    validate_headers(header, &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }

    validate_rows(grid, header.len(), &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(())
}

/// Header row rules, case-insensitive:
/// - column 1 must be WEIGHT
/// - every later column must be a canonical month name
/// - a month may appear only once (every repeat is flagged)
/// - at least one distinct month column must remain
fn validate_headers(header: &[String], errors: &mut Vec<CsvError>) {
    let weight_ok = header
        .first()
        .map(|cell| cell.to_uppercase() == "WEIGHT")
        .unwrap_or(false);
    if !weight_ok {
        errors.push(CsvError::new(CsvErrorKind::MissingWeightHeader, 1, 1));
    }

    let mut seen_months: HashSet<u32> = HashSet::new();
    for (index, cell) in header.iter().enumerate().skip(1) {
        match month_number(cell) {
            Some(month) => {
                if !seen_months.insert(month) {
                    errors.push(CsvError::new(CsvErrorKind::DuplicateHeaders, 1, index + 1));
                }
            }
            None => {
                errors.push(CsvError::new(CsvErrorKind::ColumnDisallowed, 1, index + 1));
            }
        }
    }

    if seen_months.is_empty() {
        errors.push(CsvError::new(
            CsvErrorKind::MissingMonthHeader,
            1,
            header.len(),
        ));
    }
}

/// Data row rules. Runs only when the header passed.
fn validate_rows(grid: &CsvGrid, header_len: usize, errors: &mut Vec<CsvError>) {
    let mut seen_weights: HashSet<i64> = HashSet::new();

    for (index, row) in grid.iter().enumerate().skip(1) {
        let row_number = index + 1;

        if row.len() != header_len {
            // The row's shape doesn't match: point one past the longer side
            errors.push(CsvError::new(
                CsvErrorKind::RowHeaderDiscrepancy,
                row_number,
                row.len().max(header_len) + 1,
            ));
        }

        if let Some(weight_cell) = row.first() {
            match parse_whole_number(weight_cell) {
                Some(weight) => {
                    // First occurrence is exempt; only repeats are flagged
                    if !seen_weights.insert(weight) {
                        errors.push(CsvError::new(CsvErrorKind::DuplicateWeight, row_number, 1));
                    }
                }
                None => {
                    errors.push(CsvError::new(CsvErrorKind::NotWholeNumber, row_number, 1));
                }
            }
        }

        for (col_index, cell) in row.iter().enumerate().skip(1).take(header_len - 1) {
            if !is_valid_probability(cell) {
                errors.push(CsvError::new(
                    CsvErrorKind::InvalidProbability,
                    row_number,
                    col_index + 1,
                ));
            }
        }
    }
}

/// Parse a weight cell: must be numeric with no fractional part
fn parse_whole_number(cell: &str) -> Option<i64> {
    let value: f64 = cell.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// A probability cell must parse as a number in the closed interval [0, 1]
fn is_valid_probability(cell: &str) -> bool {
    cell.parse::<f64>()
        .map(|value| (0.0..=1.0).contains(&value))
        .unwrap_or(false)
}
