//! Grilse CSV parsing
//!
//! Converts a raw upload body into a rectangular grid of string cells.
//! No semantic validation happens here; the validators operate on the grid.

use csv::{ReaderBuilder, Trim};

use super::GrilseError;

/// Parsed CSV content: ordered rows of ordered string cells.
/// Row 0 is the header row.
pub type CsvGrid = Vec<Vec<String>>;

/// Parse a raw upload body into a `CsvGrid`.
///
/// The body must be non-empty UTF-8 text with at least one non-blank line;
/// anything else is rejected as `EmptyOrInvalidFile` before CSV parsing is
/// attempted. Blank lines are skipped; quoted fields and embedded commas
/// follow standard CSV rules.
pub fn parse_csv(raw: &[u8]) -> Result<CsvGrid, GrilseError> {
    if raw.is_empty() {
        return Err(GrilseError::EmptyOrInvalidFile);
    }

    let text = std::str::from_utf8(raw).map_err(|_| GrilseError::EmptyOrInvalidFile)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(GrilseError::EmptyOrInvalidFile);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut grid: CsvGrid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|_| GrilseError::EmptyOrInvalidFile)?;
        let row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        grid.push(row);
    }

    if grid.is_empty() {
        return Err(GrilseError::EmptyOrInvalidFile);
    }

    Ok(grid)
}
