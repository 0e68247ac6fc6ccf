//! Grilse probability transformation
//!
//! Turns a validated grid into storable probability records. Probabilities
//! of zero or below mean "no data" for that weight/month and produce no
//! record; the range itself was already checked by the validator.

use chrono::Utc;
use uuid::Uuid;

use rcr_common::db::models::GrilseProbability;
use rcr_common::months::month_number;

use super::parser::CsvGrid;

/// Transform a validated grid into probability records for one season and
/// gate. Emission order is row-major, months in header order. Every record
/// from one call carries the same `version` timestamp, taken at call time.
pub fn transform_probabilities(grid: &CsvGrid, season: i64, gate_id: i64) -> Vec<GrilseProbability> {
    let mut records = Vec::new();
    let Some(header) = grid.first() else {
        return records;
    };

    let version = Utc::now();
    let months: Vec<Option<u32>> = header.iter().map(|cell| month_number(cell)).collect();

    for row in grid.iter().skip(1) {
        let Some(mass_cell) = row.first() else {
            continue;
        };
        let Ok(mass) = mass_cell.parse::<f64>() else {
            continue;
        };
        let mass_lbs = mass as i64;

        for (col_index, cell) in row.iter().enumerate().skip(1) {
            let Some(Some(month)) = months.get(col_index) else {
                continue;
            };
            let Ok(probability) = cell.parse::<f64>() else {
                continue;
            };
            if probability.is_finite() && probability > 0.0 {
                records.push(GrilseProbability {
                    id: Uuid::new_v4(),
                    season,
                    gate_id,
                    month: *month,
                    mass_lbs,
                    probability: cell.trim().to_string(),
                    version,
                });
            }
        }
    }

    records
}
