//! Grilse probability CSV export
//!
//! The reverse path: stored records rendered back to CSV text for the
//! reporting endpoints.

use serde::Serialize;

/// Fixed header line, emitted even for an empty record set
pub const EXPORT_HEADER: &str = "Season,Gate,Month,Mass (lbs),Probability";

/// One exportable row: a stored probability joined with its gate's name
#[derive(Debug, Clone, Serialize)]
pub struct GrilseReportRow {
    pub season: i64,
    pub gate_name: Option<String>,
    pub month: u32,
    pub mass_lbs: i64,
    pub probability: String,
}

/// Render report rows as CSV text.
///
/// The probability column is emitted exactly as stored. Lines are joined
/// with a single newline and there is no trailing newline. Built via
/// collect-and-join so large exports stay linear.
pub fn export_csv(rows: &[GrilseReportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(EXPORT_HEADER.to_string());

    for row in rows {
        lines.push(format!(
            "{},{},{},{},{}",
            row.season,
            row.gate_name.as_deref().unwrap_or("Unknown"),
            row.month,
            row.mass_lbs,
            row.probability
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(season: i64, gate_name: Option<&str>, month: u32, mass: i64, prob: &str) -> GrilseReportRow {
        GrilseReportRow {
            season,
            gate_name: gate_name.map(|n| n.to_string()),
            month,
            mass_lbs: mass,
            probability: prob.to_string(),
        }
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(export_csv(&[]), EXPORT_HEADER);
    }

    #[test]
    fn test_rows_render_in_order_without_trailing_newline() {
        let csv = export_csv(&[
            row(2024, Some("Dee"), 1, 10, "0.2"),
            row(2024, Some("Dee"), 2, 10, "0.3"),
        ]);
        assert_eq!(
            csv,
            "Season,Gate,Month,Mass (lbs),Probability\n2024,Dee,1,10,0.2\n2024,Dee,2,10,0.3"
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_missing_gate_name_renders_unknown() {
        let csv = export_csv(&[row(2024, None, 1, 10, "0.5")]);
        assert!(csv.ends_with("2024,Unknown,1,10,0.5"));
    }

    #[test]
    fn test_probability_precision_preserved() {
        let csv = export_csv(&[row(2024, Some("Tamar"), 6, 8, "0.3300")]);
        assert!(csv.ends_with("0.3300"));
    }
}
