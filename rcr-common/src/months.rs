//! Canonical month table
//!
//! One process-wide ordered list of month names (index + 1 = month number).
//! The grilse CSV header validator, the probability transformer, and the
//! small-catch month handling all resolve months through this table so the
//! orderings can never diverge.

/// Canonical month names, January first. Uppercase is the comparison form.
pub const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Resolve a month name to its 1-based number, case-insensitive.
pub fn month_number(name: &str) -> Option<u32> {
    let upper = name.trim().to_uppercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == upper)
        .map(|i| i as u32 + 1)
}

/// Resolve a 1-based month number to its canonical name.
pub fn month_name(number: u32) -> Option<&'static str> {
    if (1..=12).contains(&number) {
        Some(MONTH_NAMES[number as usize - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_number_case_insensitive() {
        assert_eq!(month_number("January"), Some(1));
        assert_eq!(month_number("JANUARY"), Some(1));
        assert_eq!(month_number("december"), Some(12));
        assert_eq!(month_number(" june "), Some(6));
    }

    #[test]
    fn test_month_number_rejects_unknown() {
        assert_eq!(month_number("Januar"), None);
        assert_eq!(month_number(""), None);
        assert_eq!(month_number("Weight"), None);
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("JANUARY"));
        assert_eq!(month_name(12), Some("DECEMBER"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_table_round_trips() {
        for (i, name) in MONTH_NAMES.iter().enumerate() {
            assert_eq!(month_number(name), Some(i as u32 + 1));
        }
    }
}
