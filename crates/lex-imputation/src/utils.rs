//! Shared utilities for the imputation engine.
//!
//! Row helpers used by more than one imputer, and the number formatting
//! shared by the writer and the score output.

use crate::types::Cell;

// =============================================================================
// Row Helpers
// =============================================================================

/// Positions of the missing cells in a row, restricted to the first
/// `n_attributes` columns.
pub fn missing_attributes(row: &[Cell], n_attributes: usize) -> impl Iterator<Item = usize> + '_ {
    row.iter()
        .take(n_attributes)
        .enumerate()
        .filter(|(_, cell)| cell.is_none())
        .map(|(j, _)| j)
}

// =============================================================================
// Number Formatting
// =============================================================================

/// Format a number with at most `decimal_places` decimals, trimming trailing
/// zeros and a dangling decimal point.
///
/// # Example
///
/// ```rust,ignore
/// use lex_imputation::utils::format_value;
///
/// assert_eq!(format_value(1.50, 4), "1.5");
/// assert_eq!(format_value(2.0, 4), "2");
/// assert_eq!(format_value(0.123456, 4), "0.1235");
/// ```
pub fn format_value(value: f64, decimal_places: usize) -> String {
    let mut formatted = format!("{:.*}", decimal_places, value);
    if formatted.contains('.') {
        let trimmed_len = formatted.trim_end_matches('0').trim_end_matches('.').len();
        formatted.truncate(trimmed_len);
    }
    if formatted == "-0" {
        formatted = "0".to_string();
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Row helper tests
    // ========================================================================

    #[test]
    fn test_missing_attributes_excludes_label() {
        let row = vec![None, Some(1.0), None, None];
        let missing: Vec<usize> = missing_attributes(&row, 3).collect();
        assert_eq!(missing, vec![0, 2]);
    }

    // ========================================================================
    // format_value() tests
    // ========================================================================

    #[test]
    fn test_format_value_trims_zeros() {
        assert_eq!(format_value(1.5, 4), "1.5");
        assert_eq!(format_value(2.0, 4), "2");
        assert_eq!(format_value(10.0, 4), "10");
        assert_eq!(format_value(100.25, 4), "100.25");
    }

    #[test]
    fn test_format_value_rounds() {
        assert_eq!(format_value(0.123456, 4), "0.1235");
        assert_eq!(format_value(0.99999, 4), "1");
    }

    #[test]
    fn test_format_value_negative() {
        assert_eq!(format_value(-1.0, 4), "-1");
        assert_eq!(format_value(-0.00001, 4), "0");
    }

    #[test]
    fn test_format_value_zero_places() {
        assert_eq!(format_value(3.6, 0), "4");
        assert_eq!(format_value(30.0, 0), "30");
    }
}
