//! Imputation quality scoring.
//!
//! The only measure is the mean absolute error between imputed values and a
//! complete reference dataset, taken over the cells that were missing in the
//! incomplete input.

use crate::error::{ImputationError, Result};
use crate::types::{CompletedMatrix, Dataset, ensure_same_columns};
use crate::utils::{format_value, missing_attributes};
use serde::Serialize;
use std::fmt;

/// Accumulated absolute error over the imputed cells of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaeScore {
    pub total_absolute_error: f64,
    pub scored_cells: usize,
}

impl MaeScore {
    /// The mean absolute error, or `None` when no cell was imputed.
    pub fn value(&self) -> Option<f64> {
        if self.scored_cells == 0 {
            None
        } else {
            Some(self.total_absolute_error / self.scored_cells as f64)
        }
    }
}

impl fmt::Display for MaeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(mae) => write!(f, "{:.4}", mae),
            None => write!(f, "undefined"),
        }
    }
}

/// Score `completed` against `reference` over the cells missing in `original`.
///
/// All three must have the same shape and the same column names in the same
/// order. A scored cell that is still missing in
/// `completed`, or missing in `reference`, is an error.
pub fn mean_absolute_error(
    completed: &CompletedMatrix,
    original: &Dataset,
    reference: &Dataset,
) -> Result<MaeScore> {
    original.ensure_aligned(reference)?;
    if completed.shape() != original.shape() {
        let (found_rows, found_cols) = completed.shape();
        return Err(ImputationError::ShapeMismatch {
            expected_rows: original.n_rows(),
            expected_cols: original.n_columns(),
            found_rows,
            found_cols,
        });
    }
    ensure_same_columns(original.feature_names(), completed.feature_names())?;

    let mut score = MaeScore {
        total_absolute_error: 0.0,
        scored_cells: 0,
    };

    for (i, row) in original.rows().iter().enumerate() {
        for j in missing_attributes(row, original.n_attributes()) {
            let imputed = completed
                .value(i, j)
                .ok_or_else(|| ImputationError::UnresolvedValue {
                    row: i,
                    column: original.column_name(j).to_string(),
                })?;
            let expected =
                reference
                    .value(i, j)
                    .ok_or_else(|| ImputationError::IncompleteReference {
                        row: i,
                        column: reference.column_name(j).to_string(),
                    })?;

            score.total_absolute_error += (imputed - expected).abs();
            score.scored_cells += 1;
        }
    }

    Ok(score)
}

/// Render a score line as printed after a batch, e.g. `MAE_20_mean = 0.1234`.
pub fn score_line(dataset: &str, method_key: &str, mae: Option<f64>) -> String {
    match mae {
        Some(value) => format!("MAE_{}_{} = {}", dataset, method_key, format_value(value, 4)),
        None => format!("MAE_{}_{} = undefined", dataset, method_key),
    }
}
