//! Imputation module for filling missing values.
//!
//! This module provides the four imputation strategies:
//! - Mean and class-conditional mean imputation
//! - Hot-deck and class-conditional hot-deck imputation
//!
//! Every imputer reads a [`Dataset`] and returns a fresh [`CompletedMatrix`];
//! the input is never modified.

mod hot_deck;
mod statistical;

pub use hot_deck::HotDeckImputer;
pub use statistical::{ConditionalMeanImputer, MeanImputer};

use crate::config::{ClassLabel, ImputationMethod};
use crate::error::Result;
use crate::types::{CompletedMatrix, Dataset};
use crate::utils::missing_attributes;

/// A strategy that completes a dataset.
pub trait Imputer: Send + Sync {
    /// Which strategy this is.
    fn method(&self) -> ImputationMethod;

    /// Fill every missing attribute cell of `dataset`.
    fn impute(&self, dataset: &Dataset) -> Result<CompletedMatrix>;
}

/// Create the imputer for a method.
///
/// `class_labels` is only used to name classes in error messages.
pub fn imputer_for(method: ImputationMethod, class_labels: &[ClassLabel]) -> Box<dyn Imputer> {
    match method {
        ImputationMethod::Mean => Box::new(MeanImputer),
        ImputationMethod::ConditionalMean => {
            Box::new(ConditionalMeanImputer::new(class_labels.to_vec()))
        }
        ImputationMethod::HotDeck => Box::new(HotDeckImputer::unconditional()),
        ImputationMethod::ConditionalHotDeck => Box::new(HotDeckImputer::conditional()),
    }
}

/// Copy `dataset` and fill each missing attribute cell with `fill(row, column)`.
///
/// Cells are visited row by row, left to right, so a stateful `fill` sees
/// every missing cell of a row before moving to the next row. The label
/// column is copied through untouched.
pub(crate) fn fill_missing<F>(dataset: &Dataset, mut fill: F) -> Result<CompletedMatrix>
where
    F: FnMut(usize, usize) -> Result<f64>,
{
    let n_attributes = dataset.n_attributes();
    let mut rows = Vec::with_capacity(dataset.n_rows());
    let mut filled_cells = 0;

    for (i, source) in dataset.rows().iter().enumerate() {
        let mut row = source.clone();
        for j in missing_attributes(source, n_attributes) {
            row[j] = Some(fill(i, j)?);
            filled_cells += 1;
        }
        rows.push(row);
    }

    Ok(CompletedMatrix::new(
        dataset.feature_names().to_vec(),
        rows,
        filled_cells,
    ))
}
