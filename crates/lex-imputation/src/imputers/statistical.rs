//! Statistical imputation methods.
//!
//! Provides global-mean and class-conditional-mean imputation. Column
//! statistics are computed with polars over the dataset's transposed view.

use super::{Imputer, fill_missing};
use crate::config::{ClassLabel, ImputationMethod};
use crate::error::{ImputationError, Result};
use crate::types::{CompletedMatrix, Dataset};
use crate::utils::format_value;
use polars::prelude::*;
use tracing::{debug, warn};

/// Fills each missing attribute cell with the mean of its column.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanImputer;

impl MeanImputer {
    /// Mean of every attribute column over its present values.
    ///
    /// `None` marks a column without a single observed value.
    pub fn column_means(dataset: &Dataset) -> Vec<Option<f64>> {
        (0..dataset.n_attributes())
            .map(|j| dataset.transposed().mean(j))
            .collect()
    }
}

impl Imputer for MeanImputer {
    fn method(&self) -> ImputationMethod {
        ImputationMethod::Mean
    }

    fn impute(&self, dataset: &Dataset) -> Result<CompletedMatrix> {
        let means = Self::column_means(dataset);

        let completed = fill_missing(dataset, |_, j| {
            means[j].ok_or_else(|| ImputationError::UndefinedMean {
                column: dataset.column_name(j).to_string(),
                scope: "all rows".to_string(),
            })
        })?;

        debug!(
            "Filled {} cells of '{}' with column means",
            completed.filled_cells(),
            dataset.name()
        );
        Ok(completed)
    }
}

/// Per-class column means.
///
/// Classes are the distinct label codes present in the dataset, in order of
/// first appearance. Rows without a label contribute to no class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMeans {
    classes: Vec<f64>,
    // means[column][class]
    means: Vec<Vec<Option<f64>>>,
}

impl ClassMeans {
    /// Compute the means of every attribute column for every class.
    ///
    /// Each class selects its rows with a mask over the label column; a null
    /// label never matches.
    pub fn compute(dataset: &Dataset) -> Result<Self> {
        let view = dataset.transposed();
        let labels = view.column(dataset.label_column());

        let mut classes: Vec<f64> = Vec::new();
        for code in labels.into_iter().flatten() {
            if !classes.contains(&code) {
                classes.push(code);
            }
        }
        let masks: Vec<BooleanChunked> = classes.iter().map(|&code| labels.equal(code)).collect();

        let means = (0..dataset.n_attributes())
            .map(|j| {
                masks
                    .iter()
                    .map(|mask| Ok(view.column(j).filter(mask)?.mean()))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { classes, means })
    }

    /// Class codes found in the dataset.
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Mean of `column` over the rows of class `code`.
    ///
    /// `None` when the class is unknown or has no observed value there.
    pub fn mean(&self, column: usize, code: f64) -> Option<f64> {
        let k = self.classes.iter().position(|c| *c == code)?;
        self.means.get(column).and_then(|per_class| per_class[k])
    }
}

/// Fills each missing attribute cell with the column mean over rows that
/// share the row's class label.
///
/// A row whose own label is missing has no class to condition on and falls
/// back to the global column mean.
#[derive(Debug, Clone, Default)]
pub struct ConditionalMeanImputer {
    class_labels: Vec<ClassLabel>,
}

impl ConditionalMeanImputer {
    /// `class_labels` is used to name classes in error messages.
    pub fn new(class_labels: Vec<ClassLabel>) -> Self {
        Self { class_labels }
    }

    fn class_name(&self, code: f64) -> String {
        match self.class_labels.iter().find(|label| label.code == code) {
            Some(label) => format!("class '{}'", label.symbol),
            None => format!("class {}", format_value(code, 4)),
        }
    }
}

impl Imputer for ConditionalMeanImputer {
    fn method(&self) -> ImputationMethod {
        ImputationMethod::ConditionalMean
    }

    fn impute(&self, dataset: &Dataset) -> Result<CompletedMatrix> {
        let class_means = ClassMeans::compute(dataset)?;
        let global_means = MeanImputer::column_means(dataset);
        let mut unlabeled_fills = 0usize;

        let completed = fill_missing(dataset, |i, j| match dataset.class_of(i) {
            Some(code) => {
                class_means
                    .mean(j, code)
                    .ok_or_else(|| ImputationError::UndefinedMean {
                        column: dataset.column_name(j).to_string(),
                        scope: self.class_name(code),
                    })
            }
            None => {
                unlabeled_fills += 1;
                global_means[j].ok_or_else(|| ImputationError::UndefinedMean {
                    column: dataset.column_name(j).to_string(),
                    scope: "all rows".to_string(),
                })
            }
        })?;

        if unlabeled_fills > 0 {
            warn!(
                "{} cells of '{}' belong to rows without a class label; filled with global means",
                unlabeled_fills,
                dataset.name()
            );
        }
        debug!(
            "Filled {} cells of '{}' with conditional means over {} classes",
            completed.filled_cells(),
            dataset.name(),
            class_means.classes().len()
        );
        Ok(completed)
    }
}
