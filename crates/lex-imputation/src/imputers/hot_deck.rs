use super::{Imputer, fill_missing};
use crate::config::ImputationMethod;
use crate::distance::{ColumnScope, DistanceMetric};
use crate::error::{ImputationError, Result};
use crate::types::{CompletedMatrix, Dataset};
use tracing::{debug, warn};

/// Hot-deck imputer: copies each missing value from the nearest other row.
///
/// The nearest row ("best match") of a row is searched once, over all
/// columns, the first time the row needs a value, and reused for every other
/// missing cell of that row. When the best match lacks the needed column a
/// sub-search looks for the nearest row, over attribute columns only, that
/// has a value there.
///
/// The conditional variant restricts both searches to rows with the same
/// class label. If no such row qualifies it repeats the search over all
/// rows before giving up.
pub struct HotDeckImputer {
    conditional: bool,
}

impl HotDeckImputer {
    /// Search among all rows.
    pub fn unconditional() -> Self {
        Self { conditional: false }
    }

    /// Search among rows of the target's class first.
    pub fn conditional() -> Self {
        Self { conditional: true }
    }

    /// Whether searches for `row` are restricted to its class.
    ///
    /// A row without a label has no class to restrict to.
    fn class_aware_for(&self, dataset: &Dataset, row: usize) -> bool {
        self.conditional && dataset.class_of(row).is_some()
    }

    /// Row closest to `target` over all columns.
    pub fn find_nearest(&self, dataset: &Dataset, target: usize) -> Result<usize> {
        let metric = DistanceMetric::new(
            ColumnScope::AllColumns,
            self.class_aware_for(dataset, target),
        );

        if let Some(best) = nearest_row(dataset, target, metric, |_| true) {
            return Ok(best);
        }
        if metric.class_aware {
            warn!(
                "Row {} of '{}' has no other row in its class; searching all rows",
                target,
                dataset.name()
            );
            if let Some(best) = nearest_row(dataset, target, metric.unconditional(), |_| true) {
                return Ok(best);
            }
        }
        Err(ImputationError::NoNeighbor { row: target })
    }

    /// Value of `column` taken from the row closest to `target`, over
    /// attribute columns, among rows that have a value there.
    pub fn find_donor_value(&self, dataset: &Dataset, target: usize, column: usize) -> Result<f64> {
        let metric = DistanceMetric::new(
            ColumnScope::AttributesOnly,
            self.class_aware_for(dataset, target),
        );
        let has_value = |row: usize| !dataset.is_missing(row, column);

        let mut donor = nearest_row(dataset, target, metric, has_value);
        if donor.is_none() && metric.class_aware {
            debug!(
                "No row in the class of row {} has '{}'; searching all rows",
                target,
                dataset.column_name(column)
            );
            donor = nearest_row(dataset, target, metric.unconditional(), has_value);
        }

        donor
            .and_then(|row| dataset.value(row, column))
            .ok_or_else(|| ImputationError::UnresolvedValue {
                row: target,
                column: dataset.column_name(column).to_string(),
            })
    }
}

impl Imputer for HotDeckImputer {
    fn method(&self) -> ImputationMethod {
        if self.conditional {
            ImputationMethod::ConditionalHotDeck
        } else {
            ImputationMethod::HotDeck
        }
    }

    fn impute(&self, dataset: &Dataset) -> Result<CompletedMatrix> {
        // Lives for this run only; never shared between datasets or runs.
        let mut best_match: Vec<Option<usize>> = vec![None; dataset.n_rows()];
        let mut sub_searches = 0usize;

        let completed = fill_missing(dataset, |i, j| {
            let best = match best_match[i] {
                Some(best) => best,
                None => {
                    let best = self.find_nearest(dataset, i)?;
                    best_match[i] = Some(best);
                    best
                }
            };

            match dataset.value(best, j) {
                Some(value) => Ok(value),
                None => {
                    sub_searches += 1;
                    self.find_donor_value(dataset, i, j)
                }
            }
        })?;

        debug!(
            "Filled {} cells of '{}' by {} ({} best matches, {} sub-searches)",
            completed.filled_cells(),
            dataset.name(),
            self.method(),
            best_match.iter().filter(|m| m.is_some()).count(),
            sub_searches
        );
        Ok(completed)
    }
}

/// Scan every admitted row other than `target` that passes `accept` and
/// return the one at minimum distance. Ties go to the first row scanned.
fn nearest_row<F>(
    dataset: &Dataset,
    target: usize,
    metric: DistanceMetric,
    accept: F,
) -> Option<usize>
where
    F: Fn(usize) -> bool,
{
    let mut best: Option<(usize, f64)> = None;

    for candidate in 0..dataset.n_rows() {
        if !metric.admits(dataset, target, candidate) || !accept(candidate) {
            continue;
        }
        let distance = metric.distance(dataset, target, candidate);
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(row, _)| row)
}
