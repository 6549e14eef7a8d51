//! Row dissimilarity over partially observed rows.
//!
//! Each evaluated column contributes the squared difference of the two
//! values, or a fixed penalty of `1` when either side is missing. The
//! distance is the square root of the sum. Class-aware comparisons exclude
//! rows with a different label entirely instead of penalising them.

use crate::types::{Cell, Dataset};

/// Contribution of a column where at least one of the two rows is missing.
pub const MISSING_PENALTY: f64 = 1.0;

/// Which columns a distance evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnScope {
    /// Every column, the class label included.
    AllColumns,
    /// Attribute columns only; the label is left out.
    AttributesOnly,
}

impl ColumnScope {
    /// Number of leading columns evaluated for a row of `n_columns` cells.
    pub fn width(&self, n_columns: usize) -> usize {
        match self {
            Self::AllColumns => n_columns,
            Self::AttributesOnly => n_columns.saturating_sub(1),
        }
    }
}

/// Distance between the first `width` cells of two rows.
pub fn row_distance(a: &[Cell], b: &[Cell], width: usize) -> f64 {
    a.iter()
        .zip(b)
        .take(width)
        .map(|pair| match pair {
            (Some(x), Some(y)) => (x - y).powi(2),
            _ => MISSING_PENALTY,
        })
        .sum::<f64>()
        .sqrt()
}

/// Distance metric used by the hot-deck searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceMetric {
    pub scope: ColumnScope,
    pub class_aware: bool,
}

impl DistanceMetric {
    pub fn new(scope: ColumnScope, class_aware: bool) -> Self {
        Self { scope, class_aware }
    }

    /// Same metric with class awareness switched off.
    pub fn unconditional(self) -> Self {
        Self {
            class_aware: false,
            ..self
        }
    }

    /// Whether `b` may be compared with `a` at all.
    ///
    /// A row is never a candidate for itself. Under class awareness the two
    /// labels must be equal; two missing labels count as equal.
    pub fn admits(&self, dataset: &Dataset, a: usize, b: usize) -> bool {
        a != b && (!self.class_aware || dataset.class_of(a) == dataset.class_of(b))
    }

    /// Distance between rows `a` and `b`, or infinity when the class filter
    /// excludes the pair.
    pub fn distance(&self, dataset: &Dataset, a: usize, b: usize) -> f64 {
        debug_assert_ne!(a, b, "a row is never compared with itself");
        if !self.admits(dataset, a, b) {
            return f64::INFINITY;
        }
        row_distance(
            dataset.row(a),
            dataset.row(b),
            self.scope.width(dataset.n_columns()),
        )
    }
}
