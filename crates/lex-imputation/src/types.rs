//! Core data types: the loaded dataset, its column-major view and the
//! completed matrix produced by an imputer.
//!
//! A cell is an `Option<f64>`; `None` marks a missing value. The last column
//! of every row is the class label, stored as its numeric class code.

use crate::error::{ImputationError, Result};
use polars::prelude::*;

/// A single matrix cell. `None` is a missing value.
pub type Cell = Option<f64>;

/// Column-major copy of a dataset's cells, one `Float64Chunked` per column.
///
/// Built once from the row-major matrix and never modified afterwards.
/// Missing cells are nulls, so polars aggregates skip them.
#[derive(Debug, Clone)]
pub struct TransposedView {
    columns: Vec<Float64Chunked>,
}

impl TransposedView {
    fn from_rows(feature_names: &[String], rows: &[Vec<Cell>]) -> Self {
        let columns = feature_names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                Float64Chunked::from_iter_options(name.as_str().into(), rows.iter().map(|r| r[j]))
            })
            .collect();
        Self { columns }
    }

    /// Cells of column `j`, indexed by row.
    pub fn column(&self, j: usize) -> &Float64Chunked {
        &self.columns[j]
    }

    /// Mean of the present values of column `j`.
    ///
    /// `None` when the column has no observed value.
    pub fn mean(&self, j: usize) -> Option<f64> {
        self.columns[j].mean()
    }

    /// Number of missing cells in column `j`.
    pub fn missing_count(&self, j: usize) -> usize {
        self.columns[j].null_count()
    }
}

impl PartialEq for TransposedView {
    fn eq(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.len() == b.len() && a.into_iter().eq(b.into_iter()))
    }
}

/// An immutable feature matrix with a trailing class-label column.
///
/// Row `i` refers to the same logical object in every dataset loaded from
/// the same source family, so a dataset and its reference can be compared
/// cell by cell once [`Dataset::ensure_aligned`] has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    feature_names: Vec<String>,
    rows: Vec<Vec<Cell>>,
    transposed: TransposedView,
}

// Imputers only ever read a dataset, so one loaded dataset may be shared
// across threads.
static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    /// Build a dataset from feature names and row-major cells.
    ///
    /// Requires at least one attribute column plus the label column, at least
    /// one row, and every row as wide as the header.
    pub fn new(
        name: impl Into<String>,
        feature_names: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self> {
        let name = name.into();
        let n_columns = feature_names.len();

        if n_columns < 2 {
            return Err(ImputationError::EmptyDataset(format!(
                "'{}' needs at least one attribute column and a class column, found {} column(s)",
                name, n_columns
            )));
        }
        if rows.is_empty() {
            return Err(ImputationError::EmptyDataset(format!(
                "'{}' has no data rows",
                name
            )));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_columns) {
            return Err(ImputationError::MalformedRow {
                file: name,
                line: i + 2,
                expected: n_columns,
                found: row.len(),
            });
        }

        let transposed = TransposedView::from_rows(&feature_names, &rows);
        Ok(Self {
            name,
            feature_names,
            rows,
            transposed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Name of column `j`.
    pub fn column_name(&self, j: usize) -> &str {
        &self.feature_names[j]
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns including the class label.
    pub fn n_columns(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of attribute columns (all but the label).
    pub fn n_attributes(&self) -> usize {
        self.n_columns() - 1
    }

    /// Index of the trailing class-label column.
    pub fn label_column(&self) -> usize {
        self.n_columns() - 1
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_columns())
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &[Cell] {
        &self.rows[i]
    }

    pub fn value(&self, i: usize, j: usize) -> Cell {
        self.rows[i][j]
    }

    pub fn is_missing(&self, i: usize, j: usize) -> bool {
        self.rows[i][j].is_none()
    }

    /// Class code of row `i`, if present.
    pub fn class_of(&self, i: usize) -> Cell {
        self.rows[i][self.label_column()]
    }

    pub fn transposed(&self) -> &TransposedView {
        &self.transposed
    }

    /// Count of missing attribute cells (the label column is not counted).
    pub fn missing_attribute_cells(&self) -> usize {
        (0..self.n_attributes())
            .map(|j| self.transposed.missing_count(j))
            .sum()
    }

    /// Fail unless `other` has the same shape and the same column names in
    /// the same order.
    pub fn ensure_aligned(&self, other: &Dataset) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(ImputationError::ShapeMismatch {
                expected_rows: self.n_rows(),
                expected_cols: self.n_columns(),
                found_rows: other.n_rows(),
                found_cols: other.n_columns(),
            });
        }
        ensure_same_columns(&self.feature_names, &other.feature_names)
    }
}

/// Fail at the first position where two column lists disagree.
pub(crate) fn ensure_same_columns(expected: &[String], found: &[String]) -> Result<()> {
    match expected.iter().zip(found).position(|(a, b)| a != b) {
        Some(position) => Err(ImputationError::ColumnMismatch {
            position,
            expected: expected[position].clone(),
            found: found[position].clone(),
        }),
        None => Ok(()),
    }
}

/// Output of one imputer run.
///
/// Same shape as the input dataset. Attribute cells are either copied from
/// the input or filled; the label column is copied through untouched, so it
/// only holds `None` where the input label was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedMatrix {
    feature_names: Vec<String>,
    rows: Vec<Vec<Cell>>,
    filled_cells: usize,
}

impl CompletedMatrix {
    pub(crate) fn new(
        feature_names: Vec<String>,
        rows: Vec<Vec<Cell>>,
        filled_cells: usize,
    ) -> Self {
        Self {
            feature_names,
            rows,
            filled_cells,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn value(&self, i: usize, j: usize) -> Cell {
        self.rows[i][j]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.feature_names.len())
    }

    /// Number of cells the imputer filled.
    pub fn filled_cells(&self) -> usize {
        self.filled_cells
    }

    /// Reinterpret the completed matrix as a new dataset, e.g. to feed it to
    /// another imputer.
    pub fn into_dataset(self, name: impl Into<String>) -> Result<Dataset> {
        Dataset::new(name, self.feature_names, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    #[test]
    fn test_new_builds_transposed_view() {
        let rows = vec![
            vec![Some(1.0), None, Some(2.0)],
            vec![Some(3.0), Some(4.0), Some(3.0)],
        ];
        let dataset = Dataset::new("d", names(3), rows).unwrap();

        assert_eq!(dataset.shape(), (2, 3));
        let first: Vec<Cell> = dataset.transposed().column(0).into_iter().collect();
        let second: Vec<Cell> = dataset.transposed().column(1).into_iter().collect();
        assert_eq!(first, vec![Some(1.0), Some(3.0)]);
        assert_eq!(second, vec![None, Some(4.0)]);
        assert_eq!(dataset.transposed().missing_count(1), 1);
        assert_eq!(dataset.class_of(1), Some(3.0));
        assert_eq!(dataset.label_column(), 2);
        assert_eq!(dataset.n_attributes(), 2);
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let rows = vec![vec![Some(1.0), Some(2.0)], vec![Some(1.0)]];
        let err = Dataset::new("d", names(2), rows).unwrap_err();
        assert!(matches!(
            err,
            ImputationError::MalformedRow {
                line: 3,
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_new_rejects_single_column() {
        let err = Dataset::new("d", names(1), vec![vec![Some(2.0)]]).unwrap_err();
        assert!(matches!(err, ImputationError::EmptyDataset(_)));
    }

    #[test]
    fn test_new_rejects_no_rows() {
        let err = Dataset::new("d", names(2), vec![]).unwrap_err();
        assert!(matches!(err, ImputationError::EmptyDataset(_)));
    }

    #[test]
    fn test_transposed_mean_skips_missing() {
        let rows = vec![
            vec![Some(1.0), None, Some(2.0)],
            vec![None, None, Some(2.0)],
            vec![Some(5.0), None, Some(3.0)],
        ];
        let dataset = Dataset::new("d", names(3), rows).unwrap();

        assert_eq!(dataset.transposed().mean(0), Some(3.0));
        assert_eq!(dataset.transposed().mean(1), None);
    }

    #[test]
    fn test_transposed_mean_keeps_negative_one() {
        // -1 is an ordinary value, not a missing marker
        let rows = vec![vec![Some(-1.0), Some(2.0)], vec![Some(3.0), Some(2.0)]];
        let dataset = Dataset::new("d", names(2), rows).unwrap();
        assert_eq!(dataset.transposed().mean(0), Some(1.0));
    }

    #[test]
    fn test_missing_attribute_cells_ignores_label() {
        let rows = vec![vec![None, Some(1.0), None], vec![Some(1.0), None, Some(2.0)]];
        let dataset = Dataset::new("d", names(3), rows).unwrap();
        assert_eq!(dataset.missing_attribute_cells(), 2);
        assert!(dataset.is_missing(0, 0));
        assert!(!dataset.is_missing(0, 1));
    }

    #[test]
    fn test_ensure_aligned() {
        let a = Dataset::new("a", names(2), vec![vec![Some(1.0), Some(2.0)]]).unwrap();
        let b = Dataset::new(
            "b",
            names(2),
            vec![vec![Some(1.0), Some(2.0)], vec![Some(1.0), Some(3.0)]],
        )
        .unwrap();
        assert!(a.ensure_aligned(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_aligned(&b).unwrap_err(),
            ImputationError::ShapeMismatch { found_rows: 2, .. }
        ));
    }

    #[test]
    fn test_ensure_aligned_rejects_reordered_columns() {
        let header = |names: [&str; 3]| names.iter().map(|n| n.to_string()).collect();
        let a = Dataset::new("a", header(["a", "b", "class"]), vec![vec![Some(1.0); 3]]).unwrap();
        let b = Dataset::new("b", header(["b", "a", "class"]), vec![vec![Some(1.0); 3]]).unwrap();

        let err = a.ensure_aligned(&b).unwrap_err();

        assert_eq!(err.error_code(), "COLUMN_MISMATCH");
        match err {
            ImputationError::ColumnMismatch {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 0);
                assert_eq!(expected, "a");
                assert_eq!(found, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_completed_into_dataset() {
        let completed = CompletedMatrix::new(names(2), vec![vec![Some(1.0), Some(2.0)]], 1);
        assert_eq!(completed.filled_cells(), 1);
        let dataset = completed.into_dataset("again").unwrap();
        assert_eq!(dataset.name(), "again");
        assert_eq!(dataset.value(0, 0), Some(1.0));
    }
}
