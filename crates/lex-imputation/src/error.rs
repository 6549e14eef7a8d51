//! Custom error types for the imputation engine.
//!
//! This module provides the error hierarchy using `thiserror`. Every fatal
//! condition of a batch run maps to one variant: input errors while loading,
//! data-completeness errors from the hot-deck searches, and
//! statistical-undefined errors from means and scores.
//!
//! Errors are serializable so they can be embedded in the JSON batch report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for loading, imputing and scoring.
#[derive(Error, Debug)]
pub enum ImputationError {
    /// Source file does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A data row has a different number of cells than the header.
    #[error("Malformed row in '{file}' at line {line}: expected {expected} cells, found {found}")]
    MalformedRow {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A cell could not be parsed as a number, class symbol or missing token.
    #[error("Invalid value '{value}' in '{file}' at line {line}, column '{column}'")]
    InvalidCell {
        file: String,
        line: usize,
        column: String,
        value: String,
    },

    /// The dataset has no rows or too few columns to carry a class label.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Two matrices that must be aligned row-for-row are not.
    #[error(
        "Shape mismatch: expected {expected_rows}x{expected_cols}, found {found_rows}x{found_cols}"
    )]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    /// Two matrices of the same shape name their columns differently.
    #[error("Column mismatch at position {position}: expected '{expected}', found '{found}'")]
    ColumnMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// A mean needed for filling has no observed values to average.
    #[error("Mean of column '{column}' is undefined over {scope}: no observed values")]
    UndefinedMean { column: String, scope: String },

    /// Hot deck found no donor row holding a value for the cell.
    #[error("Could not resolve a value for row {row}, column '{column}': no donor row has it")]
    UnresolvedValue { row: usize, column: String },

    /// Hot deck found no other row to compare against.
    #[error("No neighbor row available for row {row}")]
    NoNeighbor { row: usize },

    /// The reference dataset is missing a value at a scored position.
    #[error("Reference dataset is missing row {row}, column '{column}'")]
    IncompleteReference { row: usize, column: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ImputationError>,
    },
}

impl ImputationError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ImputationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::MalformedRow { .. } => "MALFORMED_ROW",
            Self::InvalidCell { .. } => "INVALID_CELL",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            Self::ColumnMismatch { .. } => "COLUMN_MISMATCH",
            Self::UndefinedMean { .. } => "UNDEFINED_MEAN",
            Self::UnresolvedValue { .. } => "UNRESOLVED_VALUE",
            Self::NoNeighbor { .. } => "NO_NEIGHBOR",
            Self::IncompleteReference { .. } => "INCOMPLETE_REFERENCE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error comes from reading or parsing input files.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::FileNotFound(_)
            | Self::MalformedRow { .. }
            | Self::InvalidCell { .. }
            | Self::EmptyDataset(_)
            | Self::Io(_)
            | Self::Polars(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }

    /// Check if this error is confined to a single imputer run.
    ///
    /// These are the failures a batch may isolate and continue past.
    pub fn is_run_local(&self) -> bool {
        match self {
            Self::UndefinedMean { .. }
            | Self::UnresolvedValue { .. }
            | Self::NoNeighbor { .. }
            | Self::IncompleteReference { .. } => true,
            Self::WithContext { source, .. } => source.is_run_local(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ImputationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ImputationError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for imputation operations.
pub type Result<T> = std::result::Result<T, ImputationError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ImputationError::Polars(e).with_context(context))
    }
}
