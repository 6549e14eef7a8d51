//! Missing-Value Imputation Library
//!
//! Fills missing cells of a numeric feature matrix with a trailing class
//! label, and measures how close the fills come to a complete reference.
//!
//! # Overview
//!
//! Four imputation strategies are provided:
//!
//! - **Mean**: fill with the column mean over all rows
//! - **Conditional Mean**: fill with the column mean over rows of the same class
//! - **Hot Deck**: copy the value from the nearest other row
//! - **Conditional Hot Deck**: copy the value from the nearest other row of
//!   the same class, widening to all rows when the class has no donor
//!
//! Every run is scored by the mean absolute error over the cells that were
//! missing.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_imputation::{BatchRunner, ImputationConfig, ImputationMethod};
//!
//! let config = ImputationConfig::builder()
//!     .output_dir("output")
//!     .methods(vec![ImputationMethod::Mean, ImputationMethod::HotDeck])
//!     .build()?;
//!
//! let report = BatchRunner::builder()
//!     .config(config)
//!     .incomplete("20", "assignment2_dataset_missing20.csv")
//!     .reference("assignment2_dataset_complete.csv")
//!     .build()?
//!     .run()?;
//!
//! for line in report.score_lines() {
//!     println!("{}", line);
//! }
//! ```
//!
//! # Single Runs
//!
//! Imputers can be used directly on a loaded [`Dataset`]:
//!
//! ```rust,ignore
//! use lex_imputation::imputers::{HotDeckImputer, Imputer};
//! use lex_imputation::{io, scoring, ImputationConfig};
//!
//! let config = ImputationConfig::default();
//! let dataset = io::load_dataset(path, "20", &config)?;
//! let reference = io::load_dataset(reference_path, "reference", &config)?;
//!
//! let completed = HotDeckImputer::conditional().impute(&dataset)?;
//! let score = scoring::mean_absolute_error(&completed, &dataset, &reference)?;
//! println!("MAE = {}", score);
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod reporting;
pub mod scoring;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ClassLabel, ConfigValidationError, ImputationConfig, ImputationConfigBuilder,
    ImputationMethod, default_class_labels,
};
pub use distance::{ColumnScope, DistanceMetric};
pub use error::{ImputationError, Result as ImputationResult, ResultExt};
pub use imputers::{ConditionalMeanImputer, HotDeckImputer, Imputer, MeanImputer, imputer_for};
pub use pipeline::{BatchRunner, BatchRunnerBuilder, ImputationExecutor, RunOutcome};
pub use reporting::{BatchReport, DatasetEntry, ReportGenerator, RunFailure, RunRecord};
pub use scoring::{MaeScore, mean_absolute_error};
pub use types::{Cell, CompletedMatrix, Dataset, TransposedView};
