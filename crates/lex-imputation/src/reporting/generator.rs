use crate::config::ImputationMethod;
use crate::error::{ImputationError, Result};
use crate::pipeline::RunOutcome;
use crate::scoring::score_line;
use crate::types::Dataset;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the reference dataset
    pub reference_file: String,
    /// The incomplete datasets, in run order
    pub datasets: Vec<DatasetEntry>,
    /// One record per dataset × imputer, methods outermost
    pub records: Vec<RunRecord>,
}

/// An incomplete dataset taking part in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    pub file: String,
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
}

impl DatasetEntry {
    pub fn new(dataset: &Dataset, file: &Path) -> Self {
        Self {
            name: dataset.name().to_string(),
            file: file.display().to_string(),
            rows: dataset.n_rows(),
            columns: dataset.n_columns(),
            missing_cells: dataset.missing_attribute_cells(),
        }
    }
}

/// Outcome of one dataset × imputer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub dataset: String,
    pub method: ImputationMethod,
    /// Written file; absent when the run failed
    pub output_file: Option<String>,
    pub filled_cells: usize,
    /// Mean absolute error; absent when undefined or the run failed
    pub mae: Option<f64>,
    pub scored_cells: usize,
    pub error: Option<RunFailure>,
}

/// Why a run failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFailure {
    pub code: String,
    pub message: String,
}

impl From<&ImputationError> for RunFailure {
    fn from(error: &ImputationError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl RunRecord {
    /// Record a successful run.
    pub fn completed(dataset: &str, outcome: &RunOutcome) -> Self {
        Self {
            dataset: dataset.to_string(),
            method: outcome.method,
            output_file: Some(outcome.output_path.display().to_string()),
            filled_cells: outcome.completed.filled_cells(),
            mae: outcome.score.value(),
            scored_cells: outcome.score.scored_cells,
            error: None,
        }
    }

    /// Record a run that was isolated after failing.
    pub fn failed(dataset: &str, method: ImputationMethod, error: &ImputationError) -> Self {
        Self {
            dataset: dataset.to_string(),
            method,
            output_file: None,
            filled_cells: 0,
            mae: None,
            scored_cells: 0,
            error: Some(RunFailure::from(error)),
        }
    }

    /// The printed score line, e.g. `MAE_004_hd = 0.0421`.
    pub fn score_line(&self) -> String {
        match &self.error {
            None => score_line(&self.dataset, self.method.key(), self.mae),
            Some(failure) => format!(
                "MAE_{}_{} = failed ({})",
                self.dataset,
                self.method.key(),
                failure.code
            ),
        }
    }
}

impl BatchReport {
    /// Start an empty report stamped with the current local time.
    pub fn new(reference_file: &Path, datasets: Vec<DatasetEntry>) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            reference_file: reference_file.display().to_string(),
            datasets,
            records: Vec::new(),
        }
    }

    /// Score lines for every record, in run order.
    pub fn score_lines(&self) -> Vec<String> {
        self.records.iter().map(RunRecord::score_line).collect()
    }

    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|record| record.error.is_some())
    }

    /// Look up the record of one run.
    pub fn record(&self, dataset: &str, method: ImputationMethod) -> Option<&RunRecord> {
        self.records
            .iter()
            .find(|record| record.dataset == dataset && record.method == method)
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes batch reports next to the completed datasets.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_prefix: String,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf, output_prefix: String) -> Self {
        Self {
            output_dir,
            output_prefix,
        }
    }

    /// Write the report as pretty JSON to `<output_dir>/<prefix>_report.json`.
    pub fn write_report_to_file(&self, report: &BatchReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", self.output_prefix));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
