//! Batch runner.
//!
//! Loads a reference dataset and any number of incomplete variants of it,
//! then runs every configured imputer over every variant.

use crate::config::ImputationConfig;
use crate::error::{ImputationError, Result, ResultExt};
use crate::imputers::imputer_for;
use crate::io::load_dataset;
use crate::pipeline::ImputationExecutor;
use crate::reporting::{BatchReport, DatasetEntry, RunRecord};
use crate::types::Dataset;
use std::path::PathBuf;
use tracing::{error, info};

/// Runs every configured imputer over every incomplete dataset.
///
/// Use [`BatchRunner::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use lex_imputation::{BatchRunner, ImputationConfig};
///
/// let report = BatchRunner::builder()
///     .config(ImputationConfig::default())
///     .incomplete("004", "assignment2_dataset_missing004.csv")
///     .incomplete("20", "assignment2_dataset_missing20.csv")
///     .reference("assignment2_dataset_complete.csv")
///     .build()?
///     .run()?;
///
/// for line in report.score_lines() {
///     println!("{}", line);
/// }
/// ```
#[derive(Debug)]
pub struct BatchRunner {
    config: ImputationConfig,
    incomplete: Vec<(String, PathBuf)>,
    reference: PathBuf,
    executor: ImputationExecutor,
}

static_assertions::assert_impl_all!(BatchRunner: Send, Sync);

impl BatchRunner {
    /// Create a new batch runner builder.
    pub fn builder() -> BatchRunnerBuilder {
        BatchRunnerBuilder::default()
    }

    /// Load all inputs, then run imputers in order (methods outermost,
    /// datasets innermost).
    ///
    /// Input errors abort before any imputer runs. A failing imputer aborts
    /// the batch unless `isolate_failures` is set, in which case the failure
    /// is recorded and the batch moves on.
    pub fn run(&self) -> Result<BatchReport> {
        let (reference, datasets) = self.load_inputs()?;

        let entries = datasets
            .iter()
            .zip(&self.incomplete)
            .map(|(dataset, (_, path))| DatasetEntry::new(dataset, path))
            .collect();
        let mut report = BatchReport::new(&self.reference, entries);

        for &method in &self.config.methods {
            let imputer = imputer_for(method, &self.config.class_labels);

            for dataset in &datasets {
                info!("Running {} on '{}'", method, dataset.name());

                let outcome = self
                    .executor
                    .execute(imputer.as_ref(), dataset, &reference)
                    .context(format!(
                        "dataset '{}', imputer '{}'",
                        dataset.name(),
                        method
                    ));

                match outcome {
                    Ok(outcome) => report
                        .records
                        .push(RunRecord::completed(dataset.name(), &outcome)),
                    Err(e) if self.config.isolate_failures && e.is_run_local() => {
                        error!("{}", e);
                        report
                            .records
                            .push(RunRecord::failed(dataset.name(), method, &e));
                    }
                    Err(e) => {
                        error!("Batch aborted: {}", e);
                        return Err(e);
                    }
                }
            }
        }

        info!(
            "Batch finished: {} runs, {} failed",
            report.records.len(),
            report.records.iter().filter(|r| r.error.is_some()).count()
        );
        Ok(report)
    }

    fn load_inputs(&self) -> Result<(Dataset, Vec<Dataset>)> {
        let reference = load_dataset(&self.reference, "reference", &self.config)?;

        let mut datasets = Vec::with_capacity(self.incomplete.len());
        for (name, path) in &self.incomplete {
            let dataset = load_dataset(path, name, &self.config)?;
            reference
                .ensure_aligned(&dataset)
                .context(format!("Dataset '{}' does not match the reference", name))?;
            datasets.push(dataset);
        }
        Ok((reference, datasets))
    }
}

/// Builder for [`BatchRunner`].
#[derive(Debug, Default)]
pub struct BatchRunnerBuilder {
    config: Option<ImputationConfig>,
    incomplete: Vec<(String, PathBuf)>,
    reference: Option<PathBuf>,
}

static_assertions::assert_impl_all!(BatchRunnerBuilder: Send);

impl BatchRunnerBuilder {
    /// Set the configuration. Defaults to [`ImputationConfig::default()`].
    pub fn config(mut self, config: ImputationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Add an incomplete dataset. `name` labels its output files and scores.
    pub fn incomplete(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.incomplete.push((name.into(), path.into()));
        self
    }

    /// Set the complete reference dataset.
    pub fn reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }

    /// Build the runner.
    ///
    /// Fails when the configuration is invalid, no incomplete dataset or no
    /// reference was given, or two datasets share a name.
    pub fn build(self) -> Result<BatchRunner> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        if self.incomplete.is_empty() {
            return Err(ImputationError::InvalidConfig(
                "at least one incomplete dataset is required".to_string(),
            ));
        }
        let reference = self.reference.ok_or_else(|| {
            ImputationError::InvalidConfig("a reference dataset is required".to_string())
        })?;
        for (i, (name, _)) in self.incomplete.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ImputationError::InvalidConfig(
                    "dataset names must not be empty".to_string(),
                ));
            }
            if self.incomplete[..i].iter().any(|(other, _)| other == name) {
                return Err(ImputationError::InvalidConfig(format!(
                    "dataset name '{}' is used twice",
                    name
                )));
            }
        }

        Ok(BatchRunner {
            executor: ImputationExecutor::new(config.clone()),
            config,
            incomplete: self.incomplete,
            reference,
        })
    }
}
