//! Report generation module.
//!
//! A batch run produces one [`BatchReport`] holding a [`RunRecord`] per
//! dataset × imputer. The same report is used for:
//! - the `MAE_<dataset>_<method>` score lines printed after a batch
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_imputation::reporting::ReportGenerator;
//!
//! let report = runner.run()?;
//! for line in report.score_lines() {
//!     println!("{}", line);
//! }
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"), "imputed".to_string());
//! generator.write_report_to_file(&report)?;
//! ```

mod generator;

pub use generator::{BatchReport, DatasetEntry, ReportGenerator, RunFailure, RunRecord};
