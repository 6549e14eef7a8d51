//! Pipeline module.
//!
//! This module provides the batch runner and the executor for single
//! imputer runs.

mod batch;
mod executor;

pub use batch::{BatchRunner, BatchRunnerBuilder};
pub use executor::{ImputationExecutor, RunOutcome};
