//! Integration tests for the imputation batch.
//!
//! These tests run complete batches over the fixture datasets and check the
//! written files, scores and reports.

use lex_imputation::imputers::{HotDeckImputer, Imputer};
use lex_imputation::io::load_dataset;
use lex_imputation::{
    BatchReport, BatchRunner, ImputationConfig, ImputationMethod, ReportGenerator,
    mean_absolute_error,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config_in(dir: &TempDir) -> ImputationConfig {
    ImputationConfig::builder()
        .output_dir(dir.path())
        .build()
        .unwrap()
}

fn run_batch(config: ImputationConfig) -> BatchReport {
    BatchRunner::builder()
        .config(config)
        .incomplete("low", fixtures_path().join("missing_low.csv"))
        .incomplete("high", fixtures_path().join("missing_high.csv"))
        .reference(fixtures_path().join("complete.csv"))
        .build()
        .unwrap()
        .run()
        .unwrap()
}

fn mae(report: &BatchReport, dataset: &str, method: ImputationMethod) -> f64 {
    report
        .record(dataset, method)
        .and_then(|record| record.mae)
        .unwrap()
}

// ============================================================================
// Full Batch Tests
// ============================================================================

#[test]
fn test_full_batch_runs_every_method_on_every_dataset() {
    let dir = TempDir::new().unwrap();

    let report = run_batch(config_in(&dir));

    let order: Vec<(String, ImputationMethod)> = report
        .records
        .iter()
        .map(|record| (record.dataset.clone(), record.method))
        .collect();
    let expected: Vec<(String, ImputationMethod)> = ImputationMethod::ALL
        .iter()
        .flat_map(|&method| [("low".to_string(), method), ("high".to_string(), method)])
        .collect();
    assert_eq!(order, expected);
    assert!(!report.has_failures());

    for record in &report.records {
        let output = PathBuf::from(record.output_file.as_ref().unwrap());
        assert!(output.exists(), "missing output {}", output.display());
    }
    assert_eq!(
        report.score_lines().len(),
        8,
        "one score line per dataset and method"
    );
}

#[test]
fn test_dataset_entries() {
    let dir = TempDir::new().unwrap();

    let report = run_batch(config_in(&dir));

    let missing: Vec<(String, usize)> = report
        .datasets
        .iter()
        .map(|entry| (entry.name.clone(), entry.missing_cells))
        .collect();
    assert_eq!(missing, vec![("low".to_string(), 1), ("high".to_string(), 6)]);
    assert_eq!(report.datasets[0].rows, 8);
    assert_eq!(report.datasets[0].columns, 4);
}

#[test]
fn test_scores_on_single_missing_cell() {
    let dir = TempDir::new().unwrap();

    let report = run_batch(config_in(&dir));

    // column b without row 1 averages 30.9 / 7; the reference value is 2.5
    let expected_mean = 30.9 / 7.0 - 2.5;
    assert!((mae(&report, "low", ImputationMethod::Mean) - expected_mean).abs() < 1e-9);

    // row 3 is the nearest row to row 1 and donates b = 2.2
    assert!((mae(&report, "low", ImputationMethod::HotDeck) - 0.3).abs() < 1e-9);
    assert!((mae(&report, "low", ImputationMethod::ConditionalHotDeck) - 0.3).abs() < 1e-9);
}

#[test]
fn test_conditional_methods_beat_global_on_separated_classes() {
    let dir = TempDir::new().unwrap();

    let report = run_batch(config_in(&dir));

    assert!(
        mae(&report, "high", ImputationMethod::ConditionalMean)
            < mae(&report, "high", ImputationMethod::Mean)
    );
    assert!(
        mae(&report, "high", ImputationMethod::ConditionalHotDeck)
            <= mae(&report, "high", ImputationMethod::Mean)
    );
}

#[test]
fn test_written_output_is_complete_and_keeps_symbols() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    run_batch(config.clone());

    let path = dir.path().join("imputed_high_hd_conditional.csv");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("a,b,c,class\n"));
    assert!(!content.contains('?'));
    assert_eq!(content.lines().filter(|line| line.ends_with(",C")).count(), 4);
    assert_eq!(content.lines().filter(|line| line.ends_with(",F")).count(), 4);

    let reloaded = load_dataset(&path, "reloaded", &config).unwrap();
    assert_eq!(reloaded.missing_attribute_cells(), 0);
}

#[test]
fn test_batch_scores_match_direct_runs() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let report = run_batch(config.clone());

    let fixtures = fixtures_path();
    let dataset = load_dataset(&fixtures.join("missing_high.csv"), "high", &config).unwrap();
    let reference = load_dataset(&fixtures.join("complete.csv"), "reference", &config).unwrap();
    let completed = HotDeckImputer::unconditional().impute(&dataset).unwrap();
    let score = mean_absolute_error(&completed, &dataset, &reference).unwrap();

    assert_eq!(score.value(), report.record("high", ImputationMethod::HotDeck).unwrap().mae);
    assert_eq!(score.scored_cells, 6);
}

// ============================================================================
// Failure Handling Tests
// ============================================================================

#[test]
fn test_undefined_class_mean_aborts_batch() {
    let dir = TempDir::new().unwrap();

    let err = BatchRunner::builder()
        .config(config_in(&dir))
        .incomplete("gap", fixtures_path().join("missing_class_gap.csv"))
        .reference(fixtures_path().join("complete.csv"))
        .build()
        .unwrap()
        .run()
        .unwrap_err();

    assert_eq!(err.error_code(), "UNDEFINED_MEAN");
    let message = err.to_string();
    assert!(message.contains("dataset 'gap'"), "{}", message);
    assert!(message.contains("class 'F'"), "{}", message);
}

#[test]
fn test_isolated_failure_is_recorded() {
    let dir = TempDir::new().unwrap();
    let config = ImputationConfig::builder()
        .output_dir(dir.path())
        .isolate_failures(true)
        .build()
        .unwrap();

    let report = BatchRunner::builder()
        .config(config)
        .incomplete("gap", fixtures_path().join("missing_class_gap.csv"))
        .reference(fixtures_path().join("complete.csv"))
        .build()
        .unwrap()
        .run()
        .unwrap();

    let failed: Vec<ImputationMethod> = report
        .records
        .iter()
        .filter(|record| record.error.is_some())
        .map(|record| record.method)
        .collect();
    assert_eq!(failed, vec![ImputationMethod::ConditionalMean]);
    assert!(!dir.path().join("imputed_gap_mean_conditional.csv").exists());
    // the class has no donor, so the sub-search widens to all rows
    assert!(dir.path().join("imputed_gap_hd_conditional.csv").exists());
}

#[test]
fn test_missing_input_is_fatal() {
    let err = BatchRunner::builder()
        .incomplete("absent", fixtures_path().join("does_not_exist.csv"))
        .reference(fixtures_path().join("complete.csv"))
        .build()
        .unwrap()
        .run()
        .unwrap_err();

    assert!(err.is_input_error());
    assert_eq!(err.error_code(), "FILE_NOT_FOUND");
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_report_written_and_reloaded() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let report = run_batch(config.clone());
    let generator = ReportGenerator::new(config.output_dir.clone(), config.output_prefix.clone());
    let path = generator.write_report_to_file(&report).unwrap();

    assert_eq!(path, dir.path().join("imputed_report.json"));
    let json = std::fs::read_to_string(&path).unwrap();
    let loaded: BatchReport = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded.records, report.records);
    assert_eq!(loaded.datasets, report.datasets);
    assert_eq!(loaded.score_lines(), report.score_lines());
}
