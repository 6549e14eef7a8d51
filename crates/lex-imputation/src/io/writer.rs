use crate::config::ImputationConfig;
use crate::error::{Result, ResultExt};
use crate::types::{Cell, CompletedMatrix};
use crate::utils::format_value;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Write a completed matrix as CSV.
///
/// The header is the dataset's feature names. Numbers are written with at
/// most `decimal_places` decimals; the label column is written with its
/// class symbol where one is configured. Missing cells are written as the
/// missing token.
pub fn write_completed(
    completed: &CompletedMatrix,
    path: &Path,
    config: &ImputationConfig,
) -> Result<()> {
    let label_column = completed.feature_names().len().saturating_sub(1);

    let columns: Vec<Column> = completed
        .feature_names()
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let values: Vec<String> = completed
                .rows()
                .iter()
                .map(|row| render_cell(row[j], j == label_column, config))
                .collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    let mut df = DataFrame::new(columns).context("Failed to assemble output frame")?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)
        .context(format!("Failed to write '{}'", path.display()))?;

    info!("Completed dataset saved: {}", path.display());
    Ok(())
}

fn render_cell(cell: Cell, is_label: bool, config: &ImputationConfig) -> String {
    match cell {
        None => config.missing_token.clone(),
        Some(code) if is_label => match config.label_for_code(code) {
            Some(label) => label.symbol.clone(),
            None => format_value(code, config.decimal_places),
        },
        Some(value) => format_value(value, config.decimal_places),
    }
}
