use crate::config::ImputationConfig;
use crate::error::{ImputationError, Result, ResultExt};
use crate::types::{Cell, Dataset};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Load a dataset from a CSV file.
///
/// Every cell is read as text first so that the missing token and class
/// symbols can be told apart from numbers. Attribute cells must be finite
/// numbers or the missing token; the label cell may also be one of the
/// configured class symbols.
pub fn load_dataset(path: &Path, name: &str, config: &ImputationConfig) -> Result<Dataset> {
    if !path.exists() {
        return Err(ImputationError::FileNotFound(path.to_path_buf()));
    }
    let file = path.display().to_string();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open '{}'", file))?
        .finish()
        .context(format!("Failed to read '{}'", file))?;

    debug!("Read {} rows x {} columns from '{}'", df.height(), df.width(), file);

    let feature_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let columns: Vec<&StringChunked> = df
        .get_columns()
        .iter()
        .map(|column| {
            column
                .str()
                .context(format!("Column '{}' of '{}'", column.name(), file))
        })
        .collect::<Result<_>>()?;
    check_row_widths(&columns, &file)?;

    let label_column = columns.len().saturating_sub(1);
    let mut rows: Vec<Vec<Cell>> = vec![Vec::with_capacity(columns.len()); df.height()];

    for (j, values) in columns.iter().copied().enumerate() {
        for (i, raw) in values.into_iter().enumerate() {
            let cell = parse_cell(raw, j == label_column, config).ok_or_else(|| {
                ImputationError::InvalidCell {
                    file: file.clone(),
                    line: i + 2,
                    column: feature_names[j].clone(),
                    value: raw.unwrap_or_default().to_string(),
                }
            })?;
            rows[i].push(cell);
        }
    }

    let dataset = Dataset::new(name, feature_names, rows).context(format!("Loading '{}'", file))?;
    info!(
        "Loaded dataset '{}' from {}: {} rows, {} attributes, {} missing cells",
        name,
        file,
        dataset.n_rows(),
        dataset.n_attributes(),
        dataset.missing_attribute_cells()
    );
    Ok(dataset)
}

/// Reject the first row with fewer fields than the header.
///
/// Polars pads a short row with trailing nulls, so the row holds as many
/// fields as its last non-null cell. An empty last field reads the same way.
fn check_row_widths(columns: &[&StringChunked], file: &str) -> Result<()> {
    let height = columns.first().map_or(0, |values| values.len());
    let mut widths = vec![0usize; height];
    for (j, values) in columns.iter().copied().enumerate() {
        for (i, raw) in values.into_iter().enumerate() {
            if raw.is_some() {
                widths[i] = j + 1;
            }
        }
    }

    match widths.iter().position(|&width| width < columns.len()) {
        Some(i) => Err(ImputationError::MalformedRow {
            file: file.to_string(),
            line: i + 2,
            expected: columns.len(),
            found: widths[i],
        }),
        None => Ok(()),
    }
}

/// Parse one cell. `None` means the text is not a valid cell at all;
/// `Some(None)` is a missing value.
fn parse_cell(raw: Option<&str>, is_label: bool, config: &ImputationConfig) -> Option<Cell> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    if text == config.missing_token {
        return Some(None);
    }
    if is_label && let Some(label) = config.label_for_symbol(text) {
        return Some(Some(label.code));
    }
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(Some)
}
