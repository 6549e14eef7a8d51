//! Configuration types for imputation runs.
//!
//! This module provides configuration options using the builder pattern,
//! mirroring the layout of the file-level conventions (missing token, class
//! symbols, number formatting) and the batch behaviour (which imputers run,
//! whether failures are isolated).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// The four imputation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    /// Global column mean
    Mean,
    /// Column mean over rows of the same class
    ConditionalMean,
    /// Value of the nearest other row
    HotDeck,
    /// Value of the nearest other row of the same class
    ConditionalHotDeck,
}

impl ImputationMethod {
    /// All methods in the order a batch runs them.
    pub const ALL: [ImputationMethod; 4] = [
        Self::Mean,
        Self::ConditionalMean,
        Self::HotDeck,
        Self::ConditionalHotDeck,
    ];

    /// Short key used in output file names and score labels.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::ConditionalMean => "mean_conditional",
            Self::HotDeck => "hd",
            Self::ConditionalHotDeck => "hd_conditional",
        }
    }

    /// Returns a human-readable name for the method.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::ConditionalMean => "conditional mean",
            Self::HotDeck => "hot deck",
            Self::ConditionalHotDeck => "conditional hot deck",
        }
    }
}

impl fmt::Display for ImputationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Mapping between a textual class symbol in the files and its numeric code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLabel {
    pub symbol: String,
    pub code: f64,
}

impl ClassLabel {
    pub fn new(symbol: impl Into<String>, code: f64) -> Self {
        Self {
            symbol: symbol.into(),
            code,
        }
    }
}

/// The class symbols of the assignment datasets: `C` and `F`.
pub fn default_class_labels() -> Vec<ClassLabel> {
    vec![ClassLabel::new("C", 2.0), ClassLabel::new("F", 3.0)]
}

/// Configuration for an imputation batch.
///
/// Use [`ImputationConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_imputation::config::{ImputationConfig, ImputationMethod};
///
/// let config = ImputationConfig::builder()
///     .missing_token("NA")
///     .methods(vec![ImputationMethod::HotDeck])
///     .isolate_failures(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputationConfig {
    /// Token that marks a missing cell in the source files.
    /// Default: "?"
    pub missing_token: String,

    /// Class symbols accepted in the trailing label column.
    /// Default: C = 2, F = 3
    pub class_labels: Vec<ClassLabel>,

    /// Maximum number of decimal places written for numeric cells.
    /// Trailing zeros are trimmed.
    /// Default: 4
    pub decimal_places: usize,

    /// Directory that receives completed datasets and reports.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Prefix for every file written to `output_dir`.
    /// Default: "imputed"
    pub output_prefix: String,

    /// Record a failing imputer and keep going instead of aborting the batch.
    /// Default: false
    pub isolate_failures: bool,

    /// Imputers to run on every incomplete dataset, in order.
    /// Default: all four
    pub methods: Vec<ImputationMethod>,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            missing_token: "?".to_string(),
            class_labels: default_class_labels(),
            decimal_places: 4,
            output_dir: PathBuf::from("output"),
            output_prefix: "imputed".to_string(),
            isolate_failures: false,
            methods: ImputationMethod::ALL.to_vec(),
        }
    }
}

/// Largest supported `decimal_places`.
pub const MAX_DECIMAL_PLACES: usize = 10;

impl ImputationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ImputationConfigBuilder {
        ImputationConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let token = self.missing_token.trim();
        if token.is_empty() {
            return Err(ConfigValidationError::EmptyMissingToken);
        }
        if token.parse::<f64>().is_ok() {
            return Err(ConfigValidationError::NumericMissingToken(token.to_string()));
        }

        if self.class_labels.is_empty() {
            return Err(ConfigValidationError::NoClassLabels);
        }

        let mut symbols = HashSet::new();
        let mut codes: Vec<f64> = Vec::with_capacity(self.class_labels.len());
        for label in &self.class_labels {
            let symbol = label.symbol.trim();
            if symbol.is_empty() || symbol == token || symbol.parse::<f64>().is_ok() {
                return Err(ConfigValidationError::InvalidClassSymbol(label.symbol.clone()));
            }
            if !symbols.insert(symbol.to_string()) {
                return Err(ConfigValidationError::DuplicateClassSymbol(label.symbol.clone()));
            }
            if !label.code.is_finite() || codes.contains(&label.code) {
                return Err(ConfigValidationError::InvalidClassCode(label.code));
            }
            codes.push(label.code);
        }

        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigValidationError::InvalidDecimalPlaces(
                self.decimal_places,
            ));
        }

        if self.output_prefix.trim().is_empty() {
            return Err(ConfigValidationError::EmptyOutputPrefix);
        }

        if self.methods.is_empty() {
            return Err(ConfigValidationError::NoMethods);
        }

        Ok(())
    }

    /// Look up the class label for a textual symbol.
    pub fn label_for_symbol(&self, symbol: &str) -> Option<&ClassLabel> {
        self.class_labels.iter().find(|label| label.symbol == symbol)
    }

    /// Look up the class label for a numeric code.
    pub fn label_for_code(&self, code: f64) -> Option<&ClassLabel> {
        self.class_labels.iter().find(|label| label.code == code)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing-value token must not be empty")]
    EmptyMissingToken,

    #[error("Missing-value token '{0}' parses as a number")]
    NumericMissingToken(String),

    #[error("At least one class label is required")]
    NoClassLabels,

    #[error("Invalid class symbol '{0}' (non-empty, non-numeric, not the missing token)")]
    InvalidClassSymbol(String),

    #[error("Duplicate class symbol '{0}'")]
    DuplicateClassSymbol(String),

    #[error("Invalid class code {0} (must be finite and unique)")]
    InvalidClassCode(f64),

    #[error("Invalid decimal places: {0} (must be at most {max})", max = MAX_DECIMAL_PLACES)]
    InvalidDecimalPlaces(usize),

    #[error("Output prefix must not be empty")]
    EmptyOutputPrefix,

    #[error("At least one imputation method is required")]
    NoMethods,
}

impl From<ConfigValidationError> for crate::error::ImputationError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ImputationError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ImputationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ImputationConfigBuilder {
    missing_token: Option<String>,
    class_labels: Option<Vec<ClassLabel>>,
    decimal_places: Option<usize>,
    output_dir: Option<PathBuf>,
    output_prefix: Option<String>,
    isolate_failures: Option<bool>,
    methods: Option<Vec<ImputationMethod>>,
}

impl ImputationConfigBuilder {
    /// Start from an existing configuration (e.g. one read from JSON) so that
    /// individual settings can be overridden.
    pub fn from_config(config: ImputationConfig) -> Self {
        Self {
            missing_token: Some(config.missing_token),
            class_labels: Some(config.class_labels),
            decimal_places: Some(config.decimal_places),
            output_dir: Some(config.output_dir),
            output_prefix: Some(config.output_prefix),
            isolate_failures: Some(config.isolate_failures),
            methods: Some(config.methods),
        }
    }

    /// Set the token that marks missing cells.
    pub fn missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_token = Some(token.into());
        self
    }

    /// Set the accepted class symbols.
    pub fn class_labels(mut self, labels: Vec<ClassLabel>) -> Self {
        self.class_labels = Some(labels);
        self
    }

    /// Set the maximum number of decimal places written.
    pub fn decimal_places(mut self, places: usize) -> Self {
        self.decimal_places = Some(places);
        self
    }

    /// Set the output directory for completed datasets and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the prefix of every written file.
    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = Some(prefix.into());
        self
    }

    /// Keep running other imputers after one fails.
    pub fn isolate_failures(mut self, isolate: bool) -> Self {
        self.isolate_failures = Some(isolate);
        self
    }

    /// Set the imputers to run.
    pub fn methods(mut self, methods: Vec<ImputationMethod>) -> Self {
        self.methods = Some(methods);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ImputationConfig` or an error if validation fails.
    pub fn build(self) -> Result<ImputationConfig, ConfigValidationError> {
        let defaults = ImputationConfig::default();
        let config = ImputationConfig {
            missing_token: self.missing_token.unwrap_or(defaults.missing_token),
            class_labels: self.class_labels.unwrap_or(defaults.class_labels),
            decimal_places: self.decimal_places.unwrap_or(defaults.decimal_places),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            output_prefix: self.output_prefix.unwrap_or(defaults.output_prefix),
            isolate_failures: self.isolate_failures.unwrap_or(defaults.isolate_failures),
            methods: self.methods.unwrap_or(defaults.methods),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImputationConfig::default();
        assert_eq!(config.missing_token, "?");
        assert_eq!(config.decimal_places, 4);
        assert_eq!(config.class_labels.len(), 2);
        assert_eq!(config.methods, ImputationMethod::ALL.to_vec());
        assert!(!config.isolate_failures);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = ImputationConfig::builder()
            .missing_token("NA")
            .decimal_places(2)
            .output_prefix("run1")
            .isolate_failures(true)
            .methods(vec![ImputationMethod::HotDeck])
            .build()
            .unwrap();

        assert_eq!(config.missing_token, "NA");
        assert_eq!(config.decimal_places, 2);
        assert_eq!(config.output_prefix, "run1");
        assert!(config.isolate_failures);
        assert_eq!(config.methods, vec![ImputationMethod::HotDeck]);
    }

    #[test]
    fn test_label_lookup() {
        let config = ImputationConfig::default();
        assert_eq!(config.label_for_symbol("C").map(|l| l.code), Some(2.0));
        assert_eq!(config.label_for_code(3.0).map(|l| l.symbol.as_str()), Some("F"));
        assert!(config.label_for_symbol("X").is_none());
    }

    #[test]
    fn test_validation_numeric_missing_token() {
        let result = ImputationConfig::builder().missing_token("-1").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NumericMissingToken(_)
        ));
    }

    #[test]
    fn test_validation_duplicate_class_symbol() {
        let result = ImputationConfig::builder()
            .class_labels(vec![ClassLabel::new("C", 2.0), ClassLabel::new("C", 3.0)])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::DuplicateClassSymbol(_)
        ));
    }

    #[test]
    fn test_validation_duplicate_class_code() {
        let result = ImputationConfig::builder()
            .class_labels(vec![ClassLabel::new("C", 2.0), ClassLabel::new("F", 2.0)])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidClassCode(_)
        ));
    }

    #[test]
    fn test_validation_symbol_equal_to_missing_token() {
        let result = ImputationConfig::builder()
            .class_labels(vec![ClassLabel::new("?", 1.0)])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidClassSymbol(_)
        ));
    }

    #[test]
    fn test_validation_no_methods() {
        let result = ImputationConfig::builder().methods(vec![]).build();
        assert!(matches!(result.unwrap_err(), ConfigValidationError::NoMethods));
    }

    #[test]
    fn test_validation_decimal_places() {
        let result = ImputationConfig::builder().decimal_places(11).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidDecimalPlaces(11)
        ));
    }

    #[test]
    fn test_method_keys() {
        let keys: Vec<&str> = ImputationMethod::ALL.iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["mean", "mean_conditional", "hd", "hd_conditional"]);
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "missing_token": "NA",
            "methods": ["hot_deck", "conditional_hot_deck"],
            "isolate_failures": true
        }"#;

        let config: ImputationConfig =
            serde_json::from_str(json).expect("Should deserialize partial JSON");

        assert_eq!(config.missing_token, "NA");
        assert_eq!(
            config.methods,
            vec![ImputationMethod::HotDeck, ImputationMethod::ConditionalHotDeck]
        );
        assert!(config.isolate_failures);
        assert_eq!(config.decimal_places, 4);
        assert_eq!(config.class_labels, default_class_labels());
    }

    #[test]
    fn test_builder_from_config_overrides() {
        let base = ImputationConfig::default();
        let config = ImputationConfigBuilder::from_config(base)
            .output_prefix("override")
            .build()
            .unwrap();
        assert_eq!(config.output_prefix, "override");
        assert_eq!(config.missing_token, "?");
    }
}
