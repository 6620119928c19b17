//! Rule evaluation for parameter values
//!
//! Validation failures are data, never Rust errors: every check appends to
//! the result and nothing short-circuits.

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use serde::Serialize;

use super::definition::{CustomFormat, ParameterDefinition, ValidationRules};
use super::registry::ParameterRegistry;
use super::value::{Configuration, ParameterValue};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const UNKNOWN_PARAMETER_MESSAGE: &str = "Unknown parameter";
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid format";
pub const TENSOR_SPLIT_MESSAGE: &str =
    "Must be comma-separated values between 0 and 1 (e.g., 0.5,0.5)";

/// Compiled rule patterns keyed by source; uncompilable ones map to `None`
static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Option<Regex>>>> = Lazy::new(Default::default);

/// Outcome of validating a single value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_messages(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn unknown_parameter() -> Self {
        Self::from_messages(vec![UNKNOWN_PARAMETER_MESSAGE.to_string()], Vec::new())
    }

    pub fn status(&self) -> ValidationStatus {
        if !self.errors.is_empty() {
            ValidationStatus::Error
        } else if !self.warnings.is_empty() {
            ValidationStatus::Warning
        } else {
            ValidationStatus::Valid
        }
    }

    /// Errors then warnings joined by `"; "`, empty when the value is valid
    pub fn message(&self) -> String {
        if self.valid {
            return String::new();
        }

        self.errors
            .iter()
            .chain(self.warnings.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Display status of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Idle,
    Error,
    Warning,
    Valid,
}

impl ValidationStatus {
    pub fn of(result: Option<&ValidationResult>) -> Self {
        result.map_or(ValidationStatus::Idle, ValidationResult::status)
    }
}

/// Per-field outcome of validating a whole configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: IndexMap<String, Vec<String>>,
    pub warnings: IndexMap<String, Vec<String>>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            errors: IndexMap::new(),
            warnings: IndexMap::new(),
        }
    }
}

impl ValidationReport {
    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary::from_maps(&self.errors, &self.warnings)
    }
}

/// Aggregate counts over per-field errors and warnings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub error_fields: Vec<String>,
    pub warning_fields: Vec<String>,
    pub has_errors: bool,
    pub has_warnings: bool,
    pub is_valid: bool,
}

impl ValidationSummary {
    pub fn from_maps(
        errors: &IndexMap<String, Vec<String>>,
        warnings: &IndexMap<String, Vec<String>>,
    ) -> Self {
        let mut summary = Self::default();

        for (field, messages) in errors.iter().filter(|(_, m)| !m.is_empty()) {
            summary.error_count += messages.len();
            summary.error_fields.push(field.clone());
        }

        for (field, messages) in warnings.iter().filter(|(_, m)| !m.is_empty()) {
            summary.warning_count += messages.len();
            summary.warning_fields.push(field.clone());
        }

        summary.has_errors = summary.error_count > 0;
        summary.has_warnings = summary.warning_count > 0;
        summary.is_valid = !summary.has_errors;
        summary
    }
}

/// Validate `value` against the rules of `definition`
pub fn validate_value(
    param_id: &str,
    value: &ParameterValue,
    definition: &ParameterDefinition,
) -> ValidationResult {
    let rules = &definition.validation;
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(message) = rules.value_type.and_then(|t| t.mismatch(value)) {
        errors.push(message.to_string());
    }

    if rules.required && value.is_blank() {
        errors.push(REQUIRED_MESSAGE.to_string());
    }

    check_range(rules, value, &mut errors);
    check_length(rules, value, &mut errors, &mut warnings);

    if let Some(allowed) = &rules.values {
        if !allowed.contains(value) {
            errors.push(format!("Must be one of: {}", join_values(allowed)));
        }
    }

    if rules.format == Some(CustomFormat::TensorSplit) && !is_valid_tensor_split(value) {
        errors.push(TENSOR_SPLIT_MESSAGE.to_string());
    }

    if let Some(pattern) = &rules.pattern {
        if !matches_pattern(param_id, pattern, value) {
            errors.push(INVALID_FORMAT_MESSAGE.to_string());
        }
    }

    ValidationResult::from_messages(errors, warnings)
}

/// Validate a value for a registry parameter; unknown ids are rejected
pub fn validate_parameter(
    registry: &ParameterRegistry,
    param_id: &str,
    value: &ParameterValue,
) -> ValidationResult {
    match registry.parameter(param_id) {
        Some(param) => validate_value(param_id, value, param.definition),
        None => ValidationResult::unknown_parameter(),
    }
}

/// Validate every key present in `config`, skipping unregistered ids
pub fn validate_all(config: &Configuration, registry: &ParameterRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (param_id, value) in config.iter() {
        let Some(param) = registry.parameter(param_id) else {
            continue;
        };

        let result = validate_value(param_id, value, param.definition);

        if !result.valid {
            report.valid = false;
            report.errors.insert(param_id.to_string(), result.errors);
        }

        if !result.warnings.is_empty() {
            report.warnings.insert(param_id.to_string(), result.warnings);
        }
    }

    report
}

/// Whether `value` differs from `default`; lists compare element-wise
pub fn has_changed(value: &ParameterValue, default: Option<&ParameterValue>) -> bool {
    match default {
        Some(default) => value != default,
        None => !value.is_null(),
    }
}

fn check_range(rules: &ValidationRules, value: &ParameterValue, errors: &mut Vec<String>) {
    let Some(number) = value.as_number().filter(|n| n.is_finite()) else {
        return;
    };

    if let Some(min) = rules.min {
        if number < min {
            errors.push(format!("Must be at least {}", min));
        }
    }

    if let Some(max) = rules.max {
        if number > max {
            errors.push(format!("Must be at most {}", max));
        }
    }
}

fn check_length(
    rules: &ValidationRules,
    value: &ParameterValue,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let Some(text) = value.as_text() else {
        return;
    };
    let length = text.chars().count();

    if let Some(min) = rules.min_length {
        if length < min {
            warnings.push(format!("Must be at least {} characters", min));
        }
    }

    if let Some(max) = rules.max_length {
        if length > max {
            errors.push(format!("Must be at most {} characters", max));
        }
    }
}

fn join_values(values: &[ParameterValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated ratios, each a float within [0, 1]
pub fn is_valid_tensor_split(value: &ParameterValue) -> bool {
    let Some(text) = value.as_text() else {
        return false;
    };

    text.split(',').map(str::trim).all(|token| {
        token
            .parse::<f64>()
            .is_ok_and(|n| (0.0..=1.0).contains(&n))
    })
}

fn matches_pattern(param_id: &str, pattern: &str, value: &ParameterValue) -> bool {
    let Some(text) = value.as_text() else {
        return false;
    };

    compiled_pattern(param_id, pattern).is_some_and(|re| re.is_match(text))
}

fn compiled_pattern(param_id: &str, pattern: &str) -> Option<Regex> {
    if let Some(cached) = PATTERN_CACHE.read().get(pattern) {
        return cached.clone();
    }

    let compiled = match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(param = %param_id, error = %e, "Ignoring uncompilable pattern");
            None
        }
    };

    PATTERN_CACHE
        .write()
        .entry(pattern.to_string())
        .or_insert(compiled)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::{Category, ParameterDefinition};

    fn registry() -> ParameterRegistry {
        ParameterRegistry::llama_cpp().unwrap()
    }

    fn validate(id: &str, value: impl Into<ParameterValue>) -> ValidationResult {
        validate_parameter(&registry(), id, &value.into())
    }

    #[test]
    fn test_unknown_parameter() {
        let result = validate("nope", 1);

        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Unknown parameter"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_enum_rule_lists_allowed_values() {
        let result = validate("mirostat", 3);

        assert!(!result.valid);
        assert!(result.errors.contains(&"Must be one of: 0, 1, 2".to_string()));
        assert!(validate("mirostat", 2).valid);
    }

    #[test]
    fn test_enum_rule_uses_strict_equality() {
        let result = validate("mirostat", "1");
        assert!(!result.valid);
    }

    #[test]
    fn test_tensor_split_format() {
        assert!(validate("tensor-split", "0.5,0.5").valid);
        assert!(validate("tensor-split", "1, 0").valid);
        assert!(!validate("tensor-split", "0.5,abc").valid);
        assert!(!validate("tensor-split", "-0.1,0.5").valid);
        assert!(!validate("tensor-split", "1.5,0").valid);
        assert!(!validate("tensor-split", "").valid);
        assert!(!validate("tensor-split", 0.5).valid);

        let result = validate("tensor-split", "0.5,abc");
        assert_eq!(result.errors, vec![TENSOR_SPLIT_MESSAGE]);
    }

    #[test]
    fn test_numeric_range_messages() {
        let low = validate("ctx-size", 0);
        assert_eq!(low.errors, vec!["Must be at least 1"]);

        let high = validate("temp", 2.5);
        assert_eq!(high.errors, vec!["Must be at most 2"]);

        assert!(validate("seed", -1).valid);
    }

    #[test]
    fn test_type_and_required_accumulate() {
        let result = validate("model", ParameterValue::Null);

        assert_eq!(result.errors, vec!["Must be text", "This field is required"]);
    }

    #[test]
    fn test_type_error_on_wrong_shape() {
        assert_eq!(validate("ctx-size", "4096").errors, vec!["Must be a number"]);
        assert_eq!(validate("mmap", 1).errors, vec!["Must be a yes/no value"]);
        assert_eq!(validate("samplers", "topk").errors, vec!["Must be a list"]);
    }

    #[test]
    fn test_min_length_warns_and_max_length_errors() {
        let param = ParameterDefinition::text("alias", "Alias")
            .with_min_length(3)
            .with_max_length(5);

        let short = validate_value("alias", &ParameterValue::text("ab"), &param);
        assert!(short.valid);
        assert_eq!(short.warnings, vec!["Must be at least 3 characters"]);

        let long = validate_value("alias", &ParameterValue::text("abcdef"), &param);
        assert!(!long.valid);
        assert_eq!(long.errors, vec!["Must be at most 5 characters"]);
    }

    #[test]
    fn test_pattern_mismatch() {
        let param = ParameterDefinition::text("host", "Host").with_pattern(r"^[a-z0-9.-]+$");

        assert!(validate_value("host", &ParameterValue::text("local-host"), &param).valid);

        let result = validate_value("host", &ParameterValue::text("Bad Host"), &param);
        assert_eq!(result.errors, vec!["Invalid format"]);

        let result = validate_value("host", &ParameterValue::from(1), &param);
        assert_eq!(result.errors, vec!["Invalid format"]);
    }

    #[test]
    fn test_patterns_compiled_once_and_reused() {
        let pattern = r"^alias-[0-9]+$";
        let param = ParameterDefinition::text("alias", "Alias").with_pattern(pattern);

        assert!(validate_value("alias", &ParameterValue::text("alias-1"), &param).valid);
        assert!(PATTERN_CACHE.read().get(pattern).is_some_and(|re| re.is_some()));

        assert!(validate_value("alias", &ParameterValue::text("alias-22"), &param).valid);
        assert!(!validate_value("alias", &ParameterValue::text("alias"), &param).valid);
        assert_eq!(
            compiled_pattern("alias", pattern).map(|re| re.as_str().to_string()),
            Some(pattern.to_string())
        );
    }

    #[test]
    fn test_uncompilable_pattern_cached_as_failure() {
        let pattern = r"^(unclosed";
        let param = ParameterDefinition::text("broken", "Broken").with_pattern(pattern);

        let result = validate_value("broken", &ParameterValue::text("(unclosed"), &param);
        assert_eq!(result.errors, vec!["Invalid format"]);
        assert!(PATTERN_CACHE.read().get(pattern).is_some_and(|re| re.is_none()));
        assert!(compiled_pattern("broken", pattern).is_none());
    }

    #[test]
    fn test_validate_all_skips_unknown_keys() {
        let config = Configuration::new()
            .with("ctx-size", 0)
            .with("bogus", "x")
            .with("temp", 0.5)
            .with("model", "");

        let report = validate_all(&config, &registry());

        assert!(!report.valid);
        assert_eq!(
            report.errors.keys().collect::<Vec<_>>(),
            vec!["ctx-size", "model"]
        );
        assert!(!report.errors.contains_key("bogus"));
        assert_eq!(
            report.warnings.get("model"),
            Some(&vec!["Must be at least 1 characters".to_string()])
        );
    }

    #[test]
    fn test_summary_counts_every_error_string() {
        let config = Configuration::new()
            .with("model", ParameterValue::Null)
            .with("ctx-size", 0)
            .with("mirostat", 7);

        let summary = validate_all(&config, &registry()).summary();

        assert_eq!(summary.error_count, 4);
        assert_eq!(summary.error_fields, vec!["model", "ctx-size", "mirostat"]);
        assert!(summary.has_errors);
        assert!(!summary.is_valid);
    }

    #[test]
    fn test_valid_config_summary() {
        let config = registry().defaults().with("model", "/models/llama.gguf");
        let report = validate_all(&config, &registry());

        assert!(report.valid);
        assert!(report.summary().is_valid);
        assert_eq!(report.summary().error_count, 0);
    }

    #[test]
    fn test_status_and_message() {
        let result = validate("ctx-size", 0);
        assert_eq!(result.status(), ValidationStatus::Error);
        assert_eq!(result.message(), "Must be at least 1");

        let ok = validate("ctx-size", 4096);
        assert_eq!(ok.status(), ValidationStatus::Valid);
        assert_eq!(ok.message(), "");

        assert_eq!(ValidationStatus::of(None), ValidationStatus::Idle);
    }

    #[test]
    fn test_has_changed_compares_lists() {
        let default = ParameterValue::list(["typical", "topk"]);

        assert!(!has_changed(&ParameterValue::list(["typical", "topk"]), Some(&default)));
        assert!(has_changed(&ParameterValue::list(["topk", "typical"]), Some(&default)));
        assert!(has_changed(&ParameterValue::from(1), None));
        assert!(!has_changed(&ParameterValue::Null, None));
    }

    #[test]
    fn test_custom_registry_rules_apply() {
        let registry = ParameterRegistry::builder()
            .category(
                Category::new("c", "C", "").with_parameter(
                    ParameterDefinition::number("n", "N").required().with_range(0.0, 10.0),
                ),
            )
            .build()
            .unwrap();

        let result = validate_parameter(&registry, "n", &ParameterValue::text(""));
        assert_eq!(result.errors, vec!["Must be a number", "This field is required"]);
    }
}
