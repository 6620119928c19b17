//! Mutable state behind a form controller

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use indexmap::{IndexMap, IndexSet};

use crate::domain::parameter::{
    validate_all, Configuration, InheritanceMap, ParameterRegistry, ParameterValue,
    ValidationReport, ValidationResult, ValidationSummary,
};

/// Quiet period before an edited field is validated
pub const VALIDATION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Inputs a form is opened with
#[derive(Debug, Clone)]
pub struct FormOptions {
    pub config: Configuration,
    /// Values shown as the baseline when deciding whether a field changed
    pub defaults: Configuration,
    pub inheritance: InheritanceMap,
    /// When set, only these fields accept edits
    pub editable_fields: Option<HashSet<String>>,
    pub debounce: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            config: Configuration::new(),
            defaults: Configuration::new(),
            inheritance: InheritanceMap::new(),
            editable_fields: None,
            debounce: VALIDATION_DEBOUNCE,
        }
    }
}

impl FormOptions {
    pub fn with_config(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    pub fn with_defaults(mut self, defaults: Configuration) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_inheritance(mut self, inheritance: InheritanceMap) -> Self {
        self.inheritance = inheritance;
        self
    }

    pub fn with_editable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editable_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

#[derive(Debug)]
pub(super) struct FormState {
    pub config: Configuration,
    pub initial_config: Configuration,
    pub defaults: Configuration,
    pub inheritance: InheritanceMap,
    pub editable_fields: Option<HashSet<String>>,
    pub filter: String,
    pub expanded_sections: IndexMap<String, bool>,
    pub changed_fields: IndexSet<String>,
    pub field_results: HashMap<String, ValidationResult>,
    pub errors: IndexMap<String, Vec<String>>,
    pub warnings: IndexMap<String, Vec<String>>,
    pub summary: Option<ValidationSummary>,
    pub show_validation_summary: bool,
}

impl FormState {
    pub fn new(registry: &ParameterRegistry, options: FormOptions) -> Self {
        // Only the first section starts open
        let expanded_sections = registry
            .category_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), i == 0))
            .collect();

        Self {
            initial_config: options.config.clone(),
            config: options.config,
            defaults: options.defaults,
            inheritance: options.inheritance,
            editable_fields: options.editable_fields,
            filter: String::new(),
            expanded_sections,
            changed_fields: IndexSet::new(),
            field_results: HashMap::new(),
            errors: IndexMap::new(),
            warnings: IndexMap::new(),
            summary: None,
            show_validation_summary: false,
        }
    }

    pub fn is_editable(&self, field: &str) -> bool {
        self.editable_fields
            .as_ref()
            .is_none_or(|fields| fields.contains(field))
    }

    pub fn set_field(&mut self, field: &str, value: ParameterValue) {
        self.config.set(field, value);
        self.changed_fields.insert(field.to_string());
    }

    /// Store the outcome of a single-field validation and refresh the summary
    pub fn record_validation(&mut self, field: &str, result: ValidationResult) {
        if result.errors.is_empty() {
            self.errors.shift_remove(field);
        } else {
            self.errors.insert(field.to_string(), result.errors.clone());
        }

        if result.warnings.is_empty() {
            self.warnings.shift_remove(field);
        } else {
            self.warnings.insert(field.to_string(), result.warnings.clone());
        }

        self.field_results.insert(field.to_string(), result);
        self.refresh_summary();
    }

    /// Validate the whole working configuration, replacing earlier results
    pub fn revalidate(&mut self, registry: &ParameterRegistry) -> ValidationReport {
        let report = validate_all(&self.config, registry);

        self.field_results = self
            .config
            .keys()
            .filter(|id| registry.contains(id))
            .map(|id| {
                let errors = report.errors.get(id).cloned().unwrap_or_default();
                let warnings = report.warnings.get(id).cloned().unwrap_or_default();
                let result = ValidationResult {
                    valid: errors.is_empty(),
                    errors,
                    warnings,
                };
                (id.to_string(), result)
            })
            .collect();
        self.errors = report.errors.clone();
        self.warnings = report.warnings.clone();
        self.refresh_summary();

        report
    }

    pub fn clear_validation(&mut self) {
        self.field_results.clear();
        self.errors.clear();
        self.warnings.clear();
        self.summary = None;
        self.show_validation_summary = false;
    }

    /// Replace the working configuration and forget edits and validation
    pub fn reset_to(&mut self, config: Configuration) {
        self.config = config;
        self.changed_fields.clear();
        self.clear_validation();
    }

    pub fn changed(&self) -> Vec<String> {
        self.changed_fields.iter().cloned().collect()
    }

    /// Flip a section open or closed; returns the new state
    pub fn toggle_section(&mut self, section: &str) -> bool {
        let expanded = self.expanded_sections.entry(section.to_string()).or_insert(false);
        *expanded = !*expanded;
        *expanded
    }

    pub fn set_all_sections(&mut self, expanded: bool) {
        self.expanded_sections
            .values_mut()
            .for_each(|open| *open = expanded);
    }

    pub fn is_expanded(&self, section: &str) -> bool {
        self.expanded_sections.get(section).copied().unwrap_or(false)
    }

    fn refresh_summary(&mut self) {
        self.summary = Some(ValidationSummary::from_maps(&self.errors, &self.warnings));
    }
}
