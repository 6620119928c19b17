//! Immutable catalogue of parameter categories

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use super::definition::{ParameterDefinition, ParameterType};
use super::value::{Configuration, ParameterValue};

/// Errors raised while assembling a registry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    #[error("Duplicate parameter id '{id}' (already declared in category '{category}')")]
    DuplicateParameter { id: String, category: String },

    #[error("Parameter '{id}' has min {min} greater than max {max}")]
    InvertedRange { id: String, min: f64, max: f64 },

    #[error("Parameter '{id}' has an invalid pattern: {reason}")]
    InvalidPattern { id: String, reason: String },
}

/// Named, ordered group of parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDefinition>,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameter(&self, id: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.id == id)
    }
}

/// A definition annotated with its owning category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegisteredParameter<'a> {
    #[serde(flatten)]
    pub definition: &'a ParameterDefinition,
    #[serde(rename = "category")]
    pub category_id: &'a str,
    #[serde(rename = "categoryName")]
    pub category_name: &'a str,
}

impl<'a> RegisteredParameter<'a> {
    fn new(category: &'a Category, definition: &'a ParameterDefinition) -> Self {
        Self {
            definition,
            category_id: &category.id,
            category_name: &category.name,
        }
    }
}

impl std::ops::Deref for RegisteredParameter<'_> {
    type Target = ParameterDefinition;

    fn deref(&self) -> &Self::Target {
        self.definition
    }
}

/// Read-only parameter catalogue, built once and shared
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRegistry {
    categories: Vec<Category>,
    index: HashMap<String, (usize, usize)>,
}

impl ParameterRegistry {
    pub fn builder() -> ParameterRegistryBuilder {
        ParameterRegistryBuilder::default()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Category ids in declared order
    pub fn category_ids(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.id.as_str()).collect()
    }

    /// Every parameter in declared order, annotated with its category
    pub fn all_parameters(&self) -> Vec<RegisteredParameter<'_>> {
        self.categories
            .iter()
            .flat_map(|c| c.parameters.iter().map(move |p| RegisteredParameter::new(c, p)))
            .collect()
    }

    pub fn parameter(&self, id: &str) -> Option<RegisteredParameter<'_>> {
        let (cat, pos) = *self.index.get(id)?;
        let category = &self.categories[cat];
        Some(RegisteredParameter::new(category, &category.parameters[pos]))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Parameters of the given categories, in the order the ids are given
    pub fn parameters_for_categories(&self, category_ids: &[&str]) -> Vec<RegisteredParameter<'_>> {
        category_ids
            .iter()
            .filter_map(|id| self.category(id))
            .flat_map(|c| c.parameters.iter().map(move |p| RegisteredParameter::new(c, p)))
            .collect()
    }

    pub fn default_value(&self, id: &str) -> Option<&ParameterValue> {
        self.parameter(id)
            .and_then(|p| p.definition.default_value.as_ref())
    }

    /// Configuration holding every declared default, in registry order
    pub fn defaults(&self) -> Configuration {
        self.all_parameters()
            .into_iter()
            .filter_map(|p| {
                p.definition
                    .default_value
                    .clone()
                    .map(|v| (p.definition.id.clone(), v))
            })
            .collect()
    }
}

/// Assembles a registry and checks its invariants
#[derive(Debug, Default)]
pub struct ParameterRegistryBuilder {
    categories: Vec<Category>,
}

impl ParameterRegistryBuilder {
    pub fn category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn build(self) -> Result<ParameterRegistry, RegistryError> {
        let mut index: HashMap<String, (usize, usize)> = HashMap::new();
        let mut category_ids: HashSet<&str> = HashSet::new();

        for (cat_pos, category) in self.categories.iter().enumerate() {
            if !category_ids.insert(&category.id) {
                return Err(RegistryError::DuplicateCategory(category.id.clone()));
            }

            for (param_pos, param) in category.parameters.iter().enumerate() {
                check_definition(param)?;

                if let Some((owner, _)) = index.get(&param.id) {
                    return Err(RegistryError::DuplicateParameter {
                        id: param.id.clone(),
                        category: self.categories[*owner].id.clone(),
                    });
                }
                index.insert(param.id.clone(), (cat_pos, param_pos));
            }
        }

        Ok(ParameterRegistry {
            categories: self.categories,
            index,
        })
    }
}

fn check_definition(param: &ParameterDefinition) -> Result<(), RegistryError> {
    let rules = &param.validation;

    if param.kind == ParameterType::Number {
        if let (Some(min), Some(max)) = (rules.min, rules.max) {
            if min > max {
                return Err(RegistryError::InvertedRange {
                    id: param.id.clone(),
                    min,
                    max,
                });
            }
        }
    }

    if let Some(pattern) = &rules.pattern {
        regex::Regex::new(pattern).map_err(|e| RegistryError::InvalidPattern {
            id: param.id.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> ParameterRegistry {
        ParameterRegistry::builder()
            .category(
                Category::new("performance", "Performance", "Threads and batching")
                    .with_parameter(
                        ParameterDefinition::number("threads", "Threads")
                            .with_default(0)
                            .with_cli_flag("-t, --threads"),
                    )
                    .with_parameter(ParameterDefinition::number("batch", "Batch Size")),
            )
            .category(
                Category::new("sampling", "Sampling", "Generation").with_parameter(
                    ParameterDefinition::number("temp", "Temperature").with_default(0.7),
                ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_all_parameters_annotated_in_declared_order() {
        let registry = sample_registry();
        let all = registry.all_parameters();

        let ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["threads", "batch", "temp"]);
        assert_eq!(all[2].category_id, "sampling");
        assert_eq!(all[2].category_name, "Sampling");
    }

    #[test]
    fn test_all_parameters_is_repeatable() {
        let registry = sample_registry();
        assert_eq!(registry.all_parameters(), registry.all_parameters());
    }

    #[test]
    fn test_category_lookup_and_ids() {
        let registry = sample_registry();

        assert_eq!(registry.category_ids(), vec!["performance", "sampling"]);
        assert_eq!(registry.category("sampling").unwrap().name, "Sampling");
        assert!(registry.category("missing").is_none());
    }

    #[test]
    fn test_defaults_only_include_declared_values() {
        let registry = sample_registry();
        let defaults = registry.defaults();

        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults.get("threads"), Some(&ParameterValue::from(0)));
        assert!(!defaults.contains("batch"));
        assert_eq!(registry.default_value("temp"), Some(&ParameterValue::from(0.7)));
        assert_eq!(registry.default_value("batch"), None);
    }

    #[test]
    fn test_parameters_for_categories_follows_requested_order() {
        let registry = sample_registry();
        let ids: Vec<_> = registry
            .parameters_for_categories(&["sampling", "performance"])
            .iter()
            .map(|p| p.id.clone())
            .collect();

        assert_eq!(ids, vec!["temp", "threads", "batch"]);
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let result = ParameterRegistry::builder()
            .category(Category::new("a", "A", "").with_parameter(ParameterDefinition::text("x", "X")))
            .category(Category::new("b", "B", "").with_parameter(ParameterDefinition::text("x", "X")))
            .build();

        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateParameter {
                id: "x".to_string(),
                category: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = ParameterRegistry::builder()
            .category(Category::new("a", "A", "").with_parameter(
                ParameterDefinition::number("n", "N").with_range(10.0, 1.0),
            ))
            .build();

        assert!(matches!(result, Err(RegistryError::InvertedRange { .. })));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = ParameterRegistry::builder()
            .category(Category::new("a", "A", "").with_parameter(
                ParameterDefinition::text("p", "P").with_pattern("(unclosed"),
            ))
            .build();

        assert!(matches!(result, Err(RegistryError::InvalidPattern { .. })));
    }

    #[test]
    fn test_registered_parameter_serializes_flat() {
        let registry = sample_registry();
        let json = serde_json::to_value(registry.parameter("threads").unwrap()).unwrap();

        assert_eq!(json["id"], "threads");
        assert_eq!(json["category"], "performance");
        assert_eq!(json["categoryName"], "Performance");
        assert_eq!(json["cliFlag"], "-t, --threads");
    }
}
