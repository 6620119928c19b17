//! Read-only projection of form state for rendering

use serde::Serialize;

use super::state::FormState;
use crate::domain::parameter::{
    filter_categories, resolve_level, InheritanceLevel, ParameterRegistry, ParameterType,
    ParameterValue, ValidationStatus, ValidationSummary,
};

/// Error fields listed by name in the banner before the rest are counted
pub const BANNER_FIELD_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub filter: String,
    pub total_parameters: usize,
    pub visible_parameters: usize,
    pub changed_count: usize,
    pub sections: Vec<SectionView>,
    pub banner: Option<ValidationBanner>,
}

impl FormView {
    /// Toolbar counter, e.g. `"4 of 30 parameters"`
    pub fn count_label(&self) -> String {
        format!(
            "{} of {} parameters",
            self.visible_parameters, self.total_parameters
        )
    }

    pub fn section(&self, id: &str) -> Option<&SectionView> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn field(&self, id: &str) -> Option<&FieldView> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub expanded: bool,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub kind: ParameterType,
    pub value: Option<ParameterValue>,
    pub default_value: Option<ParameterValue>,
    pub unit: Option<String>,
    pub inheritance: InheritanceLevel,
    pub changed: bool,
    pub editable: bool,
    pub status: ValidationStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationBanner {
    pub is_valid: bool,
    pub headline: String,
    pub error_fields: Vec<String>,
    /// `"...and N more"` when fields were left out of `error_fields`
    pub overflow: Option<String>,
}

impl ValidationBanner {
    pub fn from_summary(summary: &ValidationSummary) -> Self {
        let headline = if summary.is_valid {
            "All parameters valid".to_string()
        } else if summary.has_warnings {
            format!(
                "{} error(s), {} warning(s)",
                summary.error_count, summary.warning_count
            )
        } else {
            format!("{} error(s)", summary.error_count)
        };

        let hidden = summary.error_fields.len().saturating_sub(BANNER_FIELD_LIMIT);

        Self {
            is_valid: summary.is_valid,
            headline,
            error_fields: summary
                .error_fields
                .iter()
                .take(BANNER_FIELD_LIMIT)
                .cloned()
                .collect(),
            overflow: (hidden > 0).then(|| format!("...and {} more", hidden)),
        }
    }
}

pub(super) fn project(state: &FormState, registry: &ParameterRegistry) -> FormView {
    let sections: Vec<SectionView> = filter_categories(registry, &state.filter)
        .into_iter()
        .map(|category| SectionView {
            id: category.id.to_string(),
            name: category.name.to_string(),
            description: category.category.description.clone(),
            expanded: state.is_expanded(category.id),
            fields: category
                .parameters
                .iter()
                .map(|definition| {
                    let id = definition.id.as_str();
                    let value = state.config.get(id).cloned();
                    let default_value = state
                        .defaults
                        .get(id)
                        .or(definition.default_value.as_ref())
                        .cloned();
                    let result = state.field_results.get(id);

                    FieldView {
                        id: id.to_string(),
                        label: definition.label.clone(),
                        kind: definition.kind,
                        changed: value
                            .as_ref()
                            .is_some_and(|v| Some(v) != default_value.as_ref()),
                        value,
                        default_value,
                        unit: definition.unit.clone(),
                        inheritance: resolve_level(id, &state.inheritance),
                        editable: state.is_editable(id),
                        status: ValidationStatus::of(result),
                        message: result.map(|r| r.message()).unwrap_or_default(),
                    }
                })
                .collect(),
        })
        .collect();

    let banner = state
        .summary
        .as_ref()
        .filter(|_| state.show_validation_summary)
        .map(ValidationBanner::from_summary);

    FormView {
        filter: state.filter.clone(),
        total_parameters: registry.len(),
        visible_parameters: sections.iter().map(|s| s.fields.len()).sum(),
        changed_count: state.changed_fields.len(),
        sections,
        banner,
    }
}
