//! Parameter definitions and their validation rule sets

use serde::Serialize;

use super::value::ParameterValue;

/// Input type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Text,
    Number,
    Boolean,
    Select,
    Multiselect,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Text => "text",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Select => "select",
            ParameterType::Multiselect => "multiselect",
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime type a value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    String,
    Boolean,
    Array,
    Enum,
}

impl ValueType {
    /// Error message when `value` does not have this type, `None` when it does
    ///
    /// `Enum` carries no runtime shape of its own; membership is checked
    /// through the allowed value list.
    pub fn mismatch(&self, value: &ParameterValue) -> Option<&'static str> {
        match (self, value) {
            (ValueType::Number, ParameterValue::Number(_)) => None,
            (ValueType::Number, _) => Some("Must be a number"),
            (ValueType::String, ParameterValue::Text(_)) => None,
            (ValueType::String, _) => Some("Must be text"),
            (ValueType::Boolean, ParameterValue::Bool(_)) => None,
            (ValueType::Boolean, _) => Some("Must be a yes/no value"),
            (ValueType::Array, ParameterValue::List(_)) => None,
            (ValueType::Array, _) => Some("Must be a list"),
            (ValueType::Enum, _) => None,
        }
    }
}

/// Custom value formats that need a dedicated checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomFormat {
    /// Comma-separated GPU split ratios, each within [0, 1]
    TensorSplit,
}

/// Validation rules attached to a parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ParameterValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<CustomFormat>,
}

/// Command-line flag with one or more aliases, e.g. `-c, --ctx-size`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CliFlag(String);

impl CliFlag {
    pub fn new(flags: impl Into<String>) -> Self {
        Self(flags.into())
    }

    /// First alias, the one emitted on the command line
    pub fn canonical(&self) -> &str {
        self.0.split(',').next().map(str::trim).unwrap_or_default()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.0.split(',').map(str::trim).filter(|a| !a.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CliFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Option of a select or multiselect parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A configurable knob of the inference server
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParameterValue>,
    pub validation: ValidationRules,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cli_flag: Option<CliFlag>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub invert_boolean: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl ParameterDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            description: None,
            default_value: None,
            validation: ValidationRules::default(),
            cli_flag: None,
            invert_boolean: false,
            unit: None,
            options: Vec::new(),
            placeholder: None,
            step: None,
        }
    }

    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, ParameterType::Text)
    }

    /// Number parameter; values are type-checked as numbers
    pub fn number(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, ParameterType::Number).with_value_type(ValueType::Number)
    }

    /// Boolean parameter; values are type-checked as booleans
    pub fn boolean(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, ParameterType::Boolean).with_value_type(ValueType::Boolean)
    }

    pub fn select(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, ParameterType::Select)
    }

    pub fn multiselect(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, ParameterType::Multiselect)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_cli_flag(mut self, flag: impl Into<String>) -> Self {
        self.cli_flag = Some(CliFlag::new(flag));
        self
    }

    /// Emit the flag when the value is `false` instead of `true`
    pub fn inverted(mut self) -> Self {
        self.invert_boolean = true;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.validation.value_type = Some(value_type);
        self
    }

    pub fn required(mut self) -> Self {
        self.validation.required = true;
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.validation.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.validation.max = Some(max);
        self
    }

    pub fn with_range(self, min: f64, max: f64) -> Self {
        self.with_min(min).with_max(max)
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.validation.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.validation.max_length = Some(max);
        self
    }

    /// Restrict values to `values`; marks the rule set as an enum
    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParameterValue>,
    {
        self.validation.value_type = Some(ValueType::Enum);
        self.validation.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation.pattern = Some(pattern.into());
        self
    }

    pub fn with_format(mut self, format: CustomFormat) -> Self {
        self.validation.format = Some(format);
        self
    }

    pub fn canonical_flag(&self) -> Option<&str> {
        self.cli_flag.as_ref().map(CliFlag::canonical)
    }

    /// Case-insensitive substring match over label, id, description and flag
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_filter(&self, needle: &str) -> bool {
        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

        contains(&self.label)
            || contains(&self.id)
            || self.description.as_deref().is_some_and(contains)
            || self.cli_flag.as_ref().is_some_and(|f| contains(f.as_str()))
    }
}
