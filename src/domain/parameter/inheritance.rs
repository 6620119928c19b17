//! Provenance of parameter values (global, group or model)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Level a parameter's value is sourced from
///
/// Ordered by display precedence: `Model` overrides `Group`, which
/// overrides `Global`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InheritanceLevel {
    #[default]
    Global,
    Group,
    Model,
}

impl InheritanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InheritanceLevel::Global => "global",
            InheritanceLevel::Group => "group",
            InheritanceLevel::Model => "model",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InheritanceLevel::Global => "Inherited from global defaults",
            InheritanceLevel::Group => "Group override",
            InheritanceLevel::Model => "Model-specific setting",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            InheritanceLevel::Global => "•",
            InheritanceLevel::Group => "G",
            InheritanceLevel::Model => "M",
        }
    }
}

impl std::fmt::Display for InheritanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explicit level assignments keyed by parameter id
pub type InheritanceMap = HashMap<String, InheritanceLevel>;

/// Level a parameter is attributed to, `Global` when unassigned
pub fn resolve_level(param_id: &str, inheritance: &InheritanceMap) -> InheritanceLevel {
    inheritance.get(param_id).copied().unwrap_or_default()
}
