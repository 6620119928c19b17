//! Case-insensitive search over the catalogue

use serde::Serialize;

use super::definition::ParameterDefinition;
use super::registry::{Category, ParameterRegistry};

/// A category narrowed to the parameters matching a filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredCategory<'a> {
    #[serde(skip)]
    pub category: &'a Category,
    pub id: &'a str,
    pub name: &'a str,
    pub parameters: Vec<&'a ParameterDefinition>,
}

impl<'a> FilteredCategory<'a> {
    fn new(category: &'a Category, parameters: Vec<&'a ParameterDefinition>) -> Self {
        Self {
            category,
            id: &category.id,
            name: &category.name,
            parameters,
        }
    }
}

/// Parameters whose label, id, description or flag contain `filter`
///
/// An empty filter returns every parameter unchanged.
pub fn filter_parameters<'a, I>(parameters: I, filter: &str) -> Vec<&'a ParameterDefinition>
where
    I: IntoIterator<Item = &'a ParameterDefinition>,
{
    let needle = filter.trim().to_lowercase();

    if needle.is_empty() {
        return parameters.into_iter().collect();
    }

    parameters
        .into_iter()
        .filter(|p| p.matches_filter(&needle))
        .collect()
}

/// Categories in declared order, each holding its matching parameters
///
/// Categories without a match are dropped.
pub fn filter_categories<'a>(registry: &'a ParameterRegistry, filter: &str) -> Vec<FilteredCategory<'a>> {
    registry
        .categories()
        .iter()
        .filter_map(|category| {
            let parameters = filter_parameters(&category.parameters, filter);
            (!parameters.is_empty() || filter.trim().is_empty())
                .then(|| FilteredCategory::new(category, parameters))
        })
        .collect()
}
