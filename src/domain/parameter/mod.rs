//! Parameter configuration engine: registry, validation, inheritance and CLI compilation

mod catalog;
mod cli_args;
mod definition;
mod filter;
mod inheritance;
mod registry;
mod validation;
mod value;

pub use cli_args::{build_cli_args, split_cli_args};
pub use definition::{
    CliFlag, CustomFormat, ParameterDefinition, ParameterType, SelectOption, ValidationRules,
    ValueType,
};
pub use filter::{filter_categories, filter_parameters, FilteredCategory};
pub use inheritance::{resolve_level, InheritanceLevel, InheritanceMap};
pub use registry::{
    Category, ParameterRegistry, ParameterRegistryBuilder, RegisteredParameter, RegistryError,
};
pub use validation::{
    has_changed, is_valid_tensor_split, validate_all, validate_parameter, validate_value,
    ValidationReport, ValidationResult, ValidationStatus, ValidationSummary, REQUIRED_MESSAGE,
    UNKNOWN_PARAMETER_MESSAGE,
};
pub use value::{Configuration, ParameterValue};
