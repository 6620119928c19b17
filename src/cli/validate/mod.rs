//! Validate command - prints a validation report as JSON

use clap::Args;
use serde::Serialize;

use super::{registry, ConfigSource};
use crate::domain::parameter::{
    validate_all, Configuration, ParameterRegistry, ValidationReport, ValidationSummary,
};
use crate::infrastructure::logging;

/// Arguments for the validate command
#[derive(Args, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Exit non-zero when the configuration has errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    #[serde(flatten)]
    pub report: ValidationReport,
    pub summary: ValidationSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}

pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    logging::init_cli_logging(args.source.verbose);

    let registry = registry()?;
    let config = args.source.load().await?;
    let output = validate(&registry, &config);

    println!("{}", serde_json::to_string_pretty(&output)?);

    if args.strict && !output.report.valid {
        anyhow::bail!(
            "Configuration is invalid ({} error(s))",
            output.summary.error_count
        );
    }

    Ok(())
}

pub fn validate(registry: &ParameterRegistry, config: &Configuration) -> ValidateOutput {
    let report = validate_all(config, registry);

    ValidateOutput {
        summary: report.summary(),
        ignored: config
            .keys()
            .filter(|id| !registry.contains(id))
            .map(str::to_string)
            .collect(),
        report,
    }
}
