//! Args command - compiles a configuration into llama-server arguments

use clap::Args;
use tracing::debug;

use super::{registry, ConfigSource};
use crate::domain::parameter::{
    build_cli_args, split_cli_args, validate_all, Configuration, ParameterRegistry,
    ValidationReport,
};
use crate::infrastructure::logging;

/// Arguments for the args command
#[derive(Args, Clone)]
pub struct ArgsArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Print the argv vector as a JSON array instead of a command line
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ArgsArgs) -> anyhow::Result<()> {
    logging::init_cli_logging(args.source.verbose);

    let registry = registry()?;
    let config = args.source.load().await?;
    debug!(fields = config.len(), "Loaded configuration");

    let argv = compile(&registry, &config).map_err(|report| {
        eprint!("{}", describe_errors(&report));
        anyhow::anyhow!(
            "Configuration is invalid ({} error(s))",
            report.summary().error_count
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&argv)?);
    } else {
        println!("{}", argv.join(" "));
    }

    Ok(())
}

/// Argv entries for a valid configuration, the failing report otherwise
pub fn compile(
    registry: &ParameterRegistry,
    config: &Configuration,
) -> Result<Vec<String>, ValidationReport> {
    let report = validate_all(config, registry);
    if !report.valid {
        return Err(report);
    }

    Ok(split_cli_args(&build_cli_args(registry, config)))
}

/// One line per failing field, warnings after errors
pub(crate) fn describe_errors(report: &ValidationReport) -> String {
    let mut out = String::new();

    for (field, messages) in &report.errors {
        for message in messages {
            out.push_str(&format!("error: {}: {}\n", field, message));
        }
    }
    for (field, messages) in &report.warnings {
        for message in messages {
            out.push_str(&format!("warning: {}: {}\n", field, message));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ParameterRegistry {
        ParameterRegistry::llama_cpp().unwrap()
    }

    #[test]
    fn test_compile_valid_config() {
        let config = Configuration::new().with("ctx-size", 4096).with("temp", 0.5);

        let argv = compile(&registry(), &config).unwrap();
        assert_eq!(argv, vec!["-c", "4096", "--temp", "0.5"]);
    }

    #[test]
    fn test_compile_refuses_invalid_config() {
        let config = Configuration::new().with("temp", 9).with("top-k", 0);

        let report = compile(&registry(), &config).unwrap_err();
        assert!(!report.valid);

        let text = describe_errors(&report);
        assert!(text.starts_with("error: temp: "));
        assert!(text.contains("error: top-k: "));
    }
}
