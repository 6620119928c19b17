//! Set command - edits stored server parameters through the form controller

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use super::{load_app_config, registry};
use crate::domain::form::{ApplyOutcome, FormController, FormOptions, ResetOutcome};
use crate::domain::parameter::ParameterValue;
use crate::infrastructure::logging;
use crate::infrastructure::settings::{create_config_store, StoreFormHost};

/// Arguments for the set command
#[derive(Args, Clone)]
pub struct SetArgs {
    /// Assignments such as `temp=0.5` or `samplers=["top_k","typ_p"]`
    #[arg(value_name = "ID=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, ParameterValue)>,

    /// Reset every parameter to its default before applying assignments
    #[arg(long)]
    pub reset: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn run(args: SetArgs) -> anyhow::Result<()> {
    logging::init_cli_logging(args.verbose);

    if args.assignments.is_empty() && !args.reset {
        anyhow::bail!("Nothing to do: pass ID=VALUE assignments or --reset");
    }

    let registry = registry()?;
    let store = create_config_store(&load_app_config().settings);
    let stored = store
        .load()
        .await?
        .parameters()
        .context("Stored server config is not a parameter map")?;

    let host = Arc::new(StoreFormHost::new(store, args.yes));
    let controller = FormController::new(
        registry.clone(),
        host,
        FormOptions::default().with_config(stored),
    );

    if args.reset {
        match controller.handle_reset_all().await {
            ResetOutcome::Reset => info!("Parameters reset to defaults"),
            ResetOutcome::Cancelled => anyhow::bail!("Reset cancelled; pass --yes to confirm"),
            ResetOutcome::SaveFailed(e) => return Err(e.into()),
        }
    }

    if args.assignments.is_empty() {
        return Ok(());
    }

    for (id, value) in args.assignments {
        if !registry.contains(&id) {
            anyhow::bail!("Unknown parameter: {}", id);
        }
        controller.change_field(&id, value);
    }

    let changed = controller.changed_fields();

    match controller.handle_apply().await {
        ApplyOutcome::Applied => {
            println!("Saved: {}", changed.join(", "));
            Ok(())
        }
        ApplyOutcome::Blocked(summary) => {
            eprint!("{}", super::args::describe_errors(&controller.validate()));
            anyhow::bail!(
                "Configuration is invalid ({} error(s)); nothing was saved",
                summary.error_count
            )
        }
        ApplyOutcome::SaveFailed(e) => Err(e.into()),
    }
}

/// `id=value`, where the value is read as JSON and falls back to plain text
pub fn parse_assignment(raw: &str) -> Result<(String, ParameterValue), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{}`", raw))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing parameter id in `{}`", raw));
    }

    let value = serde_json::from_str::<ParameterValue>(value)
        .unwrap_or_else(|_| ParameterValue::text(value));

    Ok((id.to_string(), value))
}
