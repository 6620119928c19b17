//! Params command - lists the parameter catalogue

use std::fmt::Write;

use clap::Args;

use super::registry;
use crate::domain::parameter::{filter_categories, FilteredCategory, ParameterRegistry};
use crate::infrastructure::logging;

/// Arguments for the params command
#[derive(Args, Clone)]
pub struct ParamsArgs {
    /// Only show parameters whose id, label, description or flag contains this text
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Print the matching categories as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ParamsArgs) -> anyhow::Result<()> {
    logging::init_cli_logging(false);

    let registry = registry()?;
    let categories = filter_categories(&registry, args.filter.trim());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        print!("{}", render(&registry, &categories));
    }

    Ok(())
}

/// Plain-text listing grouped by category, ending with a count line
pub fn render(registry: &ParameterRegistry, categories: &[FilteredCategory<'_>]) -> String {
    let mut out = String::new();
    let mut visible = 0;

    for category in categories {
        let _ = writeln!(out, "{} ({})", category.name, category.id);

        for param in &category.parameters {
            visible += 1;

            let flag = param.cli_flag.as_ref().map_or("-", |f| f.as_str());
            let default = param
                .default_value
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);

            let _ = writeln!(
                out,
                "  {:<24} {:<28} default: {}",
                param.id, flag, default
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{} of {} parameters", visible, registry.len());
    out
}
