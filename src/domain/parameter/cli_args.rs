//! Compiles a configuration into `llama-server` command-line tokens

use std::collections::HashSet;

use super::definition::{ParameterDefinition, ParameterType};
use super::registry::ParameterRegistry;
use super::value::{Configuration, ParameterValue};

/// Ordered argument tokens for `config`
///
/// Parameters are visited in registry order, so the output does not depend
/// on the order fields were edited. Valued flags are single tokens such as
/// `"-c 4096"`; use [`split_cli_args`] for an argv vector.
pub fn build_cli_args(registry: &ParameterRegistry, config: &Configuration) -> Vec<String> {
    let mut args = Vec::new();
    let mut bare_flags: HashSet<&str> = HashSet::new();

    for param in registry.all_parameters() {
        let definition = param.definition;

        let Some(value) = config.get(&definition.id).filter(|v| !v.is_null()) else {
            continue;
        };
        let Some(flag) = definition.canonical_flag() else {
            continue;
        };

        match compile_token(definition, flag, value) {
            Some(Token::Bare(flag)) => {
                // Several toggles can share one negation flag
                if bare_flags.insert(flag) {
                    args.push(flag.to_string());
                }
            }
            Some(Token::Valued(token)) => args.push(token),
            None => {}
        }
    }

    args
}

/// Split compiled tokens into argv entries
///
/// `"-c 4096"` becomes `["-c", "4096"]`; everything after the flag stays one
/// entry, so `"--samplers typical topk"` yields `["--samplers", "typical topk"]`.
pub fn split_cli_args(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| match token.split_once(' ') {
            Some((flag, rest)) => vec![flag.to_string(), rest.to_string()],
            None => vec![token.clone()],
        })
        .collect()
}

enum Token<'a> {
    Bare(&'a str),
    Valued(String),
}

fn compile_token<'a>(
    definition: &ParameterDefinition,
    flag: &'a str,
    value: &ParameterValue,
) -> Option<Token<'a>> {
    if definition.kind == ParameterType::Boolean {
        // Non-boolean values never emit a flag
        return match (value.as_bool(), definition.invert_boolean) {
            (Some(false), true) | (Some(true), false) => Some(Token::Bare(flag)),
            _ => None,
        };
    }

    let rendered = match value {
        ParameterValue::List(_) => {
            let separator = if definition.kind == ParameterType::Multiselect {
                " "
            } else {
                ","
            };
            value.join(separator)
        }
        scalar => scalar.to_string(),
    };

    Some(Token::Valued(format!("{} {}", flag, rendered)))
}
