//! Recipe document parsing and validation.
//!
//! A recipe is a TOML document with one repeated `[[actions]]` section.
//! Parsing validates the list shape, each entry's `type`, and any `gate`
//! before a single action runs; everything type-specific stays in the raw
//! table and is validated at dispatch time, so an unknown action type only
//! fails the run once execution reaches it.

use crate::error::{Result, StencilError};

/// One parsed recipe action. `index` is 1-based and used in every
/// user-facing message.
#[derive(Debug, Clone)]
pub struct Action {
    pub index: usize,
    pub action_type: String,
    pub gate: Option<String>,
    pub fields: toml::Table,
}

/// Seed content offered when creating a new recipe interactively.
pub const DEFAULT_RECIPE: &str = "\
# Define the ordered actions for the recipe
[[actions]]
type = \"template\"
name = \"example-template\"
output = \"output.txt\"

[[actions]]
type = \"command\"
command = [\"echo\", \"Hello from stencil\"]

[[actions]]
type = \"prompt\"
var = \"name\"
prompt = \"What is your name?\"
";

/// Parse a recipe document into its ordered action list.
pub fn load_actions(content: &str) -> Result<Vec<Action>> {
    let parsed: toml::Table = toml::from_str(content).map_err(|e| StencilError::RecipeParse {
        message: e.to_string(),
    })?;

    let entries = match parsed.get("actions") {
        Some(toml::Value::Array(entries)) if !entries.is_empty() => entries,
        _ => {
            return Err(StencilError::ActionInvalid {
                message: "Recipe must define at least one [[actions]] entry.".to_string(),
            })
        }
    };

    let mut actions = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let index = i + 1;
        let table = match entry {
            toml::Value::Table(table) => table,
            _ => {
                return Err(StencilError::ActionInvalid {
                    message: format!("Action #{} must be a TOML table.", index),
                })
            }
        };

        let action_type = match table.get("type") {
            Some(toml::Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                return Err(StencilError::ActionInvalid {
                    message: format!("Action #{} is missing a 'type'.", index),
                })
            }
        };

        let gate = match table.get("gate") {
            None => None,
            Some(toml::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(_) => {
                return Err(StencilError::ActionInvalid {
                    message: format!(
                        "Action #{} gate must be a non-empty string when provided.",
                        index
                    ),
                })
            }
        };

        actions.push(Action {
            index,
            action_type,
            gate,
            fields: table.clone(),
        });
    }

    Ok(actions)
}

/// One normalized command entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEntry {
    /// Run through the shell with full shell interpretation.
    Shell(String),
    /// Run as an explicit argument vector, no shell involved.
    Argv(Vec<String>),
}

/// Normalize a `command` field into an ordered entry sequence.
///
/// - a bare string is one shell-line entry
/// - a list of strings is exactly one argument-vector entry
/// - a mixed list normalizes each element: string means shell line, list of
///   strings means argument vector; anything else is an error
pub fn coerce_command(value: &toml::Value) -> Result<Vec<CommandEntry>> {
    match value {
        toml::Value::String(line) => Ok(vec![CommandEntry::Shell(line.clone())]),
        toml::Value::Array(items) => {
            if items.is_empty() {
                return Err(StencilError::ActionInvalid {
                    message: "Command actions must provide a non-empty 'command' value."
                        .to_string(),
                });
            }
            if items.iter().all(|i| matches!(i, toml::Value::String(_))) {
                let argv = items
                    .iter()
                    .filter_map(|i| i.as_str().map(str::to_string))
                    .collect();
                return Ok(vec![CommandEntry::Argv(argv)]);
            }
            let mut normalized = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    toml::Value::String(line) => normalized.push(CommandEntry::Shell(line.clone())),
                    toml::Value::Array(args)
                        if !args.is_empty()
                            && args.iter().all(|a| matches!(a, toml::Value::String(_))) =>
                    {
                        let argv = args
                            .iter()
                            .filter_map(|a| a.as_str().map(str::to_string))
                            .collect();
                        normalized.push(CommandEntry::Argv(argv));
                    }
                    _ => {
                        return Err(StencilError::ActionInvalid {
                            message: "Command actions must provide strings, lists of strings, \
                                      or a list combining those command definitions."
                                .to_string(),
                        })
                    }
                }
            }
            Ok(normalized)
        }
        _ => Err(StencilError::ActionInvalid {
            message: "Command actions must provide 'command' as a string, list of strings, \
                      or list of command definitions."
                .to_string(),
        }),
    }
}
