//! Sequential recipe execution.
//!
//! The engine owns one mutable variable table for the lifetime of a run and
//! threads it through every action: gates and string fields get `$(name)`
//! substitution, prompt actions add entries, and command actions see the
//! table as extra environment. Execution is strictly in source order and
//! stops at the first failure; side effects already committed stand.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, StencilError};
use crate::recipe::action::{coerce_command, Action, CommandEntry};
use crate::shell::{self, CommandOptions};
use crate::skeleton;
use crate::store::Store;
use crate::subst::substitute_variables;
use crate::template;
use crate::ui::UserInterface;

/// Executes a recipe's action list against a store and a UI.
pub struct RecipeEngine<'a> {
    store: &'a Store,
    ui: &'a mut dyn UserInterface,
    variables: HashMap<String, String>,
}

impl<'a> RecipeEngine<'a> {
    pub fn new(store: &'a Store, ui: &'a mut dyn UserInterface) -> Self {
        Self {
            store,
            ui,
            variables: HashMap::new(),
        }
    }

    /// Run every action in order. The first dispatch failure aborts the run.
    pub fn run(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            if !self.should_run(action)? {
                continue;
            }
            tracing::debug!(index = action.index, kind = %action.action_type, "dispatching action");
            match action.action_type.as_str() {
                "template" => self.run_template(action)?,
                "command" => self.run_command(action)?,
                "prompt" => self.run_prompt(action)?,
                other => {
                    return Err(StencilError::UnknownActionType {
                        action_type: other.to_string(),
                        index: action.index,
                    })
                }
            }
        }
        Ok(())
    }

    /// Evaluate the action's gate, if any. A negative answer skips the
    /// action; that is control flow, not an error.
    fn should_run(&mut self, action: &Action) -> Result<bool> {
        let Some(gate) = &action.gate else {
            return Ok(true);
        };
        let prompt = substitute_variables(gate, &self.variables)?;
        let confirmed = self
            .ui
            .confirm(&format!("[{}] {}", action.index, prompt), true)?;
        if !confirmed {
            self.ui
                .message(&format!("[{}] Skipping action.", action.index));
        }
        Ok(confirmed)
    }

    fn run_template(&mut self, action: &Action) -> Result<()> {
        let index = action.index;
        let name = match action.fields.get("name") {
            Some(toml::Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                return Err(StencilError::ActionInvalid {
                    message: format!(
                        "Template action #{} must include a non-empty 'name'.",
                        index
                    ),
                })
            }
        };

        let content = self.store.fetch_template(&name)?;
        self.ui
            .message(&format!("[{}] Rendering template '{}'.", index, name));

        let preset = match action.fields.get("context") {
            None => None,
            Some(toml::Value::Table(context)) => {
                let resolved = resolve_context_table(context, &self.variables)?;
                Some(expand_dotted_keys(&resolved)?)
            }
            Some(_) => {
                return Err(StencilError::ActionInvalid {
                    message: format!(
                        "Template action #{} expected 'context' to be a table.",
                        index
                    ),
                })
            }
        };

        let context = skeleton::collect_context(self.ui, &content, preset)?;
        let rendered = template::render(&content, &context)?;

        let output = match action.fields.get("output") {
            None => {
                self.ui.message(&rendered);
                return Ok(());
            }
            Some(toml::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(_) => {
                return Err(StencilError::ActionInvalid {
                    message: format!(
                        "Template action #{} must supply 'output' as a non-empty string.",
                        index
                    ),
                })
            }
        };

        let resolved = substitute_variables(&output, &self.variables)?;
        let path = expand_user(&resolved);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StencilError::WriteFailed {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        std::fs::write(&path, &rendered).map_err(|source| StencilError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        self.ui
            .message(&format!("[{}] Saved output to '{}'.", index, path.display()));
        Ok(())
    }

    fn run_command(&mut self, action: &Action) -> Result<()> {
        let index = action.index;
        let value = action.fields.get("command").ok_or_else(|| {
            StencilError::ActionInvalid {
                message: format!("Command action #{} must define a 'command' field.", index),
            }
        })?;

        let entries = coerce_command(value)?;
        let options = CommandOptions {
            env: self.variables.clone(),
            capture: false,
        };

        for entry in entries {
            let result = match entry {
                CommandEntry::Shell(line) => {
                    let line = substitute_variables(&line, &self.variables)?;
                    shell::run_shell(&line, &options)?
                }
                CommandEntry::Argv(argv) => {
                    let argv = argv
                        .iter()
                        .map(|arg| substitute_variables(arg, &self.variables))
                        .collect::<Result<Vec<_>>>()?;
                    shell::run_argv(&argv, &options)?
                }
            };
            if !result.success {
                return Err(StencilError::CommandActionFailed {
                    index,
                    code: result.exit_code.unwrap_or(-1),
                });
            }
        }

        self.ui
            .message(&format!("[{}] Command completed successfully.", index));
        Ok(())
    }

    fn run_prompt(&mut self, action: &Action) -> Result<()> {
        let index = action.index;
        let prompt = match action.fields.get("prompt") {
            Some(toml::Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                return Err(StencilError::ActionInvalid {
                    message: format!(
                        "Prompt action #{} must include a non-empty 'prompt'.",
                        index
                    ),
                })
            }
        };
        let var = match action.fields.get("var") {
            Some(toml::Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                return Err(StencilError::ActionInvalid {
                    message: format!("Prompt action #{} must include a non-empty 'var'.", index),
                })
            }
        };

        let default = action.fields.get("default").map(stringify_default);
        let answer = self.ui.input(&prompt, default.as_deref())?;
        self.variables.insert(var.clone(), answer);

        self.ui
            .message(&format!("[{}] Stored variable '{}'.", index, var));
        Ok(())
    }
}

fn stringify_default(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(n) => n.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Resolve every string in a context table through the variable table.
///
/// Two-tier rule: a string that comes through substitution unchanged and is
/// itself the name of a known variable resolves to that variable's stored
/// value directly; every other string keeps its substituted form.
fn resolve_context_table(
    table: &toml::Table,
    variables: &HashMap<String, String>,
) -> Result<toml::Table> {
    let mut resolved = toml::Table::new();
    for (key, value) in table {
        resolved.insert(key.clone(), resolve_context_value(value, variables)?);
    }
    Ok(resolved)
}

fn resolve_context_value(
    value: &toml::Value,
    variables: &HashMap<String, String>,
) -> Result<toml::Value> {
    match value {
        toml::Value::String(s) => {
            let resolved = substitute_variables(s, variables)?;
            if resolved == *s {
                if let Some(raw) = variables.get(s.as_str()) {
                    return Ok(toml::Value::String(raw.clone()));
                }
            }
            Ok(toml::Value::String(resolved))
        }
        toml::Value::Array(items) => {
            let resolved = items
                .iter()
                .map(|item| resolve_context_value(item, variables))
                .collect::<Result<Vec<_>>>()?;
            Ok(toml::Value::Array(resolved))
        }
        toml::Value::Table(table) => Ok(toml::Value::Table(resolve_context_table(
            table, variables,
        )?)),
        other => Ok(other.clone()),
    }
}

/// Expand `"a.b.c"`-style keys into nested tables. A key segment that is
/// already bound to a scalar, or a leaf that would flatten an existing
/// table, is a conflict.
fn expand_dotted_keys(data: &toml::Table) -> Result<toml::Table> {
    let mut expanded = toml::Table::new();

    for (key, value) in data {
        let value = match value {
            toml::Value::Table(table) => toml::Value::Table(expand_dotted_keys(table)?),
            other => other.clone(),
        };

        let parts: Vec<&str> = key.split('.').collect();
        let mut target = &mut expanded;
        for part in &parts[..parts.len() - 1] {
            let slot = target
                .entry(part.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            target = match slot {
                toml::Value::Table(table) => table,
                _ => {
                    return Err(StencilError::ContextKeyConflict {
                        key: key.clone(),
                        part: part.to_string(),
                    })
                }
            };
        }

        let leaf = parts[parts.len() - 1];
        match (target.get_mut(leaf), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k, v);
                }
            }
            (Some(toml::Value::Table(_)), _) => {
                return Err(StencilError::ContextKeyOverride {
                    key: key.clone(),
                    leaf: leaf.to_string(),
                })
            }
            (_, value) => {
                target.insert(leaf.to_string(), value);
            }
        }
    }

    Ok(expanded)
}

/// Expand a leading `~` to the user's home directory.
fn expand_user(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
