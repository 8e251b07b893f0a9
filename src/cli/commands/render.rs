//! Render command implementations.
//!
//! `stencil render` runs the full template pipeline: classify the free
//! variables, build the editable TOML skeleton, collect the context through
//! an editor session, and render. `stencil recipe render` parses a recipe's
//! action list and executes it in order.

use std::path::Path;

use crate::cli::args::{NameArgs, RenderArgs};
use crate::error::{Result, StencilError};
use crate::recipe::{load_actions, RecipeEngine};
use crate::skeleton;
use crate::store::Store;
use crate::template;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The template render command implementation.
pub struct RenderCommand {
    args: RenderArgs,
}

impl RenderCommand {
    /// Create a new render command.
    pub fn new(args: RenderArgs) -> Self {
        Self { args }
    }
}

impl Command for RenderCommand {
    fn execute(&self, store: &Store, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let content = store.fetch_template(&self.args.name)?;

        let context = skeleton::collect_context(ui, &content, None)?;
        let rendered = template::render(&content, &context)?;

        match &self.args.output {
            Some(output) => {
                write_output(output, &rendered)?;
                ui.success(&format!(
                    "Rendered template saved to '{}'.",
                    output.display()
                ));
            }
            None => ui.message(&rendered),
        }
        Ok(CommandResult::success())
    }
}

fn write_output(path: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| StencilError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, rendered).map_err(|source| StencilError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// The recipe render command implementation.
pub struct RecipeRenderCommand {
    args: NameArgs,
}

impl RecipeRenderCommand {
    /// Create a new recipe render command.
    pub fn new(args: NameArgs) -> Self {
        Self { args }
    }
}

impl Command for RecipeRenderCommand {
    fn execute(&self, store: &Store, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let content = store.fetch_recipe(&self.args.name)?;
        let actions = load_actions(&content)?;
        tracing::debug!(recipe = %self.args.name, actions = actions.len(), "executing recipe");
        RecipeEngine::new(store, ui).run(&actions)?;
        Ok(CommandResult::success())
    }
}
