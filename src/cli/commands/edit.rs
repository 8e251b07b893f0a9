//! Edit command implementation.
//!
//! `stencil edit` and `stencil recipe edit` open the stored content in an
//! editor session and save the result back, touching nothing when the
//! content comes back unchanged.

use crate::cli::args::NameArgs;
use crate::error::{Result, StencilError};
use crate::store::Store;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Target;

/// The edit command implementation.
pub struct EditCommand {
    target: Target,
    args: NameArgs,
}

impl EditCommand {
    /// Create a new edit command for the given namespace.
    pub fn new(target: Target, args: NameArgs) -> Self {
        Self { target, args }
    }
}

impl Command for EditCommand {
    fn execute(&self, store: &Store, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let name = &self.args.name;
        let content = self.target.fetch(store, name)?;

        let updated = ui
            .edit(&content, self.target.extension())?
            .ok_or(StencilError::EditorClosed { what: "changes" })?;

        if updated == content {
            ui.message(&format!(
                "No changes detected; {} left untouched.",
                self.target.noun_lower()
            ));
            return Ok(CommandResult::success());
        }

        self.target.update(store, name, &updated)?;
        ui.success(&format!("{} '{}' updated.", self.target.noun(), name));
        Ok(CommandResult::success())
    }
}
