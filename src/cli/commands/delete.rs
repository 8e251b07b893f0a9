//! Delete command implementation.
//!
//! `stencil delete` and `stencil recipe delete` remove a stored entry after
//! a confirmation prompt, skipped with `--yes`.

use crate::cli::args::DeleteArgs;
use crate::error::Result;
use crate::store::Store;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Target;

/// The delete command implementation.
pub struct DeleteCommand {
    target: Target,
    args: DeleteArgs,
}

impl DeleteCommand {
    /// Create a new delete command for the given namespace.
    pub fn new(target: Target, args: DeleteArgs) -> Self {
        Self { target, args }
    }
}

impl Command for DeleteCommand {
    fn execute(&self, store: &Store, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let name = &self.args.name;
        if !self.target.exists(store, name)? {
            return Err(self.target.missing_error(name));
        }

        if !self.args.yes {
            let question = format!("Delete {} '{}'?", self.target.noun_lower(), name);
            if !ui.confirm(&question, false)? {
                ui.message("Aborted.");
                return Ok(CommandResult::failure(1));
            }
        }

        self.target.delete(store, name)?;
        ui.success(&format!("{} '{}' deleted.", self.target.noun(), name));
        Ok(CommandResult::success())
    }
}
