//! List command implementation.
//!
//! `stencil list` and `stencil recipe list` print stored names in order.

use crate::error::Result;
use crate::store::Store;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Target;

/// The list command implementation.
pub struct ListCommand {
    target: Target,
}

impl ListCommand {
    /// Create a new list command for the given namespace.
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

impl Command for ListCommand {
    fn execute(&self, store: &Store, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let names = self.target.list(store)?;
        if names.is_empty() {
            ui.message(&format!("No {}s stored yet.", self.target.noun_lower()));
            return Ok(CommandResult::success());
        }
        for name in names {
            ui.message(&format!("- {}", name));
        }
        Ok(CommandResult::success())
    }
}
