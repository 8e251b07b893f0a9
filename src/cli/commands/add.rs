//! Add command implementation.
//!
//! `stencil add` and `stencil recipe add` create a new entry, seeded from a
//! file or from an editor session. A new recipe's editor session starts from
//! a default document with one action of each type.

use std::path::Path;

use crate::cli::args::AddArgs;
use crate::error::{Result, StencilError};
use crate::recipe::DEFAULT_RECIPE;
use crate::store::Store;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Target;

/// The add command implementation.
pub struct AddCommand {
    target: Target,
    args: AddArgs,
}

impl AddCommand {
    /// Create a new add command for the given namespace.
    pub fn new(target: Target, args: AddArgs) -> Self {
        Self { target, args }
    }

    fn editor_seed(&self) -> &'static str {
        match self.target {
            Target::Template => "",
            Target::Recipe => DEFAULT_RECIPE,
        }
    }
}

impl Command for AddCommand {
    fn execute(&self, store: &Store, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let name = &self.args.name;
        if self.target.exists(store, name)? {
            return Err(self.target.exists_error(name));
        }

        let content = match &self.args.file {
            Some(path) => read_seed_file(path)?,
            None => ui
                .edit(self.editor_seed(), self.target.extension())?
                .ok_or(StencilError::EditorClosed { what: "content" })?,
        };

        if content.trim().is_empty() {
            return Err(StencilError::ContentEmpty {
                what: self.target.noun(),
            });
        }

        self.target.insert(store, name, &content)?;
        ui.success(&format!("{} '{}' created.", self.target.noun(), name));
        Ok(CommandResult::success())
    }
}

fn read_seed_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| StencilError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}
