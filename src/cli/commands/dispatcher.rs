//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands, RecipeCommands};
use crate::error::Result;
use crate::store::Store;
use crate::ui::UserInterface;

use super::add::AddCommand;
use super::delete::DeleteCommand;
use super::edit::EditCommand;
use super::list::ListCommand;
use super::render::{RecipeRenderCommand, RenderCommand};
use super::Target;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command against the store, reporting through the UI.
    fn execute(&self, store: &Store, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    store: Store,
}

impl CommandDispatcher {
    /// Create a new dispatcher over an opened store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::List => {
                ListCommand::new(Target::Template).execute(&self.store, ui)
            }
            Commands::Add(args) => {
                AddCommand::new(Target::Template, args.clone()).execute(&self.store, ui)
            }
            Commands::Edit(args) => {
                EditCommand::new(Target::Template, args.clone()).execute(&self.store, ui)
            }
            Commands::Delete(args) => {
                DeleteCommand::new(Target::Template, args.clone()).execute(&self.store, ui)
            }
            Commands::Render(args) => RenderCommand::new(args.clone()).execute(&self.store, ui),
            Commands::Recipe(recipe) => match &recipe.command {
                RecipeCommands::List => {
                    ListCommand::new(Target::Recipe).execute(&self.store, ui)
                }
                RecipeCommands::Add(args) => {
                    AddCommand::new(Target::Recipe, args.clone()).execute(&self.store, ui)
                }
                RecipeCommands::Edit(args) => {
                    EditCommand::new(Target::Recipe, args.clone()).execute(&self.store, ui)
                }
                RecipeCommands::Delete(args) => {
                    DeleteCommand::new(Target::Recipe, args.clone()).execute(&self.store, ui)
                }
                RecipeCommands::Render(args) => {
                    RecipeRenderCommand::new(args.clone()).execute(&self.store, ui)
                }
            },
        }
    }
}
