//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Template commands live at
//! the top level; recipe commands mirror them under the `recipe` group.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stencil - parameterized text templates and multi-step recipes.
#[derive(Debug, Parser)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List stored templates
    List,

    /// Create a new template
    Add(AddArgs),

    /// Edit an existing template
    Edit(NameArgs),

    /// Remove a template
    Delete(DeleteArgs),

    /// Render a template with TOML variables
    Render(RenderArgs),

    /// Manage stored recipes
    Recipe(RecipeArgs),
}

/// Arguments for commands that only take a name.
#[derive(Debug, Clone, clap::Args)]
pub struct NameArgs {
    /// Name of the stored entry
    pub name: String,
}

/// Arguments for the `add` commands.
#[derive(Debug, Clone, clap::Args)]
pub struct AddArgs {
    /// Name for the new entry
    pub name: String,

    /// Seed the content from a file instead of an editor session
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Arguments for the `delete` commands.
#[derive(Debug, Clone, clap::Args)]
pub struct DeleteArgs {
    /// Name of the stored entry
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `render` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RenderArgs {
    /// Name of the stored template
    pub name: String,

    /// Write the rendered content to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// The `recipe` command group.
#[derive(Debug, Clone, clap::Args)]
pub struct RecipeArgs {
    #[command(subcommand)]
    pub command: RecipeCommands,
}

/// Subcommands of the `recipe` group.
#[derive(Debug, Clone, Subcommand)]
pub enum RecipeCommands {
    /// List stored recipes
    List,

    /// Create a new recipe
    Add(AddArgs),

    /// Edit an existing recipe
    Edit(NameArgs),

    /// Remove a recipe
    Delete(DeleteArgs),

    /// Execute a recipe's actions in order
    Render(NameArgs),
}
