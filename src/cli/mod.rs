//! Command-line interface for stencil.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations, one per verb, each working
//!   against either storage namespace

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, RecipeCommands};
pub use commands::{Command, CommandDispatcher, CommandResult, Target};
