//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`MockUI`] for tests
//!
//! Everything the engines need from a human goes through this trait:
//! confirmation (action gates, delete prompts), line input (prompt actions),
//! and editor sessions (template content and variable documents).

pub mod mock;
pub mod terminal;

pub use mock::MockUI;
pub use terminal::TerminalUI;

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question, defaulting as given.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Ask for one line of input, offering a default when provided.
    fn input(&mut self, question: &str, default: Option<&str>) -> Result<String>;

    /// Open an editor session seeded with `seed`, using `extension` for the
    /// scratch file. Returns `None` when the editor closed without saving.
    fn edit(&mut self, seed: &str, extension: &str) -> Result<Option<String>>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}
