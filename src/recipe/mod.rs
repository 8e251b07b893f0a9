//! Recipe parsing and execution.
//!
//! A recipe is a TOML document listing ordered `[[actions]]`. [`action`]
//! parses and validates the document; [`engine`] executes the resulting
//! action list sequentially, threading one mutable variable table through
//! every gate, template, command, and prompt.

pub mod action;
pub mod engine;

pub use action::{load_actions, Action, CommandEntry, DEFAULT_RECIPE};
pub use engine::RecipeEngine;
