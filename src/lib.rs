//! Stencil - parameterized text templates and multi-step recipes.
//!
//! Stencil is a CLI tool that stores templates and recipes in a local
//! database, infers what inputs a template needs by analyzing its syntax
//! tree, collects those inputs through an editor session, and renders or
//! executes accordingly.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`recipe`] - Recipe document parsing and sequential action execution
//! - [`shell`] - Shell command execution
//! - [`skeleton`] - Editable TOML variable skeletons
//! - [`store`] - SQLite-backed template and recipe storage
//! - [`subst`] - `$(name)` variable substitution
//! - [`template`] - Template grammar, variable inference, and rendering
//! - [`ui`] - Interactive prompts and editor sessions
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use stencil::subst::substitute_variables;
//!
//! // Resolve variables in a recipe action string
//! let mut vars = HashMap::new();
//! vars.insert("env".to_string(), "staging".to_string());
//! let line = substitute_variables("deploy --target $(env)", &vars).unwrap();
//! assert_eq!(line, "deploy --target staging");
//! ```
//!
//! For the full render pipeline, see the integration tests.

pub mod cli;
pub mod error;
pub mod recipe;
pub mod shell;
pub mod skeleton;
pub mod store;
pub mod subst;
pub mod template;
pub mod ui;

pub use error::{Result, StencilError};
