//! Error types for stencil operations.
//!
//! This module defines [`StencilError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `StencilError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `StencilError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stencil operations.
#[derive(Debug, Error)]
pub enum StencilError {
    /// Referenced template does not exist in the store.
    #[error("Template '{name}' does not exist.")]
    TemplateNotFound { name: String },

    /// Referenced recipe does not exist in the store.
    #[error("Recipe '{name}' does not exist.")]
    RecipeNotFound { name: String },

    /// A template with this name is already stored.
    #[error("Template '{name}' already exists.")]
    TemplateExists { name: String },

    /// A recipe with this name is already stored.
    #[error("Recipe '{name}' already exists.")]
    RecipeExists { name: String },

    /// Template source failed to parse.
    #[error("Failed to parse template: {message}")]
    TemplateSyntax { message: String },

    /// Template evaluation failed (undefined variable, bad iteration, ...).
    #[error("Failed to render template: {message}")]
    RenderFailed { message: String },

    /// A `{>...<}` block contained nothing but whitespace.
    #[error("Encountered empty command substitution block {{><}}.")]
    EmptyCommandBlock,

    /// A `{>cmd<}` block's command exited non-zero.
    #[error("Command '{command}' failed with exit code {code}{detail}")]
    CommandBlockFailed {
        command: String,
        code: i32,
        detail: String,
    },

    /// A command could not be spawned at all.
    #[error("Failed to run command '{command}': {source}")]
    SpawnFailed {
        command: String,
        source: std::io::Error,
    },

    /// A `$(name)` reference named a variable the recipe never stored.
    #[error("Unknown variable '{name}' referenced in recipe action.")]
    UnknownVariable { name: String },

    /// Free-form TOML (edited context) failed to parse.
    #[error("Invalid TOML: {message}")]
    InvalidToml { message: String },

    /// Recipe document failed to parse as TOML.
    #[error("Invalid recipe TOML: {message}")]
    RecipeParse { message: String },

    /// Action list or a specific action failed validation.
    /// The message carries the 1-based action index where relevant.
    #[error("{message}")]
    ActionInvalid { message: String },

    /// Action declared a type the engine does not know.
    #[error("Unsupported action type '{action_type}' at position {index}.")]
    UnknownActionType { action_type: String, index: usize },

    /// A command action's entry exited non-zero.
    #[error("Command action #{index} exited with code {code}.")]
    CommandActionFailed { index: usize, code: i32 },

    /// Dotted context key collided with a scalar on the path.
    #[error("Context key '{key}' conflicts with previously defined scalar '{part}'.")]
    ContextKeyConflict { key: String, part: String },

    /// Dotted context key tried to overwrite a nested table with a scalar.
    #[error("Context key '{key}' cannot override nested values under '{leaf}'.")]
    ContextKeyOverride { key: String, leaf: String },

    /// Seed file could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rendered output could not be written.
    #[error("Failed to write template output to '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Editor session ended without the file being saved.
    #[error("Editor closed without saving {what}.")]
    EditorClosed { what: &'static str },

    /// Template or recipe content was blank where content is required.
    #[error("{what} content cannot be empty.")]
    ContentEmpty { what: &'static str },

    /// Storage error wrapper.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for stencil operations.
pub type Result<T> = std::result::Result<T, StencilError>;
