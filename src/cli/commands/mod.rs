//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed through [`CommandDispatcher`].
//!
//! Template and recipe commands share their verbs; each implementation
//! takes a [`Target`] selecting the storage namespace it operates on.

pub mod add;
pub mod delete;
pub mod dispatcher;
pub mod edit;
pub mod list;
pub mod render;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use crate::error::{Result, StencilError};
use crate::store::Store;

/// Which storage namespace a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Template,
    Recipe,
}

impl Target {
    /// Capitalized noun for user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            Target::Template => "Template",
            Target::Recipe => "Recipe",
        }
    }

    /// Lowercase noun for mid-sentence use.
    pub fn noun_lower(self) -> &'static str {
        match self {
            Target::Template => "template",
            Target::Recipe => "recipe",
        }
    }

    /// Scratch-file extension for editor sessions over this content.
    pub fn extension(self) -> &'static str {
        match self {
            Target::Template => ".j2",
            Target::Recipe => ".toml",
        }
    }

    pub fn fetch(self, store: &Store, name: &str) -> Result<String> {
        match self {
            Target::Template => store.fetch_template(name),
            Target::Recipe => store.fetch_recipe(name),
        }
    }

    pub fn exists(self, store: &Store, name: &str) -> Result<bool> {
        match self {
            Target::Template => store.template_exists(name),
            Target::Recipe => store.recipe_exists(name),
        }
    }

    pub fn list(self, store: &Store) -> Result<Vec<String>> {
        match self {
            Target::Template => store.list_templates(),
            Target::Recipe => store.list_recipes(),
        }
    }

    pub fn insert(self, store: &Store, name: &str, content: &str) -> Result<()> {
        match self {
            Target::Template => store.insert_template(name, content),
            Target::Recipe => store.insert_recipe(name, content),
        }
    }

    pub fn update(self, store: &Store, name: &str, content: &str) -> Result<()> {
        match self {
            Target::Template => store.update_template(name, content),
            Target::Recipe => store.update_recipe(name, content),
        }
    }

    pub fn delete(self, store: &Store, name: &str) -> Result<()> {
        match self {
            Target::Template => store.delete_template(name),
            Target::Recipe => store.delete_recipe(name),
        }
    }

    /// Error for a name that is already taken in this namespace.
    pub fn exists_error(self, name: &str) -> StencilError {
        match self {
            Target::Template => StencilError::TemplateExists {
                name: name.to_string(),
            },
            Target::Recipe => StencilError::RecipeExists {
                name: name.to_string(),
            },
        }
    }

    /// Error for a name absent from this namespace.
    pub fn missing_error(self, name: &str) -> StencilError {
        match self {
            Target::Template => StencilError::TemplateNotFound {
                name: name.to_string(),
            },
            Target::Recipe => StencilError::RecipeNotFound {
                name: name.to_string(),
            },
        }
    }
}
