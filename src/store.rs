//! Persistent storage for templates and recipes.
//!
//! One SQLite database holds two identical tables, `templates` and
//! `recipes`, each a key-value table keyed by unique name. The database
//! lives under `$STENCIL_HOME` when set, else `~/.stencil`.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, StencilError};

const DB_FILENAME: &str = "store.db";

const CREATE_TEMPLATES_SQL: &str = "
CREATE TABLE IF NOT EXISTS templates (
    name TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const CREATE_RECIPES_SQL: &str = "
CREATE TABLE IF NOT EXISTS recipes (
    name TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// The two storage namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    Templates,
    Recipes,
}

impl Namespace {
    fn table(self) -> &'static str {
        match self {
            Namespace::Templates => "templates",
            Namespace::Recipes => "recipes",
        }
    }

    fn missing(self, name: &str) -> StencilError {
        match self {
            Namespace::Templates => StencilError::TemplateNotFound {
                name: name.to_string(),
            },
            Namespace::Recipes => StencilError::RecipeNotFound {
                name: name.to_string(),
            },
        }
    }
}

/// Handle to the template/recipe database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if needed) the store in the default location.
    pub fn open_default() -> Result<Self> {
        Self::open_in(&default_dir()?)
    }

    /// Open (creating if needed) the store under an explicit directory.
    pub fn open_in(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(DB_FILENAME))?;
        conn.execute_batch(&format!("{};{};", CREATE_TEMPLATES_SQL, CREATE_RECIPES_SQL))?;
        tracing::debug!(dir = %dir.display(), "opened store");
        Ok(Self { conn })
    }

    // Templates namespace.

    pub fn fetch_template(&self, name: &str) -> Result<String> {
        self.fetch(Namespace::Templates, name)
    }

    pub fn template_exists(&self, name: &str) -> Result<bool> {
        self.exists(Namespace::Templates, name)
    }

    pub fn list_templates(&self) -> Result<Vec<String>> {
        self.list(Namespace::Templates)
    }

    pub fn insert_template(&self, name: &str, content: &str) -> Result<()> {
        self.insert(Namespace::Templates, name, content)
    }

    pub fn update_template(&self, name: &str, content: &str) -> Result<()> {
        self.update(Namespace::Templates, name, content)
    }

    pub fn delete_template(&self, name: &str) -> Result<()> {
        self.delete(Namespace::Templates, name)
    }

    // Recipes namespace.

    pub fn fetch_recipe(&self, name: &str) -> Result<String> {
        self.fetch(Namespace::Recipes, name)
    }

    pub fn recipe_exists(&self, name: &str) -> Result<bool> {
        self.exists(Namespace::Recipes, name)
    }

    pub fn list_recipes(&self) -> Result<Vec<String>> {
        self.list(Namespace::Recipes)
    }

    pub fn insert_recipe(&self, name: &str, content: &str) -> Result<()> {
        self.insert(Namespace::Recipes, name, content)
    }

    pub fn update_recipe(&self, name: &str, content: &str) -> Result<()> {
        self.update(Namespace::Recipes, name, content)
    }

    pub fn delete_recipe(&self, name: &str) -> Result<()> {
        self.delete(Namespace::Recipes, name)
    }

    fn fetch(&self, ns: Namespace, name: &str) -> Result<String> {
        let sql = format!("SELECT content FROM {} WHERE name = ?1", ns.table());
        self.conn
            .query_row(&sql, [name], |row| row.get::<_, String>(0))
            .optional()?
            .ok_or_else(|| ns.missing(name))
    }

    fn exists(&self, ns: Namespace, name: &str) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE name = ?1", ns.table());
        let found = self
            .conn
            .query_row(&sql, [name], |_| Ok(()))
            .optional()?
            .is_some();
        Ok(found)
    }

    fn list(&self, ns: Namespace) -> Result<Vec<String>> {
        let sql = format!("SELECT name FROM {} ORDER BY name", ns.table());
        let mut stmt = self.conn.prepare(&sql)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn insert(&self, ns: Namespace, name: &str, content: &str) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (name, content) VALUES (?1, ?2)",
            ns.table()
        );
        self.conn.execute(&sql, [name, content])?;
        tracing::debug!(table = ns.table(), name, "inserted entry");
        Ok(())
    }

    fn update(&self, ns: Namespace, name: &str, content: &str) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET content = ?1, updated_at = CURRENT_TIMESTAMP WHERE name = ?2",
            ns.table()
        );
        self.conn.execute(&sql, [content, name])?;
        tracing::debug!(table = ns.table(), name, "updated entry");
        Ok(())
    }

    fn delete(&self, ns: Namespace, name: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE name = ?1", ns.table());
        self.conn.execute(&sql, [name])?;
        tracing::debug!(table = ns.table(), name, "deleted entry");
        Ok(())
    }
}

/// Application data directory: `$STENCIL_HOME` override, else `~/.stencil`.
fn default_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("STENCIL_HOME") {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".stencil"))
        .ok_or_else(|| StencilError::Other(anyhow::anyhow!("could not determine home directory")))
}
