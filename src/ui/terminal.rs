//! Terminal implementation of [`UserInterface`].

use std::io::Write;
use std::process::Command;

use console::{style, Term};
use dialoguer::{Confirm, Input};

use crate::error::{Result, StencilError};

use super::UserInterface;

/// Convert dialoguer errors to StencilError.
fn map_dialoguer_err(e: dialoguer::Error) -> StencilError {
    StencilError::Io(e.into())
}

/// Interactive terminal UI backed by dialoguer prompts and `$EDITOR`.
pub struct TerminalUI {
    term: Term,
    quiet: bool,
}

impl TerminalUI {
    pub fn new() -> Self {
        Self::with_quiet(false)
    }

    /// Quiet mode suppresses messages and success output; errors and
    /// prompts still show.
    pub fn with_quiet(quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            quiet,
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", style(msg).red());
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .show_default(true)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)
    }

    fn input(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        let input = Input::<String>::new().with_prompt(question);
        let result = match default {
            Some(default) => input
                .default(default.to_string())
                .show_default(true)
                .interact_text_on(&self.term),
            None => input.interact_text_on(&self.term),
        };
        result.map_err(map_dialoguer_err)
    }

    fn edit(&mut self, seed: &str, extension: &str) -> Result<Option<String>> {
        edit_in_editor(seed, extension)
    }

    fn is_interactive(&self) -> bool {
        console::user_attended()
    }
}

/// Resolve the editor command: explicit override first, then the
/// conventional environment variables, then `vi`.
fn editor_command() -> String {
    ["STENCIL_EDITOR", "VISUAL", "EDITOR"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_string())
}

/// Run an editor session over a scratch file seeded with `seed`.
///
/// Returns `None` when the file was not saved, detected by an unchanged
/// modification time.
fn edit_in_editor(seed: &str, extension: &str) -> Result<Option<String>> {
    let mut file = tempfile::Builder::new()
        .prefix("stencil-")
        .suffix(extension)
        .tempfile()?;
    file.write_all(seed.as_bytes())?;
    file.flush()?;

    let path = file.path().to_path_buf();
    let before = std::fs::metadata(&path)?.modified()?;

    let editor = editor_command();
    let line = format!("{} \"{}\"", editor, path.display());
    let status = if cfg!(target_os = "windows") {
        let shell = std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string());
        Command::new(shell).arg("/C").arg(&line).status()
    } else {
        Command::new("sh").arg("-c").arg(&line).status()
    }
    .map_err(|source| StencilError::SpawnFailed {
        command: line.clone(),
        source,
    })?;

    if !status.success() {
        return Err(StencilError::Other(anyhow::anyhow!(
            "Editor '{}' exited with status {:?}",
            editor,
            status.code()
        )));
    }

    let after = std::fs::metadata(&path)?.modified()?;
    if after == before {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    Ok(Some(content))
}
