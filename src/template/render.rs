//! Template rendering pipeline.
//!
//! Rendering happens in two passes: strict evaluation against the supplied
//! context, then command substitution over the evaluated text. A `{>cmd<}`
//! block is therefore never subject to template evaluation itself; only
//! literal text that survived evaluation can contain one.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, StencilError};
use crate::shell::{self, CommandOptions};

use super::eval::{context_from_toml, Evaluator};
use super::parser;

static COMMAND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{>(.*?)<\}").unwrap());

/// Render template source against a fully resolved context.
pub fn render(source: &str, context: &toml::Table) -> Result<String> {
    let template = parser::parse(source).map_err(|message| StencilError::TemplateSyntax {
        message,
    })?;
    let mut evaluator = Evaluator::new(context_from_toml(context));
    let evaluated = evaluator
        .render(&template)
        .map_err(|message| StencilError::RenderFailed { message })?;
    substitute_command_blocks(&evaluated)
}

/// Replace every `{>cmd<}` block with the stdout of running its contents as
/// one shell command. Trailing newlines of the output are stripped; internal
/// newlines are preserved.
pub fn substitute_command_blocks(content: &str) -> Result<String> {
    let mut output = String::with_capacity(content.len());
    let mut last = 0;

    for captures in COMMAND_PATTERN.captures_iter(content) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        let command = inner.as_str().trim();
        if command.is_empty() {
            return Err(StencilError::EmptyCommandBlock);
        }

        let options = CommandOptions {
            capture: true,
            ..Default::default()
        };
        let result = shell::run_shell(command, &options)?;
        if !result.success {
            let stderr = result.stderr.trim();
            let detail = if stderr.is_empty() {
                String::new()
            } else {
                format!(": {}", stderr)
            };
            return Err(StencilError::CommandBlockFailed {
                command: command.to_string(),
                code: result.exit_code.unwrap_or(-1),
                detail,
            });
        }

        output.push_str(&content[last..whole.start()]);
        output.push_str(result.stdout.trim_end_matches('\n'));
        last = whole.end();
    }

    output.push_str(&content[last..]);
    Ok(output)
}
