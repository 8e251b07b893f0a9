//! `$(name)` variable substitution for recipe action strings.
//!
//! Identifiers match `[A-Za-z_][A-Za-z0-9_]*`. There is no escape mechanism;
//! a literal `$(` cannot be produced. Referencing a name the variable table
//! does not hold is a hard error.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, StencilError};

static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(([A-Za-z_][A-Za-z0-9_]*)\)").unwrap());

/// Replace every `$(name)` placeholder with its value from the table.
pub fn substitute_variables(text: &str, variables: &HashMap<String, String>) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for captures in VARIABLE_PATTERN.captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let value = variables
            .get(name.as_str())
            .ok_or_else(|| StencilError::UnknownVariable {
                name: name.as_str().to_string(),
            })?;
        output.push_str(&text[last..whole.start()]);
        output.push_str(value);
        last = whole.end();
    }

    output.push_str(&text[last..]);
    Ok(output)
}
