//! Command reader: raw script → raw command strings.

use core_lex::{Escaping, logical_lines, split_fields};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open command file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
}

/// Split an inline script on `;`. Quotes and backslashes do not protect the
/// separator here; the top-level script syntax has no quoted runs of its
/// own. The empty string is an empty script, but `;` alone is two (empty)
/// commands.
pub fn inline_commands(script: &str) -> Vec<String> {
    if script.is_empty() {
        return Vec::new();
    }
    split_fields(script, b';', Escaping::Ignore)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Read commands from a file, one per line. Each line is cut at the first
/// `\r`; a trailing newline does not contribute an empty command.
pub fn file_commands(path: &Path) -> Result<Vec<String>, ReadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(logical_lines(&text).map(str::to_string).collect())
}
