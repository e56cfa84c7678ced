//! `[R,C]` argument parsing shared by `swap`, `sum`, `avg`, `count`, `len`.
//!
//! The argument must be bracketed with exactly one comma; each part is a
//! 1-based positive integer or `-` for the last row/column. Both indices
//! are validated against the live table, so operators can address the
//! anchor cell without further checks. Any violation is a command error,
//! not a selector error; the argument belongs to the command.

use crate::error::ExecError;
use core_lex::{Escaping, num, split_fields};
use core_table::Table;

/// Parse the `[R,C]` anchor argument into 0-based `(row, col)`.
pub(crate) fn parse(arguments: Option<&str>, table: &Table) -> Result<(usize, usize), ExecError> {
    let raw = arguments
        .ok_or_else(|| ExecError::Command("missing `[R,C]` argument".to_string()))?;
    if raw.len() < 2 || !raw.starts_with('[') || !raw.ends_with(']') {
        return Err(ExecError::Command(format!(
            "malformed cell argument `{raw}`"
        )));
    }
    let body = &raw[1..raw.len() - 1];
    let parts = split_fields(body, b',', Escaping::Ignore);
    let [row_part, col_part] = parts.as_slice() else {
        return Err(ExecError::Command(format!(
            "expected `[R,C]`, got `{raw}`"
        )));
    };
    let row = resolve(row_part, table.height())?;
    let col = resolve(col_part, table.width())?;
    Ok((row, col))
}

fn resolve(part: &str, extent: usize) -> Result<usize, ExecError> {
    let value = if part == "-" {
        extent as i64
    } else {
        num::to_index(part)
            .ok_or_else(|| ExecError::Command(format!("bad cell coordinate `{part}`")))?
    };
    let index = value - 1;
    if index < 0 || index >= extent as i64 {
        return Err(ExecError::Command(format!(
            "cell coordinate {value} outside 1..={extent}"
        )));
    }
    Ok(index as usize)
}
