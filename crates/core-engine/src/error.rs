//! Engine error surface.
//!
//! One enum aggregates the typed errors of the lower layers so the binary
//! can map every abort onto its contract exit code. The variants mirror
//! the CLI's closed error taxonomy; `NumericConversion` is part of that
//! contract even though the current operators coerce operands only after
//! checking them, so no operator path produces it today.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    /// Unknown function, malformed `[R,C]`, bad `_N`, missing argument.
    #[error("malformed command: {0}")]
    Command(String),
    #[error(transparent)]
    Selector(#[from] core_select::SelectorError),
    #[error(transparent)]
    Table(#[from] core_table::TableError),
    #[error("numeric conversion failed for `{0}`")]
    NumericConversion(String),
    /// An invariant the engine maintains itself was observed broken.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}
