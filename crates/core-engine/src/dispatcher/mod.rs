//! Command-type dispatch loop.
//!
//! Decomposed into focused sub-modules so each operator family reads on
//! its own:
//! * `structural` - row/column shape edits (`irow`..`dcol`)
//! * `data`       - content edits and aggregates (`set`..`len`)
//! * `anchor`     - the shared `[R,C]` argument parser
//!
//! Variable commands live one level up in [`crate::vars`] because the bank
//! outlives any single dispatch.
//!
//! Dispatch rules, in order:
//! 1. empty commands are no-ops (a lone `;` in a script is legal);
//! 2. selector commands re-evaluate the current selector and never touch
//!    the table;
//! 3. data and variable commands are skipped silently while the table has
//!    zero rows or zero columns; structural commands still run, which is
//!    how an empty table grows its first cell;
//! 4. anything unrecognized aborts with a command error.

pub mod anchor;
pub mod data;
pub mod structural;

use crate::error::ExecError;
use crate::vars::{self, VariableBank, VarOp};
use core_config::EngineConfig;
use core_script::Command;
use core_select::SelectorEngine;
use core_table::Table;
use tracing::debug;

pub use data::DataOp;
pub use structural::StructuralOp;

/// Classification of a non-selector function token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Empty,
    Structural(StructuralOp),
    Data(DataOp),
    Variable(VarOp),
    Unknown,
}

impl CommandKind {
    pub fn classify(function: &str) -> CommandKind {
        match function {
            "" => CommandKind::Empty,
            "irow" => CommandKind::Structural(StructuralOp::InsertRow),
            "arow" => CommandKind::Structural(StructuralOp::AppendRow),
            "drow" => CommandKind::Structural(StructuralOp::DeleteRows),
            "icol" => CommandKind::Structural(StructuralOp::InsertCol),
            "acol" => CommandKind::Structural(StructuralOp::AppendCol),
            "dcol" => CommandKind::Structural(StructuralOp::DeleteCols),
            "set" => CommandKind::Data(DataOp::Set),
            "clear" => CommandKind::Data(DataOp::Clear),
            "swap" => CommandKind::Data(DataOp::Swap),
            "sum" => CommandKind::Data(DataOp::Sum),
            "avg" => CommandKind::Data(DataOp::Avg),
            "count" => CommandKind::Data(DataOp::Count),
            "len" => CommandKind::Data(DataOp::Len),
            "def" => CommandKind::Variable(VarOp::Def),
            "use" => CommandKind::Variable(VarOp::Use),
            "inc" => CommandKind::Variable(VarOp::Inc),
            _ => CommandKind::Unknown,
        }
    }
}

/// Run a parsed script against `table` to completion or first error.
///
/// Selector warnings (`min`/`max` over a region with no numeric cell) go
/// to stdout; they are part of the CLI contract, not diagnostics.
pub fn execute_script(
    table: &mut Table,
    commands: &[Command],
    config: &EngineConfig,
) -> Result<(), ExecError> {
    let mut selector = SelectorEngine::new();
    let mut bank = VariableBank::new(config.variables.count);

    for command in commands {
        if command.is_selector() {
            if let Some(warning) = selector.apply(&command.function, table)? {
                println!("{warning}");
            }
            continue;
        }

        debug!(
            target: "engine",
            selector = %selector.current(),
            function = %command.function,
            arguments = command.arguments.as_deref(),
            "dispatch"
        );

        let populated = table.height() > 0 && table.width() > 0;
        match CommandKind::classify(&command.function) {
            CommandKind::Empty => {}
            CommandKind::Structural(op) => {
                structural::execute(op, table, selector.current())?;
            }
            CommandKind::Data(op) => {
                if populated {
                    data::execute(
                        op,
                        table,
                        selector.current(),
                        command.arguments.as_deref(),
                    )?;
                }
            }
            CommandKind::Variable(op) => {
                if populated {
                    vars::execute(
                        op,
                        table,
                        selector.current(),
                        command.arguments.as_deref(),
                        &mut bank,
                    )?;
                }
            }
            CommandKind::Unknown => {
                return Err(ExecError::Command(format!(
                    "unknown function `{}`",
                    command.function
                )));
            }
        }
    }
    Ok(())
}
