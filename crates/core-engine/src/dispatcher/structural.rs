//! Structural operators: row and column shape edits.
//!
//! All six read the current selector and clamp or validate against the
//! live table at execution time: the selector may be stale after earlier
//! structural edits, and only the start coordinates are allowed to fault
//! (`r2`/`c2` always clamp).

use crate::error::ExecError;
use core_select::Region;
use core_table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralOp {
    InsertRow,
    AppendRow,
    DeleteRows,
    InsertCol,
    AppendCol,
    DeleteCols,
}

pub(crate) fn execute(op: StructuralOp, table: &mut Table, region: Region) -> Result<(), ExecError> {
    match op {
        // irow: empty row at r1, existing rows shift down.
        StructuralOp::InsertRow => {
            table.insert_row_at(region.r1)?;
            Ok(())
        }
        // arow: empty row after r2; past the last row it appends, which is
        // also how an empty table grows its first 1x1 row.
        StructuralOp::AppendRow => {
            if region.r2 + 1 >= table.height() {
                table.append_empty_row();
            } else {
                table.insert_row_at(region.r2 + 1)?;
            }
            Ok(())
        }
        StructuralOp::DeleteRows => {
            table.delete_row_range(region.r1, region.r2);
            Ok(())
        }
        // Column edits silently skip a zero-row table; there is nothing to
        // keep rectangular yet.
        StructuralOp::InsertCol => {
            if table.height() > 0 {
                table.insert_col_at(region.c1)?;
            }
            Ok(())
        }
        StructuralOp::AppendCol => {
            if table.height() == 0 {
                return Ok(());
            }
            if region.c2 + 1 >= table.width() {
                table.append_col()?;
            } else {
                table.insert_col_at(region.c2 + 1)?;
            }
            Ok(())
        }
        StructuralOp::DeleteCols => {
            if table.height() > 0 {
                table.delete_col_range(region.c1, region.c2);
            }
            Ok(())
        }
    }
}
