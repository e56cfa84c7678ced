//! Data operators: content edits and aggregates over the current region.
//!
//! Region traversal is always row-major and clamped to the live table, so
//! a selector made stale by structural edits degrades to a smaller (or
//! empty) walk instead of faulting. The aggregate quartet (`sum`, `avg`,
//! `count`, `len`) writes its result through the `[R,C]` anchor argument.
//!
//! Numeric coercion notes, calibrated against the engine's history:
//! * `sum`/`avg` abort at the first non-numeric cell in scan order and
//!   store the literal `NaN`; `avg` never averages the prefix it saw;
//! * empty cells coerce to numeric zero and do count as values;
//! * quote-wrapped numbers are *not* unwrapped here (only the `min`/`max`
//!   selectors do that).

use super::anchor;
use crate::error::ExecError;
use core_lex::num;
use core_select::Region;
use core_table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOp {
    Set,
    Clear,
    Swap,
    Sum,
    Avg,
    Count,
    Len,
}

pub(crate) fn execute(
    op: DataOp,
    table: &mut Table,
    region: Region,
    arguments: Option<&str>,
) -> Result<(), ExecError> {
    match op {
        DataOp::Set => {
            let value = arguments
                .ok_or_else(|| ExecError::Command("`set` requires a value".to_string()))?;
            set_region(table, region, value)
        }
        DataOp::Clear => set_region(table, region, ""),
        DataOp::Swap => {
            let (row, col) = anchor::parse(arguments, table)?;
            swap_with_anchor(table, region, row, col)
        }
        DataOp::Sum => {
            let (row, col) = anchor::parse(arguments, table)?;
            let text = match numeric_fold(table, region) {
                Some((sum, _)) => num::format_number(sum),
                None => "NaN".to_string(),
            };
            table.set_cell(row, col, &text)?;
            Ok(())
        }
        DataOp::Avg => {
            let (row, col) = anchor::parse(arguments, table)?;
            let text = match numeric_fold(table, region) {
                Some((sum, values)) => num::format_number(sum / values as f64),
                None => "NaN".to_string(),
            };
            table.set_cell(row, col, &text)?;
            Ok(())
        }
        DataOp::Count => {
            let (row, col) = anchor::parse(arguments, table)?;
            let mut occupied = 0usize;
            if let Some(clamped) = region.clamp_to(table.height(), table.width()) {
                for r in clamped.r1..=clamped.r2 {
                    for c in clamped.c1..=clamped.c2 {
                        if !table.content_at(r, c).is_empty() {
                            occupied += 1;
                        }
                    }
                }
            }
            table.set_cell(row, col, &num::format_number(occupied as f64))?;
            Ok(())
        }
        DataOp::Len => {
            let (row, col) = anchor::parse(arguments, table)?;
            // Measured cell is the region's bottom-right, clamped.
            let r = region.r2.min(table.height().saturating_sub(1));
            let c = region.c2.min(table.width().saturating_sub(1));
            let length = table.content_at(r, c).len();
            table.set_cell(row, col, &num::format_number(length as f64))?;
            Ok(())
        }
    }
}

/// Assign `value` to every cell of the region (clamped). Shared with the
/// variable store's `use`.
pub(crate) fn set_region(table: &mut Table, region: Region, value: &str) -> Result<(), ExecError> {
    let Some(clamped) = region.clamp_to(table.height(), table.width()) else {
        return Ok(());
    };
    for r in clamped.r1..=clamped.r2 {
        for c in clamped.c1..=clamped.c2 {
            table.set_cell(r, c, value)?;
        }
    }
    Ok(())
}

/// Swap each region cell with the anchor in turn, row-major, skipping the
/// anchor itself. With a multi-cell region the anchor ends up holding the
/// last-visited cell and earlier cells receive whatever the anchor held at
/// their moment of the walk.
fn swap_with_anchor(
    table: &mut Table,
    region: Region,
    row: usize,
    col: usize,
) -> Result<(), ExecError> {
    let Some(clamped) = region.clamp_to(table.height(), table.width()) else {
        return Ok(());
    };
    for r in clamped.r1..=clamped.r2 {
        for c in clamped.c1..=clamped.c2 {
            if r == row && c == col {
                continue;
            }
            let anchor_content = table.content_at(row, col).to_string();
            let cell_content = table.content_at(r, c).to_string();
            table.set_cell(row, col, &cell_content)?;
            table.set_cell(r, c, &anchor_content)?;
        }
    }
    Ok(())
}

/// Sum the region's numeric contents; `None` as soon as a non-numeric cell
/// turns up in scan order. Also reports how many values contributed.
fn numeric_fold(table: &Table, region: Region) -> Option<(f64, usize)> {
    let mut sum = 0.0;
    let mut values = 0usize;
    if let Some(clamped) = region.clamp_to(table.height(), table.width()) {
        for r in clamped.r1..=clamped.r2 {
            for c in clamped.c1..=clamped.c2 {
                let value = num::to_number(table.content_at(r, c))?;
                sum += value;
                values += 1;
            }
        }
    }
    Some((sum, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::GrowthConfig;

    fn table(text: &str) -> Table {
        let mut t = Table::parse(text, b" ", GrowthConfig::default());
        t.normalize();
        t
    }

    const WHOLE: Region = Region {
        r1: 0,
        c1: 0,
        r2: 9,
        c2: 9,
    };

    #[test]
    fn set_assigns_verbatim() {
        let mut t = table("a b\nc d\n");
        execute(DataOp::Set, &mut t, WHOLE, Some("\"x y\"")).unwrap();
        assert_eq!(t.content_at(1, 1), "\"x y\"");
    }

    #[test]
    fn set_without_value_is_command_error() {
        let mut t = table("a\n");
        assert!(matches!(
            execute(DataOp::Set, &mut t, WHOLE, None),
            Err(ExecError::Command(_))
        ));
    }

    #[test]
    fn clear_empties_the_region() {
        let mut t = table("a b\nc d\n");
        execute(DataOp::Clear, &mut t, Region::cell(0, 1), None).unwrap();
        assert_eq!(t.render(), "a \nc d\n");
    }

    #[test]
    fn swap_two_cells() {
        let mut t = table("a b\n");
        execute(DataOp::Swap, &mut t, Region::cell(0, 1), Some("[1,1]")).unwrap();
        assert_eq!(t.render(), "b a\n");
    }

    #[test]
    fn swap_region_rotates_through_anchor() {
        let mut t = table("1 2 3\n");
        execute(DataOp::Swap, &mut t, WHOLE, Some("[1,1]")).unwrap();
        // walk: (0,1) then (0,2); anchor ends with the last-visited cell
        assert_eq!(t.render(), "3 1 2\n");
    }

    #[test]
    fn sum_stores_at_anchor() {
        let mut t = table("1 2\n3 4\n");
        execute(DataOp::Sum, &mut t, WHOLE, Some("[1,1]")).unwrap();
        assert_eq!(t.render(), "10 2\n3 4\n");
    }

    #[test]
    fn sum_goes_nan_on_any_non_numeric() {
        let mut t = table("1 x\n3 4\n");
        execute(DataOp::Sum, &mut t, WHOLE, Some("[1,1]")).unwrap();
        assert_eq!(t.content_at(0, 0), "NaN");
    }

    #[test]
    fn sum_does_not_unwrap_quotes() {
        let mut t = table("'1' 2\n");
        execute(DataOp::Sum, &mut t, WHOLE, Some("[1,2]")).unwrap();
        assert_eq!(t.content_at(0, 1), "NaN");
    }

    #[test]
    fn avg_divides_by_value_count() {
        let mut t = table("1 2\n3 6\n");
        execute(DataOp::Avg, &mut t, WHOLE, Some("[1,1]")).unwrap();
        assert_eq!(t.content_at(0, 0), "3");
    }

    #[test]
    fn avg_aborts_to_nan_not_partial_average() {
        let mut t = table("1 2\nx 4\n");
        execute(DataOp::Avg, &mut t, WHOLE, Some("[2,2]")).unwrap();
        assert_eq!(t.content_at(1, 1), "NaN");
    }

    #[test]
    fn empty_cells_count_as_zero_values() {
        // bottom-right is a padded empty cell: sums as 0, counts as value
        let mut t = table("1 2\n3\n");
        execute(DataOp::Avg, &mut t, WHOLE, Some("[1,1]")).unwrap();
        assert_eq!(t.content_at(0, 0), "1.5");
    }

    #[test]
    fn count_tallies_non_empty_cells() {
        let mut t = table("a \nb c\n");
        execute(DataOp::Count, &mut t, WHOLE, Some("[1,2]")).unwrap();
        assert_eq!(t.content_at(0, 1), "3");
    }

    #[test]
    fn len_measures_bottom_right() {
        let mut t = table("ab cdef\ng hi\n");
        execute(
            DataOp::Len,
            &mut t,
            Region { r1: 0, c1: 0, r2: 0, c2: 1 },
            Some("[2,1]"),
        )
        .unwrap();
        // bottom-right of the region is (0,1) = "cdef"
        assert_eq!(t.content_at(1, 0), "4");
    }

    #[test]
    fn anchor_out_of_range_is_command_error() {
        let mut t = table("a b\n");
        assert!(matches!(
            execute(DataOp::Sum, &mut t, WHOLE, Some("[2,1]")),
            Err(ExecError::Command(_))
        ));
    }
}
