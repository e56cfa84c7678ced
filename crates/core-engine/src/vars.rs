//! Temporary variable store and the `def` / `use` / `inc` commands.
//!
//! A fixed bank of string slots addressed as `_0`..`_N`. Unset slots are
//! distinct from slots holding the empty string: `use` on an unset slot is
//! a no-op, while an empty-string slot overwrites the region with empty
//! cells.

use crate::dispatcher::data::set_region;
use crate::error::ExecError;
use core_lex::num;
use core_select::Region;
use core_table::Table;

/// Fixed bank of optional string slots.
#[derive(Debug, Clone)]
pub struct VariableBank {
    slots: Vec<Option<String>>,
}

impl VariableBank {
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(Option::as_deref)
    }

    pub fn set(&mut self, slot: usize, value: String) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = Some(value);
        }
    }
}

/// Which variable command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarOp {
    Def,
    Use,
    Inc,
}

/// Parse a `_N` slot argument. The underscore is mandatory and the
/// remainder must be an integer inside the bank.
fn parse_slot(arguments: Option<&str>, count: usize) -> Result<usize, ExecError> {
    let raw = arguments
        .ok_or_else(|| ExecError::Command("variable commands need a `_N` argument".to_string()))?;
    let digits = raw
        .strip_prefix('_')
        .ok_or_else(|| ExecError::Command(format!("expected `_N`, got `{raw}`")))?;
    let index = num::to_index(digits)
        .ok_or_else(|| ExecError::Command(format!("bad variable index `{raw}`")))?;
    if index < 0 || index >= count as i64 {
        return Err(ExecError::Command(format!(
            "variable index {index} outside _0..=_{}",
            count.saturating_sub(1)
        )));
    }
    Ok(index as usize)
}

pub(crate) fn execute(
    op: VarOp,
    table: &mut Table,
    region: Region,
    arguments: Option<&str>,
    bank: &mut VariableBank,
) -> Result<(), ExecError> {
    let slot = parse_slot(arguments, bank.len())?;
    match op {
        VarOp::Def => {
            if !region.is_single_cell() {
                return Err(ExecError::Command(
                    "`def` requires a single-cell selection".to_string(),
                ));
            }
            // A stale selector pointing outside the table defines nothing.
            if let Some(cell) = table.cell(region.r1, region.c1) {
                bank.set(slot, cell.content().to_string());
            }
            Ok(())
        }
        VarOp::Use => {
            if let Some(value) = bank.get(slot) {
                let value = value.to_string();
                set_region(table, region, &value)?;
            }
            Ok(())
        }
        VarOp::Inc => {
            let next = match bank.get(slot).map(num::to_number) {
                Some(Some(current)) => current + 1.0,
                // Unset, or set but non-numeric: restart at 1.
                _ => 1.0,
            };
            bank.set(slot, num::format_number(next));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_unset() {
        let bank = VariableBank::new(10);
        assert_eq!(bank.len(), 10);
        assert_eq!(bank.get(0), None);
    }

    #[test]
    fn unset_differs_from_empty() {
        let mut bank = VariableBank::new(10);
        bank.set(3, String::new());
        assert_eq!(bank.get(3), Some(""));
        assert_eq!(bank.get(4), None);
    }

    #[test]
    fn parse_slot_accepts_bank_range() {
        assert_eq!(parse_slot(Some("_0"), 10).unwrap(), 0);
        assert_eq!(parse_slot(Some("_9"), 10).unwrap(), 9);
    }

    #[test]
    fn parse_slot_rejects_bad_shapes() {
        assert!(parse_slot(None, 10).is_err());
        assert!(parse_slot(Some("0"), 10).is_err());
        assert!(parse_slot(Some("_"), 10).is_err());
        assert!(parse_slot(Some("_x"), 10).is_err());
        assert!(parse_slot(Some("_10"), 10).is_err());
        assert!(parse_slot(Some("_-1"), 10).is_err());
    }
}
