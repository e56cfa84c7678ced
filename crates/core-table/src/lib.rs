//! Dynamic two-dimensional cell grid.
//!
//! The table is a strict ownership tree: `Table` owns its rows, each `Row`
//! owns its cells, each `Cell` owns its content bytes. Selectors and the
//! variable bank elsewhere hold indices or copies, never references into
//! the grid, so teardown is a plain `Drop` valid at any point, including
//! mid-mutation: no operation here ever exposes a row in a half-built
//! state.
//!
//! Capacity for all three layers grows in fixed increments taken from
//! [`GrowthConfig`] (row slots, cell slots, content bytes). `Vec` and
//! `String` never hand out uninitialized storage, so the zero-init
//! invariant the growth policy exists to protect holds structurally.
//!
//! Invariants (after [`Table::normalize`], preserved by every mutation):
//! * all rows have the same cell count;
//! * a freshly inserted row or column consists of empty cells;
//! * the output delimiter is a single ASCII byte fixed at load time.

use core_config::GrowthConfig;
use core_lex::{Escaping, normalize_delims, split_fields};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("row index {0} outside table")]
    RowIndex(usize),
    #[error("column index {0} outside table")]
    ColIndex(usize),
    #[error("operation requires a populated table")]
    Unpopulated,
}

/// A single cell. Empty content is the empty string, never an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    content: String,
}

impl Cell {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Replace the content, growing the backing buffer in `content_step`
    /// increments when it is outgrown.
    fn assign(&mut self, value: &str, content_step: usize) {
        self.content.clear();
        let cap = self.content.capacity();
        if value.len() > cap {
            let step = content_step.max(1);
            let extra = (value.len() - cap).div_ceil(step) * step;
            self.content.reserve_exact(cap + extra);
        }
        self.content.push_str(value);
    }
}

/// One table row: an ordered run of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    fn with_width(width: usize, growth: GrowthConfig) -> Self {
        let mut row = Row::default();
        for _ in 0..width {
            row.push_empty(growth.cells_step);
        }
        row
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn ensure_cell_slot(&mut self, cells_step: usize) {
        if self.cells.len() == self.cells.capacity() {
            self.cells.reserve_exact(cells_step.max(1));
        }
    }

    fn push_empty(&mut self, cells_step: usize) {
        self.ensure_cell_slot(cells_step);
        self.cells.push(Cell::default());
    }

    fn insert_empty(&mut self, index: usize, cells_step: usize) {
        self.ensure_cell_slot(cells_step);
        self.cells.insert(index, Cell::default());
    }
}

/// The table proper: rows plus the canonical output delimiter.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    delim: u8,
    growth: GrowthConfig,
}

impl Table {
    pub fn new(delim: u8, growth: GrowthConfig) -> Self {
        debug_assert!(delim.is_ascii(), "output delimiter must be ASCII");
        Self {
            rows: Vec::new(),
            delim,
            growth,
        }
    }

    /// Parse file text into a table. Each logical line becomes one row;
    /// alternative delimiters are rewritten to the canonical byte first,
    /// then the line splits on plain canonical occurrences. Cells keep
    /// their raw bytes, quotes and backslashes included.
    pub fn parse(text: &str, delims: &[u8], growth: GrowthConfig) -> Self {
        let canonical = delims.first().copied().unwrap_or(b' ');
        let mut table = Table::new(canonical, growth);
        for line in core_lex::logical_lines(text) {
            let line = normalize_delims(line, delims);
            table.push_row_from_line(&line);
        }
        debug!(target: "table", rows = table.height(), "table_parsed");
        table
    }

    fn push_row_from_line(&mut self, line: &str) {
        self.ensure_row_slot();
        let mut row = Row::default();
        for field in split_fields(line, self.delim, Escaping::Respect) {
            row.ensure_cell_slot(self.growth.cells_step);
            let mut cell = Cell::default();
            cell.assign(field, self.growth.content_step);
            row.cells.push(cell);
        }
        self.rows.push(row);
    }

    /// Render the table back to file text: cells joined with the canonical
    /// delimiter, `\n` after every row, nothing else. A zero-row table
    /// renders as the empty string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for (j, cell) in row.cells.iter().enumerate() {
                if j > 0 {
                    out.push(self.delim as char);
                }
                out.push_str(cell.content());
            }
            out.push('\n');
        }
        out
    }

    pub fn delim(&self) -> u8 {
        self.delim
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell count shared by every row (0 for a zero-row table). Rows only
    /// diverge transiently before [`Table::normalize`] runs.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Row::len)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cell(col))
    }

    /// Cell content, or the empty string outside the table. Callers that
    /// need to distinguish use [`Table::cell`].
    pub fn content_at(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map_or("", Cell::content)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), TableError> {
        let content_step = self.growth.content_step;
        let r = self.rows.get_mut(row).ok_or(TableError::RowIndex(row))?;
        let cell = r.cells.get_mut(col).ok_or(TableError::ColIndex(col))?;
        cell.assign(value, content_step);
        Ok(())
    }

    fn ensure_row_slot(&mut self) {
        if self.rows.len() == self.rows.capacity() {
            self.rows.reserve_exact(self.growth.rows_step.max(1));
        }
    }

    /// Append an empty row at the bottom. With no reference row the new
    /// row gets a single cell.
    pub fn append_empty_row(&mut self) {
        let width = if self.rows.is_empty() { 1 } else { self.width() };
        self.ensure_row_slot();
        let row = Row::with_width(width, self.growth);
        self.rows.push(row);
    }

    /// Insert an empty row at `index`, pushing that row and everything
    /// below it down.
    pub fn insert_row_at(&mut self, index: usize) -> Result<(), TableError> {
        if self.rows.is_empty() {
            return Err(TableError::Unpopulated);
        }
        if index >= self.rows.len() {
            return Err(TableError::RowIndex(index));
        }
        let width = self.width();
        self.ensure_row_slot();
        self.rows.insert(index, Row::with_width(width, self.growth));
        Ok(())
    }

    /// Delete rows `start..=end` inclusive. `end` is clamped to the table;
    /// a range lying wholly below the table deletes nothing.
    pub fn delete_row_range(&mut self, start: usize, end: usize) {
        if self.rows.is_empty() || start >= self.rows.len() {
            return;
        }
        let end = end.min(self.rows.len() - 1);
        if start > end {
            return;
        }
        self.rows.drain(start..=end);
    }

    /// Append an empty column on the right of every row.
    pub fn append_col(&mut self) -> Result<(), TableError> {
        if self.rows.is_empty() {
            return Err(TableError::Unpopulated);
        }
        let cells_step = self.growth.cells_step;
        for row in &mut self.rows {
            row.push_empty(cells_step);
        }
        Ok(())
    }

    /// Insert an empty column at `index` in every row, pushing the
    /// existing columns right.
    pub fn insert_col_at(&mut self, index: usize) -> Result<(), TableError> {
        if self.rows.is_empty() {
            return Err(TableError::Unpopulated);
        }
        if index >= self.width() {
            return Err(TableError::ColIndex(index));
        }
        let cells_step = self.growth.cells_step;
        for row in &mut self.rows {
            row.insert_empty(index, cells_step);
        }
        Ok(())
    }

    /// Delete columns `start..=end` inclusive from every row, clamping
    /// `end` and ignoring a range lying wholly to the right of the table.
    pub fn delete_col_range(&mut self, start: usize, end: usize) {
        let width = self.width();
        if width == 0 || start >= width {
            return;
        }
        let end = end.min(width - 1);
        if start > end {
            return;
        }
        for row in &mut self.rows {
            let row_end = end.min(row.cells.len().saturating_sub(1));
            if start < row.cells.len() {
                row.cells.drain(start..=row_end);
            }
        }
    }

    /// One-shot post-load normalization: pad every row with empty cells to
    /// the widest row, then trim trailing columns that are empty in every
    /// row. Column 0 is never trimmed, even when empty.
    pub fn normalize(&mut self) {
        let growth = self.growth;
        let max_width = self.rows.iter().map(Row::len).max().unwrap_or(0);
        for row in &mut self.rows {
            while row.len() < max_width {
                row.push_empty(growth.cells_step);
            }
        }

        let mut width = max_width;
        while width > 1 {
            let last = width - 1;
            let all_empty = self
                .rows
                .iter()
                .all(|row| row.cell(last).is_none_or(Cell::is_empty));
            if !all_empty {
                break;
            }
            for row in &mut self.rows {
                row.cells.remove(last);
            }
            width -= 1;
        }
        debug!(target: "table", rows = self.height(), cols = self.width(), "table_normalized");
    }
}
