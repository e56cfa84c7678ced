//! Stateful selector machine.
//!
//! Selector commands pick the rectangular region the next mutation acts
//! on. The engine holds two regions: the *current* selector, re-evaluated
//! by every selector command, and the *saved* selector written by `[set]`
//! and restored by `[_]`. Both start at the origin cell.
//!
//! Grammar dispatch happens on the head token of the bracket body (split
//! on the first space with escapes ignored); only `find` consumes the tail
//! and the other forms ignore it. Fixed forms (`_,_`, `-,-`, `_,-`, `-,_`,
//! `-,-,-,-`) match the head verbatim; anything else is parsed as a 2- or
//! 4-part coordinate list.
//!
//! Invariants:
//! * coordinate forms validate against the live table before mutating the
//!   current region, so a selector error leaves both regions untouched;
//! * content-dependent forms (`find`, `min`, `max`) leave the region
//!   unchanged when nothing matches; `min`/`max` additionally surface a
//!   [`Warning`] that the caller prints to stdout;
//! * on an empty table the "last" coordinate saturates to 0; consumers
//!   clamp every traversal against live extents, so the degenerate region
//!   never dereferences a cell.

use core_lex::{Escaping, field_and_rest, num, split_fields};
use core_table::Table;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// A rectangular run of cells, 0-based, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub r1: usize,
    pub c1: usize,
    pub r2: usize,
    pub c2: usize,
}

impl Region {
    pub const ORIGIN: Region = Region {
        r1: 0,
        c1: 0,
        r2: 0,
        c2: 0,
    };

    pub fn cell(row: usize, col: usize) -> Region {
        Region {
            r1: row,
            c1: col,
            r2: row,
            c2: col,
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.r1 == self.r2 && self.c1 == self.c2
    }

    /// Clamp the region to the live table extents; `None` when nothing of
    /// it lies inside the table (including the empty table).
    pub fn clamp_to(&self, height: usize, width: usize) -> Option<Region> {
        if height == 0 || width == 0 || self.r1 >= height || self.c1 >= width {
            return None;
        }
        Some(Region {
            r1: self.r1,
            c1: self.c1,
            r2: self.r2.min(height - 1),
            c2: self.c2.min(width - 1),
        })
    }
}

impl fmt::Display for Region {
    /// 1-based rendering, the shape users type in selectors.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{}]",
            self.r1 + 1,
            self.c1 + 1,
            self.r2 + 1,
            self.c2 + 1
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("unrecognized selector form `{0}`")]
    InvalidForm(String),
    #[error("selector coordinate {value} outside 1..={max}")]
    OutOfRange { value: i64, max: usize },
    #[error("selector range descends ({first} > {second})")]
    Descending { first: i64, second: i64 },
    #[error("`-` in a start coordinate requires `-` in the matching end coordinate")]
    MixedAnchor,
}

/// Emitted when `min`/`max` finds no numeric cell; goes to stdout and does
/// not alter the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

impl Extreme {
    fn label(self) -> &'static str {
        match self {
            Extreme::Min => "minimum",
            Extreme::Max => "maximum",
        }
    }

    fn prefers(self, candidate: f64, best: f64) -> bool {
        match self {
            Extreme::Min => candidate < best,
            Extreme::Max => candidate > best,
        }
    }
}

/// One coordinate token of a 2- or 4-part selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Index(i64),
    Dash,
    Underscore,
}

fn parse_part(token: &str) -> Result<Part, SelectorError> {
    if let Some(value) = num::to_index(token) {
        Ok(Part::Index(value))
    } else {
        match token {
            "-" => Ok(Part::Dash),
            "_" => Ok(Part::Underscore),
            _ => Err(SelectorError::InvalidForm(token.to_string())),
        }
    }
}

/// Validate a 1-based coordinate against an extent and convert to 0-based.
fn checked_index(value: i64, max: usize) -> Result<usize, SelectorError> {
    if value < 1 || value > max as i64 {
        return Err(SelectorError::OutOfRange { value, max });
    }
    Ok((value - 1) as usize)
}

pub struct SelectorEngine {
    current: Region,
    saved: Region,
}

impl Default for SelectorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorEngine {
    pub fn new() -> Self {
        Self {
            current: Region::ORIGIN,
            saved: Region::ORIGIN,
        }
    }

    pub fn current(&self) -> Region {
        self.current
    }

    pub fn saved(&self) -> Region {
        self.saved
    }

    /// Evaluate one selector command (brackets included) against `table`.
    pub fn apply(
        &mut self,
        function: &str,
        table: &Table,
    ) -> Result<Option<Warning>, SelectorError> {
        debug_assert!(
            function.len() >= 2 && function.starts_with('[') && function.ends_with(']'),
            "selector commands arrive bracketed"
        );
        let body = &function[1..function.len() - 1];
        let (head, tail) = field_and_rest(body, b' ', Escaping::Ignore, 0);

        let warning = match head {
            "find" => {
                self.find(tail, table);
                None
            }
            "min" => self.extreme(Extreme::Min, table),
            "max" => self.extreme(Extreme::Max, table),
            "_,_" => {
                self.current = Region {
                    r1: 0,
                    c1: 0,
                    r2: table.height().saturating_sub(1),
                    c2: table.width().saturating_sub(1),
                };
                None
            }
            "-,-" | "-,-,-,-" => {
                self.current = Region::cell(
                    table.height().saturating_sub(1),
                    table.width().saturating_sub(1),
                );
                None
            }
            "_,-" => {
                self.current = Region {
                    r1: 0,
                    c1: table.width().saturating_sub(1),
                    r2: table.height().saturating_sub(1),
                    c2: table.width().saturating_sub(1),
                };
                None
            }
            "-,_" => {
                self.current = Region {
                    r1: table.height().saturating_sub(1),
                    c1: 0,
                    r2: table.height().saturating_sub(1),
                    c2: table.width().saturating_sub(1),
                };
                None
            }
            "_" => {
                self.current = self.saved;
                None
            }
            "set" => {
                self.saved = self.current;
                None
            }
            _ => {
                self.current = coordinates(head, table)?;
                None
            }
        };
        debug!(target: "select", selector = %self.current, "selector_applied");
        Ok(warning)
    }

    /// Collapse onto the first region cell (row-major) whose content starts
    /// with `needle`; no match leaves the region unchanged. The empty
    /// needle matches the first cell.
    fn find(&mut self, needle: &str, table: &Table) {
        let Some(region) = self.current.clamp_to(table.height(), table.width()) else {
            return;
        };
        for row in region.r1..=region.r2 {
            for col in region.c1..=region.c2 {
                if table.content_at(row, col).starts_with(needle) {
                    self.current = Region::cell(row, col);
                    return;
                }
            }
        }
    }

    /// Collapse onto the numeric extreme of the region. Cell contents
    /// wrapped in matching quotes are unwrapped before coercion; the first
    /// occurrence wins ties. With no numeric cell the region stays put and
    /// a warning is returned.
    fn extreme(&mut self, which: Extreme, table: &Table) -> Option<Warning> {
        let mut best: Option<(f64, usize, usize)> = None;
        if let Some(region) = self.current.clamp_to(table.height(), table.width()) {
            for row in region.r1..=region.r2 {
                for col in region.c1..=region.c2 {
                    let content = num::unwrap_quotes(table.content_at(row, col));
                    let Some(value) = num::to_number(content) else {
                        continue;
                    };
                    let better = match best {
                        None => true,
                        Some((incumbent, _, _)) => which.prefers(value, incumbent),
                    };
                    if better {
                        best = Some((value, row, col));
                    }
                }
            }
        }
        match best {
            Some((_, row, col)) => {
                self.current = Region::cell(row, col);
                None
            }
            None => Some(Warning {
                message: format!(
                    "[WARNING] no numeric cell for {} in {} selection",
                    which.label(),
                    self.current
                ),
            }),
        }
    }
}

/// Parse a 2- or 4-part coordinate selector head.
fn coordinates(head: &str, table: &Table) -> Result<Region, SelectorError> {
    let parts = split_fields(head, b',', Escaping::Ignore)
        .into_iter()
        .map(parse_part)
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [first, second] => two_point(*first, *second, table),
        [a, b, c, d] => four_point([*a, *b, *c, *d], table),
        _ => Err(SelectorError::InvalidForm(head.to_string())),
    }
}

fn two_point(row_part: Part, col_part: Part, table: &Table) -> Result<Region, SelectorError> {
    let rows = table.height();
    let cols = table.width();
    match (row_part, col_part) {
        // [R,C]
        (Part::Index(r), Part::Index(c)) => {
            let row = checked_index(r, rows)?;
            let col = checked_index(c, cols)?;
            Ok(Region::cell(row, col))
        }
        // [R,_]: row R, all columns
        (Part::Index(r), Part::Underscore) => {
            let row = checked_index(r, rows)?;
            Ok(Region {
                r1: row,
                c1: 0,
                r2: row,
                c2: cols.saturating_sub(1),
            })
        }
        // [R,-]: row R, last column
        (Part::Index(r), Part::Dash) => {
            let row = checked_index(r, rows)?;
            Ok(Region::cell(row, cols.saturating_sub(1)))
        }
        // [_,C]: column C, all rows
        (Part::Underscore, Part::Index(c)) => {
            let col = checked_index(c, cols)?;
            Ok(Region {
                r1: 0,
                c1: col,
                r2: rows.saturating_sub(1),
                c2: col,
            })
        }
        // [-,C]: last row, column C
        (Part::Dash, Part::Index(c)) => {
            let col = checked_index(c, cols)?;
            Ok(Region::cell(rows.saturating_sub(1), col))
        }
        _ => Err(SelectorError::InvalidForm(
            "unsupported `-`/`_` pairing".to_string(),
        )),
    }
}

fn four_point(parts: [Part; 4], table: &Table) -> Result<Region, SelectorError> {
    // `_` has no meaning in the 4-part form.
    if parts.contains(&Part::Underscore) {
        return Err(SelectorError::InvalidForm(
            "`_` in a 4-part selector".to_string(),
        ));
    }
    let [p_r1, p_c1, p_r2, p_c2] = parts;

    // `-` in a start coordinate only makes sense when the mirrored end
    // coordinate is `-` as well ([-,C1,R2,C2] would be an empty range).
    if matches!((p_r1, p_r2), (Part::Dash, Part::Index(_)))
        || matches!((p_c1, p_c2), (Part::Dash, Part::Index(_)))
    {
        return Err(SelectorError::MixedAnchor);
    }
    if let (Part::Index(a), Part::Index(b)) = (p_r1, p_r2)
        && a > b
    {
        return Err(SelectorError::Descending { first: a, second: b });
    }
    if let (Part::Index(a), Part::Index(b)) = (p_c1, p_c2)
        && a > b
    {
        return Err(SelectorError::Descending { first: a, second: b });
    }

    let rows = table.height();
    let cols = table.width();
    let resolve = |part: Part, max: usize| -> Result<usize, SelectorError> {
        match part {
            Part::Index(v) => checked_index(v, max),
            Part::Dash => Ok(max.saturating_sub(1)),
            Part::Underscore => unreachable!("rejected above"),
        }
    };
    Ok(Region {
        r1: resolve(p_r1, rows)?,
        c1: resolve(p_c1, cols)?,
        r2: resolve(p_r2, rows)?,
        c2: resolve(p_c2, cols)?,
    })
}
