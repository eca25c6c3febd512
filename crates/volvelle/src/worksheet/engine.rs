//! Applying one edit and turning the difference into an action trace.
//!
//! Every derived value is a pure function of the editable squares, so an
//! edit rederives the whole sheet and compares it with the previous values.
//! The comparison walks the derivations in schedule order, which is
//! worksheet reading order within each phase:
//!
//! 1. the edited square, when its typed form was not canonical
//! 2. forward sums and pair residues, top to bottom
//! 3. checksum-area sums, bottom to top
//! 4. the read-off row
//! 5. mismatches between entered and expected symbols
//!
//! Values that vanish (an input was cleared) are retracted without an
//! action; re-deriving an unchanged value emits nothing.

use crate::action::{Action, ActionTrace};
use crate::error::{Error, Result};
use crate::field::Fe;

use super::cell::{CellId, Coord};
use super::layout::Expected;
use super::Worksheet;

/// An entered symbol that disagrees with the worksheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Mismatch {
    cell: usize,
    entered: Fe,
    expected: Fe,
}

impl Worksheet {
    /// Sets one editable square and reports everything that followed.
    ///
    /// `input` is a single alphabet symbol in either case, or empty to clear
    /// the square. Any other input leaves the sheet untouched and yields a
    /// trace holding one error action on the square, carrying its current
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCell`] when no square sits at `coord` and
    /// [`Error::ReadOnlyCell`] when the square is not editable.
    pub fn apply_edit(&mut self, share: usize, coord: Coord, input: &str) -> Result<ActionTrace> {
        let id = CellId::new(share, coord);
        let index = self.layout.position(coord).ok_or_else(|| Error::UnknownCell {
            id: id.to_string(),
            reason: "no square at that position",
        })?;
        if !self.layout.cells()[index].kind.is_editable() {
            return Err(Error::ReadOnlyCell { id: id.to_string() });
        }

        let typed = match parse_input(input) {
            Ok(typed) => typed,
            Err(err) => {
                tracing::debug!(cell = %id, %err, "rejected edit");
                let current = self.values[index].map(Fe::to_char);
                return Ok(std::iter::once(Action::error(id, current)).collect());
            }
        };
        let value = typed.map(|(fe, _)| fe);

        let before = self.values.clone();
        let mismatches_before = self.mismatches();
        self.values[index] = value;
        self.layout.evaluate(&mut self.values);

        let mut trace = ActionTrace::with_capacity(self.layout.derivations().len());
        if let Some((fe, canonical)) = typed {
            if !canonical && before[index] != value {
                trace.push(Action::correction(id, fe.to_char()));
            }
        }

        for d in self.layout.derivations() {
            let cell = CellId::new(share, self.layout.cells()[d.cell].coord);
            match (before[d.cell], self.values[d.cell]) {
                (None, Some(new)) => trace.push(Action::fill(cell, new.to_char())),
                (Some(old), Some(new)) if old != new => {
                    trace.push(Action::correction(cell, new.to_char()));
                }
                _ => {}
            }
        }

        for m in self.mismatches() {
            if !mismatches_before.contains(&m) {
                let cell = CellId::new(share, self.layout.cells()[m.cell].coord);
                trace.push(Action::error(cell, Some(m.expected.to_char())));
            }
        }

        tracing::debug!(cell = %id, actions = trace.len(), "applied edit");
        Ok(trace)
    }

    /// Entered symbols that disagree with what the sheet expects, in
    /// reading order.
    fn mismatches(&self) -> Vec<Mismatch> {
        let mut out: Vec<Mismatch> = self
            .layout
            .checks()
            .iter()
            .filter_map(|check| {
                let entered = self.values[check.cell]?;
                let expected = match check.expected {
                    Expected::Cell(i) => self.values[i]?,
                    Expected::Fixed(fe) => fe,
                };
                (entered != expected).then_some(Mismatch {
                    cell: check.cell,
                    entered,
                    expected,
                })
            })
            .collect();
        out.sort_by_key(|m| self.layout.cells()[m.cell].coord);
        out
    }
}

/// Parses an edit: `Ok(None)` clears, `Ok(Some((fe, canonical)))` sets.
fn parse_input(input: &str) -> Result<Option<(Fe, bool)>> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => {
            let fe = Fe::from_char(c)?;
            Ok(Some((fe, fe.to_char() == c)))
        }
        (Some(_), Some(extra)) => Err(Error::InvalidSymbol { character: extra }),
    }
}
