//! Fixed worksheet topology.
//!
//! The layout is a pure function of the session parameters. It lists every
//! square in reading order and precomputes, for each computed square, the
//! rule and the squares it reads, in an order where every input comes
//! before its consumers.
//!
//! With h = HRP length, R = checksum length, o₀ = h + 1, P data pairs,
//! o_k = o₀ + 2(k − 1) and o_f the first checksum column:
//!
//! | Row | Contents |
//! |-----|----------|
//! | 0 | prefix, `1`, the first R editable symbols |
//! | 1 | `+`, the prefix residue |
//! | 2k | `=`, R sums from o_k, two editable symbols |
//! | 2k + 1 | `+`, R residue squares from o_k + 2 |
//! | 2P + 2 | `=`, the target residue from o_f |
//! | 2P + 3 | the read-off checksum from o_f |

use std::collections::HashMap;

use crate::checksum::Residue;
use crate::error::Result;
use crate::field::Fe;
use crate::params::{SessionParams, ShareShape};

use super::cell::{Cell, CellKind, Coord};

/// How a computed square gets its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rule {
    /// Sum of two squares in the same column.
    Add(usize, usize),
    /// One position of the pair residue of two sums.
    Pair {
        high: usize,
        low: usize,
        position: usize,
    },
}

/// A computed square and the rule producing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Derivation {
    pub(crate) cell: usize,
    pub(crate) rule: Rule,
}

/// What an entered symbol is compared against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Expected {
    /// The value of another square.
    Cell(usize),
    /// A symbol fixed by the session.
    Fixed(Fe),
}

/// An entered square that must agree with something known independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Check {
    pub(crate) cell: usize,
    pub(crate) expected: Expected,
}

/// The squares of one worksheet and how they depend on each other.
#[derive(Clone, Debug)]
pub struct Layout {
    params: SessionParams,
    shape: ShareShape,
    cells: Vec<Cell>,
    index: HashMap<Coord, usize>,
    /// Editable squares in string order.
    editable: Vec<usize>,
    /// Read-off row in string order.
    checksum: Vec<usize>,
    derivations: Vec<Derivation>,
    checks: Vec<Check>,
    /// Printed values: prefix residue and target.
    fixed: Vec<(usize, Fe)>,
}

impl Layout {
    /// Builds the layout for a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`](crate::Error::UnsupportedParameters)
    /// when the parameters admit no layout.
    pub fn new(params: &SessionParams) -> Result<Self> {
        let shape = params.shape()?;
        let mut builder = Builder::new(params, shape);
        builder.place();
        let layout = builder.finish();
        tracing::trace!(
            hrp = params.hrp(),
            variant = %params.variant(),
            cells = layout.cells.len(),
            derivations = layout.derivations.len(),
            "built worksheet layout"
        );
        Ok(layout)
    }

    /// Parameters the layout was built from.
    #[must_use]
    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// Symbol counts of the share.
    #[must_use]
    pub const fn shape(&self) -> &ShareShape {
        &self.shape
    }

    /// Every square in reading order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        2 * self.shape.pairs() + 4
    }

    /// Position of the square at `coord` in [`Layout::cells`].
    #[must_use]
    pub fn position(&self, coord: Coord) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    pub(crate) fn editable(&self) -> &[usize] {
        &self.editable
    }

    pub(crate) fn checksum_row(&self) -> &[usize] {
        &self.checksum
    }

    pub(crate) fn derivations(&self) -> &[Derivation] {
        &self.derivations
    }

    pub(crate) fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Initial values: printed squares filled, everything else unset.
    pub(crate) fn blank_values(&self) -> Vec<Option<Fe>> {
        let mut values = vec![None; self.cells.len()];
        for &(cell, fe) in &self.fixed {
            values[cell] = Some(fe);
        }
        values
    }

    /// Recomputes every derived square from the editable ones.
    pub(crate) fn evaluate(&self, values: &mut [Option<Fe>]) {
        let variant = self.params.variant();
        for d in &self.derivations {
            values[d.cell] = match d.rule {
                Rule::Add(a, b) => values[a].zip(values[b]).map(|(a, b)| a + b),
                Rule::Pair {
                    high,
                    low,
                    position,
                } => values[high].zip(values[low]).and_then(|(a, b)| {
                    Residue::of_pair(variant, a, b)
                        .as_slice()
                        .get(position)
                        .copied()
                }),
            };
        }
    }
}

/// Places squares row by row, then wires up the derivations.
struct Builder<'a> {
    params: &'a SessionParams,
    shape: ShareShape,
    cells: Vec<Cell>,
    fixed: Vec<(Coord, Fe)>,
}

impl<'a> Builder<'a> {
    fn new(params: &'a SessionParams, shape: ShareShape) -> Self {
        Self {
            params,
            shape,
            cells: Vec::new(),
            fixed: Vec::new(),
        }
    }

    fn push(&mut self, row: usize, col: usize, kind: CellKind) {
        self.cells.push(Cell {
            coord: Coord::new(row, col),
            kind,
        });
    }

    fn editable_kind(&self, col: usize) -> CellKind {
        if col >= self.shape.first_checksum_col() {
            CellKind::DataChecksum
        } else {
            CellKind::Data
        }
    }

    fn sum_kind(&self, col: usize) -> CellKind {
        if col >= self.shape.first_checksum_col() {
            CellKind::SumChecksum
        } else {
            CellKind::Sum
        }
    }

    fn place(&mut self) {
        let r = self.shape.residue_len();
        let h = self.shape.hrp_len();
        let o0 = self.shape.first_data_col();
        let of = self.shape.first_checksum_col();
        let pairs = self.shape.pairs();
        let variant = self.params.variant();

        for (x, c) in self.params.hrp().chars().enumerate() {
            self.push(0, x, CellKind::FixedHrp(c.to_ascii_uppercase()));
        }
        self.push(0, h, CellKind::Symbol('1'));
        for x in o0..o0 + r {
            self.push(0, x, self.editable_kind(x));
        }

        self.push(1, o0 - 1, CellKind::Symbol('+'));
        let hrp_residue = Residue::of_hrp(variant, self.params.hrp());
        for (n, &fe) in hrp_residue.as_slice().iter().enumerate() {
            self.push(1, o0 + n, CellKind::FixedResidue);
            self.fixed.push((Coord::new(1, o0 + n), fe));
        }

        for k in 1..=pairs {
            let ok = o0 + 2 * (k - 1);
            let y = 2 * k;
            self.push(y, ok - 1, CellKind::Symbol('='));
            for x in ok..ok + r {
                self.push(y, x, self.sum_kind(x));
            }
            for x in ok + r..ok + r + 2 {
                self.push(y, x, self.editable_kind(x));
            }
            self.push(y + 1, ok + 1, CellKind::Symbol('+'));
            for x in ok + 2..ok + r + 2 {
                self.push(y + 1, x, CellKind::Residue);
            }
        }

        let target_row = 2 * pairs + 2;
        self.push(target_row, of - 1, CellKind::Symbol('='));
        for (n, &fe) in variant.target().iter().enumerate() {
            self.push(target_row, of + n, CellKind::GlobalResidue);
            self.fixed.push((Coord::new(target_row, of + n), fe));
        }
        for x in of..of + r {
            self.push(target_row + 1, x, CellKind::ChecksumSymbol);
        }
    }

    fn finish(self) -> Layout {
        let Self {
            params,
            shape,
            cells,
            fixed,
        } = self;
        let index: HashMap<Coord, usize> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.coord, i))
            .collect();
        let at = |row: usize, col: usize| index.get(&Coord::new(row, col)).copied();

        let mut editable: Vec<usize> = (0..cells.len())
            .filter(|&i| cells[i].kind.is_editable())
            .collect();
        editable.sort_by_key(|&i| cells[i].coord.col);

        let mut derivations = Vec::new();

        // Forward: sums and pair residues, top to bottom.
        for (i, cell) in cells.iter().enumerate() {
            let Coord { row, col } = cell.coord;
            match cell.kind {
                CellKind::Sum => {
                    if let (Some(a), Some(b)) = (at(row - 2, col), at(row - 1, col)) {
                        derivations.push(Derivation {
                            cell: i,
                            rule: Rule::Add(a, b),
                        });
                    }
                }
                CellKind::Residue => {
                    let ok = shape.first_data_col() + row - 3;
                    if let (Some(high), Some(low)) = (at(row - 1, ok), at(row - 1, ok + 1)) {
                        derivations.push(Derivation {
                            cell: i,
                            rule: Rule::Pair {
                                high,
                                low,
                                position: col - (ok + 2),
                            },
                        });
                    }
                }
                _ => {}
            }
        }

        // Backward: checksum-area sums, bottom to top.
        let mut backward: Vec<usize> = (0..cells.len())
            .filter(|&i| cells[i].kind == CellKind::SumChecksum)
            .collect();
        backward.sort_by_key(|&i| (core::cmp::Reverse(cells[i].coord.row), cells[i].coord.col));
        for i in backward {
            let Coord { row, col } = cells[i].coord;
            if let (Some(a), Some(b)) = (at(row + 2, col), at(row + 1, col)) {
                derivations.push(Derivation {
                    cell: i,
                    rule: Rule::Add(a, b),
                });
            }
        }

        // Read-off row: what each checksum column's editable square must be.
        let read_off_row = 2 * shape.pairs() + 3;
        let mut checksum = Vec::with_capacity(shape.residue_len());
        let mut checks = Vec::new();
        if let Some(&threshold_cell) = editable.first() {
            checks.push(Check {
                cell: threshold_cell,
                expected: Expected::Fixed(shape.threshold_symbol()),
            });
        }
        for col in shape.first_checksum_col()..shape.total_len() {
            let (Some(out), Some(&top)) = (
                at(read_off_row, col),
                editable.iter().find(|&&i| cells[i].coord.col == col),
            ) else {
                continue;
            };
            let top_row = cells[top].coord.row;
            if let (Some(a), Some(b)) = (at(top_row + 2, col), at(top_row + 1, col)) {
                derivations.push(Derivation {
                    cell: out,
                    rule: Rule::Add(a, b),
                });
            }
            checksum.push(out);
            checks.push(Check {
                cell: top,
                expected: Expected::Cell(out),
            });
        }

        let fixed = fixed
            .into_iter()
            .filter_map(|(coord, fe)| index.get(&coord).map(|&i| (i, fe)))
            .collect();

        Layout {
            params: params.clone(),
            shape,
            cells,
            index,
            editable,
            checksum,
            derivations,
            checks,
            fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::ChecksumVariant;

    fn layout(hrp: &str, variant: ChecksumVariant) -> Layout {
        Layout::new(&SessionParams::new(hrp, 2, 128, variant).unwrap()).unwrap()
    }

    fn count(layout: &Layout, kind: CellKind) -> usize {
        layout.cells().iter().filter(|c| c.kind == kind).count()
    }

    #[test]
    fn codex32_shape() {
        let l = layout("ms", ChecksumVariant::Codex32);
        assert_eq!(l.rows(), 36);
        assert_eq!(count(&l, CellKind::Data) + count(&l, CellKind::DataChecksum), 45);
        assert_eq!(count(&l, CellKind::DataChecksum), 13);
        assert_eq!(count(&l, CellKind::Residue), 16 * 13);
        assert_eq!(count(&l, CellKind::Sum) + count(&l, CellKind::SumChecksum), 16 * 13);
        assert_eq!(count(&l, CellKind::ChecksumSymbol), 13);
        assert_eq!(count(&l, CellKind::GlobalResidue), 13);
        assert_eq!(l.editable().len(), 45);
        assert_eq!(l.checksum_row().len(), 13);
        // threshold plus one check per checksum column
        assert_eq!(l.checks().len(), 14);
    }

    #[test]
    fn one_editable_square_per_data_column() {
        let l = layout("ex", ChecksumVariant::Bech32);
        let cols: Vec<usize> = l.editable().iter().map(|&i| l.cells()[i].coord.col).collect();
        assert_eq!(cols, (3..41).collect::<Vec<_>>());
    }

    #[test]
    fn prefix_row() {
        let l = layout("ex", ChecksumVariant::Bech32);
        let first: Vec<CellKind> = l.cells().iter().take(4).map(|c| c.kind).collect();
        assert_eq!(
            first,
            vec![
                CellKind::FixedHrp('E'),
                CellKind::FixedHrp('X'),
                CellKind::Symbol('1'),
                CellKind::Data
            ]
        );
    }

    #[test]
    fn cells_are_in_reading_order() {
        let l = layout("ms", ChecksumVariant::Codex32);
        assert!(l.cells().windows(2).all(|w| w[0].coord < w[1].coord));
    }

    #[test]
    fn every_computed_square_has_one_derivation() {
        for variant in ChecksumVariant::ALL {
            let l = layout("ms", variant);
            let computed = l.cells().iter().filter(|c| c.kind.is_computed()).count();
            assert_eq!(l.derivations().len(), computed);
            let mut seen = vec![false; l.cells().len()];
            for d in l.derivations() {
                assert!(!seen[d.cell]);
                seen[d.cell] = true;
            }
        }
    }

    #[test]
    fn derivations_read_only_earlier_values() {
        let l = layout("ms", ChecksumVariant::Codex32);
        let mut known: Vec<bool> = l
            .cells()
            .iter()
            .map(|c| !c.kind.is_computed())
            .collect();
        for d in l.derivations() {
            let inputs = match d.rule {
                Rule::Add(a, b) => [a, b],
                Rule::Pair { high, low, .. } => [high, low],
            };
            assert!(inputs.iter().all(|&i| known[i]), "{d:?}");
            known[d.cell] = true;
        }
    }

    #[test]
    fn deterministic() {
        let a = layout("ms", ChecksumVariant::Codex32);
        let b = layout("ms", ChecksumVariant::Codex32);
        assert_eq!(a.cells(), b.cells());
        assert_eq!(a.derivations(), b.derivations());
    }
}
