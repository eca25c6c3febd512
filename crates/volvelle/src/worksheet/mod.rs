//! One share's checksum worksheet.
//!
//! A [`Worksheet`] pairs a shared, immutable [`Layout`] with the values of
//! its squares. Editable squares are written through
//! [`Worksheet::apply_edit`]; every other value is derived.
//!
//! # Example
//!
//! ```
//! use volvelle::{ChecksumVariant, SessionParams};
//! use volvelle::worksheet::{Coord, Worksheet};
//!
//! let params = SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32).unwrap();
//! let mut sheet = Worksheet::new(&params).unwrap();
//! assert_eq!(sheet.header_summary(), "______");
//!
//! // The threshold digit plus the printed prefix residue fixes one sum.
//! let trace = sheet.apply_edit(0, Coord::new(0, 3), "2").unwrap();
//! assert_eq!(trace.len(), 1);
//! assert_eq!(sheet.header_summary(), "2_____");
//! assert_eq!(sheet.is_valid(), None);
//! ```

mod cell;
mod engine;
mod layout;

use std::sync::Arc;

use crate::checksum::Residue;
use crate::error::{Error, Result};
use crate::field::Fe;
use crate::params::{SessionParams, HEADER_LEN};

pub use cell::{display_column, Cell, CellId, CellKind, Coord};
pub use layout::Layout;

/// Placeholder for unset symbols in rendered strings.
pub const UNSET: char = '_';

/// A worksheet: layout plus current values.
#[derive(Clone, Debug)]
pub struct Worksheet {
    layout: Arc<Layout>,
    values: Vec<Option<Fe>>,
}

impl Worksheet {
    /// Builds a blank worksheet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] when the parameters admit no
    /// layout.
    pub fn new(params: &SessionParams) -> Result<Self> {
        Ok(Self::from_layout(Arc::new(Layout::new(params)?)))
    }

    /// Builds a blank worksheet on an existing layout.
    #[must_use]
    pub fn from_layout(layout: Arc<Layout>) -> Self {
        let values = layout.blank_values();
        Self { layout, values }
    }

    /// The layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Every square with its value, in reading order.
    pub fn cells(&self) -> impl Iterator<Item = (&Cell, Option<Fe>)> + '_ {
        self.layout.cells().iter().zip(self.values.iter().copied())
    }

    /// Value of the square at `coord`; `None` if unset or absent.
    #[must_use]
    pub fn value(&self, coord: Coord) -> Option<Fe> {
        self.layout
            .position(coord)
            .and_then(|i| self.values.get(i).copied().flatten())
    }

    /// Editable symbols in string order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Option<Fe>> {
        self.layout
            .editable()
            .iter()
            .map(|&i| self.values[i])
            .collect()
    }

    /// Overwrites every editable symbol and rederives the sheet, silently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptSnapshot`] when `symbols` does not have one
    /// entry per editable square.
    pub fn load_symbols(&mut self, symbols: &[Option<Fe>]) -> Result<()> {
        let editable = self.layout.editable();
        if symbols.len() != editable.len() {
            return Err(Error::corrupt(format!(
                "expected {} symbols, found {}",
                editable.len(),
                symbols.len()
            )));
        }
        for (&i, &fe) in editable.iter().zip(symbols) {
            self.values[i] = fe;
        }
        self.layout.evaluate(&mut self.values);
        Ok(())
    }

    /// The read-off checksum, once every position is known.
    #[must_use]
    pub fn checksum(&self) -> Option<Vec<Fe>> {
        self.layout
            .checksum_row()
            .iter()
            .map(|&i| self.values[i])
            .collect()
    }

    /// Residue of the full string; `None` while any editable square is unset.
    #[must_use]
    pub fn residue(&self) -> Option<Residue> {
        let data: Option<Vec<Fe>> = self.symbols().into_iter().collect();
        let params = self.layout.params();
        data.map(|data| Residue::of_string(params.variant(), params.hrp(), &data))
    }

    /// Whether the share string is valid; `None` while incomplete.
    #[must_use]
    pub fn is_valid(&self) -> Option<bool> {
        self.residue().map(|r| r.is_valid())
    }

    /// The share string with [`UNSET`] for unknown symbols.
    #[must_use]
    pub fn share_string(&self) -> String {
        let mut out = self.layout.params().hrp().to_ascii_uppercase();
        out.push('1');
        out.extend(self.symbols().into_iter().map(render));
        out
    }

    /// The six header symbols with [`UNSET`] for unknown ones.
    #[must_use]
    pub fn header_summary(&self) -> String {
        self.symbols()
            .into_iter()
            .take(HEADER_LEN)
            .map(render)
            .collect()
    }
}

fn render(fe: Option<Fe>) -> char {
    fe.map_or(UNSET, Fe::to_char)
}
