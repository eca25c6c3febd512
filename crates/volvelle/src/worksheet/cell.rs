//! Worksheet squares: positions, kinds and external identifiers.
//!
//! A [`Coord`] is a (row, column) pair where the column is the position of
//! the symbol in the share string. Ordering coordinates row-major gives the
//! worksheet reading order.
//!
//! A [`CellId`] adds the owning share and is what a presentation layer uses
//! to address a square: `inp_<share>_<row>_<col>`.
//!
//! ```
//! use volvelle::worksheet::{CellId, Coord};
//!
//! let id: CellId = "inp_0_2_5".parse().unwrap();
//! assert_eq!(id.share(), 0);
//! assert_eq!(id.coord(), Coord::new(2, 5));
//! assert_eq!(id.to_string(), "inp_0_2_5");
//! assert!("cell_0_2_5".parse::<CellId>().is_err());
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Position of a square on the worksheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row, top to bottom.
    pub row: usize,
    /// Column: the index of the symbol in the share string.
    pub col: usize,
}

impl Coord {
    /// Builds a coordinate.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rendered column of a string column: one spacer after every four symbols.
#[inline]
#[must_use]
pub const fn display_column(col: usize) -> usize {
    col + col / 4
}

/// What a square holds and who may write it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Printed punctuation: the separator, `+` and `=` marks.
    Symbol(char),
    /// One character of the prefix, printed uppercase.
    FixedHrp(char),
    /// Printed residue of the prefix.
    FixedResidue,
    /// Header or payload symbol entered by the user.
    Data,
    /// Checksum symbol entered by the user.
    DataChecksum,
    /// Pair-lookup output of the row above.
    Residue,
    /// Column sum of the two squares above.
    Sum,
    /// Column sum in the checksum area, derived upward from the target.
    SumChecksum,
    /// Target residue printed on the last sum row.
    GlobalResidue,
    /// Read-off checksum digit.
    ChecksumSymbol,
}

impl CellKind {
    /// Squares the user fills in.
    #[inline]
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Data | Self::DataChecksum)
    }

    /// Squares only the engine fills in.
    #[inline]
    #[must_use]
    pub const fn is_computed(self) -> bool {
        matches!(
            self,
            Self::Residue | Self::Sum | Self::SumChecksum | Self::ChecksumSymbol
        )
    }

    /// Squares printed on the blank sheet.
    #[inline]
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(
            self,
            Self::Symbol(_) | Self::FixedHrp(_) | Self::FixedResidue | Self::GlobalResidue
        )
    }

    /// Short lowercase name for rendering and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Symbol(_) => "symbol",
            Self::FixedHrp(_) => "fixed_hrp",
            Self::FixedResidue => "fixed_residue",
            Self::Data => "data",
            Self::DataChecksum => "data_checksum",
            Self::Residue => "residue",
            Self::Sum => "sum",
            Self::SumChecksum => "sum_checksum",
            Self::GlobalResidue => "global_residue",
            Self::ChecksumSymbol => "checksum_symbol",
        }
    }
}

/// One square of a worksheet layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Where the square sits.
    pub coord: Coord,
    /// What it holds.
    pub kind: CellKind,
}

// ============================================================================
// External identifiers
// ============================================================================

const ID_PREFIX: &str = "inp_";

/// Session-wide address of a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CellId {
    share: usize,
    coord: Coord,
}

impl CellId {
    /// Builds an identifier.
    #[inline]
    #[must_use]
    pub const fn new(share: usize, coord: Coord) -> Self {
        Self { share, coord }
    }

    /// Index of the owning share.
    #[inline]
    #[must_use]
    pub const fn share(&self) -> usize {
        self.share
    }

    /// Position on the share's worksheet.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ID_PREFIX}{}_{}_{}",
            self.share, self.coord.row, self.coord.col
        )
    }
}

impl FromStr for CellId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let unknown = |reason| Error::UnknownCell {
            id: s.to_owned(),
            reason,
        };
        let rest = s
            .strip_prefix(ID_PREFIX)
            .ok_or_else(|| unknown("missing inp_ prefix"))?;
        let mut numbers = rest.split('_').map(str::parse::<usize>);
        let (Some(share), Some(row), Some(col), None) =
            (numbers.next(), numbers.next(), numbers.next(), numbers.next())
        else {
            return Err(unknown("expected share, row and column"));
        };
        match (share, row, col) {
            (Ok(share), Ok(row), Ok(col)) => Ok(Self::new(share, Coord::new(row, col))),
            _ => Err(unknown("unparsable number")),
        }
    }
}

impl TryFrom<String> for CellId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.to_string()
    }
}
