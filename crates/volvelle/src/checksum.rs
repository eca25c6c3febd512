//! Checksum variants and the residue register.
//!
//! Both supported codes are BCH codes over GF(32). A string is valid when
//! the residue of its polynomial modulo the variant's generator equals a
//! fixed target word. The residue is computed by a linear feedback shift
//! register, one symbol per [`Residue::step`], which is exactly what a
//! volvelle does each time it is turned to the next symbol.
//!
//! | Variant | Aliases | Register | Target |
//! |---------|---------|----------|--------|
//! | [`ChecksumVariant::Bech32`] | `bech32`, `short` | 6 | `QQQQQP` |
//! | [`ChecksumVariant::Codex32`] | `codex32`, `long` | 13 | `SECRETSHARE32` |
//!
//! # Example
//!
//! ```
//! use volvelle::checksum::{ChecksumVariant, Residue};
//! use volvelle::field::from_symbols;
//!
//! let data = from_symbols("2uel5l").unwrap();
//! let residue = Residue::of_string(ChecksumVariant::Bech32, "a", &data);
//! assert!(residue.is_valid());
//! assert_eq!(residue.to_string(), "QQQQQP");
//! ```

use core::fmt;
use core::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::Fe;

/// Longest register of any variant.
pub const MAX_RESIDUE_LEN: usize = 13;

/// Longest bech32 string, separator and HRP included.
pub const BECH32_MAX_TOTAL_LEN: usize = 90;

/// Shortest codex32 data part (header, payload and checksum).
pub const CODEX32_MIN_DATA_PART: usize = 45;

/// Longest codex32 data part.
pub const CODEX32_MAX_DATA_PART: usize = 93;

const fn fe_table<const N: usize>(values: [u8; N]) -> [Fe; N] {
    let mut out = [Fe::ZERO; N];
    let mut i = 0;
    while i < N {
        out[i] = Fe::from_u5_masked(values[i]);
        i += 1;
    }
    out
}

// ============================================================================
// Variant constants (index 0 = highest register position)
// ============================================================================

const BECH32_GENERATOR: [Fe; 6] = fe_table([29, 22, 20, 21, 29, 18]);
const BECH32_TARGET: [Fe; 6] = fe_table([0, 0, 0, 0, 0, 1]);

const CODEX32_GENERATOR: [Fe; 13] = fe_table([25, 27, 17, 8, 0, 25, 25, 25, 31, 27, 24, 16, 16]);
const CODEX32_TARGET: [Fe; 13] = fe_table([16, 25, 24, 3, 25, 11, 16, 23, 29, 3, 25, 17, 10]);

/// A named checksum code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumVariant {
    /// BIP-173 bech32: 6-symbol checksum.
    #[serde(alias = "short")]
    Bech32,
    /// BIP-93 codex32: 13-symbol checksum.
    #[serde(alias = "long")]
    Codex32,
}

impl ChecksumVariant {
    /// Both variants, shortest register first.
    pub const ALL: [Self; 2] = [Self::Bech32, Self::Codex32];

    /// Canonical lowercase name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bech32 => "bech32",
            Self::Codex32 => "codex32",
        }
    }

    /// Register length R, also the number of checksum symbols.
    #[inline]
    #[must_use]
    pub const fn residue_len(self) -> usize {
        match self {
            Self::Bech32 => 6,
            Self::Codex32 => 13,
        }
    }

    /// Per-position feedback constants of the generator polynomial.
    #[inline]
    #[must_use]
    pub fn generator(self) -> &'static [Fe] {
        match self {
            Self::Bech32 => &BECH32_GENERATOR,
            Self::Codex32 => &CODEX32_GENERATOR,
        }
    }

    /// Residue a valid string must leave in the register.
    #[inline]
    #[must_use]
    pub fn target(self) -> &'static [Fe] {
        match self {
            Self::Bech32 => &BECH32_TARGET,
            Self::Codex32 => &CODEX32_TARGET,
        }
    }

    /// Checks a string shape against the variant's length limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] when the string would be
    /// longer (or, for codex32, shorter) than the code allows.
    pub fn check_bounds(self, hrp_len: usize, data_part_len: usize) -> Result<()> {
        match self {
            Self::Bech32 => {
                let total = hrp_len + 1 + data_part_len;
                if total > BECH32_MAX_TOTAL_LEN {
                    return Err(Error::unsupported(format!(
                        "bech32 strings are limited to {BECH32_MAX_TOTAL_LEN} characters, layout needs {total}"
                    )));
                }
            }
            Self::Codex32 => {
                if !(CODEX32_MIN_DATA_PART..=CODEX32_MAX_DATA_PART).contains(&data_part_len) {
                    return Err(Error::unsupported(format!(
                        "codex32 data part must be {CODEX32_MIN_DATA_PART}..={CODEX32_MAX_DATA_PART} symbols, layout needs {data_part_len}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Pair-residue table of this variant, built on first use.
    fn pair_table(self) -> &'static [Residue] {
        static BECH32_PAIRS: OnceLock<Vec<Residue>> = OnceLock::new();
        static CODEX32_PAIRS: OnceLock<Vec<Residue>> = OnceLock::new();
        let cell = match self {
            Self::Bech32 => &BECH32_PAIRS,
            Self::Codex32 => &CODEX32_PAIRS,
        };
        cell.get_or_init(|| {
            tracing::debug!(variant = self.name(), "building pair-residue table");
            let mut table = Vec::with_capacity(32 * 32);
            for a in Fe::all() {
                for b in Fe::all() {
                    table.push(Residue::of_pair_uncached(self, a, b));
                }
            }
            table
        })
    }
}

impl fmt::Display for ChecksumVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bech32" | "short" => Ok(Self::Bech32),
            "codex32" | "long" => Ok(Self::Codex32),
            _ => Err(Error::unsupported(format!("unknown checksum variant {s:?}"))),
        }
    }
}

// ============================================================================
// Residue register
// ============================================================================

/// The LFSR state of one variant: R field elements, highest degree first.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Residue {
    variant: ChecksumVariant,
    register: [Fe; MAX_RESIDUE_LEN],
}

impl Residue {
    /// The empty register.
    #[must_use]
    pub const fn zero(variant: ChecksumVariant) -> Self {
        Self {
            variant,
            register: [Fe::ZERO; MAX_RESIDUE_LEN],
        }
    }

    /// The register a valid string ends in.
    #[must_use]
    pub fn target(variant: ChecksumVariant) -> Self {
        let mut residue = Self::zero(variant);
        residue.register[..variant.residue_len()].copy_from_slice(variant.target());
        residue
    }

    /// Loads a register from exactly R elements.
    #[must_use]
    pub fn from_slice(variant: ChecksumVariant, values: &[Fe]) -> Option<Self> {
        if values.len() != variant.residue_len() {
            return None;
        }
        let mut residue = Self::zero(variant);
        residue.register[..values.len()].copy_from_slice(values);
        Some(residue)
    }

    /// The variant this register belongs to.
    #[inline]
    #[must_use]
    pub const fn variant(&self) -> ChecksumVariant {
        self.variant
    }

    /// The R live register positions, highest degree first.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Fe] {
        &self.register[..self.variant.residue_len()]
    }

    /// One LFSR round: multiply by x, reduce, then add `digit`.
    ///
    /// The top coefficient is dropped, the rest shift up with a zero
    /// appended, the dropped coefficient times the generator is added
    /// position by position, and `digit` lands in the lowest position.
    #[must_use]
    pub fn step(mut self, digit: Fe) -> Self {
        self.push(digit);
        self
    }

    /// In-place form of [`Residue::step`].
    pub fn push(&mut self, digit: Fe) {
        let len = self.variant.residue_len();
        let top = self.register[0];
        self.register.copy_within(1..len, 0);
        self.register[len - 1] = Fe::ZERO;
        for (reg, &coeff) in self.register[..len].iter_mut().zip(self.variant.generator()) {
            *reg += top * coeff;
        }
        self.register[len - 1] += digit;
    }

    /// Residue of a symbol sequence fed from the zero register.
    #[must_use]
    pub fn polymod<I: IntoIterator<Item = Fe>>(variant: ChecksumVariant, symbols: I) -> Self {
        symbols
            .into_iter()
            .fold(Self::zero(variant), |acc, fe| acc.step(fe))
    }

    /// Residue of `hrp` alone, shifted by R positions.
    ///
    /// This is the fixed second row of every worksheet: the contribution of
    /// the prefix that the data symbols are added onto.
    #[must_use]
    pub fn of_hrp(variant: ChecksumVariant, hrp: &str) -> Self {
        let zeros = core::iter::repeat(Fe::ZERO).take(variant.residue_len());
        Self::polymod(variant, hrp_expand(hrp).into_iter().chain(zeros))
    }

    /// Residue of a whole string: expanded HRP followed by the data part.
    #[must_use]
    pub fn of_string(variant: ChecksumVariant, hrp: &str, data: &[Fe]) -> Self {
        Self::polymod(variant, hrp_expand(hrp).into_iter().chain(data.iter().copied()))
    }

    /// Residue of the two-symbol polynomial `(a·x + b)·x^R`.
    ///
    /// This is the volvelle lookup: dial the two leftmost sums of a row and
    /// read off the next residue row. Served from a table built on first use.
    #[must_use]
    pub fn of_pair(variant: ChecksumVariant, a: Fe, b: Fe) -> Self {
        let index = usize::from(a.to_u8()) * 32 + usize::from(b.to_u8());
        match variant.pair_table().get(index) {
            Some(residue) => *residue,
            None => Self::of_pair_uncached(variant, a, b),
        }
    }

    fn of_pair_uncached(variant: ChecksumVariant, a: Fe, b: Fe) -> Self {
        let zeros = core::iter::repeat(Fe::ZERO).take(variant.residue_len());
        Self::polymod(variant, [a, b].into_iter().chain(zeros))
    }

    /// True when the register holds the variant's target word.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.as_slice() == self.variant.target()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fe in self.as_slice() {
            write!(f, "{fe}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Residue({}, {self})", self.variant)
    }
}

/// Expands an HRP into field elements: `[1] ++ high bits ++ [0] ++ low bits`.
///
/// The HRP is lowercased first, so `MS` and `ms` expand identically.
#[must_use]
pub fn hrp_expand(hrp: &str) -> Vec<Fe> {
    let bytes: Vec<u8> = hrp.bytes().map(|b| b.to_ascii_lowercase()).collect();
    let mut out = Vec::with_capacity(2 * bytes.len() + 2);
    out.push(Fe::ONE);
    out.extend(bytes.iter().map(|b| Fe::from_u5_masked(b >> 5)));
    out.push(Fe::ZERO);
    out.extend(bytes.iter().map(|b| Fe::from_u5_masked(b & 31)));
    out
}

/// Forces the pair-residue tables of every variant.
pub(crate) fn warm_tables() {
    for variant in ChecksumVariant::ALL {
        let _ = variant.pair_table();
    }
}
