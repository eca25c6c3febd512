//! GF(32) field elements and their alphabet symbols.
//!
//! A [`Fe`] is a 5-bit value of GF(32) = GF(2)\[x\]/(x⁵ + x³ + 1). Every
//! element has exactly one symbol in the 32-character alphabet, so a value
//! can only be built from a valid symbol or a value below 32.
//!
//! | Operation | Definition |
//! |-----------|------------|
//! | `a + b` | bitwise XOR (self-inverse: `a + a = 0`) |
//! | `a * b` | exp/log table lookup, `a * 0 = 0` |
//! | `a.inverse()` | `x^(31 - log a)`, `None` for zero |
//!
//! # Example
//!
//! ```
//! use volvelle::Fe;
//!
//! let a = Fe::try_from('z').unwrap();
//! assert_eq!(a, Fe::try_from('Z').unwrap());
//! assert_eq!(a.to_char(), 'Z');
//! assert_eq!(a + a, Fe::ZERO);
//!
//! let inv = a.inverse().unwrap();
//! assert_eq!(a * inv, Fe::ONE);
//! assert!(Fe::try_from('b').is_err());
//! ```

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lut::{self, ALPHABET, EXP, GROUP_ORDER, LOG};

/// One element of GF(32), displayed as its alphabet symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
#[repr(transparent)]
pub struct Fe(u8);

impl Fe {
    /// Additive identity, symbol `Q`.
    pub const ZERO: Self = Self(0);

    /// Multiplicative identity, symbol `P`.
    pub const ONE: Self = Self(1);

    /// The primitive element `x`, symbol `Z`.
    pub const X: Self = Self(2);

    /// Builds an element from a value below 32.
    #[inline]
    #[must_use]
    pub const fn from_u5(value: u8) -> Option<Self> {
        if value < 32 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Keeps the low five bits of `value`; used for compile-time constants.
    #[inline]
    #[must_use]
    pub(crate) const fn from_u5_masked(value: u8) -> Self {
        Self(value & 31)
    }

    /// Parses one alphabet symbol, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSymbol`] for characters outside the alphabet.
    pub fn from_char(character: char) -> Result<Self> {
        u8::try_from(character)
            .ok()
            .and_then(lut::symbol_value)
            .map(Self)
            .ok_or(Error::InvalidSymbol { character })
    }

    /// The 5-bit value.
    #[inline]
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self.0
    }

    /// The canonical (uppercase) symbol.
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        ALPHABET[self.0 as usize] as char
    }

    /// Multiplicative inverse; `None` for zero.
    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        let log = LOG[self.0 as usize] as usize;
        Some(Self(EXP[(GROUP_ORDER - log) % GROUP_ORDER]))
    }

    /// Raises the element to a power; `0^0` is one.
    #[must_use]
    pub fn pow(self, exponent: u32) -> Self {
        if exponent == 0 {
            return Self::ONE;
        }
        if self.0 == 0 {
            return Self::ZERO;
        }
        let log = LOG[self.0 as usize] as u64;
        let e = (log * u64::from(exponent)) % GROUP_ORDER as u64;
        Self(EXP[e as usize])
    }

    /// Every element in value order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..32u8).map(Self)
    }
}

impl Add for Fe {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl AddAssign for Fe {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Mul for Fe {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(lut::mul(self.0, rhs.0))
    }
}

impl MulAssign for Fe {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl TryFrom<char> for Fe {
    type Error = Error;

    fn try_from(character: char) -> Result<Self> {
        Self::from_char(character)
    }
}

impl From<Fe> for char {
    fn from(fe: Fe) -> Self {
        fe.to_char()
    }
}

impl From<Fe> for u8 {
    fn from(fe: Fe) -> Self {
        fe.0
    }
}

impl fmt::Display for Fe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl fmt::Debug for Fe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fe({})", self.to_char())
    }
}

/// Renders a run of elements as their symbols.
#[must_use]
pub fn to_symbols(elements: &[Fe]) -> String {
    elements.iter().map(|fe| fe.to_char()).collect()
}

/// Parses a run of symbols.
///
/// # Errors
///
/// Returns [`Error::InvalidSymbol`] for the first character outside the
/// alphabet.
pub fn from_symbols(symbols: &str) -> Result<Vec<Fe>> {
    symbols.chars().map(Fe::from_char).collect()
}
