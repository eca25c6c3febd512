//! Precomputed lookup tables for O(1) field and alphabet operations.
//!
//! All tables are computed at compile time and stored in read-only memory,
//! so they need no initialisation and are shared freely between sessions.
//!
//! # Tables Provided
//!
//! - **Alphabet (32)**: symbol for each field element, in binary order
//! - **Reverse alphabet (128)**: field element for each ASCII byte, case-folded
//! - **Exp (62)**: powers of the generator `x`, doubled to skip a modulo
//! - **Log (32)**: discrete logarithm base `x` of every nonzero element
//!
//! # Example
//!
//! ```
//! use volvelle::lut::{symbol_value, EXP, LOG};
//!
//! assert_eq!(symbol_value(b'q'), Some(0));
//! assert_eq!(symbol_value(b'L'), Some(31));
//! assert_eq!(symbol_value(b'1'), None);
//!
//! // x^5 = x^3 + 1 in GF(32)
//! assert_eq!(EXP[5], 0b01001);
//! assert_eq!(LOG[EXP[7] as usize], 7);
//! ```

/// Order of the multiplicative group of GF(32).
pub const GROUP_ORDER: usize = 31;

/// Primitive polynomial x⁵ + x³ + 1 defining GF(32), as a bit pattern.
pub const PRIMITIVE_POLY: u8 = 0b10_1001;

/// The bech32 alphabet, in binary order.
pub const ALPHABET: [u8; 32] = *b"QPZRY9X8GF2TVDW0S3JN54KHCE6MUA7L";

/// Marker for bytes outside the alphabet in [`REVERSE_ALPHABET`].
const NOT_A_SYMBOL: u8 = 0xFF;

/// Reverse alphabet table, indexed by ASCII byte.
///
/// Lower- and uppercase letters map to the same element; every other byte
/// holds `0xFF`.
pub static REVERSE_ALPHABET: [u8; 128] = {
    let mut table = [NOT_A_SYMBOL; 128];
    let mut i = 0;
    while i < 32 {
        let ch = ALPHABET[i];
        table[ch as usize] = i as u8;
        table[ch.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    table
};

/// Shift-and-add multiplication, reducing by [`PRIMITIVE_POLY`] as it goes.
///
/// Only used to build the tables below.
const fn mul_reduce(a: u8, b: u8) -> u8 {
    let mut a = a;
    let mut b = b;
    let mut ret = 0;
    while a > 0 {
        if a & 1 == 1 {
            ret ^= b;
        }
        a >>= 1;
        b <<= 1;
        if b & 32 == 32 {
            b ^= PRIMITIVE_POLY;
        }
    }
    ret
}

/// Builds the power table of the generator `x` (value 2).
const fn build_exp() -> [u8; 2 * GROUP_ORDER] {
    let mut table = [0u8; 2 * GROUP_ORDER];
    let mut acc = 1u8;
    let mut i = 0;
    while i < 2 * GROUP_ORDER {
        table[i] = acc;
        acc = mul_reduce(acc, 2);
        i += 1;
    }
    table
}

/// Builds the discrete-log table as the inverse of [`build_exp`].
const fn build_log() -> [u8; 32] {
    let exp = build_exp();
    let mut table = [0u8; 32];
    let mut i = 0;
    while i < GROUP_ORDER {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Powers of the generator `x` (value 2).
///
/// `EXP[i]` = x^i for i in 0..62; the second half repeats the first so
/// `EXP[LOG[a] + LOG[b]]` needs no reduction mod 31.
pub static EXP: [u8; 2 * GROUP_ORDER] = build_exp();

/// Discrete logarithms base `x`.
///
/// `LOG[v]` is the exponent e with x^e = v, for v in 1..32. `LOG[0]` is
/// meaningless and set to 0; callers must special-case zero.
pub static LOG: [u8; 32] = build_log();

/// O(1) alphabet lookup: the field value of an ASCII symbol, case-folded.
#[inline]
#[must_use]
pub fn symbol_value(byte: u8) -> Option<u8> {
    match REVERSE_ALPHABET.get(byte as usize) {
        Some(&v) if v != NOT_A_SYMBOL => Some(v),
        _ => None,
    }
}

/// O(1) table multiplication of two 5-bit values.
#[inline]
#[must_use]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        0
    } else {
        EXP[LOG[a as usize] as usize + LOG[b as usize] as usize]
    }
}
