//! Parsing and checking complete codex32 and bech32 strings.

use anyhow::{bail, Result};
use volvelle::checksum::Residue;
use volvelle::field::from_symbols;
use volvelle::params::check_hrp;
use volvelle::ChecksumVariant;

/// A string split into its parts and run through the checksum register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checked {
    /// Prefix, lowercase.
    pub hrp: String,
    /// Code the string was checked against.
    pub variant: ChecksumVariant,
    /// Final register contents.
    pub residue: Residue,
}

impl Checked {
    /// Whether the residue equals the variant target.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.residue.is_valid()
    }
}

/// Splits `input` at its last `1` and computes its residue.
///
/// Without an explicit `variant`, an `ms` prefix selects codex32 and any
/// other prefix bech32.
///
/// # Errors
///
/// Returns an error for mixed case, a missing separator, a prefix outside
/// 1..=83 printable ASCII characters, a length the code does not allow, or
/// a data symbol outside the alphabet.
pub fn check(input: &str, variant: Option<ChecksumVariant>) -> Result<Checked> {
    if input.chars().any(char::is_lowercase) && input.chars().any(char::is_uppercase) {
        bail!("mixed case");
    }
    let Some(split) = input.rfind('1') else {
        bail!("no separator");
    };
    let (hrp, data) = (&input[..split], &input[split + 1..]);
    check_hrp(hrp)?;
    let variant = variant.unwrap_or(if hrp.eq_ignore_ascii_case("ms") {
        ChecksumVariant::Codex32
    } else {
        ChecksumVariant::Bech32
    });
    let symbols = from_symbols(data)?;
    if symbols.len() < variant.residue_len() {
        bail!("data part shorter than the {variant} checksum");
    }
    variant.check_bounds(hrp.len(), symbols.len())?;

    let hrp = hrp.to_ascii_lowercase();
    tracing::debug!(%hrp, %variant, symbols = symbols.len(), "checking");
    let residue = Residue::of_string(variant, &hrp, &symbols);
    Ok(Checked {
        hrp,
        variant,
        residue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODEX32_VECTOR: &str = "MS12NAMEA320ZYXWVUTSRQPNMLKJHGFEDCAXRPP870HKKQRM";
    const BECH32_VECTOR: &str = "A12UEL5L";

    #[test]
    fn published_vectors_pass() {
        let checked = check(CODEX32_VECTOR, None).unwrap();
        assert_eq!(checked.variant, ChecksumVariant::Codex32);
        assert!(checked.is_valid());

        let checked = check(BECH32_VECTOR, None).unwrap();
        assert_eq!(checked.variant, ChecksumVariant::Bech32);
        assert_eq!(checked.hrp, "a");
        assert!(checked.is_valid());
        assert!(check(&BECH32_VECTOR.to_lowercase(), None).unwrap().is_valid());
    }

    #[test]
    fn flipped_symbol_fails() {
        let flipped = CODEX32_VECTOR.replacen("ZYX", "QYX", 1);
        assert!(!check(&flipped, None).unwrap().is_valid());
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(check("A12uel5l", None).is_err());
        assert!(check("QPZRY9X8", None).is_err());
        assert!(check("12UEL5L", None).is_err());
        assert!(check("A12UEL", None).is_err());
        assert!(check("A12UEL5B", None).is_err());
    }

    #[test]
    fn prefix_must_be_printable_ascii() {
        assert!(check("\u{7f}12UEL5L", None).is_err());
        assert!(check("A B12UEL5L", None).is_err());
        assert!(check("é12UEL5L", None).is_err());
    }

    #[test]
    fn bech32_strings_are_limited_to_ninety_characters() {
        // Valid at 90 characters: the BIP-173 long-prefix vector.
        let at_limit = "an83characterlonghumanreadablepartthatcontainsthenumber1andtheexcludedcharactersbio1tt5tgs";
        assert_eq!(at_limit.len(), 90);
        assert!(check(at_limit, None).unwrap().is_valid());

        // One symbol over the limit is refused before the checksum runs.
        let over = format!("a1{}", "q".repeat(89));
        assert_eq!(over.len(), 91);
        assert!(check(&over, None).is_err());
    }

    #[test]
    fn codex32_length_bounds_apply() {
        assert!(check("MS12NAMEA320ZYXWVUTSRQPNMLKJHGF", None).is_err());
        assert!(check(CODEX32_VECTOR, Some(ChecksumVariant::Bech32)).is_ok());
    }
}
