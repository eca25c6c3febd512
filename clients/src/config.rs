//! Session defaults for the command-line clients.
//!
//! A config file is a flat TOML table; every key is optional:
//!
//! ```toml
//! hrp = "ms"
//! threshold = 2
//! bits = 128
//! variant = "codex32"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use volvelle::{ChecksumVariant, SessionParams};

/// Prefix used when neither the file nor the command line names one.
pub const DEFAULT_HRP: &str = "ms";
/// Default share threshold.
pub const DEFAULT_THRESHOLD: u8 = 2;
/// Default secret size in bits.
pub const DEFAULT_BITS: u16 = 128;
/// Default checksum code.
pub const DEFAULT_VARIANT: ChecksumVariant = ChecksumVariant::Codex32;

/// Partially specified session parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Human-readable prefix.
    pub hrp: Option<String>,
    /// Share threshold digit.
    pub threshold: Option<u8>,
    /// Secret size in bits.
    pub bits: Option<u16>,
    /// Checksum code, `bech32`/`short` or `codex32`/`long`.
    pub variant: Option<ChecksumVariant>,
}

impl SheetConfig {
    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config
    /// table.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parses config text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, unknown keys or an unknown
    /// variant name.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlays `other` on `self`; keys set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            hrp: other.hrp.or(self.hrp),
            threshold: other.threshold.or(self.threshold),
            bits: other.bits.or(self.bits),
            variant: other.variant.or(self.variant),
        }
    }

    /// Fills the remaining gaps with defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error when the combination cannot be laid out as a
    /// worksheet.
    pub fn params(&self) -> Result<SessionParams> {
        let hrp = self.hrp.as_deref().unwrap_or(DEFAULT_HRP);
        let threshold = self.threshold.unwrap_or(DEFAULT_THRESHOLD);
        let bits = self.bits.unwrap_or(DEFAULT_BITS);
        let variant = self.variant.unwrap_or(DEFAULT_VARIANT);
        SessionParams::new(hrp, threshold, bits, variant).with_context(|| {
            format!("Unsupported session: hrp {hrp}, threshold {threshold}, {bits} bits, {variant}")
        })
    }
}
