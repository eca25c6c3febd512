//! Global session parameters and the share shape they imply.

use serde::{Deserialize, Serialize};

use crate::checksum::ChecksumVariant;
use crate::error::{Error, Result};
use crate::field::Fe;

/// Header symbols: threshold digit, 4-symbol identifier, share index.
pub const HEADER_LEN: usize = 6;

/// Smallest supported threshold.
pub const MIN_THRESHOLD: u8 = 2;

/// Largest supported threshold.
pub const MAX_THRESHOLD: u8 = 9;

/// Smallest supported secret size in bits.
pub const MIN_BITS: u16 = 128;

/// Largest supported secret size in bits.
pub const MAX_BITS: u16 = 512;

/// Longest accepted human-readable prefix.
pub const MAX_HRP_LEN: usize = 83;

/// Parameters shared by every share of a session.
///
/// The HRP is stored lowercase; worksheets display it uppercase. Every
/// value, deserialized ones included, has passed [`SessionParams::new`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSessionParams")]
pub struct SessionParams {
    hrp: String,
    threshold: u8,
    bits: u16,
    variant: ChecksumVariant,
}

/// Wire form of [`SessionParams`] before validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSessionParams {
    hrp: String,
    threshold: u8,
    bits: u16,
    variant: ChecksumVariant,
}

impl TryFrom<RawSessionParams> for SessionParams {
    type Error = Error;

    fn try_from(raw: RawSessionParams) -> Result<Self> {
        Self::new(raw.hrp, raw.threshold, raw.bits, raw.variant)
    }
}

impl SessionParams {
    /// Validates and builds a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] when the combination admits
    /// no worksheet layout: see [`SessionParams::shape`].
    ///
    /// # Example
    ///
    /// ```
    /// use volvelle::{ChecksumVariant, SessionParams};
    ///
    /// let params = SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32).unwrap();
    /// assert_eq!(params.shape().unwrap().total_len(), 48);
    /// assert!(SessionParams::new("ms", 1, 128, ChecksumVariant::Codex32).is_err());
    /// ```
    pub fn new(
        hrp: impl Into<String>,
        threshold: u8,
        bits: u16,
        variant: ChecksumVariant,
    ) -> Result<Self> {
        let params = Self {
            hrp: hrp.into().to_ascii_lowercase(),
            threshold,
            bits,
            variant,
        };
        params.shape()?;
        Ok(params)
    }

    /// The human-readable prefix, lowercase.
    #[must_use]
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// Threshold k.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Secret size in bits.
    #[must_use]
    pub const fn bits(&self) -> u16 {
        self.bits
    }

    /// Checksum variant.
    #[must_use]
    pub const fn variant(&self) -> ChecksumVariant {
        self.variant
    }

    /// Derives the share shape, checking every parameter on the way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] when the HRP is empty, too
    /// long or not printable ASCII, the threshold is outside 2..=9, the size
    /// is not a multiple of 8 in 128..=512, the data rows do not pair up, or
    /// the share exceeds the variant's length limits.
    pub fn shape(&self) -> Result<ShareShape> {
        check_hrp(&self.hrp)?;
        let hrp_len = self.hrp.len();
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.threshold) {
            return Err(Error::unsupported(format!(
                "threshold {} outside {MIN_THRESHOLD}..={MAX_THRESHOLD}",
                self.threshold
            )));
        }
        if !(MIN_BITS..=MAX_BITS).contains(&self.bits) || self.bits % 8 != 0 {
            return Err(Error::unsupported(format!(
                "secret size {} is not a multiple of 8 in {MIN_BITS}..={MAX_BITS}",
                self.bits
            )));
        }
        let threshold = Fe::from_char(char::from(b'0' + self.threshold))?;

        let residue_len = self.variant.residue_len();
        let payload_len = usize::from(self.bits).div_ceil(5);
        let data_len = HEADER_LEN + payload_len;
        if data_len % 2 != 0 {
            return Err(Error::unsupported(format!(
                "{data_len} header and payload symbols do not split into pairs"
            )));
        }
        self.variant.check_bounds(hrp_len, data_len + residue_len)?;

        Ok(ShareShape {
            hrp_len,
            residue_len,
            payload_len,
            threshold,
        })
    }
}

/// Checks a human-readable prefix: 1..=83 printable ASCII characters.
///
/// # Errors
///
/// Returns [`Error::UnsupportedParameters`] naming the first violation.
pub fn check_hrp(hrp: &str) -> Result<()> {
    if let Some(bad) = hrp.chars().find(|c| !matches!(*c as u32, 33..=126)) {
        return Err(Error::unsupported(format!(
            "hrp character {bad:?} is not printable ASCII"
        )));
    }
    let hrp_len = hrp.len();
    if hrp_len == 0 || hrp_len > MAX_HRP_LEN {
        return Err(Error::unsupported(format!(
            "hrp must be 1..={MAX_HRP_LEN} characters, got {hrp_len}"
        )));
    }
    Ok(())
}

/// Symbol counts of one share string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShareShape {
    hrp_len: usize,
    residue_len: usize,
    payload_len: usize,
    threshold: Fe,
}

impl ShareShape {
    /// HRP length h.
    #[must_use]
    pub const fn hrp_len(&self) -> usize {
        self.hrp_len
    }

    /// Checksum length R.
    #[must_use]
    pub const fn residue_len(&self) -> usize {
        self.residue_len
    }

    /// Payload symbols carrying the secret.
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Header plus payload: the symbols fed two per worksheet row.
    #[must_use]
    pub const fn data_len(&self) -> usize {
        HEADER_LEN + self.payload_len
    }

    /// Number of sum/residue row pairs on the worksheet.
    #[must_use]
    pub const fn pairs(&self) -> usize {
        self.data_len() / 2
    }

    /// Everything after the separator.
    #[must_use]
    pub const fn data_part_len(&self) -> usize {
        self.data_len() + self.residue_len
    }

    /// Full string length, HRP and separator included.
    #[must_use]
    pub const fn total_len(&self) -> usize {
        self.hrp_len + 1 + self.data_part_len()
    }

    /// Column of the first data-part symbol.
    #[must_use]
    pub const fn first_data_col(&self) -> usize {
        self.hrp_len + 1
    }

    /// Column of the first checksum symbol.
    #[must_use]
    pub const fn first_checksum_col(&self) -> usize {
        self.total_len() - self.residue_len
    }

    /// The symbol the threshold digit must take.
    #[must_use]
    pub const fn threshold_symbol(&self) -> Fe {
        self.threshold
    }
}
