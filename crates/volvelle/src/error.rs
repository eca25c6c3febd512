//! Error taxonomy for the worksheet engine.
//!
//! Every failure is recoverable and returned as an explicit [`Result`]; the
//! engine never aborts on caller input. Checksum mismatches are not errors:
//! they surface as [`ActionKind::Error`](crate::action::ActionKind::Error)
//! entries in an action trace.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// The main error type for the whole crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A character is outside the 32-symbol alphabet (after case folding).
    #[error("invalid symbol {character:?}: not in the bech32 alphabet")]
    InvalidSymbol {
        /// The rejected character.
        character: char,
    },

    /// The global parameters admit no worksheet layout.
    #[error("unsupported worksheet parameters: {reason}")]
    UnsupportedParameters {
        /// Why the parameters were rejected.
        reason: String,
    },

    /// A cell identifier does not address a cell of this session.
    #[error("unknown cell {id:?}: {reason}")]
    UnknownCell {
        /// The identifier as received.
        id: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A share index does not exist in this session.
    #[error("unknown share {index} (session has {count} shares)")]
    UnknownShare {
        /// The requested share index.
        index: usize,
        /// Number of shares currently in the session.
        count: usize,
    },

    /// An edit addressed a cell that only the engine may fill.
    #[error("cell {id} is not editable")]
    ReadOnlyCell {
        /// The addressed cell.
        id: String,
    },

    /// A serialized session could not be loaded.
    #[error("corrupt session snapshot: {reason}")]
    CorruptSnapshot {
        /// Why the snapshot was refused.
        reason: String,
    },
}

impl Error {
    /// Builds an [`Error::UnsupportedParameters`] from any displayable reason.
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedParameters {
            reason: reason.into(),
        }
    }

    /// Builds an [`Error::CorruptSnapshot`] from any displayable reason.
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot {
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by stale or foreign identifiers.
    #[must_use]
    pub fn is_stale_reference(&self) -> bool {
        matches!(self, Self::UnknownCell { .. } | Self::UnknownShare { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = Error::InvalidSymbol { character: 'b' };
        assert_eq!(e.to_string(), "invalid symbol 'b': not in the bech32 alphabet");

        let e = Error::UnknownShare { index: 4, count: 2 };
        assert_eq!(e.to_string(), "unknown share 4 (session has 2 shares)");

        let e = Error::unsupported("threshold 1 outside 2..=9");
        assert_eq!(
            e.to_string(),
            "unsupported worksheet parameters: threshold 1 outside 2..=9"
        );
    }

    #[test]
    fn stale_reference_classification() {
        assert!(Error::UnknownShare { index: 0, count: 0 }.is_stale_reference());
        assert!(Error::UnknownCell {
            id: "x".into(),
            reason: "no inp_ prefix"
        }
        .is_stale_reference());
        assert!(!Error::corrupt("bad tag").is_stale_reference());
    }
}
