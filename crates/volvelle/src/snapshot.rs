//! Session persistence as a versioned JSON envelope.
//!
//! Only the parameters and the editable symbols are stored; layouts are
//! rebuilt and every derived square replayed on load.
//!
//! ```json
//! {
//!   "format": "volvelle-session",
//!   "version": 1,
//!   "hrp": "ms",
//!   "threshold": 2,
//!   "bits": 128,
//!   "variant": "codex32",
//!   "next_share": 1,
//!   "shares": [{ "index": 0, "symbols": "2NAME_____..." }]
//! }
//! ```
//!
//! `symbols` holds one character per editable square in string order, `_`
//! for unset ones.

use serde::{Deserialize, Serialize};

use crate::checksum::ChecksumVariant;
use crate::error::{Error, Result};
use crate::field::Fe;
use crate::params::SessionParams;
use crate::session::Session;
use crate::worksheet::UNSET;

/// Format tag of the envelope.
pub const FORMAT: &str = "volvelle-session";

/// Current envelope version.
pub const VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    format: String,
    version: u32,
    hrp: String,
    threshold: u8,
    bits: u16,
    variant: ChecksumVariant,
    next_share: usize,
    shares: Vec<ShareRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShareRecord {
    index: usize,
    symbols: String,
}

impl Session {
    /// Serializes the session to its JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptSnapshot`] if JSON encoding fails, which only
    /// happens on allocation failure.
    pub fn serialize(&self) -> Result<String> {
        let params = self.params();
        let envelope = Envelope {
            format: FORMAT.to_owned(),
            version: VERSION,
            hrp: params.hrp().to_owned(),
            threshold: params.threshold(),
            bits: params.bits(),
            variant: params.variant(),
            next_share: self.share_count(),
            shares: self
                .shares()
                .iter()
                .map(|share| ShareRecord {
                    index: share.index(),
                    symbols: share
                        .worksheet()
                        .symbols()
                        .into_iter()
                        .map(|fe| fe.map_or(UNSET, Fe::to_char))
                        .collect(),
                })
                .collect(),
        };
        serde_json::to_string(&envelope).map_err(|e| Error::corrupt(e.to_string()))
    }

    /// Loads a session from its JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptSnapshot`] for anything that is not a
    /// well-formed envelope of this version: bad JSON, foreign format tag,
    /// unsupported parameters, non-sequential share indices, or symbol
    /// strings of the wrong length or with characters outside the alphabet.
    pub fn deserialize(snapshot: &str) -> Result<Self> {
        load(snapshot).inspect_err(|err| {
            tracing::warn!(%err, "rejected session snapshot");
        })
    }
}

fn load(snapshot: &str) -> Result<Session> {
    let envelope: Envelope =
        serde_json::from_str(snapshot).map_err(|e| Error::corrupt(e.to_string()))?;
    if envelope.format != FORMAT {
        return Err(Error::corrupt(format!(
            "format tag {:?} is not {FORMAT:?}",
            envelope.format
        )));
    }
    if envelope.version != VERSION {
        return Err(Error::corrupt(format!(
            "version {} is not {VERSION}",
            envelope.version
        )));
    }
    let params = SessionParams::new(
        envelope.hrp,
        envelope.threshold,
        envelope.bits,
        envelope.variant,
    )
    .map_err(|e| Error::corrupt(e.to_string()))?;
    if envelope.next_share != envelope.shares.len() {
        return Err(Error::corrupt(format!(
            "next_share {} disagrees with {} stored shares",
            envelope.next_share,
            envelope.shares.len()
        )));
    }

    let mut shares = Vec::with_capacity(envelope.shares.len());
    for (position, record) in envelope.shares.into_iter().enumerate() {
        if record.index != position {
            return Err(Error::corrupt(format!(
                "share index {} found at position {position}",
                record.index
            )));
        }
        let symbols = record
            .symbols
            .chars()
            .map(|c| {
                if c == UNSET {
                    Ok(None)
                } else {
                    Fe::from_char(c).map(Some)
                }
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| Error::corrupt(format!("share {position}: {e}")))?;
        shares.push(symbols);
    }
    let session = Session::restore(params, shares)?;
    tracing::debug!(shares = session.share_count(), "restored session");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut s =
            Session::new(SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32).unwrap())
                .unwrap();
        s.new_share();
        s.new_share();
        s.handle_input_change("inp_1_0_3", "2").unwrap();
        s.handle_input_change("inp_1_0_4", "n").unwrap();
        s
    }

    #[test]
    fn envelope_fields() {
        let json: serde_json::Value = serde_json::from_str(&session().serialize().unwrap()).unwrap();
        assert_eq!(json["format"], FORMAT);
        assert_eq!(json["version"], 1);
        assert_eq!(json["variant"], "codex32");
        assert_eq!(json["next_share"], 2);
        let symbols = json["shares"][1]["symbols"].as_str().unwrap();
        assert_eq!(symbols.len(), 45);
        assert!(symbols.starts_with("2N___"));
    }

    #[test]
    fn round_trip_keeps_values() {
        let s = session();
        let back = Session::deserialize(&s.serialize().unwrap()).unwrap();
        assert_eq!(back.params(), s.params());
        assert_eq!(back.share_count(), 2);
        for share in 0..2 {
            assert_eq!(
                back.worksheet_cells(share).unwrap(),
                s.worksheet_cells(share).unwrap()
            );
        }
    }

    #[test]
    fn rejects_foreign_data() {
        let good = session().serialize().unwrap();
        let cases = [
            "not json".to_owned(),
            "{}".to_owned(),
            good.replace(FORMAT, "other-app"),
            good.replace("\"version\":1", "\"version\":2"),
            good.replace("\"threshold\":2", "\"threshold\":1"),
            good.replace("\"next_share\":2", "\"next_share\":3"),
            good.replace("\"index\":1", "\"index\":5"),
            good.replace("2N___", "2B___"),
            good.replace("2N___", "2N__"),
        ];
        for case in cases {
            let err = Session::deserialize(&case).unwrap_err();
            assert!(matches!(err, Error::CorruptSnapshot { .. }), "{case}: {err}");
        }
    }
}
