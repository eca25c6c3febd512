//! The session: global parameters plus an ordered list of shares.
//!
//! A [`Session`] is an owned value threaded through every call; there is no
//! process-wide state besides the read-only lookup tables. All shares are
//! built on one shared [`Layout`], so changing a parameter means throwing
//! every share away.
//!
//! # Example
//!
//! ```
//! use volvelle::{ChecksumVariant, Session, SessionParams};
//!
//! let params = SessionParams::new("ex", 2, 128, ChecksumVariant::Bech32).unwrap();
//! let mut session = Session::new(params).unwrap();
//! let share = session.new_share();
//! assert_eq!(share, 0);
//!
//! let trace = session.handle_input_change("inp_0_0_3", "2").unwrap();
//! assert_eq!(trace.len(), 1);
//! assert_eq!(session.header_summary(share).unwrap(), "2_____");
//! assert_eq!(session.index_of_cell("inp_0_0_3").unwrap(), 0);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::ActionTrace;
use crate::error::{Error, Result};
use crate::field::Fe;
use crate::params::{SessionParams, ShareShape};
use crate::worksheet::{CellId, CellKind, Layout, Worksheet};

/// One share: a stable index and its worksheet.
#[derive(Clone, Debug)]
pub struct Share {
    index: usize,
    sheet: Worksheet,
}

impl Share {
    /// Position of the share in its session.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The share's worksheet.
    #[must_use]
    pub const fn worksheet(&self) -> &Worksheet {
        &self.sheet
    }
}

/// A square as the presentation layer sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// Session-wide identifier.
    pub id: CellId,
    /// Kind of square.
    pub kind: CellKind,
    /// Column in the share string.
    pub x: usize,
    /// Row on the worksheet.
    pub y: usize,
    /// Displayed character, if any.
    pub value: Option<char>,
}

/// Global parameters and the shares built from them.
#[derive(Clone, Debug)]
pub struct Session {
    params: SessionParams,
    layout: Arc<Layout>,
    shares: Vec<Share>,
}

impl Session {
    /// Starts a session with no shares.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] when the parameters admit no
    /// worksheet layout.
    pub fn new(params: SessionParams) -> Result<Self> {
        let layout = Arc::new(Layout::new(&params)?);
        tracing::debug!(
            hrp = params.hrp(),
            threshold = params.threshold(),
            bits = params.bits(),
            variant = %params.variant(),
            "new session"
        );
        Ok(Self {
            params,
            layout,
            shares: Vec::new(),
        })
    }

    /// Global parameters.
    #[must_use]
    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// Symbol counts shared by every share.
    #[must_use]
    pub fn shape(&self) -> &ShareShape {
        self.layout.shape()
    }

    /// Replaces the global parameters, destroying every share.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] and leaves the session
    /// untouched when the new parameters admit no layout.
    pub fn reconfigure(&mut self, params: SessionParams) -> Result<()> {
        let layout = Arc::new(Layout::new(&params)?);
        tracing::debug!(dropped = self.shares.len(), "reconfigured session");
        self.params = params;
        self.layout = layout;
        self.shares.clear();
        Ok(())
    }

    /// Appends a blank share and returns its index.
    pub fn new_share(&mut self) -> usize {
        let index = self.shares.len();
        self.shares.push(Share {
            index,
            sheet: Worksheet::from_layout(Arc::clone(&self.layout)),
        });
        tracing::debug!(share = index, "new share");
        index
    }

    /// Number of shares.
    #[must_use]
    pub fn share_count(&self) -> usize {
        self.shares.len()
    }

    /// Shares in creation order.
    #[must_use]
    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// Looks up a share.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] for an index the session never issued.
    pub fn share(&self, index: usize) -> Result<&Share> {
        self.shares.get(index).ok_or(Error::UnknownShare {
            index,
            count: self.shares.len(),
        })
    }

    fn share_mut(&mut self, index: usize) -> Result<&mut Share> {
        let count = self.shares.len();
        self.shares
            .get_mut(index)
            .ok_or(Error::UnknownShare { index, count })
    }

    /// Resolves a cell identifier to a square of an existing share.
    fn resolve(&self, cell: &str) -> Result<CellId> {
        let id: CellId = cell.parse()?;
        let share = self.share(id.share()).map_err(|_| Error::UnknownCell {
            id: cell.to_owned(),
            reason: "no such share",
        })?;
        if share.sheet.layout().position(id.coord()).is_none() {
            return Err(Error::UnknownCell {
                id: cell.to_owned(),
                reason: "no square at that position",
            });
        }
        Ok(id)
    }

    /// Index of the share owning `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCell`] when the identifier is malformed or
    /// addresses no square of this session.
    pub fn index_of_cell(&self, cell: &str) -> Result<usize> {
        self.resolve(cell).map(|id| id.share())
    }

    /// Applies one edit and returns the resulting action trace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCell`] for identifiers outside the session and
    /// [`Error::ReadOnlyCell`] for squares the user may not write. Symbols
    /// outside the alphabet are not errors: they produce a one-action trace.
    pub fn handle_input_change(&mut self, cell: &str, value: &str) -> Result<ActionTrace> {
        let id = self.resolve(cell)?;
        let share = self.share_mut(id.share())?;
        share.sheet.apply_edit(id.share(), id.coord(), value)
    }

    /// Every square of a share, in reading order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] for an index the session never issued.
    pub fn worksheet_cells(&self, share: usize) -> Result<Vec<CellView>> {
        let sheet = &self.share(share)?.sheet;
        Ok(sheet
            .cells()
            .map(|(cell, value)| CellView {
                id: CellId::new(share, cell.coord),
                kind: cell.kind,
                x: cell.coord.col,
                y: cell.coord.row,
                value: match cell.kind {
                    CellKind::Symbol(c) | CellKind::FixedHrp(c) => Some(c),
                    _ => value.map(|fe| fe.to_char()),
                },
            })
            .collect())
    }

    /// The six header symbols of a share, `_` where unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] for an index the session never issued.
    pub fn header_summary(&self, share: usize) -> Result<String> {
        Ok(self.share(share)?.sheet.header_summary())
    }

    /// Validity of a share; `None` while any symbol is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] for an index the session never issued.
    pub fn is_valid(&self, share: usize) -> Result<Option<bool>> {
        Ok(self.share(share)?.sheet.is_valid())
    }

    /// A share's string, `_` where unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] for an index the session never issued.
    pub fn share_string(&self, share: usize) -> Result<String> {
        Ok(self.share(share)?.sheet.share_string())
    }

    /// Rebuilds a session from parameters and per-share editable symbols.
    pub(crate) fn restore(
        params: SessionParams,
        shares: Vec<Vec<Option<Fe>>>,
    ) -> Result<Self> {
        let mut session = Self::new(params)?;
        for symbols in shares {
            let index = session.new_share();
            session.share_mut(index)?.sheet.load_symbols(&symbols)?;
        }
        Ok(session)
    }
}
