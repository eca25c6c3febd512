//! Volvelle checksum worksheet engine.
//!
//! Codex32 and bech32 strings end in a BCH checksum over GF(32) that can be
//! computed by hand with paper lookup wheels. This crate models the paper
//! worksheet square by square: a user fills in data symbols, and the engine
//! reports every sum, residue and checksum square that becomes known, in the
//! order a person working the sheet would write them.
//!
//! # Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`lut`] | compile-time alphabet and exp/log tables |
//! | [`field`] | [`Fe`], the validated GF(32) element |
//! | [`checksum`] | variants, the LFSR [`Residue`] register, pair lookups |
//! | [`worksheet`] | grid layout, derivation, edit engine |
//! | [`session`] | shares, identifiers, queries |
//! | [`snapshot`] | JSON persistence of a session |
//! | [`host`] | token-correlated requests and a worker thread |
//!
//! # Example
//!
//! ```
//! use volvelle::{ActionKind, ChecksumVariant, Session, SessionParams};
//!
//! volvelle::init();
//! let params = SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32).unwrap();
//! let mut session = Session::new(params).unwrap();
//! let share = session.new_share();
//!
//! let data = "2NAMEA320ZYXWVUTSRQPNMLKJHGFEDCA";
//! for (i, c) in data.chars().enumerate() {
//!     let id = session.worksheet_cells(share).unwrap()
//!         .into_iter()
//!         .filter(|cell| cell.kind.is_editable())
//!         .find(|cell| cell.x == 3 + i)
//!         .unwrap()
//!         .id;
//!     let trace = session.handle_input_change(&id.to_string(), &c.to_string()).unwrap();
//!     assert!(trace.iter().all(|a| a.kind != ActionKind::Error));
//! }
//! assert_eq!(session.is_valid(share).unwrap(), None);
//! assert!(session.share_string(share).unwrap().starts_with("MS12NAMEA32"));
//! ```
//!
//! # Design Principles
//!
//! - **Owned state**: a [`Session`] is a plain value; no global session
//! - **Closed cell kinds**: [`CellKind`] is matched exhaustively
//! - **Pure derivation**: every computed square is a function of the
//!   editable ones, so traces are reproducible

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

// Precomputed lookup tables for O(1) operations
pub mod lut;

// GF(32) elements and symbols
pub mod field;

// Checksum variants and the residue register
pub mod checksum;

// Error taxonomy
pub mod error;

// Global parameters and share shape
pub mod params;

// Worksheet grid, layout and edit engine
pub mod worksheet;

// Action traces
pub mod action;

// Sessions and shares
pub mod session;

// JSON persistence
pub mod snapshot;

// Request/response boundary and worker thread
pub mod host;

pub use action::{Action, ActionKind, ActionTrace};
pub use checksum::{ChecksumVariant, Residue};
pub use error::{Error, Result};
pub use field::Fe;
pub use params::{SessionParams, ShareShape};
pub use session::{CellView, Session, Share};
pub use worksheet::{CellId, CellKind, Coord, Worksheet};

/// Builds every lazily initialised table.
///
/// Calling this once before handing the engine to other threads keeps the
/// first edit from paying for table construction. Later calls return
/// immediately; concurrent callers wait for the first one.
pub fn init() {
    checksum::warm_tables();
}

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        Action, ActionKind, ActionTrace, CellId, CellKind, ChecksumVariant, Fe, Session,
        SessionParams,
    };
}
