//! Host boundary: tagged requests, tagged responses, an optional worker.
//!
//! A host that keeps the engine off its UI thread sends [`Request`]s and
//! receives [`Response`]s echoing each request's token. Responses may be
//! matched out of order; callers correlate by token only.
//!
//! [`Engine::dispatch`] is the synchronous core. [`Worker`] runs an engine
//! on a dedicated thread fed by a bounded channel.
//!
//! # Example
//!
//! ```
//! use volvelle::host::{Command, Engine, Outcome, Request};
//! use volvelle::{ChecksumVariant, SessionParams};
//!
//! let params = SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32).unwrap();
//! let mut engine = Engine::new(params).unwrap();
//! let response = engine.dispatch(Request { token: 7, command: Command::NewShare });
//! assert_eq!(response.token, 7);
//! assert_eq!(response.outcome, Outcome::Share { index: 0 });
//! ```

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::action::ActionTrace;
use crate::error::{Error, Result};
use crate::params::SessionParams;
use crate::session::{CellView, Session};

/// Bound of the request queue feeding a [`Worker`].
const CHANNEL_CAPACITY: usize = 64;

/// Correlation token chosen by the caller.
pub type Token = u64;

/// One engine operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Replace the session with an empty one.
    NewSession {
        /// Global parameters.
        params: SessionParams,
    },
    /// Append a share.
    NewShare,
    /// Edit one square.
    HandleInputChange {
        /// Cell identifier.
        cell: String,
        /// New value, empty to clear.
        value: String,
    },
    /// List a share's squares.
    WorksheetCells {
        /// Share index.
        share: usize,
    },
    /// Header symbols of a share.
    HeaderSummary {
        /// Share index.
        share: usize,
    },
    /// Number of shares.
    ShareCount,
    /// Share owning a cell.
    IndexOfCell {
        /// Cell identifier.
        cell: String,
    },
    /// Validity of a share.
    IsValid {
        /// Share index.
        share: usize,
    },
    /// A share's string.
    ShareString {
        /// Share index.
        share: usize,
    },
    /// Snapshot the session.
    Serialize,
    /// Replace the session from a snapshot.
    Deserialize {
        /// The snapshot.
        snapshot: String,
    },
}

/// Result of one command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The command succeeded with nothing to report.
    Done,
    /// A share index.
    Share {
        /// The index.
        index: usize,
    },
    /// A count.
    Count {
        /// The count.
        count: usize,
    },
    /// An edit's action trace.
    Actions {
        /// The trace.
        trace: ActionTrace,
    },
    /// Worksheet squares.
    Cells {
        /// Squares in reading order.
        cells: Vec<CellView>,
    },
    /// A display string or snapshot.
    Text {
        /// The text.
        text: String,
    },
    /// Share validity.
    Validity {
        /// `None` while incomplete.
        valid: Option<bool>,
    },
    /// The command failed; the session is unchanged.
    Failed {
        /// Rendered error.
        error: String,
    },
}

/// A command tagged with a correlation token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Echoed in the response.
    pub token: Token,
    /// What to do.
    pub command: Command,
}

/// An outcome tagged with the token of its request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Token of the request.
    pub token: Token,
    /// What happened.
    pub outcome: Outcome,
}

/// Owns one session and executes commands against it.
#[derive(Debug)]
pub struct Engine {
    session: Session,
}

impl Engine {
    /// Starts an engine with an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] when the parameters admit no
    /// worksheet layout.
    pub fn new(params: SessionParams) -> Result<Self> {
        crate::init();
        Ok(Self {
            session: Session::new(params)?,
        })
    }

    /// The engine's session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Executes one request.
    pub fn dispatch(&mut self, request: Request) -> Response {
        let outcome = self.execute(request.command).unwrap_or_else(|err| Outcome::Failed {
            error: err.to_string(),
        });
        Response {
            token: request.token,
            outcome,
        }
    }

    fn execute(&mut self, command: Command) -> Result<Outcome> {
        let s = &mut self.session;
        Ok(match command {
            Command::NewSession { params } => {
                self.session = Session::new(params)?;
                Outcome::Done
            }
            Command::NewShare => Outcome::Share {
                index: s.new_share(),
            },
            Command::HandleInputChange { cell, value } => Outcome::Actions {
                trace: s.handle_input_change(&cell, &value)?,
            },
            Command::WorksheetCells { share } => Outcome::Cells {
                cells: s.worksheet_cells(share)?,
            },
            Command::HeaderSummary { share } => Outcome::Text {
                text: s.header_summary(share)?,
            },
            Command::ShareCount => Outcome::Count {
                count: s.share_count(),
            },
            Command::IndexOfCell { cell } => Outcome::Share {
                index: s.index_of_cell(&cell)?,
            },
            Command::IsValid { share } => Outcome::Validity {
                valid: s.is_valid(share)?,
            },
            Command::ShareString { share } => Outcome::Text {
                text: s.share_string(share)?,
            },
            Command::Serialize => Outcome::Text {
                text: s.serialize()?,
            },
            Command::Deserialize { snapshot } => match Session::deserialize(&snapshot) {
                Ok(session) => {
                    self.session = session;
                    Outcome::Done
                }
                Err(err) => {
                    // Refuse the snapshot and fall back to an empty session.
                    let params = self.session.params().clone();
                    self.session = Session::new(params)?;
                    return Err(err);
                }
            },
        })
    }
}

enum Message {
    Request(Request),
    Shutdown,
}

/// An [`Engine`] on a dedicated thread.
///
/// Requests go in through a bounded queue; responses come back on an
/// unbounded channel tagged with their tokens.
pub struct Worker {
    sender: mpsc::SyncSender<Message>,
    responses: mpsc::Receiver<Response>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedParameters`] for bad parameters. Failure
    /// to spawn the thread is reported the same way, with the OS reason.
    pub fn spawn(params: SessionParams) -> Result<Self> {
        let mut engine = Engine::new(params)?;
        let (tx, rx) = mpsc::sync_channel::<Message>(CHANNEL_CAPACITY);
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();

        let handle = thread::Builder::new()
            .name("volvelle-engine".into())
            .spawn(move || {
                tracing::info!("engine worker started");
                while let Ok(Message::Request(request)) = rx.recv() {
                    if resp_tx.send(engine.dispatch(request)).is_err() {
                        break;
                    }
                }
                tracing::info!("engine worker stopped");
            })
            .map_err(|e| Error::unsupported(format!("cannot spawn engine thread: {e}")))?;

        Ok(Self {
            sender: tx,
            responses: resp_rx,
            handle: Some(handle),
        })
    }

    /// Queues a request; blocks while the queue is full.
    ///
    /// Returns `false` when the worker has stopped.
    pub fn send(&self, request: Request) -> bool {
        self.sender.send(Message::Request(request)).is_ok()
    }

    /// Waits for the next response, in completion order.
    #[must_use]
    pub fn recv(&self) -> Option<Response> {
        self.responses.recv().ok()
    }

    /// Returns a response if one is ready.
    #[must_use]
    pub fn try_recv(&self) -> Option<Response> {
        self.responses.try_recv().ok()
    }

    /// Stops the worker and joins its thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(Message::Shutdown);
        if let Some(handle) = self.handle.take() {
            join_engine_thread(handle);
        }
    }
}

/// Joins the engine thread; returns `false` if it panicked.
fn join_engine_thread(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            tracing::warn!(%reason, "engine worker panicked");
            false
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::ChecksumVariant;

    fn params() -> SessionParams {
        SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32).unwrap()
    }

    #[test]
    #[allow(clippy::panic)]
    fn panicked_worker_is_reported_on_join() {
        let handle = thread::spawn(|| panic!("register overflow"));
        assert!(!join_engine_thread(handle));
        assert!(join_engine_thread(thread::spawn(|| {})));
    }

    #[test]
    fn failures_are_reported_not_raised() {
        let mut engine = Engine::new(params()).unwrap();
        let response = engine.dispatch(Request {
            token: 1,
            command: Command::HeaderSummary { share: 0 },
        });
        assert_eq!(
            response.outcome,
            Outcome::Failed {
                error: "unknown share 0 (session has 0 shares)".into()
            }
        );
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_empty_session() {
        let mut engine = Engine::new(params()).unwrap();
        engine.dispatch(Request {
            token: 1,
            command: Command::NewShare,
        });
        let response = engine.dispatch(Request {
            token: 2,
            command: Command::Deserialize {
                snapshot: "{".into(),
            },
        });
        assert!(matches!(response.outcome, Outcome::Failed { .. }));
        assert_eq!(engine.session().share_count(), 0);
        assert_eq!(engine.session().params(), &params());
    }

    #[test]
    fn command_json_shape() {
        let request = Request {
            token: 9,
            command: Command::HandleInputChange {
                cell: "inp_0_0_3".into(),
                value: "2".into(),
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"token":9,"command":{"op":"handle_input_change","cell":"inp_0_0_3","value":"2"}}"#
        );
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn worker_answers_every_token() {
        let worker = Worker::spawn(params()).unwrap();
        for token in 0..3 {
            assert!(worker.send(Request {
                token,
                command: Command::NewShare,
            }));
        }
        let mut tokens: Vec<Token> = (0..3).filter_map(|_| worker.recv()).map(|r| r.token).collect();
        tokens.sort_unstable();
        assert_eq!(tokens, vec![0, 1, 2]);
        worker.shutdown();
    }
}
