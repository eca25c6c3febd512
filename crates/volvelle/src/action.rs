//! Action traces: the ordered cell updates produced by one edit.
//!
//! A presentation layer replays a trace to animate the worksheet. The engine
//! guarantees only order and content, never timing.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::worksheet::CellId;

/// How a square changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Unset square received its first value.
    Fill,
    /// A known square now holds a different value.
    Correction,
    /// The square disagrees with what the worksheet expects; flash it.
    Error,
}

impl ActionKind {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Correction => "correction",
            Self::Error => "error",
        }
    }
}

/// One update of one square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// The square.
    pub cell: CellId,
    /// What happened to it.
    pub kind: ActionKind,
    /// The value to show; for errors, the expected symbol when known.
    pub value: Option<char>,
}

impl Action {
    /// A first-time fill.
    #[must_use]
    pub const fn fill(cell: CellId, value: char) -> Self {
        Self {
            cell,
            kind: ActionKind::Fill,
            value: Some(value),
        }
    }

    /// A changed value.
    #[must_use]
    pub const fn correction(cell: CellId, value: char) -> Self {
        Self {
            cell,
            kind: ActionKind::Correction,
            value: Some(value),
        }
    }

    /// A flash on `cell`.
    #[must_use]
    pub const fn error(cell: CellId, value: Option<char>) -> Self {
        Self {
            cell,
            kind: ActionKind::Error,
            value,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {} {}",
            self.kind.name(),
            self.cell,
            self.value.unwrap_or('_')
        )
    }
}

/// The ordered actions of one edit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTrace {
    actions: Vec<Action>,
}

impl ActionTrace {
    /// An empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// An empty trace with room for `capacity` actions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            actions: Vec::with_capacity(capacity),
        }
    }

    /// Appends an action.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Appends every action of `other`.
    pub fn extend(&mut self, other: ActionTrace) {
        self.actions.extend(other.actions);
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when the edit changed nothing visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The actions in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Iterates in order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Number of actions of one kind.
    #[must_use]
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind == kind).count()
    }

    /// True when any action flashes an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.actions.iter().any(|a| a.kind == ActionKind::Error)
    }
}

impl fmt::Display for ActionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            writeln!(f, "{action}")?;
        }
        Ok(())
    }
}

impl FromIterator<Action> for ActionTrace {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ActionTrace {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActionTrace {
    type Item = &'a Action;
    type IntoIter = core::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worksheet::Coord;

    fn id(col: usize) -> CellId {
        CellId::new(0, Coord::new(2, col))
    }

    #[test]
    fn counts_by_kind() {
        let trace: ActionTrace = [
            Action::fill(id(3), 'Q'),
            Action::fill(id(4), 'P'),
            Action::correction(id(5), 'Z'),
        ]
        .into_iter()
        .collect();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.count(ActionKind::Fill), 2);
        assert!(!trace.has_errors());
    }

    #[test]
    fn display_lines() {
        let mut trace = ActionTrace::new();
        trace.push(Action::error(id(7), None));
        trace.push(Action::fill(id(8), 'X'));
        assert_eq!(
            trace.to_string(),
            "error      inp_0_2_7 _\nfill       inp_0_2_8 X\n"
        );
    }

    #[test]
    fn serde_shape() {
        let trace: ActionTrace = std::iter::once(Action::correction(id(3), 'L')).collect();
        let json = serde_json::to_string(&trace).unwrap();
        assert_eq!(
            json,
            r#"[{"cell":"inp_0_2_3","kind":"correction","value":"L"}]"#
        );
    }
}
