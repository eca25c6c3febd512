//! Plain-text rendering of worksheets and traces.

use std::fmt::Write as _;

use volvelle::worksheet::{display_column, UNSET};
use volvelle::{ActionTrace, CellKind, CellView};

/// Draws a share's squares as a character grid.
///
/// Columns are spaced in groups of four like the printed sheet. Unknown
/// squares show as `_`; positions without a square stay blank.
#[must_use]
pub fn grid(cells: &[CellView]) -> String {
    let Some(rows) = cells.iter().map(|c| c.y + 1).max() else {
        return String::new();
    };
    let width = cells
        .iter()
        .map(|c| display_column(c.x) + 1)
        .max()
        .unwrap_or(0);

    let mut lines = vec![vec![' '; width]; rows];
    for cell in cells {
        let glyph = match cell.kind {
            CellKind::Symbol(c) | CellKind::FixedHrp(c) => c,
            _ => cell.value.unwrap_or(UNSET),
        };
        if let Some(slot) = lines
            .get_mut(cell.y)
            .and_then(|line| line.get_mut(display_column(cell.x)))
        {
            *slot = glyph;
        }
    }

    let mut out = String::new();
    for line in lines {
        let text: String = line.into_iter().collect();
        let _ = writeln!(out, "{}", text.trim_end());
    }
    out
}

/// One line per action, with a summary footer.
#[must_use]
pub fn trace(trace: &ActionTrace) -> String {
    let mut out = trace.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} actions, {} errors",
        trace.len(),
        trace.count(volvelle::ActionKind::Error)
    );
    out
}
