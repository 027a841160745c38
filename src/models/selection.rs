//! Selection model: an anchor plus the active (cursor) end.
//!
//! Serialized with the field names the extension host uses for selections
//! so that wire records need no conversion layer.

use super::position::{Position, Range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selection_start_line_number: u32,
    pub selection_start_column: u32,
    pub position_line_number: u32,
    pub position_column: u32,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self {
            selection_start_line_number: anchor.line_number,
            selection_start_column: anchor.column,
            position_line_number: active.line_number,
            position_column: active.column,
        }
    }

    pub fn caret(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    /// Left-to-right selection covering `range`.
    pub fn from_range(range: Range) -> Self {
        Self::new(range.start(), range.end())
    }

    pub fn anchor(&self) -> Position {
        Position::new(self.selection_start_line_number, self.selection_start_column)
    }

    pub fn active(&self) -> Position {
        Position::new(self.position_line_number, self.position_column)
    }

    pub fn range(&self) -> Range {
        Range::from_positions(self.anchor(), self.active())
    }

    pub fn is_empty(&self) -> bool {
        self.anchor() == self.active()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::caret(Position::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/selection.rs"]
mod tests;
