use super::position::Range;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleEditOperation {
    pub range: Range,
    /// `None` deletes the range.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub force_move_markers: bool,
}

impl SingleEditOperation {
    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: Some(text.into()),
            force_move_markers: false,
        }
    }

    pub fn delete(range: Range) -> Self {
        Self {
            range,
            text: None,
            force_move_markers: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EndOfLine {
    #[default]
    #[serde(rename = "LF", alias = "lf")]
    Lf,
    #[serde(rename = "CRLF", alias = "crlf")]
    CrLf,
}

impl EndOfLine {
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::Lf => "\n",
            EndOfLine::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UndoStopOptions {
    pub undo_stop_before: bool,
    pub undo_stop_after: bool,
}

impl Default for UndoStopOptions {
    fn default() -> Self {
        Self {
            undo_stop_before: true,
            undo_stop_after: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyEditsOptions {
    #[serde(default)]
    pub set_end_of_line: Option<EndOfLine>,
    #[serde(default)]
    pub undo_stop_before: bool,
    #[serde(default)]
    pub undo_stop_after: bool,
}
