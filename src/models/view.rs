use super::position::Range;
use super::selection::Selection;
use serde::{Deserialize, Serialize};

/// Scroll, folding and cursor state cached per resource so a revisit lands
/// where the user left off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub scroll_top: u32,
    pub scroll_left: u32,
    pub selections: Vec<Selection>,
    #[serde(default)]
    pub folded: Vec<Range>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealKind {
    #[default]
    Default,
    InCenter,
    AtTop,
    InCenterIfOutsideViewport,
}
