//! Text widget contracts.
//!
//! A widget is one native editing view. The kernel never assumes anything
//! about how it renders; it only drives it through these methods.

use std::rc::Rc;

use super::document::TextModel;
use crate::core::Subscription;
use crate::models::{
    DecorationId, ModelDecoration, Position, Range, RevealKind, Selection, SingleEditOperation,
    ViewOptions, ViewState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "widget:{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSelectionEvent {
    /// Who moved the selection (`keyboard`, `mouse`, `api`, ...).
    pub source: String,
}

pub trait CodeWidget {
    fn id(&self) -> WidgetId;

    fn model(&self) -> Option<Rc<dyn TextModel>>;
    fn set_model(&self, model: Option<Rc<dyn TextModel>>);

    fn position(&self) -> Option<Position>;
    fn selection(&self) -> Option<Selection>;
    fn selections(&self) -> Vec<Selection>;
    fn set_selections(&self, selections: &[Selection]);
    fn set_selection(&self, selection: Selection) {
        self.set_selections(&[selection]);
    }

    fn visible_ranges(&self) -> Vec<Range>;
    fn reveal_range(&self, range: Range, kind: RevealKind);

    fn save_view_state(&self) -> Option<ViewState>;
    fn restore_view_state(&self, state: &ViewState);

    fn view_options(&self) -> ViewOptions;

    /// Replaces `old` decorations with `new` and returns the ids of `new`.
    fn delta_decorations(&self, old: &[DecorationId], new: &[ModelDecoration]) -> Vec<DecorationId>;

    /// Inserts `template` at every current selection.
    fn insert_snippet(&self, template: &str, undo_stop_before: bool, undo_stop_after: bool);
    fn push_undo_stop(&self);
    fn execute_edits(&self, source: &str, edits: &[SingleEditOperation]) -> bool;

    fn focus(&self);
    fn layout(&self);
    fn dispose(&self);

    fn on_did_change_cursor_position(&self, listener: Box<dyn Fn(&())>) -> Subscription;
    fn on_did_change_cursor_selection(
        &self,
        listener: Box<dyn Fn(&CursorSelectionEvent)>,
    ) -> Subscription;
    fn on_did_scroll_change(&self, listener: Box<dyn Fn(&())>) -> Subscription;
    fn on_did_layout_change(&self, listener: Box<dyn Fn(&())>) -> Subscription;
    fn on_did_change_configuration(&self, listener: Box<dyn Fn(&())>) -> Subscription;
}

/// Side-by-side widget owning an original and a modified sub-view.
pub trait DiffWidget {
    fn original_editor(&self) -> Rc<dyn CodeWidget>;
    fn modified_editor(&self) -> Rc<dyn CodeWidget>;

    /// Binds both sides in one step.
    fn set_model(&self, original: Rc<dyn TextModel>, modified: Rc<dyn TextModel>);

    fn focus(&self);
    fn layout(&self);
    fn dispose(&self);
}
