//! Editor domain: live editor instances and the collection tracking them.

mod collection;
mod decoration;
mod diff;
mod instance;
mod snippet;

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/gated.rs"]
pub(crate) mod gated;

pub use collection::{EditorCollection, EditorsChanged, ResourceDecorationChange, WeakEditorCollection};
pub use decoration::{DecorationCollection, WidgetDecorationApplier};
pub use diff::{DiffEditorInstance, DiffSideEditor};
pub use instance::EditorInstance;
pub use snippet::insert_snippet_with_widget;

use std::rc::Rc;

use crate::core::Subscription;
use crate::kernel::services::ports::{CodeWidget, DocumentModel, WidgetId};
use crate::models::{
    DecorationApplyOptions, Position, Range, Selection, UndoStopOptions, Uri,
};

/// What an `open` or `compare` call did once its documents resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The resolved documents are now bound to the widget.
    Bound,
    /// A later call or a dispose overtook this one; the widget is untouched.
    Superseded,
}

impl OpenOutcome {
    pub fn is_bound(self) -> bool {
        self == OpenOutcome::Bound
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStatus {
    pub position: Option<Position>,
    pub selection_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionsChanged {
    pub selections: Vec<Selection>,
    pub source: String,
}

/// Capabilities every addressable editor offers, whether it owns its widget
/// or is one side of a diff view.
pub trait Editor {
    fn id(&self) -> WidgetId;

    /// The widget currently backing this editor.
    fn widget(&self) -> Rc<dyn CodeWidget>;

    fn current_uri(&self) -> Option<Uri>;

    fn current_document_model(&self) -> Option<Rc<dyn DocumentModel>>;

    fn selections(&self) -> Vec<Selection> {
        self.widget().selections()
    }

    fn set_selections(&self, selections: &[Selection]) {
        self.widget().set_selections(selections);
    }

    fn set_selection(&self, selection: Selection) {
        self.widget().set_selection(selection);
    }

    fn insert_snippet(&self, template: &str, ranges: &[Range], opts: UndoStopOptions);

    fn apply_decoration(&self, key: &str, options: &[DecorationApplyOptions]);

    fn on_selections_changed(&self, listener: Box<dyn Fn(&SelectionsChanged)>) -> Subscription {
        let widget = self.widget();
        let weak = Rc::downgrade(&widget);
        widget.on_did_change_cursor_selection(Box::new(move |e| {
            let Some(widget) = weak.upgrade() else {
                return;
            };
            listener(&SelectionsChanged {
                selections: widget.selections(),
                source: e.source.clone(),
            });
        }))
    }

    /// Fires on both scroll and layout changes.
    fn on_visible_ranges_changed(&self, listener: Box<dyn Fn(&[Range])>) -> Subscription {
        let widget = self.widget();
        let listener: Rc<dyn Fn(&[Range])> = Rc::from(listener);
        let on_scroll = {
            let weak = Rc::downgrade(&widget);
            let listener = Rc::clone(&listener);
            widget.on_did_scroll_change(Box::new(move |_| {
                if let Some(widget) = weak.upgrade() {
                    listener(&widget.visible_ranges());
                }
            }))
        };
        let on_layout = {
            let weak = Rc::downgrade(&widget);
            widget.on_did_layout_change(Box::new(move |_| {
                if let Some(widget) = weak.upgrade() {
                    listener(&widget.visible_ranges());
                }
            }))
        };
        Subscription::merge(vec![on_scroll, on_layout])
    }

    fn on_configuration_changed(&self, listener: Box<dyn Fn()>) -> Subscription {
        self.widget()
            .on_did_change_configuration(Box::new(move |_| listener()))
    }

    fn is_disposed(&self) -> bool;
}
