//! One widget bound to at most one document at a time.

use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::collection::WeakEditorCollection;
use super::snippet::insert_snippet_with_widget;
use super::{CursorStatus, Editor, OpenOutcome};
use crate::core::{Emitter, Subscription, SubscriptionSet};
use crate::kernel::error::{MirrorError, Result};
use crate::kernel::services::ports::{
    CodeWidget, DecorationApplier, DocumentModel, DocumentModelProvider, WidgetId,
};
use crate::models::{
    DecorationApplyOptions, Range, RevealKind, Selection, UndoStopOptions, Uri, ViewState,
};

pub struct EditorInstance {
    widget: Rc<dyn CodeWidget>,
    documents: Rc<dyn DocumentModelProvider>,
    collection: WeakEditorCollection,
    decorations: Box<dyn DecorationApplier>,
    view_states: RefCell<FxHashMap<String, ViewState>>,
    current_uri: RefCell<Option<Uri>>,
    current_model: RefCell<Option<Rc<dyn DocumentModel>>>,
    cursor_changed: Emitter<CursorStatus>,
    open_seq: Cell<u64>,
    disposed: Cell<bool>,
    subscriptions: RefCell<SubscriptionSet>,
}

impl EditorInstance {
    /// Wraps `widget`. The caller registers the instance with the collection.
    pub(super) fn new(
        widget: Rc<dyn CodeWidget>,
        documents: Rc<dyn DocumentModelProvider>,
        collection: WeakEditorCollection,
        decorations: Box<dyn DecorationApplier>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let mut subscriptions = SubscriptionSet::new();
            let weak = this.clone();
            subscriptions.push(widget.on_did_change_cursor_position(Box::new(move |_| {
                if let Some(editor) = weak.upgrade() {
                    editor.fire_cursor_status();
                }
            })));
            Self {
                widget,
                documents,
                collection,
                decorations,
                view_states: RefCell::new(FxHashMap::default()),
                current_uri: RefCell::new(None),
                current_model: RefCell::new(None),
                cursor_changed: Emitter::new(),
                open_seq: Cell::new(0),
                disposed: Cell::new(false),
                subscriptions: RefCell::new(subscriptions),
            }
        })
    }

    pub fn on_cursor_position_changed(
        &self,
        listener: impl Fn(&CursorStatus) + 'static,
    ) -> Subscription {
        self.cursor_changed.subscribe(listener)
    }

    /// Binds the document behind `uri`, revealing and selecting `range` when
    /// given. On failure the previously bound document stays.
    ///
    /// When another `open` starts before this one resolves, the later call
    /// wins and this one reports `Superseded` without touching the widget.
    pub async fn open(&self, uri: &Uri, range: Option<Range>) -> Result<OpenOutcome> {
        if self.disposed.get() {
            tracing::debug!(editor = %self.widget.id(), uri = %uri, "open on disposed editor");
            return Ok(OpenOutcome::Superseded);
        }
        self.save_current_state();
        let seq = self.open_seq.get().wrapping_add(1);
        self.open_seq.set(seq);

        let Some(model) = self.documents.resolve_model(uri).await else {
            tracing::warn!(uri = %uri, "open: document model not found");
            return Err(MirrorError::ResourceNotFound {
                uri: uri.clone(),
                side: None,
            });
        };

        if self.disposed.get() || self.open_seq.get() != seq {
            tracing::debug!(uri = %uri, "open superseded before the model resolved");
            return Ok(OpenOutcome::Superseded);
        }

        let text_model = model.to_editor();
        *self.current_uri.borrow_mut() = Some(text_model.uri());
        *self.current_model.borrow_mut() = Some(model);
        self.widget.set_model(Some(text_model));
        self.restore_state();
        if let Some(range) = range {
            self.widget.reveal_range(range, RevealKind::InCenter);
            self.widget.set_selection(Selection::from_range(range));
        }
        // Widgets do not report a cursor position on the first bind.
        self.cursor_changed.fire(&CursorStatus {
            position: self.widget.position(),
            selection_length: 0,
        });
        Ok(OpenOutcome::Bound)
    }

    /// Saves the bound document. `false` when nothing is bound or the save
    /// did not go through.
    pub async fn save(&self) -> bool {
        let Some(uri) = self.current_uri.borrow().clone() else {
            return false;
        };
        self.documents.save_model(&uri).await
    }

    pub fn layout(&self) {
        self.widget.layout();
    }

    pub fn focus(&self) {
        self.widget.focus();
    }

    pub fn view_state_for(&self, uri: &Uri) -> Option<ViewState> {
        self.view_states.borrow().get(uri.as_str()).cloned()
    }

    /// Flushes view state, leaves the collection, then releases the widget.
    /// Calling it again does nothing.
    pub fn dispose(&self) {
        if self.disposed.get() {
            return;
        }
        self.save_current_state();
        if let Some(collection) = self.collection.upgrade() {
            collection.remove_editors([self.widget.id()]);
        }
        self.decorations.dispose();
        self.widget.dispose();
        self.disposed.set(true);
        self.subscriptions.borrow_mut().clear();
    }

    fn save_current_state(&self) {
        let Some(uri) = self.current_uri.borrow().clone() else {
            return;
        };
        if let Some(state) = self.widget.save_view_state() {
            self.view_states
                .borrow_mut()
                .insert(uri.as_str().to_string(), state);
        }
    }

    fn restore_state(&self) {
        let Some(uri) = self.current_uri.borrow().clone() else {
            return;
        };
        let state = self.view_states.borrow().get(uri.as_str()).cloned();
        if let Some(state) = state {
            self.widget.restore_view_state(&state);
        }
    }

    fn fire_cursor_status(&self) {
        let selection_length = match (self.widget.selection(), self.current_model.borrow().as_ref()) {
            (Some(selection), Some(model)) if !selection.is_empty() => {
                model.get_text(Some(selection.range())).chars().count()
            }
            _ => 0,
        };
        self.cursor_changed.fire(&CursorStatus {
            position: self.widget.position(),
            selection_length,
        });
    }
}

impl Editor for EditorInstance {
    fn id(&self) -> WidgetId {
        self.widget.id()
    }

    fn widget(&self) -> Rc<dyn CodeWidget> {
        Rc::clone(&self.widget)
    }

    fn current_uri(&self) -> Option<Uri> {
        self.current_uri.borrow().clone()
    }

    fn current_document_model(&self) -> Option<Rc<dyn DocumentModel>> {
        self.current_model.borrow().clone()
    }

    fn insert_snippet(&self, template: &str, ranges: &[Range], opts: UndoStopOptions) {
        if self.disposed.get() {
            return;
        }
        insert_snippet_with_widget(self.widget.as_ref(), template, ranges, opts);
    }

    fn apply_decoration(&self, key: &str, options: &[DecorationApplyOptions]) {
        if self.disposed.get() {
            return;
        }
        self.decorations.apply_decoration(key, options);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/instance.rs"]
mod tests;
