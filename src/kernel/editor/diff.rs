//! Diff editor: one diff widget exposed as two addressable editors.
//!
//! The side editors own nothing. Every call goes to the diff widget's live
//! sub-view, and the current uri is read from the models stored on the
//! owning instance.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::collection::WeakEditorCollection;
use super::decoration::{DecorationCollection, WidgetDecorationApplier};
use super::snippet::insert_snippet_with_widget;
use super::{Editor, OpenOutcome};
use crate::kernel::error::{DiffSide, MirrorError, Result};
use crate::kernel::services::ports::{
    CodeWidget, DecorationApplier, DiffWidget, DocumentModel, DocumentModelProvider, WidgetId,
};
use crate::models::{DecorationApplyOptions, Range, UndoStopOptions, Uri};

#[derive(Default)]
struct DiffModels {
    original: RefCell<Option<Rc<dyn DocumentModel>>>,
    modified: RefCell<Option<Rc<dyn DocumentModel>>>,
    disposed: Cell<bool>,
}

impl DiffModels {
    fn side(&self, side: DiffSide) -> Option<Rc<dyn DocumentModel>> {
        match side {
            DiffSide::Original => self.original.borrow().clone(),
            DiffSide::Modified => self.modified.borrow().clone(),
        }
    }
}

/// One side of a diff view, addressable like any other editor.
pub struct DiffSideEditor {
    side: DiffSide,
    diff: Rc<dyn DiffWidget>,
    models: Rc<DiffModels>,
    decorations: WidgetDecorationApplier,
}

impl DiffSideEditor {
    pub fn side(&self) -> DiffSide {
        self.side
    }
}

impl Editor for DiffSideEditor {
    fn id(&self) -> WidgetId {
        self.widget().id()
    }

    fn widget(&self) -> Rc<dyn CodeWidget> {
        match self.side {
            DiffSide::Original => self.diff.original_editor(),
            DiffSide::Modified => self.diff.modified_editor(),
        }
    }

    fn current_uri(&self) -> Option<Uri> {
        self.models.side(self.side).map(|model| model.uri())
    }

    fn current_document_model(&self) -> Option<Rc<dyn DocumentModel>> {
        self.models.side(self.side)
    }

    fn insert_snippet(&self, template: &str, ranges: &[Range], opts: UndoStopOptions) {
        if self.models.disposed.get() {
            return;
        }
        insert_snippet_with_widget(self.widget().as_ref(), template, ranges, opts);
    }

    fn apply_decoration(&self, key: &str, options: &[DecorationApplyOptions]) {
        if self.models.disposed.get() {
            return;
        }
        self.decorations.apply_decoration(key, options);
    }

    fn is_disposed(&self) -> bool {
        self.models.disposed.get()
    }
}

pub struct DiffEditorInstance {
    widget: Rc<dyn DiffWidget>,
    documents: Rc<dyn DocumentModelProvider>,
    collection: WeakEditorCollection,
    models: Rc<DiffModels>,
    original: Rc<DiffSideEditor>,
    modified: Rc<DiffSideEditor>,
    compare_seq: Cell<u64>,
}

impl DiffEditorInstance {
    pub(super) fn new(
        widget: Rc<dyn DiffWidget>,
        documents: Rc<dyn DocumentModelProvider>,
        collection: WeakEditorCollection,
        decorations: &DecorationCollection,
    ) -> Self {
        let models = Rc::new(DiffModels::default());
        let side = |side: DiffSide, sub: Rc<dyn CodeWidget>| {
            Rc::new(DiffSideEditor {
                side,
                diff: Rc::clone(&widget),
                models: Rc::clone(&models),
                decorations: decorations.applier_for(sub),
            })
        };
        let original = side(DiffSide::Original, widget.original_editor());
        let modified = side(DiffSide::Modified, widget.modified_editor());
        Self {
            widget,
            documents,
            collection,
            models,
            original,
            modified,
            compare_seq: Cell::new(0),
        }
    }

    pub fn original_editor(&self) -> Rc<DiffSideEditor> {
        Rc::clone(&self.original)
    }

    pub fn modified_editor(&self) -> Rc<DiffSideEditor> {
        Rc::clone(&self.modified)
    }

    pub fn original_model(&self) -> Option<Rc<dyn DocumentModel>> {
        self.models.side(DiffSide::Original)
    }

    pub fn modified_model(&self) -> Option<Rc<dyn DocumentModel>> {
        self.models.side(DiffSide::Modified)
    }

    /// Resolves both documents concurrently and binds them in one step. If
    /// either side fails, nothing is bound and the error names that side.
    /// A later `compare` overtaking this one makes it report `Superseded`.
    pub async fn compare(&self, original_uri: &Uri, modified_uri: &Uri) -> Result<OpenOutcome> {
        if self.models.disposed.get() {
            return Ok(OpenOutcome::Superseded);
        }
        let seq = self.compare_seq.get().wrapping_add(1);
        self.compare_seq.set(seq);

        let (original, modified) = tokio::join!(
            self.documents.resolve_model(original_uri),
            self.documents.resolve_model(modified_uri),
        );
        let Some(original) = original else {
            tracing::warn!(uri = %original_uri, "compare: original document not found");
            return Err(MirrorError::ResourceNotFound {
                uri: original_uri.clone(),
                side: Some(DiffSide::Original),
            });
        };
        let Some(modified) = modified else {
            tracing::warn!(uri = %modified_uri, "compare: modified document not found");
            return Err(MirrorError::ResourceNotFound {
                uri: modified_uri.clone(),
                side: Some(DiffSide::Modified),
            });
        };

        if self.models.disposed.get() || self.compare_seq.get() != seq {
            tracing::debug!(
                original = %original_uri,
                modified = %modified_uri,
                "compare superseded before both models resolved"
            );
            return Ok(OpenOutcome::Superseded);
        }

        let original_text = original.to_editor();
        let modified_text = modified.to_editor();
        *self.models.original.borrow_mut() = Some(original);
        *self.models.modified.borrow_mut() = Some(modified);
        self.widget.set_model(original_text, modified_text);
        Ok(OpenOutcome::Bound)
    }

    pub fn layout(&self) {
        self.widget.layout();
    }

    pub fn focus(&self) {
        self.widget.focus();
    }

    pub fn is_disposed(&self) -> bool {
        self.models.disposed.get()
    }

    /// Removes both sides from the collection and disposes the diff widget
    /// once. Calling it again does nothing.
    pub fn dispose(&self) {
        if self.models.disposed.get() {
            return;
        }
        if let Some(collection) = self.collection.upgrade() {
            collection.remove_editors([self.original.id(), self.modified.id()]);
        }
        self.original.decorations.dispose();
        self.modified.decorations.dispose();
        self.widget.dispose();
        self.models.disposed.set(true);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/diff.rs"]
mod tests;
