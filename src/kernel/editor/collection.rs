//! Process-wide registry of live editors.
//!
//! Membership is a set keyed by widget id. Observers hear about changes only
//! when the set size actually moved.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::decoration::DecorationCollection;
use super::diff::DiffEditorInstance;
use super::instance::EditorInstance;
use super::Editor;
use crate::core::{Emitter, Subscription};
use crate::kernel::services::ports::{CodeWidget, DiffWidget, DocumentModelProvider, WidgetId};
use crate::models::Uri;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorsChanged {
    pub added: Vec<WidgetId>,
    pub removed: Vec<WidgetId>,
}

/// A document's dirty flag changed; tabs and explorers badge on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDecorationChange {
    pub uri: Uri,
    pub dirty: bool,
}

struct CollectionInner {
    documents: Rc<dyn DocumentModelProvider>,
    decorations: DecorationCollection,
    editors: RefCell<Vec<Rc<dyn Editor>>>,
    editors_changed: Emitter<EditorsChanged>,
    resource_decoration_changed: Emitter<ResourceDecorationChange>,
    _on_content_changed: Subscription,
}

#[derive(Clone)]
pub struct EditorCollection {
    inner: Rc<CollectionInner>,
}

#[derive(Clone, Default)]
pub struct WeakEditorCollection {
    inner: Weak<CollectionInner>,
}

impl WeakEditorCollection {
    pub fn upgrade(&self) -> Option<EditorCollection> {
        self.inner.upgrade().map(|inner| EditorCollection { inner })
    }
}

impl EditorCollection {
    pub fn new(documents: Rc<dyn DocumentModelProvider>, decorations: DecorationCollection) -> Self {
        let resource_decoration_changed = Emitter::new();
        let on_content_changed = {
            let relay = resource_decoration_changed.clone();
            documents.on_did_change_content(Box::new(move |e| {
                relay.fire(&ResourceDecorationChange {
                    uri: e.uri.clone(),
                    dirty: e.dirty,
                });
            }))
        };
        Self {
            inner: Rc::new(CollectionInner {
                documents,
                decorations,
                editors: RefCell::new(Vec::new()),
                editors_changed: Emitter::new(),
                resource_decoration_changed,
                _on_content_changed: on_content_changed,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakEditorCollection {
        WeakEditorCollection {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn documents(&self) -> Rc<dyn DocumentModelProvider> {
        Rc::clone(&self.inner.documents)
    }

    pub fn decorations(&self) -> &DecorationCollection {
        &self.inner.decorations
    }

    /// Wraps `widget` in a new editor and registers it.
    pub fn create_code_editor(&self, widget: Rc<dyn CodeWidget>) -> Rc<EditorInstance> {
        let applier = self.inner.decorations.applier_for(Rc::clone(&widget));
        let editor = EditorInstance::new(
            widget,
            self.documents(),
            self.downgrade(),
            Box::new(applier),
        );
        self.add_editors([editor.clone() as Rc<dyn Editor>]);
        editor
    }

    /// Wraps `widget` and registers both of its sides.
    pub fn create_diff_editor(&self, widget: Rc<dyn DiffWidget>) -> Rc<DiffEditorInstance> {
        let diff = Rc::new(DiffEditorInstance::new(
            widget,
            self.documents(),
            self.downgrade(),
            &self.inner.decorations,
        ));
        self.add_editors([
            diff.original_editor() as Rc<dyn Editor>,
            diff.modified_editor() as Rc<dyn Editor>,
        ]);
        diff
    }

    /// Snapshot of the current members.
    pub fn list_editors(&self) -> Vec<Rc<dyn Editor>> {
        self.inner.editors.borrow().clone()
    }

    pub fn get_editor(&self, id: WidgetId) -> Option<Rc<dyn Editor>> {
        self.inner
            .editors
            .borrow()
            .iter()
            .find(|editor| editor.id() == id)
            .cloned()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.get_editor(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.editors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds editors not already present. Re-adding a member does nothing.
    pub fn add_editors(&self, editors: impl IntoIterator<Item = Rc<dyn Editor>>) {
        let mut added = Vec::new();
        {
            let mut members = self.inner.editors.borrow_mut();
            for editor in editors {
                let id = editor.id();
                if members.iter().any(|member| member.id() == id) {
                    continue;
                }
                members.push(editor);
                added.push(id);
            }
        }
        if added.is_empty() {
            return;
        }
        tracing::debug!(added = added.len(), total = self.len(), "editors added");
        self.inner.editors_changed.fire(&EditorsChanged {
            added,
            removed: Vec::new(),
        });
    }

    /// Removes the given ids. Absent ids are ignored.
    pub fn remove_editors(&self, ids: impl IntoIterator<Item = WidgetId>) {
        let mut removed = Vec::new();
        {
            let mut members = self.inner.editors.borrow_mut();
            for id in ids {
                let before = members.len();
                members.retain(|member| member.id() != id);
                if members.len() != before {
                    removed.push(id);
                }
            }
        }
        if removed.is_empty() {
            return;
        }
        tracing::debug!(removed = removed.len(), total = self.len(), "editors removed");
        self.inner.editors_changed.fire(&EditorsChanged {
            added: Vec::new(),
            removed,
        });
    }

    pub fn on_did_change_editors(
        &self,
        listener: impl Fn(&EditorsChanged) + 'static,
    ) -> Subscription {
        self.inner.editors_changed.subscribe(listener)
    }

    pub fn on_did_change_resource_decoration(
        &self,
        listener: impl Fn(&ResourceDecorationChange) + 'static,
    ) -> Subscription {
        self.inner.resource_decoration_changed.subscribe(listener)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/collection.rs"]
mod tests;
