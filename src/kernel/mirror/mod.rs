//! Main-thread half of the editor bridge.
//!
//! Translates workbench events into `ChangeSet` / `PropertiesChange` records
//! for the extension host, and replays its commands onto local editors.
//! Remote ids are resolved afresh on every command; nothing is cached across
//! an await.

mod change;
mod commands;
pub mod id;
mod outbound;
pub mod protocol;

#[cfg(test)]
#[path = "../../../tests/unit/kernel/mirror/support.rs"]
mod support;

pub use change::{ChangeSet, EditorDescriptor, PropertiesChange, SelectionsChange};
pub use id::{group_name_of, text_editor_id, ID_SEPARATOR};
pub use protocol::{Notification, RemoteCommand, Request, Response, ResponseError};

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{Emitter, Subscription};
use crate::kernel::editor::{Editor, EditorCollection};
use crate::kernel::services::ports::{
    is_editor_like, EditorGroup, ExtHostEditors, Resource, WorkbenchEditorService, WorkbenchEvent,
};
use crate::models::{ResolvedEditorOptions, UndoStopOptions};

pub struct MainThreadEditors {
    workbench: Rc<dyn WorkbenchEditorService>,
    collection: EditorCollection,
    proxy: Rc<dyn ExtHostEditors>,
    snippet_defaults: UndoStopOptions,
    events: RefCell<Option<Subscription>>,
}

impl MainThreadEditors {
    pub fn new(
        workbench: Rc<dyn WorkbenchEditorService>,
        collection: EditorCollection,
        proxy: Rc<dyn ExtHostEditors>,
        snippet_defaults: UndoStopOptions,
    ) -> Rc<Self> {
        Rc::new(Self {
            workbench,
            collection,
            proxy,
            snippet_defaults,
            events: RefCell::new(None),
        })
    }

    /// Starts listening to `events`, then sends the full inventory. Events
    /// raised after this call are delivered as deltas.
    pub fn start(self: &Rc<Self>, events: &Emitter<WorkbenchEvent>) {
        let weak = Rc::downgrade(self);
        let subscription = events.subscribe(move |event| {
            if let Some(mirror) = weak.upgrade() {
                mirror.handle_event(event);
            }
        });
        *self.events.borrow_mut() = Some(subscription);

        let initial = self.initial_state();
        tracing::info!(editors = initial.created.len(), "editor mirror started");
        self.proxy.accept_change(initial);
    }

    pub fn stop(&self) {
        self.events.borrow_mut().take();
    }

    pub fn is_started(&self) -> bool {
        self.events.borrow().is_some()
    }

    /// One `created` entry per group currently showing a code or diff
    /// editor, plus the active editor when there is one.
    pub fn initial_state(&self) -> ChangeSet {
        let created = self
            .workbench
            .editor_groups()
            .iter()
            .filter_map(|group| self.describe_current(group.as_ref()))
            .collect();
        let actived = self.active_editor_id();
        ChangeSet {
            created,
            removed: Vec::new(),
            actived: actived.map(Some),
        }
    }

    /// The live editor addressed by `id`, if its group still shows that
    /// resource in a code or diff view.
    pub fn get_editor(&self, id: &str) -> Option<Rc<dyn Editor>> {
        let group = self.get_group(id)?;
        let resource = group.current_resource()?;
        if !is_editor_like(group.current_open_type().as_ref()) {
            return None;
        }
        if id::group_resource_id(group.as_ref(), &resource) != id {
            return None;
        }
        let editor = group.current_editor()?;
        if editor.is_disposed() || !self.collection.contains(editor.id()) {
            return None;
        }
        if editor.current_uri().as_ref() != Some(&resource.uri) {
            tracing::debug!(id, "editor is bound to another resource than its group shows");
            return None;
        }
        Some(editor)
    }

    fn get_group(&self, id: &str) -> Option<Rc<dyn EditorGroup>> {
        self.workbench.editor_group(group_name_of(id)?)
    }

    fn active_editor_id(&self) -> Option<String> {
        let group = self.workbench.current_editor_group()?;
        if !is_editor_like(group.current_open_type().as_ref()) {
            return None;
        }
        let resource = self.workbench.current_resource()?;
        Some(id::group_resource_id(group.as_ref(), &resource))
    }

    fn describe_current(&self, group: &dyn EditorGroup) -> Option<EditorDescriptor> {
        if !is_editor_like(group.current_open_type().as_ref()) {
            return None;
        }
        let resource = group.current_resource()?;
        self.describe(group, &resource)
    }

    fn describe(&self, group: &dyn EditorGroup, resource: &Resource) -> Option<EditorDescriptor> {
        let Some(editor) = group.current_editor() else {
            tracing::debug!(group = group.name(), uri = %resource.uri, "editor-like group without a live editor");
            return None;
        };
        let widget = editor.widget();
        Some(EditorDescriptor {
            id: id::group_resource_id(group, resource),
            uri: resource.uri.to_string(),
            selections: widget.selections(),
            options: resolved_options(editor.as_ref()),
            view_column: group.index(),
            visible_ranges: widget.visible_ranges(),
        })
    }
}

fn resolved_options(editor: &dyn Editor) -> ResolvedEditorOptions {
    let widget = editor.widget();
    let model = widget
        .model()
        .map(|model| model.options())
        .unwrap_or_default();
    ResolvedEditorOptions::resolve(model, widget.view_options())
}
