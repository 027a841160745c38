//! Headless workbench: named editor groups, each showing one resource.
//!
//! Every group owns one code editor for its whole lifetime and creates a diff
//! editor the first time it shows a diff. Lifecycle and property changes are
//! published on the workbench's `Emitter<WorkbenchEvent>`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::widget::{MemoryCodeWidget, MemoryDiffWidget};
use crate::core::{Emitter, SubscriptionSet};
use crate::kernel::editor::{
    DiffEditorInstance, Editor, EditorCollection, EditorInstance, OpenOutcome,
};
use crate::kernel::error::{MirrorError, Result};
use crate::kernel::services::ports::{
    EditorGroup, GroupChange, LocalBoxFuture, OpenResult, OpenType, Resource,
    ResourceOpenOptions, WorkbenchEditorService, WorkbenchEvent,
};
use crate::models::{Range, Uri, ViewOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewKind {
    Code,
    Diff,
}

struct GroupDiff {
    editor: Rc<DiffEditorInstance>,
    widget: Rc<MemoryDiffWidget>,
}

pub struct MemoryEditorGroup {
    this: Weak<MemoryEditorGroup>,
    name: String,
    index: Cell<usize>,
    active_index: Rc<Cell<usize>>,
    events: Emitter<WorkbenchEvent>,
    collection: EditorCollection,
    view_options: ViewOptions,
    code: Rc<EditorInstance>,
    code_widget: Rc<MemoryCodeWidget>,
    diff: RefCell<Option<GroupDiff>>,
    resource: RefCell<Option<Resource>>,
    open_type: RefCell<Option<OpenType>>,
    subscriptions: RefCell<SubscriptionSet>,
}

impl std::fmt::Debug for MemoryEditorGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEditorGroup")
            .field("name", &self.name)
            .field("index", &self.index.get())
            .finish_non_exhaustive()
    }
}

impl MemoryEditorGroup {
    fn new(
        name: String,
        index: usize,
        active_index: Rc<Cell<usize>>,
        events: Emitter<WorkbenchEvent>,
        collection: EditorCollection,
        view_options: ViewOptions,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let code_widget = MemoryCodeWidget::new(view_options);
            let code = collection.create_code_editor(code_widget.clone());
            let mut subscriptions = SubscriptionSet::new();
            forward_editor_events(this, code.as_ref(), ViewKind::Code, &mut subscriptions);
            Self {
                this: this.clone(),
                name,
                index: Cell::new(index),
                active_index,
                events,
                collection,
                view_options,
                code,
                code_widget,
                diff: RefCell::new(None),
                resource: RefCell::new(None),
                open_type: RefCell::new(None),
                subscriptions: RefCell::new(subscriptions),
            }
        })
    }

    pub fn code_editor(&self) -> Rc<EditorInstance> {
        Rc::clone(&self.code)
    }

    pub fn code_widget(&self) -> Rc<MemoryCodeWidget> {
        Rc::clone(&self.code_widget)
    }

    pub fn diff_editor(&self) -> Option<Rc<DiffEditorInstance>> {
        self.diff.borrow().as_ref().map(|diff| Rc::clone(&diff.editor))
    }

    pub fn diff_widget(&self) -> Option<Rc<MemoryDiffWidget>> {
        self.diff.borrow().as_ref().map(|diff| Rc::clone(&diff.widget))
    }

    /// Shows `uri` in the group's code editor. A superseded open leaves the
    /// group showing whatever the winning call bound.
    pub async fn open_code(&self, uri: &Uri, range: Option<Range>) -> Result<OpenOutcome> {
        let outcome = self.code.open(uri, range).await?;
        if outcome.is_bound() {
            self.show(Resource::new(uri.clone()), OpenType::Code);
        }
        Ok(outcome)
    }

    /// Shows `original` against `modified`. The group's resource is the
    /// modified side.
    pub async fn open_diff(&self, original: &Uri, modified: &Uri) -> Result<OpenOutcome> {
        let diff = self.ensure_diff();
        let outcome = diff.compare(original, modified).await?;
        if outcome.is_bound() {
            self.show(
                Resource::new(modified.clone()),
                OpenType::Diff {
                    original: original.clone(),
                },
            );
        }
        Ok(outcome)
    }

    /// Shows a non-editor view, such as a settings page or an image.
    pub fn open_component(&self, uri: &Uri, component: &str) {
        self.show(
            Resource::new(uri.clone()),
            OpenType::Component(component.to_string()),
        );
    }

    fn ensure_diff(&self) -> Rc<DiffEditorInstance> {
        if let Some(editor) = self.diff_editor() {
            return editor;
        }
        let widget = MemoryDiffWidget::new(self.view_options);
        let editor = self.collection.create_diff_editor(widget.clone());
        forward_editor_events(
            &self.this,
            editor.modified_editor().as_ref(),
            ViewKind::Diff,
            &mut self.subscriptions.borrow_mut(),
        );
        *self.diff.borrow_mut() = Some(GroupDiff {
            editor: Rc::clone(&editor),
            widget,
        });
        editor
    }

    fn show(&self, resource: Resource, open_type: OpenType) {
        let old_resource = self.resource.replace(Some(resource.clone()));
        let old_open_type = self.open_type.replace(Some(open_type.clone()));
        self.publish_change(old_resource, Some(resource), old_open_type, Some(open_type));
    }

    fn publish_change(
        &self,
        old_resource: Option<Resource>,
        new_resource: Option<Resource>,
        old_open_type: Option<OpenType>,
        new_open_type: Option<OpenType>,
    ) {
        let Some(group) = self.this.upgrade() else {
            return;
        };
        let active_changed = old_resource.as_ref().map(|r| &r.uri)
            != new_resource.as_ref().map(|r| &r.uri);
        self.events.fire(&WorkbenchEvent::GroupChanged(GroupChange {
            group,
            old_resource,
            new_resource: new_resource.clone(),
            old_open_type,
            new_open_type,
        }));
        if active_changed && self.is_active() {
            self.events
                .fire(&WorkbenchEvent::ActiveResourceChanged(new_resource));
        }
    }

    fn is_active(&self) -> bool {
        self.active_index.get() == self.index.get()
    }

    fn set_index(&self, index: usize) {
        if self.index.replace(index) == index {
            return;
        }
        if let Some(group) = self.this.upgrade() {
            self.events
                .fire(&WorkbenchEvent::GroupIndexChanged { group });
        }
    }

    fn showing(&self, kind: ViewKind) -> Option<Resource> {
        let matches = match (self.open_type.borrow().as_ref(), kind) {
            (Some(OpenType::Code), ViewKind::Code) => true,
            (Some(OpenType::Diff { .. }), ViewKind::Diff) => true,
            _ => false,
        };
        if !matches {
            return None;
        }
        self.resource.borrow().clone()
    }

    fn dispose(&self) {
        self.subscriptions.borrow_mut().clear();
        self.code.dispose();
        if let Some(diff) = self.diff.borrow_mut().take() {
            diff.editor.dispose();
        }
    }
}

/// Republishes an editor's selection, visible range and configuration
/// changes as workbench events while the group shows that kind of view.
fn forward_editor_events(
    group: &Weak<MemoryEditorGroup>,
    editor: &dyn Editor,
    kind: ViewKind,
    subscriptions: &mut SubscriptionSet,
) {
    let weak = group.clone();
    subscriptions.push(editor.on_selections_changed(Box::new(move |e| {
        let Some(group) = weak.upgrade() else {
            return;
        };
        let Some(resource) = group.showing(kind) else {
            return;
        };
        group.events.fire(&WorkbenchEvent::SelectionChanged {
            group: group.clone(),
            resource,
            selections: e.selections.clone(),
            source: e.source.clone(),
        });
    })));

    let weak = group.clone();
    subscriptions.push(editor.on_visible_ranges_changed(Box::new(move |ranges| {
        let Some(group) = weak.upgrade() else {
            return;
        };
        let Some(resource) = group.showing(kind) else {
            return;
        };
        group.events.fire(&WorkbenchEvent::VisibleRangesChanged {
            group: group.clone(),
            resource,
            visible_ranges: ranges.to_vec(),
        });
    })));

    let weak = group.clone();
    subscriptions.push(editor.on_configuration_changed(Box::new(move || {
        let Some(group) = weak.upgrade() else {
            return;
        };
        let Some(resource) = group.showing(kind) else {
            return;
        };
        group.events.fire(&WorkbenchEvent::ConfigurationChanged {
            group: group.clone(),
            resource,
        });
    })));
}

impl EditorGroup for MemoryEditorGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn index(&self) -> usize {
        self.index.get()
    }

    fn current_resource(&self) -> Option<Resource> {
        self.resource.borrow().clone()
    }

    fn current_open_type(&self) -> Option<OpenType> {
        self.open_type.borrow().clone()
    }

    fn current_editor(&self) -> Option<Rc<dyn Editor>> {
        match self.open_type.borrow().as_ref()? {
            OpenType::Code => Some(self.code.clone() as Rc<dyn Editor>),
            OpenType::Diff { .. } => self
                .diff_editor()
                .map(|diff| diff.modified_editor() as Rc<dyn Editor>),
            OpenType::Component(_) => None,
        }
    }

    fn close(&self, uri: &Uri) {
        let showing = self
            .resource
            .borrow()
            .as_ref()
            .is_some_and(|resource| &resource.uri == uri);
        if !showing {
            return;
        }
        let old_resource = self.resource.take();
        let old_open_type = self.open_type.take();
        tracing::debug!(group = %self.name, uri = %uri, "resource closed");
        self.publish_change(old_resource, None, old_open_type, None);
    }
}

pub struct MemoryWorkbench {
    groups: RefCell<Vec<Rc<MemoryEditorGroup>>>,
    active_index: Rc<Cell<usize>>,
    events: Emitter<WorkbenchEvent>,
}

impl MemoryWorkbench {
    /// Creates one group per name, in order. The first group is active.
    pub fn new(
        collection: &EditorCollection,
        group_names: &[String],
        view_options: ViewOptions,
    ) -> Rc<Self> {
        let events = Emitter::new();
        let active_index = Rc::new(Cell::new(0));
        let groups = group_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                MemoryEditorGroup::new(
                    name.clone(),
                    index,
                    Rc::clone(&active_index),
                    events.clone(),
                    collection.clone(),
                    view_options,
                )
            })
            .collect();
        Rc::new(Self {
            groups: RefCell::new(groups),
            active_index,
            events,
        })
    }

    pub fn events(&self) -> &Emitter<WorkbenchEvent> {
        &self.events
    }

    pub fn groups(&self) -> Vec<Rc<MemoryEditorGroup>> {
        self.groups.borrow().clone()
    }

    pub fn group(&self, name: &str) -> Option<Rc<MemoryEditorGroup>> {
        self.groups
            .borrow()
            .iter()
            .find(|group| group.name == name)
            .cloned()
    }

    pub fn group_at(&self, index: usize) -> Option<Rc<MemoryEditorGroup>> {
        self.groups.borrow().get(index).cloned()
    }

    pub fn active_group(&self) -> Option<Rc<MemoryEditorGroup>> {
        self.group_at(self.active_index.get())
    }

    /// Makes the group at `index` active. Out-of-range indices are ignored.
    pub fn set_active_group(&self, index: usize) {
        let Some(group) = self.group_at(index) else {
            return;
        };
        if self.active_index.replace(index) == index {
            return;
        }
        self.events
            .fire(&WorkbenchEvent::ActiveResourceChanged(group.current_resource()));
    }

    /// Moves a group to another position; every group whose index changed
    /// reports it.
    pub fn move_group(&self, from: usize, to: usize) {
        let groups = {
            let mut groups = self.groups.borrow_mut();
            if from >= groups.len() || to >= groups.len() || from == to {
                return;
            }
            let active = Rc::clone(&groups[self.active_index.get().min(groups.len() - 1)]);
            let group = groups.remove(from);
            groups.insert(to, group);
            if let Some(pos) = groups.iter().position(|g| Rc::ptr_eq(g, &active)) {
                self.active_index.set(pos);
            }
            groups.clone()
        };
        for (index, group) in groups.iter().enumerate() {
            group.set_index(index);
        }
    }

    /// `None` when a later diff open in the same group overtook this one.
    pub async fn open_diff(
        &self,
        original: &Uri,
        modified: &Uri,
        group_index: Option<usize>,
    ) -> Result<Option<Rc<MemoryEditorGroup>>> {
        let group = self
            .target_group(group_index)
            .ok_or_else(|| MirrorError::OpenFailed {
                uri: modified.to_string(),
            })?;
        let outcome = group.open_diff(original, modified).await?;
        Ok(outcome.is_bound().then_some(group))
    }

    /// Disposes every editor the groups own.
    pub fn dispose(&self) {
        for group in self.groups.borrow().iter() {
            group.dispose();
        }
    }

    /// The group at `group_index`, else the active one.
    fn target_group(&self, group_index: Option<usize>) -> Option<Rc<MemoryEditorGroup>> {
        let groups = self.groups.borrow();
        let index = group_index.unwrap_or_else(|| self.active_index.get());
        groups
            .get(index)
            .or_else(|| groups.get(self.active_index.get()))
            .cloned()
    }

    async fn open_in(&self, uri: Uri, options: ResourceOpenOptions) -> Option<OpenResult> {
        let Some(group) = self.target_group(options.group_index) else {
            tracing::warn!(uri = %uri, "open: workbench has no editor groups");
            return None;
        };
        let outcome = match options.force_open_type.unwrap_or(OpenType::Code) {
            OpenType::Code => group.open_code(&uri, options.range).await,
            OpenType::Diff { original } => group.open_diff(&original, &uri).await,
            OpenType::Component(component) => {
                group.open_component(&uri, &component);
                Ok(OpenOutcome::Bound)
            }
        };
        match outcome {
            Ok(OpenOutcome::Bound) => {}
            Ok(OpenOutcome::Superseded) => {
                tracing::debug!(uri = %uri, group = %group.name, "open superseded by a later open");
                return None;
            }
            Err(e) => {
                tracing::warn!(uri = %uri, group = %group.name, error = %e, "open failed");
                return None;
            }
        }
        if options.focus {
            self.set_active_group(group.index());
        }
        let resource = group.current_resource()?;
        Some(OpenResult {
            group: group as Rc<dyn EditorGroup>,
            resource,
        })
    }
}

impl WorkbenchEditorService for MemoryWorkbench {
    fn editor_groups(&self) -> Vec<Rc<dyn EditorGroup>> {
        self.groups
            .borrow()
            .iter()
            .map(|group| group.clone() as Rc<dyn EditorGroup>)
            .collect()
    }

    fn editor_group(&self, name: &str) -> Option<Rc<dyn EditorGroup>> {
        self.group(name).map(|group| group as Rc<dyn EditorGroup>)
    }

    fn current_editor_group(&self) -> Option<Rc<dyn EditorGroup>> {
        self.active_group().map(|group| group as Rc<dyn EditorGroup>)
    }

    fn current_resource(&self) -> Option<Resource> {
        self.active_group()?.current_resource()
    }

    fn open<'a>(
        &'a self,
        uri: Uri,
        options: ResourceOpenOptions,
    ) -> LocalBoxFuture<'a, Option<OpenResult>> {
        Box::pin(self.open_in(uri, options))
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/memory/workbench.rs"]
mod tests;
