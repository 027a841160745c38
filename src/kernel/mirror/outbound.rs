use super::change::{ChangeSet, PropertiesChange, SelectionsChange};
use super::id::group_resource_id;
use super::{resolved_options, MainThreadEditors};
use crate::kernel::services::ports::{
    is_editor_like, resource_equals, EditorGroup, GroupChange, Resource, WorkbenchEvent,
};
use crate::models::{Range, Selection};

impl MainThreadEditors {
    pub fn handle_event(&self, event: &WorkbenchEvent) {
        match event {
            WorkbenchEvent::GroupChanged(change) => self.on_group_changed(change),
            WorkbenchEvent::ActiveResourceChanged(resource) => {
                self.on_active_resource_changed(resource.as_ref())
            }
            WorkbenchEvent::SelectionChanged {
                group,
                resource,
                selections,
                source,
            } => self.on_selection_changed(group.as_ref(), resource, selections, source),
            WorkbenchEvent::VisibleRangesChanged {
                group,
                resource,
                visible_ranges,
            } => self.on_visible_ranges_changed(group.as_ref(), resource, visible_ranges),
            WorkbenchEvent::ConfigurationChanged { group, resource } => {
                self.on_configuration_changed(group.as_ref(), resource)
            }
            WorkbenchEvent::GroupIndexChanged { group } => {
                self.on_group_index_changed(group.as_ref())
            }
        }
    }

    fn on_group_changed(&self, e: &GroupChange) {
        if resource_equals(e.old_resource.as_ref(), e.new_resource.as_ref()) {
            return;
        }
        let mut change = ChangeSet::default();
        if is_editor_like(e.new_open_type.as_ref()) {
            if let Some(resource) = e.new_resource.as_ref() {
                change
                    .created
                    .extend(self.describe(e.group.as_ref(), resource));
            }
        }
        if is_editor_like(e.old_open_type.as_ref()) {
            if let Some(resource) = e.old_resource.as_ref() {
                change
                    .removed
                    .push(group_resource_id(e.group.as_ref(), resource));
            }
        }
        if change.is_empty() {
            return;
        }
        tracing::debug!(
            group = e.group.name(),
            created = change.created.len(),
            removed = change.removed.len(),
            "group resource changed"
        );
        self.proxy.accept_change(change);
    }

    fn on_active_resource_changed(&self, resource: Option<&Resource>) {
        let actived = match resource {
            Some(_) => self.active_editor_id(),
            None => None,
        };
        self.proxy.accept_change(ChangeSet::activated(actived));
    }

    fn on_selection_changed(
        &self,
        group: &dyn EditorGroup,
        resource: &Resource,
        selections: &[Selection],
        source: &str,
    ) {
        let mut change = PropertiesChange::new(group_resource_id(group, resource));
        change.selections = Some(SelectionsChange {
            selections: selections.to_vec(),
            source: source.to_string(),
        });
        self.proxy.accept_properties_change(change);
    }

    fn on_visible_ranges_changed(
        &self,
        group: &dyn EditorGroup,
        resource: &Resource,
        visible_ranges: &[Range],
    ) {
        let mut change = PropertiesChange::new(group_resource_id(group, resource));
        change.visible_ranges = Some(visible_ranges.to_vec());
        self.proxy.accept_properties_change(change);
    }

    fn on_configuration_changed(&self, group: &dyn EditorGroup, resource: &Resource) {
        let Some(editor) = group.current_editor() else {
            return;
        };
        let mut change = PropertiesChange::new(group_resource_id(group, resource));
        change.options = Some(resolved_options(editor.as_ref()));
        self.proxy.accept_properties_change(change);
    }

    fn on_group_index_changed(&self, group: &dyn EditorGroup) {
        if !is_editor_like(group.current_open_type().as_ref()) {
            return;
        }
        let Some(resource) = group.current_resource() else {
            return;
        };
        let mut change = PropertiesChange::new(group_resource_id(group, &resource));
        change.view_column = Some(group.index());
        self.proxy.accept_properties_change(change);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/mirror/outbound.rs"]
mod tests;
