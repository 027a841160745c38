//! Commands issued by the extension host.
//!
//! Commands addressing an editor that no longer exists do nothing, except
//! `set_selections` and `apply_edits`, which report it.

use super::id::group_resource_id;
use super::MainThreadEditors;
use crate::kernel::error::{MirrorError, Result};
use crate::kernel::services::ports::{OpenType, ResourceOpenOptions};
use crate::models::{
    ApplyEditsOptions, DecorationApplyOptions, DecorationRenderOptions, Range, RevealKind,
    Selection, SingleEditOperation, UndoStopOptions, Uri,
};

const EDIT_SOURCE: &str = "MainThreadTextEditor";

impl MainThreadEditors {
    /// Closes the resource shown by the editor's group.
    pub fn close_editor(&self, id: &str) {
        if self.get_editor(id).is_none() {
            tracing::debug!(id, "close_editor: unresolved editor");
            return;
        }
        let Some(group) = self.get_group(id) else {
            return;
        };
        if let Some(resource) = group.current_resource() {
            group.close(&resource.uri);
        }
    }

    pub fn reveal_range(&self, id: &str, range: Range, kind: Option<RevealKind>) {
        let Some(editor) = self.get_editor(id) else {
            tracing::debug!(id, "reveal_range: unresolved editor");
            return;
        };
        editor
            .widget()
            .reveal_range(range, kind.unwrap_or_default());
    }

    pub fn create_text_editor_decoration_type(&self, key: &str, options: DecorationRenderOptions) {
        self.collection
            .decorations()
            .create_text_editor_decoration_type(key, options);
    }

    pub fn delete_text_editor_decoration_type(&self, key: &str) {
        if !self
            .collection
            .decorations()
            .delete_text_editor_decoration_type(key)
        {
            tracing::debug!(key, "delete_text_editor_decoration_type: unknown key");
        }
    }

    pub fn apply_decoration(&self, id: &str, key: &str, options: &[DecorationApplyOptions]) {
        let Some(editor) = self.get_editor(id) else {
            tracing::debug!(id, "apply_decoration: unresolved editor");
            return;
        };
        editor.apply_decoration(key, options);
    }

    /// `options` falls back to the configured snippet undo stops.
    pub fn insert_snippet(
        &self,
        id: &str,
        template: &str,
        ranges: &[Range],
        options: Option<UndoStopOptions>,
    ) {
        let Some(editor) = self.get_editor(id) else {
            tracing::debug!(id, "insert_snippet: unresolved editor");
            return;
        };
        editor.insert_snippet(template, ranges, options.unwrap_or(self.snippet_defaults));
    }

    /// Applies `edits` only if the document is still at `version_id` and
    /// the batch has no overlapping ranges. Nothing is touched on failure.
    pub fn apply_edits(
        &self,
        id: &str,
        version_id: u64,
        edits: &[SingleEditOperation],
        options: ApplyEditsOptions,
    ) -> Result<()> {
        let unresolved = || MirrorError::UnresolvedTarget { id: id.to_string() };
        let editor = self.get_editor(id).ok_or_else(unresolved)?;
        let document = editor.current_document_model().ok_or_else(unresolved)?;
        let model = document.to_editor();
        let actual = model.version_id();
        if actual != version_id {
            tracing::warn!(id, expected = version_id, actual, "apply_edits: stale document version");
            return Err(MirrorError::StaleVersion {
                id: id.to_string(),
                expected: version_id,
                actual,
            });
        }

        let rejected = || MirrorError::EditsRejected { id: id.to_string() };
        let widget = editor.widget();
        if widget.model().is_none() {
            tracing::warn!(id, "apply_edits: widget has no model bound");
            return Err(rejected());
        }
        if !model.can_apply_edits(edits) {
            tracing::warn!(id, edits = edits.len(), "apply_edits: overlapping edit ranges");
            return Err(rejected());
        }

        if let Some(eol) = options.set_end_of_line {
            model.push_eol(eol);
        }
        if options.undo_stop_before {
            widget.push_undo_stop();
        }
        if !widget.execute_edits(EDIT_SOURCE, edits) {
            return Err(rejected());
        }
        if options.undo_stop_after {
            widget.push_undo_stop();
        }
        Ok(())
    }

    /// Opens `uri` as a code editor and returns the new editor's id.
    pub async fn open_resource(&self, uri: &Uri, options: ResourceOpenOptions) -> Result<String> {
        let options = ResourceOpenOptions {
            force_open_type: Some(OpenType::Code),
            ..options
        };
        let Some(result) = self.workbench.open(uri.clone(), options).await else {
            tracing::warn!(uri = %uri, "open_resource: nothing was opened");
            return Err(MirrorError::OpenFailed {
                uri: uri.to_string(),
            });
        };
        Ok(group_resource_id(result.group.as_ref(), &result.resource))
    }

    pub fn set_selections(&self, id: &str, selections: &[Selection]) -> Result<()> {
        let Some(editor) = self.get_editor(id) else {
            return Err(MirrorError::UnresolvedTarget { id: id.to_string() });
        };
        editor.set_selections(selections);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/mirror/commands.rs"]
mod tests;
