//! Service ports: traits + data contracts.

pub mod decoration;
pub mod document;
pub mod exthost;
pub mod runtime;
pub mod settings;
pub mod widget;
pub mod workbench;

pub use decoration::DecorationApplier;
pub use document::{DocModelContentChanged, DocumentModel, DocumentModelProvider, TextModel};
pub use exthost::ExtHostEditors;
pub use runtime::LocalBoxFuture;
pub use settings::{EditorSettings, LogSettings, Settings, SnippetSettings};
pub use widget::{CodeWidget, CursorSelectionEvent, DiffWidget, WidgetId};
pub use workbench::{
    is_editor_like, resource_equals, EditorGroup, GroupChange, OpenResult, OpenType, Resource,
    ResourceOpenOptions, WorkbenchEditorService, WorkbenchEvent,
};
