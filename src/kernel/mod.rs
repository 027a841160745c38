//! Headless editor core: editor instances, their registry, and the mirror
//! towards the extension host.

pub mod editor;
pub mod error;
pub mod mirror;
pub mod services;

pub use editor::{
    DiffEditorInstance, DiffSideEditor, Editor, EditorCollection, EditorInstance, EditorsChanged,
};
pub use error::{DiffSide, MirrorError, Result};
pub use mirror::{ChangeSet, EditorDescriptor, MainThreadEditors, PropertiesChange};
