//! Reference backend: documents, widgets and editor groups kept in memory.

mod document;
mod widget;
mod workbench;

pub use document::{MemoryDocument, MemoryDocumentStore, MemoryTextModel};
pub use widget::{expand_snippet, MemoryCodeWidget, MemoryDiffWidget};
pub use workbench::{MemoryEditorGroup, MemoryWorkbench};
