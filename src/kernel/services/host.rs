use std::path::Path;
use std::rc::Rc;

use super::adapters::{MemoryDocumentStore, MemoryWorkbench};
use super::ports::{ExtHostEditors, Settings};
use crate::kernel::editor::{DecorationCollection, EditorCollection};
use crate::kernel::error::{MirrorError, Result};
use crate::kernel::mirror::MainThreadEditors;
use crate::models::Uri;

/// Owns the wired-up editor services: documents, the editor collection,
/// the workbench groups and the mirror towards the extension host.
pub struct EditorServiceHost {
    settings: Settings,
    documents: Rc<MemoryDocumentStore>,
    collection: EditorCollection,
    workbench: Rc<MemoryWorkbench>,
    mirror: Rc<MainThreadEditors>,
}

impl EditorServiceHost {
    /// Builds an in-memory backend. `file://` resources are read from disk.
    pub fn new(settings: Settings, proxy: Rc<dyn ExtHostEditors>) -> Self {
        let documents = Rc::new(MemoryDocumentStore::with_disk(
            settings.editor.model_options(),
        ));
        Self::with_documents(settings, documents, proxy)
    }

    pub fn with_documents(
        settings: Settings,
        documents: Rc<MemoryDocumentStore>,
        proxy: Rc<dyn ExtHostEditors>,
    ) -> Self {
        let collection = EditorCollection::new(documents.clone(), DecorationCollection::new());
        let workbench = MemoryWorkbench::new(
            &collection,
            &settings.valid_groups(),
            settings.editor.view_options(),
        );
        let mirror = MainThreadEditors::new(
            workbench.clone(),
            collection.clone(),
            proxy,
            settings.snippet.undo_stops(),
        );
        Self {
            settings,
            documents,
            collection,
            workbench,
            mirror,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn documents(&self) -> &Rc<MemoryDocumentStore> {
        &self.documents
    }

    pub fn collection(&self) -> &EditorCollection {
        &self.collection
    }

    pub fn workbench(&self) -> &Rc<MemoryWorkbench> {
        &self.workbench
    }

    pub fn mirror(&self) -> &Rc<MainThreadEditors> {
        &self.mirror
    }

    /// Starts delivering editor state to the extension host.
    pub fn start(&self) {
        self.mirror.start(self.workbench.events());
    }

    /// Opens `path` in the first group.
    pub async fn open_path(&self, path: &Path) -> Result<()> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|dir| dir.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };
        let uri = Uri::from_file_path(&absolute).map_err(|()| MirrorError::OpenFailed {
            uri: absolute.display().to_string(),
        })?;
        let group = self
            .workbench
            .group_at(0)
            .ok_or_else(|| MirrorError::OpenFailed {
                uri: uri.to_string(),
            })?;
        group.open_code(&uri, None).await?;
        Ok(())
    }

    pub fn shutdown(&self) {
        self.mirror.stop();
        self.workbench.dispose();
    }
}
