//! In-memory document store.
//!
//! Documents live in a rope-backed `TextBuffer`. `file://` resources missing
//! from the store are read from disk on first resolve, and written back on
//! save.

use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::{Emitter, Subscription};
use crate::kernel::services::ports::{
    DocModelContentChanged, DocumentModel, DocumentModelProvider, LocalBoxFuture, TextModel,
};
use crate::models::{
    EndOfLine, Range, SingleEditOperation, TextBuffer, TextModelOptions, Uri,
};

pub struct MemoryTextModel {
    uri: Uri,
    buffer: RefCell<TextBuffer>,
    version: Cell<u64>,
    saved_version: Cell<u64>,
    options: Cell<TextModelOptions>,
    changed: Emitter<DocModelContentChanged>,
}

impl MemoryTextModel {
    fn new(
        uri: Uri,
        text: &str,
        options: TextModelOptions,
        changed: Emitter<DocModelContentChanged>,
    ) -> Self {
        Self {
            uri,
            buffer: RefCell::new(TextBuffer::from_text(text)),
            version: Cell::new(1),
            saved_version: Cell::new(1),
            options: Cell::new(options),
            changed,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.borrow().text()
    }

    pub fn dirty(&self) -> bool {
        self.version.get() != self.saved_version.get()
    }

    pub fn set_options(&self, options: TextModelOptions) {
        self.options.set(options);
    }

    /// Replaces the whole content as one edit.
    pub fn set_text(&self, text: &str) {
        *self.buffer.borrow_mut() = TextBuffer::from_text(text);
        self.bump();
    }

    fn mark_saved(&self) {
        self.saved_version.set(self.version.get());
        self.notify();
    }

    fn bump(&self) {
        self.version.set(self.version.get() + 1);
        self.notify();
    }

    fn notify(&self) {
        self.changed.fire(&DocModelContentChanged {
            uri: self.uri.clone(),
            dirty: self.dirty(),
            version: self.version.get(),
        });
    }
}

impl TextModel for MemoryTextModel {
    fn uri(&self) -> Uri {
        self.uri.clone()
    }

    fn version_id(&self) -> u64 {
        self.version.get()
    }

    fn options(&self) -> TextModelOptions {
        self.options.get()
    }

    fn line_count(&self) -> u32 {
        self.buffer.borrow().len_lines().max(1) as u32
    }

    fn line_max_column(&self, line_number: u32) -> u32 {
        self.buffer.borrow().line_max_column(line_number)
    }

    fn value_in_range(&self, range: Range) -> String {
        self.buffer.borrow().text_in_range(range)
    }

    fn push_eol(&self, eol: EndOfLine) {
        let changed = {
            let mut buffer = self.buffer.borrow_mut();
            let before = buffer.text();
            buffer.set_eol(eol);
            buffer.text() != before
        };
        if changed {
            self.bump();
        }
    }

    fn can_apply_edits(&self, edits: &[SingleEditOperation]) -> bool {
        self.buffer.borrow().can_apply_edits(edits)
    }

    fn push_edit_operations(&self, edits: &[SingleEditOperation]) -> bool {
        if edits.is_empty() {
            return true;
        }
        if !self.buffer.borrow_mut().apply_edits(edits) {
            tracing::debug!(uri = %self.uri, edits = edits.len(), "rejected overlapping edits");
            return false;
        }
        self.bump();
        true
    }
}

/// Document handle returned by the store; shares its text model.
pub struct MemoryDocument {
    model: Rc<MemoryTextModel>,
}

impl DocumentModel for MemoryDocument {
    fn uri(&self) -> Uri {
        self.model.uri.clone()
    }

    fn version(&self) -> u64 {
        self.model.version.get()
    }

    fn dirty(&self) -> bool {
        self.model.dirty()
    }

    fn get_text(&self, range: Option<Range>) -> String {
        match range {
            Some(range) => self.model.value_in_range(range),
            None => self.model.text(),
        }
    }

    fn to_editor(&self) -> Rc<dyn TextModel> {
        self.model.clone()
    }
}

pub struct MemoryDocumentStore {
    documents: RefCell<FxHashMap<String, Rc<MemoryTextModel>>>,
    changed: Emitter<DocModelContentChanged>,
    options: TextModelOptions,
    read_from_disk: bool,
}

impl MemoryDocumentStore {
    /// A store that never touches the file system.
    pub fn new(options: TextModelOptions) -> Self {
        Self {
            documents: RefCell::new(FxHashMap::default()),
            changed: Emitter::new(),
            options,
            read_from_disk: false,
        }
    }

    /// A store backed by the local file system for `file://` resources.
    pub fn with_disk(options: TextModelOptions) -> Self {
        Self {
            read_from_disk: true,
            ..Self::new(options)
        }
    }

    /// Adds a document, or replaces the content of an existing one.
    pub fn insert(&self, uri: &Uri, text: &str) -> Rc<MemoryTextModel> {
        if let Some(model) = self.get(uri) {
            model.set_text(text);
            return model;
        }
        let model = Rc::new(MemoryTextModel::new(
            uri.clone(),
            text,
            self.options,
            self.changed.clone(),
        ));
        self.documents
            .borrow_mut()
            .insert(uri.as_str().to_string(), Rc::clone(&model));
        model
    }

    pub fn get(&self, uri: &Uri) -> Option<Rc<MemoryTextModel>> {
        self.documents.borrow().get(uri.as_str()).cloned()
    }

    pub fn remove(&self, uri: &Uri) -> bool {
        self.documents.borrow_mut().remove(uri.as_str()).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn load_from_disk(&self, uri: &Uri) -> Option<Rc<MemoryTextModel>> {
        if !self.read_from_disk || uri.scheme() != "file" {
            return None;
        }
        let path = uri.to_file_path().ok()?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                // Another resolve may have loaded it while we were reading.
                if let Some(existing) = self.get(uri) {
                    return Some(existing);
                }
                tracing::debug!(path = %path.display(), "document loaded from disk");
                Some(self.insert(uri, &text))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read document");
                None
            }
        }
    }

    async fn persist(&self, model: &MemoryTextModel) -> bool {
        if !self.read_from_disk || model.uri.scheme() != "file" {
            return true;
        }
        let Ok(path) = model.uri.to_file_path() else {
            return false;
        };
        let mut bytes = Vec::with_capacity(model.buffer.borrow().len_chars());
        if let Err(e) = model.buffer.borrow().write_to(&mut bytes) {
            tracing::warn!(path = %path.display(), error = %e, "failed to encode document");
            return false;
        }
        match tokio::fs::write(&path, bytes).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to save document");
                false
            }
        }
    }
}

impl DocumentModelProvider for MemoryDocumentStore {
    fn resolve_model<'a>(
        &'a self,
        uri: &'a Uri,
    ) -> LocalBoxFuture<'a, Option<Rc<dyn DocumentModel>>> {
        Box::pin(async move {
            let model = match self.get(uri) {
                Some(model) => model,
                None => self.load_from_disk(uri).await?,
            };
            Some(Rc::new(MemoryDocument { model }) as Rc<dyn DocumentModel>)
        })
    }

    fn save_model<'a>(&'a self, uri: &'a Uri) -> LocalBoxFuture<'a, bool> {
        Box::pin(async move {
            let Some(model) = self.get(uri) else {
                return false;
            };
            if !model.dirty() {
                return true;
            }
            let version = model.version.get();
            if !self.persist(&model).await {
                return false;
            }
            if model.version.get() == version {
                model.mark_saved();
            }
            true
        })
    }

    fn on_did_change_content(
        &self,
        listener: Box<dyn Fn(&DocModelContentChanged)>,
    ) -> Subscription {
        self.changed.subscribe(listener)
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/memory/document.rs"]
mod tests;
