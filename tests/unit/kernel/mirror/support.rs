//! Shared wiring for the mirror tests: an in-memory workbench and a proxy
//! that records everything sent to the extension host.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ChangeSet, MainThreadEditors, PropertiesChange};
use crate::kernel::editor::gated::GatedProvider;
use crate::kernel::editor::{DecorationCollection, EditorCollection};
use crate::kernel::services::adapters::{MemoryDocumentStore, MemoryWorkbench};
use crate::kernel::services::ports::ExtHostEditors;
use crate::models::{TextModelOptions, UndoStopOptions, Uri, ViewOptions};

#[derive(Default)]
pub struct RecordingProxy {
    pub changes: RefCell<Vec<ChangeSet>>,
    pub properties: RefCell<Vec<PropertiesChange>>,
}

impl RecordingProxy {
    pub fn take_changes(&self) -> Vec<ChangeSet> {
        std::mem::take(&mut *self.changes.borrow_mut())
    }

    pub fn take_properties(&self) -> Vec<PropertiesChange> {
        std::mem::take(&mut *self.properties.borrow_mut())
    }
}

impl ExtHostEditors for RecordingProxy {
    fn accept_change(&self, change: ChangeSet) {
        self.changes.borrow_mut().push(change);
    }

    fn accept_properties_change(&self, change: PropertiesChange) {
        self.properties.borrow_mut().push(change);
    }
}

pub struct Fixture {
    pub store: Rc<MemoryDocumentStore>,
    pub gates: Rc<GatedProvider>,
    pub collection: EditorCollection,
    pub workbench: Rc<MemoryWorkbench>,
    pub proxy: Rc<RecordingProxy>,
    pub mirror: Rc<MainThreadEditors>,
}

impl Fixture {
    pub fn new(groups: &[&str]) -> Self {
        Self::with_snippet_defaults(groups, UndoStopOptions::default())
    }

    pub fn with_snippet_defaults(groups: &[&str], snippet_defaults: UndoStopOptions) -> Self {
        let store = Rc::new(MemoryDocumentStore::new(TextModelOptions::default()));
        for (path, text) in [
            ("file:///a.ts", "const a = 1;\nconst b = 2;\n"),
            ("file:///b.ts", "export {};\n"),
            ("file:///c.ts", "// c\n"),
        ] {
            store.insert(&uri(path), text);
        }
        let gates = Rc::new(GatedProvider::new(store.clone()));
        let collection = EditorCollection::new(gates.clone(), DecorationCollection::new());
        let names: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
        let workbench = MemoryWorkbench::new(&collection, &names, ViewOptions::default());
        let proxy = Rc::new(RecordingProxy::default());
        let mirror = MainThreadEditors::new(
            workbench.clone(),
            collection.clone(),
            proxy.clone(),
            snippet_defaults,
        );
        Self {
            store,
            gates,
            collection,
            workbench,
            proxy,
            mirror,
        }
    }

    pub fn start(&self) {
        self.mirror.start(self.workbench.events());
    }

    pub async fn open(&self, group: &str, path: &str) {
        let group = self.workbench.group(group).unwrap();
        group.open_code(&uri(path), None).await.unwrap();
    }

    pub fn text(&self, path: &str) -> String {
        self.store.get(&uri(path)).unwrap().text()
    }
}

pub fn uri(s: &str) -> Uri {
    Uri::parse(s).unwrap()
}
