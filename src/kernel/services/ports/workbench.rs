//! Host workbench contracts: editor groups and what they show.

use std::rc::Rc;

use super::runtime::LocalBoxFuture;
use crate::kernel::editor::Editor;
use crate::models::{Range, Selection, Uri};

/// The kind of content bound into a group's active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenType {
    Code,
    Diff { original: Uri },
    Component(String),
}

impl OpenType {
    /// Code and diff views are addressable editors; custom views are not.
    pub fn is_editor_like(&self) -> bool {
        matches!(self, OpenType::Code | OpenType::Diff { .. })
    }
}

pub fn is_editor_like(open_type: Option<&OpenType>) -> bool {
    open_type.is_some_and(OpenType::is_editor_like)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub uri: Uri,
    pub name: String,
}

impl Resource {
    pub fn new(uri: Uri) -> Self {
        let name = uri
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| uri.to_string());
        Self { uri, name }
    }
}

/// URI equality where two absent resources count as equal.
pub fn resource_equals(a: Option<&Resource>, b: Option<&Resource>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.uri == b.uri,
        _ => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOpenOptions {
    pub force_open_type: Option<OpenType>,
    pub range: Option<Range>,
    pub group_index: Option<usize>,
    pub preview: bool,
    pub focus: bool,
}

pub trait EditorGroup {
    /// Unique among groups; never contains the editor id separator.
    fn name(&self) -> &str;

    fn index(&self) -> usize;

    fn current_resource(&self) -> Option<Resource>;

    fn current_open_type(&self) -> Option<OpenType>;

    /// Live editor for the current resource. For diff views this is the
    /// modified side.
    fn current_editor(&self) -> Option<Rc<dyn Editor>>;

    fn close(&self, uri: &Uri);
}

pub struct OpenResult {
    pub group: Rc<dyn EditorGroup>,
    pub resource: Resource,
}

pub trait WorkbenchEditorService {
    fn editor_groups(&self) -> Vec<Rc<dyn EditorGroup>>;

    fn editor_group(&self, name: &str) -> Option<Rc<dyn EditorGroup>>;

    fn current_editor_group(&self) -> Option<Rc<dyn EditorGroup>>;

    fn current_resource(&self) -> Option<Resource>;

    fn open<'a>(
        &'a self,
        uri: Uri,
        options: ResourceOpenOptions,
    ) -> LocalBoxFuture<'a, Option<OpenResult>>;
}

pub struct GroupChange {
    pub group: Rc<dyn EditorGroup>,
    pub old_resource: Option<Resource>,
    pub new_resource: Option<Resource>,
    pub old_open_type: Option<OpenType>,
    pub new_open_type: Option<OpenType>,
}

/// Framework-level lifecycle events the editor bridge reacts to.
pub enum WorkbenchEvent {
    GroupChanged(GroupChange),
    ActiveResourceChanged(Option<Resource>),
    SelectionChanged {
        group: Rc<dyn EditorGroup>,
        resource: Resource,
        selections: Vec<Selection>,
        source: String,
    },
    VisibleRangesChanged {
        group: Rc<dyn EditorGroup>,
        resource: Resource,
        visible_ranges: Vec<Range>,
    },
    ConfigurationChanged {
        group: Rc<dyn EditorGroup>,
        resource: Resource,
    },
    GroupIndexChanged {
        group: Rc<dyn EditorGroup>,
    },
}
