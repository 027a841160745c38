//! Document model contracts.
//!
//! A `DocumentModel` is the shared, versioned document behind a resource; a
//! `TextModel` is the handle a widget binds to. Several widgets may bind the
//! same text model at once.

use std::rc::Rc;

use super::runtime::LocalBoxFuture;
use crate::core::Subscription;
use crate::models::{EndOfLine, Range, SingleEditOperation, TextModelOptions, Uri};

pub trait TextModel {
    fn uri(&self) -> Uri;

    /// Bumped on every content change.
    fn version_id(&self) -> u64;

    fn options(&self) -> TextModelOptions;

    fn line_count(&self) -> u32;

    /// Last valid column on `line_number`.
    fn line_max_column(&self, line_number: u32) -> u32;

    fn value_in_range(&self, range: Range) -> String;

    fn push_eol(&self, eol: EndOfLine);

    /// Whether `edits` would be accepted by `push_edit_operations`.
    fn can_apply_edits(&self, edits: &[SingleEditOperation]) -> bool;

    /// Applies `edits` as one transaction. Overlapping ranges reject the
    /// whole batch: nothing changes and `false` is returned.
    fn push_edit_operations(&self, edits: &[SingleEditOperation]) -> bool;
}

pub trait DocumentModel {
    fn uri(&self) -> Uri;

    fn version(&self) -> u64;

    fn dirty(&self) -> bool;

    /// Whole text when `range` is `None`.
    fn get_text(&self, range: Option<Range>) -> String;

    fn to_editor(&self) -> Rc<dyn TextModel>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocModelContentChanged {
    pub uri: Uri,
    pub dirty: bool,
    pub version: u64,
}

pub trait DocumentModelProvider {
    /// `None` when the resource cannot be resolved.
    fn resolve_model<'a>(&'a self, uri: &'a Uri) -> LocalBoxFuture<'a, Option<Rc<dyn DocumentModel>>>;

    fn save_model<'a>(&'a self, uri: &'a Uri) -> LocalBoxFuture<'a, bool>;

    fn on_did_change_content(
        &self,
        listener: Box<dyn Fn(&DocModelContentChanged)>,
    ) -> Subscription;
}
