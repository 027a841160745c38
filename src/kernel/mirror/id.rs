//! Cross-process editor ids: `<group name>.<resource uri>`.
//!
//! Ids are derived, never allocated, so the remote side can address an
//! editor without a handshake. Group names must not contain the separator.

use crate::kernel::services::ports::{EditorGroup, Resource};
use crate::models::Uri;

pub const ID_SEPARATOR: char = '.';

pub fn text_editor_id(group: &str, uri: &Uri) -> String {
    format!("{group}{ID_SEPARATOR}{uri}")
}

pub fn group_resource_id(group: &dyn EditorGroup, resource: &Resource) -> String {
    text_editor_id(group.name(), &resource.uri)
}

/// Everything before the first separator; `None` when there is none.
pub fn group_name_of(id: &str) -> Option<&str> {
    id.split_once(ID_SEPARATOR).map(|(group, _)| group)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/mirror/id.rs"]
mod tests;
