//! Wire records sent to the extension host.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Range, ResolvedEditorOptions, Selection};

/// Everything the remote side needs to materialize an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDescriptor {
    pub id: String,
    pub uri: String,
    pub selections: Vec<Selection>,
    pub options: ResolvedEditorOptions,
    pub view_column: usize,
    pub visible_ranges: Vec<Range>,
}

/// Lifecycle delta. Only the very first change set after startup carries a
/// full inventory.
///
/// `actived` has three states: field missing (unchanged), `null` (no active
/// editor) or an editor id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<EditorDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub actived: Option<Option<String>>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ChangeSet {
    pub fn activated(id: Option<String>) -> Self {
        Self {
            actived: Some(id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty() && self.actived.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionsChange {
    pub selections: Vec<Selection>,
    pub source: String,
}

/// Property delta for one editor. Only the fields that changed are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesChange {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selections: Option<SelectionsChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_ranges: Option<Vec<Range>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ResolvedEditorOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_column: Option<usize>,
}

impl PropertiesChange {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selections: None,
            visible_ranges: None,
            options: None,
            view_column: None,
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/mirror/change.rs"]
mod tests;
