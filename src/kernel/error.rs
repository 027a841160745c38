use crate::models::Uri;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    Original,
    Modified,
}

impl std::fmt::Display for DiffSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffSide::Original => f.write_str("original"),
            DiffSide::Modified => f.write_str("modified"),
        }
    }
}

fn side_label(side: &Option<DiffSide>) -> &'static str {
    match side {
        Some(DiffSide::Original) => "original",
        Some(DiffSide::Modified) => "modified",
        None => "the",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MirrorError {
    #[error("cannot find {} document: {uri}", side_label(.side))]
    ResourceNotFound { uri: Uri, side: Option<DiffSide> },

    #[error("text editor {id}: document version {actual} does not match expected {expected}")]
    StaleVersion { id: String, expected: u64, actual: u64 },

    #[error("editor open uri {uri} failed")]
    OpenFailed { uri: String },

    #[error("text editor {id} not found")]
    UnresolvedTarget { id: String },

    #[error("text editor {id}: edits were rejected")]
    EditsRejected { id: String },

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl MirrorError {
    /// Stable name used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            MirrorError::ResourceNotFound { .. } => "resourceNotFound",
            MirrorError::StaleVersion { .. } => "staleVersion",
            MirrorError::OpenFailed { .. } => "openFailed",
            MirrorError::UnresolvedTarget { .. } => "unresolvedTarget",
            MirrorError::EditsRejected { .. } => "editsRejected",
            MirrorError::Protocol(_) => "protocol",
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
