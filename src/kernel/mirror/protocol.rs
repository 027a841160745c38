//! JSON message shapes exchanged with the extension host, and request
//! dispatch onto `MainThreadEditors`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::change::{ChangeSet, PropertiesChange};
use super::MainThreadEditors;
use crate::kernel::error::{MirrorError, Result};
use crate::kernel::services::ports::ResourceOpenOptions;
use crate::models::{
    ApplyEditsOptions, DecorationApplyOptions, DecorationRenderOptions, Range, RevealKind,
    Selection, SingleEditOperation, UndoStopOptions, Uri,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub kind: String,
    pub message: String,
}

impl From<&MirrorError> for ResponseError {
    fn from(err: &MirrorError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// `None` when the request could not be parsed far enough to read it.
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl Response {
    pub fn ok(id: u64, result: Value) -> Self {
        Self {
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Option<u64>, err: &MirrorError) -> Self {
        Self {
            id,
            result: None,
            error: Some(err.into()),
        }
    }
}

/// Outbound notifications; serialized as `{"method": ..., "params": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum Notification {
    AcceptChange(ChangeSet),
    AcceptPropertiesChange(PropertiesChange),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenResourceParams {
    #[serde(default)]
    pub range: Option<Range>,
    #[serde(default)]
    pub group_index: Option<usize>,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub focus: bool,
}

impl From<OpenResourceParams> for ResourceOpenOptions {
    fn from(params: OpenResourceParams) -> Self {
        Self {
            force_open_type: None,
            range: params.range,
            group_index: params.group_index,
            preview: params.preview,
            focus: params.focus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum RemoteCommand {
    CloseEditor {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    RevealRange {
        id: String,
        range: Range,
        #[serde(default)]
        reveal_type: Option<RevealKind>,
    },
    CreateTextEditorDecorationType {
        key: String,
        #[serde(default)]
        options: DecorationRenderOptions,
    },
    DeleteTextEditorDecorationType {
        key: String,
    },
    #[serde(rename_all = "camelCase")]
    ApplyDecoration {
        id: String,
        decoration_key: String,
        #[serde(default)]
        options: Vec<DecorationApplyOptions>,
    },
    InsertSnippet {
        id: String,
        snippet: String,
        #[serde(default)]
        ranges: Vec<Range>,
        #[serde(default)]
        options: Option<UndoStopOptions>,
    },
    #[serde(rename_all = "camelCase")]
    ApplyEdits {
        id: String,
        document_version_id: u64,
        edits: Vec<SingleEditOperation>,
        #[serde(default)]
        options: ApplyEditsOptions,
    },
    OpenResource {
        uri: Uri,
        #[serde(default)]
        options: OpenResourceParams,
    },
    SetSelections {
        id: String,
        selections: Vec<Selection>,
    },
}

impl RemoteCommand {
    pub fn parse(method: &str, params: Value) -> Result<Self> {
        let envelope = serde_json::json!({ "method": method, "params": params });
        serde_json::from_value(envelope)
            .map_err(|e| MirrorError::Protocol(format!("{method}: {e}")))
    }

    pub fn method(&self) -> &'static str {
        match self {
            RemoteCommand::CloseEditor { .. } => "closeEditor",
            RemoteCommand::RevealRange { .. } => "revealRange",
            RemoteCommand::CreateTextEditorDecorationType { .. } => {
                "createTextEditorDecorationType"
            }
            RemoteCommand::DeleteTextEditorDecorationType { .. } => {
                "deleteTextEditorDecorationType"
            }
            RemoteCommand::ApplyDecoration { .. } => "applyDecoration",
            RemoteCommand::InsertSnippet { .. } => "insertSnippet",
            RemoteCommand::ApplyEdits { .. } => "applyEdits",
            RemoteCommand::OpenResource { .. } => "openResource",
            RemoteCommand::SetSelections { .. } => "setSelections",
        }
    }

    /// Runs the command. `applyEdits` answers `false` instead of an error so
    /// callers can retry against a fresh snapshot.
    pub async fn execute(self, mirror: &MainThreadEditors) -> Result<Value> {
        match self {
            RemoteCommand::CloseEditor { id } => mirror.close_editor(&id),
            RemoteCommand::RevealRange {
                id,
                range,
                reveal_type,
            } => mirror.reveal_range(&id, range, reveal_type),
            RemoteCommand::CreateTextEditorDecorationType { key, options } => {
                mirror.create_text_editor_decoration_type(&key, options)
            }
            RemoteCommand::DeleteTextEditorDecorationType { key } => {
                mirror.delete_text_editor_decoration_type(&key)
            }
            RemoteCommand::ApplyDecoration {
                id,
                decoration_key,
                options,
            } => mirror.apply_decoration(&id, &decoration_key, &options),
            RemoteCommand::InsertSnippet {
                id,
                snippet,
                ranges,
                options,
            } => mirror.insert_snippet(&id, &snippet, &ranges, options),
            RemoteCommand::ApplyEdits {
                id,
                document_version_id,
                edits,
                options,
            } => {
                let applied = mirror
                    .apply_edits(&id, document_version_id, &edits, options)
                    .is_ok();
                return Ok(Value::Bool(applied));
            }
            RemoteCommand::OpenResource { uri, options } => {
                let id = mirror.open_resource(&uri, options.into()).await?;
                return Ok(Value::String(id));
            }
            RemoteCommand::SetSelections { id, selections } => {
                mirror.set_selections(&id, &selections)?
            }
        }
        Ok(Value::Null)
    }
}

/// Parses one request line and runs it. Always produces a response.
pub async fn handle_line(mirror: &MainThreadEditors, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            let err = MirrorError::Protocol(format!("malformed request: {e}"));
            tracing::warn!(error = %err, "rejecting request");
            return Response::err(None, &err);
        }
    };
    handle_request(mirror, request).await
}

pub async fn handle_request(mirror: &MainThreadEditors, request: Request) -> Response {
    let Request { id, method, params } = request;
    let command = match RemoteCommand::parse(&method, params) {
        Ok(command) => command,
        Err(err) => {
            tracing::warn!(id, method = %method, error = %err, "rejecting request");
            return Response::err(Some(id), &err);
        }
    };
    tracing::trace!(id, method = command.method(), "handling request");
    match command.execute(mirror).await {
        Ok(result) => Response::ok(id, result),
        Err(err) => {
            tracing::debug!(id, method = %method, error = %err, "request failed");
            Response::err(Some(id), &err)
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/mirror/protocol.rs"]
mod tests;
