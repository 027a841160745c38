//! Data model layer: plain values shared by the kernel, the ports and the
//! wire records.

pub mod decoration;
pub mod edit;
pub mod options;
pub mod position;
pub mod selection;
pub mod text_buffer;
pub mod view;

pub use decoration::{
    DecorationApplyOptions, DecorationId, DecorationRenderOptions, ModelDecoration,
};
pub use edit::{ApplyEditsOptions, EndOfLine, SingleEditOperation, UndoStopOptions};
pub use options::{CursorStyle, LineNumbersStyle, ResolvedEditorOptions, TextModelOptions, ViewOptions};
pub use position::{Position, Range};
pub use selection::Selection;
pub use text_buffer::TextBuffer;
pub use view::{RevealKind, ViewState};

/// Resource identifier. Always compared and serialized in its string form.
pub type Uri = lsp_types::Url;
