use serde::{Deserialize, Serialize};

/// Per-document formatting options owned by the text model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextModelOptions {
    pub tab_size: u32,
    pub indent_size: u32,
    pub insert_spaces: bool,
}

impl Default for TextModelOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            indent_size: 4,
            insert_spaces: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorStyle {
    #[default]
    Line,
    Block,
    Underline,
    LineThin,
    BlockOutline,
    UnderlineThin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineNumbersStyle {
    #[default]
    On,
    Off,
    Relative,
    Interval,
}

/// Per-widget presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    pub cursor_style: CursorStyle,
    pub line_numbers: LineNumbersStyle,
}

/// What the remote peer sees as an editor's options: model options merged
/// with the widget's view options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEditorOptions {
    pub tab_size: u32,
    pub indent_size: u32,
    pub insert_spaces: bool,
    pub cursor_style: CursorStyle,
    pub line_numbers: LineNumbersStyle,
}

impl ResolvedEditorOptions {
    pub fn resolve(model: TextModelOptions, view: ViewOptions) -> Self {
        Self {
            tab_size: model.tab_size,
            indent_size: model.indent_size,
            insert_spaces: model.insert_spaces,
            cursor_style: view.cursor_style,
            line_numbers: view.line_numbers,
        }
    }
}
