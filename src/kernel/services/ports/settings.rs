use crate::kernel::mirror::id::ID_SEPARATOR;
use crate::models::{
    CursorStyle, LineNumbersStyle, TextModelOptions, UndoStopOptions, ViewOptions,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub snippet: SnippetSettings,
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_tab_size")]
    pub tab_size: u32,
    #[serde(default = "default_tab_size")]
    pub indent_size: u32,
    #[serde(default = "default_true")]
    pub insert_spaces: bool,
    #[serde(default)]
    pub cursor_style: CursorStyle,
    #[serde(default)]
    pub line_numbers: LineNumbersStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetSettings {
    #[serde(default = "default_true")]
    pub undo_stop_before: bool,
    #[serde(default = "default_true")]
    pub undo_stop_after: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_tab_size() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

fn default_groups() -> Vec<String> {
    vec!["main".to_string()]
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            indent_size: default_tab_size(),
            insert_spaces: true,
            cursor_style: CursorStyle::default(),
            line_numbers: LineNumbersStyle::default(),
        }
    }
}

impl EditorSettings {
    pub fn model_options(&self) -> TextModelOptions {
        TextModelOptions {
            tab_size: self.tab_size.max(1),
            indent_size: self.indent_size.max(1),
            insert_spaces: self.insert_spaces,
        }
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            cursor_style: self.cursor_style,
            line_numbers: self.line_numbers,
        }
    }
}

impl Default for SnippetSettings {
    fn default() -> Self {
        Self {
            undo_stop_before: true,
            undo_stop_after: true,
        }
    }
}

impl SnippetSettings {
    pub fn undo_stops(&self) -> UndoStopOptions {
        UndoStopOptions {
            undo_stop_before: self.undo_stop_before,
            undo_stop_after: self.undo_stop_after,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: EditorSettings::default(),
            snippet: SnippetSettings::default(),
            groups: default_groups(),
            log: LogSettings::default(),
        }
    }
}

impl Settings {
    /// Group names usable in editor ids, deduplicated, in declaration order.
    /// Falls back to the default group when none survive.
    pub fn valid_groups(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.groups.len());
        for name in &self.groups {
            if name.is_empty() || name.contains(ID_SEPARATOR) {
                tracing::warn!(group = %name, "ignoring invalid editor group name");
                continue;
            }
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        if out.is_empty() {
            out = default_groups();
        }
        out
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
