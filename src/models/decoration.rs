use super::position::Range;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecorationId(u64);

impl DecorationId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Styling registered under a decoration type key. The keys are passed
/// through to the widget untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecorationRenderOptions(pub Map<String, Value>);

impl DecorationRenderOptions {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overlays `other` on top of `self`.
    pub fn merged(&self, other: &DecorationRenderOptions) -> Self {
        let mut out = self.0.clone();
        for (k, v) in &other.0 {
            out.insert(k.clone(), v.clone());
        }
        Self(out)
    }
}

/// One range to decorate with an already registered decoration type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationApplyOptions {
    pub range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_options: Option<DecorationRenderOptions>,
}

impl DecorationApplyOptions {
    pub fn range(range: Range) -> Self {
        Self {
            range,
            hover_message: None,
            render_options: None,
        }
    }
}

/// A decoration as handed to a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDecoration {
    pub range: Range,
    pub options: DecorationRenderOptions,
    pub hover_message: Option<String>,
}
