//! Decoration types and per-widget appliers.
//!
//! Types are registered once under a key and shared by every widget. An
//! applier remembers which widget decorations it created under each key, so
//! applying a key again replaces the previous set instead of stacking.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{Emitter, Subscription};
use crate::kernel::services::ports::{CodeWidget, DecorationApplier};
use crate::models::{
    DecorationApplyOptions, DecorationId, DecorationRenderOptions, ModelDecoration,
};

#[derive(Default)]
struct DecorationTypes {
    types: FxHashMap<String, DecorationRenderOptions>,
}

#[derive(Clone, Default)]
pub struct DecorationCollection {
    types: Rc<RefCell<DecorationTypes>>,
    removed: Emitter<String>,
}

impl DecorationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the type under `key`.
    pub fn create_text_editor_decoration_type(&self, key: &str, options: DecorationRenderOptions) {
        self.types
            .borrow_mut()
            .types
            .insert(key.to_string(), options);
        tracing::debug!(key, "decoration type registered");
    }

    pub fn text_editor_decoration_type(&self, key: &str) -> Option<DecorationRenderOptions> {
        self.types.borrow().types.get(key).cloned()
    }

    /// Removes the type and clears its decorations everywhere. Returns
    /// whether the key was registered.
    pub fn delete_text_editor_decoration_type(&self, key: &str) -> bool {
        let existed = self.types.borrow_mut().types.remove(key).is_some();
        if existed {
            self.removed.fire(&key.to_string());
        }
        existed
    }

    pub fn len(&self) -> usize {
        self.types.borrow().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn applier_for(&self, widget: Rc<dyn CodeWidget>) -> WidgetDecorationApplier {
        WidgetDecorationApplier::new(self.clone(), widget)
    }
}

type AppliedByKey = Rc<RefCell<FxHashMap<String, Vec<DecorationId>>>>;

pub struct WidgetDecorationApplier {
    types: DecorationCollection,
    widget: Rc<dyn CodeWidget>,
    applied: AppliedByKey,
    _on_type_removed: Subscription,
}

impl WidgetDecorationApplier {
    pub fn new(types: DecorationCollection, widget: Rc<dyn CodeWidget>) -> Self {
        let applied: AppliedByKey = Rc::new(RefCell::new(FxHashMap::default()));
        let on_type_removed = {
            let applied = Rc::clone(&applied);
            let widget = Rc::downgrade(&widget);
            types.removed.subscribe(move |key: &String| {
                let Some(old) = applied.borrow_mut().remove(key) else {
                    return;
                };
                if let Some(widget) = widget.upgrade() {
                    widget.delta_decorations(&old, &[]);
                }
            })
        };
        Self {
            types,
            widget,
            applied,
            _on_type_removed: on_type_removed,
        }
    }

    pub fn applied_count(&self, key: &str) -> usize {
        self.applied.borrow().get(key).map_or(0, Vec::len)
    }
}

impl DecorationApplier for WidgetDecorationApplier {
    fn apply_decoration(&self, key: &str, options: &[DecorationApplyOptions]) {
        let Some(base) = self.types.text_editor_decoration_type(key) else {
            tracing::debug!(key, "apply_decoration: unknown decoration type");
            return;
        };
        let decorations: Vec<ModelDecoration> = options
            .iter()
            .map(|opt| ModelDecoration {
                range: opt.range,
                options: match &opt.render_options {
                    Some(extra) => base.merged(extra),
                    None => base.clone(),
                },
                hover_message: opt.hover_message.clone(),
            })
            .collect();

        let old = self.applied.borrow_mut().remove(key).unwrap_or_default();
        let ids = self.widget.delta_decorations(&old, &decorations);
        if !ids.is_empty() {
            self.applied.borrow_mut().insert(key.to_string(), ids);
        }
    }

    fn dispose(&self) {
        let all: Vec<DecorationId> = self
            .applied
            .borrow_mut()
            .drain()
            .flat_map(|(_, ids)| ids)
            .collect();
        if !all.is_empty() {
            self.widget.delta_decorations(&all, &[]);
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/decoration.rs"]
mod tests;
