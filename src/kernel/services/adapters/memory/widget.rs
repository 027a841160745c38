//! Headless code and diff widgets.
//!
//! They keep just enough view state to behave like a real editor towards
//! the kernel: selections, a scrolled viewport, decorations, undo stops.
//! The driver methods (`select`, `scroll_to`, `resize`, ...) stand in for
//! user input and fire the same events a native widget would.

use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{Emitter, Subscription};
use crate::kernel::services::ports::{
    CodeWidget, CursorSelectionEvent, DiffWidget, TextModel, WidgetId,
};
use crate::models::{
    DecorationId, ModelDecoration, Position, Range, RevealKind, Selection, SingleEditOperation,
    ViewOptions, ViewState,
};

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

const DEFAULT_VIEWPORT_LINES: u32 = 40;

pub struct MemoryCodeWidget {
    id: WidgetId,
    model: RefCell<Option<Rc<dyn TextModel>>>,
    selections: RefCell<Vec<Selection>>,
    scroll_top: Cell<u32>,
    scroll_left: Cell<u32>,
    folded: RefCell<Vec<Range>>,
    viewport_lines: Cell<u32>,
    view_options: Cell<ViewOptions>,
    decorations: RefCell<FxHashMap<DecorationId, ModelDecoration>>,
    next_decoration: Cell<u64>,
    reveals: RefCell<Vec<(Range, RevealKind)>>,
    edit_sources: RefCell<Vec<String>>,
    undo_stops: Cell<usize>,
    focused: Cell<bool>,
    disposed: Cell<bool>,
    cursor_position: Emitter<()>,
    cursor_selection: Emitter<CursorSelectionEvent>,
    scroll_changed: Emitter<()>,
    layout_changed: Emitter<()>,
    configuration_changed: Emitter<()>,
}

impl MemoryCodeWidget {
    pub fn new(view_options: ViewOptions) -> Rc<Self> {
        let id = WidgetId::new(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed));
        Rc::new(Self {
            id,
            model: RefCell::new(None),
            selections: RefCell::new(vec![Selection::default()]),
            scroll_top: Cell::new(0),
            scroll_left: Cell::new(0),
            folded: RefCell::new(Vec::new()),
            viewport_lines: Cell::new(DEFAULT_VIEWPORT_LINES),
            view_options: Cell::new(view_options),
            decorations: RefCell::new(FxHashMap::default()),
            next_decoration: Cell::new(1),
            reveals: RefCell::new(Vec::new()),
            edit_sources: RefCell::new(Vec::new()),
            undo_stops: Cell::new(0),
            focused: Cell::new(false),
            disposed: Cell::new(false),
            cursor_position: Emitter::new(),
            cursor_selection: Emitter::new(),
            scroll_changed: Emitter::new(),
            layout_changed: Emitter::new(),
            configuration_changed: Emitter::new(),
        })
    }

    /// Moves the selections as `source` would, firing selection and cursor
    /// events.
    pub fn select(&self, selections: &[Selection], source: &str) {
        if selections.is_empty() {
            return;
        }
        *self.selections.borrow_mut() = selections.iter().map(|s| self.clamp(*s)).collect();
        self.cursor_selection.fire(&CursorSelectionEvent {
            source: source.to_string(),
        });
        self.cursor_position.fire(&());
    }

    pub fn scroll_to(&self, scroll_top: u32) {
        if self.scroll_top.replace(scroll_top) != scroll_top {
            self.scroll_changed.fire(&());
        }
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top.get()
    }

    /// Changes how many lines fit in the viewport.
    pub fn resize(&self, viewport_lines: u32) {
        self.viewport_lines.set(viewport_lines.max(1));
        self.layout_changed.fire(&());
    }

    pub fn set_folded(&self, folded: Vec<Range>) {
        *self.folded.borrow_mut() = folded;
    }

    pub fn update_view_options(&self, view_options: ViewOptions) {
        self.view_options.set(view_options);
        self.configuration_changed.fire(&());
    }

    pub fn decorations(&self) -> Vec<ModelDecoration> {
        let decorations = self.decorations.borrow();
        let mut ids: Vec<&DecorationId> = decorations.keys().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| decorations.get(id).cloned())
            .collect()
    }

    pub fn reveals(&self) -> Vec<(Range, RevealKind)> {
        self.reveals.borrow().clone()
    }

    pub fn edit_sources(&self) -> Vec<String> {
        self.edit_sources.borrow().clone()
    }

    pub fn undo_stops(&self) -> usize {
        self.undo_stops.get()
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn clamp(&self, selection: Selection) -> Selection {
        let Some(model) = self.model.borrow().clone() else {
            return selection;
        };
        let clamp = |pos: Position| {
            let line_number = pos.line_number.clamp(1, model.line_count());
            let column = pos.column.clamp(1, model.line_max_column(line_number));
            Position::new(line_number, column)
        };
        Selection::new(clamp(selection.anchor()), clamp(selection.active()))
    }

    fn scroll_for_reveal(&self, range: Range, kind: RevealKind) -> u32 {
        let height = self.viewport_lines.get();
        let top = self.scroll_top.get();
        let first = range.start_line_number.saturating_sub(1);
        let centered = first.saturating_sub(height / 2);
        let visible = first >= top && first < top + height;
        match kind {
            RevealKind::AtTop => first,
            RevealKind::InCenter => centered,
            RevealKind::InCenterIfOutsideViewport if visible => top,
            RevealKind::InCenterIfOutsideViewport => centered,
            RevealKind::Default if visible => top,
            RevealKind::Default if first < top => first,
            RevealKind::Default => (first + 1).saturating_sub(height),
        }
    }
}

impl CodeWidget for MemoryCodeWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn model(&self) -> Option<Rc<dyn TextModel>> {
        self.model.borrow().clone()
    }

    fn set_model(&self, model: Option<Rc<dyn TextModel>>) {
        *self.model.borrow_mut() = model;
        *self.selections.borrow_mut() = vec![Selection::default()];
        self.scroll_top.set(0);
        self.scroll_left.set(0);
        self.folded.borrow_mut().clear();
        self.decorations.borrow_mut().clear();
    }

    fn position(&self) -> Option<Position> {
        self.model.borrow().as_ref()?;
        self.selection().map(|s| s.active())
    }

    fn selection(&self) -> Option<Selection> {
        self.selections.borrow().first().copied()
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.borrow().clone()
    }

    fn set_selections(&self, selections: &[Selection]) {
        self.select(selections, "api");
    }

    fn visible_ranges(&self) -> Vec<Range> {
        let Some(model) = self.model() else {
            return Vec::new();
        };
        let line_count = model.line_count();
        let first = (self.scroll_top.get() + 1).min(line_count);
        let last = (self.scroll_top.get() + self.viewport_lines.get()).clamp(first, line_count);
        vec![Range::new(first, 1, last, model.line_max_column(last))]
    }

    fn reveal_range(&self, range: Range, kind: RevealKind) {
        self.reveals.borrow_mut().push((range, kind));
        let top = self.scroll_for_reveal(range, kind);
        self.scroll_to(top);
    }

    fn save_view_state(&self) -> Option<ViewState> {
        self.model.borrow().as_ref()?;
        Some(ViewState {
            scroll_top: self.scroll_top.get(),
            scroll_left: self.scroll_left.get(),
            selections: self.selections(),
            folded: self.folded.borrow().clone(),
        })
    }

    fn restore_view_state(&self, state: &ViewState) {
        self.scroll_top.set(state.scroll_top);
        self.scroll_left.set(state.scroll_left);
        *self.folded.borrow_mut() = state.folded.clone();
        if !state.selections.is_empty() {
            *self.selections.borrow_mut() =
                state.selections.iter().map(|s| self.clamp(*s)).collect();
        }
    }

    fn view_options(&self) -> ViewOptions {
        self.view_options.get()
    }

    fn delta_decorations(&self, old: &[DecorationId], new: &[ModelDecoration]) -> Vec<DecorationId> {
        let mut decorations = self.decorations.borrow_mut();
        for id in old {
            decorations.remove(id);
        }
        new.iter()
            .map(|decoration| {
                let id = DecorationId::new(self.next_decoration.get());
                self.next_decoration.set(id.raw() + 1);
                decorations.insert(id, decoration.clone());
                id
            })
            .collect()
    }

    fn insert_snippet(&self, template: &str, undo_stop_before: bool, undo_stop_after: bool) {
        let Some(model) = self.model() else {
            return;
        };
        let text = expand_snippet(template);
        let selections = self.selections();
        let edits: Vec<SingleEditOperation> = selections
            .iter()
            .map(|s| SingleEditOperation::replace(s.range(), text.clone()))
            .collect();
        if !model.can_apply_edits(&edits) {
            tracing::debug!(widget = %self.id, "snippet targets overlap, nothing inserted");
            return;
        }
        if undo_stop_before {
            self.push_undo_stop();
        }
        model.push_edit_operations(&edits);
        if undo_stop_after {
            self.push_undo_stop();
        }
        if let [only] = selections.as_slice() {
            let end = end_of_insert(only.range().start(), &text);
            self.select(&[Selection::caret(end)], "snippet");
        }
    }

    fn push_undo_stop(&self) {
        self.undo_stops.set(self.undo_stops.get() + 1);
    }

    fn execute_edits(&self, source: &str, edits: &[SingleEditOperation]) -> bool {
        let Some(model) = self.model() else {
            return false;
        };
        if !model.push_edit_operations(edits) {
            return false;
        }
        self.edit_sources.borrow_mut().push(source.to_string());
        true
    }

    fn focus(&self) {
        self.focused.set(true);
    }

    fn layout(&self) {
        self.layout_changed.fire(&());
    }

    fn dispose(&self) {
        self.disposed.set(true);
        self.focused.set(false);
        *self.model.borrow_mut() = None;
        self.decorations.borrow_mut().clear();
    }

    fn on_did_change_cursor_position(&self, listener: Box<dyn Fn(&())>) -> Subscription {
        self.cursor_position.subscribe(listener)
    }

    fn on_did_change_cursor_selection(
        &self,
        listener: Box<dyn Fn(&CursorSelectionEvent)>,
    ) -> Subscription {
        self.cursor_selection.subscribe(listener)
    }

    fn on_did_scroll_change(&self, listener: Box<dyn Fn(&())>) -> Subscription {
        self.scroll_changed.subscribe(listener)
    }

    fn on_did_layout_change(&self, listener: Box<dyn Fn(&())>) -> Subscription {
        self.layout_changed.subscribe(listener)
    }

    fn on_did_change_configuration(&self, listener: Box<dyn Fn(&())>) -> Subscription {
        self.configuration_changed.subscribe(listener)
    }
}

pub struct MemoryDiffWidget {
    original: Rc<MemoryCodeWidget>,
    modified: Rc<MemoryCodeWidget>,
    model_sets: Cell<usize>,
    disposed: Cell<bool>,
}

impl MemoryDiffWidget {
    pub fn new(view_options: ViewOptions) -> Rc<Self> {
        Rc::new(Self {
            original: MemoryCodeWidget::new(view_options),
            modified: MemoryCodeWidget::new(view_options),
            model_sets: Cell::new(0),
            disposed: Cell::new(false),
        })
    }

    pub fn original(&self) -> &Rc<MemoryCodeWidget> {
        &self.original
    }

    pub fn modified(&self) -> &Rc<MemoryCodeWidget> {
        &self.modified
    }

    /// How many times both sides were bound.
    pub fn model_sets(&self) -> usize {
        self.model_sets.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl DiffWidget for MemoryDiffWidget {
    fn original_editor(&self) -> Rc<dyn CodeWidget> {
        self.original.clone()
    }

    fn modified_editor(&self) -> Rc<dyn CodeWidget> {
        self.modified.clone()
    }

    fn set_model(&self, original: Rc<dyn TextModel>, modified: Rc<dyn TextModel>) {
        self.original.set_model(Some(original));
        self.modified.set_model(Some(modified));
        self.model_sets.set(self.model_sets.get() + 1);
    }

    fn focus(&self) {
        self.modified.focus();
    }

    fn layout(&self) {
        self.original.layout();
        self.modified.layout();
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.original.dispose();
        self.modified.dispose();
    }
}

/// Drops tabstops and keeps placeholder defaults: `${1:name}` -> `name`,
/// `$0` and `${2}` -> nothing. `\$`, `\}` and `\\` are literal.
pub fn expand_snippet(template: &str) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    expand_into(&chars, &mut out);
    out
}

fn expand_into(chars: &[char], out: &mut String) {
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' if matches!(chars.get(i + 1), Some('$' | '}' | '\\')) => {
                out.push(chars[i + 1]);
                i += 2;
            }
            '$' if chars.get(i + 1).is_some_and(char::is_ascii_digit) => {
                i += 1;
                while chars.get(i).is_some_and(char::is_ascii_digit) {
                    i += 1;
                }
            }
            '$' if chars.get(i + 1) == Some(&'{') => {
                let body_start = i + 2;
                let Some(close) = matching_brace(chars, body_start) else {
                    out.extend(&chars[i..]);
                    return;
                };
                let body = &chars[body_start..close];
                let digits = body.iter().take_while(|c| c.is_ascii_digit()).count();
                if digits > 0 && body.get(digits) == Some(&':') {
                    expand_into(&body[digits + 1..], out);
                } else if digits == 0 {
                    out.extend(&chars[i..=close]);
                }
                i = close + 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
}

fn matching_brace(chars: &[char], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    None
}

fn end_of_insert(start: Position, text: &str) -> Position {
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    match lines.last() {
        None => Position::new(start.line_number, start.column + first.chars().count() as u32),
        Some(last) => {
            let extra = text.matches('\n').count() as u32;
            Position::new(start.line_number + extra, last.chars().count() as u32 + 1)
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/memory/widget.rs"]
mod tests;
