use crate::kernel::services::ports::CodeWidget;
use crate::models::{Range, Selection, UndoStopOptions};

/// Selects `ranges`, focuses, then inserts `template` at each selection.
/// With no ranges the snippet lands at the current selections.
pub fn insert_snippet_with_widget(
    widget: &dyn CodeWidget,
    template: &str,
    ranges: &[Range],
    opts: UndoStopOptions,
) {
    if !ranges.is_empty() {
        let selections: Vec<Selection> = ranges.iter().copied().map(Selection::from_range).collect();
        widget.set_selections(&selections);
    }
    widget.focus();
    widget.insert_snippet(template, opts.undo_stop_before, opts.undo_stop_after);
}
