use crate::models::DecorationApplyOptions;

/// Applies keyed decorations to the one widget it was created for.
pub trait DecorationApplier {
    /// Replaces whatever was applied under `key` before.
    fn apply_decoration(&self, key: &str, options: &[DecorationApplyOptions]);

    /// Clears everything this applier put on its widget.
    fn dispose(&self);
}
