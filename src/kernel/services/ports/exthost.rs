use crate::kernel::mirror::{ChangeSet, PropertiesChange};

/// Outbound half of the editor bridge: the remote peer's view of editors.
pub trait ExtHostEditors {
    fn accept_change(&self, change: ChangeSet);
    fn accept_properties_change(&self, change: PropertiesChange);
}
