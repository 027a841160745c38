//! Service adapters: runtime specific implementations (memory backend, IO).

pub mod memory;
pub mod settings;
pub mod stdio;

pub use memory::{
    MemoryCodeWidget, MemoryDiffWidget, MemoryDocumentStore, MemoryEditorGroup, MemoryWorkbench,
};
pub use settings::{
    ensure_log_dir, ensure_settings_file, get_settings_path, load_settings, load_settings_from,
};
pub use stdio::{serve, write_lines, JsonLineProxy};
