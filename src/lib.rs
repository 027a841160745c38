//! exthost-editors - editor instances and their cross-process mirror
//!
//! Module layout:
//! - core: event emitter and subscriptions
//! - models: positions, selections, edits, view state, text buffer
//! - kernel: editor instances, the editor collection, the mirror, services

pub mod core;
pub mod kernel;
pub mod models;
