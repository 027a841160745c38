//! Services layer (ports + adapters).
//!
//! - `ports`: collaborator contracts the editor kernel consumes.
//! - `adapters`: the in-memory backend, settings files and the stdio transport.

pub mod adapters;
pub mod host;
pub mod ports;

pub use host::EditorServiceHost;
