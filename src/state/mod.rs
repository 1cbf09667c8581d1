//! State Module
//!
//! Provides the project store, per-category resource catalogs, and the
//! session workspace (Preview and Remix buffers).

pub mod category;
pub mod clipboard;
pub mod names;
pub mod project;
pub mod resource;
pub mod session;

pub use category::Category;
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use names::validate_name;
pub use project::{DeleteReport, Project, ProjectStore};
pub use resource::{ResourceCatalog, ResourceDocument};
pub use session::{BufferId, ExportOutcome, PreviewBuffer, RemixBuffer, Session, StagedResource};
