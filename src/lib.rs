//! Narrative - Project and Resource Store for Writers
//!
//! Writers keep projects, each holding free-text resources (characters,
//! locations, props, clothing) stored as one JSON file per resource.
//!
//! # Layout
//!
//! ```text
//! <root>/<project>/{characters,locations,props,clothing}/<resource>.json
//! ```
//!
//! A [`state::Session`] stages one resource in its Preview buffer for
//! editing and accumulates excerpts in its Remix buffer for export.

pub mod cli;
pub mod config;
pub mod error;
pub mod state;

pub use config::StoreConfig;
pub use error::{NarrativeError, Result};
