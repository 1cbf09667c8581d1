//! Store configuration.

use std::path::{Path, PathBuf};

/// Directory name used for the store root when nothing else is configured.
pub const DEFAULT_STORE_DIR: &str = "NarrativeGuru";

/// Environment variable that overrides the store root.
pub const ROOT_ENV_VAR: &str = "NARRATIVE_ROOT";

/// Resolved configuration for a [`ProjectStore`](crate::state::ProjectStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per project.
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

impl StoreConfig {
    /// Use an explicit root, falling back to [`DEFAULT_STORE_DIR`].
    pub fn with_root(root: Option<&Path>) -> Self {
        match root {
            Some(path) => Self {
                root: path.to_path_buf(),
            },
            None => Self::default(),
        }
    }
}
