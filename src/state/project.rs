//! Project Store
//!
//! Maps the store root onto one directory per project, each holding one
//! subdirectory per [`Category`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::StoreConfig;
use crate::error::{NarrativeError, Result};
use crate::state::category::Category;
use crate::state::names::validate_name;
use crate::state::resource::{ResourceCatalog, RESOURCE_EXTENSION};

/// Handle to an existing project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project name, also its directory name.
    pub name: String,

    /// Path to the project directory.
    pub project_path: PathBuf,
}

impl Project {
    /// Catalog for one category of this project.
    pub fn catalog(&self, category: Category) -> ResourceCatalog {
        ResourceCatalog::new(&self.project_path, category)
    }

    /// Create any category directory that is missing.
    fn ensure_categories(&self) -> Result<()> {
        for category in Category::ALL {
            let dir = self.project_path.join(category.dir_name());
            if !dir.is_dir() {
                fs::create_dir_all(&dir).map_err(|e| NarrativeError::io("create", &dir, e))?;
                debug!("Created missing category directory {}", dir.display());
            }
        }
        Ok(())
    }
}

/// Outcome of deleting a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    /// The deleted project's name.
    pub name: String,

    /// How many resource files went with it.
    pub resources_removed: usize,
}

/// All projects under one store root.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    /// Get the store root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| NarrativeError::io("create", &self.root, e))
    }

    /// Validated name and directory of a project. Every lookup goes through
    /// here so no name can resolve outside the root.
    fn project_path(&self, name: &str) -> Result<(String, PathBuf)> {
        let name = validate_name("project", name)?;
        let path = self.root.join(&name);
        Ok((name, path))
    }

    /// Sorted names of the project directories under the root.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        let entries =
            fs::read_dir(&self.root).map_err(|e| NarrativeError::io("read", &self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| NarrativeError::io("read", &self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => warn!("Skipping non-UTF-8 project directory: {}", path.display()),
            }
        }
        names.sort();

        debug!("Listed {} projects in {}", names.len(), self.root.display());
        Ok(names)
    }

    /// Create a project with empty category directories.
    pub fn create_project(&self, name: &str) -> Result<Project> {
        let (name, path) = self.project_path(name)?;

        if path.exists() {
            return Err(NarrativeError::AlreadyExists {
                what: "project",
                name,
            });
        }

        for category in Category::ALL {
            let dir = path.join(category.dir_name());
            fs::create_dir_all(&dir).map_err(|e| NarrativeError::io("create", &dir, e))?;
        }

        info!("Created project '{}' at {}", name, path.display());
        Ok(Project {
            name,
            project_path: path,
        })
    }

    /// Open an existing project.
    pub fn open_project(&self, name: &str) -> Result<Project> {
        let (name, path) = self.project_path(name)?;
        if !path.is_dir() {
            return Err(NarrativeError::NotFound {
                what: "project",
                path,
            });
        }

        let project = Project {
            name,
            project_path: path,
        };
        project.ensure_categories()?;
        Ok(project)
    }

    /// Rename a project directory.
    pub fn rename_project(&self, old_name: &str, new_name: &str) -> Result<Project> {
        let (old_name, from) = self.project_path(old_name)?;
        let (new_name, to) = self.project_path(new_name)?;

        if !from.is_dir() {
            return Err(NarrativeError::NotFound {
                what: "project",
                path: from,
            });
        }
        if to.exists() {
            return Err(NarrativeError::AlreadyExists {
                what: "project",
                name: new_name,
            });
        }

        fs::rename(&from, &to).map_err(|e| NarrativeError::io("rename", &from, e))?;
        info!("Renamed project '{}' to '{}'", old_name, new_name);
        Ok(Project {
            name: new_name,
            project_path: to,
        })
    }

    /// Remove a project and everything in it. Irreversible.
    pub fn delete_project(&self, name: &str) -> Result<DeleteReport> {
        let (name, path) = self.project_path(name)?;
        if !path.is_dir() {
            return Err(NarrativeError::NotFound {
                what: "project",
                path,
            });
        }

        let resources_removed = count_resources(&path);

        fs::remove_dir_all(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => NarrativeError::NotFound {
                what: "project",
                path: path.clone(),
            },
            _ => NarrativeError::io("delete", &path, e),
        })?;

        info!("Deleted project '{}' ({} resources)", name, resources_removed);
        Ok(DeleteReport {
            name,
            resources_removed,
        })
    }
}

/// Count `<category>/<name>.json` files directly under a project directory.
fn count_resources(project_dir: &Path) -> usize {
    WalkDir::new(project_dir)
        .follow_links(false)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some(RESOURCE_EXTENSION))
        .filter(|e| {
            e.path()
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|dir| dir.to_str())
                .is_some_and(|dir| Category::ALL.iter().any(|c| c.dir_name() == dir))
        })
        .count()
}
