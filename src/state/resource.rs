//! Resource Catalog
//!
//! One catalog covers a single `(project, category)` directory. Each resource
//! is a `<name>.json` file holding a [`ResourceDocument`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::{NarrativeError, Result};
use crate::state::category::Category;
use crate::state::names::validate_name;

/// Extension of resource files.
pub const RESOURCE_EXTENSION: &str = "json";

/// On-disk shape of a resource file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDocument {
    /// Free text. Files written without this key read as empty.
    #[serde(default)]
    pub content: String,
}

impl ResourceDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Load a document from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => NarrativeError::NotFound {
                what: "resource",
                path: path.to_path_buf(),
            },
            _ => NarrativeError::io("read", path, e),
        })?;

        serde_json::from_str(&text).map_err(|e| NarrativeError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Serialize with a four-space indent.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        Ok(out)
    }

    /// Write the document to `path`, replacing whatever is there.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_json()?;
        fs::write(path, bytes).map_err(|e| NarrativeError::io("write", path, e))
    }
}

/// Resources of one category within one project.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    category: Category,
    dir: PathBuf,
}

impl ResourceCatalog {
    /// Catalog over `<project_dir>/<category>/`.
    pub fn new(project_dir: &Path, category: Category) -> Self {
        Self {
            category,
            dir: project_dir.join(category.dir_name()),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Get the category directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a resource of this name lives at. Names that could resolve
    /// outside the category directory are rejected.
    pub fn resource_path(&self, name: &str) -> Result<PathBuf> {
        let name = validate_name(self.category.singular(), name)?;
        Ok(self.dir.join(format!("{}.{}", name, RESOURCE_EXTENSION)))
    }

    /// Sorted resource names. A missing category directory is an empty catalog.
    pub fn list_resources(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(NarrativeError::io("list", &self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| NarrativeError::io("list", &self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(RESOURCE_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => names.push(stem.to_string()),
                None => warn!("Skipping non-UTF-8 resource file: {}", path.display()),
            }
        }
        names.sort();

        debug!("Listed {} {} in {}", names.len(), self.category, self.dir.display());
        Ok(names)
    }

    /// Create a new resource. Fails if the name is taken.
    pub fn create_resource(&self, name: &str, content: &str) -> Result<PathBuf> {
        let name = validate_name(self.category.singular(), name)?;
        let path = self.resource_path(&name)?;

        if path.exists() {
            return Err(NarrativeError::AlreadyExists {
                what: self.category.singular(),
                name,
            });
        }

        ResourceDocument::new(content).save(&path)?;
        info!("Created {} '{}'", self.category.singular(), name);
        Ok(path)
    }

    /// Read a resource's content.
    pub fn read_resource(&self, name: &str) -> Result<String> {
        let path = self.resource_path(name)?;
        debug!("Reading {}", path.display());
        Ok(ResourceDocument::load(&path)?.content)
    }

    /// Overwrite the resource at a previously resolved `path`.
    pub fn update_resource(path: &Path, content: &str) -> Result<()> {
        if !path.is_file() {
            return Err(NarrativeError::NotFound {
                what: "resource",
                path: path.to_path_buf(),
            });
        }

        ResourceDocument::new(content).save(path)?;
        info!("Updated {}", path.display());
        Ok(())
    }

    /// Rename a resource file. Content is carried over untouched.
    pub fn rename_resource(&self, old_name: &str, new_name: &str) -> Result<PathBuf> {
        let new_name = validate_name(self.category.singular(), new_name)?;
        let from = self.resource_path(old_name)?;
        let to = self.resource_path(&new_name)?;

        if !from.is_file() {
            return Err(NarrativeError::NotFound {
                what: "resource",
                path: from,
            });
        }
        if to.exists() {
            return Err(NarrativeError::AlreadyExists {
                what: self.category.singular(),
                name: new_name,
            });
        }

        fs::rename(&from, &to).map_err(|e| NarrativeError::io("rename", &from, e))?;
        info!(
            "Renamed {} '{}' to '{}'",
            self.category.singular(),
            old_name.trim(),
            new_name
        );
        Ok(to)
    }

    /// Delete a resource file.
    pub fn delete_resource(&self, name: &str) -> Result<()> {
        let path = self.resource_path(name)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => NarrativeError::NotFound {
                what: "resource",
                path: path.clone(),
            },
            _ => NarrativeError::io("delete", &path, e),
        })?;

        info!("Deleted {} '{}'", self.category.singular(), name.trim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    fn catalog(temp_dir: &TempDir, category: Category) -> ResourceCatalog {
        let catalog = ResourceCatalog::new(temp_dir.path(), category);
        fs::create_dir_all(catalog.dir()).unwrap();
        catalog
    }

    #[test]
    fn test_document_uses_four_space_indent() {
        let json = ResourceDocument::new("Tall, grim.").to_json().unwrap();
        assert_eq!(
            String::from_utf8(json).unwrap(),
            "{\n    \"content\": \"Tall, grim.\"\n}"
        );
    }

    #[test]
    fn test_missing_content_key_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Props);
        fs::write(catalog.resource_path("Lamp").unwrap(), "{}").unwrap();

        assert_eq!(catalog.read_resource("Lamp").unwrap(), "");
    }

    #[test]
    fn test_malformed_resource_is_parse_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Props);
        fs::write(catalog.resource_path("Broken").unwrap(), "{ not json").unwrap();

        let err = catalog.read_resource("Broken").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_missing_resource_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Props);

        let err = catalog.read_resource("Ghost").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_list_skips_other_files_and_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Characters);

        catalog.create_resource("Zed", "z").unwrap();
        catalog.create_resource("Anna", "a").unwrap();
        fs::write(catalog.dir().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(catalog.dir().join("folder.json")).unwrap();

        assert_eq!(catalog.list_resources().unwrap(), vec!["Anna", "Zed"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = ResourceCatalog::new(temp_dir.path(), Category::Clothing);

        assert!(catalog.list_resources().unwrap().is_empty());
    }

    #[test]
    fn test_create_duplicate_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Locations);

        catalog.create_resource("Harbor", "salt").unwrap();
        let err = catalog.create_resource(" Harbor ", "other").unwrap_err();

        assert_eq!(err.error_code(), "ALREADY_EXISTS");
        assert_eq!(catalog.read_resource("Harbor").unwrap(), "salt");
    }

    #[test]
    fn test_rename_onto_existing_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Locations);

        catalog.create_resource("Harbor", "salt").unwrap();
        catalog.create_resource("Market", "noise").unwrap();

        let err = catalog.rename_resource("Harbor", "Market").unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
        assert_eq!(catalog.read_resource("Harbor").unwrap(), "salt");
    }

    #[test]
    fn test_update_vanished_path_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Props);
        let path = catalog.create_resource("Sword", "sharp").unwrap();
        fs::remove_file(&path).unwrap();

        let err = ResourceCatalog::update_resource(&path, "dull").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&temp_dir, Category::Props);

        let err = catalog.delete_resource("Nothing").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test_case("" ; "empty")]
    #[test_case(".." ; "dotdot")]
    #[test_case("../props/Sword" ; "traversal")]
    #[test_case("../../Other/props/Sword" ; "cross project")]
    fn test_lookup_names_are_validated(name: &str) {
        let temp_dir = tempfile::tempdir().unwrap();
        let props = catalog(&temp_dir, Category::Props);
        props.create_resource("Sword", "sharp").unwrap();
        let clothing = catalog(&temp_dir, Category::Clothing);

        for err in [
            clothing.read_resource(name).unwrap_err(),
            clothing.delete_resource(name).unwrap_err(),
            clothing.rename_resource(name, "Stolen").unwrap_err(),
        ] {
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
        assert_eq!(props.read_resource("Sword").unwrap(), "sharp");
    }
}
