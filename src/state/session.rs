//! Session workspace
//!
//! A [`Session`] replaces the "current project / current selection" globals
//! of a GUI: it owns the active project, the Preview buffer (bound to at most
//! one resource file) and the Remix buffer.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};

use crate::error::{NarrativeError, Result};
use crate::state::category::Category;
use crate::state::clipboard::Clipboard;
use crate::state::project::{DeleteReport, Project, ProjectStore};
use crate::state::resource::ResourceCatalog;

/// Suggested file name for remix exports.
pub const DEFAULT_EXPORT_FILE: &str = "remix.txt";

/// The resource a Preview buffer is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedResource {
    pub category: Category,
    pub name: String,
    /// Write-back target for updates.
    pub path: PathBuf,
}

/// Single-slot view of one resource.
#[derive(Debug, Clone, Default)]
pub struct PreviewBuffer {
    text: String,
    staged: Option<StagedResource>,
}

impl PreviewBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn staged(&self) -> Option<&StagedResource> {
        self.staged.as_ref()
    }

    pub fn is_bound_to(&self, path: &Path) -> bool {
        self.staged.as_ref().is_some_and(|s| s.path == path)
    }

    fn bind(&mut self, staged: StagedResource, text: String) {
        self.staged = Some(staged);
        self.text = text;
    }

    /// Drop both the text and the bound path.
    pub fn clear(&mut self) {
        self.text.clear();
        self.staged = None;
    }
}

/// Scratch text built from labelled resource excerpts.
#[derive(Debug, Clone, Default)]
pub struct RemixBuffer {
    text: String,
}

impl RemixBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Header line plus content plus a blank line.
    pub fn format_block(name: &str, category: Category, content: &str) -> String {
        format!("--- {} ({}) ---\n{}\n\n", name, category.title(), content)
    }

    pub fn append_block(&mut self, name: &str, category: Category, content: &str) {
        self.text
            .push_str(&Self::format_block(name, category, content));
    }

    /// Replace the whole text, as a user edit would.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Text that an export would write.
    pub fn export_text(&self) -> &str {
        self.text.trim()
    }
}

/// Which workspace buffer an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferId {
    Preview,
    Remix,
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferId::Preview => write!(f, "preview"),
            BufferId::Remix => write!(f, "remix"),
        }
    }
}

impl FromStr for BufferId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" => Ok(BufferId::Preview),
            "remix" => Ok(BufferId::Remix),
            other => Err(format!("unknown buffer '{}' (expected preview or remix)", other)),
        }
    }
}

/// Result of exporting the Remix buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing to export; no file was written.
    Empty,
    Written { path: PathBuf, bytes: usize },
}

/// Explicit session context passed to every workspace operation.
#[derive(Debug)]
pub struct Session {
    store: ProjectStore,
    active: Option<Project>,
    preview: PreviewBuffer,
    remix: RemixBuffer,
}

impl Session {
    pub fn new(store: ProjectStore) -> Self {
        Self {
            store,
            active: None,
            preview: PreviewBuffer::default(),
            remix: RemixBuffer::default(),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.active.as_ref()
    }

    pub fn preview(&self) -> &PreviewBuffer {
        &self.preview
    }

    pub fn remix(&self) -> &RemixBuffer {
        &self.remix
    }

    /// Mutable access for free-form edits and clearing.
    pub fn remix_mut(&mut self) -> &mut RemixBuffer {
        &mut self.remix
    }

    fn require_active(&self) -> Result<&Project> {
        self.active.as_ref().ok_or(NarrativeError::NoActiveProject)
    }

    fn catalog(&self, category: Category) -> Result<ResourceCatalog> {
        Ok(self.require_active()?.catalog(category))
    }

    // === Projects ===

    pub fn list_projects(&self) -> Result<Vec<String>> {
        self.store.list_projects()
    }

    /// Create a project and make it the active one.
    pub fn create_project(&mut self, name: &str) -> Result<&Project> {
        let project = self.store.create_project(name)?;
        self.preview.clear();
        Ok(self.active.insert(project))
    }

    pub fn open_project(&mut self, name: &str) -> Result<&Project> {
        let project = self.store.open_project(name)?;
        self.preview.clear();
        debug!("Opened project '{}'", project.name);
        Ok(self.active.insert(project))
    }

    pub fn close_project(&mut self) {
        self.active = None;
        self.preview.clear();
    }

    fn is_active(&self, name: &str) -> bool {
        self.active
            .as_ref()
            .is_some_and(|p| p.name == name.trim())
    }

    /// Rename a project. An active project follows the rename.
    pub fn rename_project(&mut self, old_name: &str, new_name: &str) -> Result<Project> {
        let renamed = self.store.rename_project(old_name, new_name)?;
        if self.is_active(old_name) {
            // the staged path pointed into the old directory
            self.preview.clear();
            self.active = Some(renamed.clone());
        }
        Ok(renamed)
    }

    /// Delete a project. Deleting the active project closes it.
    pub fn delete_project(&mut self, name: &str) -> Result<DeleteReport> {
        let report = self.store.delete_project(name)?;
        if self.is_active(name) {
            self.close_project();
        }
        Ok(report)
    }

    // === Resources ===

    pub fn list_resources(&self, category: Category) -> Result<Vec<String>> {
        self.catalog(category)?.list_resources()
    }

    pub fn create_resource(&self, category: Category, name: &str, content: &str) -> Result<()> {
        self.catalog(category)?.create_resource(name, content)?;
        Ok(())
    }

    pub fn read_resource(&self, category: Category, name: &str) -> Result<String> {
        self.catalog(category)?.read_resource(name)
    }

    /// Rename a resource. If Preview was bound to it, Preview is cleared
    /// whether or not the rename succeeds.
    pub fn rename_resource(
        &mut self,
        category: Category,
        old_name: &str,
        new_name: &str,
    ) -> Result<()> {
        let catalog = self.catalog(category)?;
        if self.preview.is_bound_to(&catalog.resource_path(old_name)?) {
            self.preview.clear();
        }
        catalog.rename_resource(old_name, new_name)?;
        Ok(())
    }

    /// Delete a resource. If Preview was bound to it, Preview is cleared
    /// whether or not the delete succeeds.
    pub fn delete_resource(&mut self, category: Category, name: &str) -> Result<()> {
        let catalog = self.catalog(category)?;
        if self.preview.is_bound_to(&catalog.resource_path(name)?) {
            self.preview.clear();
        }
        catalog.delete_resource(name)
    }

    // === Preview / Remix ===

    /// Load a resource into Preview and bind its path for updates.
    /// On failure the previous Preview state is kept.
    pub fn select_resource(&mut self, category: Category, name: &str) -> Result<&str> {
        let catalog = self.catalog(category)?;
        let path = catalog.resource_path(name)?;
        let content = catalog.read_resource(name)?;
        let staged = StagedResource {
            category,
            name: name.trim().to_string(),
            path,
        };
        debug!("Staged {} '{}'", category.singular(), staged.name);
        self.preview.bind(staged, content);
        Ok(self.preview.text())
    }

    /// Write new content to the resource bound in Preview.
    pub fn update_resource(&mut self, content: &str) -> Result<()> {
        let staged = self.preview.staged().ok_or(NarrativeError::NothingStaged)?;
        ResourceCatalog::update_resource(&staged.path, content)?;
        self.preview.text = content.to_string();
        Ok(())
    }

    /// Append a labelled block for a resource to the Remix buffer.
    pub fn append_to_remix(&mut self, category: Category, name: &str) -> Result<()> {
        let content = self.catalog(category)?.read_resource(name)?;
        self.remix.append_block(name.trim(), category, &content);
        debug!("Appended {} '{}' to remix", category.singular(), name.trim());
        Ok(())
    }

    /// Write the trimmed Remix text to `destination`.
    pub fn export_remix(&self, destination: &Path) -> Result<ExportOutcome> {
        let text = self.remix.export_text();
        if text.is_empty() {
            info!("Remix buffer is empty, nothing to export");
            return Ok(ExportOutcome::Empty);
        }

        fs::write(destination, text).map_err(|e| NarrativeError::io("write", destination, e))?;
        info!("Exported remix to {}", destination.display());
        Ok(ExportOutcome::Written {
            path: destination.to_path_buf(),
            bytes: text.len(),
        })
    }

    /// Copy the full, untrimmed text of a buffer to `clipboard`.
    pub fn copy_to_clipboard(&self, buffer: BufferId, clipboard: &mut dyn Clipboard) -> Result<()> {
        let text = match buffer {
            BufferId::Preview => self.preview.text(),
            BufferId::Remix => self.remix.text(),
        };
        clipboard.set_text(text)?;
        debug!("Copied {} ({} bytes) to clipboard", buffer, text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::state::clipboard::MemoryClipboard;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_session() -> (TempDir, Session) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(&StoreConfig::with_root(Some(temp_dir.path())));
        let mut session = Session::new(store);
        session.create_project("Saga").unwrap();
        (temp_dir, session)
    }

    #[test]
    fn test_format_block() {
        assert_eq!(
            RemixBuffer::format_block("Anna", Category::Characters, "Brave."),
            "--- Anna (Characters) ---\nBrave.\n\n"
        );
    }

    #[test]
    fn test_resource_ops_need_active_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(&StoreConfig::with_root(Some(temp_dir.path())));
        let mut session = Session::new(store);

        let err = session.select_resource(Category::Props, "Lamp").unwrap_err();
        assert_eq!(err.error_code(), "NO_ACTIVE_PROJECT");
    }

    #[test]
    fn test_update_without_selection() {
        let (_temp_dir, mut session) = create_test_session();
        let err = session.update_resource("text").unwrap_err();
        assert_eq!(err.error_code(), "NOTHING_STAGED");
    }

    #[test]
    fn test_failed_select_keeps_previous_preview() {
        let (_temp_dir, mut session) = create_test_session();
        session
            .create_resource(Category::Props, "Lamp", "brass")
            .unwrap();
        session.select_resource(Category::Props, "Lamp").unwrap();

        assert!(session.select_resource(Category::Props, "Ghost").is_err());
        assert_eq!(session.preview().text(), "brass");
        assert_eq!(session.preview().staged().unwrap().name, "Lamp");
    }

    #[test]
    fn test_invalid_names_leave_workspace_untouched() {
        let (_temp_dir, mut session) = create_test_session();
        session
            .create_resource(Category::Props, "Lamp", "brass")
            .unwrap();
        session.select_resource(Category::Props, "Lamp").unwrap();

        for name in ["", "..", "../props/Lamp"] {
            let errs = [
                session.select_resource(Category::Clothing, name).unwrap_err(),
                session.append_to_remix(Category::Clothing, name).unwrap_err(),
                session.delete_resource(Category::Clothing, name).unwrap_err(),
                session
                    .rename_resource(Category::Clothing, name, "Stolen")
                    .unwrap_err(),
                session.delete_project(name).unwrap_err(),
            ];
            for err in errs {
                assert_eq!(err.error_code(), "INVALID_INPUT", "name {:?}", name);
            }
        }

        assert_eq!(session.preview().text(), "brass");
        assert_eq!(session.preview().staged().unwrap().name, "Lamp");
        assert_eq!(session.remix().text(), "");
        assert_eq!(session.active_project().unwrap().name, "Saga");
        assert_eq!(session.list_projects().unwrap(), vec!["Saga"]);
    }

    #[test]
    fn test_select_replaces_staged_resource() {
        let (_temp_dir, mut session) = create_test_session();
        session
            .create_resource(Category::Props, "Lamp", "brass")
            .unwrap();
        session
            .create_resource(Category::Locations, "Attic", "dusty")
            .unwrap();

        session.select_resource(Category::Props, "Lamp").unwrap();
        session.select_resource(Category::Locations, "Attic").unwrap();
        session.update_resource("very dusty").unwrap();

        assert_eq!(session.read_resource(Category::Props, "Lamp").unwrap(), "brass");
        assert_eq!(
            session.read_resource(Category::Locations, "Attic").unwrap(),
            "very dusty"
        );
    }

    #[test]
    fn test_failed_rename_of_staged_still_clears_preview() {
        let (_temp_dir, mut session) = create_test_session();
        session
            .create_resource(Category::Props, "Lamp", "brass")
            .unwrap();
        session
            .create_resource(Category::Props, "Candle", "wax")
            .unwrap();
        session.select_resource(Category::Props, "Lamp").unwrap();

        let err = session
            .rename_resource(Category::Props, "Lamp", "Candle")
            .unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
        assert!(session.preview().staged().is_none());
        assert_eq!(session.preview().text(), "");
    }

    #[test]
    fn test_rename_other_resource_keeps_preview() {
        let (_temp_dir, mut session) = create_test_session();
        session
            .create_resource(Category::Props, "Lamp", "brass")
            .unwrap();
        session
            .create_resource(Category::Props, "Candle", "wax")
            .unwrap();
        session.select_resource(Category::Props, "Lamp").unwrap();

        session
            .rename_resource(Category::Props, "Candle", "Torch")
            .unwrap();
        assert_eq!(session.preview().staged().unwrap().name, "Lamp");
    }

    #[test]
    fn test_rename_active_project_follows() {
        let (_temp_dir, mut session) = create_test_session();
        session
            .create_resource(Category::Props, "Lamp", "brass")
            .unwrap();
        session.select_resource(Category::Props, "Lamp").unwrap();

        session.rename_project("Saga", "Epic").unwrap();

        assert_eq!(session.active_project().unwrap().name, "Epic");
        assert!(session.preview().staged().is_none());
        assert_eq!(session.read_resource(Category::Props, "Lamp").unwrap(), "brass");
    }

    #[test]
    fn test_delete_active_project_closes_it() {
        let (_temp_dir, mut session) = create_test_session();
        session.delete_project("Saga").unwrap();

        assert!(session.active_project().is_none());
        assert!(session.list_projects().unwrap().is_empty());
    }

    #[test]
    fn test_copy_preview_untrimmed() {
        let (_temp_dir, mut session) = create_test_session();
        session
            .create_resource(Category::Clothing, "Cloak", "  wool\n")
            .unwrap();
        session.select_resource(Category::Clothing, "Cloak").unwrap();

        let mut clipboard = MemoryClipboard::new();
        session
            .copy_to_clipboard(BufferId::Preview, &mut clipboard)
            .unwrap();
        assert_eq!(clipboard.contents(), Some("  wool\n"));
    }

    #[test]
    fn test_remix_edit_and_clear() {
        let (_temp_dir, mut session) = create_test_session();
        session.remix_mut().set_text("hand written");
        assert_eq!(session.remix().text(), "hand written");

        session.remix_mut().clear();
        assert_eq!(session.remix().text(), "");
    }

    #[test]
    fn test_buffer_id_parse() {
        assert_eq!("Remix".parse::<BufferId>().unwrap(), BufferId::Remix);
        assert!("clipboard".parse::<BufferId>().is_err());
    }
}
