//! Project file I/O.
//!
//! Snapshots and override maps are stored as JSON. A workspace directory holds
//! one `<project>.json` snapshot per project next to an optional
//! `<project>.overrides.json` override map.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::models::{OverrideMap, ProjectSnapshot};

/// File suffix of override maps.
pub const OVERRIDES_SUFFIX: &str = ".overrides.json";

/// Service for reading and writing project files by path.
pub struct ProjectService;

impl ProjectService {
    /// Loads and validates a project snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid snapshot, or
    /// repeats an identifier.
    pub fn load(path: &Path) -> Result<ProjectSnapshot> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        let snapshot: ProjectSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project file {}", path.display()))?;
        snapshot
            .validate()
            .with_context(|| format!("Invalid project file {}", path.display()))?;
        debug!(
            path = %path.display(),
            cables = snapshot.cables.len(),
            trays = snapshot.trays.len(),
            "Loaded project"
        );
        Ok(snapshot)
    }

    /// Validates and saves a project snapshot atomically.
    pub fn save(snapshot: &ProjectSnapshot, path: &Path) -> Result<()> {
        snapshot.validate()?;
        let content =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize project")?;
        write_atomic(path, &content)
            .with_context(|| format!("Failed to save project to {}", path.display()))
    }

    /// Loads an override map. A missing file is an empty map.
    pub fn load_overrides(path: &Path) -> Result<OverrideMap> {
        if !path.exists() {
            return Ok(OverrideMap::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read overrides file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse overrides file {}", path.display()))
    }

    /// Saves an override map atomically.
    pub fn save_overrides(overrides: &OverrideMap, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(overrides).context("Failed to serialize overrides")?;
        write_atomic(path, &content)
            .with_context(|| format!("Failed to save overrides to {}", path.display()))
    }
}

/// Summary of a project in a workspace listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    /// Project key (file stem)
    pub key: String,
    /// Display name from the snapshot
    pub name: String,
    /// Number of cables
    pub cable_count: usize,
    /// Number of trays
    pub tray_count: usize,
    /// Last modification time of the snapshot file
    pub modified: DateTime<Utc>,
}

/// Why a read-modify-write of a workspace file failed.
#[derive(Debug)]
pub enum EditError {
    /// No snapshot exists for the key.
    NotFound(String),
    /// The edit itself refused the change; nothing was written.
    Rejected(anyhow::Error),
    /// Reading or writing the file failed.
    Storage(anyhow::Error),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "Project not found: {key}"),
            Self::Rejected(e) => write!(f, "{e}"),
            Self::Storage(e) => write!(f, "{e:#}"),
        }
    }
}

impl std::error::Error for EditError {}

/// A directory of project snapshots and their override maps.
///
/// Clones share one write lock, so edits made through [`ProjectStore::update`]
/// and [`ProjectStore::update_overrides`] never interleave.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ProjectStore {
    /// Opens a store rooted at `root`. The directory is not created.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the workspace directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a project's snapshot file.
    pub fn project_path(&self, key: &str) -> Result<PathBuf> {
        let key = validate_project_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Path of a project's override file.
    pub fn overrides_path(&self, key: &str) -> Result<PathBuf> {
        let key = validate_project_key(key)?;
        Ok(self.root.join(format!("{key}{OVERRIDES_SUFFIX}")))
    }

    /// Returns true when a snapshot exists for the key.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.project_path(key).is_ok_and(|p| p.exists())
    }

    /// Lists all readable projects, sorted by key.
    ///
    /// Files that fail to parse are skipped.
    pub fn list(&self) -> Result<Vec<ProjectEntry>> {
        let entries = fs::read_dir(&self.root).with_context(|| {
            format!("Failed to read workspace directory {}", self.root.display())
        })?;

        let mut projects = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if file_name.ends_with(OVERRIDES_SUFFIX) {
                continue;
            }
            let Some(key) = file_name.strip_suffix(".json") else {
                continue;
            };
            if validate_project_key(key).is_err() {
                continue;
            }

            let snapshot = match ProjectService::load(&path) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    debug!("Skipping {}: {e:#}", path.display());
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);

            projects.push(ProjectEntry {
                key: key.to_string(),
                name: snapshot.name,
                cable_count: snapshot.cables.len(),
                tray_count: snapshot.trays.len(),
                modified,
            });
        }

        projects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(projects)
    }

    /// Loads a project snapshot.
    pub fn load(&self, key: &str) -> Result<ProjectSnapshot> {
        ProjectService::load(&self.project_path(key)?)
    }

    /// Saves a project snapshot, creating the workspace directory if needed.
    pub fn save(&self, key: &str, snapshot: &ProjectSnapshot) -> Result<()> {
        let _guard = self.lock();
        self.save_unlocked(key, snapshot)
    }

    /// Loads a project's override map (empty when none was saved).
    pub fn load_overrides(&self, key: &str) -> Result<OverrideMap> {
        ProjectService::load_overrides(&self.overrides_path(key)?)
    }

    /// Saves a project's override map.
    pub fn save_overrides(&self, key: &str, overrides: &OverrideMap) -> Result<()> {
        let _guard = self.lock();
        self.save_overrides_unlocked(key, overrides)
    }

    /// Loads a snapshot, applies `edit`, and saves the result under the store
    /// lock.
    ///
    /// Nothing is written when `edit` fails.
    pub fn update<T>(
        &self,
        key: &str,
        edit: impl FnOnce(&mut ProjectSnapshot) -> Result<T>,
    ) -> Result<T, EditError> {
        let _guard = self.lock();
        if !self.exists(key) {
            return Err(EditError::NotFound(key.to_string()));
        }
        let mut snapshot = self.load(key).map_err(EditError::Storage)?;
        let outcome = edit(&mut snapshot).map_err(EditError::Rejected)?;
        self.save_unlocked(key, &snapshot)
            .map_err(EditError::Storage)?;
        Ok(outcome)
    }

    /// Loads a project's override map, applies `edit`, and saves the result
    /// under the store lock.
    ///
    /// The project snapshot itself need not exist. Nothing is written when
    /// `edit` fails.
    pub fn update_overrides<T>(
        &self,
        key: &str,
        edit: impl FnOnce(&mut OverrideMap) -> Result<T>,
    ) -> Result<T, EditError> {
        let _guard = self.lock();
        let mut overrides = self.load_overrides(key).map_err(EditError::Storage)?;
        let outcome = edit(&mut overrides).map_err(EditError::Rejected)?;
        self.save_overrides_unlocked(key, &overrides)
            .map_err(EditError::Storage)?;
        Ok(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), so a panic in another writer leaves nothing
        // inconsistent behind.
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn save_unlocked(&self, key: &str, snapshot: &ProjectSnapshot) -> Result<()> {
        let path = self.project_path(key)?;
        self.ensure_root()?;
        ProjectService::save(snapshot, &path)
    }

    fn save_overrides_unlocked(&self, key: &str, overrides: &OverrideMap) -> Result<()> {
        let path = self.overrides_path(key)?;
        self.ensure_root()?;
        ProjectService::save_overrides(overrides, &path)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create workspace directory {}", self.root.display())
        })
    }
}

/// Checks that a project key is a plain file stem.
///
/// Rejects empty keys, path separators, `..` and hidden names.
pub fn validate_project_key(key: &str) -> Result<&str> {
    if key.is_empty() {
        anyhow::bail!("Project name cannot be empty");
    }
    if key.contains('/') || key.contains('\\') || key.contains("..") {
        anyhow::bail!("Project name '{key}' must not contain path separators or '..'");
    }
    if key.starts_with('.') {
        anyhow::bail!("Project name '{key}' must not start with '.'");
    }
    Ok(key)
}

/// Writes a file through a uniquely named temp file + rename, so readers never
/// see a partial file and concurrent writers never share a temp file.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temp file {}", temp.path().display()))?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cable, CableType, Tray};
    use tempfile::TempDir;

    fn sample() -> ProjectSnapshot {
        let mut project = ProjectSnapshot::new("Sample");
        project.cable_types.push(CableType::new(1, "NYY").with_weight_kg_per_m(0.3));
        project.trays.push(Tray::new(1, "T-1", "Ladder").with_width_mm(300.0));
        project.cables.push(Cable::new(1, "C-1", 1).on_tray(1).with_design_length(12.0));
        project
    }

    #[test]
    fn test_validate_project_key() {
        assert!(validate_project_key("plant-a").is_ok());
        assert!(validate_project_key("").is_err());
        assert!(validate_project_key("../etc").is_err());
        assert!(validate_project_key("a/b").is_err());
        assert!(validate_project_key(".hidden").is_err());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());
        store.save("plant", &sample())?;
        assert!(store.exists("plant"));
        assert_eq!(store.load("plant")?, sample());
        let files: Vec<_> = fs::read_dir(dir.path())?.flatten().collect();
        assert_eq!(files.len(), 1, "No temp files are left behind");
        Ok(())
    }

    #[test]
    fn test_missing_overrides_are_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());
        assert!(store.load_overrides("plant")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_overrides_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());
        let mut overrides = OverrideMap::new();
        overrides.set("Ladder", 1500.0)?;
        store.save_overrides("plant", &overrides)?;
        assert_eq!(store.load_overrides("plant")?, overrides);
        Ok(())
    }

    #[test]
    fn test_list_skips_overrides_and_garbage() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());
        store.save("b-plant", &sample())?;
        store.save("a-plant", &ProjectSnapshot::new("Empty"))?;
        store.save_overrides("a-plant", &OverrideMap::new())?;
        fs::write(dir.path().join("broken.json"), "{ not json")?;
        fs::write(dir.path().join("notes.txt"), "hello")?;

        let projects = store.list()?;
        let keys: Vec<&str> = projects.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a-plant", "b-plant"]);
        assert_eq!(projects[1].cable_count, 1);
        assert_eq!(projects[1].name, "Sample");
        Ok(())
    }

    #[test]
    fn test_load_rejects_duplicate_ids() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("dup.json");
        fs::write(
            &path,
            r#"{ "name": "Dup", "trays": [ { "id": 1, "type": "A" }, { "id": 1, "type": "B" } ] }"#,
        )?;
        let err = ProjectService::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("tray id"));
        Ok(())
    }

    #[test]
    fn test_update_does_not_write_on_error() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());
        store.save("plant", &sample())?;

        let result = store.update("plant", |p| p.remove_cable_type(1).map(|_| ()));
        assert!(result.is_err());
        assert_eq!(store.load("plant")?.cable_types.len(), 1);

        let detached = store.update("plant", |p| p.remove_tray(1).map(|(_, n)| n))?;
        assert_eq!(detached, 1);
        assert!(store.load("plant")?.trays.is_empty());
        Ok(())
    }

    #[test]
    fn test_update_missing_project() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());

        let result = store.update("ghost", |_| Ok(()));

        assert!(matches!(result, Err(EditError::NotFound(key)) if key == "ghost"));
        assert!(!store.exists("ghost"));
        Ok(())
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());
        store.save("plant", &sample())?;

        std::thread::scope(|scope| {
            for _ in 0..16 {
                let store = store.clone();
                scope.spawn(move || {
                    store
                        .update("plant", |p| {
                            let id = p.next_cable_id()?;
                            p.add_cable(Cable::new(id, format!("C-{id}"), 1))
                        })
                        .unwrap();
                });
            }
        });

        let project = store.load("plant")?;
        assert_eq!(project.cables.len(), 17);
        assert_eq!(project.next_cable_id()?, 18);
        Ok(())
    }

    #[test]
    fn test_update_overrides() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ProjectStore::new(dir.path());

        let previous = store.update_overrides("plant", |o| o.set("Ladder", 1500.0))?;
        assert!(previous.is_none());

        let rejected = store.update_overrides("plant", |o| o.set("Ladder", -1.0));
        assert!(matches!(rejected, Err(EditError::Rejected(_))));
        assert_eq!(store.load_overrides("plant")?.len(), 1);
        Ok(())
    }
}
