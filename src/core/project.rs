//! Project discovery and layout
//!
//! A plat project is any directory containing a `.plat/` marker. Entity
//! files live in conventional subdirectories (`deals/`, `tasks/`, ...) and
//! are named `{ID}.plat.yaml`.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::identity::EntityPrefix;

/// Marker directory identifying a project root
pub const MARKER_DIR: &str = ".plat";

/// File extension for entity files
pub const ENTITY_EXT: &str = ".plat.yaml";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not inside a plat project (no {MARKER_DIR} directory found); run `plat init` first")]
    NotFound,

    #[error("project already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Handle to a discovered project root
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Walk up from the current directory looking for the `.plat` marker
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Walk up from `start` looking for the `.plat` marker
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut dir = Some(start);
        while let Some(d) = dir {
            if d.join(MARKER_DIR).is_dir() {
                return Ok(Self {
                    root: d.to_path_buf(),
                });
            }
            dir = d.parent();
        }
        Err(ProjectError::NotFound)
    }

    /// Create the project skeleton at `path`
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        if path.join(MARKER_DIR).is_dir() {
            return Err(ProjectError::AlreadyInitialized(path.to_path_buf()));
        }
        std::fs::create_dir_all(path.join(MARKER_DIR))?;
        for prefix in EntityPrefix::all() {
            std::fs::create_dir_all(path.join(prefix.dir()))?;
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.plat` marker directory
    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    /// Directory for entities of the given type
    pub fn entity_dir(&self, prefix: EntityPrefix) -> PathBuf {
        self.root.join(prefix.dir())
    }

    /// All entity files of the given type, sorted by path
    ///
    /// Ids are ULID-based, so path order is creation order.
    pub fn iter_entity_files(&self, prefix: EntityPrefix) -> Vec<PathBuf> {
        let dir = self.entity_dir(prefix);
        if !dir.is_dir() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| p.to_string_lossy().ends_with(ENTITY_EXT))
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        assert!(project.marker_dir().is_dir());
        assert!(tmp.path().join("deals").is_dir());
        assert!(tmp.path().join("financials/proformas").is_dir());
        assert!(tmp.path().join("tasks").is_dir());
        assert!(tmp.path().join("contacts").is_dir());
        assert!(tmp.path().join("timelines").is_dir());
    }

    #[test]
    fn test_init_refuses_double_init() {
        let tmp = tempfile::tempdir().unwrap();
        Project::init(tmp.path()).unwrap();
        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyInitialized(_)));
    }

    #[test]
    fn test_discover_from_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        Project::init(tmp.path()).unwrap();
        let nested = tmp.path().join("deals");
        let project = Project::discover_from(&nested).unwrap();
        assert_eq!(project.root(), tmp.path());
    }

    #[test]
    fn test_discover_fails_outside_project() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound));
    }

    #[test]
    fn test_iter_entity_files_filters_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let dir = project.entity_dir(EntityPrefix::Deal);
        std::fs::write(dir.join("DEAL-A.plat.yaml"), "id: DEAL-A\n").unwrap();
        std::fs::write(dir.join("notes.md"), "scratch\n").unwrap();
        let files = project.iter_entity_files(EntityPrefix::Deal);
        assert_eq!(files.len(), 1);
        assert!(files[0].to_string_lossy().ends_with("DEAL-A.plat.yaml"));
    }
}
