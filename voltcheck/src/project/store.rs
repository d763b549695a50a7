//! Snapshot Persistence
//!
//! Two fixed-name JSON documents under a data directory: the named project
//! list and the standalone working set. Every save is a whole-snapshot
//! overwrite; there is exactly one writer and no transaction log, so a
//! plain write is the whole story.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::licensing::ActivationState;
use crate::project::model::{Project, WorkingSet};

const PROJECTS_FILE: &str = "projects.json";
const STANDALONE_FILE: &str = "standalone.json";
const ACTIVATION_FILE: &str = "activation.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open a store, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(ProjectStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Named project list; an absent file is an empty list.
    pub fn load_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.read_or(PROJECTS_FILE, Vec::new)
    }

    pub fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError> {
        self.write(PROJECTS_FILE, &projects)
    }

    /// Standalone working set; an absent file is the seeded default.
    pub fn load_standalone(&self) -> Result<WorkingSet, StoreError> {
        self.read_or(STANDALONE_FILE, WorkingSet::default)
    }

    pub fn save_standalone(&self, data: &WorkingSet) -> Result<(), StoreError> {
        self.write(STANDALONE_FILE, data)
    }

    /// Licensing state; absent until the install is activated.
    pub fn load_activation(&self) -> Result<Option<ActivationState>, StoreError> {
        let path = self.root.join(ACTIVATION_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save_activation(&self, state: &ActivationState) -> Result<(), StoreError> {
        self.write(ACTIVATION_FILE, state)
    }

    fn read_or<T, F>(&self, file: &str, default: F) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(default());
        }
        let raw = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&raw)?;
        Ok(value)
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let path = self.root.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)?;
        tracing::debug!(file, "snapshot written");
        Ok(())
    }
}
