use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Error as SerdeError;

use crate::{domain::wizard::WizardState, util::project_dirs};

const DRAFT_FILE: &str = "wizard_draft.json";

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

/// The single durable slot holding an in-progress wizard snapshot.
pub trait DraftStore {
    /// Missing or unreadable drafts are `None`.
    fn load(&self) -> Option<WizardState>;
    /// Overwrites whatever was stored before.
    fn save(&self, state: &WizardState) -> Result<(), DraftError>;
    fn clear(&self) -> Result<(), DraftError>;
}

/// JSON file in the platform config directory.
#[derive(Clone, Debug)]
pub struct FileDraftStore {
    path: Option<PathBuf>,
}

impl FileDraftStore {
    pub fn default_location() -> Self {
        Self {
            path: project_dirs().map(|dirs| dirs.config_dir().join(DRAFT_FILE)),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Option<WizardState> {
        let path = self.path.as_ref()?;
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<WizardState>(&data) {
            Ok(state) => Some(state.restored()),
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable draft: {err}");
                None
            }
        }
    }

    fn save(&self, state: &WizardState) -> Result<(), DraftError> {
        let path = self.path.as_ref().ok_or(DraftError::StorageUnavailable)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "draft saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        let path = self.path.as_ref().ok_or(DraftError::StorageUnavailable)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryDraftStore;
