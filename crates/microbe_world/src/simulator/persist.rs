//! Persistence: the versioned world snapshot and its atomic save contract.
//!
//! A save writes `<path>.tmp` and renames it over `<path>`, so a crash never
//! leaves a corrupt or partially written snapshot visible to readers. Stale
//! temp files from interrupted runs are removed on the next load attempt.
//! Config and world are persisted separately; the agent's per-tick budget is
//! transient and does not round-trip.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::types::SNAPSHOT_VERSION;
use super::world_model::WorldModel;

fn default_snapshot_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default = "default_snapshot_version")]
    pub version: u32,
    pub model: WorldModel,
}

impl WorldSnapshot {
    pub fn of(model: &WorldModel) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            model: model.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self, PersistError> {
        let snapshot: Self = serde_json::from_str(input)?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }

    /// Atomic save: write to `<path>.tmp`, rename over `<path>`.
    pub fn save_json_atomic(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let tmp = tmp_path(path);
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(&tmp, data)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Loads a snapshot, first clearing any stale temp file left behind by an
    /// interrupted save.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let tmp = tmp_path(path);
        if tmp.exists() {
            fs::remove_file(&tmp)?;
        }
        let snapshot: Self = read_json_from_path(path)?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }

    pub(crate) fn validate_version(&self) -> Result<(), PersistError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(PersistError::UnsupportedVersion {
                version: self.version,
                expected: SNAPSHOT_VERSION,
            })
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    Io(String),
    Serde(String),
    UnsupportedVersion { version: u32, expected: u32 },
}

impl From<io::Error> for PersistError {
    fn from(err: io::Error) -> Self {
        PersistError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Serde(err.to_string())
    }
}

// ============================================================================
// Helper functions
// ============================================================================

pub(crate) fn read_json_from_path<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}
