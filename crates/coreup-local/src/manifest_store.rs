use std::path::{Path, PathBuf};

use coreup_core::{LocalManifest, ManifestStore};
use log::{debug, warn};
use serde::Deserialize;

pub const CORES_DIR: &str = "Cores";
pub const MANIFEST_FILE: &str = "core.json";

#[derive(Deserialize)]
struct CoreFile {
    core: CoreSection,
}

#[derive(Deserialize)]
struct CoreSection {
    metadata: CoreMetadata,
}

#[derive(Deserialize)]
struct CoreMetadata {
    version: String,
}

/// Reads `<base>/Cores/<identifier>/core.json`.
#[derive(Debug, Clone)]
pub struct FsManifestStore {
    base_dir: PathBuf,
}

impl FsManifestStore {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Location of the manifest for `identifier`, or `None` when the
    /// identifier would escape the cores directory.
    #[must_use]
    pub fn manifest_path(&self, identifier: &str) -> Option<PathBuf> {
        if !is_plain_dir_name(identifier) {
            return None;
        }
        Some(
            self.base_dir
                .join(CORES_DIR)
                .join(identifier)
                .join(MANIFEST_FILE),
        )
    }
}

impl ManifestStore for FsManifestStore {
    fn load(&self, identifier: &str) -> Option<LocalManifest> {
        let Some(path) = self.manifest_path(identifier) else {
            warn!("Ignoring unusable core identifier {identifier:?}");
            return None;
        };
        read_manifest(&path)
    }
}

fn read_manifest(path: &Path) -> Option<LocalManifest> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!("No local manifest at {}", path.display());
            return None;
        }
        Err(error) => {
            warn!("Failed to read {}: {error}", path.display());
            return None;
        }
    };

    match serde_json::from_str::<CoreFile>(&data) {
        Ok(file) => Some(LocalManifest::new(file.core.metadata.version)),
        Err(error) => {
            warn!("Ignoring malformed manifest {}: {error}", path.display());
            None
        }
    }
}

fn is_plain_dir_name(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && !identifier.contains(['/', '\\'])
}
